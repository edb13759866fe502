//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels (overridable through `RUST_LOG`)
//! - Console output on stderr
//! - Local JSON file logging with rotation
//!
//! Record text is never logged; events carry ids, counts and scores only.
//!
//! # Example
//!
//! ```no_run
//! use piiflag::logging::init_logging;
//! use piiflag::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a scoring run
///
/// # Example
///
/// ```no_run
/// use piiflag::log_scoring_start;
///
/// log_scoring_start!("hybrid", 1200);
/// ```
#[macro_export]
macro_rules! log_scoring_start {
    ($mode:expr, $count:expr) => {
        tracing::info!(mode = %$mode, records = $count, "Starting scoring run");
    };
}

/// Log the completion of a scoring run
///
/// # Example
///
/// ```no_run
/// use piiflag::log_scoring_complete;
/// use std::time::Duration;
///
/// log_scoring_complete!(1200, 87, Duration::from_millis(450));
/// ```
#[macro_export]
macro_rules! log_scoring_complete {
    ($count:expr, $positives:expr, $duration:expr) => {
        tracing::info!(
            records = $count,
            positives = $positives,
            duration_ms = $duration.as_millis(),
            "Scoring completed"
        );
    };
}

/// Log auto mode falling back to regex-only scoring
///
/// # Example
///
/// ```no_run
/// use piiflag::log_mode_fallback;
///
/// log_mode_fallback!("artifacts/models/model.json", "Model artifact not found");
/// ```
#[macro_export]
macro_rules! log_mode_fallback {
    ($model_path:expr, $reason:expr) => {
        tracing::warn!(
            model_path = %$model_path,
            reason = %$reason,
            "Classifier unavailable, falling back to regex-only scoring"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use piiflag::log_error_with_context;
/// use piiflag::domain::PiiFlagError;
///
/// let error = PiiFlagError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
