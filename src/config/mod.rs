//! Configuration management for PiiFlag.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! PiiFlag uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PIIFLAG_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation of thresholds, weights and paths
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`InputConfig`] - Text/id column candidates for record sources
//! - [`DetectionConfig`] - Optional custom pattern library
//! - [`ScoringConfig`] - Signal weights and the regex / hybrid / auto policies
//! - [`ModelConfig`] - Classifier artifact location
//! - [`BatchConfig`] - Parallel scoring
//! - [`OutputConfig`] - Output ordering
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [scoring.regex]
//! threshold = 0.35
//!
//! [scoring.hybrid]
//! alpha = 0.70
//! threshold = 0.30
//! force_threshold = 0.35
//!
//! [scoring.auto]
//! alpha = 0.45
//! threshold = 0.25
//!
//! [model]
//! path = "${PIIFLAG_MODELS}/hybrid_tfidf_logreg.json"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, AutoModeConfig, BatchConfig, DetectionConfig, HybridModeConfig,
    InputConfig, LoggingConfig, ModelConfig, OutputConfig, PiiFlagConfig, RegexModeConfig,
    ScoringConfig,
};
