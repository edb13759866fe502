//! PII signal detection
//!
//! Scans free text for pattern-based PII indicators. Each signal is backed
//! by one named pattern in a [`PatternRegistry`], so weights and accuracy can
//! be evaluated one signal at a time.
//!
//! # Usage
//!
//! ```rust
//! use piiflag::detection::SignalExtractor;
//!
//! let extractor = SignalExtractor::new()?;
//! let signals = extractor.extract("Contato: maria@x.com");
//! assert!(signals.has_email);
//! assert_eq!(signals.email_count, 1);
//! # Ok::<(), piiflag::domain::PiiFlagError>(())
//! ```

pub mod patterns;
pub mod signals;

pub use patterns::{PatternRegistry, SignalPattern};
pub use signals::{Signal, SignalExtractor, SignalSet};
