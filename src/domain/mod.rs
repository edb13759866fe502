//! Domain models and types for PiiFlag.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RecordId`])
//! - **Domain models** ([`Record`])
//! - **Error types** ([`PiiFlagError`], [`ModelError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, PiiFlagError>`]:
//!
//! ```rust
//! use piiflag::domain::{PiiFlagError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = piiflag::config::PiiFlagConfig::default();
//!     config.validate().map_err(PiiFlagError::Configuration)?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ModelError, PiiFlagError};
pub use ids::RecordId;
pub use record::Record;
pub use result::Result;
