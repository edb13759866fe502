//! Result type alias for PiiFlag
//!
//! This module provides a convenient Result type alias that uses PiiFlagError
//! as the error type.

use super::errors::PiiFlagError;

/// Result type alias for PiiFlag operations
///
/// # Examples
///
/// ```
/// use piiflag::domain::result::Result;
/// use piiflag::domain::errors::PiiFlagError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PiiFlagError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PiiFlagError>;
