//! Utility functions for formatting and client-side input validation.

pub mod format;
pub mod validate;

// Re-export commonly used functions at module level
pub use format::{explorer_url, format_amount, short_address, truncate_string};
pub use validate::{parse_amount, validate_address, validate_email, validate_otp, ValidationError};
