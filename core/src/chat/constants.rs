//! Chat constants
//!
//! User-visible strings produced by the conversation itself.

/// Rendered for every transport failure, whatever the cause
pub const TRANSPORT_ERROR_MESSAGE: &str = "Server error, try again later.";

/// Prefix put in front of server-reported failure strings
pub const APP_ERROR_PREFIX: &str = "Error: ";
