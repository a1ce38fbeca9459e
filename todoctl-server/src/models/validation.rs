//! Validation error types

use std::fmt;

/// Client-side input errors. Always rendered as 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Path identifier is not a 64-bit integer
    InvalidId { raw: String },

    /// Body is not a well-formed draft
    MalformedBody { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Kept short and stable; details go to the debug log
        match self {
            Self::InvalidId { .. } => write!(f, "invalid id"),
            Self::MalformedBody { .. } => write!(f, "invalid request body"),
        }
    }
}

impl std::error::Error for ValidationError {}
