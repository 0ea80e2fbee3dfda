//! Error types for the DUI pool
//!
//! This module defines the error types used throughout the crate,
//! including slot allocation, native surface failures and message encoding.

use std::fmt;

/// Result type for DUI pool operations
pub type Result<T> = std::result::Result<T, Error>;

/// DUI pool errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Every slot of the pool is in use
    PoolExhausted {
        /// Fixed pool capacity
        capacity: usize,
    },

    /// Slot index out of range or not currently held
    InvalidSlotReference(String),

    /// Message payload could not be encoded
    SerializationError(String),

    /// Surface construction failed (wraps the underlying cause)
    CreationFailed {
        /// Requested url
        url: String,
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
        /// Underlying error
        source: Box<Error>,
    },

    /// Native collaborator error (passed through unchanged)
    BackendError(String),

    /// Handle used after its native resources were torn down
    InvalidResource(String),

    /// Invalid configuration or unusable context
    InitializationFailed(String),
}

impl Error {
    /// Innermost error, unwrapping any `CreationFailed` layers
    pub fn root(&self) -> &Error {
        match self {
            Error::CreationFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error (or its root cause) is pool exhaustion
    pub fn is_pool_exhausted(&self) -> bool {
        matches!(self.root(), Error::PoolExhausted { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PoolExhausted { capacity } => {
                write!(f, "No available texture slots in pool (max {})", capacity)
            }
            Error::InvalidSlotReference(msg) => write!(f, "Invalid slot reference: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::CreationFailed { url, width, height, source } => write!(
                f,
                "Failed to create dui '{}' ({}x{}): {}",
                url, width, height, source
            ),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CreationFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

// ===== ERROR MACROS =====

/// Log an ERROR message with file:line and build an `Error::BackendError`
///
/// # Example
///
/// ```ignore
/// return Err(dui_err!("dui::Backend", "Surface {} not found", id));
/// ```
#[macro_export]
macro_rules! dui_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::log::log_detailed(
            $crate::dui::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::dui::Error::BackendError(message)
    }};
}

/// Log an ERROR message with file:line and return `Err(Error::BackendError)`
///
/// # Example
///
/// ```ignore
/// dui_bail!("dui::Backend", "Surface {} already destroyed", id);
/// ```
#[macro_export]
macro_rules! dui_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::dui_err!($source, $($arg)*))
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
