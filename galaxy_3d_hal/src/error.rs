//! Error types for the Galaxy3D hardware abstraction layer
//!
//! Pure functions (translation, normalization, registry lookups) only ever fail
//! with `InvalidArgument`. Lifecycle functions (device bring-up, context
//! negotiation, synchronization) may fail fatally and never hand back a
//! partially initialized object.

use std::fmt;

/// Result type for HAL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D HAL errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller contract violation: malformed descriptor, stale or foreign handle
    InvalidArgument(String),

    /// No candidate feature level succeeded on any adapter
    DeviceCreationFailed(String),

    /// Context negotiation hit a fatal step (format, activation, sharing)
    ContextCreationFailed(String),

    /// The native device stopped answering (fence signal or wait failed)
    DeviceLost(String),

    /// Backend-specific error that is none of the above
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,
}

impl Error {
    /// Short name of the error kind, used as log prefix
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "Invalid argument",
            Error::DeviceCreationFailed(_) => "Device creation failed",
            Error::ContextCreationFailed(_) => "Context creation failed",
            Error::DeviceLost(_) => "Device lost",
            Error::BackendError(_) => "Backend error",
            Error::OutOfMemory => "Out of GPU memory",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg)
            | Error::DeviceCreationFailed(msg)
            | Error::ContextCreationFailed(msg)
            | Error::DeviceLost(msg)
            | Error::BackendError(msg) => write!(f, "{}: {}", self.kind_name(), msg),
            Error::OutOfMemory => write!(f, "{}", self.kind_name()),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build the matching `Error` variant
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_hal::hal_err;
///
/// let err = hal_err!(InvalidArgument, "galaxy3d::hal::registry", "handle {} is stale", 3);
/// ```
#[macro_export]
macro_rules! hal_err {
    ($kind:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::galaxy3d::Hal::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::galaxy3d::Error::$kind(message)
    }};
}

/// Log an ERROR message and return early with the matching `Error` variant
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_hal::hal_bail;
///
/// fn check(width: u32) -> galaxy_3d_hal::galaxy3d::Result<()> {
///     if width == 0 {
///         hal_bail!(InvalidArgument, "galaxy3d::hal::normalize", "width must be > 0");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! hal_bail {
    ($kind:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::hal_err!($kind, $source, $($arg)*))
    };
}

/// Log a WARN message and build the matching `Error` variant
///
/// Used where the failure is expected and the caller recovers from it
/// (a feature level refused by an adapter, an unsupported sample count).
#[macro_export]
macro_rules! hal_warn_err {
    ($kind:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::galaxy3d::Hal::log(
            $crate::galaxy3d::log::LogSeverity::Warn,
            $source,
            message.clone()
        );
        $crate::galaxy3d::Error::$kind(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
