//! Error types for the Nebula3D engine
//!
//! This module defines the error types used throughout the engine,
//! covering descriptor allocation, GPU object creation, engine lifecycle
//! and scene persistence.

use std::fmt;

/// Result type for Nebula3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Nebula3D engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan, DirectX, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Descriptor pool exhausted or fragmented (recoverable by grabbing a new pool)
    PoolExhausted,

    /// Descriptor set allocation failed even after grabbing a fresh pool
    AllocationFailed(String),

    /// Invalid resource (buffer, pipeline, descriptor handle, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, graphics device, subsystems)
    InitializationFailed(String),

    /// Malformed persisted scene data (missing or invalid fields)
    ParseError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::PoolExhausted => write!(f, "Descriptor pool exhausted"),
            Error::AllocationFailed(msg) => write!(f, "Descriptor allocation failed: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR (with file:line) and produce an `Error::BackendError` value
///
/// Use inside `ok_or_else`/`map_err` closures or wherever an error value is
/// needed after logging:
///
/// ```no_run
/// # use nebula_3d_engine::engine_err;
/// # fn lookup() -> Option<u32> { None }
/// # fn demo() -> nebula_3d_engine::nebula3d::Result<()> {
/// let id = lookup()
///     .ok_or_else(|| engine_err!("nebula3d::Scene", "object {} not found", 7))?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::nebula3d::Engine::log_detailed(
            $crate::nebula3d::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::nebula3d::Error::BackendError(message)
    }};
}

/// Log an ERROR (with file:line) and return it from the enclosing function
///
/// Shorthand for `return Err(engine_err!(...))`.
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
