//! Error types for the Galaxy3D shader subsystem
//!
//! This module defines the error types used throughout the crate,
//! including stage compilation, program linking, uniform lookup and
//! render-loop protocol checks.

use std::fmt;
use crate::attribute::AttributeMask;
use crate::device::ShaderStage;

/// Result type for Galaxy3D shader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D shader errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (OpenGL driver, mock device, etc.)
    BackendError(String),

    /// Invalid resource (program, variant, mesh, etc.)
    InvalidResource(String),

    /// Initialization failed (device, cache directory, subsystems)
    InitializationFailed(String),

    /// A shader stage failed to compile
    CompileError {
        /// Program name (cache name of the variant)
        name: String,
        /// Failing stage
        stage: ShaderStage,
        /// Driver info log
        log: String,
    },

    /// The program failed to link
    LinkError {
        /// Program name
        name: String,
        /// Driver info log
        log: String,
    },

    /// The renderable requests attributes the shader template does not implement
    UnimplementedAttribute {
        /// Template name
        name: String,
        /// Attribute tags nobody claimed
        unsupported: AttributeMask,
    },

    /// An applicable uniform has no location in the linked program
    MissingUniform {
        /// Program name
        name: String,
        /// Uniform alias
        alias: String,
    },

    /// Reading or writing the program binary cache failed
    CacheIo(String),

    /// begin/render/end misuse, double init, use after dispose
    ProtocolViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::CompileError { name, stage, log } => {
                write!(f, "Compile error in '{}' ({}):\n{}", name, stage.label(), log)
            }
            Error::LinkError { name, log } => write!(f, "Link error in '{}':\n{}", name, log),
            Error::UnimplementedAttribute { name, unsupported } => write!(
                f,
                "Attributes not implemented by '{}': {:?}",
                name,
                unsupported.indices()
            ),
            Error::MissingUniform { name, alias } => {
                write!(f, "Uniform '{}' has no location in '{}'", alias, name)
            }
            Error::CacheIo(msg) => write!(f, "Shader cache I/O error: {}", msg),
            Error::ProtocolViolation(msg) => write!(f, "Protocol violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::CacheIo(error.to_string())
    }
}

/// Log a protocol violation and fail loudly.
///
/// Debug builds panic with the message; release builds get the typed error back.
pub(crate) fn protocol_violation(source: &str, message: String) -> Error {
    crate::engine_error!(source, "{}", message);
    if cfg!(debug_assertions) {
        panic!("{}", message);
    }
    Error::ProtocolViolation(message)
}

// ===== ERROR MACROS =====

/// Log an error and build an `Error::BackendError` from the same message
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_shaders::engine_err;
/// let err = engine_err!("galaxy3d::gl", "Failed to create program: {}", "out of handles");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an error and return it from the current function
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_shaders::engine_bail;
/// # fn f() -> galaxy_3d_shaders::galaxy3d::Result<()> {
/// engine_bail!("galaxy3d::gl", "Unknown mesh {}", 7);
/// # }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
