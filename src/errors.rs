//! Centralized error handling for ncbrowse
//!
//! Every failure a caller can see is one variant of [`NcBrowseError`]. Each
//! variant carries the variable, dimension or offending string needed to
//! render a useful message.

use crate::element::ElementType;
use std::fmt;
use std::path::PathBuf;

/// Why a file could not be opened at the I/O level
#[derive(Debug)]
pub enum IoFailure {
    /// Nothing exists at the path
    NotFound,
    /// Something exists at the path but it cannot be read as a file
    Unreadable(std::io::Error),
}

/// Main error type for ncbrowse operations
#[derive(Debug)]
pub enum NcBrowseError {
    /// File missing or unreadable
    Io { path: PathBuf, failure: IoFailure },

    /// File opens but is not a valid file of the expected format
    Format { path: PathBuf, message: String },

    /// Error reported by the NetCDF library during a read
    NetCDFError(netcdf::Error),

    /// Variable not found in the data source
    VariableNotFound { var: String },

    /// No temporal dimension where one is required.
    /// `var` is `None` when the whole file was searched.
    MissingDimension { var: Option<String> },

    /// Rank or element type outside what the core handles
    NotSupported { message: String },

    /// Time-units string (or one of its tokens) not understood
    Parse { input: String, message: String },

    /// Caller asked for a different element type than the variable stores
    TypeMismatch {
        var: String,
        stored: ElementType,
        requested: ElementType,
    },

    /// An invariant the core guarantees was violated. Always a defect.
    Internal(String),
}

impl NcBrowseError {
    pub(crate) fn not_supported(message: impl Into<String>) -> Self {
        NcBrowseError::NotSupported {
            message: message.into(),
        }
    }

    pub(crate) fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        NcBrowseError::Parse {
            input: input.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for NcBrowseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NcBrowseError::Io { path, failure } => match failure {
                IoFailure::NotFound => write!(f, "File not found: '{}'", path.display()),
                IoFailure::Unreadable(e) => {
                    write!(f, "File '{}' cannot be read: {}", path.display(), e)
                }
            },
            NcBrowseError::Format { path, message } => {
                write!(f, "'{}' is not a valid NetCDF file: {}", path.display(), message)
            }
            NcBrowseError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            NcBrowseError::VariableNotFound { var } => {
                write!(f, "Variable '{}' not found in file", var)
            }
            NcBrowseError::MissingDimension { var: Some(var) } => {
                write!(f, "Variable '{}' has no time dimension", var)
            }
            NcBrowseError::MissingDimension { var: None } => {
                write!(f, "No time dimension found in file")
            }
            NcBrowseError::NotSupported { message } => write!(f, "Not supported: {}", message),
            NcBrowseError::Parse { input, message } => {
                write!(f, "Cannot parse '{}': {}", input, message)
            }
            NcBrowseError::TypeMismatch {
                var,
                stored,
                requested,
            } => write!(
                f,
                "Variable '{}' stores {} values but {} was requested",
                var, stored, requested
            ),
            NcBrowseError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for NcBrowseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NcBrowseError::NetCDFError(e) => Some(e),
            NcBrowseError::Io {
                failure: IoFailure::Unreadable(e),
                ..
            } => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for NcBrowseError {
    fn from(error: netcdf::Error) -> Self {
        NcBrowseError::NetCDFError(error)
    }
}

impl From<ndarray::ShapeError> for NcBrowseError {
    fn from(error: ndarray::ShapeError) -> Self {
        NcBrowseError::Internal(format!("array shape mismatch: {}", error))
    }
}

/// Result type alias for ncbrowse operations
pub type Result<T> = std::result::Result<T, NcBrowseError>;
