use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `ProfilingError` and maps other errors to
/// convert to a `ProfilingError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum ProfilingError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    /// A decorator could not be installed around a target object.
    WrappingError(String),
    ProfilingError(String),
}

impl From<io::Error> for ProfilingError {
    fn from(error: io::Error) -> Self {
        ProfilingError::IoError(error)
    }
}

impl From<serde_json::Error> for ProfilingError {
    fn from(error: serde_json::Error) -> Self {
        ProfilingError::JsonError(error)
    }
}

impl From<String> for ProfilingError {
    fn from(error: String) -> Self {
        ProfilingError::ProfilingError(error)
    }
}

impl From<&str> for ProfilingError {
    fn from(error: &str) -> Self {
        ProfilingError::ProfilingError(error.to_string())
    }
}

impl std::error::Error for ProfilingError {}

impl Display for ProfilingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {self:?}")?;
        Ok(())
    }
}
