//! Error types for configuration, argument parsing and terminal I/O.
//!
//! The animation itself never fails once started; everything here happens
//! either before the terminal is taken over or while writing frames to it.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StarfieldError {
    /// Terminal or stdout I/O failed.
    Io(std::io::Error),

    /// A config file that was explicitly requested could not be read.
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A config file was read but is not valid TOML for [`crate::config::Config`].
    ConfigParse { path: PathBuf, message: String },

    /// A config value is outside the range the field can work with.
    InvalidConfig {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },

    /// A command-line argument could not be understood.
    InvalidArgument(String),

    /// The drawing surface has no usable area, so the loop is never started.
    NoSurface { width: f32, height: f32 },
}

impl fmt::Display for StarfieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StarfieldError::Io(e) => write!(f, "terminal I/O failed: {}", e),
            StarfieldError::ConfigRead { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            StarfieldError::ConfigParse { path, message } => {
                write!(f, "cannot parse config {}: {}", path.display(), message)
            }
            StarfieldError::InvalidConfig {
                name,
                value,
                expected,
            } => write!(
                f,
                "config value '{}' = {} is invalid (expected {})",
                name, value, expected
            ),
            StarfieldError::InvalidArgument(msg) => write!(f, "{}", msg),
            StarfieldError::NoSurface { width, height } => write!(
                f,
                "drawing surface {}x{} has no usable area",
                width, height
            ),
        }
    }
}

impl std::error::Error for StarfieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StarfieldError::Io(e) => Some(e),
            StarfieldError::ConfigRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StarfieldError {
    fn from(e: std::io::Error) -> Self {
        StarfieldError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, StarfieldError>;
