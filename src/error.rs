//! Error types for the viewer
//!
//! Errors are `Clone` so they can be carried inside iced messages and shown
//! in the status bar.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The file or directory could not be read or written
    #[error("Cannot access {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// The image library could not decode the file
    #[error("Cannot decode {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    /// The image library could not encode the edited image
    #[error("Cannot save {}: {message}", .path.display())]
    Encode { path: PathBuf, message: String },

    /// The target extension does not map to a format we can write
    #[error("Unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Nothing to show in the chosen location
    #[error("No images found in {}", .0.display())]
    NoImages(PathBuf),

    /// Crop rectangle is empty or lies outside the image
    #[error("Invalid crop area {width}x{height} at ({x}, {y})")]
    InvalidCrop { x: u32, y: u32, width: u32, height: u32 },

    /// The config file exists but cannot be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// A background task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),
}

impl Error {
    pub fn io(path: &Path, err: impl std::fmt::Display) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn decode(path: &Path, err: impl std::fmt::Display) -> Self {
        Error::Decode {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn encode(path: &Path, err: impl std::fmt::Display) -> Self {
        Error::Encode {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mentions_path() {
        let err = Error::io(Path::new("/tmp/missing.png"), "No such file or directory");
        let message = err.to_string();
        assert!(message.contains("/tmp/missing.png"));
        assert!(message.contains("No such file"));
    }

    #[test]
    fn invalid_crop_formats_geometry() {
        let err = Error::InvalidCrop { x: 4, y: 2, width: 0, height: 10 };
        assert_eq!(err.to_string(), "Invalid crop area 0x10 at (4, 2)");
    }

    #[test]
    fn json_error_becomes_config_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Config(_)));
    }
}
