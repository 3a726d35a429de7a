//! Error types for the ts converter.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ts converter.
#[derive(Error, Debug)]
pub enum Error {
    // Dependency errors
    #[error("ffmpeg not found. Run: ts-converter install")]
    FfmpegNotFound,

    #[error("Unsupported operating system: {0}")]
    UnsupportedPlatform(String),

    #[error("FFmpeg installation failed: {0}")]
    InstallFailed(String),

    // Selection errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Invalid file selected. Only .{expected} files are supported: {path}")]
    UnsupportedExtension { path: String, expected: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config errors
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
