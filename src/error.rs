use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to launch {binary}: {source}")]
    ToolLaunch {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Subtitle tool failed ({status}): {stderr}")]
    ToolExecution { status: ExitStatus, stderr: String },

    #[error("SRT file not found in output directory {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("Subtitle file is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Transcription worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ServiceError {
    /// Errors caused by the request itself rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
