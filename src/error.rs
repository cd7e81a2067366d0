use std::path::PathBuf;
use thiserror::Error;

use crate::types::UserId;
use crate::validation::FormErrors;

#[derive(Error, Debug)]
pub enum UsersError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid input: {0}")]
    Invalid(FormErrors),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("User {0} has not been saved yet")]
    Pending(UserId),

    #[error("Server returned id {0}, which is already in the list")]
    DuplicateId(UserId),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl UsersError {
    /// Cancellation is the one failure the view never reports.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, UsersError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, UsersError>;
