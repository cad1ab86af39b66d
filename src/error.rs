//! Error Handling
//!
//! Error type definitions used in gh-label-sync

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`]
///
/// Input errors happen before any remote call, fetch errors on any call to the
/// GitHub API, parse errors while turning the configuration into labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Fetch,
    Parse,
}

/// Error types for gh-label-sync
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid repository format: {0} (expected 'owner/repo')")]
    InvalidRepositoryFormat(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(#[from] octocrab::Error),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Configuration file not found: {path} in {repository}")]
    ConfigurationNotFound { repository: String, path: String },

    #[error("Failed to decode configuration content: {0}")]
    ContentDecode(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    ConfigValidation(String),
}

impl Error {
    /// Create a new configuration validation error
    pub fn config_validation<S: Into<String>>(message: S) -> Self {
        Error::ConfigValidation(message.into())
    }

    /// Create a new missing input error
    pub fn missing_input<S: Into<String>>(name: S) -> Self {
        Error::MissingInput(name.into())
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingInput(_) | Error::InvalidInput(_) | Error::InvalidRepositoryFormat(_) => {
                ErrorKind::Input
            }
            Error::GitHubApi(_)
            | Error::RepositoryNotFound(_)
            | Error::ConfigurationNotFound { .. }
            | Error::ContentDecode(_) => ErrorKind::Fetch,
            Error::Yaml(_) | Error::Json(_) | Error::ConfigValidation(_) => ErrorKind::Parse,
        }
    }
}
