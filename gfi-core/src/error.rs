//! Error types for the tracker core

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file or value error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No repositories configured
    #[error("No repositories found in configuration")]
    MissingRepos,

    /// No organization/project pair configured
    #[error("No organization and project number found in configuration")]
    MissingProject,

    /// A repository entry is not of the form owner/repo
    #[error("Invalid repository '{0}', expected owner/repo")]
    InvalidRepo(String),

    /// The project entry is not of the form org/number
    #[error("Invalid project '{0}', expected org/number")]
    InvalidProject(String),
}
