//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response
    #[error("GraphQL request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status
    #[error("GraphQL request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not JSON of the expected shape
    ///
    /// The untouched response text is kept for diagnosis.
    #[error("Failed to deserialize response from GitHub. Response: {body}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The organization project could not be resolved to a node id
    #[error("Failed to fetch project node id from GitHub for project {0}")]
    ProjectNotFound(String),

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// The configured endpoint is not a valid URL
    #[error("Invalid GraphQL endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A previous run on the same tracker has not finished yet
    #[error("A tracker run is already in progress")]
    RunInProgress,
}
