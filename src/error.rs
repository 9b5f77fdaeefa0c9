//! Error types for adopr

use thiserror::Error;

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling and submitting a pull request
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or saved
    #[error("config error: {0}")]
    Config(String),

    /// One or more required settings are absent
    #[error("missing required config: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    /// A git query failed or its output could not be interpreted
    #[error("git error: {0}")]
    Git(String),

    /// The model returned an empty or malformed completion
    #[error("model error: {0}")]
    Model(String),

    /// The hosting API rejected the pull request
    #[error("pull request creation failed: {status} {body}")]
    Submit {
        /// HTTP status code of the response
        status: u16,
        /// Response body as returned by the API
        body: String,
    },

    /// Underlying HTTP failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (terminal interaction, invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}
