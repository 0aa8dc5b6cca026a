use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Network or timeout failure reaching the index, embedding, or
    /// generation collaborator. Retryable.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The generation backend rejected credentials or quota. Callers
    /// downgrade permanently instead of retrying.
    #[error("Auth or quota rejected: {0}")]
    AuthOrQuota(String),

    /// Missing or invalid caller input. The only error surfaced to end users.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
