use thiserror::Error;

/// Why a caller could not be resolved to a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("invalid Authorization header format, expected 'Bearer <token>'")]
    MalformedHeader,

    #[error("invalid API key")]
    UnknownCredential,
}

/// Errors surfaced by campaign, chat, and history operations.
///
/// Each variant maps to exactly one HTTP status in the API layer.
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("you do not have access to this campaign")]
    Forbidden,

    #[error("campaign not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("generation backend error: {0}")]
    Upstream(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for CampaignError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => CampaignError::NotFound,
            other => CampaignError::Storage(other.to_string()),
        }
    }
}

/// Errors from repository operations (used by trait definitions in loreline-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
