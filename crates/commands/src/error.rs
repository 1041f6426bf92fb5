use thiserror::Error;

use backoffice_auth::AuthzError;
use backoffice_core::DomainError;

#[derive(Debug, Error)]
pub enum CommandError {
    /// The acting user may not run this command. Maps to a 403 at the edge.
    #[error(transparent)]
    Unauthorized(#[from] AuthzError),

    #[error("unsupported command: {action} {entity}")]
    UnsupportedCommand { entity: String, action: String },

    #[error("a handler is already registered for {action} {entity}")]
    DuplicateHandler { entity: String, action: String },

    #[error("malformed command body: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CommandError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
