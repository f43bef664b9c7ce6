use std::path::PathBuf;

use thiserror::Error;

use stockroom_auth::AuthzError;
use stockroom_core::DomainError;

/// Failure reading or writing a JSON document. Always fatal to the session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON for this document: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} holds invalid data: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Everything a desk operation can fail with.
///
/// `Domain` and `Authz` failures leave state untouched and are recoverable;
/// `Store` failures are not.
#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DeskError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, DeskError::Store(_))
    }
}

impl From<stockroom_auth::PasswordChangeError> for DeskError {
    fn from(value: stockroom_auth::PasswordChangeError) -> Self {
        match value {
            stockroom_auth::PasswordChangeError::WrongPassword(e) => DeskError::Authz(e),
            stockroom_auth::PasswordChangeError::Rejected(e) => DeskError::Domain(e),
        }
    }
}
