//! Unexpected failures that bypass [`Outcome`](super::Outcome).
//!
//! A `Fault` means the operation could not be carried out at all. It is
//! logged in full by the transport and reaches clients only as a redacted
//! [`Error`].

use super::{Error, ports::ProfileStoreError};

/// Environmental or programming faults raised while dispatching.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    /// The request was abandoned before it finished.
    #[error("request was cancelled")]
    Cancelled,
    /// An operation needing a caller identity ran without one.
    #[error("no authenticated user in request context")]
    Unauthenticated,
    /// No handler was registered for the request type.
    #[error("no handler registered for request `{request}`")]
    Unregistered { request: &'static str },
    /// Persistent state contradicts an invariant, such as an authenticated
    /// user without a profile.
    #[error("data integrity violation: {message}")]
    Integrity { message: String },
    /// The profile store failed.
    #[error(transparent)]
    Store(#[from] ProfileStoreError),
}

impl Fault {
    /// Stored data contradicts an invariant.
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Cancelled => Error::service_unavailable("request cancelled"),
            Fault::Store(ref err) if err.is_unavailable() => {
                Error::service_unavailable("profile store unavailable")
            }
            other => Error::internal(other.to_string()),
        }
    }
}
