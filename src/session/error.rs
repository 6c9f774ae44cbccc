use crate::services::RegistryError;
use thiserror::Error;

/// Input that ends or corrupts the session.
#[derive(Debug, Error)]
pub enum ProtocolViolation {
    #[error("peer closed the connection")]
    Closed,

    #[error("line exceeds {0} bytes")]
    LineTooLong(usize),

    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl SessionError {
    /// True when the peer simply went away.
    #[must_use]
    pub const fn is_disconnect(&self) -> bool {
        matches!(self, Self::Protocol(ProtocolViolation::Closed))
    }
}
