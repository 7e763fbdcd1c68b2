use std::fmt;

use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown scan lane: {0}")]
    UnknownLane(String),
}

/// How an error is presented to the operator.
///
/// Every error enum in the workspace maps onto one of these kinds. None of
/// them is fatal to the session: each path returns to a retryable idle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing input (vehicle, driver, selection). Raised before any network call.
    Validation,
    /// Idempotent pre-network rejection (already scanned, already removed).
    Conflict,
    /// Wave or barcode absent.
    NotFound,
    /// The request never produced an HTTP response.
    Network,
    /// The backend answered with a non-2xx status.
    Server,
}

impl ErrorKind {
    /// Returns `true` for failures of the remote call itself.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network | Self::Server)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Conflict => write!(f, "conflict"),
            Self::NotFound => write!(f, "not found"),
            Self::Network => write!(f, "network"),
            Self::Server => write!(f, "server"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_kinds() {
        assert!(ErrorKind::Network.is_remote());
        assert!(ErrorKind::Server.is_remote());
        assert!(!ErrorKind::Conflict.is_remote());
        assert!(!ErrorKind::Validation.is_remote());
        assert!(!ErrorKind::NotFound.is_remote());
    }

    #[test]
    fn display() {
        assert_eq!(ErrorKind::NotFound.to_string(), "not found");
        assert_eq!(
            TypeError::UnknownLane("dock".into()).to_string(),
            "unknown scan lane: dock"
        );
    }
}
