use dock_client::ClientError;
use dock_types::ErrorKind;

/// Errors surfaced by scan intake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    /// The barcode is already in this session's return history.
    #[error("barcode {barcode} was already scanned")]
    AlreadyScanned { barcode: String },

    /// The remote call failed; optimistic state has been rolled back.
    #[error(transparent)]
    Backend(#[from] ClientError),
}

impl IntakeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyScanned { .. } => ErrorKind::Conflict,
            Self::Backend(err) => err.kind(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

pub type IntakeResult<T> = Result<T, IntakeError>;
