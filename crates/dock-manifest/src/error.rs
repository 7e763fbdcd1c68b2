use dock_client::ClientError;
use dock_types::ErrorKind;

/// Errors produced by manifest reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("wave {wave} not found")]
    WaveNotFound { wave: String },

    #[error("barcode {barcode} is not in this wave")]
    NotInWave { barcode: String },

    #[error("barcode {barcode} was already canceled by the system")]
    AlreadyCanceled { barcode: String },

    #[error("barcode {barcode} was already removed")]
    AlreadyRemoved { barcode: String },

    #[error("no wave loaded")]
    NoManifest,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("nothing to ship")]
    NothingToShip,

    #[error("dispatch was not confirmed")]
    NotConfirmed,

    #[error(transparent)]
    Backend(#[from] ClientError),
}

impl ReconcileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WaveNotFound { .. } | Self::NotInWave { .. } => ErrorKind::NotFound,
            Self::AlreadyCanceled { .. } | Self::AlreadyRemoved { .. } => ErrorKind::Conflict,
            Self::NoManifest | Self::MissingField(_) | Self::NothingToShip | Self::NotConfirmed => {
                ErrorKind::Validation
            }
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

pub type ReconcileResult<T> = Result<T, ReconcileError>;
