use dock_client::ClientError;
use dock_types::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EquipmentError {
    #[error("select a driver first")]
    MissingDriver,

    #[error("enter at least one cooler or bag of ice")]
    NothingToReturn,

    #[error(transparent)]
    Backend(#[from] ClientError),
}

impl EquipmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingDriver | Self::NothingToReturn => ErrorKind::Validation,
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

pub type EquipmentResult<T> = Result<T, EquipmentError>;
