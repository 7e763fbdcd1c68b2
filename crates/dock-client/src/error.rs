use dock_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned {status}{}", suffix(.message))]
    Server { status: u16, message: Option<String> },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("failed to create http client: {0}")]
    Setup(String),
}

impl ClientError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: Some(message.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) | Self::Setup(_) => ErrorKind::Network,
            Self::Server { .. } | Self::Decode(_) => ErrorKind::Server,
        }
    }

    /// Text shown to the operator. A server-provided message is used verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_verbatim() {
        let err = ClientError::server(409, "Barcode 998877 was already returned");
        assert_eq!(err.user_message(), "Barcode 998877 was already returned");
        assert_eq!(err.to_string(), "server returned 409: Barcode 998877 was already returned");
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[test]
    fn server_without_message() {
        let err = ClientError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), "server returned 500");
    }

    #[test]
    fn network_kind() {
        let err = ClientError::Network("connection refused".into());
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.status(), None);
        assert_eq!(err.user_message(), "network error: connection refused");
    }
}
