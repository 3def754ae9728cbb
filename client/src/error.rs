//! Error taxonomy for client operations.

use std::time::Duration;

use hsdev_types::DecodeError;
use serde_json::Value;

/// Failure surfaced by [`Client`](crate::Client) operations.
///
/// Transport failures (`ConnectTimeout`, `Connect`, `Disconnected`) are
/// connection-wide and terminal; `Service` and `Decode` are local to the one
/// request they answer. No retries happen at this layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The connect handshake did not complete within the configured bound.
    #[error("connection timeout after {0:?}")]
    ConnectTimeout(Duration),

    /// The TCP connect itself failed.
    #[error("unable to connect to hsdev server: {0}")]
    Connect(#[source] std::io::Error),

    /// The connection closed while this request was pending, or the request
    /// was issued after the connection had already closed.
    #[error("disconnected from hsdev server")]
    Disconnected,

    /// The service answered this request with an error message; any extra
    /// members of the error object are preserved as details.
    #[error("error returned: {message}")]
    Service { message: String, details: Value },

    /// The response payload did not decode with this command's decoder.
    #[error("invalid response payload: {0}")]
    Decode(#[from] DecodeError),
}

impl ClientError {
    /// Whether the failure tears down the whole connection rather than one
    /// request.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectTimeout(_) | Self::Connect(_) | Self::Disconnected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_error_display_includes_message() {
        let err = ClientError::Service {
            message: "module not found".to_owned(),
            details: json!({"module": "Data.Missing"}),
        };
        assert!(err.to_string().contains("module not found"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_classification() {
        assert!(ClientError::Disconnected.is_transport());
        assert!(ClientError::ConnectTimeout(Duration::from_secs(5)).is_transport());
        assert!(!ClientError::Decode(DecodeError::new("bad")).is_transport());
    }
}
