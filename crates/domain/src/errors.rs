//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for SpotSurfer
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SpotSurferError {
    /// The user declined location or notification permission.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The platform could not produce a position fix.
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    /// The platform push service refused or failed to issue a subscription.
    #[error("Push service unavailable: {0}")]
    PushServiceUnavailable(String),

    #[error("Malformed push payload: {0}")]
    MalformedPushPayload(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SpotSurferError {
    /// Transient errors affect a single attempt (one sampling tick, one
    /// request) and never end a session.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::PositionUnavailable(_) | Self::Timeout(_) | Self::Network(_))
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "permission_denied",
            Self::PositionUnavailable(_) => "position_unavailable",
            Self::Timeout(_) => "timeout",
            Self::PushServiceUnavailable(_) => "push_service_unavailable",
            Self::MalformedPushPayload(_) => "malformed_push_payload",
            Self::Network(_) => "network",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for SpotSurfer operations
pub type Result<T> = std::result::Result<T, SpotSurferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(SpotSurferError::PositionUnavailable("no fix".into()).is_transient());
        assert!(SpotSurferError::Timeout("10s".into()).is_transient());
        assert!(SpotSurferError::Network("refused".into()).is_transient());
        assert!(!SpotSurferError::PermissionDenied("geolocation".into()).is_transient());
        assert!(!SpotSurferError::PushServiceUnavailable("gone".into()).is_transient());
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = SpotSurferError::PermissionDenied("notifications".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "PermissionDenied");
        assert_eq!(json["message"], "notifications");
    }

    #[test]
    fn labels_are_snake_case() {
        assert_eq!(
            SpotSurferError::MalformedPushPayload("x".into()).label(),
            "malformed_push_payload"
        );
        assert_eq!(SpotSurferError::Internal("x".into()).label(), "internal");
    }
}
