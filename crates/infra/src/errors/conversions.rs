//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use spotsurfer_domain::SpotSurferError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SpotSurferError);

impl From<InfraError> for SpotSurferError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SpotSurferError> for InfraError {
    fn from(value: SpotSurferError) -> Self {
        InfraError(value)
    }
}

trait IntoSpotSurferError {
    fn into_spotsurfer(self) -> SpotSurferError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SpotSurferError */
/* -------------------------------------------------------------------------- */

impl IntoSpotSurferError for HttpError {
    fn into_spotsurfer(self) -> SpotSurferError {
        if self.is_timeout() {
            return SpotSurferError::Timeout("HTTP request timed out".into());
        }

        if self.is_connect() {
            return SpotSurferError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => SpotSurferError::PermissionDenied(message),
                429 => SpotSurferError::Network(message),
                400..=499 => SpotSurferError::InvalidInput(message),
                _ => SpotSurferError::Network(message),
            };
        }

        if self.is_decode() {
            return SpotSurferError::InvalidInput(format!("unexpected response body: {self}"));
        }

        SpotSurferError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_spotsurfer())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / serde_json::Error → SpotSurferError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(SpotSurferError::Internal(format!("io error: {value}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(SpotSurferError::InvalidInput(format!("invalid JSON: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn status_error(status: StatusCode) -> HttpError {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        client.post(server.uri()).send().await.unwrap().error_for_status().unwrap_err()
    }

    #[tokio::test]
    async fn http_status_403_maps_to_permission_denied() {
        let mapped: SpotSurferError = InfraError::from(status_error(StatusCode::FORBIDDEN).await).into();
        match mapped {
            SpotSurferError::PermissionDenied(msg) => assert!(msg.contains("403")),
            other => panic!("expected permission denied, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_status_400_maps_to_invalid_input() {
        let mapped: SpotSurferError =
            InfraError::from(status_error(StatusCode::BAD_REQUEST).await).into();
        assert!(matches!(mapped, SpotSurferError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn http_status_503_is_transient_network_error() {
        let mapped: SpotSurferError =
            InfraError::from(status_error(StatusCode::SERVICE_UNAVAILABLE).await).into();
        assert!(matches!(mapped, SpotSurferError::Network(_)));
        assert!(mapped.is_transient());
    }

    #[test]
    fn json_errors_are_invalid_input() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped: SpotSurferError = InfraError::from(err).into();
        assert!(matches!(mapped, SpotSurferError::InvalidInput(_)));
    }
}
