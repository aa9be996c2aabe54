//! HTTP client for `{API_HOST}/health/profile`.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::profile::BackendProfile;

use super::envelope::Envelope;

const PROFILE_PATH: &str = "/health/profile";

/// Backend operations on the patient's health profile.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// `GET` the current profile.
    async fn fetch_profile(&self, token: &SecretString) -> Result<BackendProfile, ApiError>;

    /// `POST` a new profile.
    async fn create_profile(
        &self,
        token: &SecretString,
        profile: &BackendProfile,
    ) -> Result<Option<BackendProfile>, ApiError>;

    /// `PUT` a full replacement of the existing profile.
    async fn update_profile(
        &self,
        token: &SecretString,
        profile: &BackendProfile,
    ) -> Result<Option<BackendProfile>, ApiError>;
}

/// reqwest-backed [`ProfileApi`].
pub struct HttpProfileApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProfileApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self::with_client(&config.api_host, client))
    }

    pub fn with_client(api_host: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: api_host.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn profile_url(&self) -> String {
        format!("{}{PROFILE_PATH}", self.base_url)
    }

    /// Send one request and unwrap the envelope's `data`.
    async fn send(
        &self,
        method: Method,
        token: &SecretString,
        body: Option<&BackendProfile>,
    ) -> Result<Option<BackendProfile>, ApiError> {
        let mut request = self
            .client
            .request(method.clone(), self.profile_url())
            .bearer_auth(token.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, error = %e, "Profile request failed");
            ApiError::NetworkFailure {
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::NetworkFailure {
            reason: format!("failed to read response body: {e}"),
        })?;
        tracing::debug!(%method, status = status.as_u16(), "Profile response received");

        interpret_response(status, &text)
    }
}

/// Map a status and body to the profile payload or an [`ApiError`].
pub(crate) fn interpret_response(
    status: StatusCode,
    body: &str,
) -> Result<Option<BackendProfile>, ApiError> {
    let envelope = Envelope::parse(body);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthenticated);
    }

    if !status.is_success() {
        let message = envelope
            .as_ref()
            .and_then(Envelope::server_message)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        return Err(ApiError::ServerRejected {
            status: status.as_u16(),
            message,
        });
    }

    let Some(envelope) = envelope else {
        return Err(ApiError::MalformedResponse {
            reason: "response body is not a JSON envelope".to_string(),
        });
    };

    if envelope.success == Some(false) {
        return Err(ApiError::ServerRejected {
            status: status.as_u16(),
            message: envelope
                .server_message()
                .unwrap_or_else(|| "The server could not process the request".to_string()),
        });
    }

    match envelope.into_data() {
        None => Ok(None),
        Some(data) => serde_json::from_value(data)
            .map(Some)
            .map_err(|e| ApiError::MalformedResponse {
                reason: format!("invalid profile data: {e}"),
            }),
    }
}

#[async_trait]
impl ProfileApi for HttpProfileApi {
    async fn fetch_profile(&self, token: &SecretString) -> Result<BackendProfile, ApiError> {
        self.send(Method::GET, token, None)
            .await?
            .ok_or_else(|| ApiError::MalformedResponse {
                reason: "response is missing profile data".to_string(),
            })
    }

    async fn create_profile(
        &self,
        token: &SecretString,
        profile: &BackendProfile,
    ) -> Result<Option<BackendProfile>, ApiError> {
        self.send(Method::POST, token, Some(profile)).await
    }

    async fn update_profile(
        &self,
        token: &SecretString,
        profile: &BackendProfile,
    ) -> Result<Option<BackendProfile>, ApiError> {
        self.send(Method::PUT, token, Some(profile)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_with_data() {
        let profile = interpret_response(
            StatusCode::OK,
            r#"{"success": true, "data": {"name": "Jane", "gender": "female"}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(profile.name, "Jane");
    }

    #[test]
    fn success_without_data_is_none() {
        assert_eq!(interpret_response(StatusCode::OK, r#"{"success": true}"#), Ok(None));
    }

    #[test]
    fn auth_statuses_map_to_unauthenticated() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            assert_eq!(
                interpret_response(status, r#"{"message": "jwt expired"}"#),
                Err(ApiError::Unauthenticated)
            );
        }
    }

    #[test]
    fn rejection_carries_server_message() {
        assert_eq!(
            interpret_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                r#"{"success": false, "message": "Height must be a number"}"#
            ),
            Err(ApiError::ServerRejected {
                status: 422,
                message: "Height must be a number".into()
            })
        );
    }

    #[test]
    fn rejection_without_message_is_generic() {
        assert_eq!(
            interpret_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            Err(ApiError::ServerRejected {
                status: 502,
                message: "Request failed with status 502".into()
            })
        );
    }

    #[test]
    fn ok_with_failure_flag_is_rejected() {
        let err = interpret_response(
            StatusCode::OK,
            r#"{"success": false, "message": "Profile locked"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ApiError::ServerRejected {
                status: 200,
                message: "Profile locked".into()
            }
        );
    }

    #[test]
    fn ok_with_garbage_is_malformed() {
        assert!(matches!(
            interpret_response(StatusCode::OK, "not json"),
            Err(ApiError::MalformedResponse { .. })
        ));
        assert!(matches!(
            interpret_response(StatusCode::OK, r#"{"data": "oops"}"#),
            Err(ApiError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn profile_url_trims_trailing_slash() {
        let api = HttpProfileApi::with_client("http://localhost:5000/", reqwest::Client::new());
        assert_eq!(api.profile_url(), "http://localhost:5000/health/profile");
    }
}
