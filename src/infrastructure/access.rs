//! Access-Control Service Client
//!
//! HTTP implementation of [`AccessPort`]. The authorization decision lives
//! entirely in the external service; this client only surfaces a boolean
//! allowed/denied outcome. Fail-closed: an unreachable service denies.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::AccessPort;
use crate::config::AccessSettings;
use crate::shared::error::AppError;

#[derive(Debug, Serialize)]
struct CheckRequest<'a> {
    endpoint_address: &'a str,
}

/// HTTP client for the external access-control service.
#[derive(Clone)]
pub struct HttpAccessClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAccessClient {
    pub fn new(settings: &AccessSettings) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("access client init failed: {e}")))?;

        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AccessPort for HttpAccessClient {
    async fn check(&self, endpoint: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(format!("{}/access/check", self.base_url))
            .json(&CheckRequest {
                endpoint_address: endpoint,
            })
            .send()
            .await
            .map_err(|e| AppError::AccessDenied(format!("access service unreachable: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            Err(AppError::AccessDenied(format!(
                "access check for {endpoint} denied: {status}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(url: &str) -> AccessSettings {
        AccessSettings {
            url: url.to_string(),
            timeout_ms: 1000,
        }
    }

    #[tokio::test]
    async fn allowed_endpoint_passes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/access/check"))
            .and(body_json(serde_json::json!({
                "endpoint_address": "/chat/v1/send-message"
            })))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = HttpAccessClient::new(&settings(&server.uri())).unwrap();
        assert!(client.check("/chat/v1/send-message").await.is_ok());
    }

    #[tokio::test]
    async fn denial_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/access/check"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = HttpAccessClient::new(&settings(&server.uri())).unwrap();
        let err = client.check("/chat/v1/send-message").await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn unreachable_service_denies() {
        // Nothing listens here; the client must fail closed.
        let client = HttpAccessClient::new(&settings("http://127.0.0.1:1")).unwrap();
        let err = client.check("/chat/v1/send-message").await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied(_)));
    }
}
