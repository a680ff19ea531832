//! Microsoft Graph API client

use crate::auth::DeviceCodeAuthenticator;
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// HTTP client for the Microsoft Graph REST API
pub struct GraphClient {
    http_client: Client,
    authenticator: Arc<DeviceCodeAuthenticator>,
    cached_token: RwLock<Option<String>>,
}

impl GraphClient {
    /// Create a new Graph client
    pub fn new(authenticator: Arc<DeviceCodeAuthenticator>) -> Self {
        let http_client = Client::builder()
            .user_agent("m365-license-report/0.1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            authenticator,
            cached_token: RwLock::new(None),
        }
    }

    /// Get or acquire the access token
    ///
    /// The device-code sign-in is interactive, so the token from the first
    /// acquisition is reused for the rest of the process instead of
    /// re-prompting on every request.
    async fn get_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                return Ok(token.clone());
            }
        }

        let token = self.authenticator.acquire_token().await?;
        *self.cached_token.write().await = Some(token.clone());
        Ok(token)
    }

    /// Get the base API URL
    fn api_url(&self) -> String {
        format!("{}/v1.0", self.authenticator.resource_url())
    }

    /// Make an authenticated GET request
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let token = self.get_token().await?;
        let url = if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.api_url(), endpoint.trim_start_matches('/'))
        };

        debug!(%url, "sending Graph request");

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to Microsoft Graph")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Graph request failed with status {}: {}", status, body);
        }

        Ok(response)
    }

    /// Make an authenticated GET request and deserialize the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.get(endpoint).await?;
        let data = response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_sign_in(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/test-tenant/oauth2/v2.0/devicecode"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "device_code": "dc",
                "user_code": "UC99",
                "verification_uri": "https://example.com/login",
                "expires_in": 900,
                "interval": 0,
                "message": "sign in"
            })))
            .expect(1)
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/test-tenant/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "test-token"
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> GraphClient {
        let authenticator = DeviceCodeAuthenticator::new(server.uri(), "test-tenant", "client-1")
            .with_authority(server.uri());
        GraphClient::new(Arc::new(authenticator))
    }

    #[tokio::test]
    async fn sends_bearer_token_and_parses_json() {
        let server = MockServer::start().await;
        mount_sign_in(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1.0/ping"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body: serde_json::Value = client.get_json("ping").await.unwrap();
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn sign_in_runs_once_across_requests() {
        let server = MockServer::start().await;
        mount_sign_in(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1.0/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let _: serde_json::Value = client.get_json("ping").await.unwrap();
        let _: serde_json::Value = client.get_json("/ping").await.unwrap();

        // The expect(1) on the sign-in mocks verifies the token was cached.
        server.verify().await;
    }

    #[tokio::test]
    async fn non_success_status_carries_status_and_body() {
        let server = MockServer::start().await;
        mount_sign_in(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1.0/ping"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": "Authorization_RequestDenied" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get("ping").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("Authorization_RequestDenied"));
    }
}
