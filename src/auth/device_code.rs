//! Device-code credential provider for Microsoft Graph authentication

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::DEFAULT_AUTHORITY;

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Authenticator that signs a user in with the device-code grant
///
/// The grant is interactive: phase one requests a user code and verification
/// URL, which are printed for the user to complete in a browser, then the
/// token endpoint is polled until the sign-in finishes or the code expires.
pub struct DeviceCodeAuthenticator {
    http_client: reqwest::Client,
    resource_url: String,
    authority: String,
    tenant_id: String,
    client_id: String,
}

impl DeviceCodeAuthenticator {
    /// Create a new authenticator for the given resource URL and tenant
    ///
    /// # Arguments
    /// * `resource_url` - The API resource to request a token for (e.g., "https://graph.microsoft.com")
    /// * `tenant_id` - The directory (tenant) id scoping the sign-in
    /// * `client_id` - The application registration to authenticate as
    pub fn new(
        resource_url: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        let resource_url = resource_url.into();
        let resource_url = resource_url.trim_end_matches('/').to_string();

        Self {
            http_client: reqwest::Client::new(),
            resource_url,
            authority: DEFAULT_AUTHORITY.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
        }
    }

    /// Override the token authority base URL (sovereign clouds)
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        let authority = authority.into();
        self.authority = authority.trim_end_matches('/').to_string();
        self
    }

    /// Get the resource URL this authenticator issues tokens for
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    fn scope(&self) -> String {
        format!("{}/.default", self.resource_url)
    }

    fn device_code_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/devicecode", self.authority, self.tenant_id)
    }

    fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority, self.tenant_id)
    }

    /// Run the device-code flow and return an access token
    ///
    /// Prints the sign-in prompt to stderr and blocks until the user completes
    /// the login in a browser, declines it, or the device code expires.
    pub async fn acquire_token(&self) -> Result<String> {
        let device = self.request_device_code().await?;
        eprintln!("{}", device.prompt());
        self.poll_for_token(&device).await
    }

    async fn request_device_code(&self) -> Result<DeviceCodeResponse> {
        debug!(tenant = %self.tenant_id, "requesting device code");

        let scope = self.scope();
        let response = self
            .http_client
            .post(self.device_code_url())
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await
            .context("Failed to send device code request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Device code request failed with status {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse device code response")
    }

    async fn poll_for_token(&self, device: &DeviceCodeResponse) -> Result<String> {
        let deadline = Instant::now() + Duration::from_secs(device.expires_in);
        let mut interval = device.interval;

        loop {
            if Instant::now() >= deadline {
                bail!("Device code expired before the sign-in completed");
            }

            let response = self
                .http_client
                .post(self.token_url())
                .form(&[
                    ("grant_type", DEVICE_CODE_GRANT),
                    ("client_id", self.client_id.as_str()),
                    ("device_code", device.device_code.as_str()),
                ])
                .send()
                .await
                .context("Failed to send token request")?;

            if response.status().is_success() {
                let token: TokenResponse = response
                    .json()
                    .await
                    .context("Failed to parse token response")?;
                return Ok(token.access_token);
            }

            // The authority answers pending polls with a 400 carrying an
            // OAuth error code, not just terminal failures.
            let error: TokenErrorResponse = response
                .json()
                .await
                .context("Failed to parse token error response")?;

            match error.error.as_str() {
                "authorization_pending" => {
                    debug!("sign-in pending, polling again in {}s", interval);
                }
                "slow_down" => {
                    interval += 5;
                    debug!("authority asked to slow down, interval now {}s", interval);
                }
                _ => bail!("Sign-in failed: {}", error.description()),
            }

            tokio::time::sleep(Duration::from_secs(interval)).await;
        }
    }
}

/// Phase-one response from the device code endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,

    /// Lifetime of the device code in seconds
    pub expires_in: u64,

    /// Seconds to wait between token polls
    #[serde(default = "default_poll_interval")]
    pub interval: u64,

    /// Pre-composed sign-in instructions, when the authority provides them
    #[serde(default)]
    pub message: String,
}

impl DeviceCodeResponse {
    /// Sign-in instructions to show the user
    ///
    /// Entra ID pre-composes `message`; the code and URI are fallbacks for
    /// authorities that send only the raw fields.
    pub fn prompt(&self) -> String {
        if self.message.is_empty() {
            format!(
                "To sign in, open {} in a browser and enter the code {}",
                self.verification_uri, self.user_code
            )
        } else {
            self.message.clone()
        }
    }
}

fn default_poll_interval() -> u64 {
    5
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

impl TokenErrorResponse {
    fn description(&self) -> &str {
        self.error_description.as_deref().unwrap_or(&self.error)
    }
}
