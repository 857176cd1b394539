//! Identity verification through the Supabase auth (GoTrue) API

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{AuthError, AuthUser, IdentityVerifier};

/// Fetch the user a token belongs to from `{base_url}/auth/v1/user`
///
/// `api_key` identifies the project; `token` is the user's access token.
pub async fn fetch_user(
    http: &Client,
    base_url: &str,
    api_key: &str,
    token: &str,
) -> Result<AuthUser, AuthError> {
    let response = http
        .get(format!("{}/auth/v1/user", base_url))
        .header("apikey", api_key)
        .bearer_auth(token)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthError::Rejected {
            status: status.as_u16(),
        });
    }

    Ok(response.json().await?)
}

/// Verifies bearer tokens with the project's service key
#[derive(Clone)]
pub struct SupabaseAuth {
    http: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseAuth {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Result<Self, AuthError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| AuthError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseAuth {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        fetch_user(&self.http, &self.base_url, &self.service_key, token).await
    }
}
