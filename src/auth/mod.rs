//! Bearer-token authentication against the identity service

pub mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;
use warp::Filter;

use crate::error::ApiError;

pub use supabase::SupabaseAuth;

/// The user a token belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Errors from the identity service
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity service refused the token
    #[error("token rejected (status {status})")]
    Rejected { status: u16 },

    /// The identity service could not be reached
    #[error("identity service unreachable: {0}")]
    Transport(String),

    /// The identity service answered with something we could not read
    #[error("unexpected identity response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AuthError::InvalidResponse(err.to_string())
        } else {
            AuthError::Transport(err.to_string())
        }
    }
}

/// Resolves a bearer token to a user
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// Pull the token out of an `Authorization` header value
pub fn extract_bearer(header: Option<&str>) -> Result<String, ApiError> {
    let value = header.unwrap_or_default();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(ApiError::Unauthorized("No token provided".to_string()));
    }
    Ok(token.to_string())
}

/// Verify the header's token, hiding the failure reason from the caller
pub async fn authenticate(
    verifier: &dyn IdentityVerifier,
    header: Option<&str>,
) -> Result<AuthUser, ApiError> {
    let token = extract_bearer(header)?;
    verifier.verify(&token).await.map_err(|e| {
        tracing::warn!(error = %e, "token verification failed");
        ApiError::Unauthorized("Invalid token".to_string())
    })
}

/// Filter that extracts the authenticated user or rejects with 401
pub fn with_auth(
    verifier: Arc<dyn IdentityVerifier>,
) -> impl Filter<Extract = (AuthUser,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let verifier = verifier.clone();
        async move {
            authenticate(verifier.as_ref(), header.as_deref())
                .await
                .map_err(warp::reject::custom)
        }
    })
}
