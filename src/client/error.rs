use thiserror::Error;

use crate::auth::AuthError;

/// Errors returned by the data-access clients
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx reply from the backend or the relay
    #[error("HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("No {table} row with id {id}")]
    NotFound { table: String, id: String },

    /// The operation needs a signed-in session
    #[error("Not signed in")]
    NotAuthenticated,

    /// The relay sent an error frame on the chat stream
    #[error("Relay error: {0}")]
    Relay(String),

    #[error("Stream error: {0}")]
    Stream(String),
}

impl ClientError {
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ClientError::Http { status, body }
    }
}
