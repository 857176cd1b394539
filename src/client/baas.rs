//! Backend-as-a-service access: PostgREST tables and the GoTrue auth API

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::supabase::fetch_user;
use crate::auth::AuthUser;

use super::error::ClientError;

/// Sort direction for `select`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// Row filter and ordering, rendered as PostgREST query parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<(String, String)>,
    order: Option<(String, Order)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep rows where `column` equals `value`
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Sort by `column`
    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.order = Some((column.to_string(), order));
        self
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = self.filters.clone();
        if let Some((column, order)) = &self.order {
            params.push(("order".to_string(), format!("{}.{}", column, order.as_str())));
        }
        params
    }
}

/// A signed-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Outcome of a sign-up
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    /// The account is active and signed in
    Session(Session),
    /// The account exists but the email must be confirmed first
    PendingConfirmation(AuthUser),
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for one backend project, optionally acting as a signed-in user
#[derive(Clone)]
pub struct BaasClient {
    http: Client,
    base_url: String,
    anon_key: String,
    session: Option<Session>,
}

impl BaasClient {
    /// Create an anonymous client
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            session: None,
        })
    }

    /// A copy of this client that acts as the session's user
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            session: Some(session),
            ..self.clone()
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The signed-in user, required for inserts that record ownership
    pub fn current_user(&self) -> Result<&AuthUser, ClientError> {
        self.session
            .as_ref()
            .map(|s| &s.user)
            .ok_or(ClientError::NotAuthenticated)
    }

    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient { baas: self }
    }

    fn bearer(&self) -> &str {
        self.session
            .as_ref()
            .map(|s| s.access_token.as_str())
            .unwrap_or(self.anon_key.as_str())
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Insert rows and return them as stored
    pub async fn insert<T, R>(&self, table: &str, rows: &T) -> Result<Vec<R>, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Select all columns of the matching rows
    pub async fn select<R>(&self, table: &str, query: &Query) -> Result<Vec<R>, ClientError>
    where
        R: DeserializeOwned,
    {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(query.to_params());

        let response = self
            .request(Method::GET, self.rest_url(table))
            .query(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Delete the matching rows
    pub async fn delete(&self, table: &str, query: &Query) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, self.rest_url(table))
            .query(&query.to_params())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }
        Ok(())
    }
}

/// Email/password auth for a backend project
pub struct AuthClient<'a> {
    baas: &'a BaasClient,
}

impl AuthClient<'_> {
    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.baas.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self
            .baas
            .http
            .post(self.url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.baas.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }
        Ok(response.json().await?)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Registration, ClientError> {
        let response = self
            .baas
            .http
            .post(self.url("signup"))
            .header("apikey", &self.baas.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        let body: serde_json::Value = response.json().await?;
        if body.get("access_token").is_some() {
            Ok(Registration::Session(serde_json::from_value(body)?))
        } else {
            Ok(Registration::PendingConfirmation(serde_json::from_value(body)?))
        }
    }

    pub async fn logout(&self, session: &Session) -> Result<(), ClientError> {
        let response = self
            .baas
            .http
            .post(self.url("logout"))
            .header("apikey", &self.baas.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }
        Ok(())
    }

    pub async fn get_user(&self, session: &Session) -> Result<AuthUser, ClientError> {
        Ok(fetch_user(
            &self.baas.http,
            &self.baas.base_url,
            &self.baas.anon_key,
            &session.access_token,
        )
        .await?)
    }
}
