//! # captura_client
//!
//! Client session controller for the Captura API.
//!
//! Replaces ambient mutable HTTP-client state with explicit per-request
//! token passing: the controller owns the token cache, refreshes silently
//! when an access token is rejected, and retries the original call exactly
//! once. A second rejection — or a failed refresh — propagates to the
//! caller, which is the cue to route back to login.

pub mod models;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{
    CreatedRecord, ErrorBody, Identity, Profile, ProfileUpdate, Record, RecordList,
    RefreshResponse, SaveRecord, TokenPair, UploadResult,
};

/// Client-side errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{error}: {message} (HTTP {status})")]
    Api {
        status: u16,
        error: String,
        message: String,
    },

    #[error("not authenticated")]
    NotAuthenticated,
}

/// Result alias for client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Session controller holding the base URL and the cached token pair.
pub struct SessionController {
    http: Client,
    base_url: String,
    tokens: RwLock<Option<TokenPair>>,
}

impl SessionController {
    /// Create a controller for the API at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            tokens: RwLock::new(None),
        }
    }

    /// Snapshot of the cached token pair, if any.
    pub async fn tokens(&self) -> Option<TokenPair> {
        self.tokens.read().await.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Convert a failed response into [`ClientError::Api`], using the
    /// structured body when the server sent one.
    async fn api_error(resp: Response) -> ClientError {
        let status = resp.status().as_u16();
        match resp.json::<ErrorBody>().await {
            Ok(body) => ClientError::Api {
                status,
                error: body.error,
                message: body.message,
            },
            Err(_) => ClientError::Api {
                status,
                error: "unknown".into(),
                message: "response body was not structured".into(),
            },
        }
    }

    async fn expect_json<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
        if !resp.status().is_success() {
            return Err(Self::api_error(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    async fn expect_ok(resp: Response) -> ClientResult<()> {
        if !resp.status().is_success() {
            return Err(Self::api_error(resp).await);
        }
        Ok(())
    }

    async fn current_access(&self) -> ClientResult<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|pair| pair.access_token.clone())
            .ok_or(ClientError::NotAuthenticated)
    }

    /// Send an authenticated request. On 401: one silent refresh, one
    /// retry of the original call, and any further failure propagates —
    /// this never loops.
    async fn send_authed<F>(&self, build: F) -> ClientResult<Response>
    where
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let access = self.current_access().await?;
        let resp = build(&self.http, &access).send().await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }

        debug!("access token rejected, attempting silent refresh");
        self.refresh().await?;

        let access = self.current_access().await?;
        Ok(build(&self.http, &access).send().await?)
    }

    // -----------------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------------

    /// Register a new account and cache the issued session.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<()> {
        let resp = self
            .http
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        let pair: TokenPair = Self::expect_json(resp).await?;
        *self.tokens.write().await = Some(pair);
        Ok(())
    }

    /// Authenticate and cache the issued session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await?;
        let pair: TokenPair = Self::expect_json(resp).await?;
        *self.tokens.write().await = Some(pair);
        Ok(())
    }

    /// Mint a fresh access token from the cached refresh token.
    ///
    /// On failure the cache is cleared: the session is dead server-side
    /// and the UI should route to login.
    pub async fn refresh(&self) -> ClientResult<()> {
        let refresh_token = self
            .tokens
            .read()
            .await
            .as_ref()
            .map(|pair| pair.refresh_token.clone())
            .ok_or(ClientError::NotAuthenticated)?;

        let resp = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&serde_json::json!({"refreshToken": refresh_token}))
            .send()
            .await?;

        if !resp.status().is_success() {
            self.tokens.write().await.take();
            return Err(Self::api_error(resp).await);
        }

        let body: RefreshResponse = resp.json().await?;
        if let Some(pair) = self.tokens.write().await.as_mut() {
            pair.access_token = body.access_token;
        }
        Ok(())
    }

    /// Revoke the cached refresh token and clear the cache.
    pub async fn logout(&self) -> ClientResult<()> {
        let refresh_token = self
            .tokens
            .read()
            .await
            .as_ref()
            .map(|pair| pair.refresh_token.clone())
            .ok_or(ClientError::NotAuthenticated)?;

        let resp = self
            .http
            .post(self.url("/auth/logout"))
            .json(&serde_json::json!({"refreshToken": refresh_token}))
            .send()
            .await?;

        // Locally the session ends either way.
        self.tokens.write().await.take();
        Self::expect_ok(resp).await
    }

    // -----------------------------------------------------------------------
    // Identity & profile
    // -----------------------------------------------------------------------

    /// Identity behind the current session.
    pub async fn me(&self) -> ClientResult<Identity> {
        let url = self.url("/auth/me");
        let resp = self
            .send_authed(|http, access| http.get(&url).bearer_auth(access))
            .await?;
        Self::expect_json(resp).await
    }

    /// Profile of the current user.
    pub async fn profile(&self) -> ClientResult<Profile> {
        let url = self.url("/auth/profile");
        let resp = self
            .send_authed(|http, access| http.get(&url).bearer_auth(access))
            .await?;
        Self::expect_json(resp).await
    }

    /// Update display name and/or password.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<()> {
        let url = self.url("/auth/profile");
        let resp = self
            .send_authed(|http, access| http.put(&url).bearer_auth(access).json(update))
            .await?;
        Self::expect_ok(resp).await
    }

    /// Delete the account and clear the cached session.
    pub async fn delete_account(&self) -> ClientResult<()> {
        let url = self.url("/auth/profile");
        let resp = self
            .send_authed(|http, access| http.delete(&url).bearer_auth(access))
            .await?;
        self.tokens.write().await.take();
        Self::expect_ok(resp).await
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    /// Paginated, optionally filtered record listing.
    pub async fn list_records(
        &self,
        page: i64,
        limit: i64,
        search: Option<&str>,
    ) -> ClientResult<RecordList> {
        let url = self.url("/records");
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(term) = search {
            query.push(("search", term.to_string()));
        }
        let resp = self
            .send_authed(|http, access| http.get(&url).bearer_auth(access).query(&query))
            .await?;
        Self::expect_json(resp).await
    }

    /// Upload an image for recognition; returns the structured document.
    pub async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> ClientResult<UploadResult> {
        let url = self.url("/records/upload");
        let resp = self
            .send_authed(|http, access| {
                let part = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(filename.to_string());
                let form = reqwest::multipart::Form::new().part("image", part);
                http.post(&url).bearer_auth(access).multipart(form)
            })
            .await?;
        Self::expect_json(resp).await
    }

    /// Save a new record.
    pub async fn create_record(&self, record: &SaveRecord) -> ClientResult<CreatedRecord> {
        let url = self.url("/records");
        let resp = self
            .send_authed(|http, access| http.post(&url).bearer_auth(access).json(record))
            .await?;
        Self::expect_json(resp).await
    }

    /// Fetch one record by id.
    pub async fn get_record(&self, id: &str) -> ClientResult<Record> {
        let url = self.url(&format!("/records/{id}"));
        let resp = self
            .send_authed(|http, access| http.get(&url).bearer_auth(access))
            .await?;
        Self::expect_json(resp).await
    }

    /// Update one record by id.
    pub async fn update_record(&self, id: &str, record: &SaveRecord) -> ClientResult<()> {
        let url = self.url(&format!("/records/{id}"));
        let resp = self
            .send_authed(|http, access| http.put(&url).bearer_auth(access).json(record))
            .await?;
        Self::expect_ok(resp).await
    }

    /// Delete one record by id.
    pub async fn delete_record(&self, id: &str) -> ClientResult<()> {
        let url = self.url(&format!("/records/{id}"));
        let resp = self
            .send_authed(|http, access| http.delete(&url).bearer_auth(access))
            .await?;
        Self::expect_ok(resp).await
    }
}
