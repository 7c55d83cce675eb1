//! HTTP access to the back-office API.

use std::sync::Arc;

use async_trait::async_trait;

use crate::storage::TokenStorage;
use crate::types::MyPermissions;

/// Path of the "my permissions" endpoint, relative to the API base URL.
pub const MY_PERMISSIONS_PATH: &str = "/permisos/mis-permisos";

/// Where the permission store gets its data from.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait PermissionSource {
    async fn fetch_my_permissions(&self) -> Result<MyPermissions, ApiError>;
}

/// Shared API client; attaches `Authorization: Bearer <token>` to every call
/// when a token is stored.
#[derive(Clone)]
pub struct ApiClient {
    api_url: String,
    token_key: String,
    tokens: Arc<dyn TokenStorage>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(api_url: impl Into<String>, token_key: impl Into<String>, tokens: Arc<dyn TokenStorage>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token_key: token_key.into(),
            tokens,
            http: reqwest::Client::new(),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        let mut req = self.http.get(&url);

        if let Some(token) = self.tokens.get(&self.token_key) {
            req = req.bearer_auth(token);
        }

        req
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl PermissionSource for ApiClient {
    async fn fetch_my_permissions(&self) -> Result<MyPermissions, ApiError> {
        let resp = self
            .get(MY_PERMISSIONS_PATH)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Api(status.as_u16(), resp.text().await.unwrap_or_default()));
        }

        resp.json::<MyPermissions>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}
