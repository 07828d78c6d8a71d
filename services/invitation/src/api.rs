//! HTTP client wrapper for the remote invitation API
//!
//! Attaches the stored bearer token to every request, turns non-2xx
//! responses into [`ApiError`], and notifies a registered handler when a
//! request that carried a token is rejected with 401.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::storage::{ACCESS_TOKEN_KEY, SessionStorage};

/// Error returned by any remote call
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401 from the server
    #[error("Unauthorized")]
    Unauthorized { message: Option<String> },

    /// Any other non-2xx status
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// Network, connection or timeout failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// GraphQL error array, or an envelope without data
    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message } | ApiError::Status { message, .. } => {
                message.as_deref()
            }
            ApiError::GraphQl(messages) => messages.first().map(String::as_str),
            _ => None,
        }
    }

    /// Human-readable message, preferring the server's wording over `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Callback invoked when an authenticated request is rejected with 401
pub type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
    operation_name: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

/// REST + GraphQL client
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    graphql_path: String,
    storage: Arc<dyn SessionStorage>,
    on_unauthorized: RwLock<Option<UnauthorizedHandler>>,
}

impl ApiClient {
    /// Create a new API client reading tokens from `storage`
    pub fn new(config: &AppConfig, storage: Arc<dyn SessionStorage>) -> ApiResult<Self> {
        reqwest::Url::parse(&config.api_base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.api_base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            graphql_path: config.graphql_path.clone(),
            storage,
            on_unauthorized: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register the forced-logout callback, replacing any previous one
    pub fn set_unauthorized_handler(&self, handler: UnauthorizedHandler) {
        *self
            .on_unauthorized
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    pub fn clear_unauthorized_handler(&self) {
        *self
            .on_unauthorized
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn notify_unauthorized(&self) {
        let handler = self
            .on_unauthorized
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(handler) = handler {
            handler();
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.execute(Method::GET, path, None::<&()>, true).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::POST, path, Some(body), true).await?;
        decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::PATCH, path, Some(body), true).await?;
        decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::PUT, path, Some(body), true).await?;
        decode(response).await
    }

    /// POST without the stored bearer token
    ///
    /// For credential exchanges (login, refresh): a 401 here is a rejected
    /// credential, not an expired session, so the unauthorized handler is
    /// never notified.
    pub async fn post_anonymous<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::POST, path, Some(body), false).await?;
        decode(response).await
    }

    /// DELETE, ignoring any response body
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(Method::DELETE, path, None::<&()>, true).await?;
        Ok(())
    }

    /// Run a GraphQL operation against the configured endpoint
    pub async fn graphql<V, T>(&self, operation_name: &str, query: &str, variables: V) -> ApiResult<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let request = GraphQlRequest {
            query,
            variables,
            operation_name,
        };

        let response = self
            .execute(Method::POST, &self.graphql_path, Some(&request), true)
            .await?;
        let envelope: GraphQlResponse<T> = decode(response).await?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            warn!("GraphQL operation {} failed: {}", operation_name, messages.join("; "));
            return Err(ApiError::GraphQl(messages));
        }

        envelope
            .data
            .ok_or_else(|| ApiError::GraphQl(vec!["Response contained no data".to_string()]))
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        authenticated: bool,
    ) -> ApiResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let token = if authenticated {
            self.storage.get(ACCESS_TOKEN_KEY)
        } else {
            None
        };
        debug!("{} {} (authenticated: {})", method, path, token.is_some());

        let mut request: RequestBuilder = self.http.request(method.clone(), self.url(path));
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response).await;
        warn!("{} {} returned {}", method, path, status);

        if status == StatusCode::UNAUTHORIZED {
            if token.is_some() {
                self.notify_unauthorized();
            }
            return Err(ApiError::Unauthorized { message });
        }

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

async fn error_message(response: Response) -> Option<String> {
    let bytes = response.bytes().await.ok()?;
    let body: ErrorBody = serde_json::from_slice(&bytes).ok()?;
    body.error.or(body.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn client(base_url: &str) -> ApiClient {
        let config = AppConfig {
            api_base_url: base_url.to_string(),
            ..AppConfig::default()
        };
        ApiClient::new(&config, Arc::new(MemoryStorage::new())).expect("Failed to build client")
    }

    #[test]
    fn test_url_joining() {
        let api = client("http://localhost:3001/api/");
        assert_eq!(api.url("/weddings"), "http://localhost:3001/api/weddings");
        assert_eq!(api.url("weddings"), "http://localhost:3001/api/weddings");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = AppConfig {
            api_base_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        let result = ApiClient::new(&config, Arc::new(MemoryStorage::new()));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_user_message_prefers_server_wording() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Slug already taken".to_string()),
        };
        assert_eq!(err.user_message("Failed to create wedding"), "Slug already taken");
        assert_eq!(err.status(), Some(400));

        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to create wedding"), "Failed to create wedding");
        assert_eq!(err.to_string(), "HTTP 500: request failed");
    }

    #[test]
    fn test_graphql_errors_surface_first_message() {
        let err = ApiError::GraphQl(vec!["Unknown operation".to_string(), "second".to_string()]);
        assert_eq!(err.user_message("fallback"), "Unknown operation");
        assert!(!err.is_unauthorized());
    }
}
