//! The outbound gateway to the StaffDesk backend.
//!
//! Every request goes through the same pipeline:
//!
//! ```text
//! unsent ──► token check ──► [expired: clear + redirect + event] ──► sent ──► resolved
//!                                    │                                  └───► rejected
//!                                    └── policy Abort ──► SessionExpired
//! ```
//!
//! There is no retry transition.

use reqwest::header::{HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_bus::{EventPublisher, StoreEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ClientConfig, ConfigError, ExpiredTokenPolicy};
use crate::error::{extract_server_message, ApiError};
use crate::ports::{LogRedirect, LoginRedirect, SystemTimeSource, TimeSource};
use crate::storage::{KeyValueStore, TOKEN_KEY};
use crate::token::{self, Claims};

const JSON: &str = "application/json";

/// HTTP client for the StaffDesk backend.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    accept_language: HeaderValue,
    policy: ExpiredTokenPolicy,
    storage: Arc<dyn KeyValueStore>,
    redirect: Arc<dyn LoginRedirect>,
    clock: Arc<dyn TimeSource>,
    events: Option<Arc<dyn EventPublisher>>,
    request_id: AtomicU64,
}

impl ApiClient {
    /// Create a client that reads its token from `storage`.
    pub fn new(config: &ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        config.validate()?;
        let base_url = config.parsed_base_url()?;
        let accept_language = HeaderValue::from_str(config.accept_language.trim())
            .map_err(|e| ConfigError::Invalid(format!("accept_language: {e}")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url,
            accept_language,
            policy: config.expired_token_policy,
            storage,
            redirect: Arc::new(LogRedirect),
            clock: Arc::new(SystemTimeSource),
            events: None,
            request_id: AtomicU64::new(1),
        })
    }

    /// Use `redirect` when an expired token is found.
    #[must_use]
    pub fn with_redirect(mut self, redirect: Arc<dyn LoginRedirect>) -> Self {
        self.redirect = redirect;
        self
    }

    /// Publish `SessionExpired` on `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn expired_token_policy(&self) -> ExpiredTokenPolicy {
        self.policy
    }

    /// The key/value store the token lives in.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    /// Persist a freshly issued token.
    pub fn store_token(&self, token: &str) -> Result<(), ApiError> {
        self.storage.set(TOKEN_KEY, token)?;
        Ok(())
    }

    /// Forget the persisted token.
    pub fn clear_token(&self) -> Result<(), ApiError> {
        self.storage.remove(TOKEN_KEY)?;
        Ok(())
    }

    /// Claims of the persisted token, if it is present and readable.
    pub fn current_claims(&self) -> Result<Option<Claims>, ApiError> {
        let Some(token) = self.storage.get(TOKEN_KEY)? else {
            return Ok(None);
        };
        Ok(token::decode_claims(&token).ok())
    }

    /// Token to send with a request, after the expiry check.
    async fn authorize(&self, path: &str) -> Result<Option<String>, ApiError> {
        let Some(token) = self.storage.get(TOKEN_KEY)? else {
            return Ok(None);
        };

        if !token::is_expired(&token, self.clock.now_unix()) {
            return Ok(Some(token));
        }

        self.storage.remove(TOKEN_KEY)?;
        self.redirect.redirect_to_login(path);
        if let Some(events) = &self.events {
            events
                .publish(StoreEvent::SessionExpired {
                    path: path.to_string(),
                })
                .await;
        }

        match self.policy {
            ExpiredTokenPolicy::Abort => {
                warn!(path = %path, "Expired token cleared, request aborted");
                Err(ApiError::SessionExpired)
            }
            ExpiredTokenPolicy::SendUnauthenticated => {
                warn!(path = %path, "Expired token cleared, sending unauthenticated");
                Ok(None)
            }
        }
    }

    // =========================================================================
    // TRANSPORT
    // =========================================================================

    fn url_for(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                if segment.is_empty() {
                    return Err(ApiError::InvalidUrl(format!(
                        "empty path segment in /{}",
                        segments.join("/")
                    )));
                }
                path.push(segment);
            }
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Issue one request and return the body of a 2xx response.
    async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<(String, Vec<u8>), ApiError> {
        let path = format!("/{}", segments.join("/"));
        let url = self.url_for(segments, query)?;
        let token = self.authorize(&path).await?;
        let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT_LANGUAGE, self.accept_language.clone())
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON);
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        debug!(
            request_id,
            method = %method,
            path = %path,
            authenticated = token.is_some(),
            "Sending request"
        );

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = extract_server_message(&bytes);
            debug!(
                request_id,
                path = %path,
                status = status.as_u16(),
                message = message.as_deref().unwrap_or(""),
                "Request rejected"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!(request_id, path = %path, status = status.as_u16(), bytes = bytes.len(), "Request resolved");
        Ok((path, bytes.to_vec()))
    }

    async fn send<R: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<R, ApiError> {
        let (path, bytes) = self.execute(method, segments, query, body).await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            path,
            reason: e.to_string(),
        })
    }

    fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
        serde_json::to_value(body).map_err(|e| ApiError::Decode {
            path: "<request body>".to_string(),
            reason: e.to_string(),
        })
    }

    /// `GET` a JSON resource.
    pub async fn get<R: DeserializeOwned>(&self, segments: &[&str]) -> Result<R, ApiError> {
        self.send(Method::GET, segments, &[], None).await
    }

    /// `GET` with query parameters.
    pub async fn get_with_query<R: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<R, ApiError> {
        self.send(Method::GET, segments, query, None).await
    }

    /// `POST` a JSON body.
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<R, ApiError> {
        let body = Self::to_body(body)?;
        self.send(Method::POST, segments, &[], Some(body)).await
    }

    /// `PATCH` a JSON body, or nothing for action endpoints.
    pub async fn patch<B: Serialize, R: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<R, ApiError> {
        let body = body.map(Self::to_body).transpose()?;
        self.send(Method::PATCH, segments, &[], body).await
    }

    /// `DELETE` a resource. Whatever the server answers with is ignored.
    pub async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        self.execute(Method::DELETE, segments, &[], None).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
