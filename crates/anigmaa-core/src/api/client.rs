//! API client for communicating with the Anigmaa REST API.
//!
//! `ApiClient` attaches the stored bearer token to every request and, when
//! the server answers 401, exchanges the refresh token once and re-sends the
//! request with the new access token.

use std::sync::Arc;

use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::request::{ApiRequest, Attempt};
use super::ApiError;
use crate::auth::{SessionManager, SessionStore};
use crate::config::ClientConfig;
use crate::models::auth::RefreshRequest;
use crate::models::AuthResponse;

const USER_AGENT: &str = concat!("anigmaa-client/", env!("CARGO_PKG_VERSION"));

/// Path of the refresh exchange, relative to the base URL
const REFRESH_PATH: &str = "/auth/refresh";

/// API client for Anigmaa.
/// Clone is cheap - reqwest::Client and the session manager are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl ApiClient {
    /// Create a new API client around an existing session manager
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Create a client that owns a fresh session manager over `store`
    pub fn with_store(
        config: &ClientConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        Self::new(config, Arc::new(SessionManager::new(store)))
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Run a request through the pipeline and decode the response body
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        decode_body(&body)
    }

    /// Run a request through the pipeline, discarding the response body
    pub async fn execute_unit(&self, request: &ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(&ApiRequest::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(&ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(&ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(&ApiRequest::delete(path)).await
    }

    /// Dispatch with the stored token; on the first 401, refresh and
    /// dispatch once more. Returns the raw body of the final response.
    async fn send(&self, request: &ApiRequest) -> Result<String, ApiError> {
        let mut snapshot = self.session.snapshot().await?;
        let mut attempt = Attempt::First;

        loop {
            match self
                .dispatch(request, snapshot.access_token.as_deref(), attempt)
                .await
            {
                Err(ApiError::Unauthorized(body)) if !attempt.is_retry() => {
                    warn!(path = request.path(), "Access token rejected, attempting refresh");
                    let refreshed = self
                        .session
                        .refresh_after(snapshot.epoch, move |refresh_token| async move {
                            self.exchange_refresh_token(&refresh_token).await
                        })
                        .await?;

                    match refreshed {
                        Some(next) => {
                            snapshot = next;
                            attempt = Attempt::Retry;
                        }
                        None => {
                            debug!("No refresh token stored, propagating 401");
                            return Err(ApiError::Unauthorized(body));
                        }
                    }
                }
                result => return result,
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        attempt: Attempt,
    ) -> Result<String, ApiError> {
        let url = self.url(request.path());
        debug!(method = %request.method(), url = %url, ?attempt, "Dispatching request");

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .header(header::ACCEPT, "application/json");

        if !request.query_params().is_empty() {
            builder = builder.query(request.query_params());
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        Self::check_response(response).await
    }

    /// Exchange a refresh token for a new access token. Sent without a
    /// bearer header and outside the retry pipeline.
    pub(crate) async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<AuthResponse, ApiError> {
        let url = self.url(REFRESH_PATH);
        debug!(url = %url, "Exchanging refresh token");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let body = Self::check_response(response).await?;
        decode_body(&body)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            debug!(status = status.as_u16(), "Request failed");
            Err(ApiError::from_status(status, &body))
        }
    }
}

/// Decode a response body, unwrapping the backend's success envelope.
/// An empty body decodes as JSON `null`.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body)?
    };
    serde_json::from_value(unwrap_envelope(value)).map_err(|e| {
        ApiError::InvalidResponse(format!(
            "{}: {}",
            e,
            ApiError::truncate_body(body.trim())
        ))
    })
}

/// `{success, data}` becomes `data`; `{success, data, pagination}` becomes
/// `{data, page, limit, total, total_pages}`. Other bodies pass through.
fn unwrap_envelope(value: Value) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };
    if !map.get("success").is_some_and(Value::is_boolean) {
        return Value::Object(map);
    }

    let data = map.remove("data").unwrap_or(Value::Null);
    match map.remove("pagination") {
        Some(Value::Object(pagination)) => {
            let mut page = Map::new();
            page.insert("data".to_string(), data);
            page.extend(pagination);
            Value::Object(page)
        }
        _ => data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Paginated;
    use serde_json::json;

    #[test]
    fn test_unwrap_plain_body_passes_through() {
        let body = json!({"id": "e1", "title": "Board games"});
        assert_eq!(unwrap_envelope(body.clone()), body);
    }

    #[test]
    fn test_unwrap_success_envelope() {
        let body = json!({"success": true, "message": "ok", "data": {"id": "e1"}});
        assert_eq!(unwrap_envelope(body), json!({"id": "e1"}));
    }

    #[test]
    fn test_unwrap_paginated_envelope() {
        let body = json!({
            "success": true,
            "data": [1, 2, 3],
            "pagination": {"page": 2, "limit": 3, "total": 9, "total_pages": 3}
        });
        let page: Paginated<u32> = serde_json::from_value(unwrap_envelope(body)).unwrap();
        assert_eq!(page.data, vec![1, 2, 3]);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_envelope_without_data_is_null() {
        let body = json!({"success": true, "message": "Logged out"});
        assert_eq!(unwrap_envelope(body), Value::Null);
    }

    #[test]
    fn test_decode_empty_body() {
        let value: Option<u32> = decode_body("").unwrap();
        assert_eq!(value, None);
        let unit: () = decode_body("  ").unwrap();
        assert_eq!(unit, ());
    }

    #[test]
    fn test_decode_mismatch_is_invalid_response() {
        let err = decode_body::<Vec<u32>>(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::with_store(
            &ClientConfig::new("http://localhost:8081/api/v1/"),
            Arc::new(crate::auth::MemorySessionStore::new()),
        )
        .unwrap();
        assert_eq!(client.url("/events"), "http://localhost:8081/api/v1/events");
        assert_eq!(client.url("users/me"), "http://localhost:8081/api/v1/users/me");
    }
}
