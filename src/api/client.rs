//! HTTP client for the Tumbuh backend API.
//!
//! All entity stores go through `ApiClient` for their authenticated
//! JSON requests. The client receives the base URL and a token provider
//! at construction; nothing here reads ambient configuration.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::TokenProvider;

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// API client for the Tumbuh backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Create a new API client against `base_url` (without the `/api` suffix),
    /// pulling the bearer token from `tokens` on every request.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.tokens.token() {
            match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(_) => {
                    warn!("bearer token contains invalid header characters, sending unauthenticated");
                }
            }
        }
        headers
    }

    /// Send the request, retrying on 429 with exponential backoff, and
    /// return the response body on success.
    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<String, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let attempt = request
                .try_clone()
                .ok_or_else(|| ApiError::Decode(format!("unrepeatable request body for {}", url)))?;

            let response = attempt.send().await?;
            let status = response.status();

            if status.as_u16() == 429 {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    return Err(ApiError::RateLimited);
                }
                warn!(url, retry = retries, backoff_ms, "rate limited, backing off");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2;
                continue;
            }

            let text = response.text().await?;
            if status.is_success() {
                debug!(url, status = status.as_u16(), "request completed");
                return Ok(text);
            }
            return Err(ApiError::from_status(status, &text));
        }
    }

    fn decode<T: DeserializeOwned>(text: &str, url: &str) -> Result<T, ApiError> {
        serde_json::from_str(text)
            .map_err(|err| ApiError::Decode(format!("failed to parse response from {}: {}", url, err)))
    }

    /// Authenticated GET, decoding the JSON response body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let request = self.client.get(&url).headers(self.auth_headers());
        let text = self.execute(request, &url).await?;
        Self::decode(&text, &url)
    }

    /// Authenticated POST with a JSON body, decoding the JSON response.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let request = self
            .client
            .post(&url)
            .headers(self.auth_headers())
            .json(body);
        let text = self.execute(request, &url).await?;
        Self::decode(&text, &url)
    }

    /// Authenticated full-update PUT. The response body is not decoded;
    /// callers refetch the collection for post-write state.
    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.url(path);
        let request = self
            .client
            .put(&url)
            .headers(self.auth_headers())
            .json(body);
        self.execute(request, &url).await?;
        Ok(())
    }

    /// Authenticated DELETE. The response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        let request = self.client.delete(&url).headers(self.auth_headers());
        self.execute(request, &url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use crate::testutil::MockApi;
    use serde::Deserialize;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(StaticToken::new("tok-123"))).expect("client")
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        ok: bool,
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let api = client("http://localhost:8080/");
        assert_eq!(api.url("children"), "http://localhost:8080/api/children");
        assert_eq!(
            api.url("/children/abc/measurements"),
            "http://localhost:8080/api/children/abc/measurements"
        );
    }

    #[tokio::test]
    async fn test_get_decodes_json_and_sends_bearer_token() {
        let server = MockApi::serve(vec![(200, r#"{"ok": true}"#.to_string())]);
        let api = client(&server.base_url());

        let ping: Ping = api.get("ping").await.expect("get");
        assert_eq!(ping, Ping { ok: true });

        let request = server.into_requests().remove(0);
        assert!(request.contains("GET /api/ping"));
        assert!(request.contains("authorization: Bearer tok-123") || request.contains("Authorization: Bearer tok-123"));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error() {
        let server = MockApi::serve(vec![(404, r#"{"error": "child not found"}"#.to_string())]);
        let api = client(&server.base_url());

        let err = api.get::<Ping>("children/missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.user_message("fallback"), "child not found");
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let server = MockApi::serve(vec![(200, "not json".to_string())]);
        let api = client(&server.base_url());

        let err = api.get::<Ping>("ping").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
