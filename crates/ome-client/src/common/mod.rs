//! Common utilities for the OME API client
//!
//! Provides the authenticated HTTP wrapper shared by every service module:
//! token header, retries on transport failure, status mapping and pagination.

pub mod odata;
pub mod retry;

use crate::error::OmeError;
use odata::ODataCollection;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use retry::RetryPolicy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Header carrying the OME session token
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// HTTP client wrapper with session authentication
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client wrapper without a session token
    pub fn new(client: Client, base_url: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            retry,
        }
    }

    /// Attach the session token every subsequent request carries
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match &self.token {
            Some(token) => builder.header(AUTH_TOKEN_HEADER, token),
            None => builder,
        }
    }

    /// Send a request, retrying transport failures according to the retry policy
    ///
    /// `build` is invoked once per attempt because a `RequestBuilder` is consumed by `send`.
    pub async fn send<F>(&self, build: F) -> Result<Response, OmeError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut delays = self.retry.delays();
        let mut attempt = 1;
        loop {
            let request = self.authorize(build(&self.client));
            match request.send().await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.retry.max_attempts && (e.is_connect() || e.is_timeout()) => {
                    let delay = delays.next_delay();
                    warn!(
                        "Transport error on attempt {}/{}: {}, retrying in {:?}",
                        attempt, self.retry.max_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(OmeError::Transport(e.to_string())),
            }
        }
    }

    /// Map a non-success status to the matching error, passing OME's message through
    pub async fn check(response: Response, path: &str) -> Result<Response, OmeError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);
        debug!("{} returned {}: {}", path, status, body);
        Err(match status {
            StatusCode::NOT_FOUND => OmeError::NotFound(format!("{} - {}", path, message)),
            StatusCode::UNAUTHORIZED => OmeError::Unauthorized(message),
            StatusCode::CONFLICT => OmeError::Conflict(message),
            other => OmeError::Api {
                status: other.as_u16(),
                message,
            },
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, OmeError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| OmeError::Api {
            status: 200,
            message: format!(
                "error decoding response body from {}: {} - Response (first 500 chars): {}",
                path,
                e,
                text.chars().take(500).collect::<String>()
            ),
        })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, OmeError> {
        let url = self.build_url(path);
        debug!("GET {}", url);
        let response = self.send(|c| c.get(&url)).await?;
        let response = Self::check(response, path).await?;
        Self::decode(response, path).await
    }

    /// Fetch every page of a collection, following `@odata.nextLink`
    pub async fn get_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, OmeError> {
        self.get_collection_limited(path, None).await
    }

    /// Fetch pages of a collection until exhausted or `page_limit` pages were read
    pub async fn get_collection_limited<T: DeserializeOwned>(
        &self,
        path: &str,
        page_limit: Option<usize>,
    ) -> Result<Vec<T>, OmeError> {
        let mut all_results = Vec::new();
        let mut next = Some(path.to_string());
        let mut pages = 0;

        while let Some(current) = next.take() {
            if page_limit.is_some_and(|limit| pages >= limit) {
                debug!("Page limit reached after {} pages of {}", pages, path);
                break;
            }
            let page: ODataCollection<T> = self.get(&current).await?;
            pages += 1;
            all_results.extend(page.value);
            next = page.next_link;
        }

        Ok(all_results)
    }

    /// Make a POST request with a JSON body and decode the JSON response
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, OmeError> {
        let response = self.post_response(path, body).await?;
        Self::decode(response, path).await
    }

    /// Make a POST request whose response body is ignored
    pub async fn post_no_content<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), OmeError> {
        self.post_response(path, body).await.map(|_| ())
    }

    /// Make a POST request and return the raw response after status checking
    pub async fn post_response<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, OmeError> {
        let url = self.build_url(path);
        let payload = serde_json::to_value(body)?;
        debug!("POST {}", url);
        let response = self
            .send(|c| c.post(&url).header("Content-Type", "application/json").json(&payload))
            .await?;
        Self::check(response, path).await
    }

    /// Make a POST request with a raw body (certificate uploads)
    pub async fn post_bytes(&self, path: &str, body: Vec<u8>, content_type: &str) -> Result<(), OmeError> {
        let url = self.build_url(path);
        debug!("POST {} ({} bytes, {})", url, body.len(), content_type);
        let response = self
            .send(|c| c.post(&url).header("Content-Type", content_type).body(body.clone()))
            .await?;
        Self::check(response, path).await.map(|_| ())
    }

    /// Make a PUT request with a JSON body and decode the JSON response
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, OmeError> {
        let response = self.put_response(path, body).await?;
        Self::decode(response, path).await
    }

    /// Make a PUT request whose response body is ignored
    pub async fn put_no_content<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), OmeError> {
        self.put_response(path, body).await.map(|_| ())
    }

    async fn put_response<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, OmeError> {
        let url = self.build_url(path);
        let payload = serde_json::to_value(body)?;
        debug!("PUT {}", url);
        let response = self
            .send(|c| c.put(&url).header("Content-Type", "application/json").json(&payload))
            .await?;
        Self::check(response, path).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), OmeError> {
        let url = self.build_url(path);
        debug!("DELETE {}", url);
        let response = self.send(|c| c.delete(&url)).await?;
        Self::check(response, path).await.map(|_| ())
    }
}

/// Pull the human-readable message out of an OME error body
///
/// OME reports failures as
/// `{"error": {"message": "...", "@Message.ExtendedInfo": [{"Message": "..."}]}}`.
/// The first extended message wins; the generic message is the fallback; a body that
/// is not JSON is returned as-is.
pub fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    let error = &value["error"];
    if let Some(message) = error["@Message.ExtendedInfo"]
        .as_array()
        .and_then(|infos| infos.iter().find_map(|i| i["Message"].as_str()))
    {
        return message.to_string();
    }
    if let Some(message) = error["message"].as_str() {
        return message.to_string();
    }
    body.to_string()
}
