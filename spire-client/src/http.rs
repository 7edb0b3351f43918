// spire-client/src/http.rs
// HTTP transport

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{SpireError, SpireResult};

/// Error body format returned by the API
#[derive(serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(alias = "error")]
    pub message: String,
}

/// HTTP transport used by resources
///
/// Bodies are plain JSON; decoding into typed resources happens one level up.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> SpireResult<Value>;
    async fn post(&self, path: &str, body: &Value) -> SpireResult<Value>;
    async fn put(&self, path: &str, body: &Value) -> SpireResult<Value>;
    async fn delete(&self, path: &str) -> SpireResult<Value>;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> SpireResult<Self> {
        let base_url = config.base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(SpireError::Config("base URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> SpireResult<reqwest::Response> {
        Ok(self.authorize(req).send().await?)
    }

    async fn handle_response(response: reqwest::Response) -> SpireResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            return Err(match status {
                StatusCode::NOT_FOUND => SpireError::NotFound(message),
                _ => SpireError::api(Some(status.as_u16()), message),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Follow a `Location` header returned by a create
    async fn fetch_location(&self, location: &str) -> SpireResult<Value> {
        let base = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| SpireError::Config(format!("invalid base URL: {}", e)))?;
        let url = base
            .join(location)
            .map_err(|e| SpireError::InvalidResponse(format!("invalid Location header: {}", e)))?;

        tracing::debug!(%url, "Following Location of created record");
        let response = self.send(self.client.get(url)).await?;
        Self::handle_response(response).await
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> SpireResult<Value> {
        tracing::debug!(method = "GET", path, "Sending request");
        let mut req = self.client.get(self.url(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        let response = self.send(req).await?;
        Self::handle_response(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> SpireResult<Value> {
        tracing::debug!(method = "POST", path, "Sending request");
        let response = self.send(self.client.post(self.url(path)).json(body)).await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        match (Self::handle_response(response).await?, location) {
            (Value::Null, Some(location)) => self.fetch_location(&location).await,
            (value, _) => Ok(value),
        }
    }

    async fn put(&self, path: &str, body: &Value) -> SpireResult<Value> {
        tracing::debug!(method = "PUT", path, "Sending request");
        let response = self.send(self.client.put(self.url(path)).json(body)).await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, path: &str) -> SpireResult<Value> {
        tracing::debug!(method = "DELETE", path, "Sending request");
        let response = self.send(self.client.delete(self.url(path))).await?;
        Self::handle_response(response).await
    }
}

/// Join base URL and path with exactly one `/`
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Best human-readable message for a failed response
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(body) {
        return api_err.message;
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
