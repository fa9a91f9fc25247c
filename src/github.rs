use crate::error::FetchError;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";
pub const API_BASE_URL: &str = "https://api.github.com";
const API_TIMEOUT: Duration = Duration::from_secs(10);
const AGENT: &str = concat!("statcard/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct GraphQlError {
    message: Option<String>,
}

/// `image/<subtype>` from a `Content-Type` value, parameters dropped.
/// Anything else, including subtypes with markup characters, is `image/png`.
fn image_mime(content_type: Option<&str>) -> String {
    content_type
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| match v.strip_prefix("image/") {
            Some(sub) => {
                !sub.is_empty()
                    && sub
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
            }
            None => false,
        })
        .unwrap_or("image/png")
        .to_string()
}

#[derive(Clone)]
pub struct GithubClient {
    token: Arc<String>,
    http: Arc<Client>,
    graphql_url: Arc<String>,
    rest_base: Arc<String>,
}

impl GithubClient {
    /// Client against the public GitHub API.
    pub fn new(token: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_endpoints(token, GRAPHQL_ENDPOINT, API_BASE_URL)
    }

    /// Client against custom endpoints (GitHub Enterprise, test servers).
    pub fn with_endpoints(
        token: impl Into<String>,
        graphql_url: &str,
        rest_base: &str,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(API_TIMEOUT)
            .user_agent(AGENT)
            .build()?;
        Ok(Self {
            token: Arc::new(token.into()),
            http: Arc::new(http),
            graphql_url: Arc::new(graphql_url.to_string()),
            rest_base: Arc::new(rest_base.trim_end_matches('/').to_string()),
        })
    }

    /// `path` joined onto the REST base URL.
    pub fn rest_url(&self, path: &str) -> String {
        format!("{}/{}", self.rest_base, path.trim_start_matches('/'))
    }

    /// GraphQL request. Non-2xx statuses and `errors` payloads are failures.
    pub async fn graphql(&self, query: &str, variables: Value) -> Result<Value, FetchError> {
        tracing::debug!(url = %self.graphql_url, "graphql request");

        let resp = self
            .http
            .post(self.graphql_url.as_str())
            .bearer_auth(&*self.token)
            .header(CONTENT_TYPE, "application/json")
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.graphql_url.to_string(),
            });
        }

        let json: Value = resp.json().await?;

        // If GraphQL returned an `errors` field, treat it as an error.
        if let Some(errors) = json.get("errors").and_then(Value::as_array) {
            let message = errors
                .first()
                .and_then(|e| serde_json::from_value::<GraphQlError>(e.clone()).ok())
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown GraphQL error".to_string());
            return Err(FetchError::GraphQl { message });
        }

        Ok(json)
    }

    /// REST GET with extra headers on top of auth and content type.
    pub async fn rest_get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Value, FetchError> {
        tracing::debug!(url, "rest request");

        let mut extra = HeaderMap::new();
        for (name, value) in headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    extra.insert(name, value);
                }
                _ => tracing::warn!("skipping invalid header {name:?}"),
            }
        }

        let resp = self
            .http
            .get(url)
            .bearer_auth(&*self.token)
            .header(CONTENT_TYPE, "application/json")
            .headers(extra)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(resp.json().await?)
    }

    /// Raw image bytes and their MIME type.
    pub async fn fetch_image(&self, url: &str) -> Result<(String, Vec<u8>), FetchError> {
        tracing::debug!(url, "image request");

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "image/*")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let mime = image_mime(resp.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()));
        let bytes = resp.bytes().await?;

        Ok((mime, bytes.to_vec()))
    }
}
