use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::api::envelope::server_message;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single call against the admin API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::Post, path: path.into(), query: Vec::new(), body: Some(body) }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::Put, path: path.into(), query: Vec::new(), body: Some(body) }
    }

    pub fn patch(path: impl Into<String>, body: Option<Value>) -> Self {
        Self { method: Method::Patch, path: path.into(), query: Vec::new(), body }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self { method: Method::Delete, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Sends requests and hands back the decoded JSON body.
///
/// Non-2xx responses become [`ApiError::Status`] carrying the backend's
/// `message` field when there is one.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

pub type SharedTransport = Arc<dyn Transport>;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, token: Option<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = if base_url.ends_with('/') { base_url.to_string() } else { format!("{}/", base_url) };
        let base_url = Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url, token })
    }

    /// Resolves `path` under the base URL. Paths that would climb out of
    /// their own segments (`..`, `.`) are refused.
    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        let relative = path.trim_start_matches('/');
        let url = self.base_url.join(relative).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))?;
        if url.path() != format!("{}{}", self.base_url.path(), relative) {
            return Err(ApiError::InvalidUrl(format!("{}: resolves to {}", path, url.path())));
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = ?request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url_for(&request.path)?;

        debug!("Sending request");
        let mut builder = self.client.request(request.method.into(), url).query(&request.query);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes).ok().and_then(|v| server_message(&v));
            warn!(status = status.as_u16(), message = ?message, "Request rejected");
            return Err(ApiError::Status { status: status.as_u16(), message });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let r = ApiRequest::get("admin/orders").with_query(vec![("page".into(), "2".into())]);
        assert_eq!(r.method, Method::Get);
        assert_eq!(r.query_value("page"), Some("2"));
        assert_eq!(r.query_value("status"), None);

        let r = ApiRequest::post("admin/zones", json!({"zoneName": "North"}));
        assert_eq!(r.body, Some(json!({"zoneName": "North"})));
    }

    #[test]
    fn test_http_transport_rejects_bad_base_url() {
        assert!(matches!(HttpTransport::new("not a url", None, None), Err(ApiError::InvalidUrl(_))));
        assert!(HttpTransport::new("https://api.example.com/api/v1", None, None).is_ok());
    }

    #[test]
    fn test_paths_cannot_escape_their_resource() {
        use crate::api::endpoints;

        let transport = HttpTransport::new("https://api.example.com/api", None, None).unwrap();

        let url = transport.url_for(&endpoints::zone("z1/../../users/u1")).unwrap();
        assert_eq!(url.path(), "/api/admin/zones/z1%2F..%2F..%2Fusers%2Fu1");
        assert_eq!(transport.url_for(endpoints::ORDERS).unwrap().as_str(), "https://api.example.com/api/admin/orders");

        assert!(matches!(transport.url_for(&endpoints::zone("..")), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(transport.url_for(&endpoints::user_ban(".")), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(transport.url_for("admin/zones/../users/u1"), Err(ApiError::InvalidUrl(_))));
    }
}
