//! HTTP plumbing shared by every provider adapter.
//!
//! Request builders produce a [`WireRequest`], a plain description of one
//! round trip. A [`Transport`] executes it and hands back the decoded JSON
//! body. Keeping the two apart lets the builders stay pure and lets tests
//! swap the network for a stub.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::HttpConfig;
use crate::error::{Result, TranslateError};
use crate::metrics;
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WireBody {
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`; keys may repeat.
    Form(Vec<(String, String)>),
}

/// One fully described provider round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    /// Provider name, used for logging and metrics labels.
    pub provider: &'static str,
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Query parameters in send order; keys may repeat.
    pub query: Vec<(String, String)>,
    pub body: WireBody,
}

impl WireRequest {
    pub fn get(provider: &'static str, url: impl Into<String>) -> Self {
        Self::new(provider, Method::Get, url.into())
    }

    pub fn post(provider: &'static str, url: impl Into<String>) -> Self {
        Self::new(provider, Method::Post, url.into())
    }

    fn new(provider: &'static str, method: Method, url: String) -> Self {
        Self {
            provider,
            method,
            url,
            headers: Vec::new(),
            query: Vec::new(),
            body: WireBody::Empty,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = WireBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = WireBody::Form(fields);
        self
    }

    /// First value of query parameter `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value of form field `key`, if the body is a form.
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form_values(key).into_iter().next()
    }

    /// Every value of form field `key`, in order.
    pub fn form_values(&self, key: &str) -> Vec<&str> {
        match &self.body {
            WireBody::Form(fields) => fields
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Request line suitable for logs.
    fn describe(&self) -> String {
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        if query.is_empty() {
            format!("{} {}", self.method.as_str(), self.url)
        } else {
            format!("{} {}?{}", self.method.as_str(), self.url, query)
        }
    }
}

/// Executes wire requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and decode the response body as JSON.
    ///
    /// Non-success statuses become [`TranslateError::Transport`].
    async fn send(&self, request: WireRequest) -> Result<Value>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    sanitize_logs: bool,
}

impl HttpTransport {
    /// Build the shared client. No request timeout is applied.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_size)
            .user_agent(config.user_agent.clone())
            .use_rustls_tls()
            .build()?;

        debug!("Created HTTP client with pool size {}", config.pool_size);

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            sanitize_logs: true,
        }
    }

    /// Whether API keys are masked in logged request lines.
    pub fn sanitize_logs(mut self, enabled: bool) -> Self {
        self.sanitize_logs = enabled;
        self
    }

    fn log_line(&self, request: &WireRequest) -> String {
        let line = request.describe();
        if self.sanitize_logs {
            sanitize(&line)
        } else {
            line
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: WireRequest) -> Result<Value> {
        let line = self.log_line(&request);
        debug!(provider = request.provider, "{}", line);

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            WireBody::Empty => builder,
            WireBody::Json(body) => builder.json(body),
            WireBody::Form(fields) => builder.form(fields),
        };

        let started = Instant::now();
        let response = builder.send().await;
        metrics::record_provider_request(request.provider, started.elapsed().as_secs_f64());
        let response = response?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                provider = request.provider,
                "{} failed with HTTP {}", line, status
            );
            return Err(TranslateError::Transport {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            TranslateError::Provider(format!(
                "{} returned a body that is not JSON: {}",
                request.provider, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_collects_parts() {
        let request = WireRequest::post("microsoft", "https://example.test/translate")
            .header("X-ClientTraceId", "abc")
            .query_pair("api-version", "3.0")
            .query_pairs([("to", "es"), ("to", "fr")])
            .json(&json!([{"text": "Hello"}]))
            .unwrap();

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.query_value("api-version"), Some("3.0"));
        assert_eq!(request.query.len(), 3);
        assert_eq!(request.header_value("x-clienttraceid"), Some("abc"));
        assert_eq!(request.body, WireBody::Json(json!([{"text": "Hello"}])));
    }

    #[test]
    fn test_form_values_keep_order() {
        let request = WireRequest::post("deepl", "https://example.test/v2/translate").form(vec![
            ("text".to_string(), "one".to_string()),
            ("target_lang".to_string(), "de".to_string()),
            ("text".to_string(), "two".to_string()),
        ]);

        assert_eq!(request.form_values("text"), vec!["one", "two"]);
        assert_eq!(request.form_value("target_lang"), Some("de"));
        assert!(request.form_values("missing").is_empty());
    }

    #[test]
    fn test_log_line_hides_keys() {
        let transport = HttpTransport::with_client(Client::new());
        let request = WireRequest::post("google", "https://example.test/language/translate/v2")
            .query_pair("key", "secret-key");

        let line = transport.log_line(&request);
        assert!(!line.contains("secret-key"));
        assert!(line.starts_with("POST https://example.test"));
    }
}
