use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};
use url::Url;

use super::error::{ClientError, ClientResult};
use crate::diagnostics::SharedDiagnostics;

const USER_AGENT: &str = concat!("repo-pulse/", env!("CARGO_PKG_VERSION"));

/// A fully read HTTP response. Status codes are left for the caller to judge.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    url: String,
    body: String,
}

impl Response {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a single GET. `params`, when given, must be a JSON object whose
    /// entries become query pairs.
    async fn get(&self, url: &str, params: Option<&Value>) -> ClientResult<Response>;
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validates the url and params and folds the params into the query string.
/// Runs before any I/O so caller mistakes never reach the network.
pub fn build_url(url: &str, params: Option<&Value>) -> ClientResult<Url> {
    let pairs = match params {
        None => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => return Err(ClientError::InvalidParams(json_kind(other))),
    };

    let mut parsed = Url::parse(url).map_err(|e| ClientError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if let Some(map) = pairs {
        let mut query = parsed.query_pairs_mut();
        for (key, value) in map {
            match value {
                Value::Null => continue,
                Value::String(s) => query.append_pair(key, s),
                other => query.append_pair(key, &other.to_string()),
            };
        }
    }

    Ok(parsed)
}

/// reqwest-backed transport for the GitHub REST API.
pub struct HttpTransport {
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        token: Option<String>,
        timeout: Duration,
        diagnostics: &SharedDiagnostics,
    ) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let token = token.filter(|t| !t.is_empty());
        match &token {
            Some(t) => diagnostics.info(&format!("token: {}", mask_token(t))),
            None => diagnostics.warn("no API token configured, requests are subject to stricter rate limits"),
        }

        Ok(Self { client, token })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, params: Option<&Value>) -> ClientResult<Response> {
        let url = build_url(url, params)?;

        let mut request = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(Response::new(status, url.as_str(), body))
    }
}

/// Logs every request with its status and wall-clock duration.
pub struct InstrumentedTransport<T> {
    inner: T,
    diagnostics: SharedDiagnostics,
}

impl<T: Transport> InstrumentedTransport<T> {
    pub fn new(inner: T, diagnostics: SharedDiagnostics) -> Self {
        Self { inner, diagnostics }
    }
}

#[async_trait]
impl<T: Transport> Transport for InstrumentedTransport<T> {
    async fn get(&self, url: &str, params: Option<&Value>) -> ClientResult<Response> {
        let started = Instant::now();
        self.diagnostics.info(&format!("GET {}", url));

        let result = self.inner.get(url, params).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(response) => self.diagnostics.info(&format!(
                "status {} for {} in {:.3}s",
                response.status(),
                response.url(),
                elapsed
            )),
            Err(err) => self
                .diagnostics
                .warn(&format!("GET {} failed after {:.3}s: {}", url, elapsed, err)),
        }

        result
    }
}

/// Keeps the first six characters of a token and stars out the rest.
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(6).collect();
    let hidden = token.chars().count().saturating_sub(6);
    format!("{}{}", visible, "*".repeat(hidden))
}
