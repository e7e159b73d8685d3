//! In-memory transport that replays canned pages and records requests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;

use super::error::ClientResult;
use super::transport::{build_url, Response, Transport};

struct Route {
    endpoint: String,
    filter: Option<(String, String)>,
    replies: VecDeque<(u16, Value)>,
}

impl Route {
    fn matches(&self, url: &Url) -> bool {
        if !url.path().ends_with(&format!("/{}", self.endpoint)) {
            return false;
        }
        match &self.filter {
            None => true,
            Some((key, expected)) => url
                .query_pairs()
                .any(|(k, v)| k == key.as_str() && v == expected.as_str()),
        }
    }
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages served in order for requests ending in `/endpoint`. Once drained
    /// the route answers with an empty array.
    pub fn route(self, endpoint: &str, pages: Vec<Value>) -> Self {
        self.push(endpoint, None, pages.into_iter().map(|p| (200, p)).collect())
    }

    /// Like [`route`](Self::route) but only for requests carrying `key=value`.
    pub fn route_where(self, endpoint: &str, key: &str, value: &str, pages: Vec<Value>) -> Self {
        self.push(
            endpoint,
            Some((key.to_string(), value.to_string())),
            pages.into_iter().map(|p| (200, p)).collect(),
        )
    }

    pub fn fail(self, endpoint: &str, status: u16) -> Self {
        self.push(endpoint, None, VecDeque::from([(status, json!({"message": "boom"}))]))
    }

    fn push(self, endpoint: &str, filter: Option<(String, String)>, replies: VecDeque<(u16, Value)>) -> Self {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(Route {
                endpoint: endpoint.to_string(),
                filter,
                replies,
            });
        }
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path ends in `/endpoint`.
    pub fn requests_to(&self, endpoint: &str) -> Vec<Url> {
        let suffix = format!("/{}", endpoint);
        self.requests()
            .into_iter()
            .filter(|u| u.path().ends_with(&suffix))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, params: Option<&Value>) -> ClientResult<Response> {
        let url = build_url(url, params)?;
        self.requests.lock().unwrap().push(url.clone());

        let mut routes = self.routes.lock().unwrap();
        let reply = routes
            .iter_mut()
            .find(|route| route.matches(&url))
            .and_then(|route| route.replies.pop_front());

        let (status, body) = reply.unwrap_or((200, json!([])));
        Ok(Response::new(status, url.as_str(), body.to_string()))
    }
}

/// A JSON array of `count` records built by `make(index)`.
pub fn page_of(count: usize, make: impl Fn(usize) -> Value) -> Value {
    Value::Array((0..count).map(make).collect())
}

/// Value of query parameter `key`, if present.
pub fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
