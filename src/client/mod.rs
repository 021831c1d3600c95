//! HTTP client facade for the yam backend.
//!
//! All traffic funnels through [`YamClient::send`]: GET requests pass their
//! data as query parameters, everything else sends a JSON body, and the
//! bearer token is read at call time so a token change takes effect on the
//! next request without rebuilding the client. Typed wrappers for each
//! resource live in the submodules.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config;
use crate::error::ApiError;

pub mod business_sales;
pub mod businesses;
pub mod products;
pub mod sales;
pub mod users;

pub struct YamClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl YamClient {
    /// Build a client against the configured backend.
    pub fn new() -> Result<Self, ApiError> {
        let cfg = config::config();
        Self::with_base_url(&cfg.api.base_url, cfg.api.request_timeout_secs)
    }

    pub fn with_base_url(base_url: &str, request_timeout_secs: u64) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)?;

        let mut builder = reqwest::Client::builder();
        if request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(request_timeout_secs));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Install (or clear) the bearer credential used by subsequent calls.
    pub fn set_token(&self, token: Option<&str>) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = token.map(str::to_string);
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Send one request and hand back the parsed response body.
    ///
    /// Non-2xx responses become [`ApiError::Api`] with the backend's
    /// `{"error": {"message": ...}}` payload normalized into a message list.
    pub(crate) async fn send(
        &self,
        method: Method,
        endpoint: &str,
        data: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut request = self.http.request(method.clone(), &url);

        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }

        match data {
            Some(data) if method == Method::GET => request = request.query(data),
            Some(data) => request = request.json(data),
            None => {}
        }

        tracing::debug!("{} {}", method, url);
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let messages = error_messages(&text, status.as_u16());
            tracing::debug!("{} {} failed ({}): {:?}", method, url, status, messages);
            return Err(ApiError::api(status.as_u16(), messages));
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| ApiError::UnexpectedResponse(err.to_string()))
    }
}

/// Pull the named field out of a response body and deserialize it.
pub(crate) fn extract<T: DeserializeOwned>(mut body: Value, field: &str) -> Result<T, ApiError> {
    let value = body
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| ApiError::UnexpectedResponse(format!("missing `{}` in response", field)))?;
    serde_json::from_value(value).map_err(|err| ApiError::UnexpectedResponse(err.to_string()))
}

/// Normalize an error body into a list of messages.
///
/// The backend sends `{"error": {"message": string | [string]}}`; a scalar
/// message becomes a one-element list and anything else falls back to a
/// generic status line.
fn error_messages(body: &str, status: u16) -> Vec<String> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| e.get("message"));

    match message {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect();
            if messages.is_empty() {
                vec![format!("request failed with status {}", status)]
            } else {
                messages
            }
        }
        _ => vec![format!("request failed with status {}", status)],
    }
}
