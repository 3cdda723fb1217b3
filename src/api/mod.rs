//! Client for the backend REST API.
//!
//! All endpoints answer with a `{ success, ... }` envelope. Failures surface
//! as `ApiError` whose message is taken from the body's `error` or `message`
//! field, so callers can show it to the user unchanged.

mod auth;
mod courses;
mod tasks;

#[allow(unused_imports)]
pub use auth::{
    cache_profile, cached_profile, Registration, Session, UserProfile, PROFILE_CACHE_FILE,
};
#[allow(unused_imports)]
pub use courses::{Course, CourseDraft, CourseProgress, Enrollment};
#[allow(unused_imports)]
pub use tasks::{generation_outcome, GenerateTasksRequest, GeneratedTasks};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 429; message is shown verbatim
    #[error("{0}")]
    RateLimited(String),
    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },
    /// 2xx answer with `success: false`
    #[error("{0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Blocking API client. Cheap to clone; clones share the connection pool
/// but each carries its own copy of the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent("demo-walkthrough")
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
            session: Session::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends a request and returns the decoded envelope.
    pub(crate) fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(method = method.as_str(), %url, "api request");

        let mut request = self.agent.request(method.as_str(), &url);
        if let Some(token) = &self.session.access_token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }
        if method != Method::Get {
            if let Some(csrf) = &self.session.csrf_token {
                request = request.set("X-CSRF-Token", csrf);
            }
        }

        let result = match body {
            Some(body) => request.send_json(body.clone()),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                let value: Value = response
                    .into_json()
                    .map_err(|e| ApiError::Decode(e.to_string()))?;
                check_envelope(value)
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(status_error(status, &body))
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(ApiError::Transport(transport.to_string()))
            }
        }
    }
}

/// Message from an error body's `error` or `message` field.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(_) => v.get("message").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
}

pub(crate) fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| error_message(&v))
        .unwrap_or_else(|| match status {
            429 => "Too many requests. Please try again later.".to_string(),
            _ => format!("Request failed with status {}", status),
        });
    if status == 429 {
        ApiError::RateLimited(message)
    } else {
        ApiError::Http { status, message }
    }
}

pub(crate) fn check_envelope(value: Value) -> Result<Value, ApiError> {
    match value.get("success").and_then(Value::as_bool) {
        Some(false) => Err(ApiError::Rejected(
            error_message(&value).unwrap_or_else(|| "Request was not successful".to_string()),
        )),
        _ => Ok(value),
    }
}

/// Decodes `envelope[key]` into `T`.
pub(crate) fn take_field<T: DeserializeOwned>(
    mut envelope: Value,
    key: &str,
) -> Result<T, ApiError> {
    let field = envelope
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApiError::Decode(format!("missing field '{}'", key)))?;
    serde_json::from_value(field).map_err(|e| ApiError::Decode(e.to_string()))
}
