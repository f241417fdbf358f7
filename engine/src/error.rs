use common::JobKey;
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

/// Title every aggregated failure is presented under.
pub const ERROR_TITLE: &str = "Error!";

/// `status` is `None` when no response arrived.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{method} {path} failed: {message}")]
pub struct RequestFailure {
    pub method: Method,
    pub path: String,
    pub status: Option<u16>,
    pub payload: Value,
    pub message: String,
}

impl RequestFailure {
    pub fn from_response(method: Method, path: impl Into<String>, status: u16, payload: Value) -> Self {
        let message = match message_from_payload(&payload) {
            Some(message) => message,
            None => format!("server responded with status {}", status),
        };
        Self {
            method,
            path: path.into(),
            status: Some(status),
            payload,
            message,
        }
    }

    pub fn transport(method: Method, path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        let message = err.to_string();
        Self {
            method,
            path: path.into(),
            status: None,
            payload: Value::String(message.clone()),
            message,
        }
    }
}

fn message_from_payload(payload: &Value) -> Option<String> {
    match payload {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(map) => {
            for key in ["detail", "error", "msg"] {
                if let Some(Value::String(s)) = map.get(key) {
                    return Some(s.clone());
                }
            }
            map.iter().find_map(|(field, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Array(items) => items
                        .iter()
                        .filter_map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                    _ => return None,
                };
                if text.is_empty() {
                    None
                } else if field == "__all__" {
                    Some(text)
                } else {
                    Some(format!("{}: {}", field, text))
                }
            })
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub key: JobKey,
    pub name: String,
    pub failure: RequestFailure,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct BatchError {
    pub title: &'static str,
    pub message: String,
    pub failures: Vec<ItemFailure>,
}

impl BatchError {
    /// One line per failed item: `job:2 (job 2): DELETE /api/v2/jobs/2/ failed: ...`
    pub fn details(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|item| format!("{} ({}): {}", item.key, item.name, item.failure))
            .collect()
    }
}
