use serde_json::Value;
use thiserror::Error;

use crate::auth::SigningError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - check your Grid API key")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    /// The API answered, but reported the request as failed
    #[error("Request failed: {0}")]
    Remote(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Signing failed: {0}")]
    Signing(#[from] SigningError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Pull a human-readable message out of an error body, if it is JSON
    /// and carries one.
    pub fn message_from_body(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        Self::message_from_value(&value)
    }

    pub(crate) fn message_from_value(value: &Value) -> Option<String> {
        for key in ["error", "message", "details"] {
            match value.get(key) {
                Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
                Some(nested @ Value::Object(_)) => {
                    if let Some(msg) = Self::message_from_value(nested) {
                        return Some(msg);
                    }
                }
                _ => {}
            }
        }
        None
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = Self::message_from_body(body).unwrap_or_else(|| Self::truncate_body(body));
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            409 => ApiError::Conflict(detail),
            429 => ApiError::RateLimited,
            400 | 422 => ApiError::Remote(detail),
            500..=599 => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            ApiError::AccessDenied(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::ServerError(m)
            | ApiError::Remote(m)
            | ApiError::InvalidResponse(m) => Some(m),
            _ => None,
        }
    }

    fn detail_mentions(&self, needle: &str) -> bool {
        self.detail()
            .map(|m| m.to_lowercase().contains(needle))
            .unwrap_or(false)
    }

    /// The account or user the request referred to does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
            || self.detail_mentions("not found")
            || self.detail_mentions("does not exist")
    }

    /// The account the request tried to create already exists
    pub fn is_already_exists(&self) -> bool {
        matches!(self, ApiError::Conflict(_)) || self.detail_mentions("already exists")
    }
}
