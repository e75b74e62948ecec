use serde::Deserialize;
use thiserror::Error;

/// Structured error body the backend attaches to failed responses.
/// Either field may be absent; both absent means the body was not JSON
/// or carried neither key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Maximum length for error response bodies kept in error values
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unauthorized - token missing or rejected")]
    Unauthorized(ErrorBody),

    #[error("access denied")]
    AccessDenied(ErrorBody),

    #[error("resource not found")]
    NotFound(ErrorBody),

    #[error("rate limited - please wait before retrying")]
    RateLimited,

    #[error("request rejected (status {status})")]
    Rejected { status: u16, body: ErrorBody },

    #[error("server error (status {status})")]
    Server { status: u16, body: ErrorBody },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Parse a failed response into the matching variant, keeping whatever
    /// structured `{error, message}` fields the body carries.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed = parse_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(parsed),
            403 => ApiError::AccessDenied(parsed),
            404 => ApiError::NotFound(parsed),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::Server {
                status: status.as_u16(),
                body: parsed,
            },
            _ => ApiError::Rejected {
                status: status.as_u16(),
                body: parsed,
            },
        }
    }

    /// "Resource absent" is a valid empty result for singleton reads.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Normalize into one human-readable message. Priority: the server's
    /// `error` field, then its `message` field, then the transport error
    /// text, then the caller's fixed fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(body) = self.body() {
            if let Some(error) = body.error.as_deref().filter(|s| !s.is_empty()) {
                return error.to_string();
            }
            if let Some(message) = body.message.as_deref().filter(|s| !s.is_empty()) {
                return message.to_string();
            }
        }
        if let ApiError::Network(err) = self {
            return err.to_string();
        }
        fallback.to_string()
    }

    fn body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Unauthorized(body)
            | ApiError::AccessDenied(body)
            | ApiError::NotFound(body)
            | ApiError::Rejected { body, .. }
            | ApiError::Server { body, .. } => Some(body),
            _ => None,
        }
    }
}

fn parse_body(body: &str) -> ErrorBody {
    serde_json::from_str(truncated(body)).unwrap_or_default()
}

/// Truncate a response body to avoid carrying excessive data around
fn truncated(body: &str) -> &str {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body
    } else {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        &body[..end]
    }
}
