use std::fmt::{Display, Formatter};

use serde_json::Value as JsonValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    InvalidArgument,
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    Server,
    Network,
    Internal,
}

impl ApiErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorCode::InvalidArgument => "api/invalid-argument",
            ApiErrorCode::Unauthorized => "api/unauthorized",
            ApiErrorCode::Forbidden => "api/forbidden",
            ApiErrorCode::NotFound => "api/not-found",
            ApiErrorCode::RateLimited => "api/rate-limited",
            ApiErrorCode::Server => "api/server",
            ApiErrorCode::Network => "api/network",
            ApiErrorCode::Internal => "api/internal",
        }
    }

    fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorCode::InvalidArgument,
            401 => ApiErrorCode::Unauthorized,
            403 => ApiErrorCode::Forbidden,
            404 => ApiErrorCode::NotFound,
            429 => ApiErrorCode::RateLimited,
            500..=599 => ApiErrorCode::Server,
            _ => ApiErrorCode::Internal,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    pub code: ApiErrorCode,
    message: String,
    status: Option<u16>,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the failed response, if the server answered.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn invalid_argument(message: impl Into<String>) -> ApiError {
    ApiError::new(ApiErrorCode::InvalidArgument, message)
}

pub fn internal_error(message: impl Into<String>) -> ApiError {
    ApiError::new(ApiErrorCode::Internal, message)
}

pub fn network_error(message: impl Into<String>) -> ApiError {
    ApiError::new(ApiErrorCode::Network, message)
}

/// Maps a non-success response to an [`ApiError`]; returns `None` for 2xx.
///
/// The Web API reports failures as `{"error":{"status":401,"message":"..."}}`
/// while the accounts service uses `{"error":"...","error_description":"..."}`.
/// Both shapes are recognised; anything else falls back to a generic message.
pub(crate) fn error_for_status(status: u16, body: &[u8]) -> Option<ApiError> {
    if (200..300).contains(&status) {
        return None;
    }

    let code = ApiErrorCode::from_status(status);
    let message = serde_json::from_slice::<JsonValue>(body)
        .ok()
        .and_then(|value| error_message(&value))
        .unwrap_or_else(|| format!("request failed with HTTP status {status}"));

    Some(ApiError::new(code, message).with_status(status))
}

fn error_message(body: &JsonValue) -> Option<String> {
    let error = body.get("error")?;
    if let Some(message) = error.get("message").and_then(JsonValue::as_str) {
        return Some(message.to_string());
    }
    if let Some(code) = error.as_str() {
        return Some(match body.get("error_description").and_then(JsonValue::as_str) {
            Some(description) => format!("{code}: {description}"),
            None => code.to_string(),
        });
    }
    None
}
