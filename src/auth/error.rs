use crate::cache::CacheError;
use std::fmt;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone)]
pub enum AuthError {
    /// Client configuration that cannot produce a usable authorization URL.
    InvalidConfig(String),
    /// The state cache failed; CSRF protection cannot work without it.
    Cache(CacheError),
    Navigation(String),
    Environment(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidConfig(message) => write!(f, "Invalid configuration: {message}"),
            AuthError::Cache(err) => write!(f, "State cache error: {err}"),
            AuthError::Navigation(message) => write!(f, "Navigation error: {message}"),
            AuthError::Environment(message) => write!(f, "Environment error: {message}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Cache(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CacheError> for AuthError {
    fn from(error: CacheError) -> Self {
        AuthError::Cache(error)
    }
}
