use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheErrorCode {
    Unavailable,
    Serialization,
    Io,
}

impl CacheErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheErrorCode::Unavailable => "cache/unavailable",
            CacheErrorCode::Serialization => "cache/serialization",
            CacheErrorCode::Io => "cache/io",
        }
    }
}

#[derive(Clone, Debug)]
pub struct CacheError {
    pub code: CacheErrorCode,
    message: String,
}

impl CacheError {
    pub fn new(code: CacheErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for CacheError {}

pub type CacheResult<T> = Result<T, CacheError>;

#[allow(dead_code)]
pub fn unavailable(message: impl Into<String>) -> CacheError {
    CacheError::new(CacheErrorCode::Unavailable, message)
}

pub fn serialization_error(message: impl Into<String>) -> CacheError {
    CacheError::new(CacheErrorCode::Serialization, message)
}

#[allow(dead_code)]
pub fn io_error(message: impl Into<String>) -> CacheError {
    CacheError::new(CacheErrorCode::Io, message)
}
