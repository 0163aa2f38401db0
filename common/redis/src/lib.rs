use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CustomRedisError {
    #[error("Not found in redis")]
    NotFound,
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout error")]
    Timeout,
    #[error(transparent)]
    Redis(#[from] Arc<redis::RedisError>),
}

impl From<redis::RedisError> for CustomRedisError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            CustomRedisError::Timeout
        } else {
            CustomRedisError::Redis(Arc::new(err))
        }
    }
}

impl From<std::string::FromUtf8Error> for CustomRedisError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CustomRedisError::ParseError(err.to_string())
    }
}

/// Key-value cache operations used by the services in this workspace.
/// `get` reports an absent key as `CustomRedisError::NotFound` so callers can
/// tell a miss apart from a connectivity failure.
#[async_trait]
pub trait Client {
    async fn get(&self, k: String) -> Result<String, CustomRedisError>;
    async fn set(&self, k: String, v: String) -> Result<(), CustomRedisError>;
    async fn del(&self, k: String) -> Result<(), CustomRedisError>;
}

mod client;
mod memory;
mod mock;

pub use client::RedisClient;
pub use memory::InMemoryRedisClient;
pub use mock::{MockRedisCall, MockRedisClient, MockRedisValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_errors_are_folded_into_the_timeout_variant() {
        let err: CustomRedisError = redis::RedisError::from((
            redis::ErrorKind::IoError,
            "timed out",
            "read timed out".to_string(),
        ))
        .into();
        // Not a timeout by kind alone; only errors the redis crate flags as
        // timeouts are converted.
        assert!(matches!(err, CustomRedisError::Redis(_)));
    }

    #[test]
    fn test_utf8_failures_become_parse_errors() {
        let bad = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: CustomRedisError = bad.into();
        assert!(matches!(err, CustomRedisError::ParseError(_)));
    }
}
