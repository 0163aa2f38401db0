use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::{Client, CustomRedisError};

pub struct RedisClient {
    connection: MultiplexedConnection,
}

impl RedisClient {
    /// Create a new RedisClient with no response or connection timeout
    /// (commands block until the server replies).
    pub async fn new(addr: String) -> Result<RedisClient, CustomRedisError> {
        Self::with_timeouts(addr, None, None).await
    }

    /// Create a new RedisClient with explicit timeouts.
    ///
    /// `None` means no timeout. Passing `Some(Duration::ZERO)` is rejected as
    /// an `InvalidConfiguration` error; use `None` for no timeout instead.
    pub async fn with_timeouts(
        addr: String,
        response_timeout: Option<Duration>,
        connection_timeout: Option<Duration>,
    ) -> Result<RedisClient, CustomRedisError> {
        let client = redis::Client::open(addr)?;

        if let Some(timeout) = response_timeout {
            if timeout.is_zero() {
                return Err(CustomRedisError::InvalidConfiguration(
                    "Redis response timeout cannot be Duration::ZERO - use None for no timeout"
                        .to_string(),
                ));
            }
        }
        if let Some(timeout) = connection_timeout {
            if timeout.is_zero() {
                return Err(CustomRedisError::InvalidConfiguration(
                    "Redis connection timeout cannot be Duration::ZERO - use None for no timeout"
                        .to_string(),
                ));
            }
        }

        let mut config = redis::AsyncConnectionConfig::new();
        if let Some(timeout) = response_timeout {
            config = config.set_response_timeout(timeout);
        }
        if let Some(timeout) = connection_timeout {
            config = config.set_connection_timeout(timeout);
        }

        let connection = client
            .get_multiplexed_async_connection_with_config(&config)
            .await?;

        Ok(RedisClient { connection })
    }
}

#[async_trait]
impl Client for RedisClient {
    async fn get(&self, k: String) -> Result<String, CustomRedisError> {
        let mut conn = self.connection.clone();
        let raw_bytes: Vec<u8> = conn.get(k).await?;

        // redis replies with an empty payload for missing keys
        if raw_bytes.is_empty() {
            return Err(CustomRedisError::NotFound);
        }

        Ok(String::from_utf8(raw_bytes)?)
    }

    async fn set(&self, k: String, v: String) -> Result<(), CustomRedisError> {
        let mut conn = self.connection.clone();
        conn.set::<_, _, ()>(k, v).await?;
        Ok(())
    }

    async fn del(&self, k: String) -> Result<(), CustomRedisError> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(k).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_response_timeout_returns_error() {
        let result = RedisClient::with_timeouts(
            "redis://localhost:6379".to_string(),
            Some(Duration::ZERO),
            None,
        )
        .await;

        assert!(matches!(
            result,
            Err(CustomRedisError::InvalidConfiguration(_))
        ));
        if let Err(CustomRedisError::InvalidConfiguration(msg)) = result {
            assert!(msg.contains("response timeout"));
        }
    }

    #[tokio::test]
    async fn test_zero_connection_timeout_returns_error() {
        let result = RedisClient::with_timeouts(
            "redis://localhost:6379".to_string(),
            None,
            Some(Duration::ZERO),
        )
        .await;

        assert!(matches!(
            result,
            Err(CustomRedisError::InvalidConfiguration(_))
        ));
        if let Err(CustomRedisError::InvalidConfiguration(msg)) = result {
            assert!(msg.contains("connection timeout"));
        }
    }
}
