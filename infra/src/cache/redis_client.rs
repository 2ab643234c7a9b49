//! Redis cache client implementation
//!
//! Provides a Redis client with connection retry at startup and the
//! commands the blocklist needs: atomic insert-if-absent with expiry,
//! TTL lookup, delete, key enumeration, key count and namespace clear.
//! Individual commands are never retried; each is bounded by the
//! configured response timeout.

use redis::{
    aio::MultiplexedConnection, AsyncCommands, Client, IntoConnectionInfo, RedisError, RedisResult,
};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use jb_shared::config::CacheConfig;
use crate::InfrastructureError;

/// Redis cache client over a multiplexed connection
///
/// Cloning is cheap and shares the underlying connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Upper bound for a single command
    response_timeout: Duration,
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Redis client or error
    ///
    /// # Example
    /// ```no_run
    /// use jb_infra::cache::{CacheConfig, RedisClient};
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let config = CacheConfig::new("redis://localhost:6379");
    ///     let client = RedisClient::new(config).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let max_retries = config.max_retries.max(1);
        Self::new_with_retry_config(config, max_retries, 100).await
    }

    /// Create a new Redis client with custom connection retry configuration
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings
    /// * `max_retries` - Maximum number of connection attempts
    /// * `retry_delay_ms` - Base delay between attempts in milliseconds
    pub async fn new_with_retry_config(
        config: CacheConfig,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!(
            "Creating Redis client with URL: {} (db {})",
            mask_url(&config.url),
            config.database
        );

        let mut connection_info = config.url.as_str().into_connection_info().map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;
        connection_info.redis.db = config.database;
        if let Some(username) = &config.username {
            connection_info.redis.username = Some(username.clone());
        }
        if let Some(password) = &config.password {
            connection_info.redis.password = Some(password.clone());
        }

        let client = Client::open(connection_info).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            InfrastructureError::Config(format!("Invalid Redis configuration: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(
            client,
            max_retries,
            retry_delay_ms,
            Duration::from_secs(config.connection_timeout.max(1)),
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            response_timeout: Duration::from_secs(config.response_timeout.max(1)),
        })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
        connect_timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let result = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result,
                Err(_) => Err(RedisError::from(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "connection timed out",
                ))),
            };

            match result {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff with cap at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Set a key only if it does not exist yet
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `value` - Value to store
    /// * `expiry_seconds` - Time to live, `None` for a key without expiry
    ///
    /// # Returns
    /// * `Ok(true)` - Key was created
    /// * `Ok(false)` - Key already existed and was left untouched
    pub async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: Option<u64>,
    ) -> Result<bool, InfrastructureError> {
        debug!("Setting key '{}' if absent with expiry {:?}", key, expiry_seconds);

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("NX");
        if let Some(seconds) = expiry_seconds {
            cmd.arg("EX").arg(seconds);
        }

        let reply = self
            .execute("SET NX", |mut conn| async move {
                cmd.query_async::<_, Option<String>>(&mut conn).await
            })
            .await?;

        Ok(reply.is_some())
    }

    /// Get time-to-live for a key, as reported by Redis
    ///
    /// # Returns
    /// * `-2` - Key does not exist
    /// * `-1` - Key exists without expiry
    /// * otherwise the remaining seconds
    pub async fn ttl(&self, key: &str) -> Result<i64, InfrastructureError> {
        debug!("Getting TTL for key '{}'", key);
        let key = key.to_string();
        self.execute("TTL", |mut conn| async move { conn.ttl::<_, i64>(key).await })
            .await
    }

    /// Delete a key from cache
    ///
    /// # Returns
    /// * `Result<bool, InfrastructureError>` - True if key was deleted, false if not found
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Deleting key '{}'", key);
        let key = key.to_string();
        let deleted_count = self
            .execute("DEL", |mut conn| async move { conn.del::<_, u32>(key).await })
            .await?;
        Ok(deleted_count > 0)
    }

    /// Check if a key exists in cache
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Checking if key '{}' exists", key);
        let key = key.to_string();
        self.execute("EXISTS", |mut conn| async move { conn.exists::<_, bool>(key).await })
            .await
    }

    /// All keys in the selected database (`KEYS *`)
    pub async fn keys(&self) -> Result<Vec<String>, InfrastructureError> {
        self.execute("KEYS", |mut conn| async move { conn.keys::<_, Vec<String>>("*").await })
            .await
    }

    /// Number of keys in the selected database
    pub async fn db_size(&self) -> Result<i64, InfrastructureError> {
        self.execute("DBSIZE", |mut conn| async move {
            redis::cmd("DBSIZE").query_async::<_, i64>(&mut conn).await
        })
        .await
    }

    /// Remove every key in the selected database
    pub async fn flush_db(&self) -> Result<(), InfrastructureError> {
        self.execute("FLUSHDB", |mut conn| async move {
            redis::cmd("FLUSHDB").query_async::<_, ()>(&mut conn).await
        })
        .await
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let response = self
            .execute("PING", |mut conn| async move {
                redis::cmd("PING").query_async::<_, String>(&mut conn).await
            })
            .await?;

        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    /// Run one command on a clone of the shared connection, bounded by the response timeout
    async fn execute<T, F, Fut>(&self, command: &str, operation: F) -> Result<T, InfrastructureError>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        match timeout(self.response_timeout, operation(self.connection.clone())).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!("Redis {} failed: {}", command, e);
                Err(InfrastructureError::Cache(e))
            }
            Err(_) => {
                error!(
                    "Redis {} timed out after {}s",
                    command,
                    self.response_timeout.as_secs()
                );
                Err(InfrastructureError::Timeout {
                    operation: command.to_string(),
                })
            }
        }
    }
}

/// Check if a Redis error is transient and a connection attempt should be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(proto_end) = url.find("://") {
            if proto_end < at_pos {
                let proto = &url[..proto_end + 3];
                let host_part = &url[at_pos..];
                return format!("{}****{}", proto, host_part);
            }
        }
    }
    url.to_string()
}
