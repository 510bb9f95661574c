//! Redis script executor
//!
//! Each call checks one connection out of a `deadpool-redis` pool and runs
//! `EVAL` on it. The pooled connection is a guard: it goes back to the pool
//! when the call returns, fails, times out, or its future is dropped.

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, PoolConfig, PoolError, Runtime};
use redis::{RedisError, Value};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::ports::{BloomScript, ScriptExecutor, ScriptReply, BIT_ABSENT_MARKER};

/// Redis connection settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisConfig {
    /// Connection URL, e.g. `redis://127.0.0.1:6379/0`
    pub url: String,
    /// Maximum pooled connections
    pub pool_size: usize,
    /// How long a call may wait for (or create) a pooled connection
    pub wait_timeout: Duration,
    /// How long a call may wait for the script reply
    pub command_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            pool_size: 16,
            wait_timeout: Duration::from_millis(1000),
            command_timeout: Duration::from_millis(2000),
        }
    }
}

impl RedisConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BLOOM_REDIS_URL`: Connection URL (default: redis://127.0.0.1:6379)
    /// - `BLOOM_REDIS_POOL_SIZE`: Maximum pooled connections (default: 16)
    /// - `BLOOM_REDIS_WAIT_TIMEOUT_MS`: Pool wait timeout (default: 1000)
    /// - `BLOOM_REDIS_COMMAND_TIMEOUT_MS`: Script reply timeout (default: 2000)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |name: &str, default: Duration| {
            lookup(name)
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            url: lookup("BLOOM_REDIS_URL").unwrap_or(defaults.url),
            pool_size: lookup("BLOOM_REDIS_POOL_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|&size| size > 0)
                .unwrap_or(defaults.pool_size),
            wait_timeout: millis("BLOOM_REDIS_WAIT_TIMEOUT_MS", defaults.wait_timeout),
            command_timeout: millis("BLOOM_REDIS_COMMAND_TIMEOUT_MS", defaults.command_timeout),
        }
    }

    /// Build a pool from this configuration. No connection is opened yet.
    pub fn create_pool(&self) -> Result<Pool, StoreError> {
        let mut pool_config = PoolConfig::new(self.pool_size);
        pool_config.timeouts.wait = Some(self.wait_timeout);
        pool_config.timeouts.create = Some(self.wait_timeout);
        pool_config.timeouts.recycle = Some(self.wait_timeout);

        let mut config = Config::from_url(self.url.clone());
        config.pool = Some(pool_config);
        config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StoreError::Pool(e.to_string()))
    }
}

/// Pooled Redis client exposing atomic script execution
#[derive(Clone)]
pub struct RedisScriptClient {
    pool: Pool,
    command_timeout: Duration,
}

impl RedisScriptClient {
    /// Wrap an existing pool owned by the caller
    pub fn new(pool: Pool, command_timeout: Duration) -> Self {
        Self {
            pool,
            command_timeout,
        }
    }

    /// Build the pool from `config`
    pub fn connect(config: &RedisConfig) -> Result<Self, StoreError> {
        let pool = config.create_pool()?;
        debug!(url = %config.url, pool_size = config.pool_size, "Redis pool created");
        Ok(Self::new(pool, config.command_timeout))
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

#[async_trait]
impl ScriptExecutor for RedisScriptClient {
    async fn eval(
        &self,
        script: BloomScript,
        keys: &[&str],
        args: &[u64],
    ) -> Result<ScriptReply, StoreError> {
        let key = keys.first().copied().unwrap_or_default();

        let mut conn = self.pool.get().await.map_err(|e| {
            warn!(script = script.name(), error = %e, "Failed to acquire Redis connection");
            map_pool_error(e, key)
        })?;

        let mut cmd = redis::cmd("EVAL");
        cmd.arg(script.source()).arg(keys.len()).arg(keys).arg(args);

        let reply = cmd.query_async::<_, Value>(&mut conn);
        let value = tokio::time::timeout(self.command_timeout, reply)
            .await
            .map_err(|_| {
                warn!(script = script.name(), key = %key, "Redis script timed out");
                StoreError::Timeout
            })?
            .map_err(|e| map_redis_error(e, key))?;

        Ok(to_reply(value))
    }
}

fn map_pool_error(err: PoolError, key: &str) -> StoreError {
    match err {
        PoolError::Timeout(_) => StoreError::PoolTimeout,
        PoolError::Backend(e) => map_redis_error(e, key),
        other => StoreError::Pool(other.to_string()),
    }
}

fn map_redis_error(err: RedisError, key: &str) -> StoreError {
    if err.code() == Some(BIT_ABSENT_MARKER) {
        StoreError::BitAbsent {
            key: key.to_string(),
        }
    } else if err.is_timeout() {
        StoreError::Timeout
    } else if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
        StoreError::Connection(err.to_string())
    } else {
        StoreError::Script(err.to_string())
    }
}

fn to_reply(value: Value) -> ScriptReply {
    match value {
        Value::Int(v) => ScriptReply::Int(v),
        Value::Nil => ScriptReply::Nil,
        Value::Data(bytes) => ScriptReply::Text(String::from_utf8_lossy(&bytes).into_owned()),
        Value::Status(status) => ScriptReply::Text(status),
        Value::Okay => ScriptReply::Text("OK".to_string()),
        Value::Bulk(items) => ScriptReply::Other(format!("array of {}", items.len())),
    }
}
