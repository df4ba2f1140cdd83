//! # Redis
//!
//! Key-value store behind the tip catalog and the vote ledger.
//!
//! ## Layout
//!
//! - Tips: 1 key holding every tip text. A list under `l_protips` by default
//!   (`LRANGE 0 -1`), or a set under `protip` for older deployments (`SMEMBERS`).
//!   Position in the reply is the tip id.
//! - Votes: 1 hash key, field is the decimal tip id, value is the signed score.
//! - Missing vote fields read as 0, `HINCRBY` creates them on first vote.
//!
//! ## Atomicity
//!
//! Every vote is a single `HINCRBY`. Redis queues commands per key, so concurrent
//! voters never lose an update and nothing here reads before writing.
//!
//! ## Connection
//!
//! One [`ConnectionManager`] shared by every request. It is created lazily so the
//! server comes up while Redis is still down, and every call (connecting included)
//! runs under the configured timeout.
use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tokio::{sync::OnceCell, time::timeout};
use tracing::warn;

use crate::{
    config::{Config, StoreKind, read_tips},
    error::{AppError, Result},
    memory::MemoryStore,
};

/// Client side of the key-value store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Every element of the list under `key`, in list order.
    async fn list_range(&self, key: &str) -> Result<Vec<String>>;

    /// Every member of the set under `key`, in whatever order the store replies.
    async fn set_members(&self, key: &str) -> Result<Vec<String>>;

    /// Integer value of one hash field, `None` if absent.
    async fn hash_get(&self, key: &str, field: i64) -> Result<Option<i64>>;

    /// Integer values of several hash fields in a single round trip.
    async fn hash_get_many(&self, key: &str, fields: &[i64]) -> Result<Vec<Option<i64>>>;

    /// Atomically adds `delta` to a hash field and returns the new value.
    async fn hash_incr_by(&self, key: &str, field: i64, delta: i64) -> Result<i64>;
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager> {
    let config = ConnectionManagerConfig::new().set_number_of_retries(1);

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    Ok(connection_manager)
}

pub struct RedisStore {
    redis_url: String,
    connection: OnceCell<ConnectionManager>,
    timeout: Duration,
}

impl RedisStore {
    pub fn new(redis_url: &str, timeout: Duration) -> Result<Self> {
        // Only validates the URL, the connection is opened on first use.
        Client::open(redis_url)
            .map_err(|e| AppError::Config(format!("invalid REDIS_URL {redis_url}: {e}")))?;

        Ok(Self {
            redis_url: redis_url.to_string(),
            connection: OnceCell::new(),
            timeout,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        self.connection
            .get_or_try_init(|| init_redis(&self.redis_url))
            .await
            .cloned()
    }

    async fn bounded<T, F>(&self, op: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        timeout(self.timeout, op)
            .await
            .map_err(AppError::from)
            .and_then(|result| result)
            .inspect_err(|e| warn!("Redis call failed: {e}"))
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn list_range(&self, key: &str) -> Result<Vec<String>> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let tips: Vec<String> = conn.lrange(key, 0, -1).await?;
            Ok::<_, AppError>(tips)
        })
        .await
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let tips: Vec<String> = conn.smembers(key).await?;
            Ok::<_, AppError>(tips)
        })
        .await
    }

    async fn hash_get(&self, key: &str, field: i64) -> Result<Option<i64>> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let raw: Option<String> = conn.hget(key, field).await?;
            Ok::<_, AppError>(parse_score(field, raw))
        })
        .await
    }

    async fn hash_get_many(&self, key: &str, fields: &[i64]) -> Result<Vec<Option<i64>>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }

        self.bounded(async {
            let mut conn = self.connection().await?;
            let raw: Vec<Option<String>> = redis::cmd("HMGET")
                .arg(key)
                .arg(fields)
                .query_async(&mut conn)
                .await?;

            let scores: Vec<Option<i64>> = fields
                .iter()
                .zip(raw)
                .map(|(&field, value)| parse_score(field, value))
                .collect();
            Ok::<_, AppError>(scores)
        })
        .await
    }

    async fn hash_incr_by(&self, key: &str, field: i64, delta: i64) -> Result<i64> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let score: i64 = conn.hincr(key, field, delta).await?;
            Ok::<_, AppError>(score)
        })
        .await
    }
}

/// Non-integer values read as absent so one corrupt field can't hide the listing.
fn parse_score(field: i64, raw: Option<String>) -> Option<i64> {
    let raw = raw?;

    raw.trim()
        .parse::<i64>()
        .inspect_err(|e| warn!("Vote count for {field} is not an integer ({raw:?}): {e}"))
        .ok()
}

pub fn init_store(config: &Config) -> Result<Arc<dyn Store>> {
    match config.store {
        StoreKind::Redis => Ok(Arc::new(RedisStore::new(
            &config.redis_url,
            config.store_timeout,
        )?)),
        StoreKind::Memory => {
            let tips = match &config.tips_file {
                Some(path) => read_tips(path)?,
                None => Vec::new(),
            };

            Ok(Arc::new(MemoryStore::with_tips(&config.tips_key, tips)))
        }
    }
}
