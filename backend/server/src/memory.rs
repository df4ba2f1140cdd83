//! In-process [`Store`] for local runs and tests.
//!
//! Behaves like the Redis layout: lists keep insertion order, sets are the same
//! sequence deduplicated, hash increments happen under one lock so they are atomic.
//! [`MemoryStore::set_available`] simulates a dropped connection.
use std::{
    collections::HashMap,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;

use crate::{
    database::Store,
    error::{AppError, Result},
};

#[derive(Default)]
struct Inner {
    sequences: HashMap<String, Vec<String>>,
    hashes: HashMap<String, HashMap<i64, i64>>,
}

pub struct MemoryStore {
    inner: Mutex<Inner>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            available: AtomicBool::new(true),
        }
    }

    pub fn with_tips<I, S>(key: &str, tips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.lock() {
            inner.sequences.insert(
                key.to_string(),
                tips.into_iter().map(Into::into).collect(),
            );
        }

        store
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("connection refused".to_string()));
        }

        self.inner
            .lock()
            .map_err(|_| AppError::StoreUnavailable("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_range(&self, key: &str) -> Result<Vec<String>> {
        let inner = self.lock()?;

        Ok(inner.sequences.get(key).cloned().unwrap_or_default())
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        let inner = self.lock()?;

        let mut members: Vec<String> = Vec::new();
        for tip in inner.sequences.get(key).into_iter().flatten() {
            if !members.contains(tip) {
                members.push(tip.clone());
            }
        }

        Ok(members)
    }

    async fn hash_get(&self, key: &str, field: i64) -> Result<Option<i64>> {
        let inner = self.lock()?;

        Ok(inner
            .hashes
            .get(key)
            .and_then(|hash| hash.get(&field))
            .copied())
    }

    async fn hash_get_many(&self, key: &str, fields: &[i64]) -> Result<Vec<Option<i64>>> {
        let inner = self.lock()?;
        let hash = inner.hashes.get(key);

        Ok(fields
            .iter()
            .map(|field| hash.and_then(|hash| hash.get(field)).copied())
            .collect())
    }

    async fn hash_incr_by(&self, key: &str, field: i64, delta: i64) -> Result<i64> {
        let mut inner = self.lock()?;

        let score = inner
            .hashes
            .entry(key.to_string())
            .or_default()
            .entry(field)
            .or_insert(0);
        *score += delta;

        Ok(*score)
    }
}
