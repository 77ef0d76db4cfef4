//! Cache contract for previously fetched pages
//!
//! A cache hit lets a worker synthesize a response without touching the
//! network. Cache failures are never fatal: a read failure is treated as a
//! miss and a write failure is logged and ignored.

use crate::{Result, SpinneretError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A pluggable fetch cache, keyed by canonical URL
///
/// A miss is an error, not an `Option`; implementations decide how to
/// distinguish misses from real failures, but the engine treats both as
/// "fetch it again".
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// An in-memory cache, suitable for single-run caching and tests
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .get(key)
            .cloned()
            .ok_or_else(|| SpinneretError::CacheMiss(key.to_string()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
