//! Entry table shared by every cache backend.
//!
//! Expiry, flush and capacity rules live here so the in-memory, file and web
//! storage caches behave identically; backends only decide where the table
//! is kept between operations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CacheOptions, DeleteOnExpire};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: String,
    /// Milliseconds since the Unix epoch.
    pub stored_at: u64,
    /// Milliseconds since the Unix epoch; `None` never expires.
    pub expires_at: Option<u64>,
    /// Recency counter used for capacity eviction.
    #[serde(default)]
    pub touched: u64,
}

impl CacheEntry {
    pub fn is_expired(&self, now: u64) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTable {
    entries: HashMap<String, CacheEntry>,
    last_flush: u64,
    next_touch: u64,
}

impl EntryTable {
    pub fn new(now: u64) -> Self {
        Self {
            entries: HashMap::new(),
            last_flush: now,
            next_touch: 0,
        }
    }

    /// Applies the time-driven rules (flush interval, aggressive expiry) that
    /// must run before any read or write.
    pub fn maintain(&mut self, now: u64, options: &CacheOptions) {
        if let Some(interval) = options.flush_interval {
            let interval = interval.as_millis() as u64;
            if now.saturating_sub(self.last_flush) >= interval {
                self.entries.clear();
                self.last_flush = now;
            }
        }

        if options.delete_on_expire == DeleteOnExpire::Aggressive {
            self.entries.retain(|_, entry| !entry.is_expired(now));
        }
    }

    pub fn get(&mut self, key: &str, now: u64, options: &CacheOptions) -> Option<String> {
        let expired = self.entries.get(key)?.is_expired(now);
        if expired && options.delete_on_expire != DeleteOnExpire::Disabled {
            self.entries.remove(key);
            return None;
        }

        let touch = self.bump();
        let entry = self.entries.get_mut(key)?;
        entry.touched = touch;
        Some(entry.value.clone())
    }

    pub fn put(
        &mut self,
        key: &str,
        value: &str,
        ttl_millis: Option<u64>,
        now: u64,
        options: &CacheOptions,
    ) {
        if !self.entries.contains_key(key) {
            if let Some(capacity) = options.capacity {
                while self.entries.len() >= capacity.max(1) {
                    if !self.evict_least_recent() {
                        break;
                    }
                }
            }
        }

        let expires_at = match options.delete_on_expire {
            DeleteOnExpire::Disabled => None,
            _ => ttl_millis.map(|ttl| now.saturating_add(ttl)),
        };
        let touched = self.bump();
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                stored_at: now,
                expires_at,
                touched,
            },
        );
    }

    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bump(&mut self) -> u64 {
        self.next_touch += 1;
        self.next_touch
    }

    fn evict_least_recent(&mut self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.touched)
            .map(|(key, _)| key.clone());
        match oldest {
            Some(key) => {
                self.entries.remove(&key);
                true
            }
            None => false,
        }
    }
}
