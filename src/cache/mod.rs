//! TTL-bounded key/value cache used to carry the CSRF state across the
//! authorization redirect.
//!
//! The same expiry rules apply to every backend: entries older than
//! `max_age` are never returned, the whole cache is flushed once
//! `flush_interval` has elapsed, and a full cache evicts its least recently
//! used entry. Backends differ only in where the entry table lives:
//! process memory, a JSON file, or browser web storage.

mod error;
mod memory;
mod table;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
mod web;

use std::fmt;
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

use chrono::Utc;

use crate::logger::Logger;

pub use error::{CacheError, CacheErrorCode, CacheResult};
pub use memory::{InMemoryCache, MemoryStore};
pub use table::{CacheEntry, EntryTable};

#[cfg(not(target_arch = "wasm32"))]
pub use file::{default_cache_path, FileCache, FileStore, CACHE_DIR_NAME};

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
pub use web::{WebStorageCache, WebStorageDriver, WebStorageStore};

pub(crate) static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("@spotify/cache"));

/// Name under which persistent backends keep the entry table.
pub const DEFAULT_CACHE_NAME: &str = "spotify";
pub const DEFAULT_MAX_AGE: Duration = Duration::from_millis(900_000);
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(3_600_000);

/// Millisecond clock used to stamp and expire entries.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| Utc::now().timestamp_millis().max(0) as u64)
}

/// Key/value store consulted by the authorization session.
///
/// `put` stores with the cache's configured `max_age`; implementations must
/// never hand back an expired value.
pub trait StateCache: Send + Sync {
    fn get(&self, key: &str) -> CacheResult<Option<String>>;
    fn put(&self, key: &str, value: &str) -> CacheResult<()>;
    fn put_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;
    fn remove(&self, key: &str) -> CacheResult<()>;
    fn keys(&self) -> CacheResult<Vec<String>>;
    fn clear(&self) -> CacheResult<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOnExpire {
    /// Entries never expire.
    Disabled,
    /// Expired entries are dropped when they are read.
    Passive,
    /// Expired entries are swept on every cache access.
    Aggressive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageMode {
    Memory,
    LocalStorage,
    SessionStorage,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheOptions {
    pub name: String,
    pub max_age: Option<Duration>,
    pub flush_interval: Option<Duration>,
    pub delete_on_expire: DeleteOnExpire,
    pub capacity: Option<usize>,
    pub storage_mode: StorageMode,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_CACHE_NAME.to_string(),
            max_age: Some(DEFAULT_MAX_AGE),
            flush_interval: Some(DEFAULT_FLUSH_INTERVAL),
            delete_on_expire: DeleteOnExpire::Aggressive,
            capacity: None,
            storage_mode: StorageMode::LocalStorage,
        }
    }
}

impl CacheOptions {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_flush_interval(mut self, interval: Option<Duration>) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn with_delete_on_expire(mut self, policy: DeleteOnExpire) -> Self {
        self.delete_on_expire = policy;
        self
    }

    pub fn with_capacity(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_storage_mode(mut self, mode: StorageMode) -> Self {
        self.storage_mode = mode;
        self
    }
}

/// Where a [`TtlCache`] keeps its entry table between operations.
pub trait TableStore: Send + Sync {
    fn load(&self) -> CacheResult<Option<EntryTable>>;
    fn save(&self, table: &EntryTable) -> CacheResult<()>;
}

/// [`StateCache`] implementation applying [`CacheOptions`] over any
/// [`TableStore`].
pub struct TtlCache<S: TableStore> {
    store: S,
    options: CacheOptions,
    clock: Clock,
    lock: Mutex<()>,
}

impl<S: TableStore> fmt::Debug for TtlCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("options", &self.options)
            .finish()
    }
}

impl<S: TableStore> TtlCache<S> {
    pub fn with_store(store: S, options: CacheOptions) -> Self {
        Self {
            store,
            options,
            clock: system_clock(),
            lock: Mutex::new(()),
        }
    }

    /// Replaces the clock, mostly useful to drive expiry in tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn update<T>(&self, op: impl FnOnce(&mut EntryTable, u64) -> T) -> CacheResult<T> {
        let _guard = self.lock.lock().unwrap();
        let now = (self.clock)();
        let mut table = self.store.load()?.unwrap_or_else(|| EntryTable::new(now));
        let before = table.clone();
        table.maintain(now, &self.options);
        let result = op(&mut table, now);
        if table != before {
            self.store.save(&table)?;
        }
        Ok(result)
    }
}

impl<S: TableStore> StateCache for TtlCache<S> {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.update(|table, now| table.get(key, now, &self.options))
    }

    fn put(&self, key: &str, value: &str) -> CacheResult<()> {
        let ttl = self.options.max_age.map(|age| age.as_millis() as u64);
        self.update(|table, now| table.put(key, value, ttl, now, &self.options))
    }

    fn put_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let ttl = Some(ttl.as_millis() as u64);
        self.update(|table, now| table.put(key, value, ttl, now, &self.options))
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        self.update(|table, _| {
            table.remove(key);
        })
    }

    fn keys(&self) -> CacheResult<Vec<String>> {
        self.update(|table, _| table.keys())
    }

    fn clear(&self) -> CacheResult<()> {
        self.update(|table, _| table.clear())
    }
}

/// Builds the cache matching `options.storage_mode` for the current platform.
///
/// Native builds map both web storage modes onto a [`FileCache`] at
/// [`default_cache_path`], inside an owner-only directory of the current
/// user's cache root; browser builds use `localStorage` or `sessionStorage`
/// directly.
pub fn create_cache(options: CacheOptions) -> CacheResult<Arc<dyn StateCache>> {
    LOGGER.debug(format!(
        "creating cache '{}' with storage mode {:?}",
        options.name, options.storage_mode
    ));

    match options.storage_mode {
        StorageMode::Memory => Ok(Arc::new(InMemoryCache::new(options))),
        #[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
        StorageMode::LocalStorage => Ok(Arc::new(WebStorageCache::new(
            WebStorageDriver::Local,
            options,
        ))),
        #[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
        StorageMode::SessionStorage => Ok(Arc::new(WebStorageCache::new(
            WebStorageDriver::Session,
            options,
        ))),
        #[cfg(not(target_arch = "wasm32"))]
        StorageMode::LocalStorage | StorageMode::SessionStorage => {
            let path = default_cache_path(&options.name);
            if let Some(dir) = path.parent() {
                file::create_private_dir(dir)?;
            }
            Ok(Arc::new(FileCache::new(path, options)))
        }
        #[cfg(all(target_arch = "wasm32", not(feature = "wasm-web")))]
        StorageMode::LocalStorage | StorageMode::SessionStorage => Err(error::unavailable(
            "web storage requires the `wasm-web` feature",
        )),
    }
}
