use std::sync::Arc;

use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

use super::error::{serialization_error, unavailable, CacheError, CacheResult};
use super::{CacheOptions, EntryTable, TableStore, TtlCache, LOGGER};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WebStorageDriver {
    Local,
    Session,
}

/// Keeps the entry table as one JSON item in `localStorage` or
/// `sessionStorage`, keyed by the cache name.
#[derive(Debug, Clone)]
pub struct WebStorageStore {
    key: Arc<String>,
    driver: WebStorageDriver,
}

impl WebStorageStore {
    pub fn new(driver: WebStorageDriver, key: impl Into<String>) -> Self {
        Self {
            key: Arc::new(key.into()),
            driver,
        }
    }

    fn storage(&self) -> CacheResult<Storage> {
        let window = Self::window()?;
        let storage = match self.driver {
            WebStorageDriver::Local => window.local_storage().map_err(map_js_error)?,
            WebStorageDriver::Session => window.session_storage().map_err(map_js_error)?,
        };
        storage.ok_or_else(|| unavailable("Web storage API is unavailable"))
    }

    fn window() -> CacheResult<Window> {
        web_sys::window()
            .ok_or_else(|| unavailable("window object is not available in this environment"))
    }
}

impl TableStore for WebStorageStore {
    fn load(&self) -> CacheResult<Option<EntryTable>> {
        let storage = self.storage()?;
        let Some(raw) = storage.get_item(self.key.as_ref()).map_err(map_js_error)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&raw) {
            Ok(table) => Ok(Some(table)),
            Err(err) => {
                LOGGER.warn(format!("discarding unreadable web storage cache: {err}"));
                Ok(None)
            }
        }
    }

    fn save(&self, table: &EntryTable) -> CacheResult<()> {
        let storage = self.storage()?;
        if table.is_empty() {
            return storage
                .remove_item(self.key.as_ref())
                .map_err(map_js_error);
        }

        let serialized = serde_json::to_string(table)
            .map_err(|err| serialization_error(format!("Failed to serialize cache table: {err}")))?;
        storage
            .set_item(self.key.as_ref(), &serialized)
            .map_err(map_js_error)
    }
}

pub type WebStorageCache = TtlCache<WebStorageStore>;

impl WebStorageCache {
    pub fn new(driver: WebStorageDriver, options: CacheOptions) -> Self {
        let store = WebStorageStore::new(driver, options.name.clone());
        TtlCache::with_store(store, options)
    }
}

fn map_js_error(err: JsValue) -> CacheError {
    unavailable(format!("Web storage error: {}", stringify_js_error(err)))
}

fn stringify_js_error(err: JsValue) -> String {
    if let Some(string) = err.as_string() {
        return string;
    }

    if let Ok(stringified) = js_sys::JSON::stringify(&err) {
        if let Some(text) = stringified.as_string() {
            return text;
        }
    }

    format!("{err:?}")
}
