use std::sync::Mutex;

use super::error::CacheResult;
use super::{CacheOptions, EntryTable, TableStore, TtlCache};

/// Keeps the entry table in process memory; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<Option<EntryTable>>,
}

impl TableStore for MemoryStore {
    fn load(&self) -> CacheResult<Option<EntryTable>> {
        Ok(self.table.lock().unwrap().clone())
    }

    fn save(&self, table: &EntryTable) -> CacheResult<()> {
        *self.table.lock().unwrap() = Some(table.clone());
        Ok(())
    }
}

pub type InMemoryCache = TtlCache<MemoryStore>;

impl InMemoryCache {
    pub fn new(options: CacheOptions) -> Self {
        TtlCache::with_store(MemoryStore::default(), options)
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(CacheOptions::default().with_storage_mode(super::StorageMode::Memory))
    }
}
