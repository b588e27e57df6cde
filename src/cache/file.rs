use std::fs::{remove_file, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{from_str as deserialize_table, to_string as serialize_table};

use super::error::{io_error, serialization_error, CacheResult};
use super::{CacheOptions, EntryTable, TableStore, TtlCache, LOGGER};

/// Directory under the per-user cache root holding default cache files.
pub const CACHE_DIR_NAME: &str = "spotify-rs-sdk";

/// Owner read/write for cache files (Unix only).
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Owner-only access for the default cache directory (Unix only).
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// Keeps the entry table in a JSON file so the cached state outlives the
/// process, the desktop counterpart of browser `localStorage`.
#[derive(Clone)]
pub struct FileStore {
    path: Arc<PathBuf>,
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore").field("path", &self.path).finish()
    }
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: Arc::new(path.as_ref().to_path_buf()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableStore for FileStore {
    fn load(&self) -> CacheResult<Option<EntryTable>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&*self.path)
            .map_err(|err| io_error(format!("Failed to open cache file: {err}")))?;
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)
            .map_err(|err| io_error(format!("Failed to read cache file: {err}")))?;

        if buffer.trim().is_empty() {
            return Ok(None);
        }

        match deserialize_table(&buffer) {
            Ok(table) => Ok(Some(table)),
            Err(err) => {
                // A corrupt table only loses cached values; start over.
                LOGGER.warn(format!(
                    "discarding unreadable cache file {}: {err}",
                    self.path.display()
                ));
                Ok(None)
            }
        }
    }

    fn save(&self, table: &EntryTable) -> CacheResult<()> {
        if table.is_empty() {
            if self.path.exists() {
                remove_file(&*self.path)
                    .map_err(|err| io_error(format!("Failed to remove cache file: {err}")))?;
            }
            return Ok(());
        }

        let serialized = serialize_table(table)
            .map_err(|err| serialization_error(format!("Failed to serialize cache table: {err}")))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| io_error(format!("Failed to create cache directory: {err}")))?;
        }
        let mut file = open_for_write(&self.path)
            .map_err(|err| io_error(format!("Failed to create cache file: {err}")))?;
        file.write_all(serialized.as_bytes())
            .map_err(|err| io_error(format!("Failed to write cache file: {err}")))?;
        Ok(())
    }
}

fn open_for_write(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    options.open(path)
}

/// Path of the default file cache called `name`.
///
/// The file lives in the current user's cache directory
/// (`$XDG_CACHE_HOME`, `$HOME/.cache` or `%LOCALAPPDATA%`), so other local
/// accounts cannot read or plant the pending state. The system temporary
/// directory is only used when none of these is set.
pub fn default_cache_path(name: &str) -> PathBuf {
    cache_root(|key| std::env::var_os(key).map(PathBuf::from))
        .join(CACHE_DIR_NAME)
        .join(format!("{name}.json"))
}

fn cache_root(lookup: impl Fn(&str) -> Option<PathBuf>) -> PathBuf {
    let non_empty = |key: &str| lookup(key).filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = non_empty("XDG_CACHE_HOME") {
        return dir;
    }
    if let Some(home) = non_empty("HOME") {
        return home.join(".cache");
    }
    if let Some(dir) = non_empty("LOCALAPPDATA") {
        return dir;
    }
    std::env::temp_dir()
}

/// Creates `dir` (and missing parents) readable by the owner only.
pub(crate) fn create_private_dir(dir: &Path) -> CacheResult<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
        .create(dir)
        .map_err(|err| io_error(format!("Failed to create cache directory: {err}")))
}

pub type FileCache = TtlCache<FileStore>;

impl FileCache {
    pub fn new(path: impl AsRef<Path>, options: CacheOptions) -> Self {
        TtlCache::with_store(FileStore::new(path), options)
    }
}
