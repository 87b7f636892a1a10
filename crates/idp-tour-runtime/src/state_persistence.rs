//! Durable "tour seen" state.
//!
//! This module provides the [`StorageBackend`] abstraction (a tiny
//! `localStorage`-shaped key/value store) and [`CompletionFlag`], the single
//! boolean the tour persists per installation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      CompletionFlag                           │
//! │   - has_completed / mark_completed / clear_completed          │
//! │   - swallows and logs storage failures                        │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     StorageBackend                            │
//! │   - MemoryStorage: in-memory (testing, ephemeral)             │
//! │   - FileStorage: JSON file (requires file-storage)            │
//! │   - LocalStorage: browser (idp-tour-web, wasm32 only)         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic and never reach
//!    the tour; an unreadable flag reads as "not completed".
//! 2. **Atomic writes**: file storage uses the write-rename pattern.
//! 3. **Truthiness**: a stored value counts as set only when non-empty.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Logged at `warn`, flag unchanged |
//! | `StorageError::Serialization` | JSON encode/decode | Logged, treated as empty store |
//! | `StorageError::Corruption` | Lock poisoned | Logged, treated as empty store |
//! | `StorageError::Unavailable` | Storage disabled (private mode) | Logged, flag reads unset |

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Storage key of the completion flag.
pub const COMPLETION_KEY: &str = "idp-tour-seen";

/// Value written when the flag is set.
const COMPLETION_VALUE: &str = "1";

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    #[cfg(feature = "file-storage")]
    Serialization(String),
    /// Storage is corrupted or a lock was poisoned.
    Corruption(String),
    /// Backend is not available (e.g., storage disabled by the browser).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "file-storage")]
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            #[cfg(feature = "file-storage")]
            StorageError::Serialization(_) => None,
            StorageError::Corruption(_) => None,
            StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Pluggable string key/value storage, shaped after the Web Storage API.
///
/// No `Send`/`Sync` bound: the tour is single-threaded and browser storage
/// handles are not thread-safe.
pub trait StorageBackend {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a value. `Ok(None)` when the key is absent.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value. Deleting an absent key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory storage backend for testing and ephemeral sessions.
///
/// State is lost when the process exits.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create memory storage pre-populated with entries.
    #[must_use]
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            data: RwLock::new(entries),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage")
            .field("entries", &count)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage (requires file-storage feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "file-storage")]
mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// On-disk layout.
    #[derive(Serialize, Deserialize)]
    struct StoreFile {
        /// Format version for future migrations.
        format_version: u64,
        items: BTreeMap<String, String>,
    }

    impl StoreFile {
        const FORMAT_VERSION: u64 = 1;
    }

    /// File-based storage backend using JSON.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "items": {
    ///     "idp-tour-seen": "1"
    ///   }
    /// }
    /// ```
    ///
    /// # Atomic Writes
    ///
    /// 1. Write to `{path}.tmp`
    /// 2. Flush and sync
    /// 3. Rename `{path}.tmp` -> `{path}`
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// Create a file storage at the given path.
        ///
        /// The file does not need to exist; it will be created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// Create storage at the default location for the application.
        ///
        /// Uses `$XDG_STATE_HOME/idp-tour/{app_name}/storage.json` on Linux,
        /// falling back to `~/.local/state` and finally the current directory.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let base = dirs_or_fallback();
            let path = base.join("idp-tour").join(app_name).join("storage.json");
            Self { path }
        }

        /// Location of the backing file.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn load(&self) -> StorageResult<BTreeMap<String, String>> {
            if !self.path.exists() {
                return Ok(BTreeMap::new());
            }

            let file = File::open(&self.path)?;
            let store: StoreFile = serde_json::from_reader(BufReader::new(file))
                .map_err(|e| StorageError::Serialization(format!("failed to parse store: {e}")))?;

            if store.format_version != StoreFile::FORMAT_VERSION {
                tracing::warn!(
                    stored = store.format_version,
                    expected = StoreFile::FORMAT_VERSION,
                    "storage file format version mismatch, ignoring stored items"
                );
                return Ok(BTreeMap::new());
            }

            Ok(store.items)
        }

        fn save(&self, items: &BTreeMap<String, String>) -> StorageResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }

            let doc = StoreFile {
                format_version: StoreFile::FORMAT_VERSION,
                items: items.clone(),
            };

            let tmp_path = self.temp_path();
            {
                let file = File::create(&tmp_path)?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, &doc).map_err(|e| {
                    StorageError::Serialization(format!("failed to serialize store: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }

            fs::rename(&tmp_path, &self.path)?;

            tracing::debug!(
                path = %self.path.display(),
                items = items.len(),
                "saved storage file"
            );
            Ok(())
        }
    }

    /// Get state directory, falling back to current dir if unavailable.
    fn dirs_or_fallback() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.load()?.remove(key))
        }

        fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
            // A corrupt file is replaced rather than blocking every later write.
            let mut items = self.load().unwrap_or_default();
            items.insert(key.to_owned(), value.to_owned());
            self.save(&items)
        }

        fn remove_item(&self, key: &str) -> StorageResult<()> {
            let mut items = self.load().unwrap_or_default();
            if items.remove(key).is_none() {
                return Ok(());
            }
            self.save(&items)
        }

        fn is_available(&self) -> bool {
            if let Some(parent) = self.path.parent() {
                if !parent.exists() {
                    return fs::create_dir_all(parent).is_ok();
                }
                let test_path = parent.join(".idp_tour_test_write");
                if fs::write(&test_path, b"test").is_ok() {
                    let _ = fs::remove_file(&test_path);
                    return true;
                }
            }
            false
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;

// ─────────────────────────────────────────────────────────────────────────────
// Completion Flag
// ─────────────────────────────────────────────────────────────────────────────

/// The per-installation "user has seen or dismissed the tour" marker.
///
/// Cheap to clone; clones share the backend, so a login flow can hold one to
/// re-arm the first-run prompt while the engine holds another.
///
/// # Example
///
/// ```
/// use idp_tour_runtime::CompletionFlag;
///
/// let flag = CompletionFlag::in_memory();
/// assert!(!flag.has_completed());
/// flag.mark_completed();
/// assert!(flag.has_completed());
/// flag.clear_completed();
/// assert!(!flag.has_completed());
/// ```
#[derive(Clone)]
pub struct CompletionFlag {
    backend: Arc<dyn StorageBackend>,
    key: String,
}

impl CompletionFlag {
    /// Flag stored under [`COMPLETION_KEY`].
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_key(backend, COMPLETION_KEY)
    }

    /// Flag stored under a custom key.
    #[must_use]
    pub fn with_key(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Flag backed by fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the tour has been seen. Unreadable storage reads as `false`.
    #[must_use]
    pub fn has_completed(&self) -> bool {
        match self.backend.get_item(&self.key) {
            Ok(value) => value.is_some_and(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(
                    backend = %self.backend.name(),
                    key = %self.key,
                    error = %e,
                    "failed to read completion flag"
                );
                false
            }
        }
    }

    /// Record that the tour has been seen.
    pub fn mark_completed(&self) {
        match self.backend.set_item(&self.key, COMPLETION_VALUE) {
            Ok(()) => tracing::debug!(key = %self.key, "completion flag set"),
            Err(e) => tracing::warn!(
                backend = %self.backend.name(),
                key = %self.key,
                error = %e,
                "failed to write completion flag"
            ),
        }
    }

    /// Forget that the tour has been seen, re-arming the first-run prompt.
    pub fn clear_completed(&self) {
        match self.backend.remove_item(&self.key) {
            Ok(()) => tracing::debug!(key = %self.key, "completion flag cleared"),
            Err(e) => tracing::warn!(
                backend = %self.backend.name(),
                key = %self.key,
                error = %e,
                "failed to clear completion flag"
            ),
        }
    }
}

impl fmt::Debug for CompletionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionFlag")
            .field("backend", &self.backend.name())
            .field("key", &self.key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend whose every operation fails.
    struct BrokenStorage;

    impl StorageBackend for BrokenStorage {
        fn name(&self) -> &str {
            "BrokenStorage"
        }

        fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn remove_item(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn is_available(&self) -> bool {
            false
        }
    }

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn flag_uses_fixed_key() {
        let backend = Arc::new(MemoryStorage::new());
        let flag = CompletionFlag::new(backend.clone());
        flag.mark_completed();
        assert_eq!(
            backend.get_item(COMPLETION_KEY).unwrap().as_deref(),
            Some("1")
        );
    }

    #[test]
    fn empty_value_reads_unset() {
        let mut entries = HashMap::new();
        entries.insert(COMPLETION_KEY.to_owned(), String::new());
        let flag = CompletionFlag::new(Arc::new(MemoryStorage::with_entries(entries)));
        assert!(!flag.has_completed());
    }

    #[test]
    fn any_non_empty_value_reads_set() {
        let mut entries = HashMap::new();
        entries.insert(COMPLETION_KEY.to_owned(), "true".to_owned());
        let flag = CompletionFlag::new(Arc::new(MemoryStorage::with_entries(entries)));
        assert!(flag.has_completed());
    }

    #[test]
    fn clones_share_backend() {
        let engine_side = CompletionFlag::in_memory();
        let login_side = engine_side.clone();
        engine_side.mark_completed();
        assert!(login_side.has_completed());
        login_side.clear_completed();
        assert!(!engine_side.has_completed());
    }

    #[test]
    fn broken_storage_degrades_silently() {
        let flag = CompletionFlag::new(Arc::new(BrokenStorage));
        flag.mark_completed();
        assert!(!flag.has_completed());
        flag.clear_completed();
    }

    #[test]
    fn error_display_and_source() {
        let io = StorageError::from(std::io::Error::other("boom"));
        assert!(io.to_string().contains("boom"));
        assert!(std::error::Error::source(&io).is_some());
        let unavailable = StorageError::Unavailable("private mode".into());
        assert_eq!(unavailable.to_string(), "storage unavailable: private mode");
        assert!(std::error::Error::source(&unavailable).is_none());
    }

    #[test]
    fn debug_impls_name_backend() {
        let flag = CompletionFlag::in_memory();
        let dbg = format!("{flag:?}");
        assert!(dbg.contains("MemoryStorage"));
        assert!(dbg.contains(COMPLETION_KEY));
    }
}
