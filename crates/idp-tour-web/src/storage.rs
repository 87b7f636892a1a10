#![forbid(unsafe_code)]

use idp_tour_runtime::{StorageBackend, StorageError, StorageResult};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// [`StorageBackend`] over `window.localStorage`.
///
/// Browsers may refuse storage (private mode, disabled cookies); the backend
/// then reports [`StorageError::Unavailable`] on every call.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    #[must_use]
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable; tour completion will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> StorageResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage".into()))
    }
}

fn js_error(e: JsValue) -> StorageError {
    StorageError::Unavailable(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

impl StorageBackend for LocalStorage {
    fn name(&self) -> &str {
        "localStorage"
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.storage()?.remove_item(key).map_err(js_error)
    }

    fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}
