//! `localStorage` backend for the summary store.
use ocean_game::KeyValueStore;
use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::dom;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<JsValue> for WebStorageError {
    fn from(value: JsValue) -> Self {
        Self::Storage(dom::js_error_message(&value))
    }
}

/// Key-value store over `window.localStorage`. The handle is looked up on
/// every call, so a store can be created before storage is reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Result<Storage, WebStorageError> {
        Ok(dom::local_storage()?)
    }
}

impl KeyValueStore for LocalStore {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(Self::storage()?.get_item(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        Self::storage()?.set_item(key, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        Self::storage()?.remove_item(key)?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, Self::Error> {
        let storage = Self::storage()?;
        let len = storage.length()?;
        let mut keys = Vec::new();
        for index in 0..len {
            if let Some(key) = storage.key(index)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
