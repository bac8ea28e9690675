//! Persistence port shared by draft, catalog and response stores.

use std::{collections::HashMap, sync::RwLock};

use serde::{de::DeserializeOwned, Serialize};

use crate::CoreError;

/// Key under which the single in-progress draft is stored.
pub const DRAFT_FORM_KEY: &str = "draftForm";
/// Key holding the saved-forms catalog.
pub const SAVED_FORMS_KEY: &str = "savedForms";
/// Key holding the append-only response log.
pub const FORM_RESPONSES_KEY: &str = "formResponses";

/// Abstraction over string key-value backends.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// In-process store used by tests and preview sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Reads and decodes `key`, telling an absent entry (`Ok(None)`) apart from
/// one that cannot be read or parsed (`Err`).
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, CoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| CoreError::Storage(format!("entry `{key}` is unparseable: {err}")))
}

/// Reads and decodes `key`. Missing, unreadable and unparseable entries all
/// degrade to `None`; failures are logged, never propagated.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match load_json(store, key) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring unreadable store entry");
            None
        }
    }
}

/// Encodes `value` as JSON and writes it under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), CoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupted_entries_read_as_missing() {
        let store = MemoryStore::new();
        store.set(SAVED_FORMS_KEY, "{not json").unwrap();
        let forms: Option<Vec<String>> = read_json(&store, SAVED_FORMS_KEY);
        assert!(forms.is_none());
    }

    #[test]
    fn strict_load_separates_absent_from_corrupted() {
        let store = MemoryStore::new();
        let absent: Option<Vec<String>> = load_json(&store, SAVED_FORMS_KEY).unwrap();
        assert!(absent.is_none());

        store.set(SAVED_FORMS_KEY, "{not json").unwrap();
        let corrupted = load_json::<Vec<String>>(&store, SAVED_FORMS_KEY);
        assert!(matches!(corrupted, Err(CoreError::Storage(_))));
    }

    #[test]
    fn json_helpers_round_trip() {
        let store = MemoryStore::new();
        write_json(&store, "numbers", &vec![1, 2, 3]).unwrap();
        let numbers: Option<Vec<u32>> = read_json(&store, "numbers");
        assert_eq!(numbers, Some(vec![1, 2, 3]));
        store.remove("numbers").unwrap();
        assert!(store.is_empty());
    }
}
