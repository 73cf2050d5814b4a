//! Key/value storage with browser `localStorage` semantics.
//!
//! Values are strings; missing keys read as `None`; `key(i)` indexes the
//! keys in sorted order.

use std::collections::BTreeMap;
use std::sync::RwLock;

/// Synchronous string key/value storage.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
    fn remove_item(&self, key: &str);
    fn clear(&self);
    /// Key at position `index`, if any.
    fn key(&self, index: usize) -> Option<String>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys starting with `prefix`.
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        (0..self.len())
            .filter_map(|i| self.key(i))
            .filter(|k| k.starts_with(prefix))
            .collect()
    }
}

/// Process-local storage backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

// Writes replace whole values, so a poisoned map is still consistent.
impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.remove(key);
    }

    fn clear(&self) {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.clear();
    }

    fn key(&self, index: usize) -> Option<String> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.keys().nth(index).cloned()
    }

    fn len(&self) -> usize {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.len()
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect()
    }
}
