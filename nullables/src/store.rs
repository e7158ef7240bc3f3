//! Nullable store: thread-safe in-memory key-value storage for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tickity_store::{KeyValueStore, StoreError};

/// An in-memory [`KeyValueStore`] with write-failure injection.
pub struct NullStore {
    items: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent `set_item` fail with a backend error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for NullStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.lock().unwrap().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store: writes disabled".into()));
        }
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_item() {
        let store = NullStore::new();
        store.set_item("a", "1").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get_item("b").unwrap(), None);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn failing_writes_leave_store_untouched() {
        let store = NullStore::new();
        store.fail_writes(true);
        assert!(store.set_item("a", "1").is_err());
        assert_eq!(store.get_item("a").unwrap(), None);
        assert_eq!(store.write_count(), 0);
    }
}
