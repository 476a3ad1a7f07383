//! Persistence adapter
//!
//! Every method returns a future, whatever the backing store, so callers
//! always await. [`MemoryStorage`] is the in-process implementation used by
//! hosts without a real store and by tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::Future;

use crate::StorageError;

/// Key/value store for setting strings
pub trait StorageAdapter {
    /// Stored string for `key`, `None` when absent
    fn get_item(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>>;

    fn set_item(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>>;

    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StorageError>>;
}

impl<S: StorageAdapter> StorageAdapter for &S {
    fn get_item(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> {
        (**self).remove_item(key)
    }
}

/// In-memory store with switchable failures
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let storage = Self::new();
        storage
            .items
            .borrow_mut()
            .extend(items.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        storage
    }

    /// Make every read fail until switched back
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Make every write and removal fail until switched back
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Stored value, bypassing failure injection
    pub fn peek(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Successful writes and removals so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn check_write(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl StorageAdapter for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.get() {
            return Err(StorageError::Read {
                key: key.to_string(),
                reason: "storage locked".to_string(),
            });
        }
        Ok(self.peek(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_write(key)?;
        tracing::trace!(key, value, "stored");
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_write(key)?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::with_items([("a", "1")]);
        smol::block_on(async {
            assert_eq!(storage.get_item("a").await, Ok(Some("1".to_string())));
            assert_eq!(storage.get_item("b").await, Ok(None));

            storage.set_item("b", "2").await.unwrap();
            storage.remove_item("a").await.unwrap();
            assert_eq!(storage.peek("a"), None);
            assert_eq!(storage.peek("b").as_deref(), Some("2"));
            assert_eq!(storage.write_count(), 2);
        });
    }

    #[test]
    fn test_injected_failures() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        storage.set_fail_reads(true);
        smol::block_on(async {
            assert!(matches!(storage.set_item("k", "v").await, Err(StorageError::Write { .. })));
            assert!(matches!(storage.get_item("k").await, Err(StorageError::Read { .. })));
        });
        assert!(storage.is_empty());
        assert_eq!(storage.write_count(), 0);

        storage.set_fail_writes(false);
        smol::block_on(storage.set_item("k", "v")).unwrap();
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_reference_is_an_adapter() {
        fn takes_adapter(storage: impl StorageAdapter) -> impl StorageAdapter {
            storage
        }
        let storage = MemoryStorage::new();
        let borrowed = takes_adapter(&storage);
        smol::block_on(borrowed.set_item("k", "v")).unwrap();
        assert_eq!(storage.peek("k").as_deref(), Some("v"));
    }
}
