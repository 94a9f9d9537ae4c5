use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

use chatbox_model::{DurableStore, ErrorKind, StoreError};

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl StoreError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct StoreInner {
    values: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// An in-memory durable store.
///
/// Reads and writes can be made to fail on demand, which is how tests
/// exercise the persistence error paths.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl MemoryStore {
    #[inline]
    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("store lock poisoned")
    }

    /// Makes every following `set` and `remove` fail (or succeed again).
    #[inline]
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Makes every following `get` fail (or succeed again).
    #[inline]
    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Seeds a raw value, bypassing failure injection.
    pub fn insert_raw<K: Into<String>, V: Into<String>>(&self, key: K, value: V) {
        self.lock().values.insert(key.into(), value.into());
    }

    /// Peeks at a raw value, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Returns how many successful `set` calls have been made.
    #[inline]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }
}

impl DurableStore for MemoryStore {
    type Error = crate::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let inner = self.lock();
        if inner.fail_reads {
            return Err(Error {
                message: "reads are disabled",
                kind: ErrorKind::Unavailable,
            });
        }
        Ok(inner.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(Error {
                message: "writes are disabled",
                kind: ErrorKind::QuotaExceeded,
            });
        }
        inner.values.insert(key.to_owned(), value.to_owned());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(Error {
                message: "writes are disabled",
                kind: ErrorKind::Unavailable,
            });
        }
        inner.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_injection() {
        let store = MemoryStore::default();
        let mut handle = store.clone();

        handle.set("chat", "[]").unwrap();
        assert_eq!(store.raw("chat").as_deref(), Some("[]"));
        assert_eq!(store.write_count(), 1);

        store.set_fail_writes(true);
        let err = handle.set("chat", "[1]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QuotaExceeded);
        assert_eq!(handle.get("chat").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.write_count(), 1);

        store.set_fail_reads(true);
        assert_eq!(
            handle.get("chat").unwrap_err().kind(),
            ErrorKind::Unavailable
        );
    }
}
