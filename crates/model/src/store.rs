use std::error::Error;

use crate::error::ErrorKind;

/// The error type for a durable store.
pub trait StoreError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// Generic key-value persistence supplied by the host.
///
/// Values are opaque strings. Implementations should make `set` atomic
/// per key: after a failed `set`, `get` must still return the previous
/// value (or nothing, if there was none).
pub trait DurableStore: Send + 'static {
    /// The error type that may be returned by the store.
    type Error: StoreError;

    /// Reads the value stored under `key`, or `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replaces the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Removes the value stored under `key`. Removing an absent key is
    /// not an error.
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}
