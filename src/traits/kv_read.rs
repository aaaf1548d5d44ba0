//! Read operations of the storage protocol.

use crate::{BackendError, KeyValue};

/// Read operations of an etcd-style key-value backend.
///
/// All methods use `&self`. Backends manage their own synchronization.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so a server can share one
/// backend between request handlers.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn KvRead`.
pub trait KvRead: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// Returns the store revision and the envelope, or `None` when the key is
    /// outside the backend's address space.
    ///
    /// # Errors
    ///
    /// - [`BackendError::ValueNotFound`] if the key is addressable but holds no value
    fn get(&self, key: &str, revision: i64) -> Result<(i64, Option<KeyValue>), BackendError>;

    /// Fetch every value under `prefix`, starting from `start_key`.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Key prefix of the collection
    /// * `start_key` - Key the range starts at
    /// * `limit` - Maximum number of entries (`0` = unlimited, backend-specific)
    /// * `revision` - Revision to read at (`0` = latest)
    fn list(
        &self,
        prefix: &str,
        start_key: &str,
        limit: i64,
        revision: i64,
    ) -> Result<(i64, Vec<KeyValue>), BackendError>;

    /// Count the keys under `prefix`. Returns `(revision, count)`.
    fn count(&self, prefix: &str) -> Result<(i64, i64), BackendError>;

    /// Size of the backing store in bytes.
    fn db_size(&self) -> Result<i64, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_read_is_object_safe() {
        fn _check(_: &dyn KvRead) {}
    }

    #[test]
    fn kv_read_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: KvRead>() {
            _assert_send_sync::<T>();
        }
    }
}
