//! Write operations of the storage protocol.

use crate::{BackendError, KeyValue};

/// Write operations of an etcd-style key-value backend.
///
/// Read-only backends implement every method by returning
/// [`BackendError::Unsupported`].
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn KvWrite`.
pub trait KvWrite: Send + Sync {
    /// Create `key` with `value`. Returns the new revision.
    fn create(&self, key: &str, value: &[u8], lease: i64) -> Result<i64, BackendError>;

    /// Replace the value of `key` if it is still at `revision`.
    ///
    /// Returns `(revision, current value, updated)`.
    fn update(
        &self,
        key: &str,
        value: &[u8],
        revision: i64,
        lease: i64,
    ) -> Result<(i64, Option<KeyValue>, bool), BackendError>;

    /// Delete `key` if it is still at `revision`.
    ///
    /// Returns `(revision, deleted value, deleted)`.
    fn delete(
        &self,
        key: &str,
        revision: i64,
    ) -> Result<(i64, Option<KeyValue>, bool), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_write_is_object_safe() {
        fn _check(_: &dyn KvWrite) {}
    }
}
