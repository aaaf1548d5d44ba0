//! Change notification of the storage protocol.

use std::sync::mpsc::Receiver;

use crate::Event;

/// Stream of event batches returned by [`KvWatch::watch`].
pub type WatchStream = Receiver<Vec<Event>>;

/// Change notification for an etcd-style key-value backend.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn KvWatch`.
pub trait KvWatch: Send + Sync {
    /// Watch keys under `prefix` from `revision` on.
    ///
    /// Backends that never change return a stream whose sender is already
    /// gone: `recv()` reports disconnection and no batch is ever delivered.
    fn watch(&self, prefix: &str, revision: i64) -> WatchStream;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_watch_is_object_safe() {
        fn _check(_: &dyn KvWatch) {}
    }
}
