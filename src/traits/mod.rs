//! # Storage-Protocol Traits
//!
//! The trait surface an etcd-style server dispatches requests to.
//!
//! ## Components
//!
//! ```text
//! KvRead + KvWrite + KvWatch = Backend
//! ```
//!
//! | Trait | Methods |
//! |-------|---------|
//! | [`KvRead`] | `get`, `list`, `count`, `db_size` |
//! | [`KvWrite`] | `create`, `update`, `delete` |
//! | [`KvWatch`] | `watch` |
//!
//! ## Blanket Implementation
//!
//! [`Backend`] is implemented for every type that implements the three
//! component traits:
//!
//! ```rust
//! use mustgather_backend::{Backend, BackendError, KeyValue, KvRead, KvWatch, KvWrite, WatchStream};
//!
//! struct Empty;
//!
//! # impl KvRead for Empty {
//! #     fn get(&self, _: &str, _: i64) -> Result<(i64, Option<KeyValue>), BackendError> { Ok((1, None)) }
//! #     fn list(&self, _: &str, _: &str, _: i64, _: i64) -> Result<(i64, Vec<KeyValue>), BackendError> { Ok((1, vec![])) }
//! #     fn count(&self, _: &str) -> Result<(i64, i64), BackendError> { Ok((1, 0)) }
//! #     fn db_size(&self) -> Result<i64, BackendError> { Ok(0) }
//! # }
//! # impl KvWrite for Empty {
//! #     fn create(&self, _: &str, _: &[u8], _: i64) -> Result<i64, BackendError> { Ok(1) }
//! #     fn update(&self, _: &str, _: &[u8], _: i64, _: i64) -> Result<(i64, Option<KeyValue>, bool), BackendError> { Ok((1, None, false)) }
//! #     fn delete(&self, _: &str, _: i64) -> Result<(i64, Option<KeyValue>, bool), BackendError> { Ok((1, None, false)) }
//! # }
//! # impl KvWatch for Empty {
//! #     fn watch(&self, _: &str, _: i64) -> WatchStream { std::sync::mpsc::channel().1 }
//! # }
//!
//! fn serve(_backend: &dyn Backend) {}
//! serve(&Empty);
//! ```

mod kv_read;
mod kv_watch;
mod kv_write;

pub use kv_read::KvRead;
pub use kv_watch::{KvWatch, WatchStream};
pub use kv_write::KvWrite;

/// A complete storage-protocol backend.
///
/// # Blanket Implementation
///
/// Automatically implemented for any type implementing [`KvRead`],
/// [`KvWrite`] and [`KvWatch`]. Never implement it directly.
pub trait Backend: KvRead + KvWrite + KvWatch {}

impl<T: KvRead + KvWrite + KvWatch> Backend for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_is_object_safe() {
        fn _check(_: &dyn Backend) {}
    }

    #[test]
    fn backend_is_blanket_implemented() {
        fn _check<T: KvRead + KvWrite + KvWatch>() {
            fn _is_backend<B: Backend>() {}
            _is_backend::<T>();
        }
    }
}
