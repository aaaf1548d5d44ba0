//! # Extension Traits
//!
//! Convenience methods for storage-protocol backends.
//!
//! [`KvReadJson`] decodes envelope values straight into caller types. It is
//! blanket-implemented, so any [`KvRead`] backend gets it for free.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`get_json`](KvReadJson::get_json) | `get` and decode the value |
//! | [`list_json`](KvReadJson::list_json) | `list` and decode every value |

use serde::de::DeserializeOwned;

use crate::{BackendError, KvRead};

/// JSON decoding on top of [`KvRead`].
///
/// # Example
///
/// ```rust
/// use mustgather_backend::{BackendError, KvRead, KvReadJson};
///
/// fn pod_phase<B: KvRead>(backend: &B, key: &str) -> Result<Option<String>, BackendError> {
///     let pod: Option<serde_json::Value> = backend.get_json(key)?;
///     Ok(pod.and_then(|p| p["status"]["phase"].as_str().map(str::to_owned)))
/// }
/// ```
pub trait KvReadJson: KvRead {
    /// Get the latest value of `key` and decode it.
    ///
    /// # Errors
    ///
    /// - errors of [`KvRead::get`]
    /// - [`BackendError::Parse`] if the value is not valid JSON for `T`
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BackendError> {
        let (_, kv) = self.get(key, 0)?;
        kv.map(|kv| {
            kv.decode().map_err(|e| BackendError::Parse {
                path: kv.key.clone().into(),
                details: e.to_string(),
            })
        })
        .transpose()
    }

    /// List every value under `prefix` starting at `start_key` and decode them.
    ///
    /// # Errors
    ///
    /// - errors of [`KvRead::list`]
    /// - [`BackendError::Parse`] for the first value that does not decode
    fn list_json<T: DeserializeOwned>(
        &self,
        prefix: &str,
        start_key: &str,
    ) -> Result<Vec<T>, BackendError> {
        let (_, kvs) = self.list(prefix, start_key, 0, 0)?;
        kvs.iter()
            .map(|kv| {
                kv.decode().map_err(|e| BackendError::Parse {
                    path: kv.key.clone().into(),
                    details: e.to_string(),
                })
            })
            .collect()
    }
}

impl<B: KvRead + ?Sized> KvReadJson for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyValue;
    use serde_json::Value;

    struct Fixed(Vec<KeyValue>);

    impl KvRead for Fixed {
        fn get(&self, _: &str, _: i64) -> Result<(i64, Option<KeyValue>), BackendError> {
            Ok((1, self.0.first().cloned()))
        }
        fn list(&self, _: &str, _: &str, _: i64, _: i64) -> Result<(i64, Vec<KeyValue>), BackendError> {
            Ok((1, self.0.clone()))
        }
        fn count(&self, _: &str) -> Result<(i64, i64), BackendError> {
            Ok((1, self.0.len() as i64))
        }
        fn db_size(&self) -> Result<i64, BackendError> {
            Ok(0)
        }
    }

    #[test]
    fn get_json_decodes() {
        let fixed = Fixed(vec![KeyValue::new("/k", br#"{"a":1}"#.to_vec(), 1, 10)]);
        let value: Option<Value> = fixed.get_json("/k").unwrap();
        assert_eq!(value.unwrap()["a"], 1);
    }

    #[test]
    fn get_json_absent_is_none() {
        let value: Option<Value> = Fixed(vec![]).get_json("/k").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn list_json_reports_bad_value() {
        let fixed = Fixed(vec![
            KeyValue::new("/k/a", b"{}".to_vec(), 1, 10),
            KeyValue::new("/k/b", b"not json".to_vec(), 1, 10),
        ]);
        let err = fixed.list_json::<Value>("/k", "/k/").unwrap_err();
        assert!(matches!(err, BackendError::Parse { .. }));
    }
}
