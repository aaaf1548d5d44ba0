//! Item selection and envelope encoding.

use tracing::warn;

use crate::manifest::ManifestObject;
use crate::{KeyValue, PLACEHOLDER_LEASE, Resource};

/// Keep the objects whose `metadata.name` equals `resource.name`.
///
/// Objects without a name are skipped and never match.
pub fn select(items: Vec<ManifestObject>, resource: &Resource) -> Vec<ManifestObject> {
    items
        .into_iter()
        .filter(|item| match item.name() {
            Some(name) => name.as_str() == Some(resource.name.as_str()),
            None => {
                warn!(kind = %item.kind, "item does not have a name value");
                false
            }
        })
        .collect()
}

/// Encode each object as canonical JSON under `key`.
///
/// An object that fails to serialize is logged and left out of the batch.
pub fn encode(items: &[ManifestObject], key: &str, revision: i64) -> Vec<KeyValue> {
    items
        .iter()
        .filter_map(|item| match serde_json::to_vec(item) {
            Ok(value) => Some(KeyValue::new(key, value, revision, PLACEHOLDER_LEASE)),
            Err(e) => {
                warn!(key, error = %e, "unable to re-marshal item");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn item(metadata: Value) -> ManifestObject {
        serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": metadata,
        }))
        .unwrap()
    }

    #[test]
    fn select_matches_exact_name() {
        let items = vec![
            item(json!({"name": "etcd-1"})),
            item(json!({"name": "etcd-10"})),
            item(json!({"name": "etcd-1", "namespace": "other"})),
        ];
        let selected = select(items, &Resource::new("kube-system", "etcd-1"));
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|i| i.name() == Some(&json!("etcd-1"))));
    }

    #[test]
    fn select_skips_nameless_and_non_string_names() {
        let items = vec![item(json!({})), item(json!({"name": 5}))];
        assert!(select(items, &Resource::new("", "5")).is_empty());
    }

    #[test]
    fn nameless_item_never_matches_empty_name() {
        let items = vec![item(json!({"namespace": "a"}))];
        assert!(select(items, &Resource::default()).is_empty());
    }

    #[test]
    fn encode_wraps_each_item() {
        let items = vec![item(json!({"name": "a"})), item(json!({"name": "b"}))];
        let kvs = encode(&items, "/registry/pods/ns", 1);
        assert_eq!(kvs.len(), 2);
        for kv in &kvs {
            assert_eq!(kv.key, "/registry/pods/ns");
            assert_eq!(kv.create_revision, 1);
            assert_eq!(kv.mod_revision, 1);
            assert_eq!(kv.lease, PLACEHOLDER_LEASE);
        }
        let decoded: Value = kvs[1].decode().unwrap();
        assert_eq!(decoded["metadata"]["name"], "b");
    }

    #[test]
    fn encode_is_canonical() {
        let kvs = encode(&[item(json!({"namespace": "x", "name": "a"}))], "/k", 1);
        assert_eq!(
            std::str::from_utf8(&kvs[0].value).unwrap(),
            r#"{"apiVersion":"v1","kind":"Pod","metadata":{"name":"a","namespace":"x"}}"#
        );
    }
}
