//! # MustGather Backend
//!
//! Serves Kubernetes objects out of a must-gather snapshot through the
//! storage-protocol traits.
//!
//! ## Request Flow
//!
//! ```text
//! key ──▶ BindingTable::resolve ──▶ template path ──▶ manifest::load
//!                                                         │
//!                   KeyValue ◀── codec::encode ◀── codec::select (get only)
//! ```
//!
//! Keys no binding covers yield an empty success, so an API server asking for
//! a resource family the bindings do not describe keeps running. Every
//! mutating call fails with [`BackendError::Unsupported`].

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use tracing::{debug, error, info};

use crate::binding::{Resolution, ResourceBinding};
use crate::{
    BackendError, BindingTable, Config, DB_SIZE_PLACEHOLDER, HEALTH_LEASE, HEALTH_PAYLOAD,
    KeyValue, KvRead, KvWatch, KvWrite, Resource, SYNTHETIC_REVISION, UNBOUND_REVISION,
    WatchStream, codec, manifest, snapshot,
};

/// Read-only backend over a must-gather snapshot.
///
/// Built once; afterwards it holds no mutable state, so a single instance can
/// serve concurrent requests through `&self` (e.g. behind an `Arc`).
///
/// # Example
///
/// ```rust,no_run
/// use mustgather_backend::{Config, KvRead, MustGather};
///
/// let backend = MustGather::new(Config::from_env())?;
/// let (_rev, kv) = backend.get("/kubernetes.io/health", 0)?;
/// assert!(kv.is_some());
/// # Ok::<(), mustgather_backend::BackendError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MustGather {
    root: PathBuf,
    health_key: String,
    bindings: BindingTable,
}

impl MustGather {
    /// Locate the snapshot and load the binding file named by `config`.
    ///
    /// # Errors
    ///
    /// - [`BackendError::SnapshotRootNotFound`] if the snapshot layout is not recognized
    /// - binding file read, parse and compile errors
    pub fn new(config: Config) -> Result<Self, BackendError> {
        let root = snapshot::find_snapshot_root(&config.snapshot_root)?;
        let bindings = BindingTable::from_yaml_file(&config.binding_file)?;
        info!(
            root = %root.display(),
            bindings = bindings.len(),
            "must-gather backend ready"
        );
        Ok(Self::with_bindings(root, config.health_key, bindings))
    }

    /// Assemble a backend from parts. `root` is used as-is, without discovery.
    pub fn with_bindings(
        root: impl Into<PathBuf>,
        health_key: impl Into<String>,
        bindings: BindingTable,
    ) -> Self {
        Self {
            root: root.into(),
            health_key: health_key.into(),
            bindings,
        }
    }

    /// Directory holding `namespaces/`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The binding table.
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Path a binding renders for `resource`.
    pub fn path_for(&self, binding: &ResourceBinding, resource: &Resource) -> PathBuf {
        binding.path_for(&self.root, resource)
    }

    fn health(&self, key: &str) -> KeyValue {
        KeyValue::new(
            key,
            HEALTH_PAYLOAD.to_vec(),
            SYNTHETIC_REVISION,
            HEALTH_LEASE,
        )
    }

    /// Namespaces a list request has to visit.
    fn scan_namespaces(
        &self,
        binding: &ResourceBinding,
        resource: &Resource,
    ) -> Result<Vec<String>, BackendError> {
        if resource.namespace.is_empty() && binding.is_namespaced() {
            snapshot::namespaces(&self.root)
        } else {
            Ok(vec![resource.namespace.clone()])
        }
    }
}

impl KvRead for MustGather {
    fn get(&self, key: &str, _revision: i64) -> Result<(i64, Option<KeyValue>), BackendError> {
        if key == self.health_key {
            return Ok((SYNTHETIC_REVISION, Some(self.health(key))));
        }

        debug!(key, "get");
        let (binding, resource) = match self.bindings.resolve(key) {
            Resolution::Unbound => {
                debug!(key, "resource binding not found");
                return Ok((UNBOUND_REVISION, None));
            }
            Resolution::Bound { binding, resource } => (binding, resource),
        };

        let path = self.path_for(binding, &resource);
        let items = match manifest::load(&path) {
            Ok(items) => items,
            Err(BackendError::NotFound { .. }) => {
                debug!(key, path = %path.display(), "file is not present");
                return Err(BackendError::ValueNotFound { key: key.into() });
            }
            Err(e) => {
                error!(key, path = %path.display(), error = %e, "error while loading objects");
                return Err(e);
            }
        };

        let selected = codec::select(items, &resource);
        codec::encode(&selected, key, SYNTHETIC_REVISION)
            .into_iter()
            .next()
            .map(|kv| (SYNTHETIC_REVISION, Some(kv)))
            .ok_or_else(|| BackendError::ValueNotFound { key: key.into() })
    }

    fn list(
        &self,
        prefix: &str,
        start_key: &str,
        _limit: i64,
        _revision: i64,
    ) -> Result<(i64, Vec<KeyValue>), BackendError> {
        debug!(prefix, start_key, "list");
        let (binding, resource) = match self.bindings.resolve(start_key) {
            Resolution::Unbound => {
                info!(start_key, "resource binding not found");
                return Ok((UNBOUND_REVISION, Vec::new()));
            }
            Resolution::Bound { binding, resource } => (binding, resource),
        };

        let namespaces = self.scan_namespaces(binding, &resource)?;
        let mut kvs = Vec::new();
        for namespace in namespaces {
            let path = self.path_for(binding, &Resource::in_namespace(namespace.as_str()));
            let items = match manifest::load(&path) {
                Ok(items) => items,
                Err(BackendError::NotFound { .. }) => {
                    debug!(namespace = %namespace, path = %path.display(), "file is missing, skipping");
                    continue;
                }
                Err(e) => {
                    error!(namespace = %namespace, path = %path.display(), error = %e, "error while loading objects");
                    return Err(e);
                }
            };
            let key = format!("{prefix}/{namespace}");
            kvs.extend(codec::encode(&items, &key, SYNTHETIC_REVISION));
        }

        Ok((SYNTHETIC_REVISION, kvs))
    }

    fn count(&self, prefix: &str) -> Result<(i64, i64), BackendError> {
        debug!(prefix, "count");
        Err(BackendError::Unsupported { operation: "count" })
    }

    fn db_size(&self) -> Result<i64, BackendError> {
        debug!("db_size");
        Ok(DB_SIZE_PLACEHOLDER)
    }
}

impl KvWrite for MustGather {
    fn create(&self, key: &str, _value: &[u8], _lease: i64) -> Result<i64, BackendError> {
        debug!(key, "create");
        Err(BackendError::Unsupported {
            operation: "create",
        })
    }

    fn update(
        &self,
        key: &str,
        _value: &[u8],
        _revision: i64,
        _lease: i64,
    ) -> Result<(i64, Option<KeyValue>, bool), BackendError> {
        debug!(key, "update");
        Err(BackendError::Unsupported {
            operation: "update",
        })
    }

    fn delete(
        &self,
        key: &str,
        _revision: i64,
    ) -> Result<(i64, Option<KeyValue>, bool), BackendError> {
        debug!(key, "delete");
        Err(BackendError::Unsupported {
            operation: "delete",
        })
    }
}

impl KvWatch for MustGather {
    fn watch(&self, prefix: &str, _revision: i64) -> WatchStream {
        debug!(prefix, "watch");
        let (_tx, rx) = mpsc::channel();
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BindingSpec;
    use std::fs;

    const HEALTH: &str = "/kubernetes.io/health";

    fn backend(root: &Path, specs: &[BindingSpec]) -> MustGather {
        MustGather::with_bindings(root, HEALTH, BindingTable::compile(specs).unwrap())
    }

    #[test]
    fn health_key_short_circuits() {
        let tmp = tempfile::tempdir().unwrap();
        let mg = backend(tmp.path(), &[]);
        let (rev, kv) = mg.get(HEALTH, 0).unwrap();
        let kv = kv.unwrap();
        assert_eq!(rev, 1);
        assert_eq!(kv.value, br#"{"health":"true"}"#);
        assert_eq!(kv.lease, 1);
    }

    #[test]
    fn unbound_get_and_list_are_empty_successes() {
        let tmp = tempfile::tempdir().unwrap();
        let mg = backend(tmp.path(), &[BindingSpec::new("^/registry/pods/", "x", "Pod")]);
        assert_eq!(mg.get("/registry/secrets/a/b", 0).unwrap(), (2, None));
        assert_eq!(
            mg.list("/registry/secrets", "/registry/secrets/", 0, 0).unwrap(),
            (2, Vec::new())
        );
    }

    #[test]
    fn get_absent_file_is_value_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let mg = backend(
            tmp.path(),
            &[BindingSpec::new(
                "^/registry/pods/(?P<namespace>[^/]+)/(?P<name>[^/]+)$",
                "namespaces/{{.Namespace}}/pods/{{.Name}}.yaml",
                "Pod",
            )],
        );
        let err = mg.get("/registry/pods/a/b", 0).unwrap_err();
        assert!(matches!(err, BackendError::ValueNotFound { .. }));
    }

    #[test]
    fn get_parse_error_surfaces() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("node.yaml"), "not: [valid").unwrap();
        let mg = backend(
            tmp.path(),
            &[BindingSpec::new("^/registry/minions/(?P<name>.+)$", "node.yaml", "Node")],
        );
        let err = mg.get("/registry/minions/n1", 0).unwrap_err();
        assert!(matches!(err, BackendError::Parse { .. }));
    }

    #[test]
    fn list_fails_when_namespaces_root_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let mg = backend(
            tmp.path(),
            &[BindingSpec::new(
                "^/registry/pods/?$",
                "namespaces/{{.Namespace}}/core/pods.yaml",
                "PodList",
            )],
        );
        let err = mg.list("/registry/pods", "/registry/pods/", 0, 0).unwrap_err();
        assert!(matches!(err, BackendError::NamespacesMissing { .. }));
    }

    #[test]
    fn mutations_are_unsupported() {
        let tmp = tempfile::tempdir().unwrap();
        let mg = backend(tmp.path(), &[]);
        assert!(matches!(
            mg.create("/k", b"v", 0),
            Err(BackendError::Unsupported { operation: "create" })
        ));
        assert!(matches!(
            mg.update("/k", b"v", 1, 0),
            Err(BackendError::Unsupported { operation: "update" })
        ));
        assert!(matches!(
            mg.delete("/k", 1),
            Err(BackendError::Unsupported { operation: "delete" })
        ));
        assert!(matches!(
            mg.count("/k"),
            Err(BackendError::Unsupported { operation: "count" })
        ));
    }

    #[test]
    fn watch_never_delivers() {
        let tmp = tempfile::tempdir().unwrap();
        let mg = backend(tmp.path(), &[]);
        let rx = mg.watch("/registry/pods", 0);
        assert!(rx.recv().is_err());
    }

    #[test]
    fn db_size_is_placeholder() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(backend(tmp.path(), &[]).db_size().unwrap(), 0);
    }
}
