//! # mustgather-backend
//!
//! A **read-only etcd-style key-value backend** that serves Kubernetes objects
//! from a must-gather snapshot instead of a live cluster store.
//!
//! An API server pointed at this backend issues the same `get`/`list` calls it
//! would send to etcd. Each key is matched against a table of resource
//! bindings, rendered into a path inside the snapshot, and the manifests found
//! there are re-encoded as key-value envelopes with synthetic revisions.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mustgather_backend::{Config, KvRead, MustGather};
//!
//! // KINE_MUSTGATHER_DIR, KINE_RESOURCE_BINDING and KINE_HEALTH_ENDPOINT
//! // override the defaults.
//! let backend = MustGather::new(Config::from_env())?;
//!
//! let (_rev, pod) = backend.get("/registry/pods/kube-system/etcd-master-0", 0)?;
//! let (_rev, pods) = backend.list("/registry/pods", "/registry/pods/", 0, 0)?;
//! # Ok::<(), mustgather_backend::BackendError>(())
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Backend`] | Full storage-protocol surface ([`KvRead`] + [`KvWrite`] + [`KvWatch`]) |
//! | [`MustGather`] | The snapshot-backed implementation |
//! | [`BindingTable`] | Ordered key-pattern → path-template rules |
//! | [`PathTemplate`] | Compiled `{{.Namespace}}`/`{{.Name}}` path template |
//! | [`ManifestObject`] | One Kubernetes object loaded from disk |
//! | [`KeyValue`] | Envelope returned to callers |
//! | [`BackendError`] | Error type with context |
//!
//! ---
//!
//! ## Error Handling
//!
//! All operations return `Result<T, BackendError>`. A key outside every
//! binding is **not** an error:
//!
//! ```rust
//! use mustgather_backend::{BindingTable, KvRead, KvWrite, MustGather};
//!
//! let backend = MustGather::with_bindings("/nonexistent", "/health", BindingTable::default());
//! assert_eq!(backend.get("/registry/unknown/x", 0).unwrap(), (2, None));
//! assert!(backend.create("/registry/unknown/x", b"{}", 0).is_err());
//! ```
//!
//! ---
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` and take `&self`. A [`MustGather`] holds
//! no mutable state after construction, so it can be shared across threads
//! with `Arc` and queried concurrently without locking.

// Private modules
mod backend;
mod binding;
mod codec;
mod config;
mod error;
mod ext;
mod manifest;
mod snapshot;
mod template;
mod traits;
mod types;

// Public re-exports - error types
pub use error::BackendError;

// Public re-exports - core types
pub use types::{
    DB_SIZE_PLACEHOLDER, Event, HEALTH_LEASE, HEALTH_PAYLOAD, KeyValue, PLACEHOLDER_LEASE,
    Resource, SYNTHETIC_REVISION, UNBOUND_REVISION,
};

// Public re-exports - protocol traits
pub use traits::{Backend, KvRead, KvWatch, KvWrite, WatchStream};

// Public re-exports - binding table and path templates
pub use binding::{BindingSpec, BindingTable, Resolution, ResourceBinding};
pub use template::PathTemplate;

// Public re-exports - snapshot access
pub use codec::{encode, select};
pub use manifest::{ManifestObject, load as load_manifests};
pub use snapshot::{find_snapshot_root, namespaces};

// Public re-exports - backend and configuration
pub use backend::MustGather;
pub use config::{Config, ENV_BINDING_FILE, ENV_HEALTH_KEY, ENV_SNAPSHOT_ROOT};

// Public re-exports - infrastructure
pub use ext::KvReadJson;
