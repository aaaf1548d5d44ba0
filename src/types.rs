//! Core types for the storage-protocol surface.

/// Revision reported for every value served from the snapshot.
///
/// The snapshot has no change history, so this never increments.
pub const SYNTHETIC_REVISION: i64 = 1;

/// Revision reported when a key falls outside every configured binding.
pub const UNBOUND_REVISION: i64 = 2;

/// Lease attached to envelopes built from manifests. Carries no expiry.
pub const PLACEHOLDER_LEASE: i64 = 10;

/// Lease attached to the health-check envelope.
pub const HEALTH_LEASE: i64 = 1;

/// Value returned for the health-check key.
pub const HEALTH_PAYLOAD: &[u8] = br#"{"health":"true"}"#;

/// Size reported by `db_size`.
pub const DB_SIZE_PLACEHOLDER: i64 = 0;

/// A key-value envelope as returned to storage-protocol callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// The key this value was served under.
    pub key: String,
    /// Revision at which the key was created.
    pub create_revision: i64,
    /// Revision at which the key was last modified.
    pub mod_revision: i64,
    /// Canonical JSON encoding of one object.
    pub value: Vec<u8>,
    /// Lease identifier.
    pub lease: i64,
}

impl KeyValue {
    /// Build an envelope whose create and mod revisions are both `revision`.
    pub fn new(key: impl Into<String>, value: Vec<u8>, revision: i64, lease: i64) -> Self {
        Self {
            key: key.into(),
            create_revision: revision,
            mod_revision: revision,
            value,
            lease,
        }
    }

    /// Decode the value as JSON.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.value)
    }
}

/// A watch notification.
///
/// Snapshot backends never emit these; the type completes the watch signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The key was created by this event.
    pub create: bool,
    /// The key was deleted by this event.
    pub delete: bool,
    /// The key-value after the event.
    pub kv: KeyValue,
    /// The key-value before the event, if known.
    pub prev_kv: Option<KeyValue>,
}

/// Identity of the object addressed by a request key.
///
/// Empty fields mean the key did not name them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Resource {
    /// Object name (`metadata.name`).
    pub name: String,
    /// Object namespace; empty for cluster-scoped objects or all-namespace scans.
    pub namespace: String,
}

impl Resource {
    /// Create a resource identity.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// A resource addressing a whole namespace, with no name.
    pub fn in_namespace(namespace: impl Into<String>) -> Self {
        Self::new(namespace, String::new())
    }
}
