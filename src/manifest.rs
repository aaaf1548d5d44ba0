//! # Manifest Loading
//!
//! Reads Kubernetes manifests out of the snapshot.
//!
//! Must-gather dumps some kinds as one YAML file per object and others as a
//! single `*List` file, so the shape is detected per file:
//!
//! ```text
//! file  ──▶ parse as ManifestCollection ──▶ kind contains "List"? ──▶ items
//!                                                 │ no
//!                                                 ▼
//!                                      parse as ManifestObject ──▶ [item]
//! dir   ──▶ every non-directory child, sorted by name, concatenated
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::BackendError;

/// One Kubernetes object as loaded from disk.
///
/// Top-level fields other than the named ones (`data`, `type`, `rules`, ...)
/// are kept in [`extra`](Self::extra) and written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestObject {
    /// API group and version.
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    /// Object kind.
    #[serde(default)]
    pub kind: String,
    /// Object metadata; `name` identifies the object.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Desired state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<Value>,
    /// Observed state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    /// Remaining top-level fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ManifestObject {
    /// `metadata.name`, if present. Not necessarily a string.
    pub fn name(&self) -> Option<&Value> {
        self.metadata.get("name")
    }

    /// `metadata.namespace` when it is a string.
    pub fn namespace(&self) -> Option<&str> {
        self.metadata.get("namespace").and_then(Value::as_str)
    }
}

/// The `*List` wrapper format. Only exists while loading.
#[derive(Debug, Default, Deserialize)]
struct ManifestCollection {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    items: Vec<ManifestObject>,
}

/// Load every object at `path`, which may be a manifest file or a directory of them.
///
/// # Errors
///
/// - [`BackendError::NotFound`] if `path` does not exist
/// - [`BackendError::Parse`] if a file is neither a List nor a single object
/// - [`BackendError::Io`] for other read failures
pub fn load(path: &Path) -> Result<Vec<ManifestObject>, BackendError> {
    let meta = std::fs::metadata(path).map_err(|e| BackendError::io("stat", path, e))?;
    if meta.is_dir() {
        load_dir(path)
    } else {
        load_file(path)
    }
}

/// Load every non-directory child of `dir`, in file-name order.
///
/// Nested directories are skipped. The first file that fails fails the whole call.
pub fn load_dir(dir: &Path) -> Result<Vec<ManifestObject>, BackendError> {
    let mut files = Vec::new();
    for path in sorted_children(dir)? {
        if path.is_dir() {
            continue;
        }
        debug!(path = %path.display(), "adding file to processing list");
        files.push(path);
    }

    let mut items = Vec::new();
    for file in files {
        items.extend(load_file(&file)?);
    }
    debug!(dir = %dir.display(), count = items.len(), "completed folder processing");
    Ok(items)
}

/// Load one manifest file.
pub fn load_file(path: &Path) -> Result<Vec<ManifestObject>, BackendError> {
    debug!(path = %path.display(), "loading manifest");
    let text = std::fs::read_to_string(path).map_err(|e| BackendError::io("read", path, e))?;
    parse(&text).map_err(|e| BackendError::Parse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}

/// Parse manifest text, flattening a `*List` wrapper.
pub fn parse(text: &str) -> Result<Vec<ManifestObject>, serde_yaml::Error> {
    let collection: ManifestCollection = serde_yaml::from_str(text)?;
    if collection.kind.contains("List") {
        return Ok(collection.items);
    }
    let object: ManifestObject = serde_yaml::from_str(text)?;
    Ok(vec![object])
}

/// Direct children of `dir`, sorted by file name.
pub(crate) fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>, BackendError> {
    let entries = std::fs::read_dir(dir).map_err(|e| BackendError::io("read_dir", dir, e))?;
    let mut children = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| BackendError::io("read_dir", dir, e))?;
    children.sort();
    Ok(children)
}
