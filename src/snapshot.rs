//! Snapshot root discovery and namespace enumeration.

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::BackendError;
use crate::manifest::sorted_children;

/// Directory holding one subdirectory per namespace.
pub const NAMESPACES_DIR: &str = "namespaces";

/// Name fragment of the image directory `oc adm must-gather` nests the dump under.
pub const ARCHIVE_DIR_MARKER: &str = "quay-io-openshift-release-dev-ocp-v4-0-art-dev-sha256-";

/// Locate the directory that holds `namespaces/`.
///
/// `provided` is accepted as-is if it directly contains `namespaces/`;
/// otherwise the first archive-named child directory (by name) is used.
///
/// # Errors
///
/// - [`BackendError::SnapshotRootNotFound`] if neither is present
/// - [`BackendError::NotFound`] / [`BackendError::Io`] if `provided` cannot be listed
pub fn find_snapshot_root(provided: &Path) -> Result<PathBuf, BackendError> {
    for child in sorted_children(provided)? {
        if !child.is_dir() {
            continue;
        }
        let Some(name) = child.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.contains(ARCHIVE_DIR_MARKER) {
            return Ok(child);
        }
        if name == NAMESPACES_DIR {
            return Ok(provided.to_path_buf());
        }
    }

    error!(path = %provided.display(), "unable to locate must-gather");
    Err(BackendError::SnapshotRootNotFound {
        path: provided.to_path_buf(),
    })
}

/// List every namespace in the snapshot, sorted by name.
///
/// Only directories count; stray files under `namespaces/` are ignored.
///
/// # Errors
///
/// - [`BackendError::NamespacesMissing`] if `root/namespaces` does not exist
pub fn namespaces(root: &Path) -> Result<Vec<String>, BackendError> {
    let dir = root.join(NAMESPACES_DIR);
    let children = sorted_children(&dir).map_err(|e| {
        error!(path = %dir.display(), error = %e, "error collecting namespaces");
        match e {
            BackendError::NotFound { path } => BackendError::NamespacesMissing { path },
            other => other,
        }
    })?;

    let namespaces: Vec<String> = children
        .iter()
        .filter(|p| p.is_dir())
        .filter_map(|p| p.file_name()?.to_str().map(str::to_owned))
        .collect();
    debug!(?namespaces, "namespaces list");
    Ok(namespaces)
}
