//! Error types for the must-gather key-value backend.

use std::path::{Path, PathBuf};

/// Backend error type with contextual variants.
///
/// Request-time failures carry the key or path that caused them; configuration
/// failures are reported by [`MustGather::new`](crate::MustGather::new) and
/// [`BindingTable`](crate::BindingTable) construction instead of aborting the
/// process. Uses `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use mustgather_backend::BackendError;
/// use std::path::PathBuf;
///
/// let err = BackendError::NotFound { path: PathBuf::from("/must-gather/namespaces/x") };
/// assert!(err.to_string().contains("/must-gather/namespaces/x"));
/// assert!(err.is_not_found());
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    // Request Errors
    /// Path in the snapshot does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A binding matched the key, but no loaded object carries the requested name.
    #[error("that value does not exist: {key}")]
    ValueNotFound {
        /// The requested key.
        key: String,
    },

    /// Manifest content is neither a List nor a single object.
    #[error("invalid manifest: {path} ({details})")]
    Parse {
        /// The manifest file that failed to parse.
        path: PathBuf,
        /// Parser message.
        details: String,
    },

    /// The snapshot has no `namespaces/` directory.
    #[error("snapshot has no namespaces directory: {path}")]
    NamespacesMissing {
        /// The expected namespaces root.
        path: PathBuf,
    },

    /// Operation is not supported by a read-only backend.
    #[error("the {operation} function is not supported with the mustgather driver")]
    Unsupported {
        /// The unsupported operation.
        operation: &'static str,
    },

    // Configuration Errors
    /// A binding endpoint is not a valid regular expression.
    #[error("invalid endpoint pattern {pattern:?}: {details}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler message.
        details: String,
    },

    /// A binding path template cannot be compiled.
    #[error("invalid path template {template:?}: {details}")]
    InvalidTemplate {
        /// The offending template.
        template: String,
        /// What is wrong with it.
        details: String,
    },

    /// The binding configuration could not be parsed.
    #[error("invalid binding configuration {path}: {details}")]
    InvalidBindings {
        /// The binding file (empty when parsed from a string).
        path: PathBuf,
        /// Parser message.
        details: String,
    },

    /// Neither a `namespaces/` directory nor an archive directory was found.
    #[error("unable to locate must-gather in {path}")]
    SnapshotRootNotFound {
        /// The configured snapshot root.
        path: PathBuf,
    },

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl BackendError {
    /// Wrap an I/O error, folding `ErrorKind::NotFound` into [`BackendError::NotFound`].
    pub fn io(operation: &'static str, path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => BackendError::NotFound {
                path: path.to_path_buf(),
            },
            _ => BackendError::Io {
                operation,
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Returns `true` if the error means "the addressed path is absent".
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound { .. })
    }
}
