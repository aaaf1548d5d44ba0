//! # Resource Bindings
//!
//! Rules mapping request keys to snapshot paths.
//!
//! ## Overview
//!
//! A binding pairs an endpoint pattern (a regular expression with optional
//! named groups `namespace` and `name`) with a path template and a resource
//! kind. The [`BindingTable`] is compiled once and then only read, so lookups
//! from many threads need no locking.
//!
//! ## Configuration Format
//!
//! ```yaml
//! - endpoint: ^/registry/pods/(?P<namespace>[^/]+)/(?P<name>[^/]+)$
//!   yaml_loc: namespaces/{{.Namespace}}/pods/{{.Name}}/{{.Name}}.yaml
//!   kind: Pod
//! - endpoint: ^/registry/pods/?$
//!   yaml_loc: namespaces/{{.Namespace}}/core/pods.yaml
//!   kind: PodList
//! ```
//!
//! `namespaced` may be set explicitly; otherwise a binding is namespace-scoped
//! when its template has a `{{.Namespace}}` placeholder.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{BackendError, PathTemplate, Resource};

const NAMESPACE_GROUP: &str = "namespace";
const NAME_GROUP: &str = "name";

/// One binding record as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BindingSpec {
    /// Endpoint pattern.
    pub endpoint: String,
    /// Path template relative to the snapshot root.
    #[serde(rename = "yaml_loc")]
    pub yaml_location: String,
    /// Resource kind label.
    #[serde(default)]
    pub kind: String,
    /// Whether the binding addresses a namespaced resource.
    #[serde(default)]
    pub namespaced: Option<bool>,
}

impl BindingSpec {
    /// Create a record with scope inferred from the template.
    pub fn new(
        endpoint: impl Into<String>,
        yaml_location: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            yaml_location: yaml_location.into(),
            kind: kind.into(),
            namespaced: None,
        }
    }
}

/// A compiled binding.
#[derive(Debug, Clone)]
pub struct ResourceBinding {
    pattern: Regex,
    template: PathTemplate,
    kind: String,
    namespaced: bool,
}

impl ResourceBinding {
    /// Compile a binding record.
    ///
    /// Capture groups other than `namespace` and `name` are reported and
    /// otherwise ignored.
    ///
    /// # Errors
    ///
    /// - [`BackendError::InvalidPattern`] if the endpoint does not compile
    /// - [`BackendError::InvalidTemplate`] if the path template does not compile
    pub fn compile(spec: &BindingSpec) -> Result<Self, BackendError> {
        let pattern = Regex::new(&spec.endpoint).map_err(|e| BackendError::InvalidPattern {
            pattern: spec.endpoint.clone(),
            details: e.to_string(),
        })?;
        let template = PathTemplate::compile(&spec.yaml_location)?;

        for group in pattern.capture_names().flatten() {
            if group != NAMESPACE_GROUP && group != NAME_GROUP {
                warn!(
                    endpoint = %spec.endpoint,
                    group,
                    "binding pattern has an unexpected capture group"
                );
            }
        }

        let namespaced = spec
            .namespaced
            .unwrap_or_else(|| template.references_namespace());

        Ok(Self {
            pattern,
            template,
            kind: spec.kind.clone(),
            namespaced,
        })
    }

    /// The endpoint pattern text.
    pub fn endpoint(&self) -> &str {
        self.pattern.as_str()
    }

    /// The compiled path template.
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Resource kind label.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Whether an empty namespace means "every namespace".
    pub fn is_namespaced(&self) -> bool {
        self.namespaced
    }

    /// Extract the resource identity from `key`, or `None` if the pattern does not match.
    pub fn extract(&self, key: &str) -> Option<Resource> {
        let captures = self.pattern.captures(key)?;
        let mut resource = Resource::default();
        for group in self.pattern.capture_names().flatten() {
            let value = captures.name(group).map(|m| m.as_str()).unwrap_or_default();
            match group {
                NAMESPACE_GROUP => resource.namespace = value.to_string(),
                NAME_GROUP => resource.name = value.to_string(),
                _ => debug!(group, value, "ignoring unexpected capture group"),
            }
        }
        Some(resource)
    }

    /// Render the path of `resource` under the snapshot `root`.
    pub fn path_for(&self, root: &Path, resource: &Resource) -> PathBuf {
        self.template.render_under(root, resource)
    }
}

/// Outcome of matching a key against the [`BindingTable`].
#[derive(Debug, Clone)]
pub enum Resolution<'a> {
    /// No binding covers the key; it is outside this backend's address space.
    Unbound,
    /// The first binding whose pattern matched, and the identity it extracted.
    Bound {
        /// The matching binding.
        binding: &'a ResourceBinding,
        /// The addressed resource.
        resource: Resource,
    },
}

/// Ordered, immutable set of compiled bindings. First match wins.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: Vec<ResourceBinding>,
}

impl BindingTable {
    /// Compile a table, keeping declaration order.
    ///
    /// # Errors
    ///
    /// The first compile error of any record.
    pub fn compile<'a, I>(specs: I) -> Result<Self, BackendError>
    where
        I: IntoIterator<Item = &'a BindingSpec>,
    {
        let bindings = specs
            .into_iter()
            .map(ResourceBinding::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bindings })
    }

    /// Parse and compile a YAML binding list.
    ///
    /// # Errors
    ///
    /// - [`BackendError::InvalidBindings`] if the text is not a binding list
    /// - compile errors as for [`BindingTable::compile`]
    pub fn from_yaml_str(text: &str) -> Result<Self, BackendError> {
        Self::parse(text, Path::new(""))
    }

    /// Read, parse and compile a YAML binding file.
    ///
    /// # Errors
    ///
    /// - [`BackendError::NotFound`] / [`BackendError::Io`] if the file cannot be read
    /// - as for [`BindingTable::from_yaml_str`]
    pub fn from_yaml_file(path: &Path) -> Result<Self, BackendError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BackendError::io("read binding file", path, e))?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, BackendError> {
        let specs: Vec<BindingSpec> =
            serde_yaml::from_str(text).map_err(|e| BackendError::InvalidBindings {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;
        Self::compile(&specs)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if the table has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceBinding> {
        self.bindings.iter()
    }

    /// Find the first binding matching `key` and extract the resource identity.
    pub fn resolve(&self, key: &str) -> Resolution<'_> {
        for binding in &self.bindings {
            debug!(key, endpoint = binding.endpoint(), "checking binding");
            if let Some(resource) = binding.extract(key) {
                debug!(
                    key,
                    endpoint = binding.endpoint(),
                    kind = binding.kind(),
                    namespace = %resource.namespace,
                    name = %resource.name,
                    "key matched binding"
                );
                return Resolution::Bound { binding, resource };
            }
        }
        Resolution::Unbound
    }
}
