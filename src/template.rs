//! # Path Templates
//!
//! Compiled `yaml_loc` templates that turn a [`Resource`] into a path under
//! the snapshot root.
//!
//! ## Syntax
//!
//! Literal text with `{{.Name}}` and `{{.Namespace}}` placeholders. Spaces
//! inside the braces are allowed (`{{ .Namespace }}`).
//!
//! ```rust
//! use mustgather_backend::{PathTemplate, Resource};
//! use std::path::Path;
//!
//! let tpl = PathTemplate::compile("namespaces/{{.Namespace}}/pods/{{.Name}}.yaml").unwrap();
//! let path = tpl.render_under(Path::new("/mg"), &Resource::new("kube-system", "etcd-1"));
//! assert_eq!(path, Path::new("/mg/namespaces/kube-system/pods/etcd-1.yaml"));
//! ```
//!
//! All validation happens in [`PathTemplate::compile`]; rendering a compiled
//! template cannot fail.

use std::path::{Path, PathBuf};

use crate::{BackendError, Resource};

/// A field of [`Resource`] referenced by a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a template.
    ///
    /// # Errors
    ///
    /// - [`BackendError::InvalidTemplate`] for an unterminated `{{`, an action
    ///   that is not a field reference, or a field other than `Name`/`Namespace`
    pub fn compile(source: &str) -> Result<Self, BackendError> {
        let invalid = |details: String| BackendError::InvalidTemplate {
            template: source.to_string(),
            details,
        };

        let mut segments = Vec::new();
        let mut rest = source;
        while let Some(open) = rest.find("{{") {
            if rest[..open].contains("}}") {
                return Err(invalid("unexpected \"}}\"".into()));
            }
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or_else(|| invalid("unclosed action".into()))?;
            let action = after[..close].trim();
            let field = action
                .strip_prefix('.')
                .ok_or_else(|| invalid(format!("unsupported action {action:?}")))?;
            let field = match field {
                "Name" => Field::Name,
                "Namespace" => Field::Namespace,
                other => return Err(invalid(format!("unknown field {other:?}"))),
            };
            segments.push(Segment::Field(field));
            rest = &after[close + 2..];
        }
        if rest.contains("}}") {
            return Err(invalid("unexpected \"}}\"".into()));
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the template has a `{{.Namespace}}` placeholder.
    pub fn references_namespace(&self) -> bool {
        self.segments
            .iter()
            .any(|s| *s == Segment::Field(Field::Namespace))
    }

    /// Substitute the resource's fields into the template.
    pub fn render(&self, resource: &Resource) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::Name) => out.push_str(&resource.name),
                Segment::Field(Field::Namespace) => out.push_str(&resource.namespace),
            }
        }
        out
    }

    /// Render and join the result under `root`.
    ///
    /// A leading `/` in the rendered text does not escape `root`.
    pub fn render_under(&self, root: &Path, resource: &Resource) -> PathBuf {
        let rendered = self.render(resource);
        root.join(rendered.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_both_fields() {
        let tpl = PathTemplate::compile("namespaces/{{.Namespace}}/pods/{{.Name}}.yaml").unwrap();
        let out = tpl.render(&Resource::new("default", "web-0"));
        assert_eq!(out, "namespaces/default/pods/web-0.yaml");
    }

    #[test]
    fn allows_spaces_in_action() {
        let tpl = PathTemplate::compile("namespaces/{{ .Namespace }}/core/pods.yaml").unwrap();
        assert_eq!(
            tpl.render(&Resource::in_namespace("ns1")),
            "namespaces/ns1/core/pods.yaml"
        );
    }

    #[test]
    fn literal_only_template() {
        let tpl = PathTemplate::compile("cluster-scoped-resources/core/nodes").unwrap();
        assert!(!tpl.references_namespace());
        assert_eq!(
            tpl.render(&Resource::default()),
            "cluster-scoped-resources/core/nodes"
        );
    }

    #[test]
    fn detects_namespace_placeholder() {
        let tpl = PathTemplate::compile("namespaces/{{.Namespace}}/core/events.yaml").unwrap();
        assert!(tpl.references_namespace());
        let tpl = PathTemplate::compile("Namespace/{{.Name}}.yaml").unwrap();
        assert!(!tpl.references_namespace());
    }

    #[test]
    fn rejects_unclosed_action() {
        let err = PathTemplate::compile("namespaces/{{.Namespace/pods").unwrap_err();
        assert!(matches!(err, BackendError::InvalidTemplate { .. }));
    }

    #[test]
    fn rejects_unknown_field() {
        let err = PathTemplate::compile("{{.Kind}}.yaml").unwrap_err();
        assert!(err.to_string().contains("Kind"));
    }

    #[test]
    fn rejects_non_field_action() {
        assert!(PathTemplate::compile("{{ if .Name }}x{{ end }}").is_err());
        assert!(PathTemplate::compile("a}}b").is_err());
    }

    #[test]
    fn render_under_keeps_root_for_absolute_text() {
        let tpl = PathTemplate::compile("/namespaces/{{.Namespace}}").unwrap();
        let path = tpl.render_under(Path::new("/mg"), &Resource::in_namespace("a"));
        assert_eq!(path, PathBuf::from("/mg/namespaces/a"));
    }
}
