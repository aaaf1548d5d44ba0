//! Backend configuration.
//!
//! Three values, each with a default and an environment override:
//!
//! | Field | Default | Variable |
//! |-------|---------|----------|
//! | `snapshot_root` | `/must-gather/` | `KINE_MUSTGATHER_DIR` |
//! | `binding_file` | `/resource-map.yaml` | `KINE_RESOURCE_BINDING` |
//! | `health_key` | `/kubernetes.io/health` | `KINE_HEALTH_ENDPOINT` |

use std::path::PathBuf;

use tracing::info;

/// Environment variable overriding [`Config::snapshot_root`].
pub const ENV_SNAPSHOT_ROOT: &str = "KINE_MUSTGATHER_DIR";
/// Environment variable overriding [`Config::binding_file`].
pub const ENV_BINDING_FILE: &str = "KINE_RESOURCE_BINDING";
/// Environment variable overriding [`Config::health_key`].
pub const ENV_HEALTH_KEY: &str = "KINE_HEALTH_ENDPOINT";

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Must-gather directory, or the directory it was extracted into.
    pub snapshot_root: PathBuf,
    /// YAML file listing the resource bindings.
    pub binding_file: PathBuf,
    /// Key answered with a fixed health payload.
    pub health_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_root: PathBuf::from("/must-gather/"),
            binding_file: PathBuf::from("/resource-map.yaml"),
            health_key: "/kubernetes.io/health".to_string(),
        }
    }
}

impl Config {
    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            let value = lookup(key).filter(|v| !v.is_empty())?;
            info!("Using environment variable for {key}");
            Some(value)
        };
        if let Some(v) = get(ENV_SNAPSHOT_ROOT) {
            self.snapshot_root = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_BINDING_FILE) {
            self.binding_file = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_HEALTH_KEY) {
            self.health_key = v;
        }
        self
    }

    /// Set the snapshot root.
    pub fn with_snapshot_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.snapshot_root = root.into();
        self
    }

    /// Set the binding file.
    pub fn with_binding_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.binding_file = path.into();
        self
    }

    /// Set the health-check key.
    pub fn with_health_key(mut self, key: impl Into<String>) -> Self {
        self.health_key = key.into();
        self
    }
}
