//! Configuration artifact directives and their naming.

use serde::Serialize;
use serde_json::{Map, Value};

/// One config file for the emission layer to write.
///
/// Built fresh on every pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceConfigDirective {
    pub ordering_prefix: String,
    pub service_name: String,
    pub path: String,
    pub body: Value,
}

impl ServiceConfigDirective {
    /// Artifact name without the directory, e.g. `100-openstack-keystone.conf`.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Where and under which names a profile family drops its artifacts.
///
/// The same `(prefix, service)` always maps to the same path, so re-planning
/// overwrites an artifact instead of adding a second one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionLayout {
    pub config_dir: String,
    /// Three-digit block ordering this family against other profiles.
    pub ordering_block: u16,
    pub family: String,
    pub extension: String,
}

impl Default for EmissionLayout {
    fn default() -> Self {
        Self {
            config_dir: "/etc/fluentd/config.d".to_string(),
            ordering_block: 100,
            family: "openstack".to_string(),
            extension: "conf".to_string(),
        }
    }
}

impl EmissionLayout {
    pub fn ordering_prefix(&self) -> String {
        format!("{:03}-{}", self.ordering_block, self.family)
    }

    pub fn path_for(&self, service_name: &str) -> String {
        format!(
            "{}/{}-{}.{}",
            self.config_dir.trim_end_matches('/'),
            self.ordering_prefix(),
            service_name,
            self.extension
        )
    }

    pub fn directive(&self, service_name: &str, body: Value) -> ServiceConfigDirective {
        ServiceConfigDirective {
            ordering_prefix: self.ordering_prefix(),
            service_name: service_name.to_string(),
            path: self.path_for(service_name),
            body,
        }
    }
}

/// Merge `overlay` into `base`. Nested objects merge key by key; anything
/// else in `overlay` replaces what `base` had.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// `overlay` merged over a copy of `defaults`.
pub fn merged(defaults: &Map<String, Value>, overlay: &Value) -> Value {
    let mut body = Value::Object(defaults.clone());
    deep_merge(&mut body, overlay);
    body
}
