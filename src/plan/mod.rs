//! Config emission planning.
//!
//! Turns the transformed parameters of an admitted profile into an ordered
//! list of [`ServiceConfigDirective`]s. Two paths feed the list:
//! - explicit sources: one shared `sources` directive carrying the whole
//!   transformed source list, emitted first
//! - per service: one directive per enabled service in caller order; a
//!   service whose params carry no `source` list falls back to the shared
//!   default format and pos-file directory
//!
//! Planning is all-or-nothing: any error discards every directive.

pub mod directive;
pub mod services;

pub use directive::{EmissionLayout, ServiceConfigDirective, deep_merge, merged};
pub use services::{KNOWN_SERVICES, KnownService};

use crate::error::{ConfigurationError, PlanResult};
use crate::gate::{Admission, NodeContext, ProfileGate};
use crate::params::source::{self, LogSourceDescriptor, PathTransformRule, PathTransformSpec};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::debug;

/// Service name of the shared directive built from explicit sources.
pub const SOURCES_DIRECTIVE: &str = "sources";

/// Inputs for one planning pass, already validated upstream.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub services: &'a [String],
    pub service_params: &'a BTreeMap<String, Value>,
    pub shared_defaults: &'a Map<String, Value>,
    pub sources: &'a [LogSourceDescriptor],
    pub path_transform: &'a PathTransformSpec,
    pub default_format: Option<&'a str>,
    pub pos_file_path: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigEmissionPlanner {
    layout: EmissionLayout,
}

impl ConfigEmissionPlanner {
    pub fn new(layout: EmissionLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &EmissionLayout {
        &self.layout
    }

    /// Gate on step/role, then emit. A skipped pass never looks at `request`,
    /// so its path transforms are not even parsed.
    pub fn plan(
        &self,
        ctx: &NodeContext,
        gate: &ProfileGate,
        request: &PlanRequest<'_>,
    ) -> PlanResult<Admission<Vec<ServiceConfigDirective>>> {
        match gate.admit(ctx) {
            Ok(_) => self.emit(request).map(Admission::Admitted),
            Err(reason) => {
                debug!(?reason, "emission skipped");
                Ok(Admission::Skipped(reason))
            }
        }
    }

    /// Emit directives for an already admitted pass.
    pub fn emit(&self, request: &PlanRequest<'_>) -> PlanResult<Vec<ServiceConfigDirective>> {
        services::validate_all(request.services)?;
        let rules = request.path_transform.rules()?;

        let mut out = Vec::with_capacity(request.services.len() + 1);

        if !request.sources.is_empty() {
            let transformed = source::transform(request.sources, &rules);
            source::check_formats(&transformed);
            debug!(count = transformed.len(), "emitting shared sources directive");
            out.push(
                self.layout
                    .directive(SOURCES_DIRECTIVE, json!({ "source": transformed })),
            );
        }

        for name in request.services {
            let params = request.service_params.get(name);
            let body = match params.and_then(|p| p.get("source")) {
                Some(Value::Array(sources)) => {
                    debug!(service = %name, "service carries its own sources");
                    self.explicit_service_body(request, &rules, params, sources)
                }
                _ => {
                    debug!(service = %name, "config by service fallback");
                    self.fallback_service_body(request, name, params)?
                }
            };
            out.push(self.layout.directive(name, body));
        }

        Ok(out)
    }

    fn fallback_service_body(
        &self,
        request: &PlanRequest<'_>,
        name: &str,
        params: Option<&Value>,
    ) -> PlanResult<Value> {
        let missing = |what| ConfigurationError::MissingDefaults {
            service: name.to_string(),
            missing: what,
        };
        let format = request.default_format.ok_or_else(|| missing("default_format"))?;
        let pos_path = request.pos_file_path.ok_or_else(|| missing("pos_file_path"))?;

        let mut body = merged(
            request.shared_defaults,
            &json!({ "default_format": format, "pos_file_path": pos_path }),
        );
        if let Some(params) = params {
            deep_merge(&mut body, params);
        }
        Ok(body)
    }

    fn explicit_service_body(
        &self,
        request: &PlanRequest<'_>,
        rules: &[PathTransformRule],
        params: Option<&Value>,
        sources: &[Value],
    ) -> Value {
        let filled: Vec<Value> = sources
            .iter()
            .map(|src| fill_source_defaults(src, request, rules))
            .collect();

        let mut body = Value::Object(request.shared_defaults.clone());
        if let Some(params) = params {
            deep_merge(&mut body, params);
        }
        if let Value::Object(map) = &mut body {
            map.insert("source".to_string(), Value::Array(filled));
        }
        body
    }
}

/// Complete a partial per-service source: default `format`, a `pos_file`
/// derived from the tag, and the transformed `path`.
fn fill_source_defaults(
    src: &Value,
    request: &PlanRequest<'_>,
    rules: &[PathTransformRule],
) -> Value {
    let Value::Object(fields) = src else {
        return src.clone();
    };
    let mut fields = fields.clone();

    if let Some(format) = request.default_format {
        fields
            .entry("format")
            .or_insert_with(|| Value::from(format));
    }
    if !fields.contains_key("pos_file") {
        let tag = fields.get("tag").and_then(Value::as_str).map(str::to_string);
        if let (Some(tag), Some(dir)) = (tag, request.pos_file_path) {
            let pos = format!("{}/{}.pos", dir.trim_end_matches('/'), tag);
            fields.insert("pos_file".to_string(), Value::from(pos));
        }
    }
    if let Some(Value::String(path)) = fields.get_mut("path") {
        *path = source::transform_path(path, rules);
    }
    Value::Object(fields)
}
