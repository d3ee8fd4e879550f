//! Log-shipping agent profile.
//!
//! From step 4 every node installs the agent plugins, ensures the pos-file
//! directory, writes one config artifact per enabled service plus the shared
//! sources artifact, and optionally widens the agent account's groups.

use crate::error::PlanResult;
use crate::gate::{Admission, NodeContext, ProfileGate};
use crate::params::group::{GroupMembership, GroupSpec};
use crate::params::source::{LogSourceDescriptor, PathTransformSpec};
use crate::plan::{ConfigEmissionPlanner, EmissionLayout, PlanRequest, ServiceConfigDirective, services};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const LOGGING_GATE: ProfileGate = ProfileGate::from_step(4);

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingParams {
    /// Explicit sources for the shared `sources` artifact.
    pub sources: Vec<LogSourceDescriptor>,
    pub path_transform: PathTransformSpec,
    pub default_format: Option<String>,
    pub pos_file_path: Option<String>,
    pub service_names: Vec<String>,
    pub service_params: BTreeMap<String, Value>,
    pub shared_defaults: Map<String, Value>,
    pub config_dir: Option<String>,

    pub manage_groups: bool,
    /// Account whose groups are managed.
    pub group_name: String,
    pub groups: Vec<String>,
    /// Per-service account overrides for derived group members.
    pub service_accounts: BTreeMap<String, String>,

    pub plugins: Vec<String>,
    pub plugin_provider: String,
}

impl Default for LoggingParams {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            path_transform: PathTransformSpec::default(),
            default_format: None,
            pos_file_path: None,
            service_names: Vec::new(),
            service_params: BTreeMap::new(),
            shared_defaults: Map::new(),
            config_dir: None,
            manage_groups: true,
            group_name: "fluentd".to_string(),
            groups: vec!["fluentd".to_string()],
            service_accounts: BTreeMap::new(),
            plugins: vec!["rubygem-fluent-plugin-add".to_string()],
            plugin_provider: "yum".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDirective {
    pub name: String,
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingPlan {
    pub plugins: Vec<PluginDirective>,
    /// Directories the emission layer must ensure exist.
    pub directories: Vec<String>,
    pub directives: Vec<ServiceConfigDirective>,
    pub group: Option<GroupMembership>,
}

pub fn plan(ctx: &NodeContext, params: &LoggingParams) -> PlanResult<Admission<LoggingPlan>> {
    let mut layout = EmissionLayout::default();
    if let Some(dir) = &params.config_dir {
        layout.config_dir = dir.clone();
    }
    let planner = ConfigEmissionPlanner::new(layout);

    let request = PlanRequest {
        services: &params.service_names,
        service_params: &params.service_params,
        shared_defaults: &params.shared_defaults,
        sources: &params.sources,
        path_transform: &params.path_transform,
        default_format: params.default_format.as_deref(),
        pos_file_path: params.pos_file_path.as_deref(),
    };
    let directives = match planner.plan(ctx, &LOGGING_GATE, &request)? {
        Admission::Admitted(directives) => directives,
        Admission::Skipped(reason) => {
            info!(node = %ctx.self_identity, ?reason, "logging profile not admitted");
            return Ok(Admission::Skipped(reason));
        }
    };

    let group = if params.manage_groups {
        let spec = GroupSpec {
            group_name: params.group_name.clone(),
            base_members: params.groups.iter().cloned().collect(),
            derived_members: services::derived_accounts(&params.service_names, &params.service_accounts)?,
        };
        debug!(group = %spec.group_name, derived = ?spec.derived_members, "merging group membership");
        Some(spec.membership())
    } else {
        None
    };

    let plugins = params
        .plugins
        .iter()
        .map(|name| PluginDirective {
            name: name.clone(),
            provider: params.plugin_provider.clone(),
        })
        .collect();

    info!(
        node = %ctx.self_identity,
        directives = directives.len(),
        "logging profile planned"
    );

    Ok(Admission::Admitted(LoggingPlan {
        plugins,
        directories: params.pos_file_path.iter().cloned().collect(),
        directives,
        group,
    }))
}
