//! Table of logical services this profile family knows how to configure.
//!
//! Each entry names the OS account that owns the service's logs. Adding a
//! service is a row here, nothing else.

use crate::error::{ConfigurationError, PlanResult};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownService {
    pub name: &'static str,
    pub account: &'static str,
}

const fn svc(name: &'static str, account: &'static str) -> KnownService {
    KnownService { name, account }
}

pub const KNOWN_SERVICES: &[KnownService] = &[
    svc("aodh_api", "aodh"),
    svc("aodh_evaluator", "aodh"),
    svc("aodh_listener", "aodh"),
    svc("aodh_notifier", "aodh"),
    svc("ceilometer_agent_central", "ceilometer"),
    svc("ceilometer_agent_compute", "ceilometer"),
    svc("ceilometer_agent_notification", "ceilometer"),
    svc("cinder_api", "cinder"),
    svc("cinder_scheduler", "cinder"),
    svc("cinder_volume", "cinder"),
    svc("glance_api", "glance"),
    svc("glance_registry", "glance"),
    svc("gnocchi_api", "gnocchi"),
    svc("gnocchi_metricd", "gnocchi"),
    svc("gnocchi_statsd", "gnocchi"),
    svc("heat_api", "heat"),
    svc("heat_api_cfn", "heat"),
    svc("heat_engine", "heat"),
    svc("horizon", "apache"),
    svc("keystone", "keystone"),
    svc("neutron_api", "neutron"),
    svc("neutron_dhcp", "neutron"),
    svc("neutron_l3", "neutron"),
    svc("neutron_metadata", "neutron"),
    svc("neutron_ovs_agent", "neutron"),
    svc("nova_api", "nova"),
    svc("nova_compute", "nova"),
    svc("nova_conductor", "nova"),
    svc("nova_consoleauth", "nova"),
    svc("nova_metadata", "nova"),
    svc("nova_scheduler", "nova"),
    svc("nova_vnc_proxy", "nova"),
    svc("swift_proxy", "swift"),
    svc("swift_storage", "swift"),
];

pub fn lookup(name: &str) -> PlanResult<&'static KnownService> {
    KNOWN_SERVICES
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| ConfigurationError::UnknownService(name.to_string()))
}

/// Fail on the first name missing from the table or listed twice.
pub fn validate_all<S: AsRef<str>>(names: &[S]) -> PlanResult<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        let name = name.as_ref();
        lookup(name)?;
        if !seen.insert(name) {
            return Err(ConfigurationError::DuplicateService(name.to_string()));
        }
    }
    Ok(())
}

/// OS accounts owning the logs of the given services. `overrides` maps a
/// known service to a different account than the table's.
pub fn derived_accounts<S: AsRef<str>>(
    names: &[S],
    overrides: &BTreeMap<String, String>,
) -> PlanResult<BTreeSet<String>> {
    names
        .iter()
        .map(|name| {
            let svc = lookup(name.as_ref())?;
            Ok(overrides
                .get(svc.name)
                .cloned()
                .unwrap_or_else(|| svc.account.to_string()))
        })
        .collect()
}
