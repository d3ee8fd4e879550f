//! Compute service profile.
//!
//! The bootstrap node configures nova at step 3 so one-time setup happens
//! once; every node follows at step 4, which is also when live migration is
//! wired up.

use crate::error::{ConfigurationError, PlanResult};
use crate::gate::{self, Admission, DeploymentStep, NodeContext, NodeRole, ProfileGate};
use crate::params::endpoint::{self, Transport};
use crate::params::key::{self, KeyMaterial, TypedKey};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const NOVA_GATE: ProfileGate = ProfileGate::from_step(4).leader_from(3);
pub const MIGRATION_STEP: DeploymentStep = DeploymentStep::new(4);

pub const RABBIT_PORT: u16 = 5672;
pub const MEMCACHE_PORT: u16 = 11211;
pub const CACHE_BACKEND: &str = "oslo_cache.memcache_pool";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MigrationSshKey {
    #[serde(default)]
    pub private_key: Option<KeyMaterial>,
    #[serde(default)]
    pub public_key: Option<KeyMaterial>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NovaParams {
    pub rabbit_hosts: Vec<String>,
    pub rabbit_port: u16,
    pub rabbit_user: String,
    pub rabbit_password: String,
    pub rabbit_use_ssl: bool,
    pub memcache_hosts: Vec<String>,
    pub memcache_port: u16,
    pub manage_migration: bool,
    pub libvirt_enabled: bool,
    pub nova_compute_enabled: bool,
    pub libvirt_tls: bool,
    pub migration_ssh_key: Option<MigrationSshKey>,
}

impl Default for NovaParams {
    fn default() -> Self {
        Self {
            rabbit_hosts: Vec::new(),
            rabbit_port: RABBIT_PORT,
            rabbit_user: "guest".to_string(),
            rabbit_password: String::new(),
            rabbit_use_ssl: false,
            memcache_hosts: Vec::new(),
            memcache_port: MEMCACHE_PORT,
            manage_migration: false,
            libvirt_enabled: false,
            nova_compute_enabled: false,
            libvirt_tls: false,
            migration_ssh_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSettings {
    pub enabled: bool,
    pub backend: String,
    pub memcache_servers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    pub transport: Transport,
    pub configure_libvirt: bool,
    pub configure_nova: bool,
}

/// Parameters for the messaging, cache and migration modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NovaPlan {
    pub role: NodeRole,
    pub rabbit_hosts: Vec<String>,
    pub notification_transport_url: String,
    pub nova_public_key: Option<TypedKey>,
    pub nova_private_key: Option<TypedKey>,
    pub cache: CacheSettings,
    pub migration: Option<MigrationPlan>,
}

pub fn plan(ctx: &NodeContext, params: &NovaParams) -> PlanResult<Admission<NovaPlan>> {
    let role = match NOVA_GATE.admit(ctx) {
        Ok(role) => role,
        Err(reason) => {
            info!(node = %ctx.self_identity, ?reason, "nova profile not admitted");
            return Ok(Admission::Skipped(reason));
        }
    };

    let rabbit = endpoint::compose_with_transport(
        &params.rabbit_hosts,
        params.rabbit_port,
        params.libvirt_tls,
    );
    let notification_transport_url = endpoint::transport_url(
        "rabbit",
        &params.rabbit_user,
        &params.rabbit_password,
        &rabbit.endpoints,
        params.rabbit_use_ssl,
    );

    let (nova_public_key, nova_private_key) = migration_keys(params.migration_ssh_key.as_ref())?;

    let migration = (gate::enabled(ctx.step, MIGRATION_STEP) && params.manage_migration).then(|| {
        MigrationPlan {
            transport: rabbit.transport,
            configure_libvirt: params.libvirt_enabled,
            configure_nova: params.nova_compute_enabled,
        }
    });

    info!(
        node = %ctx.self_identity,
        ?role,
        migration = migration.is_some(),
        "nova profile planned"
    );

    Ok(Admission::Admitted(NovaPlan {
        role,
        rabbit_hosts: rabbit.endpoints,
        notification_transport_url,
        nova_public_key,
        nova_private_key,
        cache: CacheSettings {
            enabled: true,
            backend: CACHE_BACKEND.to_string(),
            memcache_servers: endpoint::compose(&params.memcache_hosts, params.memcache_port),
        },
        migration,
    }))
}

/// Decompose the migration key pair.
///
/// Both slots go through [`key::decompose`]. A bare private key with no
/// type prefix takes the public key's type when there is one.
fn migration_keys(
    pair: Option<&MigrationSshKey>,
) -> PlanResult<(Option<TypedKey>, Option<TypedKey>)> {
    let Some(pair) = pair else {
        return Ok((None, None));
    };
    let public = key::decompose("migration_ssh_key.public_key", pair.public_key.as_ref())?;
    let private = key::decompose("migration_ssh_key.private_key", pair.private_key.as_ref());
    let private = match (private, &public) {
        (Err(ConfigurationError::MalformedKey { material, .. }), Some(public)) => Some(TypedKey {
            key_type: public.key_type.clone(),
            key: material.trim().to_string(),
        }),
        (other, _) => other?,
    };
    Ok((public, private))
}
