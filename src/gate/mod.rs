//! Admission layer: which profiles may run on this node at this step.
//!
//! Step and role checks run before any parameter transformation. A profile
//! that is not admitted is skipped outright, which callers see as
//! [`Admission::Skipped`] rather than an error.

pub mod role;
pub mod stage;

pub use role::{NodeRole, resolve_role};
pub use stage::{DeploymentStep, enabled};

use serde::{Deserialize, Serialize};

/// Per-node facts supplied by the inventory for one planning pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContext {
    pub step: DeploymentStep,

    /// This node's own hostname.
    pub self_identity: String,

    /// Designated bootstrap node, if the deployment has one.
    #[serde(default)]
    pub bootstrap_identity: Option<String>,
}

impl NodeContext {
    pub fn role(&self) -> NodeRole {
        resolve_role(&self.self_identity, self.bootstrap_identity.as_deref())
    }
}

/// Step/role admission rule for one profile.
///
/// A profile runs on every node from `min_step`, and on the bootstrap
/// leader alone from `leader_step` when that is earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileGate {
    pub min_step: DeploymentStep,
    pub leader_step: Option<DeploymentStep>,
}

impl ProfileGate {
    pub const fn from_step(min_step: u32) -> Self {
        Self {
            min_step: DeploymentStep(min_step),
            leader_step: None,
        }
    }

    pub const fn leader_from(self, step: u32) -> Self {
        Self {
            leader_step: Some(DeploymentStep(step)),
            ..self
        }
    }

    pub fn admit(&self, ctx: &NodeContext) -> Result<NodeRole, SkipReason> {
        let role = ctx.role();
        if enabled(ctx.step, self.min_step) {
            return Ok(role);
        }
        let earliest = match self.leader_step {
            Some(step) if step < self.min_step => step,
            _ => {
                return Err(SkipReason::BelowStep {
                    current: ctx.step,
                    required: self.min_step,
                });
            }
        };
        if !enabled(ctx.step, earliest) {
            return Err(SkipReason::BelowStep {
                current: ctx.step,
                required: earliest,
            });
        }
        if role.is_leader() {
            Ok(role)
        } else {
            Err(SkipReason::NotLeader {
                leader: ctx.bootstrap_identity.clone(),
            })
        }
    }
}

/// Why a profile produced nothing on this pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    BelowStep {
        current: DeploymentStep,
        required: DeploymentStep,
    },
    NotLeader {
        leader: Option<String>,
    },
}

/// Outcome of an admitted-or-not profile pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Admission<T> {
    Admitted(T),
    Skipped(SkipReason),
}

impl<T> Admission<T> {
    pub fn admitted(&self) -> Option<&T> {
        match self {
            Admission::Admitted(plan) => Some(plan),
            Admission::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Admission::Skipped(_))
    }
}
