//! Deployment profiles and per-node planning.
//!
//! Input JSON shape:
//! {
//!   "node": { "step": 4, "self_identity": "node.example.com",
//!             "bootstrap_identity": "node.example.com" },
//!   "logging": { ... },   // optional, see LoggingParams
//!   "nova": { ... }       // optional, see NovaParams
//! }

pub mod logging;
pub mod nova;

pub use logging::{LoggingParams, LoggingPlan};
pub use nova::{NovaParams, NovaPlan};

use crate::error::PlanResult;
use crate::gate::{Admission, DeploymentStep, NodeContext, NodeRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub node: NodeContext,
    #[serde(default)]
    pub logging: Option<LoggingParams>,
    #[serde(default)]
    pub nova: Option<NovaParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePlan {
    pub node: String,
    pub step: DeploymentStep,
    pub role: NodeRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<Admission<LoggingPlan>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nova: Option<Admission<NovaPlan>>,
}

/// Plan every configured profile for one node. The first failing profile
/// fails the whole node.
pub fn plan_node(input: &ProfileInput) -> PlanResult<NodePlan> {
    let ctx = &input.node;
    let logging = input
        .logging
        .as_ref()
        .map(|params| logging::plan(ctx, params))
        .transpose()?;
    let nova = input
        .nova
        .as_ref()
        .map(|params| nova::plan(ctx, params))
        .transpose()?;

    Ok(NodePlan {
        node: ctx.self_identity.clone(),
        step: ctx.step,
        role: ctx.role(),
        logging,
        nova,
    })
}
