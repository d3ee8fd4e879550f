//! Staged configuration composition for deployment profiles.
//!
//! For one node in a multi-step rollout this crate decides which
//! configuration actions a profile emits and with what parameters. It never
//! touches the filesystem or services; the output is a plan handed to an
//! external emission layer.
//!
//! Layers, leaf-first:
//! - gate: deployment-step and bootstrap-leader admission
//! - params: endpoint, key material, log source and group transformations
//! - plan: known services and config directive emission
//! - profile: the logging and compute profiles built on the above

pub mod error;
pub mod gate;
pub mod params;
pub mod plan;
pub mod profile;

pub use error::{ConfigurationError, PlanResult};
pub use gate::{Admission, DeploymentStep, NodeContext, NodeRole, ProfileGate, SkipReason};
pub use plan::{ConfigEmissionPlanner, ServiceConfigDirective};
pub use profile::{NodePlan, ProfileInput, plan_node};
