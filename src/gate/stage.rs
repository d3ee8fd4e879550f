//! Deployment step admission.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse rollout phase. Steps are totally ordered and only ever advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentStep(pub u32);

impl DeploymentStep {
    pub const fn new(step: u32) -> Self {
        Self(step)
    }
}

impl fmt::Display for DeploymentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.0)
    }
}

/// True when a component with threshold `min` may run at `current`.
pub fn enabled(current: DeploymentStep, min: DeploymentStep) -> bool {
    current >= min
}
