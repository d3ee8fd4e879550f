//! Group membership merging for the log-shipping account.
//!
//! The agent account must be able to read each service's logs, so it joins
//! the OS group of every enabled service on top of whatever the operator
//! listed. Membership only grows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub group_name: String,
    #[serde(default)]
    pub base_members: BTreeSet<String>,
    #[serde(default)]
    pub derived_members: BTreeSet<String>,
}

/// How the emission layer must apply a membership list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipPolicy {
    /// Add missing members; never remove unlisted ones.
    Minimum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMembership {
    pub group_name: String,
    pub members: BTreeSet<String>,
    pub policy: MembershipPolicy,
}

/// `base ∪ derived`.
pub fn merge(group: &GroupSpec) -> BTreeSet<String> {
    group
        .base_members
        .union(&group.derived_members)
        .cloned()
        .collect()
}

impl GroupSpec {
    pub fn membership(&self) -> GroupMembership {
        GroupMembership {
            group_name: self.group_name.clone(),
            members: merge(self),
            policy: MembershipPolicy::Minimum,
        }
    }
}
