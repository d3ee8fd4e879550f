//! Bootstrap leader election.
//!
//! The leader is whichever node the inventory names as bootstrap node. The
//! role is derived on every planning pass and never stored.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Leader,
    Follower,
}

impl NodeRole {
    pub fn is_leader(self) -> bool {
        self == NodeRole::Leader
    }
}

/// Without a configured leader every node acts (single node / non-HA).
pub fn resolve_role(self_identity: &str, leader_identity: Option<&str>) -> NodeRole {
    match leader_identity {
        None => NodeRole::Leader,
        Some(leader) if leader == self_identity => NodeRole::Leader,
        Some(_) => NodeRole::Follower,
    }
}
