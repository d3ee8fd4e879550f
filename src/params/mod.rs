//! Transformations from raw operator parameters into the shapes the
//! downstream configuration modules expect. Everything here is pure.

pub mod endpoint;
pub mod group;
pub mod key;
pub mod source;

pub use endpoint::{ComposedEndpoints, Transport, compose, compose_with_transport};
pub use group::{GroupMembership, GroupSpec, MembershipPolicy, merge};
pub use key::{KeyMaterial, TypedKey, decompose};
pub use source::{LogSourceDescriptor, PathTransformRule, PathTransformSpec, SourceType, transform};
