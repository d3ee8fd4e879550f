//! Errors raised while planning a node's profile.
//!
//! Every variant is fatal to the planning pass. Skipping a pass because the
//! step or role does not admit it is not an error; see [`crate::Admission`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Raw key material without a whitespace boundary between type and key.
    #[error("malformed key material for {slot}: expected \"<type> <key>\", got {material:?}")]
    MalformedKey { slot: String, material: String },

    /// Enabled service name missing from the known-service table.
    #[error("unknown service '{0}'")]
    UnknownService(String),

    /// Same service enabled twice; both would write one artifact path.
    #[error("service '{0}' is enabled more than once")]
    DuplicateService(String),

    /// Per-service fallback requested without both defaults.
    #[error("service '{service}' has no explicit sources and no {missing} to fall back on")]
    MissingDefaults {
        service: String,
        missing: &'static str,
    },

    /// Flat path transform list with a dangling `from`.
    #[error("path transform list must hold from/to pairs, got {0} entries")]
    UnpairedPathTransform(usize),
}

pub type PlanResult<T> = Result<T, ConfigurationError>;
