//! SSH key material decomposition.
//!
//! Operators hand key material over either as an OpenSSH style line
//! (`"ssh-rsa AAAA..."`) or as an already split `{type, key}` record.

use crate::error::{ConfigurationError, PlanResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub key: String,
}

/// Key material as it appears in the parameter bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyMaterial {
    Typed(TypedKey),
    Raw(String),
}

/// Split key material into a typed record. `None` means no key configured.
///
/// `slot` only feeds the error message.
pub fn decompose(slot: &str, material: Option<&KeyMaterial>) -> PlanResult<Option<TypedKey>> {
    let Some(material) = material else {
        return Ok(None);
    };
    match material {
        KeyMaterial::Typed(key) => Ok(Some(key.clone())),
        KeyMaterial::Raw(line) => {
            let malformed = || ConfigurationError::MalformedKey {
                slot: slot.to_string(),
                material: line.clone(),
            };
            // Type is the first non-blank run; the key is everything after
            // the first whitespace boundary, newlines included.
            let (key_type, key) = line
                .trim()
                .split_once(char::is_whitespace)
                .ok_or_else(malformed)?;
            let key = key.trim_start();
            if key.is_empty() {
                return Err(malformed());
            }
            Ok(Some(TypedKey {
                key_type: key_type.to_string(),
                key: key.to_string(),
            }))
        }
    }
}
