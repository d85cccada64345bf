use serde::{Deserialize, Serialize};

pub const EMPTY_INPUT: &str = "Empty input";
pub const INVALID_ADDRESS_FORMAT: &str = "Invalid address format";
pub const ENS_NAME_NOT_FOUND: &str = "ENS name not found";

/// How a user-supplied identifier was classified.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Address,
    Ens,
    Invalid,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Address => "address",
            InputType::Ens => "ens",
            InputType::Invalid => "invalid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "address" => Some(InputType::Address),
            "ens" => Some(InputType::Ens),
            "invalid" => Some(InputType::Invalid),
            _ => None,
        }
    }
}

/// Outcome of a single resolution call. `address` is set iff `success`,
/// `error` iff not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub input_type: InputType,
}

impl ResolutionResult {
    pub fn resolved(address: String, avatar: Option<String>, input_type: InputType) -> Self {
        Self {
            success: true,
            address: Some(address),
            avatar,
            error: None,
            input_type,
        }
    }

    pub fn failed(error: impl Into<String>, input_type: InputType) -> Self {
        Self {
            success: false,
            address: None,
            avatar: None,
            error: Some(error.into()),
            input_type,
        }
    }
}

/// An address a client claims to have resolved, as sent with a form
/// submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressClaim {
    /// What the applicant typed.
    pub input: String,
    /// What the client says it resolved to.
    pub address: String,
    pub input_type: InputType,
}
