//! Command and response messages exchanged with the content script.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::{SparkleConfig, SparkleConfigPatch};

/// Commands sent from the popup to the content script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PenCommand {
    /// Turn the overlay on
    ActivatePen,

    /// Turn the overlay off and release every per-session resource
    DeactivatePen,

    /// Query activation state and configuration without side effects
    GetPenStatus,

    /// Shallow-merge a partial configuration. A missing or non-object
    /// `config` merges nothing.
    UpdateSparkleConfig {
        #[serde(default, deserialize_with = "patch_or_empty")]
        config: SparkleConfigPatch,
    },
}

fn patch_or_empty<'de, D>(deserializer: D) -> Result<SparkleConfigPatch, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => {
            serde_json::from_value(Value::Object(map)).map_err(serde::de::Error::custom)
        }
        _ => Ok(SparkleConfigPatch::default()),
    }
}

impl PenCommand {
    /// Wire name of the command
    pub fn action(&self) -> &'static str {
        match self {
            PenCommand::ActivatePen => "activatePen",
            PenCommand::DeactivatePen => "deactivatePen",
            PenCommand::GetPenStatus => "getPenStatus",
            PenCommand::UpdateSparkleConfig { .. } => "updateSparkleConfig",
        }
    }
}

/// Outcome marker carried by mutating responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    #[default]
    Success,
    Error,
}

/// Reply to `activatePen` / `deactivatePen`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub status: ResponseStatus,
    pub is_pen_active: bool,
    pub current_sparkle_config: SparkleConfig,
}

/// Reply to `getPenStatus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub is_pen_active: bool,
    pub current_sparkle_config: SparkleConfig,
}

/// Reply to `updateSparkleConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub status: ResponseStatus,
    pub new_config: SparkleConfig,
}

/// Reply to a request that could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
        }
    }
}

/// Any reply produced by the content script.
///
/// Untagged on the wire: each command has its own response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PenResponse {
    Toggle(ToggleResponse),
    Config(ConfigResponse),
    Error(ErrorResponse),
    Status(StatusResponse),
}

impl PenResponse {
    /// Activation state reported by the response, if it carries one
    pub fn is_pen_active(&self) -> Option<bool> {
        match self {
            PenResponse::Toggle(r) => Some(r.is_pen_active),
            PenResponse::Status(r) => Some(r.is_pen_active),
            PenResponse::Config(_) | PenResponse::Error(_) => None,
        }
    }

    /// Configuration reported by the response, if it carries one
    pub fn sparkle_config(&self) -> Option<&SparkleConfig> {
        match self {
            PenResponse::Toggle(r) => Some(&r.current_sparkle_config),
            PenResponse::Status(r) => Some(&r.current_sparkle_config),
            PenResponse::Config(r) => Some(&r.new_config),
            PenResponse::Error(_) => None,
        }
    }

    /// Status marker, absent for `getPenStatus` replies
    pub fn status(&self) -> Option<ResponseStatus> {
        match self {
            PenResponse::Toggle(r) => Some(r.status),
            PenResponse::Config(r) => Some(r.status),
            PenResponse::Error(r) => Some(r.status),
            PenResponse::Status(_) => None,
        }
    }
}
