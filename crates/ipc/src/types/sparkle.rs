//! Sparkle appearance configuration shared by popup and content script.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Visual style applied to every live particle at draw time.
///
/// Any other value, including non-strings and `null`, is kept verbatim in
/// [`SparkleShape::Other`] so it round-trips through the configuration, but
/// nothing renders for it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum SparkleShape {
    /// Solid white disc
    #[default]
    Circle,
    /// Filled yellow five-point star
    Star,
    /// Outlined translucent disc with a highlight
    Bubble,
    /// Any other configured value
    Other(Value),
}

impl SparkleShape {
    /// Wire name of the shape, if it is a string
    pub fn name(&self) -> Option<&str> {
        match self {
            SparkleShape::Circle => Some("circle"),
            SparkleShape::Star => Some("star"),
            SparkleShape::Bubble => Some("bubble"),
            SparkleShape::Other(value) => value.as_str(),
        }
    }

    /// Whether this shape has a renderer
    pub fn is_known(&self) -> bool {
        !matches!(self, SparkleShape::Other(_))
    }
}

impl fmt::Display for SparkleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self) {
            (Some(name), _) => f.write_str(name),
            (None, SparkleShape::Other(value)) => write!(f, "{value}"),
            (None, _) => Ok(()),
        }
    }
}

impl From<&str> for SparkleShape {
    fn from(name: &str) -> Self {
        match name {
            "circle" => SparkleShape::Circle,
            "star" => SparkleShape::Star,
            "bubble" => SparkleShape::Bubble,
            other => SparkleShape::Other(Value::String(other.to_string())),
        }
    }
}

impl From<Value> for SparkleShape {
    fn from(value: Value) -> Self {
        match value {
            Value::String(name) => SparkleShape::from(name.as_str()),
            other => SparkleShape::Other(other),
        }
    }
}

impl From<SparkleShape> for Value {
    fn from(shape: SparkleShape) -> Self {
        match shape {
            SparkleShape::Other(value) => value,
            known => Value::String(known.to_string()),
        }
    }
}

/// Current sparkle configuration.
///
/// Keys other than `shape` are preserved as-is so that a shallow merge never
/// loses options this version does not understand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparkleConfig {
    #[serde(default)]
    pub shape: SparkleShape,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SparkleConfig {
    /// Shallow-merge a partial configuration; fields present in `patch` win.
    pub fn merge(&mut self, patch: SparkleConfigPatch) {
        if let Some(shape) = patch.shape {
            self.shape = shape;
        }
        self.extra.extend(patch.extra);
    }
}

/// Partial configuration carried by `updateSparkleConfig`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparkleConfigPatch {
    /// `None` only when the key is absent; an explicit `null` is a value
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub shape: Option<SparkleShape>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<SparkleShape>, D::Error>
where
    D: Deserializer<'de>,
{
    SparkleShape::deserialize(deserializer).map(Some)
}

impl SparkleConfigPatch {
    /// Patch that only changes the shape
    pub fn shape(shape: SparkleShape) -> Self {
        Self {
            shape: Some(shape),
            extra: Map::new(),
        }
    }
}
