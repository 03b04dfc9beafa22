//! Action descriptors: the structured result of interpreting a command

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Message returned when a command could not be matched to anything
pub const UNKNOWN_MESSAGE: &str = "I understand you want to make changes to your room. Could you be more specific about what you'd like me to do?";

/// Message returned when the language model could not be reached
pub const ERROR_MESSAGE: &str =
    "I'm having trouble processing your request right now. Please try again.";

/// Requested room mutation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddFurniture,
    RemoveFurniture,
    MoveFurniture,
    ChangeWallColor,
    ChangeFlooring,
    AdjustLighting,
    ChangeStyle,
    AddDecoration,
    /// Hint for the user, nothing to apply
    Suggestion,
    /// Could not determine intent
    Unknown,
    /// The interpreter itself failed
    Error,
}

impl ActionKind {
    /// Wire tag, e.g. `add_furniture`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddFurniture => "add_furniture",
            Self::RemoveFurniture => "remove_furniture",
            Self::MoveFurniture => "move_furniture",
            Self::ChangeWallColor => "change_wall_color",
            Self::ChangeFlooring => "change_flooring",
            Self::AdjustLighting => "adjust_lighting",
            Self::ChangeStyle => "change_style",
            Self::AddDecoration => "add_decoration",
            Self::Suggestion => "suggestion",
            Self::Unknown => "unknown",
            Self::Error => "error",
        }
    }

    /// True for tags that describe a change to the room
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Suggestion | Self::Unknown | Self::Error)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point in room space
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Coordinates carried by a descriptor
///
/// Numbers are kept as written, so `3` and `3.0` from the model come back
/// out exactly as they went in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub x: Number,
    pub y: Number,
    pub z: Number,
}

impl Coordinates {
    /// Whole values are written as integers
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: number(x),
            y: number(y),
            z: number(z),
        }
    }

    /// Room-space position; non-numeric components read as 0
    pub fn to_position(&self) -> Position {
        Position::new(
            self.x.as_f64().unwrap_or_default(),
            self.y.as_f64().unwrap_or_default(),
            self.z.as_f64().unwrap_or_default(),
        )
    }
}

fn number(value: f64) -> Number {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Number::from(value as i64)
    } else {
        Number::from_f64(value).unwrap_or_else(|| Number::from(0))
    }
}

/// Interpreted command
///
/// Only `action` and `message` are guaranteed; the optional fields depend
/// on the tag. Keys outside the schema (`brightness`, `temperature`, ...)
/// are kept in `extra` and serialized back at the top level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionDescriptor {
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActionDescriptor {
    /// Bare descriptor with only the mandatory fields
    pub fn new(action: ActionKind, message: impl Into<String>) -> Self {
        Self {
            action,
            item: None,
            position: None,
            style: None,
            color: None,
            material: None,
            size: None,
            message: message.into(),
            extra: Map::new(),
        }
    }

    /// Fallback when nothing matched or the model output was unusable
    pub fn unknown() -> Self {
        Self::new(ActionKind::Unknown, UNKNOWN_MESSAGE)
    }

    /// Fallback when the external service failed
    pub fn error() -> Self {
        Self::new(ActionKind::Error, ERROR_MESSAGE)
    }

    pub fn suggestion(message: impl Into<String>) -> Self {
        Self::new(ActionKind::Suggestion, message)
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = Some(Coordinates::new(x, y, z));
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Attach a key outside the schema
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Look up a numeric extra such as `brightness`
    pub fn extra_f64(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(Value::as_f64)
    }

    /// Look up a string extra such as `temperature`
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}
