//! Typed room state and the application of action descriptors to it

use crate::command::action::{ActionDescriptor, ActionKind, Coordinates, Position};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A piece of furniture or decoration placed in the room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Walls {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

impl Default for Walls {
    fn default() -> Self {
        Self {
            color: "#ffffff".into(),
            material: Some("paint".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flooring {
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Default for Flooring {
    fn default() -> Self {
        Self {
            material: "wood".into(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    /// 0-100
    pub brightness: u8,
    pub temperature: String,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            brightness: 70,
            temperature: "warm".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Position,
    pub rotation: Position,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Position::new(5.0, 2.0, 5.0),
            rotation: Position::default(),
        }
    }
}

/// Editable state of a room design
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    pub furniture: Vec<Placement>,
    pub walls: Walls,
    pub flooring: Flooring,
    pub lighting: Lighting,
    pub camera: Camera,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_action: Option<ActionDescriptor>,
}

impl DesignState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot passed to the command resolver
    pub fn to_room_state(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Apply a descriptor. Returns true if the room changed.
    ///
    /// Descriptors that lack the fields their tag needs are ignored.
    pub fn apply(&mut self, descriptor: &ActionDescriptor) -> bool {
        let changed = match descriptor.action {
            ActionKind::AddFurniture | ActionKind::AddDecoration => {
                self.furniture.push(placement_from(descriptor));
                true
            }
            ActionKind::RemoveFurniture => match self.find_item(descriptor) {
                Some(idx) => {
                    self.furniture.remove(idx);
                    true
                }
                None => false,
            },
            ActionKind::MoveFurniture => {
                match (self.find_item(descriptor), &descriptor.position) {
                    (Some(idx), Some(position)) => {
                        self.furniture[idx].position = position.to_position();
                        true
                    }
                    _ => false,
                }
            }
            ActionKind::ChangeWallColor => match &descriptor.color {
                Some(color) => {
                    self.walls.color = color.clone();
                    if descriptor.material.is_some() {
                        self.walls.material = descriptor.material.clone();
                    }
                    true
                }
                None => false,
            },
            ActionKind::ChangeFlooring => {
                if let Some(material) = &descriptor.material {
                    self.flooring.material = material.clone();
                }
                if descriptor.color.is_some() {
                    self.flooring.color = descriptor.color.clone();
                }
                descriptor.material.is_some() || descriptor.color.is_some()
            }
            ActionKind::AdjustLighting => {
                let brightness = descriptor.extra_f64("brightness");
                let temperature = descriptor.extra_str("temperature");
                if let Some(brightness) = brightness {
                    self.lighting.brightness = brightness.clamp(0.0, 100.0).round() as u8;
                }
                if let Some(temperature) = temperature {
                    self.lighting.temperature = temperature.to_string();
                }
                brightness.is_some() || temperature.is_some()
            }
            ActionKind::ChangeStyle => match &descriptor.style {
                Some(style) => {
                    self.style = Some(style.clone());
                    true
                }
                None => false,
            },
            ActionKind::Suggestion | ActionKind::Unknown | ActionKind::Error => false,
        };

        if changed {
            self.last_action = Some(descriptor.clone());
        }
        changed
    }

    /// Index of the first placement whose type matches the descriptor's item
    fn find_item(&self, descriptor: &ActionDescriptor) -> Option<usize> {
        let item = descriptor.item.as_deref()?.to_lowercase();
        self.furniture
            .iter()
            .position(|p| p.kind.to_lowercase() == item)
    }
}

fn placement_from(descriptor: &ActionDescriptor) -> Placement {
    Placement {
        kind: descriptor.item.clone().unwrap_or_else(|| "item".into()),
        position: descriptor
            .position
            .as_ref()
            .map(Coordinates::to_position)
            .unwrap_or_default(),
        variant: descriptor.extra_str("type").map(str::to_string),
        style: descriptor.style.clone(),
        color: descriptor.color.clone(),
        material: descriptor.material.clone(),
        size: descriptor.size.clone(),
    }
}

/// One-line description of an opaque room state, for logs and the REPL
pub fn summarize(room_state: &Value) -> String {
    let furniture = room_state
        .get("furniture")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.get("type").and_then(Value::as_str))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let walls = room_state
        .pointer("/walls/color")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let brightness = room_state
        .pointer("/lighting/brightness")
        .and_then(Value::as_u64)
        .map(|b| format!("{}%", b))
        .unwrap_or_else(|| "unknown".into());

    let furniture = if furniture.is_empty() {
        "none".to_string()
    } else {
        furniture.join(", ")
    };
    format!(
        "Furniture: {} | Walls: {} | Brightness: {}",
        furniture, walls, brightness
    )
}
