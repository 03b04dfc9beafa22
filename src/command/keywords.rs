//! Keyword table interpretation
//!
//! Commands are lower-cased and scanned for fixed phrases. The table is
//! ordered: the first phrase found anywhere in the command wins. When no
//! phrase matches, three broad word checks produce a suggestion, and the
//! final fallback is the `unknown` descriptor.

use crate::command::action::{ActionDescriptor, ActionKind};

pub const ADD_SUGGESTION: &str = "I can help you add furniture, decorations, or plants to your room. Try saying 'add a sofa' or 'add a plant'.";
pub const COLOR_SUGGESTION: &str = "I can help you change colors in your room. Try saying 'change wall color' or 'make it warmer'.";
pub const LIGHTING_SUGGESTION: &str = "I can adjust the lighting in your room. Try saying 'make it brighter' or 'add warm lighting'.";

/// Phrase table in match order
pub const PHRASES: [(&str, fn() -> ActionDescriptor); 5] = [
    ("add sofa", add_sofa),
    ("change wall color", change_wall_color),
    ("add plant", add_plant),
    ("make it brighter", make_it_brighter),
    ("add coffee table", add_coffee_table),
];

fn add_sofa() -> ActionDescriptor {
    ActionDescriptor::new(
        ActionKind::AddFurniture,
        "I've added a modern gray sofa to your room. It's positioned perfectly for conversation!",
    )
    .with_item("modern_sofa")
    .with_position(0.0, 0.0, 0.0)
    .with_style("modern")
    .with_color("gray")
}

fn change_wall_color() -> ActionDescriptor {
    ActionDescriptor::new(
        ActionKind::ChangeWallColor,
        "I've changed the wall color to a warm beige. This creates a cozy atmosphere!",
    )
    .with_color("warm_beige")
}

fn add_plant() -> ActionDescriptor {
    ActionDescriptor::new(
        ActionKind::AddDecoration,
        "I've added a beautiful fiddle leaf fig plant to brighten up the space!",
    )
    .with_item("plant")
    .with_extra("type", "fiddle_leaf_fig")
    .with_position(2.0, 0.0, 1.0)
}

fn make_it_brighter() -> ActionDescriptor {
    ActionDescriptor::new(
        ActionKind::AdjustLighting,
        "I've increased the lighting to make the room brighter and more inviting!",
    )
    .with_extra("brightness", 80)
    .with_extra("temperature", "warm")
}

fn add_coffee_table() -> ActionDescriptor {
    ActionDescriptor::new(
        ActionKind::AddFurniture,
        "I've added a sleek glass coffee table that complements your sofa perfectly!",
    )
    .with_item("coffee_table")
    .with_material("glass")
    .with_position(0.0, 0.0, 0.5)
}

/// Resolve a command against the keyword table. Pure; never fails.
pub fn resolve_keywords(command: &str) -> ActionDescriptor {
    let command = command.to_lowercase();

    if let Some((_, descriptor)) = PHRASES.iter().find(|(key, _)| command.contains(key)) {
        return descriptor();
    }

    if command.contains("add") {
        ActionDescriptor::suggestion(ADD_SUGGESTION)
    } else if command.contains("change") || command.contains("color") {
        ActionDescriptor::suggestion(COLOR_SUGGESTION)
    } else if command.contains("light") || command.contains("bright") {
        ActionDescriptor::suggestion(LIGHTING_SUGGESTION)
    } else {
        ActionDescriptor::unknown()
    }
}
