//! Turn language model output into action descriptors
//!
//! The model is asked for a single JSON object in the action descriptor
//! schema. Output is accepted only if it contains a well-formed object with
//! a known `action` tag and a non-empty `message`.

use crate::command::action::ActionDescriptor;
use crate::core::error::{Result, RoomError};
use serde_json::Value;

/// Build the user prompt for command interpretation
///
/// The command is embedded literally and the room state is serialized as
/// compact JSON.
pub fn build_command_prompt(command: &str, room_state: &Value) -> String {
    let state = serde_json::to_string(room_state).unwrap_or_else(|_| "{}".into());
    format!(
        "Parse the following user command and return a JSON response with the appropriate action.\n\n\
         User command: \"{}\"\n\
         Current room state: {}\n\n\
         Return JSON only:",
        command, state
    )
}

/// Parse a raw completion into a validated descriptor
pub fn parse_action(response: &str) -> Result<ActionDescriptor> {
    let json_str = extract_json(response)?;
    let value: Value = serde_json::from_str(json_str)?;
    validate_action(value)
}

/// Check the parsed object against the descriptor schema
pub fn validate_action(value: Value) -> Result<ActionDescriptor> {
    let Some(object) = value.as_object() else {
        return Err(RoomError::LlmError("Response is not a JSON object".into()));
    };

    match object.get("message").and_then(Value::as_str) {
        Some(message) if !message.trim().is_empty() => {}
        _ => {
            return Err(RoomError::LlmError(
                "Response is missing a message".into(),
            ))
        }
    }

    serde_json::from_value(value).map_err(|e| {
        RoomError::LlmError(format!("Response does not match the action schema: {}", e))
    })
}

/// Extract JSON object from LLM response (handles surrounding text)
pub fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| RoomError::LlmError("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| RoomError::LlmError("No closing brace found in response".into()))?;
    if end < start {
        return Err(RoomError::LlmError("No JSON found in response".into()));
    }
    Ok(&response[start..=end])
}

/// System prompt for command interpretation
pub const COMMAND_SYSTEM_PROMPT: &str = r#"You are a helpful interior design AI assistant. Always respond with valid JSON.

AVAILABLE ACTIONS:
- add_furniture: Add furniture items (sofa, chair, table, bed, etc.)
- remove_furniture: Remove existing furniture
- change_wall_color: Change wall colors
- change_flooring: Change floor materials
- adjust_lighting: Modify lighting settings
- move_furniture: Reposition existing items
- change_style: Apply style themes (modern, traditional, minimalist, etc.)
- add_decoration: Add plants, art and other decorations

OUTPUT FORMAT (JSON only, no explanation):
{
  "action": "action_type",
  "item": "item_name",
  "position": {"x": 0, "y": 0, "z": 0},
  "style": "style_name",
  "color": "color_name",
  "material": "material_name",
  "size": "size_description",
  "message": "Friendly response to the user about what you're doing"
}

Only include fields relevant to the action. "action" and "message" are always required.
For adjust_lighting you may add "brightness" (0-100) and "temperature" ("warm", "neutral", "cool").

Examples:
"add a reading chair by the window" -> {"action": "add_furniture", "item": "reading_chair", "position": {"x": 3, "y": 0, "z": 1}, "style": "modern", "message": "I've placed a cozy reading chair by the window."}
"paint the walls sage green" -> {"action": "change_wall_color", "color": "sage_green", "message": "Your walls are now a calming sage green."}
"dim the lights" -> {"action": "adjust_lighting", "brightness": 40, "temperature": "warm", "message": "I've dimmed the lights for a relaxed mood."}
"#;

/// Prompt for describing an uploaded room photo
pub const DESCRIBE_ROOM_PROMPT: &str = "Analyze this room image and provide a detailed description of the space, including furniture, colors, style, and layout. Keep it concise but informative.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::action::ActionKind;
    use serde_json::json;

    #[test]
    fn test_extract_json_simple() {
        let response = r#"{"action": "add_furniture", "message": "ok"}"#;
        let json = extract_json(response).unwrap();
        assert_eq!(json, response);
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = "```json\n{\"action\": \"change_style\", \"style\": \"minimalist\", \"message\": \"Done\"}\n```";
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("minimalist"));
    }

    #[test]
    fn test_extract_json_no_json() {
        assert!(extract_json("I don't understand that command").is_err());
        assert!(extract_json("} backwards {").is_err());
    }

    #[test]
    fn test_parse_action_full() {
        let response = r#"{
            "action": "add_furniture",
            "item": "bookshelf",
            "position": {"x": 1, "y": 0, "z": 2},
            "material": "oak",
            "message": "Added an oak bookshelf."
        }"#;
        let descriptor = parse_action(response).unwrap();
        assert_eq!(descriptor.action, ActionKind::AddFurniture);
        assert_eq!(descriptor.item.as_deref(), Some("bookshelf"));
        assert_eq!(descriptor.material.as_deref(), Some("oak"));
        assert_eq!(descriptor.position.unwrap().to_position().z, 2.0);
    }

    #[test]
    fn test_parse_action_malformed_json() {
        let result = parse_action(r#"{"action": "add_furniture", "message": }"#);
        assert!(matches!(result, Err(RoomError::SerdeError(_))));
    }

    #[test]
    fn test_validate_unknown_tag() {
        let result = validate_action(json!({"action": "demolish_house", "message": "Boom"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_missing_or_empty_message() {
        assert!(validate_action(json!({"action": "add_furniture"})).is_err());
        assert!(validate_action(json!({"action": "add_furniture", "message": "  "})).is_err());
        assert!(validate_action(json!({"action": "add_furniture", "message": 5})).is_err());
    }

    #[test]
    fn test_validate_not_an_object() {
        assert!(validate_action(json!(["add_furniture"])).is_err());
    }

    #[test]
    fn test_command_prompt_embeds_inputs() {
        let prompt = build_command_prompt(
            "add a lamp",
            &json!({"walls": {"color": "white"}}),
        );
        assert!(prompt.contains("User command: \"add a lamp\""));
        assert!(prompt.contains(r#"{"walls":{"color":"white"}}"#));
    }
}
