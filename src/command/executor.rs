//! Command execution - resolves a command and applies it to a design state

use crate::command::action::ActionDescriptor;
use crate::command::resolver::CommandResolver;
use crate::room::state::DesignState;

/// Resolves commands and applies the resulting descriptors
pub struct CommandExecutor;

impl CommandExecutor {
    /// Resolve `command` against `state` and apply the result
    pub async fn execute(
        resolver: &CommandResolver,
        state: &mut DesignState,
        command: &str,
    ) -> ExecutionResult {
        let room_state = state.to_room_state();
        let descriptor = resolver.resolve(command, &room_state).await;
        let applied = state.apply(&descriptor);

        if descriptor.action.is_mutation() && !applied {
            tracing::debug!(action = %descriptor.action, "Descriptor had nothing to apply");
        }

        ExecutionResult {
            descriptor,
            applied,
        }
    }
}

/// Result of executing a command
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub descriptor: ActionDescriptor,
    /// Whether the design state changed
    pub applied: bool,
}
