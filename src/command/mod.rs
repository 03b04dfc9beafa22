//! Command interpretation pipeline
//!
//! Free text -> CommandResolver -> ActionDescriptor -> DesignState::apply

pub mod action;
pub mod executor;
pub mod keywords;
pub mod resolver;

pub use action::{ActionDescriptor, ActionKind, Coordinates, Position};
pub use executor::{CommandExecutor, ExecutionResult};
pub use keywords::resolve_keywords;
pub use resolver::CommandResolver;
