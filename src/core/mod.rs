pub mod config;
pub mod error;

pub use config::{AppConfig, AssistantMode};
pub use error::{Result, RoomError};
