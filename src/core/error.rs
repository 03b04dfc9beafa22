use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoomError {
    #[error("Design not found: {0}")]
    DesignNotFound(String),

    #[error("Invalid design: {0}")]
    InvalidDesign(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("LLM request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RoomError>;
