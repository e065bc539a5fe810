use thiserror::Error;

#[derive(Debug, Error)]
pub enum PilotError {
    #[error("{0}")]
    Parse(String),

    /// `element` is the offending raw record, serialized back to JSON.
    #[error("{message} (offending action: {element})")]
    Validation { message: String, element: String },

    #[error("Timed out waiting for condition after {checks} checks")]
    Timeout { checks: u32 },

    #[error("Wait cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl PilotError {
    pub(crate) fn validation(message: impl Into<String>, element: &serde_json::Value) -> Self {
        PilotError::Validation {
            message: message.into(),
            element: element.to_string(),
        }
    }
}

pub type PilotResult<T> = Result<T, PilotError>;
