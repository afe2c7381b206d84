use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapctlError {
    #[error("At least one attribute or capability is required")]
    MissingContent,

    #[error("invalid answer: {0}")]
    InvalidAnswer(String),

    #[error("unsupported value type: {0}")]
    UnknownValueType(String),

    #[error("wizard reached an impossible state: {0}")]
    UnreachableState(String),

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("api request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CapctlError>;
