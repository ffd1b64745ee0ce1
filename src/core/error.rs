use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Invalid save payload: {0}")]
    Save(String),

    #[error("Message listener failed: {0}")]
    Listener(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DriftError>;
