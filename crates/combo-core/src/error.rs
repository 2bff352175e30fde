use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComboError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Item list error: {0}")]
    Items(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ComboError>;
