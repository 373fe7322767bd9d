//! Error types for Vera.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VeraError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Comparison requires at least 2 items, got {0}")]
    InsufficientItems(usize),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Generator error: {0}")]
    Generator(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
