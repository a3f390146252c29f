//! Error handling for the resume relevance checker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelevanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, RelevanceError>;

/// The Model2Vec backend reports load failures through anyhow
impl From<anyhow::Error> for RelevanceError {
    fn from(err: anyhow::Error) -> Self {
        RelevanceError::ModelError(err.to_string())
    }
}
