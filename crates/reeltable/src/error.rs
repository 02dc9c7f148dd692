use crate::model::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("Duplicate record id: {0}")]
    DuplicateRecord(RecordId),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, TableError>;
