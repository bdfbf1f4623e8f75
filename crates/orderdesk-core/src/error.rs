use crate::types::MemberId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("order with ID {0} not found")]
    OrderNotFound(String),

    #[error("order with ID {0} already exists")]
    OrderExists(String),

    #[error("member {0} is not registered")]
    MemberNotFound(MemberId),

    #[error("{0}")]
    Usage(String),

    #[error("log delivery failed: {0}")]
    Notify(String),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeskError>;
