pub mod export;
pub mod json;

use thiserror::Error;

use crate::model::table::TableError;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("table error: {0}")]
    Table(#[from] TableError),
    #[error("attribute table has no {0} column")]
    MissingIndex(&'static str),
}
