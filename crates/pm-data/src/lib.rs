//! Data model and data sources for the point map visual

pub mod config;
pub mod dataview;
pub mod record;
pub mod schema;
pub mod sources;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use config::{ApiSettings, InteractionConfig, MapboxSettings, MaxSizeScope, RenderConfig};
pub use dataview::{DataView, Metadata, Table, UpdateOptions};
pub use record::{records, CategoryKey, CellValue, Record};
pub use schema::{legend_column, Column, Role, RoleMapping, RoleSet};
pub use sources::CsvSource;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(ArrowError),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No column has the {0} role")]
    MissingRole(Role),

    #[error("Role {role} is carried by more than one column: {columns:?}")]
    DuplicateRole { role: Role, columns: Vec<String> },

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("Row {row} has {found} cells, expected {expected}")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<ArrowError> for DataError {
    fn from(error: ArrowError) -> Self {
        DataError::Arrow(error)
    }
}
