//! Host data views

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::CellValue;
use crate::schema::Column;

/// Tabular payload: columns plus positional rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Metadata accompanying a table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub columns: Vec<Column>,
    /// Property pane objects, e.g. `{"api": {"accessToken": ...}}`
    #[serde(default)]
    pub objects: Value,
}

/// One data view as the host hands it over
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataView {
    pub metadata: Metadata,
    pub table: Table,
}

impl DataView {
    /// Build a view whose metadata columns mirror the table's
    pub fn new(table: Table, objects: Value) -> Self {
        Self {
            metadata: Metadata {
                columns: table.columns.clone(),
                objects,
            },
            table,
        }
    }
}

/// Arguments of one update call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    pub data_views: Vec<DataView>,
}

impl UpdateOptions {
    pub fn single(view: DataView) -> Self {
        Self {
            data_views: vec![view],
        }
    }

    /// The view the visual renders
    pub fn primary(&self) -> Option<&DataView> {
        self.data_views.first()
    }
}
