use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, LargeStringArray, StringArray};
use arrow::datatypes::DataType;
use arrow::ipc::reader::FileReader;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use tracing::{debug, info};

use crate::dataview::Table;
use crate::record::CellValue;
use crate::schema::{Column, RoleSet};
use crate::DataError;

/// Field metadata key holding a column's roles, e.g. `latitude` or `category+size`
pub const ROLES_METADATA_KEY: &str = "roles";

/// Convert a record batch into a table.
///
/// Column roles come from the field metadata under [`ROLES_METADATA_KEY`].
/// Numeric columns become numbers, string columns text, boolean columns
/// booleans; nulls stay null.
pub fn table_from_batch(batch: &RecordBatch) -> Result<Table, DataError> {
    let schema = batch.schema();
    let mut columns = Vec::with_capacity(schema.fields().len());
    let mut cells = Vec::with_capacity(schema.fields().len());

    for (field, array) in schema.fields().iter().zip(batch.columns()) {
        let roles = match field.metadata().get(ROLES_METADATA_KEY) {
            Some(roles) => RoleSet::parse(roles)?,
            None => RoleSet::default(),
        };
        columns.push(Column {
            name: field.name().clone(),
            roles,
        });
        cells.push(column_cells(array)?);
    }

    let rows = (0..batch.num_rows())
        .map(|row| cells.iter().map(|column| column[row].clone()).collect())
        .collect();

    Ok(Table { columns, rows })
}

/// Load every batch of an Arrow IPC file into one table
pub fn load_ipc(path: &Path) -> Result<Table, DataError> {
    let reader = FileReader::try_new(File::open(path)?, None)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    let mut table = Table::default();
    for (i, batch) in batches.iter().enumerate() {
        let part = table_from_batch(batch)?;
        if i == 0 {
            table.columns = part.columns;
        }
        table.rows.extend(part.rows);
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!("{}", pretty_format_batches(&batches)?);
    }
    info!(
        "Loaded {} rows in {} batch(es) from {}",
        table.rows.len(),
        batches.len(),
        path.display()
    );
    Ok(table)
}

fn column_cells(array: &ArrayRef) -> Result<Vec<CellValue>, DataError> {
    let cell = |i: usize, value: CellValue| {
        if array.is_null(i) {
            CellValue::Null
        } else {
            value
        }
    };

    match array.data_type() {
        DataType::Boolean => {
            let values = downcast::<BooleanArray>(array)?;
            Ok((0..values.len())
                .map(|i| cell(i, CellValue::Bool(values.value(i))))
                .collect())
        }
        DataType::Utf8 => {
            let values = downcast::<StringArray>(array)?;
            Ok((0..values.len())
                .map(|i| cell(i, CellValue::Text(values.value(i).to_string())))
                .collect())
        }
        DataType::LargeUtf8 => {
            let values = downcast::<LargeStringArray>(array)?;
            Ok((0..values.len())
                .map(|i| cell(i, CellValue::Text(values.value(i).to_string())))
                .collect())
        }
        data_type if data_type.is_numeric() => {
            let cast = arrow::compute::cast(array, &DataType::Float64)?;
            let values = downcast::<Float64Array>(&cast)?;
            Ok((0..values.len())
                .map(|i| cell(i, CellValue::Number(values.value(i))))
                .collect())
        }
        other => Err(DataError::UnsupportedType(other.to_string())),
    }
}

fn downcast<T: 'static>(array: &ArrayRef) -> Result<&T, DataError> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| DataError::UnsupportedType(array.data_type().to_string()))
}
