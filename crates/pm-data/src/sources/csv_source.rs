use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::dataview::Table;
use crate::record::CellValue;
use crate::schema::{Column, RoleSet};
use crate::DataError;

/// Separator between a column name and its roles in a header cell
const ROLE_SEPARATOR: char = ':';

/// CSV data source.
///
/// Header cells carry the column roles after a colon, e.g.
/// `lat:latitude,lon:longitude,kind:category,count:size`. A column without
/// roles is read but never plotted. Cells are typed one by one: numbers,
/// `true`/`false`, empty as null, everything else as text.
pub struct CsvSource {
    /// Path to the CSV file
    path: PathBuf,
    /// Field delimiter
    delimiter: u8,
}

impl CsvSource {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read the whole file into a table
    pub fn load(&self) -> Result<Table, DataError> {
        let file = File::open(&self.path)?;
        let table = Self::read_table(BufReader::new(file), self.delimiter)?;
        info!(
            "Loaded {} rows x {} columns from {}",
            table.rows.len(),
            table.columns.len(),
            self.path.display()
        );
        Ok(table)
    }

    /// Read a table from any reader
    pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<Table, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let columns = csv_reader
            .headers()?
            .iter()
            .map(Self::parse_header)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("CSV columns: {:?}", columns);

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(record.iter().map(CellValue::infer).collect());
        }

        Ok(Table { columns, rows })
    }

    fn parse_header(cell: &str) -> Result<Column, DataError> {
        match cell.rsplit_once(ROLE_SEPARATOR) {
            Some((name, roles)) => Ok(Column {
                name: name.trim().to_string(),
                roles: RoleSet::parse(roles)?,
            }),
            None => Ok(Column {
                name: cell.trim().to_string(),
                roles: RoleSet::default(),
            }),
        }
    }
}
