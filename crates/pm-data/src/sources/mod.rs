pub mod arrow_source;
pub mod csv_source;
pub mod json_source;

pub use arrow_source::{load_ipc, table_from_batch};
pub use csv_source::CsvSource;
pub use json_source::{load_update_options, parse_update_options};
