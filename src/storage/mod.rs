//! CSV import/export for the headless host

mod csv;

pub use csv::{CsvTable, parse_csv, read_csv, write_csv};
