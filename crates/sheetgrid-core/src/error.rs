//! Error types for the grid engine.

use sheetgrid_script::ScriptError;
use thiserror::Error;

/// Configuration problems detected before a grid is built.
///
/// Transitions never fail: an action that is not allowed in the current
/// state leaves the state unchanged.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Column {index} has an empty key")]
    EmptyColumnKey { index: usize },

    #[error("Duplicate column key: {0}")]
    DuplicateColumn(String),

    #[error("Column {column} lookup is empty")]
    EmptyLookup { column: String },

    #[error("Column {column}: {source}")]
    Expression { column: String, source: ScriptError },

    #[error("Unknown column: {0}")]
    UnknownColumn(usize),
}

pub type Result<T> = std::result::Result<T, GridError>;
