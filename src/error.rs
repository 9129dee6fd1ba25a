//! Error types for the sheetgrid binary

use sheetgrid_core::GridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Config error in {path}: {message}")]
    Config { path: String, message: String },

    #[error("Command {index} `{command}`: {message}")]
    Command {
        index: usize,
        command: String,
        message: String,
    },

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type Result<T> = std::result::Result<T, AppError>;
