//! Error types for sheetgrid expressions.

use rhai::EvalAltResult;
use thiserror::Error;

/// Errors raised while compiling or evaluating a configured expression.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Expression compile error: {0}")]
    Compile(String),

    #[error("Expression error: {0}")]
    Eval(
        #[from]
        #[source]
        Box<EvalAltResult>,
    ),
}

pub type Result<T> = std::result::Result<T, ScriptError>;
