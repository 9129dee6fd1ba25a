//! sheetgrid_script - Sandboxed expressions, aggregates and display formatting.

pub mod builtins;
pub mod engine;
pub mod error;

pub use engine::{Aggregate, ScriptEngine, TransformContext};
pub use error::{Result, ScriptError};
