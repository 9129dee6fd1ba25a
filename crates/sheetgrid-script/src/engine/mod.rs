//! Expression engine API.
//!
//! - [`ScriptEngine`], [`create_engine`] - Sandboxed Rhai evaluation with a compile cache
//! - [`TransformContext`] - Scope for "before display" cell transforms
//! - [`Aggregate`], [`aggregate`] - Column footer aggregates
//! - [`NumberFormat`], [`format_number_with`], [`format_date_with`] - Display formatting

mod aggregate;
mod eval;
mod format;

pub use aggregate::{Aggregate, aggregate};
pub use eval::{AstCache, ScriptEngine, TransformContext, create_engine};
pub use format::{
    NumberFormat, format_date_with, format_dynamic, format_number, format_number_with,
    parse_date, parse_number, to_strftime,
};

pub use rhai::{AST, Dynamic};
