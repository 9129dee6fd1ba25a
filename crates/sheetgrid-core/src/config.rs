//! Grid configuration.

use std::collections::HashSet;

use serde::Deserialize;
use sheetgrid_script::{Aggregate, ScriptEngine};

use crate::column::ColumnSpec;
use crate::error::{GridError, Result};
use crate::paging::PagingMode;

pub const DEFAULT_MAX_SHOW_ALL: usize = 1000;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PagingConfig {
    pub mode: PagingMode,
    /// Rows per page; 0 disables paging.
    pub page_size: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GridConfig {
    pub editable: bool,
    pub paging: PagingConfig,
    /// Sort inserted rows along with existing ones instead of keeping them last.
    pub sort_new_rows: bool,
    /// Row cap applied when every row is requested at once.
    pub max_show_all: usize,
    pub columns: Vec<ColumnSpec>,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            editable: true,
            paging: PagingConfig::default(),
            sort_new_rows: false,
            max_show_all: DEFAULT_MAX_SHOW_ALL,
            columns: Vec::new(),
        }
    }
}

impl GridConfig {
    pub fn with_columns(columns: Vec<ColumnSpec>) -> GridConfig {
        GridConfig {
            columns,
            ..GridConfig::default()
        }
    }

    /// Check column keys and compile every expression up front so a malformed
    /// one is reported here rather than on first use.
    pub fn validate(&self, engine: &ScriptEngine) -> Result<()> {
        let mut seen = HashSet::new();
        for (index, column) in self.columns.iter().enumerate() {
            if column.key.trim().is_empty() {
                return Err(GridError::EmptyColumnKey { index });
            }
            if !seen.insert(column.key.as_str()) {
                return Err(GridError::DuplicateColumn(column.key.clone()));
            }
            if column.lookup().is_some_and(<[_]>::is_empty) {
                return Err(GridError::EmptyLookup {
                    column: column.key.clone(),
                });
            }
            let expression_error = |source| GridError::Expression {
                column: column.key.clone(),
                source,
            };
            if let Some(expr) = &column.before_display {
                engine.validate(expr).map_err(expression_error)?;
            }
            if let Some(Aggregate::Custom(expr)) = &column.footer {
                engine.validate(expr).map_err(expression_error)?;
            }
        }
        Ok(())
    }
}
