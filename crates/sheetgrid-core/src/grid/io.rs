//! Loading backend rows, exporting changes, and footer aggregates.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use sheetgrid_script::TransformContext;
use sheetgrid_script::engine::{aggregate, format_number};
use tracing::{debug, warn};

use crate::cell::{Cell, Value};
use crate::column::ColumnSpec;
use crate::matrix::Matrix;
use crate::point::Point;
use crate::row::{RowMeta, RowStatus};

use super::action::{StyleOverlay, TableLoad};
use super::state::{GridState, NoticeLevel};

/// Leading attribute of every exported row.
pub const STATUS_ATTR: &str = "_status";

/// Rows in the shape the backend expects: `attr` names the fields and each
/// `data` row starts with its status code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Export {
    pub attr: Vec<String>,
    pub data: Vec<Vec<String>>,
}

/// Rendered footer for one column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum FooterCell {
    None,
    Value(String),
    Error(String),
}

impl GridState {
    /// Replace all rows with freshly loaded ones, taking new snapshots.
    pub(crate) fn load(&mut self, load: TableLoad) {
        if self.columns.is_empty() {
            let width = load.rows.iter().map(Vec::len).max().unwrap_or(0);
            self.columns = Arc::new(
                (1..=width)
                    .map(|i| ColumnSpec::text(format!("column{i}")))
                    .collect(),
            );
            self.sort = vec![Default::default(); width];
        }

        let columns = self.columns.clone();
        let mut data: Vec<Vec<Cell>> = load
            .rows
            .iter()
            .map(|raw| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(c, spec)| spec.normalize_loaded(raw.get(c).unwrap_or(&Value::Empty)))
                    .collect()
            })
            .collect();

        self.apply_transforms(&columns, &mut data);
        apply_styles(&mut data, &load.styles);

        let mut rows = Vec::with_capacity(data.len());
        let mut snapshots = HashMap::with_capacity(data.len());
        for cells in &data {
            let meta = RowMeta::loaded(self.next_id());
            snapshots.insert(
                meta.id,
                columns
                    .iter()
                    .zip(cells)
                    .map(|(spec, cell)| spec.compare_value(cell))
                    .collect(),
            );
            rows.push(meta);
        }

        debug!(target: "grid", rows = data.len(), columns = columns.len(), "loaded rows");
        self.data = Matrix::from_rows(data);
        self.rows = rows;
        self.snapshots = Arc::new(snapshots);
    }

    /// Run each column's before-display expression over the loaded cells.
    /// A failing expression leaves the normalized value and reports once.
    fn apply_transforms(&mut self, columns: &[ColumnSpec], data: &mut [Vec<Cell>]) {
        for (c, spec) in columns.iter().enumerate() {
            let Some(expr) = spec.before_display.as_deref() else {
                continue;
            };
            let mut failure = None;
            for cells in data.iter_mut() {
                let ctx = TransformContext {
                    value: cells[c].display(),
                    column: spec.key.clone(),
                    row: columns
                        .iter()
                        .zip(cells.iter())
                        .map(|(s, cell)| (s.key.clone(), s.display(cell)))
                        .collect(),
                };
                match self.script.eval_transform(expr, &ctx) {
                    Ok(text) => {
                        let key = cells[c].combo_key.clone();
                        cells[c] = cells[c].with_value(Value::from(text), key);
                    }
                    Err(e) => {
                        failure.get_or_insert(e.to_string());
                    }
                }
            }
            if let Some(message) = failure {
                warn!(target: "grid", column = %spec.key, error = %message, "before-display expression failed");
                self.notice(
                    NoticeLevel::Error,
                    format!("Column {}: {}", spec.key, message),
                );
            }
        }
    }

    /// Every row with its status code, in current order.
    pub fn export(&self) -> Export {
        self.export_where(|_| true)
    }

    /// Only rows that need syncing: inserted, modified or deleted.
    pub fn export_changes(&self) -> Export {
        self.export_where(|meta| meta.status != RowStatus::Unchanged)
    }

    fn export_where(&self, keep: impl Fn(&RowMeta) -> bool) -> Export {
        let attr = std::iter::once(STATUS_ATTR.to_string())
            .chain(self.columns.iter().map(|c| c.key.clone()))
            .collect();
        let data = self
            .rows
            .iter()
            .zip(self.data.rows())
            .filter(|(meta, _)| keep(meta))
            .map(|(meta, cells)| {
                std::iter::once(meta.status.code().to_string())
                    .chain(
                        self.columns
                            .iter()
                            .zip(cells)
                            .map(|(spec, cell)| spec.export_value(cell)),
                    )
                    .collect()
            })
            .collect();
        Export { attr, data }
    }

    /// Footer aggregate of a column over shown rows that are not deleted.
    pub fn footer(&self, column: usize) -> FooterCell {
        let Some(spec) = self.columns.get(column) else {
            return FooterCell::None;
        };
        let Some(kind) = &spec.footer else {
            return FooterCell::None;
        };
        let values: Vec<String> = self
            .show_range
            .iter()
            .filter(|&&row| !self.rows.get(row).is_some_and(RowMeta::is_deleted))
            .filter_map(|&row| self.data.get(Point::at(row, column)))
            .map(|cell| match &cell.value {
                Value::Number(n) => format_number(*n),
                _ => spec.display(cell),
            })
            .collect();
        match aggregate(&self.script, kind, &values) {
            Ok(Some(text)) => FooterCell::Value(text),
            Ok(None) => FooterCell::None,
            Err(e) => {
                warn!(target: "grid", column = %spec.key, error = %e, "footer aggregate failed");
                FooterCell::Error(e.to_string())
            }
        }
    }

    pub fn footers(&self) -> Vec<FooterCell> {
        (0..self.columns.len()).map(|c| self.footer(c)).collect()
    }
}

fn apply_styles(data: &mut [Vec<Cell>], styles: &[StyleOverlay]) {
    for style in styles {
        let Some(cells) = data.get_mut(style.row) else {
            continue;
        };
        match style.column {
            Some(column) => {
                if let Some(cell) = cells.get_mut(column) {
                    cell.class_name = Some(style.class_name.clone());
                }
            }
            None => {
                for cell in cells.iter_mut() {
                    cell.class_name = Some(style.class_name.clone());
                }
            }
        }
    }
}
