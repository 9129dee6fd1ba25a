//! The grid state value and its read-only queries.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use sheetgrid_script::ScriptEngine;
use tracing::warn;

use crate::cell::{Cell, Value};
use crate::clipboard;
use crate::column::ColumnSpec;
use crate::config::GridConfig;
use crate::error::Result;
use crate::matrix::{Matrix, Size};
use crate::paging::{ColumnFilter, Paging, compute_show_range};
use crate::point::Point;
use crate::point_map::PointMap;
use crate::row::{RowId, RowMeta, RowStatus};
use crate::selection::Selection;
use crate::sort::SortStatus;

use super::action::Action;
use super::reducer::reduce;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    View,
    Edit,
}

/// One cell write attempted by a transition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellChange {
    pub point: Point,
    pub previous: Value,
    pub value: Value,
    /// False when the target was disabled or read-only and kept its value.
    pub applied: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Server paging request for the host to fulfil with [`Action::PageLoaded`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    pub page: usize,
    pub page_size: usize,
}

/// Side-channel output of the last transition. Notices and fetch requests
/// only live for one transition; `busy` stays set until the page arrives.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HostSignals {
    pub busy: bool,
    pub fetch: Option<FetchRequest>,
    pub notices: Vec<Notice>,
}

/// Complete grid state. Every transition builds a new value through
/// [`GridState::apply`]; the previous value is never modified.
#[derive(Clone, Debug)]
pub struct GridState {
    pub(crate) data: Matrix<Cell>,
    pub(crate) rows: Vec<RowMeta>,
    /// Comparison values captured at load time, keyed by row identity.
    pub(crate) snapshots: Arc<HashMap<RowId, Vec<Value>>>,
    pub(crate) columns: Arc<Vec<ColumnSpec>>,
    pub(crate) active: Option<Point>,
    pub(crate) mode: Mode,
    pub(crate) selection: Selection,
    pub(crate) dragging: bool,
    pub(crate) copy_buffer: PointMap<Cell>,
    pub(crate) cut: bool,
    pub(crate) sort: Vec<SortStatus>,
    pub(crate) show_range: Vec<usize>,
    pub(crate) editable: bool,
    pub(crate) sort_new_rows: bool,
    pub(crate) max_show_all: usize,
    pub(crate) paging: Paging,
    pub(crate) filters: Vec<ColumnFilter>,
    pub(crate) changes: Vec<CellChange>,
    pub(crate) signals: HostSignals,
    pub(crate) next_row_id: u64,
    pub(crate) script: ScriptEngine,
}

impl GridState {
    pub fn new(config: GridConfig) -> Result<GridState> {
        GridState::with_engine(config, ScriptEngine::new())
    }

    /// Build an empty grid sharing an existing expression engine and cache.
    pub fn with_engine(config: GridConfig, script: ScriptEngine) -> Result<GridState> {
        config.validate(&script)?;
        let column_count = config.columns.len();
        Ok(GridState {
            data: Matrix::new(),
            rows: Vec::new(),
            snapshots: Arc::default(),
            columns: Arc::new(config.columns),
            active: None,
            mode: Mode::View,
            selection: Selection::None,
            dragging: false,
            copy_buffer: PointMap::new(),
            cut: false,
            sort: vec![SortStatus::Unsorted; column_count],
            show_range: Vec::new(),
            editable: config.editable,
            sort_new_rows: config.sort_new_rows,
            max_show_all: config.max_show_all,
            paging: Paging::from_config(&config.paging),
            filters: Vec::new(),
            changes: Vec::new(),
            signals: HostSignals::default(),
            next_row_id: 0,
            script,
        })
    }

    /// Apply one transition, returning the next state.
    pub fn apply(&self, action: Action) -> GridState {
        reduce(self, action)
    }

    pub fn data(&self) -> &Matrix<Cell> {
        &self.data
    }

    pub fn size(&self) -> Size {
        Size::new(self.data.row_count(), self.columns.len())
    }

    pub fn cell(&self, point: Point) -> Option<&Cell> {
        self.data.get(point)
    }

    /// Display text of a cell, formatted for its column.
    pub fn display(&self, point: Point) -> Option<String> {
        let (_, column) = point.index()?;
        let spec = self.columns.get(column)?;
        self.data.get(point).map(|cell| spec.display(cell))
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn rows(&self) -> &[RowMeta] {
        &self.rows
    }

    pub fn row_status(&self, row: usize) -> Option<RowStatus> {
        self.rows.get(row).map(|meta| meta.status)
    }

    pub fn active(&self) -> Option<Point> {
        self.active
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Edit
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Selected points inside the matrix, honouring the show range.
    pub fn selected_points(&self) -> Vec<Point> {
        self.selection.points(self.size(), &self.show_range)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn copy_buffer(&self) -> &PointMap<Cell> {
        &self.copy_buffer
    }

    pub fn is_cut(&self) -> bool {
        self.cut
    }

    /// Clipboard text of the copy buffer.
    pub fn copy_text(&self) -> String {
        clipboard::copy_text(&self.copy_buffer, |point, cell| {
            match point.index().and_then(|(_, c)| self.columns.get(c)) {
                Some(spec) => spec.display(cell),
                None => cell.display(),
            }
        })
    }

    pub fn sort_status(&self, column: usize) -> SortStatus {
        self.sort.get(column).copied().unwrap_or_default()
    }

    /// Row indices currently shown, in display order.
    pub fn show_range(&self) -> &[usize] {
        &self.show_range
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn paging(&self) -> &Paging {
        &self.paging
    }

    pub fn total_pages(&self) -> usize {
        self.paging.total_pages(self.data.row_count())
    }

    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    /// Cell writes made by the last transition.
    pub fn changes(&self) -> &[CellChange] {
        &self.changes
    }

    pub fn signals(&self) -> &HostSignals {
        &self.signals
    }

    pub fn script(&self) -> &ScriptEngine {
        &self.script
    }

    pub(crate) fn notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.signals.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    pub(crate) fn next_id(&mut self) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        id
    }

    pub(crate) fn refresh_show_range(&mut self) {
        let shown = compute_show_range(
            &self.data,
            &self.columns,
            &self.paging,
            &self.filters,
            self.max_show_all,
        );
        if shown.truncated {
            warn!(
                target: "grid",
                rows = self.data.row_count(),
                cap = self.max_show_all,
                "show-all capped"
            );
            let message = format!(
                "Showing the first {} of {} rows",
                self.max_show_all,
                self.data.row_count()
            );
            self.notice(NoticeLevel::Warning, message);
        }
        self.show_range = shown.rows;
    }

    /// Whether the cell at `point` accepts a write.
    pub fn is_cell_editable(&self, point: Point) -> bool {
        let Some((row, column)) = point.index() else {
            return false;
        };
        let (Some(spec), Some(meta), Some(cell)) =
            (self.columns.get(column), self.rows.get(row), self.data.get(point))
        else {
            return false;
        };
        self.editable && !spec.disabled && !cell.read_only && !meta.is_deleted()
    }

    /// Compare a row against its load-time snapshot. Rows without a snapshot
    /// were inserted locally and are always dirty.
    pub(crate) fn compute_dirty(&self, row: usize) -> bool {
        let Some(meta) = self.rows.get(row) else {
            return false;
        };
        let Some(snapshot) = self.snapshots.get(&meta.id) else {
            return true;
        };
        let Some(cells) = self.data.row(row) else {
            return false;
        };
        self.columns.iter().enumerate().any(|(c, spec)| {
            let current = cells.get(c).map(|cell| spec.compare_value(cell));
            let original = snapshot.get(c);
            match (current, original) {
                (Some(current), Some(original)) => {
                    !current.equivalent(original, spec.is_unordered())
                }
                (None, None) => false,
                _ => true,
            }
        })
    }

    /// Recompute the dirty flag of a row and update its status from it.
    pub(crate) fn settle_row(&mut self, row: usize) {
        let dirty = self.compute_dirty(row);
        if let Some(meta) = self.rows.get_mut(row) {
            meta.settle(dirty);
        }
    }
}
