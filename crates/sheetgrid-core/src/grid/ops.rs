//! Data-editing transitions: cell writes, row insertion and deletion, and
//! the clipboard operations.

use std::collections::BTreeSet;

use tracing::debug;

use crate::cell::{Cell, Value};
use crate::clipboard;
use crate::column::ColumnSpec;
use crate::paging::PagingMode;
use crate::point::Point;
use crate::point_map::PointMap;
use crate::row::{RowMeta, RowStatus};
use crate::selection::Selection;

use super::state::{CellChange, FetchRequest, GridState, Mode};

impl GridState {
    /// Write a value and record it in the change log.
    fn write_cell(&mut self, point: Point, value: Value, key: Option<String>) {
        let Some(cell) = self.data.get(point) else {
            return;
        };
        let previous = cell.value.clone();
        let next = cell.with_value(value.clone(), key);
        self.data.replace(point, next);
        self.changes.push(CellChange {
            point,
            previous,
            value,
            applied: true,
        });
    }

    /// Record a write that was refused because the target is locked.
    fn skip_cell(&mut self, point: Point, value: Value) {
        let previous = self
            .data
            .get(point)
            .map(|cell| cell.value.clone())
            .unwrap_or_default();
        self.changes.push(CellChange {
            point,
            previous,
            value,
            applied: false,
        });
    }

    fn push_inserted(&mut self, cells: Vec<Cell>) {
        let id = self.next_id();
        self.data.push_row(cells);
        self.rows.push(RowMeta::inserted(id));
    }

    /// Selected points, or the active point when nothing is selected.
    fn target_points(&self) -> Vec<Point> {
        let points = self.selected_points();
        if !points.is_empty() {
            return points;
        }
        self.active
            .filter(|p| self.data.has(*p))
            .into_iter()
            .collect()
    }

    pub(crate) fn set_cell_data(&mut self, point: Point, value: Value) {
        if !self.is_cell_editable(point) {
            debug!(target: "grid", %point, "write rejected");
            return;
        }
        let Some((row, column)) = point.index() else {
            return;
        };
        let columns = self.columns.clone();
        let (value, key) = columns[column].coerce_value(value);
        self.write_cell(point, value, key);
        self.settle_row(row);
    }

    pub(crate) fn add_row(&mut self) {
        if !self.editable {
            debug!(target: "grid", "add row rejected: grid is read-only");
            return;
        }
        let cells = self.columns.iter().map(ColumnSpec::default_cell).collect();
        self.push_inserted(cells);
        self.active = None;
        self.selection = Selection::None;
        self.mode = Mode::View;
        if self.paging.mode == PagingMode::Client
            && self.paging.is_enabled()
            && !self.paging.is_show_all()
        {
            self.paging.page_number = self.total_pages();
        }
        self.refresh_show_range();
    }

    /// Toggle deletion of a row. Locally inserted rows are removed outright.
    pub(crate) fn delete_row(&mut self, row: usize) {
        if !self.editable {
            debug!(target: "grid", row, "delete rejected: grid is read-only");
            return;
        }
        let Some(meta) = self.rows.get_mut(row) else {
            return;
        };
        if meta.toggle_deleted() {
            if self.active.is_some_and(|p| p.row == row as i64) {
                self.mode = Mode::View;
            }
        } else {
            self.data.remove_row(row);
            self.rows.remove(row);
            self.active = None;
            self.selection = Selection::None;
            self.mode = Mode::View;
            self.copy_buffer.clear();
            self.cut = false;
        }
        self.refresh_show_range();
        self.settle_page();
    }

    /// Step back when the current page no longer has rows.
    pub(crate) fn settle_page(&mut self) {
        if !self.paging.is_enabled() || self.paging.is_show_all() {
            return;
        }
        match self.paging.mode {
            PagingMode::Client => {
                let last = self.total_pages();
                if self.paging.page_number > last {
                    self.paging.page_number = last;
                    self.refresh_show_range();
                }
            }
            PagingMode::Server => {
                if self.data.is_empty() && self.paging.page_number > 1 {
                    self.request_page(self.paging.page_number - 1);
                }
            }
        }
    }

    pub(crate) fn request_page(&mut self, page: usize) {
        debug!(target: "grid", page, page_size = self.paging.page_size, "requesting page");
        self.signals.fetch = Some(FetchRequest {
            page,
            page_size: self.paging.page_size,
        });
        self.signals.busy = true;
    }

    pub(crate) fn copy(&mut self, cut: bool) {
        let buffer: PointMap<Cell> = self
            .target_points()
            .into_iter()
            .filter_map(|p| self.data.get(p).map(|cell| (p, cell.clone())))
            .collect();
        self.cut = cut && !buffer.is_empty();
        self.copy_buffer = buffer;
    }

    /// Empty the source cells of a pending cut.
    fn clear_cut_source(&mut self) {
        let sources: Vec<Point> = self.copy_buffer.keys().collect();
        let mut touched = BTreeSet::new();
        for point in sources {
            if !self.is_cell_editable(point) {
                continue;
            }
            let Some((row, column)) = point.index() else {
                continue;
            };
            let (value, key) = self.columns[column].coerce_input("");
            self.write_cell(point, value, key);
            touched.insert(row);
        }
        for row in touched {
            self.settle_row(row);
        }
        self.copy_buffer.clear();
        self.cut = false;
    }

    /// Paste clipboard text with its top-left cell at the active point,
    /// growing the matrix with inserted rows as needed.
    pub(crate) fn paste(&mut self, text: &str) {
        if !self.editable {
            debug!(target: "grid", "paste rejected: grid is read-only");
            return;
        }
        let Some((start_row, start_column)) = self.active.and_then(Point::index) else {
            return;
        };
        let source = clipboard::parse(text);
        if source.is_empty() {
            return;
        }
        if self.cut {
            self.clear_cut_source();
        }

        let columns = self.columns.clone();
        while self.data.row_count() < start_row + source.row_count() {
            let cells = columns.iter().map(ColumnSpec::blank_cell).collect();
            self.push_inserted(cells);
        }

        let mut touched = BTreeSet::new();
        let mut width = 0;
        for (r, line) in source.rows().enumerate() {
            let row = start_row + r;
            touched.insert(row);
            for (c, text) in line.iter().enumerate() {
                let column = start_column + c;
                let Some(spec) = columns.get(column) else {
                    continue;
                };
                width = width.max(c + 1);
                let point = Point::at(row, column);
                let (value, key) = spec.coerce_input(text);
                let locked = spec.disabled || self.data.get(point).is_some_and(|cell| cell.read_only);
                if locked {
                    self.skip_cell(point, value);
                } else {
                    self.write_cell(point, value, key);
                }
            }
        }

        for row in touched {
            let dirty = self.compute_dirty(row);
            if let Some(meta) = self.rows.get_mut(row) {
                meta.dirty = dirty;
                if !meta.is_inserted() {
                    meta.status = RowStatus::Modified;
                }
            }
        }

        if width > 0 {
            let end = Point::at(start_row + source.row_count() - 1, start_column + width - 1);
            self.selection = Selection::range(Point::at(start_row, start_column), end);
        }
        self.mode = Mode::View;
        self.refresh_show_range();
    }

    /// Empty every selected cell that accepts writes.
    pub(crate) fn clear(&mut self) {
        if !self.editable {
            return;
        }
        let columns = self.columns.clone();
        let mut touched = BTreeSet::new();
        for point in self.target_points() {
            if !self.is_cell_editable(point) {
                continue;
            }
            let Some((row, column)) = point.index() else {
                continue;
            };
            let (value, key) = columns[column].coerce_input("");
            let unchanged = self
                .data
                .get(point)
                .is_some_and(|cell| cell.value == value && cell.combo_key == key);
            if unchanged {
                continue;
            }
            self.write_cell(point, value, key);
            touched.insert(row);
        }
        for row in touched {
            self.settle_row(row);
        }
        self.cut = false;
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::Value;
    use crate::column::{ColumnKind, ColumnSpec, LookupEntry};
    use crate::config::{GridConfig, PagingConfig};
    use crate::grid::testing::{column_texts, load, text_grid};
    use crate::grid::{Action, GridState, TableLoad};
    use crate::paging::{PageRequest, PagingMode};
    use crate::point::Point;
    use crate::row::RowStatus;
    use crate::selection::Selection;

    fn city() -> ColumnSpec {
        ColumnSpec::text("city").with_kind(ColumnKind::Combo {
            lookup: vec![
                LookupEntry::new("SEL", "Seoul"),
                LookupEntry::new("BSN", "Busan"),
            ],
        })
    }

    fn set(point: Point, value: &str) -> Action {
        Action::SetCellData {
            point,
            value: Value::from(value),
        }
    }

    #[test]
    fn test_paste_grows_matrix_with_inserted_rows() {
        let state = text_grid(&["a", "b"], &[&["1", "2"]]).apply(Action::Activate(Point::ORIGIN));
        let pasted = state.apply(Action::Paste("5\t6\n7\t8".into()));
        assert_eq!(column_texts(&pasted, 0), ["5", "7"]);
        assert_eq!(column_texts(&pasted, 1), ["6", "8"]);
        assert_eq!(pasted.row_status(0), Some(RowStatus::Modified));
        assert_eq!(pasted.row_status(1), Some(RowStatus::Inserted));
        assert_eq!(
            pasted.selection(),
            Selection::range(Point::ORIGIN, Point::new(1, 1))
        );
        assert_eq!(pasted.changes().len(), 4);
        assert_eq!(pasted.show_range(), [0, 1]);
    }

    #[test]
    fn test_paste_ignores_columns_past_the_edge() {
        let state = text_grid(&["a", "b"], &[&["1", "2"]])
            .apply(Action::Activate(Point::new(0, 1)))
            .apply(Action::Paste("x\ty\tz".into()));
        assert_eq!(column_texts(&state, 0), ["1"]);
        assert_eq!(column_texts(&state, 1), ["x"]);
        assert_eq!(state.changes().len(), 1);
    }

    #[test]
    fn test_paste_skips_disabled_columns_but_logs_them() {
        let columns = vec![ColumnSpec::text("a"), ColumnSpec::text("b").disabled()];
        let rows: &[&[&str]] = &[&["1", "2"]];
        let state = load(GridConfig::with_columns(columns), rows)
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::Paste("x\ty".into()));
        assert_eq!(column_texts(&state, 0), ["x"]);
        assert_eq!(column_texts(&state, 1), ["2"]);
        let changes = state.changes();
        assert_eq!(changes.len(), 2);
        assert!(changes[0].applied);
        assert!(!changes[1].applied);
        assert_eq!(changes[1].value, Value::text("y"));
    }

    #[test]
    fn test_paste_resolves_combo_labels() {
        let rows: &[&[&str]] = &[&["SEL"], &["SEL"]];
        let state = load(GridConfig::with_columns(vec![city()]), rows)
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::Paste("Busan\nTokyo".into()));
        assert_eq!(column_texts(&state, 0), ["Busan", ""]);
        assert_eq!(
            state.cell(Point::ORIGIN).and_then(|c| c.combo_key.clone()),
            Some("BSN".to_string())
        );
        assert_eq!(state.export().data[1], ["~", ""]);
    }

    #[test]
    fn test_cut_and_paste_moves_cells() {
        let cut = text_grid(&["a", "b"], &[&["1", "2"], &["3", "4"]])
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::Cut);
        assert!(cut.is_cut());
        assert_eq!(cut.copy_text(), "1");

        let moved = cut
            .apply(Action::Activate(Point::new(1, 1)))
            .apply(Action::Paste(cut.copy_text()));
        assert_eq!(column_texts(&moved, 0), ["", "3"]);
        assert_eq!(column_texts(&moved, 1), ["2", "1"]);
        assert!(!moved.is_cut());
        assert!(moved.copy_buffer().is_empty());
        assert_eq!(moved.row_status(0), Some(RowStatus::Modified));
    }

    #[test]
    fn test_copy_selection_text() {
        let state = text_grid(&["a", "b"], &[&["1", "2"], &["3", "4"]])
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::Select(Point::new(1, 1)))
            .apply(Action::Copy);
        assert_eq!(state.copy_text(), "1\t2\n3\t4");
        assert!(!state.is_cut());
    }

    #[test]
    fn test_copy_under_filter_leaves_hidden_rows_out() {
        let copied = text_grid(&["s"], &[&["xyz"], &["y"], &["x"]])
            .apply(Action::SetFilter {
                column: 0,
                text: "x".into(),
            })
            .apply(Action::SelectEntireColumn {
                column: 0,
                extend: false,
            })
            .apply(Action::Copy);
        assert_eq!(copied.show_range(), [0, 2]);
        assert_eq!(copied.copy_text(), "xyz\nx");

        let pasted = text_grid(&["s"], &[&["a"], &["b"], &["c"]])
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::Paste(copied.copy_text()));
        assert_eq!(column_texts(&pasted, 0), ["xyz", "x", "c"]);
        assert_eq!(pasted.row_status(2), Some(RowStatus::Unchanged));
    }

    #[test]
    fn test_clear_back_to_loaded_value_settles_row() {
        let state = text_grid(&["a", "b"], &[&["", "x"]])
            .apply(set(Point::ORIGIN, "y"))
            .apply(Action::Activate(Point::ORIGIN));
        assert_eq!(state.row_status(0), Some(RowStatus::Modified));

        let cleared = state.apply(Action::Clear);
        assert_eq!(cleared.row_status(0), Some(RowStatus::Unchanged));
        assert!(!cleared.rows()[0].dirty);
        assert!(cleared.export_changes().data.is_empty());

        let dirty = text_grid(&["a"], &[&["z"]])
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::Clear);
        assert_eq!(dirty.row_status(0), Some(RowStatus::Modified));
        assert!(dirty.rows()[0].dirty);
    }

    #[test]
    fn test_delete_toggles_and_removes_inserted_rows() {
        let state = text_grid(&["a"], &[&["1"], &["2"]]);
        let deleted = state.apply(Action::DeleteRow(0));
        assert_eq!(deleted.row_status(0), Some(RowStatus::Deleted));
        let restored = deleted.apply(Action::DeleteRow(0));
        assert_eq!(restored.row_status(0), Some(RowStatus::Unchanged));

        let edited = state
            .apply(set(Point::new(1, 0), "9"))
            .apply(Action::DeleteRow(1))
            .apply(Action::DeleteRow(1));
        assert_eq!(edited.row_status(1), Some(RowStatus::Modified));

        let added = state.apply(Action::AddRow);
        assert_eq!(added.data().row_count(), 3);
        let removed = added.apply(Action::DeleteRow(2));
        assert_eq!(removed.data().row_count(), 2);
        assert_eq!(removed.rows().len(), 2);
    }

    #[test]
    fn test_deleted_rows_refuse_writes() {
        let state = text_grid(&["a"], &[&["1"]])
            .apply(Action::DeleteRow(0))
            .apply(set(Point::ORIGIN, "2"));
        assert_eq!(column_texts(&state, 0), ["1"]);
        assert!(state.changes().is_empty());
    }

    #[test]
    fn test_add_row_uses_column_defaults() {
        let columns = vec![ColumnSpec::text("a").with_default("x"), city().with_default("SEL")];
        let rows: &[&[&str]] = &[&["1", "BSN"]];
        let state = load(GridConfig::with_columns(columns), rows)
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::AddRow);
        assert_eq!(state.data().row_count(), 2);
        assert_eq!(state.row_status(1), Some(RowStatus::Inserted));
        assert_eq!(state.display(Point::new(1, 0)).as_deref(), Some("x"));
        assert_eq!(state.display(Point::new(1, 1)).as_deref(), Some("Seoul"));
        assert_eq!(state.active(), None);
        assert!(state.selection().is_none());
    }

    #[test]
    fn test_edit_and_revert_clears_dirty() {
        let state = text_grid(&["a"], &[&["1"]]);
        let edited = state.apply(set(Point::ORIGIN, "2"));
        assert_eq!(edited.row_status(0), Some(RowStatus::Modified));
        assert!(edited.rows()[0].dirty);
        let reverted = edited.apply(set(Point::ORIGIN, "1"));
        assert_eq!(reverted.row_status(0), Some(RowStatus::Unchanged));
        assert!(!reverted.rows()[0].dirty);
    }

    #[test]
    fn test_multi_select_reorder_is_not_a_change() {
        let tags = ColumnSpec::text("tags").with_kind(ColumnKind::MultiSelect {
            lookup: vec![LookupEntry::new("a", "Alpha"), LookupEntry::new("b", "Beta")],
        });
        let rows: &[&[&str]] = &[&["a,b"]];
        let state = load(GridConfig::with_columns(vec![tags]), rows).apply(Action::SetCellData {
            point: Point::ORIGIN,
            value: Value::List(vec!["Beta".into(), "Alpha".into()]),
        });
        assert_eq!(state.changes().len(), 1);
        assert_eq!(state.row_status(0), Some(RowStatus::Unchanged));
    }

    #[test]
    fn test_read_only_cells_refuse_writes() {
        let columns = vec![ColumnSpec {
            read_only: true,
            ..ColumnSpec::text("a")
        }];
        let rows: &[&[&str]] = &[&["1"]];
        let state = load(GridConfig::with_columns(columns), rows).apply(set(Point::ORIGIN, "2"));
        assert_eq!(column_texts(&state, 0), ["1"]);
        assert_eq!(state.row_status(0), Some(RowStatus::Unchanged));
    }

    #[test]
    fn test_clear_empties_selection() {
        let state = text_grid(&["a", "b"], &[&["1", "2"], &["3", "4"]])
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::Select(Point::new(0, 1)))
            .apply(Action::Clear);
        assert_eq!(column_texts(&state, 0), ["", "3"]);
        assert_eq!(column_texts(&state, 1), ["", "4"]);
        assert_eq!(state.row_status(0), Some(RowStatus::Modified));
        assert_eq!(state.row_status(1), Some(RowStatus::Unchanged));
        assert_eq!(state.changes().len(), 2);
    }

    #[test]
    fn test_read_only_grid_refuses_structure_changes() {
        let config = GridConfig {
            editable: false,
            ..GridConfig::with_columns(vec![ColumnSpec::text("a")])
        };
        let rows: &[&[&str]] = &[&["1"]];
        let state = load(config, rows).apply(Action::Activate(Point::ORIGIN));
        assert_eq!(state.apply(Action::AddRow).data().row_count(), 1);
        assert_eq!(column_texts(&state.apply(Action::Paste("9".into())), 0), ["1"]);
        assert_eq!(state.apply(Action::DeleteRow(0)).row_status(0), Some(RowStatus::Unchanged));
    }

    #[test]
    fn test_removing_last_page_row_steps_back() {
        let config = GridConfig {
            paging: PagingConfig {
                mode: PagingMode::Client,
                page_size: 2,
            },
            ..GridConfig::with_columns(vec![ColumnSpec::text("n")])
        };
        let rows = (0..4).map(|i| vec![Value::text(i.to_string())]).collect();
        let state = GridState::new(config)
            .unwrap()
            .apply(Action::SetData(TableLoad::new(rows)))
            .apply(Action::SetPage(PageRequest::Last))
            .apply(Action::AddRow);
        assert_eq!(state.paging().page_number, 3);
        assert_eq!(state.show_range(), [4]);

        let removed = state.apply(Action::DeleteRow(4));
        assert_eq!(removed.paging().page_number, 2);
        assert_eq!(removed.show_range(), [2, 3]);
    }
}
