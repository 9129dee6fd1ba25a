//! The transition function.

use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::paging::{ColumnFilter, PageRequest, PagingMode};
use crate::point::Point;
use crate::selection::{Direction, Selection, Span};
use crate::sort::{SortStatus, sorted_order};

use super::action::{Action, Key, KeyPress, PageLoad, TableLoad};
use super::state::{GridState, Mode, NoticeLevel};

/// Compute the state that follows `action`. `state` is left untouched; an
/// action that is not allowed returns an equal state.
pub fn reduce(state: &GridState, action: Action) -> GridState {
    let mut next = state.clone();
    next.changes.clear();
    next.signals.notices.clear();
    next.signals.fetch = None;
    trace!(target: "grid", action = action.name(), "reduce");
    next.dispatch(action);

    next.selection = next.selection.normalize_to(next.size());
    if next.active.is_some_and(|p| !next.data.has(p)) {
        next.active = None;
        next.mode = Mode::View;
    }
    next
}

fn direction_of(key: Key) -> Option<Direction> {
    match key {
        Key::ArrowUp => Some(Direction::Up),
        Key::ArrowDown => Some(Direction::Down),
        Key::ArrowLeft => Some(Direction::Left),
        Key::ArrowRight => Some(Direction::Right),
        _ => None,
    }
}

impl GridState {
    fn dispatch(&mut self, action: Action) {
        match action {
            Action::SetData(load) => self.set_data(load),
            Action::PageLoaded(page) => self.page_loaded(page),
            Action::Activate(point) => self.activate(point),
            Action::Select(point) => self.select_to(point),
            Action::SelectEntireRow { row, extend } => self.select_rows(row, extend),
            Action::SelectEntireColumn { column, extend } => self.select_columns(column, extend),
            Action::SelectEntireTable => {
                self.active = self.home();
                self.selection = Selection::EntireTable;
                self.mode = Mode::View;
            }
            Action::DragStart(point) => {
                self.activate_cell(point);
                self.dragging = self.active == Some(point);
            }
            Action::DragOver(point) => {
                if self.dragging {
                    self.select_to(point);
                }
            }
            Action::DragEnd => self.dragging = false,
            Action::Edit => self.begin_edit(),
            Action::Commit | Action::Cancel => self.mode = Mode::View,
            Action::Blur => {
                self.active = None;
                self.selection = Selection::None;
                self.mode = Mode::View;
                self.dragging = false;
            }
            Action::KeyDown(press) => self.key_down(press),
            Action::SetCellData { point, value } => self.set_cell_data(point, value),
            Action::AddRow => self.add_row(),
            Action::DeleteRow(row) => self.delete_row(row),
            Action::Copy => self.copy(false),
            Action::Cut => self.copy(true),
            Action::Paste(text) => self.paste(&text),
            Action::Clear => self.clear(),
            Action::SortByColumn { column, extend } => self.sort_by(column, extend),
            Action::SetPage(request) => self.set_page(request),
            Action::SetPageSize(size) => self.set_page_size(size),
            Action::SetFilter { column, text } => self.set_filter(column, text),
            Action::ClearFilters => {
                self.filters.clear();
                self.after_view_change();
            }
            Action::SetEditable(editable) => {
                self.editable = editable;
                if !editable {
                    self.mode = Mode::View;
                }
            }
            Action::SetColumnDisabled { column, disabled } => {
                if let Some(spec) = Arc::make_mut(&mut self.columns).get_mut(column) {
                    spec.disabled = disabled;
                    if disabled && self.active.is_some_and(|p| p.column == column as i64) {
                        self.mode = Mode::View;
                    }
                }
            }
            Action::SetColumnInvisible { column, invisible } => {
                if let Some(spec) = Arc::make_mut(&mut self.columns).get_mut(column) {
                    spec.invisible = invisible;
                    if invisible && self.active.is_some_and(|p| p.column == column as i64) {
                        self.active = None;
                        self.selection = Selection::None;
                        self.mode = Mode::View;
                    }
                    self.refresh_show_range();
                }
            }
        }
    }

    fn set_data(&mut self, load: TableLoad) {
        self.load(load);
        self.active = None;
        self.selection = Selection::None;
        self.mode = Mode::View;
        self.dragging = false;
        self.copy_buffer.clear();
        self.cut = false;
        self.sort = vec![SortStatus::Unsorted; self.columns.len()];
        self.paging.page_number = self.paging.first_page();
        if self.paging.mode == PagingMode::Server {
            self.paging.total_rows = self.data.row_count();
        }
        self.signals.busy = false;
        self.refresh_show_range();
    }

    fn page_loaded(&mut self, page: PageLoad) {
        if page.table.rows.is_empty() && page.page > 1 {
            info!(target: "grid", page = page.page, "requested page is empty, returning to page 1");
            self.notice(
                NoticeLevel::Info,
                format!("Page {} has no rows; showing page 1", page.page),
            );
            self.request_page(1);
            return;
        }
        self.set_data(page.table);
        if self.paging.is_enabled() {
            self.paging.page_number = page.page.max(1);
        }
        self.paging.total_rows = page.total_rows;
    }

    /// Move to a cell without side effects on edit mode beyond leaving it.
    fn activate_cell(&mut self, point: Point) {
        let hidden = point
            .index()
            .and_then(|(_, c)| self.columns.get(c))
            .is_none_or(|spec| spec.invisible);
        if hidden || !self.data.has(point) {
            debug!(target: "grid", %point, "activation outside the grid ignored");
            return;
        }
        self.active = Some(point);
        self.selection = Selection::single(point);
        self.mode = Mode::View;
    }

    fn activate(&mut self, point: Point) {
        if point.is_header() && !point.is_indicator() {
            return self.select_columns(point.column, false);
        }
        if point.is_indicator() && !point.is_header() {
            return self.select_rows(point.row, false);
        }
        if self.active == Some(point) {
            if self.mode == Mode::View {
                self.begin_edit();
            }
            return;
        }
        self.activate_cell(point);
    }

    /// Extend the selection from the active point to `point`.
    fn select_to(&mut self, point: Point) {
        let Some(active) = self.active else {
            return self.activate_cell(point);
        };
        self.selection = Selection::range(active, point).normalize_to(self.size());
        self.mode = Mode::View;
    }

    fn select_rows(&mut self, row: i64, extend: bool) {
        if row < 0 || row as usize >= self.data.row_count() {
            return;
        }
        let anchor = self.active.filter(|_| extend).map(|p| p.row);
        self.selection = Selection::EntireRows(Span::new(anchor.unwrap_or(row), row));
        if anchor.is_none() {
            self.active = self
                .visible_columns()
                .first()
                .map(|&column| Point::new(row, column as i64));
        }
        self.mode = Mode::View;
    }

    fn select_columns(&mut self, column: i64, extend: bool) {
        if column < 0 || column as usize >= self.columns.len() {
            return;
        }
        let anchor = self.active.filter(|_| extend).map(|p| p.column);
        self.selection = Selection::EntireColumns(Span::new(anchor.unwrap_or(column), column));
        if anchor.is_none() {
            self.active = self
                .show_range
                .first()
                .map(|&row| Point::new(row as i64, column));
        }
        self.mode = Mode::View;
    }

    fn begin_edit(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        if self.is_cell_editable(active) {
            self.mode = Mode::Edit;
        } else {
            debug!(target: "grid", point = %active, "edit rejected");
        }
    }

    fn move_to(&mut self, point: Option<Point>) {
        if let Some(point) = point {
            self.active = Some(point);
            self.selection = Selection::single(point);
        }
    }

    fn key_down(&mut self, press: KeyPress) {
        let Some(active) = self.active else {
            return;
        };
        if self.mode == Mode::Edit {
            match press.key {
                Key::Escape => self.mode = Mode::View,
                Key::Enter => {
                    self.mode = Mode::View;
                    self.move_to(self.enter(active, press.shift));
                }
                Key::Tab => {
                    self.mode = Mode::View;
                    self.move_to(self.tab(active, press.shift));
                }
                _ => {}
            }
            return;
        }

        if let Some(direction) = direction_of(press.key) {
            if press.shift {
                let current = match self.selection {
                    Selection::None => Selection::single(active),
                    other => other,
                };
                self.selection = current.modify_edge(Some(active), self.size(), direction);
            } else {
                self.move_to(self.step(active, direction));
            }
            return;
        }
        match press.key {
            Key::Tab => self.move_to(self.tab(active, press.shift)),
            Key::Enter => self.move_to(self.enter(active, press.shift)),
            Key::F2 | Key::Char(_) => self.begin_edit(),
            Key::Delete | Key::Backspace => self.clear(),
            Key::Escape => self.selection = Selection::single(active),
            _ => {}
        }
    }

    fn sort_by(&mut self, column: usize, extend: bool) {
        let Some(spec) = self.columns.get(column).cloned() else {
            return;
        };
        let status = self.sort_status(column).next();
        let order = sorted_order(
            &self.data,
            &self.rows,
            column,
            &spec,
            status.is_descending(),
            self.sort_new_rows,
        );
        self.data.reorder_rows(&order);
        self.rows = order.iter().map(|&i| self.rows[i]).collect();
        self.sort = vec![SortStatus::Unsorted; self.columns.len()];
        self.sort[column] = status;
        self.copy_buffer.clear();
        self.cut = false;
        self.mode = Mode::View;
        self.refresh_show_range();
        debug!(target: "grid", column = %spec.key, status = status.code(), "sorted");

        let (Some(&first), Some(&last)) = (self.show_range.first(), self.show_range.last()) else {
            self.active = None;
            self.selection = Selection::None;
            return;
        };
        match self.active.filter(|_| extend) {
            Some(active) => {
                self.selection =
                    Selection::EntireColumns(Span::new(active.column, column as i64));
            }
            None => {
                let top = Point::at(first, column);
                self.active = Some(top);
                self.selection = Selection::range(top, Point::at(last, column));
            }
        }
    }

    fn set_page(&mut self, request: PageRequest) {
        let Some(page) = self.paging.resolve(request, self.data.row_count()) else {
            debug!(target: "grid", ?request, "page request ignored");
            return;
        };
        match self.paging.mode {
            PagingMode::Client => {
                self.paging.page_number = page;
                self.active = None;
                self.selection = Selection::None;
                self.mode = Mode::View;
                self.refresh_show_range();
            }
            PagingMode::Server => self.request_page(page),
        }
    }

    fn set_page_size(&mut self, size: usize) {
        self.paging.page_size = size;
        self.paging.page_number = self.paging.first_page();
        match self.paging.mode {
            PagingMode::Client => {
                self.active = None;
                self.selection = Selection::None;
                self.mode = Mode::View;
                self.refresh_show_range();
            }
            PagingMode::Server if size > 0 => self.request_page(1),
            PagingMode::Server => {}
        }
    }

    fn set_filter(&mut self, column: usize, text: String) {
        if column >= self.columns.len() {
            return;
        }
        match self.filters.iter().position(|f| f.column == column) {
            Some(i) if text.is_empty() => {
                self.filters.remove(i);
            }
            Some(i) => self.filters[i].text = text,
            None if text.is_empty() => {}
            None => self.filters.push(ColumnFilter { column, text }),
        }
        self.after_view_change();
    }

    /// Refresh the show range and drop an active point that scrolled out of it.
    fn after_view_change(&mut self) {
        self.refresh_show_range();
        let hidden = self
            .active
            .is_some_and(|p| !self.show_range.contains(&(p.row as usize)));
        if hidden {
            self.active = None;
            self.selection = Selection::None;
            self.mode = Mode::View;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Value;
    use crate::column::ColumnSpec;
    use crate::config::{GridConfig, PagingConfig};
    use crate::grid::state::FetchRequest;
    use crate::grid::testing::{column_texts, load, text_grid};
    use crate::row::RowStatus;

    fn numbered(n: usize) -> Vec<Vec<Value>> {
        (0..n).map(|i| vec![Value::text(i.to_string())]).collect()
    }

    fn paged(mode: PagingMode, page_size: usize) -> GridConfig {
        GridConfig {
            paging: PagingConfig { mode, page_size },
            ..GridConfig::with_columns(vec![ColumnSpec::text("n")])
        }
    }

    fn key(key: Key) -> Action {
        Action::KeyDown(KeyPress::new(key))
    }

    fn shift(key: Key) -> Action {
        Action::KeyDown(KeyPress::shifted(key))
    }

    #[test]
    fn test_sort_cycles_and_leaves_previous_state_alone() {
        let state = text_grid(&["n"], &[&["101"], &["301"], &["201"], &["401"]]);
        let sort = Action::SortByColumn { column: 0, extend: false };

        let asc = state.apply(sort.clone());
        assert_eq!(column_texts(&asc, 0), ["101", "201", "301", "401"]);
        assert_eq!(asc.sort_status(0), SortStatus::Ready);
        assert_eq!(asc.active(), Some(Point::ORIGIN));
        assert_eq!(asc.selection(), Selection::range(Point::ORIGIN, Point::new(3, 0)));

        let desc = asc.apply(sort.clone());
        assert_eq!(column_texts(&desc, 0), ["401", "301", "201", "101"]);
        assert_eq!(desc.sort_status(0), SortStatus::Descending);

        let again = desc.apply(sort);
        assert_eq!(column_texts(&again, 0), column_texts(&asc, 0));
        assert_eq!(again.sort_status(0), SortStatus::Ascending);

        assert_eq!(column_texts(&state, 0), ["101", "301", "201", "401"]);
        assert_eq!(state.sort_status(0), SortStatus::Unsorted);
    }

    #[test]
    fn test_sort_resets_other_columns() {
        let state = text_grid(&["a", "b"], &[&["2", "x"], &["1", "y"]])
            .apply(Action::SortByColumn { column: 0, extend: false })
            .apply(Action::SortByColumn { column: 1, extend: false });
        assert_eq!(state.sort_status(0), SortStatus::Unsorted);
        assert_eq!(state.sort_status(1), SortStatus::Ready);
        assert_eq!(column_texts(&state, 1), ["x", "y"]);
    }

    #[test]
    fn test_sort_carries_row_status_with_the_row() {
        let edited = text_grid(&["n"], &[&["3"], &["1"], &["2"]]).apply(Action::SetCellData {
            point: Point::ORIGIN,
            value: Value::text("9"),
        });
        let sorted = edited.apply(Action::SortByColumn { column: 0, extend: false });
        assert_eq!(column_texts(&sorted, 0), ["1", "2", "9"]);
        assert_eq!(sorted.row_status(2), Some(RowStatus::Modified));
        assert!(sorted.rows()[2].dirty);
        assert_eq!(sorted.row_status(0), Some(RowStatus::Unchanged));
        assert_eq!(sorted.rows()[2].id, edited.rows()[0].id);

        let reverted = sorted.apply(Action::SetCellData {
            point: Point::new(2, 0),
            value: Value::text("3"),
        });
        assert_eq!(reverted.row_status(2), Some(RowStatus::Unchanged));
        assert!(!reverted.rows()[2].dirty);
    }

    #[test]
    fn test_activate_twice_enters_edit() {
        let state = text_grid(&["a", "b"], &[&["1", "2"], &["3", "4"]]);
        let point = Point::new(0, 1);
        let active = state.apply(Action::Activate(point));
        assert_eq!(active.active(), Some(point));
        assert_eq!(active.selection(), Selection::single(point));
        assert_eq!(active.mode(), Mode::View);

        let editing = active.apply(Action::Activate(point));
        assert_eq!(editing.mode(), Mode::Edit);

        let moved = editing.apply(key(Key::Enter));
        assert_eq!(moved.mode(), Mode::View);
        assert_eq!(moved.active(), Some(Point::new(1, 1)));

        let cancelled = editing.apply(key(Key::Escape));
        assert_eq!(cancelled.mode(), Mode::View);
        assert_eq!(cancelled.active(), Some(point));
    }

    #[test]
    fn test_edit_rejected_on_read_only_and_locked_grid() {
        let columns = vec![ColumnSpec {
            read_only: true,
            ..ColumnSpec::text("a")
        }];
        let rows: &[&[&str]] = &[&["1"]];
        let state = load(GridConfig::with_columns(columns), rows)
            .apply(Action::Activate(Point::ORIGIN))
            .apply(key(Key::F2));
        assert_eq!(state.mode(), Mode::View);

        let locked = text_grid(&["a"], &[&["1"]])
            .apply(Action::SetEditable(false))
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::Edit);
        assert_eq!(locked.mode(), Mode::View);
    }

    #[test]
    fn test_activate_outside_is_ignored() {
        let state = text_grid(&["a"], &[&["1"]]);
        let next = state.apply(Action::Activate(Point::new(5, 0)));
        assert_eq!(next.active(), None);
        assert!(next.selection().is_none());
    }

    #[test]
    fn test_header_and_indicator_clicks_select_whole_lines() {
        let state = text_grid(&["a", "b"], &[&["1", "2"], &["3", "4"]]);
        let column = state.apply(Action::Activate(Point::new(-1, 1)));
        assert_eq!(column.selection(), Selection::entire_column(1));
        assert_eq!(column.active(), Some(Point::new(0, 1)));
        assert_eq!(column.selected_points().len(), 2);

        let row = state.apply(Action::Activate(Point::new(1, -1)));
        assert_eq!(row.selection(), Selection::entire_row(1));
        assert_eq!(row.active(), Some(Point::new(1, 0)));

        let extended = row
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::SelectEntireRow { row: 1, extend: true });
        assert_eq!(extended.selection(), Selection::EntireRows(Span::new(0, 1)));
        assert_eq!(extended.active(), Some(Point::ORIGIN));

        let table = state.apply(Action::SelectEntireTable);
        assert_eq!(table.selected_points().len(), 4);
    }

    #[test]
    fn test_arrows_clamp_and_skip_invisible_columns() {
        let columns = vec![
            ColumnSpec::text("a"),
            ColumnSpec::text("b").invisible(),
            ColumnSpec::text("c"),
        ];
        let rows: &[&[&str]] = &[&["1", "2", "3"], &["4", "5", "6"]];
        let state = load(GridConfig::with_columns(columns), rows).apply(Action::Activate(Point::ORIGIN));

        let right = state.apply(key(Key::ArrowRight));
        assert_eq!(right.active(), Some(Point::new(0, 2)));
        assert_eq!(right.apply(key(Key::ArrowRight)).active(), Some(Point::new(0, 2)));
        assert_eq!(state.apply(key(Key::ArrowUp)).active(), Some(Point::ORIGIN));

        let tab = right.apply(key(Key::Tab));
        assert_eq!(tab.active(), Some(Point::new(1, 0)));
        let wrapped = tab.apply(key(Key::Tab)).apply(key(Key::Tab));
        assert_eq!(wrapped.active(), Some(Point::ORIGIN));
        assert_eq!(state.apply(shift(Key::Tab)).active(), Some(Point::new(1, 2)));

        let down = state.apply(key(Key::Enter));
        assert_eq!(down.active(), Some(Point::new(1, 0)));
        assert_eq!(down.apply(key(Key::Enter)).active(), Some(Point::new(0, 2)));

        let hidden = state.apply(Action::Activate(Point::new(0, 1)));
        assert_eq!(hidden.active(), Some(Point::ORIGIN));
    }

    #[test]
    fn test_shift_arrows_grow_and_shrink() {
        let state = text_grid(&["a", "b"], &[&["1", "2"], &["3", "4"], &["5", "6"]])
            .apply(Action::Activate(Point::ORIGIN));
        let down = state.apply(shift(Key::ArrowDown));
        assert_eq!(down.selection(), Selection::range(Point::ORIGIN, Point::new(1, 0)));
        let right = down.apply(shift(Key::ArrowRight));
        assert_eq!(right.selection(), Selection::range(Point::ORIGIN, Point::new(1, 1)));
        let up = right.apply(shift(Key::ArrowUp));
        assert_eq!(up.selection(), Selection::range(Point::ORIGIN, Point::new(0, 1)));
        assert_eq!(up.active(), Some(Point::ORIGIN));
    }

    #[test]
    fn test_drag_extends_selection() {
        let state = text_grid(&["a", "b"], &[&["1", "2"], &["3", "4"]])
            .apply(Action::DragStart(Point::ORIGIN))
            .apply(Action::DragOver(Point::new(1, 1)));
        assert!(state.is_dragging());
        assert_eq!(state.selection(), Selection::range(Point::ORIGIN, Point::new(1, 1)));
        let done = state.apply(Action::DragEnd).apply(Action::DragOver(Point::ORIGIN));
        assert!(!done.is_dragging());
        assert_eq!(done.selection(), state.selection());
    }

    #[test]
    fn test_blur_clears_focus() {
        let state = text_grid(&["a"], &[&["1"]])
            .apply(Action::Activate(Point::ORIGIN))
            .apply(Action::Edit)
            .apply(Action::Blur);
        assert_eq!(state.active(), None);
        assert_eq!(state.mode(), Mode::View);
        assert!(state.selection().is_none());
    }

    #[test]
    fn test_client_paging() {
        let state = GridState::new(paged(PagingMode::Client, 2))
            .unwrap()
            .apply(Action::SetData(TableLoad::new(numbered(8))));
        assert_eq!(state.show_range(), [0, 1]);
        assert_eq!(state.total_pages(), 4);

        let third = state.apply(Action::SetPage(PageRequest::Number(3)));
        assert_eq!(third.show_range(), [4, 5]);
        let last = third.apply(Action::SetPage(PageRequest::Next));
        assert_eq!(last.show_range(), [6, 7]);
        assert_eq!(last.apply(Action::SetPage(PageRequest::Next)).show_range(), [6, 7]);

        let all = last.apply(Action::SetPage(PageRequest::ShowAll));
        assert_eq!(all.show_range(), [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(all.paging().page_number, 0);

        let resized = all.apply(Action::SetPageSize(3));
        assert_eq!(resized.show_range(), [0, 1, 2]);
        assert_eq!(resized.total_pages(), 3);
    }

    #[test]
    fn test_show_all_cap_emits_notice() {
        let config = GridConfig {
            max_show_all: 3,
            ..paged(PagingMode::Client, 0)
        };
        let state = GridState::new(config)
            .unwrap()
            .apply(Action::SetData(TableLoad::new(numbered(5))));
        assert_eq!(state.show_range(), [0, 1, 2]);
        assert_eq!(state.signals().notices.len(), 1);
        assert_eq!(state.signals().notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_server_paging_requests_pages() {
        let page = |page, rows| {
            Action::PageLoaded(PageLoad {
                page,
                total_rows: 5,
                table: TableLoad::new(rows),
            })
        };
        let state = GridState::new(paged(PagingMode::Server, 2))
            .unwrap()
            .apply(page(1, numbered(2)));
        assert_eq!(state.paging().page_number, 1);
        assert_eq!(state.total_pages(), 3);
        assert!(!state.signals().busy);

        let waiting = state.apply(Action::SetPage(PageRequest::Next));
        assert_eq!(
            waiting.signals().fetch,
            Some(FetchRequest { page: 2, page_size: 2 })
        );
        assert!(waiting.signals().busy);
        assert_eq!(waiting.data().row_count(), 2);

        let empty = waiting.apply(page(2, Vec::new()));
        assert_eq!(empty.signals().fetch.map(|f| f.page), Some(1));
        assert_eq!(empty.signals().notices[0].level, NoticeLevel::Info);

        let second = waiting.apply(page(2, numbered(2)));
        assert_eq!(second.paging().page_number, 2);
        assert!(!second.signals().busy);
        assert_eq!(second.signals().fetch, None);
    }

    #[test]
    fn test_server_page_emptied_by_delete_requests_previous_page() {
        let mut state = GridState::new(paged(PagingMode::Server, 2)).unwrap();
        // Page 2 is on screen and its only row was added locally.
        state.paging.page_number = 2;
        let added = state.apply(Action::AddRow);
        assert_eq!(added.row_status(0), Some(RowStatus::Inserted));
        assert_eq!(added.signals().fetch, None);

        let removed = added.apply(Action::DeleteRow(0));
        assert_eq!(removed.data().row_count(), 0);
        assert_eq!(
            removed.signals().fetch,
            Some(FetchRequest { page: 1, page_size: 2 })
        );
        assert!(removed.signals().busy);
    }

    #[test]
    fn test_filters_narrow_show_range() {
        let state = text_grid(&["s"], &[&["xyz"], &["y"], &["x"]])
            .apply(Action::Activate(Point::new(1, 0)));
        let filtered = state.apply(Action::SetFilter {
            column: 0,
            text: "X".into(),
        });
        assert_eq!(filtered.show_range(), [0, 2]);
        assert_eq!(filtered.active(), None);

        let cleared = filtered.apply(Action::SetFilter {
            column: 0,
            text: String::new(),
        });
        assert_eq!(cleared.show_range(), [0, 1, 2]);
        assert!(cleared.filters().is_empty());
        assert_eq!(
            filtered.apply(Action::ClearFilters).show_range(),
            cleared.show_range()
        );
    }

    #[test]
    fn test_hiding_active_column_blurs() {
        let state = text_grid(&["a", "b"], &[&["1", "2"]])
            .apply(Action::Activate(Point::new(0, 1)))
            .apply(Action::SetColumnInvisible {
                column: 1,
                invisible: true,
            });
        assert_eq!(state.active(), None);
        assert!(state.columns()[1].invisible);
    }
}
