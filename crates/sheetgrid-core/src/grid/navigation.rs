//! Keyboard movement of the active point.
//!
//! Movement only lands on visible columns and on rows in the show range.
//! Arrows stop at the edges; Tab and Enter wrap to the next row or column.

use crate::point::Point;
use crate::selection::Direction;

use super::state::GridState;

impl GridState {
    pub(crate) fn visible_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.invisible)
            .map(|(i, _)| i)
            .collect()
    }

    /// Position of `value` in `list`, or of the nearest entry before it.
    fn position_in(list: &[usize], value: i64) -> Option<usize> {
        if list.is_empty() {
            return None;
        }
        Some(
            list.iter()
                .position(|&v| v as i64 == value)
                .unwrap_or_else(|| list.iter().filter(|&&v| (v as i64) < value).count().saturating_sub(1)),
        )
    }

    /// First shown row and first visible column.
    pub(crate) fn home(&self) -> Option<Point> {
        let row = *self.show_range.first()?;
        let column = *self.visible_columns().first()?;
        Some(Point::at(row, column))
    }

    /// Arrow movement, clamped to the shown rows and visible columns.
    pub(crate) fn step(&self, from: Point, direction: Direction) -> Option<Point> {
        let delta = direction.delta();
        if direction.is_vertical() {
            let rows = &self.show_range;
            let pos = Self::position_in(rows, from.row)? as i64;
            let next = (pos + delta).clamp(0, rows.len() as i64 - 1) as usize;
            Some(from.with_row(rows[next] as i64))
        } else {
            let columns = self.visible_columns();
            let pos = Self::position_in(&columns, from.column)? as i64;
            let next = (pos + delta).clamp(0, columns.len() as i64 - 1) as usize;
            Some(from.with_column(columns[next] as i64))
        }
    }

    /// Tab order: along the row, wrapping to the next shown row and from the
    /// last cell back to the first.
    pub(crate) fn tab(&self, from: Point, backward: bool) -> Option<Point> {
        let rows = &self.show_range;
        let columns = self.visible_columns();
        let r = Self::position_in(rows, from.row)?;
        let c = Self::position_in(&columns, from.column)?;
        let (r, c) = wrap_step((r, c), (rows.len(), columns.len()), backward);
        Some(Point::at(rows[r], columns[c]))
    }

    /// Enter order: down the column, wrapping to the next visible column.
    pub(crate) fn enter(&self, from: Point, backward: bool) -> Option<Point> {
        let rows = &self.show_range;
        let columns = self.visible_columns();
        let r = Self::position_in(rows, from.row)?;
        let c = Self::position_in(&columns, from.column)?;
        let (c, r) = wrap_step((c, r), (columns.len(), rows.len()), backward);
        Some(Point::at(rows[r], columns[c]))
    }
}

/// Advance `(outer, inner)` by one inner step, carrying into `outer` and
/// wrapping around both.
fn wrap_step(
    (outer, inner): (usize, usize),
    (outer_len, inner_len): (usize, usize),
    backward: bool,
) -> (usize, usize) {
    if backward {
        if inner > 0 {
            (outer, inner - 1)
        } else if outer > 0 {
            (outer - 1, inner_len - 1)
        } else {
            (outer_len - 1, inner_len - 1)
        }
    } else if inner + 1 < inner_len {
        (outer, inner + 1)
    } else if outer + 1 < outer_len {
        (outer + 1, 0)
    } else {
        (0, 0)
    }
}
