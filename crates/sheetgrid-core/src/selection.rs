//! Selection shapes and their algebra.
//!
//! Whole-row, whole-column and whole-table selections are resolved against the
//! current show range (the rows visible after paging and filtering), never the
//! full matrix, so operations on them only touch what the user can see.

use crate::matrix::Size;
use crate::point::Point;
use crate::point_range::PointRange;

/// Direction of travel for keyboard navigation and edge modification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// -1 for up/left, +1 for down/right.
    pub fn delta(self) -> i64 {
        match self {
            Direction::Up | Direction::Left => -1,
            Direction::Down | Direction::Right => 1,
        }
    }
}

/// Inclusive, normalized span of row or column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    pub fn new(a: i64, b: i64) -> Span {
        Span {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single(index: i64) -> Span {
        Span {
            start: index,
            end: index,
        }
    }

    pub fn has(&self, index: i64) -> bool {
        index >= self.start && index <= self.end
    }

    /// Clip to `0..len`.
    fn mask(&self, len: usize) -> Option<Span> {
        if len == 0 {
            return None;
        }
        let start = self.start.max(0);
        let end = self.end.min(len as i64 - 1);
        (start <= end).then_some(Span { start, end })
    }

    /// Move one edge a step in the direction of `delta`, the same way a range
    /// edge moves under shift+arrow.
    fn step_edge(&self, anchor: i64, delta: i64) -> Span {
        let mut next = *self;
        // The anchor's neighbour against the direction of travel is inside the
        // span, so the far edge is on that side and the span shrinks.
        if self.has(anchor - delta) {
            if delta < 0 {
                next.end += delta;
            } else {
                next.start += delta;
            }
        } else if delta < 0 {
            next.start += delta;
        } else {
            next.end += delta;
        }
        Span::new(next.start, next.end)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Range(PointRange),
    EntireRows(Span),
    EntireColumns(Span),
    EntireTable,
}

impl Selection {
    pub fn single(point: Point) -> Selection {
        Selection::Range(PointRange::single(point))
    }

    pub fn range(a: Point, b: Point) -> Selection {
        Selection::Range(PointRange::new(a, b))
    }

    pub fn entire_row(row: i64) -> Selection {
        Selection::EntireRows(Span::single(row))
    }

    pub fn entire_column(column: i64) -> Selection {
        Selection::EntireColumns(Span::single(column))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Membership test that ignores paging.
    pub fn has_point(&self, point: Point) -> bool {
        match self {
            Selection::None => false,
            Selection::Range(range) => range.has(point),
            Selection::EntireRows(span) => point.column >= 0 && span.has(point.row),
            Selection::EntireColumns(span) => point.row >= 0 && span.has(point.column),
            Selection::EntireTable => point.row >= 0 && point.column >= 0,
        }
    }

    pub fn has_entire_row(&self, row: i64) -> bool {
        match self {
            Selection::EntireRows(span) => span.has(row),
            Selection::EntireTable => row >= 0,
            _ => false,
        }
    }

    pub fn has_entire_column(&self, column: i64) -> bool {
        match self {
            Selection::EntireColumns(span) => span.has(column),
            Selection::EntireTable => column >= 0,
            _ => false,
        }
    }

    /// Every selected point inside the matrix. Row, column and table selections
    /// only yield rows listed in `shown`, in show order.
    pub fn points(&self, size: Size, shown: &[usize]) -> Vec<Point> {
        let all_columns = 0..size.columns;
        let shown_rows = || shown.iter().copied().filter(move |&row| row < size.rows);
        match self {
            Selection::None => Vec::new(),
            Selection::Range(range) => range
                .mask(size)
                .map(|r| r.iter().collect())
                .unwrap_or_default(),
            Selection::EntireRows(span) => shown_rows()
                .filter(|&row| span.has(row as i64))
                .flat_map(|row| all_columns.clone().map(move |column| Point::at(row, column)))
                .collect(),
            Selection::EntireColumns(span) => {
                let Some(columns) = span.mask(size.columns) else {
                    return Vec::new();
                };
                shown_rows()
                    .flat_map(|row| {
                        (columns.start..=columns.end).map(move |column| Point::new(row as i64, column))
                    })
                    .collect()
            }
            Selection::EntireTable => shown_rows()
                .flat_map(|row| all_columns.clone().map(move |column| Point::at(row, column)))
                .collect(),
        }
    }

    /// Bounding range of the selection within the matrix.
    pub fn bounds(&self, size: Size, shown: &[usize]) -> Option<PointRange> {
        let last_column = size.columns.checked_sub(1)? as i64;
        let shown_span = || {
            let visible = shown.iter().copied().filter(|&r| r < size.rows);
            let first = visible.clone().min()? as i64;
            let last = visible.max()? as i64;
            Some(Span::new(first, last))
        };
        match self {
            Selection::None => None,
            Selection::Range(range) => range.mask(size),
            Selection::EntireRows(span) => {
                let rows = span.mask(size.rows)?;
                Some(PointRange::new(
                    Point::new(rows.start, 0),
                    Point::new(rows.end, last_column),
                ))
            }
            Selection::EntireColumns(span) => {
                let columns = span.mask(size.columns)?;
                let rows = shown_span()?;
                Some(PointRange::new(
                    Point::new(rows.start, columns.start),
                    Point::new(rows.end, columns.end),
                ))
            }
            Selection::EntireTable => {
                let rows = shown_span()?;
                Some(PointRange::new(
                    Point::new(rows.start, 0),
                    Point::new(rows.end, last_column),
                ))
            }
        }
    }

    /// Clip the selection to a (possibly resized) matrix.
    pub fn normalize_to(&self, size: Size) -> Selection {
        match self {
            Selection::None => Selection::None,
            Selection::Range(range) => range
                .mask(size)
                .map(Selection::Range)
                .unwrap_or(Selection::None),
            Selection::EntireRows(span) => span
                .mask(size.rows)
                .map(Selection::EntireRows)
                .unwrap_or(Selection::None),
            Selection::EntireColumns(span) => span
                .mask(size.columns)
                .map(Selection::EntireColumns)
                .unwrap_or(Selection::None),
            Selection::EntireTable if size.is_empty() => Selection::None,
            Selection::EntireTable => Selection::EntireTable,
        }
    }

    /// Grow or shrink the selection by one step, as shift+arrow does.
    ///
    /// When the active point sits on the edge facing `direction` the range grows
    /// that way; when the range extends past the active point on the opposite
    /// side, that far edge moves back towards the active point instead.
    pub fn modify_edge(&self, active: Option<Point>, size: Size, direction: Direction) -> Selection {
        let Some(active) = active else {
            return *self;
        };
        let delta = direction.delta();
        match self {
            Selection::Range(range) => {
                let (anchor, start, end) = if direction.is_vertical() {
                    (active.row, range.start.row, range.end.row)
                } else {
                    (active.column, range.start.column, range.end.column)
                };
                let span = Span::new(start, end).step_edge(anchor, delta);
                let next = if direction.is_vertical() {
                    PointRange::new(
                        Point::new(span.start, range.start.column),
                        Point::new(span.end, range.end.column),
                    )
                } else {
                    PointRange::new(
                        Point::new(range.start.row, span.start),
                        Point::new(range.end.row, span.end),
                    )
                };
                match next.mask(size) {
                    Some(masked) => Selection::Range(masked),
                    None => *self,
                }
            }
            Selection::EntireRows(span) if direction.is_vertical() => span
                .step_edge(active.row, delta)
                .mask(size.rows)
                .map(Selection::EntireRows)
                .unwrap_or(*self),
            Selection::EntireColumns(span) if !direction.is_vertical() => span
                .step_edge(active.column, delta)
                .mask(size.columns)
                .map(Selection::EntireColumns)
                .unwrap_or(*self),
            _ => *self,
        }
    }
}
