//! Cell addresses.
//!
//! A [`Point`] is a `(row, column)` pair. Negative coordinates are an addressing
//! convention: negative rows are header/filter pseudo-rows and negative columns
//! are row-indicator pseudo-columns. Such points are never inside a matrix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable cell address, ordered row-major.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Point {
    pub row: i64,
    pub column: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { row: 0, column: 0 };

    pub const fn new(row: i64, column: i64) -> Point {
        Point { row, column }
    }

    /// Build a point from matrix indices.
    pub fn at(row: usize, column: usize) -> Point {
        Point::new(row as i64, column as i64)
    }

    /// Matrix indices, or None for pseudo-row/column addresses.
    pub fn index(self) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let column = usize::try_from(self.column).ok()?;
        Some((row, column))
    }

    pub fn is_header(self) -> bool {
        self.row < 0
    }

    pub fn is_indicator(self) -> bool {
        self.column < 0
    }

    pub fn offset(self, rows: i64, columns: i64) -> Point {
        Point::new(self.row + rows, self.column + columns)
    }

    pub fn with_row(self, row: i64) -> Point {
        Point::new(row, self.column)
    }

    pub fn with_column(self, column: i64) -> Point {
        Point::new(self.row, column)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn test_order_is_row_major() {
        let mut points = vec![Point::new(1, 0), Point::new(0, 5), Point::new(0, 1)];
        points.sort();
        assert_eq!(
            points,
            vec![Point::new(0, 1), Point::new(0, 5), Point::new(1, 0)]
        );
    }

    #[test]
    fn test_negative_points_have_no_index() {
        assert_eq!(Point::new(-1, 0).index(), None);
        assert_eq!(Point::new(0, -1).index(), None);
        assert_eq!(Point::ORIGIN.index(), Some((0, 0)));
        assert!(Point::new(-1, 3).is_header());
        assert!(Point::new(2, -1).is_indicator());
    }
}
