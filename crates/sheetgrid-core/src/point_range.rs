//! Rectangular, inclusive ranges of points.

use crate::matrix::Size;
use crate::point::Point;

/// An axis-aligned rectangle. `start` is always the top-left corner and `end`
/// the bottom-right one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointRange {
    pub start: Point,
    pub end: Point,
}

impl PointRange {
    /// Build a normalized range from any two opposite corners.
    pub fn new(a: Point, b: Point) -> PointRange {
        PointRange {
            start: Point::new(a.row.min(b.row), a.column.min(b.column)),
            end: Point::new(a.row.max(b.row), a.column.max(b.column)),
        }
    }

    pub fn single(point: Point) -> PointRange {
        PointRange {
            start: point,
            end: point,
        }
    }

    /// Range covering a whole matrix, or None when it is empty.
    pub fn of_size(size: Size) -> Option<PointRange> {
        if size.is_empty() {
            return None;
        }
        Some(PointRange::new(
            Point::ORIGIN,
            Point::at(size.rows - 1, size.columns - 1),
        ))
    }

    pub fn has(&self, point: Point) -> bool {
        point.row >= self.start.row
            && point.row <= self.end.row
            && point.column >= self.start.column
            && point.column <= self.end.column
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.start.row, self.end.column)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.end.row, self.start.column)
    }

    pub fn rows(&self) -> i64 {
        self.end.row - self.start.row + 1
    }

    pub fn columns(&self) -> i64 {
        self.end.column - self.start.column + 1
    }

    pub fn area(&self) -> i64 {
        self.rows() * self.columns()
    }

    /// Intersection with another range.
    pub fn intersect(&self, other: &PointRange) -> Option<PointRange> {
        let start = Point::new(
            self.start.row.max(other.start.row),
            self.start.column.max(other.start.column),
        );
        let end = Point::new(
            self.end.row.min(other.end.row),
            self.end.column.min(other.end.column),
        );
        (start.row <= end.row && start.column <= end.column).then_some(PointRange { start, end })
    }

    /// Clip to the bounds of a matrix.
    pub fn mask(&self, size: Size) -> Option<PointRange> {
        self.intersect(&PointRange::of_size(size)?)
    }

    /// Every point in the range, row-major.
    pub fn iter(&self) -> impl Iterator<Item = Point> + use<> {
        let PointRange { start, end } = *self;
        (start.row..=end.row)
            .flat_map(move |row| (start.column..=end.column).map(move |column| Point::new(row, column)))
    }
}
