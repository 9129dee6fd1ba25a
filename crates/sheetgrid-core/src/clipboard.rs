//! Tab/newline clipboard text.
//!
//! Rows are separated by `\n` (a preceding `\r` is dropped) and cells by `\t`.
//! Spreadsheet applications end copied text with a newline, so one trailing
//! empty row is ignored on parse.

use std::collections::BTreeSet;

use crate::cell::Cell;
use crate::matrix::Matrix;
use crate::point::Point;
use crate::point_map::PointMap;

pub fn parse(text: &str) -> Matrix<String> {
    Matrix::parse_text(text)
}

pub fn serialize(matrix: &Matrix<String>) -> String {
    matrix.to_text()
}

/// Render a copy buffer as clipboard text. Rows and columns that hold no
/// copied point are left out, so cells hidden by a filter never become blank
/// lines. `display` renders the cell found at each point.
pub fn copy_text(buffer: &PointMap<Cell>, display: impl Fn(Point, &Cell) -> String) -> String {
    let rows: BTreeSet<i64> = buffer.keys().map(|p| p.row).collect();
    let columns: BTreeSet<i64> = buffer.keys().map(|p| p.column).collect();
    let rank = |set: &BTreeSet<i64>, index: i64| set.range(..index).count() as i64;
    let texts: PointMap<String> = buffer
        .iter()
        .map(|(point, cell)| {
            let packed = Point::new(rank(&rows, point.row), rank(&columns, point.column));
            (packed, display(point, cell))
        })
        .collect();
    serialize(&texts.to_matrix())
}
