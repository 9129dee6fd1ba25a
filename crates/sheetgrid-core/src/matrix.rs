//! Ragged 2D container addressed by [`Point`].
//!
//! Out-of-bounds access is never an error: `get` returns `None` and `set`
//! returns an unchanged copy. The matrix only grows through the explicit
//! padding operations.

use crate::cell::Cell;
use crate::point::Point;

/// Row and column counts of a matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub rows: usize,
    pub columns: usize,
}

impl Size {
    pub fn new(rows: usize, columns: usize) -> Size {
        Size { rows, columns }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Whether `point` addresses a slot inside these bounds.
    pub fn contains(&self, point: Point) -> bool {
        point
            .index()
            .is_some_and(|(row, column)| row < self.rows && column < self.columns)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T = Cell> {
    rows: Vec<Vec<T>>,
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Matrix { rows: Vec::new() }
    }
}

impl<T> Matrix<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        Matrix { rows }
    }

    pub fn into_rows(self) -> Vec<Vec<T>> {
        self.rows
    }

    pub fn get(&self, point: Point) -> Option<&T> {
        let (row, column) = point.index()?;
        self.rows.get(row)?.get(column)
    }

    pub fn has(&self, point: Point) -> bool {
        self.get(point).is_some()
    }

    /// Row count and the widest row's column count.
    pub fn size(&self) -> Size {
        Size {
            rows: self.rows.len(),
            columns: self.rows.iter().map(Vec::len).max().unwrap_or(0),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Every column value of `column`, top to bottom, skipping short rows.
    pub fn column(&self, column: usize) -> impl Iterator<Item = &T> {
        self.rows.iter().filter_map(move |r| r.get(column))
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Matrix<U> {
        Matrix {
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(&mut f).collect())
                .collect(),
        }
    }

    /// Serialize as tab-separated columns and newline-separated rows.
    pub fn to_delimited_text(&self, mut format: impl FnMut(&T) -> String) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(&mut format)
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Split delimited text into a matrix, building each slot with `factory`.
    ///
    /// `\r\n` line endings are accepted and one trailing empty row (left by a
    /// trailing newline) is dropped.
    pub fn from_delimited_text(text: &str, mut factory: impl FnMut(&str) -> T) -> Matrix<T> {
        let mut lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        if lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        Matrix {
            rows: lines
                .into_iter()
                .map(|line| line.split('\t').map(&mut factory).collect())
                .collect(),
        }
    }

    pub(crate) fn get_mut(&mut self, point: Point) -> Option<&mut T> {
        let (row, column) = point.index()?;
        self.rows.get_mut(row)?.get_mut(column)
    }

    /// Overwrite a slot in place. Returns the previous value, or None when out of bounds.
    pub(crate) fn replace(&mut self, point: Point, value: T) -> Option<T> {
        let slot = self.get_mut(point)?;
        Some(std::mem::replace(slot, value))
    }

    pub(crate) fn push_row(&mut self, row: Vec<T>) {
        self.rows.push(row);
    }

    pub(crate) fn remove_row(&mut self, row: usize) -> Option<Vec<T>> {
        (row < self.rows.len()).then(|| self.rows.remove(row))
    }

    /// Rearrange rows so that new row `i` is old row `order[i]`.
    /// `order` must be a permutation of the row indices.
    pub(crate) fn reorder_rows(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.rows.len());
        let mut old: Vec<Option<Vec<T>>> = self.rows.drain(..).map(Some).collect();
        self.rows = order.iter().filter_map(|&i| old[i].take()).collect();
    }
}

impl<T: Clone> Matrix<T> {
    /// Copy-on-write update. Out-of-bounds points leave the copy unchanged.
    pub fn set(&self, point: Point, value: T) -> Matrix<T> {
        let mut next = self.clone();
        next.replace(point, value);
        next
    }
}

impl<T: Clone + Default> Matrix<T> {
    /// Extend with rows of default values until there are `required_rows` rows.
    /// New rows are as wide as the widest existing row.
    pub fn pad_rows(&self, required_rows: usize) -> Matrix<T> {
        let mut next = self.clone();
        next.pad_rows_in_place(required_rows);
        next
    }

    /// Extend every row with default values to at least `required_columns` columns.
    pub fn pad_columns(&self, required_columns: usize) -> Matrix<T> {
        let mut next = self.clone();
        for row in &mut next.rows {
            if row.len() < required_columns {
                row.resize(required_columns, T::default());
            }
        }
        next
    }

    /// Pad short rows so every row has the same column count.
    pub fn rectangular(&self) -> Matrix<T> {
        self.pad_columns(self.size().columns)
    }

    pub(crate) fn pad_rows_in_place(&mut self, required_rows: usize) -> usize {
        let columns = self.size().columns;
        let added = required_rows.saturating_sub(self.rows.len());
        for _ in 0..added {
            self.rows.push(vec![T::default(); columns]);
        }
        added
    }
}

impl Matrix<String> {
    pub fn parse_text(text: &str) -> Matrix<String> {
        Matrix::from_delimited_text(text, str::to_string)
    }

    pub fn to_text(&self) -> String {
        self.to_delimited_text(String::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix<String> {
        Matrix::parse_text("a\tb\nc\td")
    }

    #[test]
    fn test_get_and_has() {
        let m = sample();
        assert_eq!(m.get(Point::new(1, 0)).map(String::as_str), Some("c"));
        assert!(m.has(Point::new(0, 1)));
        assert!(!m.has(Point::new(2, 0)));
        assert!(!m.has(Point::new(-1, 0)));
    }

    #[test]
    fn test_set_is_copy_on_write() {
        let m = sample();
        let next = m.set(Point::new(0, 0), "z".to_string());
        assert_eq!(m.get(Point::ORIGIN).map(String::as_str), Some("a"));
        assert_eq!(next.get(Point::ORIGIN).map(String::as_str), Some("z"));
    }

    #[test]
    fn test_set_out_of_bounds_never_grows() {
        let m = sample();
        let next = m.set(Point::new(5, 5), "z".to_string());
        assert_eq!(next, m);
    }

    #[test]
    fn test_size_of_ragged_matrix() {
        let m = Matrix::parse_text("a\nb\tc\td\ne");
        assert_eq!(m.size(), Size::new(3, 3));
        assert_eq!(m.rectangular().row(0).unwrap().len(), 3);
    }

    #[test]
    fn test_pad_rows() {
        let m = sample().pad_rows(4);
        assert_eq!(m.size(), Size::new(4, 2));
        assert_eq!(m.get(Point::new(3, 1)).map(String::as_str), Some(""));
        assert_eq!(sample().pad_rows(1).size(), Size::new(2, 2));
    }

    #[test]
    fn test_from_text_strips_one_trailing_row() {
        let m = Matrix::parse_text("1\t2\r\n3\t4\n");
        assert_eq!(m.size(), Size::new(2, 2));
        assert_eq!(m.get(Point::new(1, 1)).map(String::as_str), Some("4"));

        let blank_line_kept = Matrix::parse_text("1\n\n");
        assert_eq!(blank_line_kept.row_count(), 2);
    }

    #[test]
    fn test_empty_text_is_empty_matrix() {
        assert!(Matrix::parse_text("").is_empty());
    }

    #[test]
    fn test_reorder_rows() {
        let mut m = Matrix::parse_text("a\nb\nc");
        m.reorder_rows(&[2, 0, 1]);
        assert_eq!(m.to_text(), "c\na\nb");
    }

    #[test]
    fn test_column_iter_skips_short_rows() {
        let m = Matrix::parse_text("a\tb\nc\nd\te");
        let col: Vec<&String> = m.column(1).collect();
        assert_eq!(col, vec!["b", "e"]);
    }
}
