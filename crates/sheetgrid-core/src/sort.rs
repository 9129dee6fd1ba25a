//! Column sorting with natural ordering.
//!
//! Rows are compared by the clicked column only. Existing rows are sorted
//! stably; inserted rows keep their relative order at the end unless the grid
//! is configured to sort them too.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use sheetgrid_script::engine::parse_number;

use crate::cell::{Cell, Value};
use crate::column::ColumnSpec;
use crate::matrix::Matrix;
use crate::point::Point;
use crate::row::RowMeta;

/// Per-column sort state. Clicking cycles
/// `Unsorted -> Ready -> Descending -> Ascending -> Descending -> ...`;
/// `Ready` and `Ascending` both mean the rows are in ascending order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortStatus {
    #[default]
    Unsorted,
    Ready,
    Descending,
    Ascending,
}

impl SortStatus {
    pub fn next(self) -> SortStatus {
        match self {
            SortStatus::Unsorted => SortStatus::Ready,
            SortStatus::Ready | SortStatus::Ascending => SortStatus::Descending,
            SortStatus::Descending => SortStatus::Ascending,
        }
    }

    pub fn is_descending(self) -> bool {
        self == SortStatus::Descending
    }

    /// Numeric code shown to hosts (0 unsorted, 1 ready, 2 descending, 3 ascending).
    pub fn code(self) -> u8 {
        match self {
            SortStatus::Unsorted => 0,
            SortStatus::Ready => 1,
            SortStatus::Descending => 2,
            SortStatus::Ascending => 3,
        }
    }
}

enum Chunk {
    Digits(String),
    Text(String),
}

fn next_chunk(chars: &mut Peekable<Chars<'_>>) -> Option<Chunk> {
    let first = *chars.peek()?;
    let digits = first.is_ascii_digit();
    let mut chunk = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() != digits {
            break;
        }
        chunk.extend(c.to_lowercase());
        chars.next();
    }
    Some(if digits {
        Chunk::Digits(chunk)
    } else {
        Chunk::Text(chunk)
    })
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Case-insensitive comparison where digit runs compare by numeric value,
/// so `item2` sorts before `item10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        let ord = match (next_chunk(&mut left), next_chunk(&mut right)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Digits(x)), Some(Chunk::Digits(y))) => compare_digits(&x, &y),
            (Some(Chunk::Digits(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Digits(_))) => Ordering::Greater,
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => x.cmp(&y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

fn numeric(cell: &Cell) -> Option<f64> {
    match &cell.value {
        Value::Number(n) => Some(*n),
        Value::Text(s) => parse_number(s),
        _ => None,
    }
}

/// Ascending comparison of two cells in `column`. Empty cells sort first.
pub fn compare_cells(a: &Cell, b: &Cell, column: &ColumnSpec) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return x.total_cmp(&y);
    }
    natural_cmp(&column.display(a), &column.display(b))
}

/// Row order after sorting by `column`: `order[i]` is the current index of the
/// row that moves to position `i`.
pub fn sorted_order(
    data: &Matrix<Cell>,
    rows: &[RowMeta],
    column: usize,
    spec: &ColumnSpec,
    descending: bool,
    sort_new_rows: bool,
) -> Vec<usize> {
    let empty = Cell::empty();
    let cell = |row: usize| data.get(Point::at(row, column)).unwrap_or(&empty);
    let compare = |&a: &usize, &b: &usize| {
        let ord = compare_cells(cell(a), cell(b), spec);
        if descending { ord.reverse() } else { ord }
    };

    let (mut existing, mut inserted): (Vec<usize>, Vec<usize>) = (0..data.row_count())
        .partition(|&row| sort_new_rows || !rows.get(row).is_some_and(RowMeta::is_inserted));
    existing.sort_by(compare);
    if sort_new_rows {
        inserted.sort_by(compare);
    }
    existing.extend(inserted);
    existing
}
