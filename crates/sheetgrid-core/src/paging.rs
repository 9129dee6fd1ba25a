//! Paging and column filters, which together decide the show range.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::column::ColumnSpec;
use crate::config::PagingConfig;
use crate::matrix::Matrix;
use crate::point::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagingMode {
    /// Every row is held locally and sliced into pages.
    #[default]
    Client,
    /// Only the current page is held; other pages are requested from the host.
    Server,
}

/// Page navigation requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageRequest {
    First,
    Previous,
    Next,
    Last,
    /// Client mode only: every row, up to the show-all cap.
    ShowAll,
    Number(usize),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Paging {
    pub mode: PagingMode,
    /// Rows per page; 0 disables paging.
    pub page_size: usize,
    /// 1-based page. 0 means every row is shown.
    pub page_number: usize,
    /// Row count reported by the host in server mode.
    pub total_rows: usize,
}

impl Paging {
    pub fn from_config(config: &PagingConfig) -> Paging {
        let mut paging = Paging {
            mode: config.mode,
            page_size: config.page_size,
            ..Paging::default()
        };
        paging.page_number = paging.first_page();
        paging
    }

    pub fn is_enabled(&self) -> bool {
        self.page_size > 0
    }

    pub fn is_show_all(&self) -> bool {
        self.page_number == 0
    }

    pub(crate) fn first_page(&self) -> usize {
        if self.is_enabled() { 1 } else { 0 }
    }

    /// Number of pages; always at least 1 while paging is enabled.
    pub fn total_pages(&self, local_rows: usize) -> usize {
        if !self.is_enabled() {
            return 1;
        }
        let rows = match self.mode {
            PagingMode::Client => local_rows,
            PagingMode::Server => self.total_rows,
        };
        rows.div_ceil(self.page_size).max(1)
    }

    /// Page a request resolves to, or None when it does not apply.
    pub fn resolve(&self, request: PageRequest, local_rows: usize) -> Option<usize> {
        if !self.is_enabled() {
            return None;
        }
        let last = self.total_pages(local_rows);
        let current = self.page_number.max(1);
        let page = match request {
            PageRequest::First => 1,
            PageRequest::Previous => current.saturating_sub(1).max(1),
            PageRequest::Next => (current + 1).min(last),
            PageRequest::Last => last,
            PageRequest::ShowAll => {
                return (self.mode == PagingMode::Client).then_some(0);
            }
            PageRequest::Number(n) => n.clamp(1, last),
        };
        Some(page)
    }

    /// Index range of local rows on the current page (client mode).
    fn window(&self, rows: usize) -> std::ops::Range<usize> {
        if self.mode == PagingMode::Server || !self.is_enabled() || self.is_show_all() {
            return 0..rows;
        }
        let start = (self.page_number - 1).saturating_mul(self.page_size).min(rows);
        start..(start + self.page_size).min(rows)
    }
}

/// A case-insensitive substring filter on one column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnFilter {
    pub column: usize,
    pub text: String,
}

impl ColumnFilter {
    fn matches(&self, data: &Matrix<Cell>, row: usize, columns: &[ColumnSpec]) -> bool {
        let Some(spec) = columns.get(self.column) else {
            return true;
        };
        if spec.invisible {
            return true;
        }
        let needle = self.text.to_lowercase();
        data.get(Point::at(row, self.column))
            .map(|cell| spec.display(cell).to_lowercase().contains(&needle))
            .unwrap_or(needle.is_empty())
    }
}

/// Rows currently shown, in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShowRange {
    pub rows: Vec<usize>,
    /// Show-all hit the row cap.
    pub truncated: bool,
}

/// Apply the page window, then every filter in order.
pub fn compute_show_range(
    data: &Matrix<Cell>,
    columns: &[ColumnSpec],
    paging: &Paging,
    filters: &[ColumnFilter],
    max_show_all: usize,
) -> ShowRange {
    let mut window = paging.window(data.row_count());
    let mut truncated = false;
    if window.len() > max_show_all && (paging.is_show_all() || !paging.is_enabled()) {
        window.end = window.start + max_show_all;
        truncated = true;
    }
    let rows = window
        .filter(|&row| filters.iter().all(|f| f.matches(data, row, columns)))
        .collect();
    ShowRange { rows, truncated }
}
