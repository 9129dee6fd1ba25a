//! The closed set of transitions a host can dispatch.

use serde::Deserialize;

use crate::cell::Value;
use crate::paging::PageRequest;
use crate::point::Point;

/// A class name applied to one row, or to one cell when `column` is set.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StyleOverlay {
    pub row: usize,
    #[serde(default)]
    pub column: Option<usize>,
    pub class_name: String,
}

/// Rows delivered by the backend, one value per column in column order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TableLoad {
    pub rows: Vec<Vec<Value>>,
    #[serde(default)]
    pub styles: Vec<StyleOverlay>,
}

impl TableLoad {
    pub fn new(rows: Vec<Vec<Value>>) -> TableLoad {
        TableLoad {
            rows,
            styles: Vec::new(),
        }
    }
}

/// One page answered by the host in server paging mode.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PageLoad {
    pub page: usize,
    pub total_rows: usize,
    #[serde(flatten)]
    pub table: TableLoad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    Enter,
    Escape,
    F2,
    Delete,
    Backspace,
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> KeyPress {
        KeyPress { key, shift: false }
    }

    pub fn shifted(key: Key) -> KeyPress {
        KeyPress { key, shift: true }
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        KeyPress::new(key)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Replace every row with freshly loaded data.
    SetData(TableLoad),
    /// Server paging answer for a previously requested page.
    PageLoaded(PageLoad),

    /// Click on a cell. Clicking the active cell again starts editing;
    /// header points select a column and indicator points select a row.
    Activate(Point),
    /// Shift+click: extend the selection from the active point.
    Select(Point),
    SelectEntireRow { row: i64, extend: bool },
    SelectEntireColumn { column: i64, extend: bool },
    SelectEntireTable,
    DragStart(Point),
    DragOver(Point),
    DragEnd,

    Edit,
    Commit,
    Cancel,
    Blur,
    KeyDown(KeyPress),

    SetCellData { point: Point, value: Value },
    AddRow,
    DeleteRow(usize),

    Copy,
    Cut,
    Paste(String),
    Clear,

    SortByColumn { column: usize, extend: bool },
    SetPage(PageRequest),
    SetPageSize(usize),
    SetFilter { column: usize, text: String },
    ClearFilters,

    SetEditable(bool),
    SetColumnDisabled { column: usize, disabled: bool },
    SetColumnInvisible { column: usize, invisible: bool },
}

impl Action {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetData(_) => "set_data",
            Action::PageLoaded(_) => "page_loaded",
            Action::Activate(_) => "activate",
            Action::Select(_) => "select",
            Action::SelectEntireRow { .. } => "select_entire_row",
            Action::SelectEntireColumn { .. } => "select_entire_column",
            Action::SelectEntireTable => "select_entire_table",
            Action::DragStart(_) => "drag_start",
            Action::DragOver(_) => "drag_over",
            Action::DragEnd => "drag_end",
            Action::Edit => "edit",
            Action::Commit => "commit",
            Action::Cancel => "cancel",
            Action::Blur => "blur",
            Action::KeyDown(_) => "key_down",
            Action::SetCellData { .. } => "set_cell_data",
            Action::AddRow => "add_row",
            Action::DeleteRow(_) => "delete_row",
            Action::Copy => "copy",
            Action::Cut => "cut",
            Action::Paste(_) => "paste",
            Action::Clear => "clear",
            Action::SortByColumn { .. } => "sort_by_column",
            Action::SetPage(_) => "set_page",
            Action::SetPageSize(_) => "set_page_size",
            Action::SetFilter { .. } => "set_filter",
            Action::ClearFilters => "clear_filters",
            Action::SetEditable(_) => "set_editable",
            Action::SetColumnDisabled { .. } => "set_column_disabled",
            Action::SetColumnInvisible { .. } => "set_column_invisible",
        }
    }
}
