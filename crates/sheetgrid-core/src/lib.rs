//! UI-agnostic state engine for editable data grids.
//!
//! The crate models a rectangular grid of cells together with selection,
//! keyboard navigation, clipboard transfer, sorting, paging, filtering and
//! per-row change tracking. Rendering is left to the host: it feeds
//! [`grid::Action`]s in and reads the resulting [`grid::GridState`].

pub mod cell;
pub mod clipboard;
pub mod column;
pub mod config;
pub mod error;
pub mod grid;
pub mod matrix;
pub mod paging;
pub mod point;
pub mod point_map;
pub mod point_range;
pub mod row;
pub mod selection;
pub mod sort;

pub use cell::{Cell, Value};
pub use column::{ColumnKind, ColumnSpec, LookupEntry};
pub use config::{GridConfig, PagingConfig};
pub use error::{GridError, Result};
pub use grid::{
    Action, CellChange, Export, FooterCell, GridState, Key, KeyPress, Mode, Notice, NoticeLevel,
    PageLoad, TableLoad, reduce,
};
pub use matrix::{Matrix, Size};
pub use paging::{PageRequest, PagingMode};
pub use point::Point;
pub use point_map::{PointMap, PointSet};
pub use point_range::PointRange;
pub use row::{RowId, RowMeta, RowStatus};
pub use selection::{Direction, Selection};
pub use sort::SortStatus;
