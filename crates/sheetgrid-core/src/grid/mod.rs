//! Grid state and its transitions.
//!
//! [`GridState`] is an immutable value from the host's point of view. Hosts
//! dispatch an [`Action`] through [`reduce`] (or [`GridState::apply`]) and get
//! a new state back, then read [`GridState::signals`] for notices and page
//! requests produced by that transition.

mod action;
mod io;
mod navigation;
mod ops;
mod reducer;
mod state;

pub use action::{Action, Key, KeyPress, PageLoad, StyleOverlay, TableLoad};
pub use io::{Export, FooterCell, STATUS_ATTR};
pub use reducer::reduce;
pub use state::{CellChange, FetchRequest, GridState, HostSignals, Mode, Notice, NoticeLevel};
