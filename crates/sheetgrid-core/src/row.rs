//! Per-row bookkeeping: identity, sync status and dirty flag.

use serde::Serialize;

/// Stable identity of a row, independent of its position after sorting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    #[default]
    Unchanged,
    Modified,
    Deleted,
    Inserted,
}

impl RowStatus {
    /// Status marker sent to the backend.
    pub fn code(self) -> &'static str {
        match self {
            RowStatus::Unchanged => "",
            RowStatus::Modified => "~",
            RowStatus::Deleted => "-",
            RowStatus::Inserted => "+",
        }
    }

    pub fn from_code(code: &str) -> Option<RowStatus> {
        match code {
            "" => Some(RowStatus::Unchanged),
            "~" => Some(RowStatus::Modified),
            "-" => Some(RowStatus::Deleted),
            "+" => Some(RowStatus::Inserted),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowMeta {
    pub id: RowId,
    pub status: RowStatus,
    /// Whether any cell differs from the value it was loaded with.
    pub dirty: bool,
}

impl RowMeta {
    pub fn loaded(id: RowId) -> RowMeta {
        RowMeta {
            id,
            status: RowStatus::Unchanged,
            dirty: false,
        }
    }

    pub fn inserted(id: RowId) -> RowMeta {
        RowMeta {
            id,
            status: RowStatus::Inserted,
            dirty: true,
        }
    }

    pub fn is_inserted(&self) -> bool {
        self.status == RowStatus::Inserted
    }

    pub fn is_deleted(&self) -> bool {
        self.status == RowStatus::Deleted
    }

    /// Status after an edit: inserted rows stay inserted, the rest follow the
    /// dirty flag. Deleted rows are never edited.
    pub(crate) fn settle(&mut self, dirty: bool) {
        self.dirty = dirty;
        if matches!(self.status, RowStatus::Unchanged | RowStatus::Modified) {
            self.status = if dirty {
                RowStatus::Modified
            } else {
                RowStatus::Unchanged
            };
        }
    }

    /// Delete toggle. Returns false when the row should be removed outright.
    pub(crate) fn toggle_deleted(&mut self) -> bool {
        self.status = match self.status {
            RowStatus::Inserted => return false,
            RowStatus::Unchanged | RowStatus::Modified => RowStatus::Deleted,
            RowStatus::Deleted if self.dirty => RowStatus::Modified,
            RowStatus::Deleted => RowStatus::Unchanged,
        };
        true
    }
}
