//! A grid session driven from the command line.
//!
//! The session plays the host role: it keeps every source row, answers
//! server-mode page requests by slicing them, and surfaces notices.

use sheetgrid_core::{
    Action, GridConfig, GridState, NoticeLevel, PageLoad, PagingMode, TableLoad, Value,
};
use tracing::{debug, info, warn};

use crate::commands::Command;
use crate::error::Result;

/// Upper bound on page requests answered for a single dispatch.
const MAX_FETCH_HOPS: usize = 4;

pub struct Session {
    state: GridState,
    /// Every backend row; the grid only holds one page of these in server mode.
    source: Vec<Vec<Value>>,
}

impl Session {
    pub fn open(config: GridConfig, rows: Vec<Vec<Value>>) -> Result<Session> {
        let server = config.paging.mode == PagingMode::Server;
        let mut session = Session {
            state: GridState::new(config)?,
            source: rows,
        };
        let action = if server {
            Action::PageLoaded(session.page(1))
        } else {
            Action::SetData(TableLoad::new(session.source.clone()))
        };
        session.dispatch(action);
        info!(target: "session", rows = session.source.len(), server, "session opened");
        Ok(session)
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        let mut next = Some(action);
        let mut hops = 0;
        while let Some(action) = next.take() {
            debug!(target: "session", action = action.name(), "dispatch");
            self.state = self.state.apply(action);
            report(&self.state);

            if let Some(fetch) = self.state.signals().fetch {
                hops += 1;
                if hops > MAX_FETCH_HOPS {
                    warn!(target: "session", page = fetch.page, "too many page requests, giving up");
                    break;
                }
                debug!(target: "session", page = fetch.page, page_size = fetch.page_size, "fetch");
                next = Some(Action::PageLoaded(self.page_sized(fetch.page, fetch.page_size)));
            }
        }
    }

    pub fn run(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Dispatch(action) => self.dispatch(action),
                Command::Input(text) => self.input(text),
                Command::PasteBuffer => {
                    let text = self.state.copy_text();
                    self.dispatch(Action::Paste(text));
                }
            }
        }
    }

    fn input(&mut self, text: String) {
        let Some(point) = self.state.active().filter(|_| self.state.is_editing()) else {
            eprintln!("Warning: input ignored, no cell is being edited");
            return;
        };
        self.dispatch(Action::SetCellData {
            point,
            value: Value::from(text),
        });
        self.dispatch(Action::Commit);
    }

    fn page(&self, page: usize) -> PageLoad {
        self.page_sized(page, self.state.paging().page_size)
    }

    fn page_sized(&self, page: usize, page_size: usize) -> PageLoad {
        let rows = if page_size == 0 {
            self.source.clone()
        } else {
            self.source
                .iter()
                .skip(page.saturating_sub(1).saturating_mul(page_size))
                .take(page_size)
                .cloned()
                .collect()
        };
        PageLoad {
            page,
            total_rows: self.source.len(),
            table: TableLoad::new(rows),
        }
    }
}

fn report(state: &GridState) {
    for notice in &state.signals().notices {
        let level = match notice.level {
            NoticeLevel::Info => "Info",
            NoticeLevel::Warning => "Warning",
            NoticeLevel::Error => "Error",
        };
        eprintln!("{}: {}", level, notice.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetgrid_core::{ColumnSpec, PageRequest, PagingConfig, Point};

    fn rows(n: usize) -> Vec<Vec<Value>> {
        (1..=n)
            .map(|i| vec![Value::text(format!("r{i}"))])
            .collect()
    }

    fn server_config(page_size: usize) -> GridConfig {
        GridConfig {
            paging: PagingConfig {
                mode: PagingMode::Server,
                page_size,
            },
            ..GridConfig::with_columns(vec![ColumnSpec::text("name")])
        }
    }

    #[test]
    fn test_server_session_loads_first_page() {
        let session = Session::open(server_config(2), rows(5)).unwrap();
        assert_eq!(session.state().data().row_count(), 2);
        assert_eq!(session.state().total_pages(), 3);
        assert!(!session.state().signals().busy);
    }

    #[test]
    fn test_server_session_answers_page_requests() {
        let mut session = Session::open(server_config(2), rows(5)).unwrap();
        session.dispatch(Action::SetPage(PageRequest::Last));
        assert_eq!(session.state().paging().page_number, 3);
        assert_eq!(session.state().display(Point::at(0, 0)).as_deref(), Some("r5"));
        assert!(!session.state().signals().busy);
    }

    #[test]
    fn test_input_writes_the_edited_cell() {
        let config = GridConfig::with_columns(vec![ColumnSpec::text("name")]);
        let mut session = Session::open(config, rows(2)).unwrap();
        session.run(vec![
            Command::Dispatch(Action::Activate(Point::at(1, 0))),
            Command::Dispatch(Action::Edit),
            Command::Input("Zed".to_string()),
        ]);
        assert_eq!(session.state().display(Point::at(1, 0)).as_deref(), Some("Zed"));
        assert!(!session.state().is_editing());
    }

    #[test]
    fn test_paste_buffer_uses_grid_copy() {
        let config = GridConfig::with_columns(vec![ColumnSpec::text("name")]);
        let mut session = Session::open(config, rows(2)).unwrap();
        session.run(vec![
            Command::Dispatch(Action::Activate(Point::at(0, 0))),
            Command::Dispatch(Action::Copy),
            Command::Dispatch(Action::Activate(Point::at(1, 0))),
            Command::PasteBuffer,
        ]);
        assert_eq!(session.state().display(Point::at(1, 0)).as_deref(), Some("r1"));
    }
}
