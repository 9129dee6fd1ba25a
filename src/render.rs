//! Text output of a grid session.

use std::fmt::Write as _;
use std::str::FromStr;

use sheetgrid_core::{FooterCell, GridState, Point};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Shown rows as tab-separated text with a status column and footer.
    #[default]
    Table,
    /// Every row in the backend export shape.
    Json,
    /// Only inserted, modified and deleted rows, as JSON.
    Changes,
    /// The copy buffer as clipboard text.
    Clipboard,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "changes" => Ok(OutputFormat::Changes),
            "clipboard" => Ok(OutputFormat::Clipboard),
            other => Err(format!(
                "unknown output format `{}` (expected table, json, changes or clipboard)",
                other
            )),
        }
    }
}

pub fn render(state: &GridState, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(state)),
        OutputFormat::Json => serde_json::to_string_pretty(&state.export()),
        OutputFormat::Changes => serde_json::to_string_pretty(&state.export_changes()),
        OutputFormat::Clipboard => Ok(state.copy_text()),
    }
}

/// Header of visible column labels, then one line per shown row. The first
/// field is the 1-based row number followed by its status code.
pub fn render_table(state: &GridState) -> String {
    let visible: Vec<usize> = state
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.invisible)
        .map(|(i, _)| i)
        .collect();

    let mut out = String::new();
    let header: Vec<&str> = std::iter::once("#")
        .chain(visible.iter().map(|&c| state.columns()[c].label.as_str()))
        .collect();
    let _ = writeln!(out, "{}", header.join("\t"));

    for &row in state.show_range() {
        let status = state.row_status(row).map(|s| s.code()).unwrap_or_default();
        let mut fields = vec![format!("{}{}", row + 1, status)];
        fields.extend(
            visible
                .iter()
                .map(|&c| state.display(Point::at(row, c)).unwrap_or_default()),
        );
        let _ = writeln!(out, "{}", fields.join("\t"));
    }

    let footers = state.footers();
    if footers.iter().any(|f| *f != FooterCell::None) {
        let fields: Vec<String> = std::iter::once("=".to_string())
            .chain(visible.iter().map(|&c| match &footers[c] {
                FooterCell::None => String::new(),
                FooterCell::Value(text) => text.clone(),
                FooterCell::Error(_) => "#ERR".to_string(),
            }))
            .collect();
        let _ = writeln!(out, "{}", fields.join("\t"));
    }

    let paging = state.paging();
    if paging.is_enabled() {
        let page = if paging.is_show_all() {
            "all".to_string()
        } else {
            paging.page_number.to_string()
        };
        let _ = writeln!(out, "-- page {}/{} --", page, state.total_pages());
    }
    out
}
