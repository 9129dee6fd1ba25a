//! Command scripts for headless grid sessions.
//!
//! A script is a list of commands separated by newlines or `;` (write `\;`
//! for a literal semicolon). Rows are 1-based; row 0 addresses the header
//! and column 0 the row indicator. Columns are given by key or 1-based number.
//!
//! ```text
//! goto 2 name; edit; input Alice; sort age; page next
//! ```

use sheetgrid_core::{Action, ColumnSpec, Key, KeyPress, PageRequest, Point, Value};

use crate::error::{AppError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Dispatch(Action),
    /// Write text into the cell being edited and commit it.
    Input(String),
    /// Paste whatever the grid itself last copied.
    PasteBuffer,
}

pub fn parse_script(script: &str, columns: &[ColumnSpec]) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (idx, line) in split_commands(script).iter().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parsed = parse_command(line, columns).map_err(|message| AppError::Command {
            index: idx + 1,
            command: line.to_string(),
            message,
        })?;
        commands.extend(parsed);
    }
    Ok(commands)
}

fn split_commands(script: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut current = String::new();
    let mut chars = script.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&';') => {
                current.push(';');
                chars.next();
            }
            ';' | '\n' => commands.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    commands.push(current);
    commands
}

/// Split off the first whitespace-delimited word.
fn next_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(pos) => (&input[..pos], input[pos..].trim_start()),
        None => (input, ""),
    }
}

fn dispatch(action: Action) -> std::result::Result<Vec<Command>, String> {
    Ok(vec![Command::Dispatch(action)])
}

fn parse_command(line: &str, columns: &[ColumnSpec]) -> std::result::Result<Vec<Command>, String> {
    let (name, rest) = next_word(line);
    let name = name.to_ascii_lowercase();
    match name.as_str() {
        "goto" | "click" => dispatch(Action::Activate(point_arg(rest, columns)?.0)),
        "select" => dispatch(Action::Select(point_arg(rest, columns)?.0)),
        "drag" => {
            let (from, rest) = point_arg(rest, columns)?;
            let (to, _) = point_arg(rest, columns)?;
            Ok(vec![
                Command::Dispatch(Action::DragStart(from)),
                Command::Dispatch(Action::DragOver(to)),
                Command::Dispatch(Action::DragEnd),
            ])
        }
        "row" => {
            let (row, rest) = next_word(rest);
            dispatch(Action::SelectEntireRow {
                row: row_index(row)?,
                extend: extend_flag(rest)?,
            })
        }
        "column" | "col" => {
            let (column, rest) = next_word(rest);
            dispatch(Action::SelectEntireColumn {
                column: column_index(column, columns)?,
                extend: extend_flag(rest)?,
            })
        }
        "all" => dispatch(Action::SelectEntireTable),
        "edit" => dispatch(Action::Edit),
        "commit" => dispatch(Action::Commit),
        "cancel" => dispatch(Action::Cancel),
        "blur" => dispatch(Action::Blur),
        "key" => dispatch(Action::KeyDown(key_arg(rest)?)),
        "input" => Ok(vec![Command::Input(unescape(rest))]),
        "set" => {
            let (point, value) = point_arg(rest, columns)?;
            dispatch(Action::SetCellData {
                point,
                value: Value::from(unescape(value)),
            })
        }
        "add" => dispatch(Action::AddRow),
        "delete" => {
            let row = row_index(next_word(rest).0)?;
            let row = usize::try_from(row).map_err(|_| "delete needs a data row".to_string())?;
            dispatch(Action::DeleteRow(row))
        }
        "copy" => dispatch(Action::Copy),
        "cut" => dispatch(Action::Cut),
        "paste" if rest.is_empty() => Ok(vec![Command::PasteBuffer]),
        "paste" => dispatch(Action::Paste(unescape(rest))),
        "clear" => dispatch(Action::Clear),
        "sort" => {
            let (column, rest) = next_word(rest);
            dispatch(Action::SortByColumn {
                column: data_column(column, columns)?,
                extend: extend_flag(rest)?,
            })
        }
        "page" => dispatch(Action::SetPage(page_arg(rest)?)),
        "pagesize" => dispatch(Action::SetPageSize(number_arg(next_word(rest).0)?)),
        "filter" => {
            let (column, text) = next_word(rest);
            dispatch(Action::SetFilter {
                column: data_column(column, columns)?,
                text: unescape(text),
            })
        }
        "nofilter" => dispatch(Action::ClearFilters),
        "lock" => dispatch(Action::SetEditable(false)),
        "unlock" => dispatch(Action::SetEditable(true)),
        "disable" | "enable" => dispatch(Action::SetColumnDisabled {
            column: data_column(next_word(rest).0, columns)?,
            disabled: name == "disable",
        }),
        "hide" | "show" => dispatch(Action::SetColumnInvisible {
            column: data_column(next_word(rest).0, columns)?,
            invisible: name == "hide",
        }),
        other => Err(format!("unknown command: {}", other)),
    }
}

fn number_arg(word: &str) -> std::result::Result<usize, String> {
    if word.is_empty() {
        return Err("missing number".to_string());
    }
    word.parse::<usize>()
        .map_err(|_| format!("expected a number, got `{}`", word))
}

/// 1-based row to a point row; 0 is the header pseudo-row.
fn row_index(word: &str) -> std::result::Result<i64, String> {
    Ok(number_arg(word)? as i64 - 1)
}

/// Column key or 1-based number to a point column; 0 is the indicator column.
fn column_index(word: &str, columns: &[ColumnSpec]) -> std::result::Result<i64, String> {
    if word.is_empty() {
        return Err("missing column".to_string());
    }
    if let Some(idx) = columns.iter().position(|c| c.key == word) {
        return Ok(idx as i64);
    }
    match word.parse::<usize>() {
        Ok(n) if n <= columns.len() => Ok(n as i64 - 1),
        Ok(n) => Err(format!("column {} out of range (1-{})", n, columns.len())),
        Err(_) => Err(format!("unknown column: {}", word)),
    }
}

fn data_column(word: &str, columns: &[ColumnSpec]) -> std::result::Result<usize, String> {
    usize::try_from(column_index(word, columns)?).map_err(|_| "expected a data column".to_string())
}

fn point_arg<'a>(
    input: &'a str,
    columns: &[ColumnSpec],
) -> std::result::Result<(Point, &'a str), String> {
    let (row, rest) = next_word(input);
    let (column, rest) = next_word(rest);
    let point = Point::new(row_index(row)?, column_index(column, columns)?);
    Ok((point, rest))
}

fn extend_flag(rest: &str) -> std::result::Result<bool, String> {
    match rest.trim() {
        "" => Ok(false),
        "extend" | "+" => Ok(true),
        other => Err(format!("unexpected argument: {}", other)),
    }
}

fn page_arg(rest: &str) -> std::result::Result<PageRequest, String> {
    match next_word(rest).0.to_ascii_lowercase().as_str() {
        "first" => Ok(PageRequest::First),
        "prev" | "previous" => Ok(PageRequest::Previous),
        "next" => Ok(PageRequest::Next),
        "last" => Ok(PageRequest::Last),
        "all" => Ok(PageRequest::ShowAll),
        other => number_arg(other).map(PageRequest::Number),
    }
}

fn key_arg(rest: &str) -> std::result::Result<KeyPress, String> {
    let word = next_word(rest).0;
    let (shift, name) = match word.strip_prefix("shift+") {
        Some(name) => (true, name),
        None => (false, word),
    };
    let key = match name.to_ascii_lowercase().as_str() {
        "up" => Key::ArrowUp,
        "down" => Key::ArrowDown,
        "left" => Key::ArrowLeft,
        "right" => Key::ArrowRight,
        "tab" => Key::Tab,
        "enter" => Key::Enter,
        "esc" | "escape" => Key::Escape,
        "f2" => Key::F2,
        "delete" | "del" => Key::Delete,
        "backspace" => Key::Backspace,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return Err(format!("unknown key: {}", word)),
            }
        }
    };
    Ok(KeyPress { key, shift })
}

/// Expand `\t`, `\n` and `\\` escapes.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
