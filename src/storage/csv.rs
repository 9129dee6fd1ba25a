//! CSV import/export functionality

use std::io::Write;
use std::path::Path;

use sheetgrid_core::{ColumnSpec, GridState, Point, Value};

use crate::error::{AppError, Result};

/// A CSV file split into its header row and data rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Text columns named after the header.
    pub fn columns(&self) -> Vec<ColumnSpec> {
        self.header.iter().map(ColumnSpec::text).collect()
    }

    /// Rows rearranged into `columns` order by matching header names to
    /// column keys, plus the keys that had no CSV column.
    pub fn rows_for(&self, columns: &[ColumnSpec]) -> (Vec<Vec<Value>>, Vec<String>) {
        let positions: Vec<Option<usize>> = columns
            .iter()
            .map(|c| self.header.iter().position(|h| *h == c.key))
            .collect();
        let missing = columns
            .iter()
            .zip(&positions)
            .filter(|(_, p)| p.is_none())
            .map(|(c, _)| c.key.clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|fields| {
                positions
                    .iter()
                    .map(|p| {
                        p.and_then(|i| fields.get(i))
                            .map(|f| Value::from(f.as_str()))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        (rows, missing)
    }
}

pub fn read_csv(path: &Path) -> Result<CsvTable> {
    let content = std::fs::read_to_string(path)?;
    parse_csv(&content)
}

/// Parse CSV text. The first non-blank line is the header; blank lines are skipped.
pub fn parse_csv(content: &str) -> Result<CsvTable> {
    let mut table: Option<CsvTable> = None;
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = parse_csv_line(line).map_err(|message| AppError::Parse {
            line: idx + 1,
            message,
        })?;
        match table.as_mut() {
            None => {
                table = Some(CsvTable {
                    header: fields,
                    rows: Vec::new(),
                })
            }
            Some(t) => t.rows.push(fields),
        }
    }
    table.ok_or(AppError::Parse {
        line: 1,
        message: "missing header row".to_string(),
    })
}

/// Parse a single CSV line, handling quoted fields
pub(crate) fn parse_csv_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    let field = std::mem::take(&mut current);
                    fields.push(if field_was_quoted {
                        field
                    } else {
                        field.trim().to_string()
                    });
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(if field_was_quoted {
        current
    } else {
        current.trim().to_string()
    });
    Ok(fields)
}

/// Write every row (not only the shown page) with column keys as the header.
/// Values are written the way they are exported, so lookups keep their keys.
pub fn write_csv(path: &Path, state: &GridState) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    let header: Vec<String> = state
        .columns()
        .iter()
        .map(|c| escape_csv_field(&c.key))
        .collect();
    writeln!(file, "{}", header.join(","))?;

    for row in 0..state.data().row_count() {
        let fields: Vec<String> = state
            .columns()
            .iter()
            .enumerate()
            .map(|(c, spec)| {
                let value = state
                    .cell(Point::at(row, c))
                    .map(|cell| spec.export_value(cell))
                    .unwrap_or_default();
                escape_csv_field(&value)
            })
            .collect();
        writeln!(file, "{}", fields.join(","))?;
    }
    Ok(())
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    // Guard against CSV formula injection in spreadsheet apps.
    let first_non_space = field.trim_start_matches([' ', '\t']).chars().next();
    let safe_field = if matches!(first_non_space, Some('=' | '+' | '-' | '@')) {
        format!("'{}", field)
    } else {
        field.to_string()
    };

    if safe_field.contains(',')
        || safe_field.contains('"')
        || safe_field.contains('\n')
        || safe_field.contains('\r')
    {
        format!("\"{}\"", safe_field.replace('"', "\"\""))
    } else {
        safe_field
    }
}
