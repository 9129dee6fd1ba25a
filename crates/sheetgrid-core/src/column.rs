//! Column metadata: kinds, lookups, and value normalization.

use serde::Deserialize;
use sheetgrid_script::engine::{NumberFormat, format_date_with, format_number, parse_number};
use sheetgrid_script::Aggregate;

use crate::cell::{Cell, Value};

/// One option of a combo or multi-select lookup table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupEntry {
    pub key: String,
    pub label: String,
}

impl LookupEntry {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> LookupEntry {
        LookupEntry {
            key: key.into(),
            label: label.into(),
        }
    }
}

fn default_on() -> String {
    "Y".to_string()
}

fn default_off() -> String {
    "N".to_string()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ColumnKind {
    #[default]
    Text,
    /// Multi-line text; surrounding whitespace is trimmed on load.
    TextArea,
    Number {
        #[serde(default)]
        format: Option<String>,
    },
    Date {
        #[serde(default)]
        format: Option<String>,
    },
    /// Boolean column exported as `on`/`off` keys.
    Check {
        #[serde(default = "default_on")]
        on: String,
        #[serde(default = "default_off")]
        off: String,
    },
    Combo {
        lookup: Vec<LookupEntry>,
    },
    MultiSelect {
        lookup: Vec<LookupEntry>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub invisible: bool,
    #[serde(default)]
    pub read_only: bool,
    /// Value (lookup key for combo columns) pre-filled into inserted rows.
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub footer: Option<Aggregate>,
    /// Expression applied to each loaded value before display.
    #[serde(default)]
    pub before_display: Option<String>,
}

impl ColumnSpec {
    pub fn text(key: impl Into<String>) -> ColumnSpec {
        let key = key.into();
        ColumnSpec {
            label: key.clone(),
            key,
            ..ColumnSpec::default()
        }
    }

    pub fn with_kind(mut self, kind: ColumnKind) -> ColumnSpec {
        self.kind = kind;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> ColumnSpec {
        self.default = Some(default.into());
        self
    }

    pub fn with_footer(mut self, footer: Aggregate) -> ColumnSpec {
        self.footer = Some(footer);
        self
    }

    pub fn with_before_display(mut self, expr: impl Into<String>) -> ColumnSpec {
        self.before_display = Some(expr.into());
        self
    }

    pub fn disabled(mut self) -> ColumnSpec {
        self.disabled = true;
        self
    }

    pub fn invisible(mut self) -> ColumnSpec {
        self.invisible = true;
        self
    }

    pub fn lookup(&self) -> Option<&[LookupEntry]> {
        match &self.kind {
            ColumnKind::Combo { lookup } | ColumnKind::MultiSelect { lookup } => Some(lookup),
            _ => None,
        }
    }

    /// Multi-select values compare as sets.
    pub fn is_unordered(&self) -> bool {
        matches!(self.kind, ColumnKind::MultiSelect { .. })
    }

    /// Boolean and choice columns export their key rather than their label.
    pub fn exports_key(&self) -> bool {
        matches!(
            self.kind,
            ColumnKind::Check { .. } | ColumnKind::Combo { .. } | ColumnKind::MultiSelect { .. }
        )
    }

    /// Find the lookup entry whose label or key matches `text` (case-insensitive).
    pub fn resolve(&self, text: &str) -> Option<&LookupEntry> {
        let needle = text.trim();
        if needle.is_empty() {
            return None;
        }
        let lookup = self.lookup()?;
        lookup
            .iter()
            .find(|e| e.label == needle)
            .or_else(|| lookup.iter().find(|e| e.key == needle))
            .or_else(|| lookup.iter().find(|e| e.label.eq_ignore_ascii_case(needle)))
    }

    fn label_for_key(&self, key: &str) -> Option<&str> {
        self.lookup()?
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.label.as_str())
    }

    fn check_cell(&self, on: bool) -> (Value, Option<String>) {
        match &self.kind {
            ColumnKind::Check { on: on_key, off } => {
                let key = if on { on_key } else { off };
                (Value::Bool(on), Some(key.clone()))
            }
            _ => (Value::Bool(on), None),
        }
    }

    fn parse_check(&self, text: &str) -> bool {
        let t = text.trim();
        if let ColumnKind::Check { on, .. } = &self.kind {
            if t == on {
                return true;
            }
        }
        matches!(
            t.to_ascii_lowercase().as_str(),
            "true" | "1" | "y" | "yes" | "on" | "x"
        )
    }

    /// Turn user-entered text (typing or paste) into this column's value and key.
    ///
    /// Lookup columns resolve the text against their table and clear to empty
    /// when it does not match.
    pub fn coerce_input(&self, text: &str) -> (Value, Option<String>) {
        match &self.kind {
            ColumnKind::Combo { .. } => match self.resolve(text) {
                Some(entry) => (Value::text(&entry.label), Some(entry.key.clone())),
                None => (Value::Empty, None),
            },
            ColumnKind::MultiSelect { .. } => {
                let entries: Vec<&LookupEntry> =
                    text.split(',').filter_map(|part| self.resolve(part)).collect();
                multi_value(&entries)
            }
            ColumnKind::Check { .. } => self.check_cell(self.parse_check(text)),
            ColumnKind::Number { .. } => match parse_number(text) {
                Some(n) => (Value::Number(n), None),
                None => (Value::from(text), None),
            },
            ColumnKind::Date { format: Some(format) } => {
                (Value::from(format_date_with(text, format)), None)
            }
            _ => (Value::from(text), None),
        }
    }

    /// Coerce a value supplied by an editor widget.
    pub fn coerce_value(&self, value: Value) -> (Value, Option<String>) {
        match (&self.kind, value) {
            (ColumnKind::Check { .. }, Value::Bool(b)) => self.check_cell(b),
            (ColumnKind::Number { .. }, Value::Number(n)) => (Value::Number(n), None),
            (ColumnKind::MultiSelect { .. }, Value::List(items)) => {
                let entries: Vec<&LookupEntry> =
                    items.iter().filter_map(|item| self.resolve(item)).collect();
                multi_value(&entries)
            }
            (_, value) => self.coerce_input(&value.to_text()),
        }
    }

    /// Normalize a raw value delivered by the backend.
    pub fn normalize_loaded(&self, raw: &Value) -> Cell {
        let (value, key) = match &self.kind {
            ColumnKind::Text => (raw.clone(), None),
            ColumnKind::TextArea => (Value::from(raw.to_text().trim()), None),
            ColumnKind::Number { .. } => match raw {
                Value::Number(n) => (Value::Number(*n), None),
                other => match parse_number(&other.to_text()) {
                    Some(n) => (Value::Number(n), None),
                    None => (other.clone(), None),
                },
            },
            ColumnKind::Date { format } => match format {
                Some(format) => (Value::from(format_date_with(&raw.to_text(), format)), None),
                None => (raw.clone(), None),
            },
            ColumnKind::Check { .. } => match raw {
                Value::Bool(b) => self.check_cell(*b),
                Value::Empty => self.check_cell(false),
                other => self.check_cell(self.parse_check(&other.to_text())),
            },
            ColumnKind::Combo { .. } => {
                let key = raw.to_text();
                if key.is_empty() {
                    (Value::Empty, None)
                } else {
                    let label = self.label_for_key(&key).unwrap_or(&key).to_string();
                    (Value::Text(label), Some(key))
                }
            }
            ColumnKind::MultiSelect { .. } => {
                let keys: Vec<String> = match raw {
                    Value::List(items) => items.clone(),
                    Value::Empty => Vec::new(),
                    other => other
                        .to_text()
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                };
                if keys.is_empty() {
                    (Value::Empty, None)
                } else {
                    let labels = keys
                        .iter()
                        .map(|k| self.label_for_key(k).unwrap_or(k).to_string())
                        .collect();
                    (Value::List(labels), Some(keys.join(",")))
                }
            }
        };
        Cell::new(value)
            .with_combo_key(key)
            .with_read_only(self.read_only)
    }

    /// Cell pre-filled into a newly inserted row.
    pub fn default_cell(&self) -> Cell {
        let (value, key) = match &self.default {
            Some(default) => match &self.kind {
                ColumnKind::Combo { .. } | ColumnKind::MultiSelect { .. } => {
                    let cell = self.normalize_loaded(&Value::text(default));
                    (cell.value, cell.combo_key)
                }
                _ => self.coerce_input(default),
            },
            None => match &self.kind {
                ColumnKind::Check { .. } => self.check_cell(false),
                _ => (Value::Empty, None),
            },
        };
        Cell::new(value)
            .with_combo_key(key)
            .with_read_only(self.read_only)
    }

    /// Empty cell carrying this column's presentation flags.
    pub fn blank_cell(&self) -> Cell {
        Cell::empty().with_read_only(self.read_only)
    }

    /// Text shown for a cell of this column.
    pub fn display(&self, cell: &Cell) -> String {
        match (&self.kind, &cell.value) {
            (ColumnKind::Number { format: Some(format) }, Value::Number(n)) => {
                match NumberFormat::parse(format) {
                    Some(f) => f.apply(*n),
                    None => format_number(*n),
                }
            }
            (ColumnKind::Check { .. }, Value::Bool(_)) => cell.key(),
            _ => cell.display(),
        }
    }

    /// Value sent to the backend.
    pub fn export_value(&self, cell: &Cell) -> String {
        if self.exports_key() {
            return cell.combo_key.clone().unwrap_or_else(|| cell.display());
        }
        cell.display()
    }

    /// Value used for dirty comparisons against the load-time snapshot.
    pub fn compare_value(&self, cell: &Cell) -> Value {
        match (&self.kind, &cell.combo_key) {
            (ColumnKind::MultiSelect { .. }, Some(keys)) => Value::List(
                keys.split(',').map(str::to_string).collect(),
            ),
            (ColumnKind::MultiSelect { .. }, None) => Value::List(Vec::new()),
            (_, Some(key)) if self.exports_key() => Value::text(key),
            _ => cell.value.clone(),
        }
    }
}

fn multi_value(entries: &[&LookupEntry]) -> (Value, Option<String>) {
    if entries.is_empty() {
        return (Value::Empty, None);
    }
    let labels = entries.iter().map(|e| e.label.clone()).collect();
    let keys = entries
        .iter()
        .map(|e| e.key.as_str())
        .collect::<Vec<_>>()
        .join(",");
    (Value::List(labels), Some(keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city() -> ColumnSpec {
        ColumnSpec::text("city").with_kind(ColumnKind::Combo {
            lookup: vec![
                LookupEntry::new("SEL", "Seoul"),
                LookupEntry::new("BSN", "Busan"),
            ],
        })
    }

    fn tags() -> ColumnSpec {
        ColumnSpec::text("tags").with_kind(ColumnKind::MultiSelect {
            lookup: vec![
                LookupEntry::new("a", "Alpha"),
                LookupEntry::new("b", "Beta"),
            ],
        })
    }

    #[test]
    fn test_combo_load_resolves_label() {
        let cell = city().normalize_loaded(&Value::text("BSN"));
        assert_eq!(cell.value, Value::text("Busan"));
        assert_eq!(cell.combo_key.as_deref(), Some("BSN"));
    }

    #[test]
    fn test_combo_input_resolves_or_clears() {
        assert_eq!(
            city().coerce_input("seoul"),
            (Value::text("Seoul"), Some("SEL".to_string()))
        );
        assert_eq!(city().coerce_input("Tokyo"), (Value::Empty, None));
    }

    #[test]
    fn test_multi_select_load_and_compare_as_set() {
        let column = tags();
        let cell = column.normalize_loaded(&Value::text("b,a"));
        assert_eq!(
            cell.value,
            Value::List(vec!["Beta".into(), "Alpha".into()])
        );
        let reordered = column.normalize_loaded(&Value::List(vec!["a".into(), "b".into()]));
        assert!(column
            .compare_value(&cell)
            .equivalent(&column.compare_value(&reordered), true));
    }

    #[test]
    fn test_textarea_trimmed() {
        let column = ColumnSpec::text("memo").with_kind(ColumnKind::TextArea);
        let cell = column.normalize_loaded(&Value::text("  hello \n"));
        assert_eq!(cell.value, Value::text("hello"));
    }

    #[test]
    fn test_number_and_date_formatting() {
        let amount = ColumnSpec::text("amount").with_kind(ColumnKind::Number {
            format: Some("#,##0.00".into()),
        });
        let cell = amount.normalize_loaded(&Value::text("1234.5"));
        assert_eq!(cell.value, Value::Number(1234.5));
        assert_eq!(amount.display(&cell), "1,234.50");

        let raw = amount.normalize_loaded(&Value::text("n/a"));
        assert_eq!(amount.display(&raw), "n/a");

        let date = ColumnSpec::text("day").with_kind(ColumnKind::Date {
            format: Some("yyyy/MM/dd".into()),
        });
        assert_eq!(
            date.normalize_loaded(&Value::text("2024-01-05")).value,
            Value::text("2024/01/05")
        );
        assert_eq!(
            date.normalize_loaded(&Value::text("soon")).value,
            Value::text("soon")
        );
    }

    #[test]
    fn test_check_exports_keys() {
        let column = ColumnSpec::text("ok").with_kind(ColumnKind::Check {
            on: "1".into(),
            off: "0".into(),
        });
        let cell = column.normalize_loaded(&Value::text("1"));
        assert_eq!(cell.value, Value::Bool(true));
        assert_eq!(column.export_value(&cell), "1");
        assert_eq!(column.export_value(&column.default_cell()), "0");
    }

    #[test]
    fn test_default_cell_uses_lookup() {
        let column = city().with_default("SEL");
        let cell = column.default_cell();
        assert_eq!(cell.value, Value::text("Seoul"));
        assert_eq!(cell.combo_key.as_deref(), Some("SEL"));
        assert_eq!(ColumnSpec::text("x").default_cell(), Cell::empty());
    }

    #[test]
    fn test_deserialize_column_kind() {
        let column: ColumnSpec = serde_json::from_str(
            r#"{"key": "city", "kind": {"type": "combo", "lookup": [{"key": "SEL", "label": "Seoul"}]}, "footer": "count"}"#,
        )
        .unwrap();
        assert!(column.exports_key());
        assert_eq!(column.footer, Some(Aggregate::Count));
    }
}
