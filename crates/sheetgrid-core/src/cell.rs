//! Cell values.

use serde::{Deserialize, Serialize};
use sheetgrid_script::engine::format_number;

/// A raw or display value held by a cell.
///
/// `List` carries the labels of a multi-select cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Value {
        Value::Text(s.into())
    }

    /// Display text of the value.
    pub fn to_text(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::List(items) => items.join(", "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Compare two values for dirty tracking.
    ///
    /// Lists compare as sets when `unordered` is true; everything else compares
    /// by display text so `Number(5.0)` and `Text("5")` are the same value.
    pub fn equivalent(&self, other: &Value, unordered: bool) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) if unordered => {
                let mut a = a.clone();
                let mut b = b.clone();
                a.sort();
                a.dedup();
                b.sort();
                b.dedup();
                a == b
            }
            _ => self.to_text() == other.to_text(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Value::Empty
        } else {
            Value::Text(s.to_string())
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Value::Empty
        } else {
            Value::Text(s)
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A single grid cell. Transitions always build a new cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: Value,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub class_name: Option<String>,
    /// Underlying lookup key when `value` is a display label
    /// (comma-joined for multi-select cells).
    #[serde(default)]
    pub combo_key: Option<String>,
}

impl Cell {
    pub fn new(value: Value) -> Cell {
        Cell {
            value,
            ..Cell::default()
        }
    }

    pub fn empty() -> Cell {
        Cell::default()
    }

    pub fn with_read_only(mut self, read_only: bool) -> Cell {
        self.read_only = read_only;
        self
    }

    pub fn with_combo_key(mut self, key: Option<String>) -> Cell {
        self.combo_key = key;
        self
    }

    pub fn with_class_name(mut self, class_name: Option<String>) -> Cell {
        self.class_name = class_name;
        self
    }

    /// Display text.
    pub fn display(&self) -> String {
        self.value.to_text()
    }

    /// Underlying key: `combo_key` when present, the display text otherwise.
    pub fn key(&self) -> String {
        self.combo_key.clone().unwrap_or_else(|| self.value.to_text())
    }

    /// Same cell with a new value, keeping presentation flags.
    pub fn with_value(&self, value: Value, combo_key: Option<String>) -> Cell {
        Cell {
            value,
            combo_key,
            read_only: self.read_only,
            class_name: self.class_name.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::new(Value::from(s))
    }
}
