//! Footer aggregates over a column's visible values.
//!
//! The fixed aggregates skip anything that is not a number (or, for MIN/MAX,
//! a date) instead of failing the whole footer. `Custom` hands the values to a
//! sandboxed expression.

use serde::Deserialize;

use super::eval::ScriptEngine;
use super::format::{format_number, parse_date, parse_number};
use crate::error::Result;

/// Aggregate shown in a column footer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Sum,
    Avg,
    Min,
    Max,
    Count,
    /// Rhai expression evaluated with `values` (strings) and `numbers` (floats) in scope.
    Custom(String),
}

impl Aggregate {
    pub fn label(&self) -> &str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Avg => "AVG",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
            Aggregate::Count => "COUNT",
            Aggregate::Custom(_) => "CUSTOM",
        }
    }
}

fn numbers_of(values: &[String]) -> Vec<f64> {
    values.iter().filter_map(|v| parse_number(v)).collect()
}

/// Pick the extreme value, preferring numbers and falling back to dates.
/// Date extremes are returned in their original text.
fn extreme(values: &[String], want_max: bool) -> Option<String> {
    let numbers = numbers_of(values);
    if !numbers.is_empty() {
        let folded = numbers.into_iter().reduce(|a, b| {
            if want_max { a.max(b) } else { a.min(b) }
        })?;
        return Some(format_number(folded));
    }

    let mut best: Option<(chrono::NaiveDateTime, &String)> = None;
    for text in values {
        let Some(dt) = parse_date(text) else {
            continue;
        };
        let replace = match &best {
            None => true,
            Some((current, _)) => {
                if want_max {
                    dt > *current
                } else {
                    dt < *current
                }
            }
        };
        if replace {
            best = Some((dt, text));
        }
    }
    best.map(|(_, text)| text.clone())
}

/// Compute an aggregate. Returns `Ok(None)` when there is nothing to aggregate.
pub fn aggregate(engine: &ScriptEngine, kind: &Aggregate, values: &[String]) -> Result<Option<String>> {
    let result = match kind {
        Aggregate::Sum => {
            let numbers = numbers_of(values);
            (!numbers.is_empty()).then(|| format_number(numbers.iter().sum()))
        }
        Aggregate::Avg => {
            let numbers = numbers_of(values);
            (!numbers.is_empty())
                .then(|| format_number(numbers.iter().sum::<f64>() / numbers.len() as f64))
        }
        Aggregate::Min => extreme(values, false),
        Aggregate::Max => extreme(values, true),
        Aggregate::Count => Some(
            values
                .iter()
                .filter(|v| !v.trim().is_empty())
                .count()
                .to_string(),
        ),
        Aggregate::Custom(expr) => Some(engine.eval_aggregate(expr, values)?),
    };
    Ok(result)
}
