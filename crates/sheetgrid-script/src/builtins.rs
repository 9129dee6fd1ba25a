//! Built-in functions available to display transforms and custom aggregates.
//!
//! Conventions:
//! - Built-in names are ALL CAPS (e.g. `SUM`, `FIXED`).
//! - Aggregates accept an array whose elements may be numbers or numeric text;
//!   anything else is skipped.
//! - If you add a new built-in, add it to `BUILTINS` and register it in
//!   `register_builtins`.

use rhai::{Array, Dynamic, Engine, EvalAltResult, Position};

use crate::engine::{format_date_with, format_number_with, parse_number};

pub struct Builtin {
    pub name: &'static str,
    #[allow(dead_code)]
    pub description: &'static str,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        description: "Sum of the numeric elements of an array",
    },
    Builtin {
        name: "AVG",
        description: "Average of the numeric elements of an array",
    },
    Builtin {
        name: "MIN",
        description: "Smallest numeric element of an array",
    },
    Builtin {
        name: "MAX",
        description: "Largest numeric element of an array",
    },
    Builtin {
        name: "COUNT",
        description: "Number of non-empty elements of an array",
    },
    Builtin {
        name: "NUMBER",
        description: "Parse text as a number, or () when it is not numeric",
    },
    Builtin {
        name: "FIXED",
        description: "Render a number with a fixed count of decimals",
    },
    Builtin {
        name: "FORMAT_NUMBER",
        description: "Render a number with a pattern such as #,##0.00",
    },
    Builtin {
        name: "FORMAT_DATE",
        description: "Render a date with a pattern such as yyyy-MM-dd",
    },
];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.iter().any(|b| b.name == name)
}

fn invalid_arg(message: &str) -> Box<EvalAltResult> {
    EvalAltResult::ErrorRuntime(message.into(), Position::NONE).into()
}

fn to_decimal_places(value: i64) -> Result<usize, Box<EvalAltResult>> {
    const MAX_DECIMALS: usize = 12;
    let places =
        usize::try_from(value).map_err(|_| invalid_arg("decimals must be >= 0"))?;
    if places > MAX_DECIMALS {
        return Err(invalid_arg(&format!(
            "decimals must be <= {}",
            MAX_DECIMALS
        )));
    }
    Ok(places)
}

fn fixed_decimal_string(n: f64, decimals: usize) -> String {
    if n.is_nan() {
        return "#NAN!".to_string();
    }
    if n.is_infinite() {
        return "#INF!".to_string();
    }
    format!("{:.*}", decimals, n)
}

fn dynamic_number(value: &Dynamic) -> Option<f64> {
    if let Ok(n) = value.as_float() {
        return Some(n);
    }
    if let Ok(n) = value.as_int() {
        return Some(n as f64);
    }
    value
        .clone()
        .into_string()
        .ok()
        .and_then(|s| parse_number(&s))
}

fn array_numbers(values: &Array) -> Vec<f64> {
    values.iter().filter_map(dynamic_number).collect()
}

pub fn register_builtins(engine: &mut Engine) {
    engine.register_fn("SUM", |values: Array| -> f64 {
        array_numbers(&values).iter().sum()
    });

    engine.register_fn("AVG", |values: Array| -> Dynamic {
        let numbers = array_numbers(&values);
        if numbers.is_empty() {
            return Dynamic::UNIT;
        }
        Dynamic::from(numbers.iter().sum::<f64>() / numbers.len() as f64)
    });

    engine.register_fn("MIN", |values: Array| -> Dynamic {
        array_numbers(&values)
            .into_iter()
            .reduce(f64::min)
            .map(Dynamic::from)
            .unwrap_or(Dynamic::UNIT)
    });

    engine.register_fn("MAX", |values: Array| -> Dynamic {
        array_numbers(&values)
            .into_iter()
            .reduce(f64::max)
            .map(Dynamic::from)
            .unwrap_or(Dynamic::UNIT)
    });

    engine.register_fn("COUNT", |values: Array| -> i64 {
        values
            .iter()
            .filter(|&v| {
                if v.is_unit() {
                    return false;
                }
                match v.clone().into_string() {
                    Ok(s) => !s.trim().is_empty(),
                    Err(_) => true,
                }
            })
            .count() as i64
    });

    engine.register_fn("NUMBER", |text: &str| -> Dynamic {
        parse_number(text).map(Dynamic::from).unwrap_or(Dynamic::UNIT)
    });

    engine.register_fn(
        "FIXED",
        |n: f64, decimals: i64| -> Result<String, Box<EvalAltResult>> {
            Ok(fixed_decimal_string(n, to_decimal_places(decimals)?))
        },
    );
    engine.register_fn(
        "FIXED",
        |n: i64, decimals: i64| -> Result<String, Box<EvalAltResult>> {
            Ok(fixed_decimal_string(n as f64, to_decimal_places(decimals)?))
        },
    );

    engine.register_fn("FORMAT_NUMBER", |value: &str, pattern: &str| -> String {
        format_number_with(value, pattern)
    });
    engine.register_fn("FORMAT_NUMBER", |value: f64, pattern: &str| -> String {
        format_number_with(&value.to_string(), pattern)
    });
    engine.register_fn("FORMAT_NUMBER", |value: i64, pattern: &str| -> String {
        format_number_with(&value.to_string(), pattern)
    });

    engine.register_fn("FORMAT_DATE", |value: &str, pattern: &str| -> String {
        format_date_with(value, pattern)
    });
}
