//! Display formatting for numeric and date columns.
//!
//! Column metadata carries a format string. Numeric formats use the familiar
//! spreadsheet pattern syntax (`#,##0.00`, `0.0%`, `$#,##0`); date formats accept
//! either strftime (`%Y-%m-%d`) or the `yyyy-MM-dd` token style. Anything that
//! cannot be parsed or formatted falls back to the raw text.

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

use super::Dynamic;

/// Parsed numeric display pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberFormat {
    pub prefix: String,
    pub suffix: String,
    pub grouping: bool,
    pub decimals: usize,
    pub percent: bool,
}

const MAX_DECIMALS: usize = 12;

fn number_pattern_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<prefix>[^#0,.]*)(?<int>[#0,]*0|[#0,]*#)(?:\.(?<frac>[0#]+))?(?<suffix>[^#0,.]*)$")
            .expect("number pattern regex must compile")
    })
}

impl NumberFormat {
    /// Parse a pattern such as `#,##0.00`. Returns None for unsupported patterns.
    pub fn parse(pattern: &str) -> Option<NumberFormat> {
        let caps = number_pattern_re().captures(pattern.trim())?;
        let decimals = caps.name("frac").map(|m| m.as_str().len()).unwrap_or(0);
        if decimals > MAX_DECIMALS {
            return None;
        }
        let suffix = caps["suffix"].to_string();
        Some(NumberFormat {
            prefix: caps["prefix"].to_string(),
            percent: suffix.contains('%'),
            suffix,
            grouping: caps["int"].contains(','),
            decimals,
        })
    }

    pub fn apply(&self, n: f64) -> String {
        let n = if self.percent { n * 100.0 } else { n };
        let fixed = format!("{:.*}", self.decimals, n.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (fixed.clone(), None),
        };
        let int_part = if self.grouping {
            group_thousands(&int_part)
        } else {
            int_part
        };
        // -0.00 should not show a sign
        let negative = n < 0.0 && fixed.bytes().any(|b| (b'1'..=b'9').contains(&b));
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&self.prefix);
        out.push_str(&int_part);
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(&frac);
        }
        out.push_str(&self.suffix);
        out
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parse user or backend text as a number, tolerating thousands separators.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    let n = cleaned.strip_prefix('+').unwrap_or(&cleaned).parse::<f64>().ok()?;
    n.is_finite().then_some(n)
}

/// Format `raw` with a numeric pattern, or return it unchanged.
pub fn format_number_with(raw: &str, pattern: &str) -> String {
    match (parse_number(raw), NumberFormat::parse(pattern)) {
        (Some(n), Some(format)) => format.apply(n),
        _ => raw.to_string(),
    }
}

/// Default rendering for computed numbers.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        let s = format!("{:.6}", n);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

const DATETIME_INPUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y%m%d%H%M%S",
];

const DATE_INPUTS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Parse backend date text in any of the accepted layouts.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    for layout in DATETIME_INPUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Some(dt);
        }
    }
    for layout in DATE_INPUTS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, layout) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn date_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"yyyy|YYYY|yy|YY|MM|dd|DD|HH|hh|mm|ss")
            .expect("date token regex must compile")
    })
}

/// Translate `yyyy-MM-dd` style patterns to strftime. strftime patterns pass through.
pub fn to_strftime(pattern: &str) -> String {
    if pattern.contains('%') {
        return pattern.to_string();
    }
    date_token_re()
        .replace_all(pattern, |caps: &regex::Captures| {
            match &caps[0] {
                "yyyy" | "YYYY" => "%Y",
                "yy" | "YY" => "%y",
                "MM" => "%m",
                "dd" | "DD" => "%d",
                "HH" | "hh" => "%H",
                "mm" => "%M",
                "ss" => "%S",
                other => other,
            }
            .to_string()
        })
        .to_string()
}

/// Format `raw` as a date using `pattern`, or return it unchanged.
pub fn format_date_with(raw: &str, pattern: &str) -> String {
    let Some(dt) = parse_date(raw) else {
        return raw.to_string();
    };
    let strftime = to_strftime(pattern);
    if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
        return raw.to_string();
    }
    dt.format(&strftime).to_string()
}

/// Format a Dynamic value for display.
pub fn format_dynamic(value: &Dynamic) -> String {
    if value.is_unit() {
        String::new()
    } else if let Ok(n) = value.as_float() {
        format_number(n)
    } else if let Ok(n) = value.as_int() {
        n.to_string()
    } else if let Ok(b) = value.as_bool() {
        b.to_string()
    } else if let Ok(s) = value.clone().into_string() {
        s
    } else {
        value.to_string()
    }
}
