//! Raw export cleaning
//!
//! [`preprocess`] turns a raw launch-monitor export into a session dataset:
//!
//! 1. Drop a leading `[unit]` row if the export has one
//! 2. Coerce every numeric-candidate column to numbers, stripping unit tokens
//! 3. Derive `|Carry Dev|` and `|Total Dev|`
//! 4. Parse `Date` into `Date_parsed`
//! 5. Tag every row with the session label
//!
//! Cleaning never fails. A value that cannot be read becomes
//! [`Value::Missing`]; the row itself is kept.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::{
    catalogue::{MetricCatalogue, columns},
    dataset::{Dataset, Timestamp, Value},
};

const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M:%S%:z"];
const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];
const FALLBACK_DATE_FORMATS: &[&str] =
    &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y"];

static UNITS_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[.*\]\s*$").expect("units cell pattern is valid"));

/// Cleans a raw export and labels it as session `session_label`.
#[must_use]
pub fn preprocess(raw: &Dataset, session_label: &str, catalogue: &MetricCatalogue) -> Dataset {
    let mut dataset = drop_units_row_if_present(raw, catalogue).with_label(session_label);

    let unit_pattern = unit_pattern(&catalogue.unit_tokens);
    for name in dataset.present_columns(&catalogue.numeric_candidates) {
        let Some(values) = dataset.column(name) else {
            continue;
        };
        let coerced = coerce_numeric(values, unit_pattern.as_ref());
        dataset.set_column(name, coerced);
    }

    for (source, derived) in [
        (columns::CARRY_DEVIATION_DISTANCE, columns::ABS_CARRY_DEV),
        (columns::TOTAL_DEVIATION_DISTANCE, columns::ABS_TOTAL_DEV),
    ] {
        if let Some(values) = dataset.column(source) {
            let absolute = values
                .iter()
                .map(|v| v.as_number().map_or(Value::Missing, |x| Value::number(x.abs())))
                .collect();
            dataset.set_column(derived, absolute);
        }
    }

    if let Some(values) = dataset.column(columns::DATE) {
        let parsed = parse_dates(values);
        dataset.set_column(columns::DATE_PARSED, parsed);
    }

    let session = vec![Value::text(session_label); dataset.len()];
    dataset.set_column(columns::SESSION, session);

    log::debug!(
        "preprocessed session '{session_label}': {} of {} rows kept",
        dataset.len(),
        raw.len()
    );
    dataset
}

/// Drops the first row when it is a `[unit]` header row.
///
/// Every numeric-candidate column is inspected; a single bracketed cell is
/// enough.
#[must_use]
pub fn drop_units_row_if_present(raw: &Dataset, catalogue: &MetricCatalogue) -> Dataset {
    let Some(first) = raw.rows().next() else {
        return raw.clone();
    };
    let is_units_row = raw
        .column_names()
        .filter(|name| catalogue.is_numeric_candidate(name))
        .filter_map(|name| first.get(name))
        .filter_map(Value::render)
        .any(|cell| UNITS_CELL.is_match(&cell));
    if is_units_row {
        log::debug!("dropping units header row");
        let rest = (1..raw.len()).collect::<Vec<_>>();
        raw.take(&rest)
    } else {
        raw.clone()
    }
}

/// Case-insensitive alternation of the unit tokens, longest first so that
/// `degrees` is removed whole rather than leaving `rees` behind `deg`.
fn unit_pattern(tokens: &[String]) -> Option<Regex> {
    let mut tokens = tokens
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>();
    if tokens.is_empty() {
        return None;
    }
    tokens.sort_by_key(|t| std::cmp::Reverse(t.len()));
    let pattern = format!("(?i){}", tokens.join("|"));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            log::warn!("unit tokens do not form a valid pattern, skipping unit stripping: {err}");
            None
        }
    }
}

/// Coerces a column to numbers.
///
/// Columns that are already numeric pass through unchanged. Otherwise each cell
/// is rendered to text, unit tokens are removed, and every character other than
/// digits, sign, exponent and decimal point is dropped before parsing.
fn coerce_numeric(values: &[Value], unit_pattern: Option<&Regex>) -> Vec<Value> {
    if values.iter().all(|v| v.is_number() || v.is_missing()) {
        return values.to_vec();
    }
    values
        .iter()
        .map(|value| {
            value
                .render()
                .and_then(|text| parse_number(&text, unit_pattern))
                .map_or(Value::Missing, Value::number)
        })
        .collect()
}

fn parse_number(text: &str, unit_pattern: Option<&Regex>) -> Option<f64> {
    let stripped = match unit_pattern {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_owned(),
    };
    let numeric = stripped
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .collect::<String>();
    numeric.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parses a timestamp column.
///
/// The offset-aware `YYYY-MM-DD HH:MM:SS±zzzz` format is tried for the whole
/// column first, then the naive `YYYY-MM-DD HH:MM:SS` format; the first one that
/// reads at least one value wins. If neither does, each value goes through the
/// permissive fallback parser.
#[must_use]
pub fn parse_dates(values: &[Value]) -> Vec<Value> {
    let texts = values.iter().map(Value::render).collect::<Vec<_>>();
    let parse_with = |strategy: fn(&str) -> Option<Timestamp>| {
        values
            .iter()
            .zip(&texts)
            .map(|(value, text)| match value {
                Value::Timestamp(ts) => Some(*ts),
                _ => text.as_deref().and_then(|t| strategy(t.trim())),
            })
            .collect::<Vec<_>>()
    };

    let strict: [fn(&str) -> Option<Timestamp>; 2] = [parse_zoned, parse_naive];
    let parsed = strict
        .into_iter()
        .map(&parse_with)
        .find(|parsed| parsed.iter().any(Option::is_some))
        .unwrap_or_else(|| parse_with(parse_permissive));
    parsed
        .into_iter()
        .map(|ts| ts.map_or(Value::Missing, Value::Timestamp))
        .collect()
}

fn parse_zoned(text: &str) -> Option<Timestamp> {
    ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        .map(Timestamp::Zoned)
}

fn parse_naive(text: &str) -> Option<Timestamp> {
    NaiveDateTime::parse_from_str(text, NAIVE_FORMAT)
        .ok()
        .map(Timestamp::Naive)
}

fn parse_permissive(text: &str) -> Option<Timestamp> {
    if let Some(ts) = parse_zoned(text) {
        return Some(ts);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Timestamp::Zoned(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(Timestamp::Zoned(dt));
    }
    if let Some(ts) = parse_naive(text) {
        return Some(ts);
    }
    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(Timestamp::Naive)
}
