//! Column-major shot tables
//!
//! A [`Dataset`] is an ordered list of equally long named columns. Each cell is
//! a [`Value`]; a missing cell is [`Value::Missing`], never a sentinel number.
//!
//! ```text
//! Dataset (label: "Baseline")
//! ├─ "Club Speed"  [Number(90.1), Number(91.4), Missing, ...]
//! ├─ "Club Type"   [Text("7i"), Text("7i"), Text("Driver"), ...]
//! └─ "Date_parsed" [Timestamp(..), Timestamp(..), Missing, ...]
//! ```
//!
//! Stages never mutate rows in place: column additions go through
//! [`Dataset::set_column`], and row selection through [`Dataset::take`] or
//! [`Dataset::filter_rows`], which return new datasets.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("column '{name}' has {actual} values, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[display("row {row} has {actual} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("duplicate column '{name}'")]
    DuplicateColumn { name: String },
}

/// A parsed point in time, keeping the UTC offset when the source had one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl Timestamp {
    /// Wall-clock time as recorded, ignoring any offset.
    #[must_use]
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            Self::Zoned(dt) => dt.naive_local(),
            Self::Naive(dt) => *dt,
        }
    }

    /// Formats the recorded wall-clock time with a `strftime` pattern.
    #[must_use]
    pub fn format(&self, pattern: &str) -> String {
        self.naive_local().format(pattern).to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zoned(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%z")),
            Self::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// One cell of a dataset.
///
/// Equality is null-safe: two [`Value::Missing`] cells compare equal, which is
/// what stratified balancing relies on when matching incomplete keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Missing,
    Number(f64),
    Text(String),
    Timestamp(Timestamp),
}

impl Value {
    /// Builds a numeric cell, mapping `NaN` to [`Value::Missing`].
    #[must_use]
    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            Self::Missing
        } else {
            Self::Number(value)
        }
    }

    /// Builds a text cell, mapping the empty string to [`Value::Missing`].
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Missing
        } else {
            Self::Text(value)
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric reading of the cell: numbers as-is, text cells only when the
    /// whole trimmed string is a number.
    #[must_use]
    pub fn to_number_lenient(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
            Self::Missing | Self::Timestamp(_) => None,
        }
    }

    /// Text rendering of the cell, `None` when missing.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Number(v) => Some(v.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Timestamp(ts) => Some(ts.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Timestamp(ts) => write!(f, "{ts}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// A shot table, optionally labelled with the session it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    label: Option<String>,
    len: usize,
    columns: Vec<Column>,
}

/// Read-only view of one row of a [`Dataset`].
#[derive(Debug, Clone, Copy)]
pub struct ShotRecord<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> ShotRecord<'a> {
    /// Cell of `column`, `None` when the dataset has no such column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.dataset
            .column(column)
            .map(|values| &values[self.index])
    }

    /// Lenient numeric reading of `column`; absent columns read as missing.
    #[must_use]
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::to_number_lenient)
    }
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dataset from `(name, values)` pairs.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut dataset = Self::new();
        for (index, (name, values)) in columns.into_iter().enumerate() {
            let name = name.into();
            if dataset.has_column(&name) {
                return Err(DatasetError::DuplicateColumn { name });
            }
            if index > 0 && values.len() != dataset.len {
                return Err(DatasetError::ColumnLength {
                    name,
                    expected: dataset.len,
                    actual: values.len(),
                });
            }
            dataset.len = values.len();
            dataset.columns.push(Column { name, values });
        }
        Ok(dataset)
    }

    /// Builds a dataset from a header and row-major records.
    pub fn from_records<H, S>(headers: H, records: Vec<Vec<Value>>) -> Result<Self, DatasetError>
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers = headers.into_iter().map(Into::into).collect::<Vec<String>>();
        let mut columns = headers
            .iter()
            .map(|_| Vec::with_capacity(records.len()))
            .collect::<Vec<Vec<Value>>>();
        for (row, record) in records.into_iter().enumerate() {
            if record.len() != headers.len() {
                return Err(DatasetError::RowLength {
                    row,
                    expected: headers.len(),
                    actual: record.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(record) {
                column.push(value);
            }
        }
        let row_count = columns.first().map_or(0, Vec::len);
        let mut dataset = Self::from_columns(headers.into_iter().zip(columns))?;
        dataset.len = row_count;
        Ok(dataset)
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Lenient numeric view of a column, `None` when the column is absent.
    #[must_use]
    pub fn numeric(&self, name: &str) -> Option<Vec<Option<f64>>> {
        self.column(name)
            .map(|values| values.iter().map(Value::to_number_lenient).collect())
    }

    /// Schema intersection: the requested columns this dataset actually has,
    /// in request order, without duplicates.
    #[must_use]
    pub fn present_columns<'a, S>(&self, requested: &'a [S]) -> Vec<&'a str>
    where
        S: AsRef<str>,
    {
        let mut present: Vec<&'a str> = Vec::new();
        for name in requested.iter().map(AsRef::as_ref) {
            if self.has_column(name) && !present.contains(&name) {
                present.push(name);
            }
        }
        present
    }

    /// Adds `name`, or replaces its values if it already exists.
    ///
    /// # Panics
    ///
    /// Panics if the dataset already has columns and `values` has a different length.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) {
        if self.columns.is_empty() {
            self.len = values.len();
        }
        assert_eq!(
            values.len(),
            self.len,
            "column '{name}' must have one value per row"
        );
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.values = values,
            None => self.columns.push(Column {
                name: name.to_owned(),
                values,
            }),
        }
    }

    /// Iterates over the rows.
    pub fn rows(&self) -> impl Iterator<Item = ShotRecord<'_>> + '_ {
        (0..self.len).map(move |index| ShotRecord {
            dataset: self,
            index,
        })
    }

    /// New dataset containing the rows at `indices`, in that order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn take(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        Self {
            label: self.label.clone(),
            len: indices.len(),
            columns,
        }
    }

    /// New dataset keeping the rows whose `mask` entry is `true`.
    ///
    /// # Panics
    ///
    /// Panics if `mask` does not have one entry per row.
    #[must_use]
    pub fn filter_rows(&self, mask: &[bool]) -> Self {
        assert_eq!(mask.len(), self.len, "mask must have one entry per row");
        let indices = mask
            .iter()
            .enumerate()
            .filter_map(|(i, keep)| keep.then_some(i))
            .collect::<Vec<_>>();
        self.take(&indices)
    }

    /// Same columns, no rows.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        self.take(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_columns([
            ("Club Speed", vec![Value::Number(90.0), Value::Missing, Value::Number(92.0)]),
            ("Club Type", vec!["7i".into(), "7i".into(), "Driver".into()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_columns_rejects_ragged_input() {
        let err = Dataset::from_columns([
            ("a", vec![Value::Missing]),
            ("b", vec![Value::Missing, Value::Missing]),
        ])
        .unwrap_err();
        assert!(matches!(err, DatasetError::ColumnLength { .. }));

        let err = Dataset::from_columns([("a", vec![]), ("a", vec![])]).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_from_records() {
        let dataset = Dataset::from_records(
            ["x", "y"],
            vec![vec![Value::Number(1.0), "a".into()], vec![Value::Number(2.0), "b".into()]],
        )
        .unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.column("y").unwrap()[1], Value::text("b"));

        let err = Dataset::from_records(["x", "y"], vec![vec![Value::Number(1.0)]]).unwrap_err();
        assert!(matches!(err, DatasetError::RowLength { row: 0, .. }));
    }

    #[test]
    fn test_headers_without_rows() {
        let dataset = Dataset::from_records(["x", "y"], vec![]).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.has_column("y"));
    }

    #[test]
    fn test_present_columns_intersects_in_request_order() {
        let dataset = sample();
        let present =
            dataset.present_columns(&["Club Type", "Spin Rate", "Club Speed", "Club Type"]);
        assert_eq!(present, vec!["Club Type", "Club Speed"]);
    }

    #[test]
    fn test_take_and_filter_keep_label_and_schema() {
        let dataset = sample().with_label("Baseline");
        let taken = dataset.take(&[2, 0]);
        assert_eq!(taken.len(), 2);
        assert_eq!(taken.label(), Some("Baseline"));
        assert_eq!(taken.column("Club Speed").unwrap()[0], Value::Number(92.0));

        let filtered = dataset.filter_rows(&[false, true, false]);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.column("Club Speed").unwrap()[0].is_missing());

        let empty = dataset.empty_like();
        assert!(empty.is_empty());
        assert_eq!(empty.column_names().count(), 2);
    }

    #[test]
    fn test_missing_values_compare_equal() {
        assert_eq!(Value::Missing, Value::Missing);
        assert_eq!(Value::number(f64::NAN), Value::Missing);
        assert_eq!(Value::text(""), Value::Missing);
    }

    #[test]
    fn test_lenient_numbers() {
        assert_eq!(Value::text(" 1.5 ").to_number_lenient(), Some(1.5));
        assert_eq!(Value::text("1.5 mph").to_number_lenient(), None);
        assert_eq!(Value::Missing.to_number_lenient(), None);
    }

    #[test]
    fn test_shot_record_access() {
        let dataset = sample();
        let row = dataset.rows().nth(2).unwrap();
        assert_eq!(row.number("Club Speed"), Some(92.0));
        assert_eq!(row.get("Club Type"), Some(&Value::text("Driver")));
        assert_eq!(row.get("Spin Rate"), None);
    }
}
