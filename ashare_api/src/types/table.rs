//! Tabular result model shared by every upstream fetch.
//!
//! Providers answer with wildly different payload shapes (field-coded object
//! lists, comma-joined kline strings, quote text in a JS variable). The
//! parsers in this crate flatten all of them into a [`Table`]: named columns
//! over rows of runtime-typed [`Cell`]s. Column types are whatever the
//! provider happened to send that day, so a "numeric" column can still carry
//! a missing-value marker in some rows.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rust_decimal::Decimal;

/// One scalar value inside a [`Table`] row.
///
/// `Raw` holds payload fragments that fit no scalar kind: nested arrays or
/// objects, or anything a future provider release starts sending. Consumers
/// are expected to degrade it to a string rather than fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Duration(TimeDelta),
    Raw(serde_json::Value),
}

impl Cell {
    /// Converts a plain JSON scalar into the matching cell kind. Arrays and
    /// objects land in `Raw`; integral numbers prefer `Int` over `Float`.
    pub fn from_scalar(value: &serde_json::Value) -> Cell {
        match value {
            serde_json::Value::Null => Cell::Null,
            serde_json::Value::Bool(b) => Cell::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Cell::Int(i)
                } else {
                    Cell::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Raw(other.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// The text content, for filtering on code/name columns.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Ordered rows of named, heterogeneously-typed cells returned by one
/// upstream fetch. Built fresh per call and discarded after serving.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Parsers must supply exactly one cell per column.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Looks up one cell by row index and column name. Mostly for tests.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Keeps only the rows whose cell in `column` satisfies the predicate.
    /// Row order is preserved. A table without that column is left untouched
    /// and `false` is returned so callers can decide what that means.
    pub fn retain_rows<F>(&mut self, column: &str, keep: F) -> bool
    where
        F: Fn(&Cell) -> bool,
    {
        let Some(idx) = self.column_index(column) else {
            return false;
        };
        self.rows.retain(|row| keep(&row[idx]));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(["代码", "最新价"]);
        t.push_row(vec![Cell::Text("600519".into()), Cell::Int(1500)]);
        t.push_row(vec![Cell::Text("000001".into()), Cell::Null]);
        t
    }

    #[test]
    fn from_scalar_maps_json_kinds() {
        assert_eq!(Cell::from_scalar(&serde_json::json!(null)), Cell::Null);
        assert_eq!(Cell::from_scalar(&serde_json::json!(true)), Cell::Bool(true));
        assert_eq!(Cell::from_scalar(&serde_json::json!(42)), Cell::Int(42));
        assert_eq!(Cell::from_scalar(&serde_json::json!(1.5)), Cell::Float(1.5));
        assert_eq!(
            Cell::from_scalar(&serde_json::json!("平安银行")),
            Cell::Text("平安银行".into())
        );
        assert!(matches!(
            Cell::from_scalar(&serde_json::json!([1, 2])),
            Cell::Raw(_)
        ));
    }

    #[test]
    fn retain_rows_filters_by_column() {
        let mut t = sample();
        let found = t.retain_rows("代码", |c| c.as_text() == Some("600519"));
        assert!(found);
        assert_eq!(t.len(), 1);
        assert_eq!(t.cell(0, "代码"), Some(&Cell::Text("600519".into())));
    }

    #[test]
    fn retain_rows_reports_missing_column() {
        let mut t = sample();
        assert!(!t.retain_rows("不存在", |_| false));
        assert_eq!(t.len(), 2);
    }
}
