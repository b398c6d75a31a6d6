//! The value normalizer: flattens upstream tables into JSON-safe records.
//!
//! Upstream cell types are resolved at runtime and vary release-to-release,
//! so normalization is total: every cell maps to exactly one JSON primitive
//! and nothing here can fail. A crash on unexpected cell content would turn
//! a data-quality hiccup into a full request failure, so unknown shapes
//! degrade to their string rendering instead.

use ashare_api::types::{Cell, Table};
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

/// One normalized row: column name → JSON primitive, in table column order.
pub type Record = serde_json::Map<String, Value>;

/// Which rows of a table to keep. The direction is caller policy: a route
/// serving a time series that arrives oldest-first wants `Last(n)` for
/// "most recent n", while a newest-first feed wants `First(n)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slice {
    All,
    First(usize),
    Last(usize),
}

/// Maps one cell to exactly one JSON primitive. Never fails.
///
/// Fixed-point decimals are emitted as floating-point numbers; the loss of
/// arbitrary precision is an accepted approximation. Non-finite floats have
/// no JSON representation and become null.
pub fn normalize_cell(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Bool(b) => Value::Bool(*b),
        Cell::Int(i) => Value::from(*i),
        Cell::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Decimal(d) => match d.to_f64().and_then(serde_json::Number::from_f64) {
            Some(n) => Value::Number(n),
            None => Value::String(d.to_string()),
        },
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        Cell::Time(t) => Value::String(t.format("%H:%M:%S").to_string()),
        Cell::DateTime(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        Cell::Duration(d) => Value::String(d.to_string()),
        // Raw fragments: extract a boxed scalar if there is one, otherwise
        // fall back to the compact JSON string rendering.
        Cell::Raw(v) => match v {
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                normalize_cell(&Cell::from_scalar(v))
            }
            other => Value::String(other.to_string()),
        },
    }
}

/// Normalizes a whole table into records, keeping the rows selected by
/// `slice`. An absent or empty table is an empty sequence, never an error.
/// Row and column order are preserved.
pub fn normalize_table(table: Option<&Table>, slice: Slice) -> Vec<Record> {
    let Some(table) = table else {
        return Vec::new();
    };
    let rows = table.rows();
    let rows = match slice {
        Slice::All => rows,
        Slice::First(n) => &rows[..rows.len().min(n)],
        Slice::Last(n) => &rows[rows.len().saturating_sub(n)..],
    };
    rows.iter()
        .map(|row| {
            table
                .columns()
                .iter()
                .zip(row)
                .map(|(column, cell)| (column.clone(), normalize_cell(cell)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeDelta};
    use serde_json::json;

    fn sample_table(rows: usize) -> Table {
        let mut t = Table::new(["序号", "代码"]);
        for i in 0..rows {
            t.push_row(vec![Cell::Int(i as i64), Cell::Text(format!("{:06}", i))]);
        }
        t
    }

    #[test]
    fn every_cell_kind_maps_to_a_json_primitive() {
        let dt = NaiveDate::from_ymd_opt(2025, 2, 28)
            .unwrap()
            .and_hms_opt(14, 55, 0)
            .unwrap();
        let cases = vec![
            (Cell::Null, json!(null)),
            (Cell::Bool(true), json!(true)),
            (Cell::Int(-3), json!(-3)),
            (Cell::Float(2.5), json!(2.5)),
            (Cell::Decimal("11.26".parse().unwrap()), json!(11.26)),
            (Cell::Text("贵州茅台".into()), json!("贵州茅台")),
            (
                Cell::Date(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()),
                json!("2025-02-28"),
            ),
            (
                Cell::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap()),
                json!("09:30:00"),
            ),
            (Cell::DateTime(dt), json!("2025-02-28T14:55:00")),
        ];
        for (cell, expected) in cases {
            assert_eq!(normalize_cell(&cell), expected, "cell {:?}", cell);
        }
    }

    #[test]
    fn durations_render_as_strings() {
        let v = normalize_cell(&Cell::Duration(TimeDelta::seconds(90)));
        assert!(v.is_string());
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(normalize_cell(&Cell::Float(f64::NAN)), json!(null));
        assert_eq!(normalize_cell(&Cell::Float(f64::INFINITY)), json!(null));
    }

    #[test]
    fn raw_scalars_are_extracted() {
        assert_eq!(normalize_cell(&Cell::Raw(json!(42))), json!(42));
        assert_eq!(normalize_cell(&Cell::Raw(json!("text"))), json!("text"));
        assert_eq!(normalize_cell(&Cell::Raw(json!(null))), json!(null));
    }

    #[test]
    fn raw_compounds_fall_back_to_strings() {
        let v = normalize_cell(&Cell::Raw(json!({"days": 3, "ct": 2})));
        assert_eq!(v, json!(r#"{"days":3,"ct":2}"#));
        let v = normalize_cell(&Cell::Raw(json!([1, 2])));
        assert_eq!(v, json!("[1,2]"));
    }

    #[test]
    fn absent_and_empty_tables_normalize_to_empty() {
        assert!(normalize_table(None, Slice::All).is_empty());
        let empty = Table::new(["a"]);
        assert!(normalize_table(Some(&empty), Slice::All).is_empty());
        assert!(normalize_table(Some(&empty), Slice::Last(60)).is_empty());
    }

    #[test]
    fn first_slice_keeps_the_head_in_order() {
        let t = sample_table(5);
        let records = normalize_table(Some(&t), Slice::First(3));
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["序号"], json!(0));
        assert_eq!(records[2]["序号"], json!(2));

        // A limit past the end keeps everything.
        assert_eq!(normalize_table(Some(&t), Slice::First(99)).len(), 5);
    }

    #[test]
    fn last_slice_keeps_the_tail_in_order() {
        let t = sample_table(5);
        let records = normalize_table(Some(&t), Slice::Last(2));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["序号"], json!(3));
        assert_eq!(records[1]["序号"], json!(4));

        assert_eq!(normalize_table(Some(&t), Slice::Last(99)).len(), 5);
    }

    #[test]
    fn column_order_is_preserved() {
        let mut t = Table::new(["乙", "甲", "丙"]);
        t.push_row(vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)]);
        let records = normalize_table(Some(&t), Slice::All);
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, ["乙", "甲", "丙"]);
    }

    #[test]
    fn normalized_records_round_trip_through_json() {
        let mut t = Table::new(["代码", "最新价", "涨停统计", "首次封板时间"]);
        t.push_row(vec![
            Cell::Text("600519".into()),
            Cell::Decimal("1812.34".parse().unwrap()),
            Cell::Raw(json!({"days": 3, "ct": 2})),
            Cell::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap()),
        ]);
        let records = normalize_table(Some(&t), Slice::All);
        let encoded = serde_json::to_string(&records).unwrap();
        let decoded: Vec<Record> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, records);
    }
}
