//! Payload parsers: one module per provider payload family, all flattening
//! into [`crate::types::Table`].
//!
//! Providers change field sets between releases and mark missing values with
//! `"-"` or empty strings, so every coercion here degrades instead of
//! failing: an unparseable number stays text, an unexpected fragment stays
//! raw JSON, and only a payload whose overall shape is unrecognizable is an
//! error.

pub(crate) mod clist;
pub(crate) mod cls;
pub(crate) mod fflow;
pub(crate) mod pool;
pub(crate) mod sina;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::types::Cell;

/// Missing-value markers the providers use interchangeably.
pub(crate) fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || s == "-",
        _ => false,
    }
}

/// Stock/board codes arrive as strings or as bare integers that lost their
/// leading zeros; `1` must come back as `000001`.
pub(crate) fn code_cell(value: Option<&Value>) -> Cell {
    match value {
        Some(v) if is_missing(v) => Cell::Null,
        Some(Value::String(s)) => Cell::Text(s.clone()),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Cell::Text(format!("{:06}", i)),
            None => Cell::Raw(Value::Number(n.clone())),
        },
        Some(v) => Cell::Raw(v.clone()),
        None => Cell::Null,
    }
}

pub(crate) fn text_cell(value: Option<&Value>) -> Cell {
    match value {
        Some(v) if is_missing(v) => Cell::Null,
        Some(Value::String(s)) => Cell::Text(s.clone()),
        Some(v) => Cell::from_scalar(v),
        None => Cell::Null,
    }
}

/// Prices, percentages and money amounts: fixed-point where the text form
/// parses cleanly, floating-point otherwise.
pub(crate) fn decimal_cell(value: Option<&Value>) -> Cell {
    match value {
        Some(v) if is_missing(v) => Cell::Null,
        Some(Value::Number(n)) => match n.to_string().parse::<Decimal>() {
            Ok(d) => Cell::Decimal(d),
            Err(_) => Cell::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Some(Value::String(s)) => match s.parse::<Decimal>() {
            Ok(d) => Cell::Decimal(d),
            Err(_) => Cell::Text(s.clone()),
        },
        Some(v) => Cell::from_scalar(v),
        None => Cell::Null,
    }
}

pub(crate) fn int_cell(value: Option<&Value>) -> Cell {
    match value {
        Some(v) if is_missing(v) => Cell::Null,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => Cell::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Some(Value::String(s)) => match s.parse::<i64>() {
            Ok(i) => Cell::Int(i),
            Err(_) => Cell::Text(s.clone()),
        },
        Some(v) => Cell::from_scalar(v),
        None => Cell::Null,
    }
}

/// Thousandth-scaled integer prices from the pool endpoints: `11260` → 11.26.
pub(crate) fn scaled_price_cell(value: Option<&Value>) -> Cell {
    match value {
        Some(v) if is_missing(v) => Cell::Null,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Cell::Decimal(Decimal::new(i, 3)),
            None => Cell::Float(n.as_f64().map(|f| f / 1000.0).unwrap_or(f64::NAN)),
        },
        Some(v) => Cell::from_scalar(v),
        None => Cell::Null,
    }
}

/// Intraday wall-clock times encoded as `HHMMSS` integers: `93001` → 09:30:01.
pub(crate) fn hhmmss_cell(value: Option<&Value>) -> Cell {
    let digits = match value {
        Some(v) if is_missing(v) => return Cell::Null,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) if (0..=235959).contains(&i) => format!("{:06}", i),
            _ => return Cell::from_scalar(value.unwrap_or(&Value::Null)),
        },
        Some(Value::String(s)) => s.clone(),
        Some(v) => return Cell::from_scalar(v),
        None => return Cell::Null,
    };
    match NaiveTime::parse_from_str(&digits, "%H%M%S") {
        Ok(t) => Cell::Time(t),
        Err(_) => Cell::Text(digits),
    }
}

/// `YYYY-MM-DD` date strings; anything else stays text.
pub(crate) fn date_cell(s: &str) -> Cell {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) => Cell::Date(d),
        Err(_) => Cell::Text(s.to_string()),
    }
}

/// `YYYY-MM-DD HH:MM:SS` timestamps; anything else stays text.
pub(crate) fn datetime_cell(s: &str) -> Cell {
    match NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        Ok(dt) => Cell::DateTime(dt),
        Err(_) => Cell::Text(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_markers_become_null() {
        assert_eq!(decimal_cell(Some(&json!("-"))), Cell::Null);
        assert_eq!(int_cell(Some(&json!(""))), Cell::Null);
        assert_eq!(text_cell(Some(&Value::Null)), Cell::Null);
        assert_eq!(decimal_cell(None), Cell::Null);
    }

    #[test]
    fn codes_regain_leading_zeros() {
        assert_eq!(code_cell(Some(&json!(1))), Cell::Text("000001".into()));
        assert_eq!(code_cell(Some(&json!("600519"))), Cell::Text("600519".into()));
    }

    #[test]
    fn decimals_keep_text_precision() {
        assert_eq!(
            decimal_cell(Some(&json!(11.26))),
            Cell::Decimal("11.26".parse().unwrap())
        );
        assert_eq!(
            decimal_cell(Some(&json!("3.1415"))),
            Cell::Decimal("3.1415".parse().unwrap())
        );
    }

    #[test]
    fn scaled_prices_divide_by_a_thousand() {
        assert_eq!(
            scaled_price_cell(Some(&json!(11260))),
            Cell::Decimal("11.260".parse().unwrap())
        );
    }

    #[test]
    fn seal_times_parse_as_time_of_day() {
        assert_eq!(
            hhmmss_cell(Some(&json!(93001))),
            Cell::Time(NaiveTime::from_hms_opt(9, 30, 1).unwrap())
        );
        assert_eq!(hhmmss_cell(Some(&json!("-"))), Cell::Null);
    }

    #[test]
    fn unparseable_values_degrade_not_fail() {
        assert_eq!(int_cell(Some(&json!("n/a"))), Cell::Text("n/a".into()));
        assert!(matches!(text_cell(Some(&json!({"k": 1}))), Cell::Raw(_)));
        assert_eq!(date_cell("not-a-date"), Cell::Text("not-a-date".into()));
    }
}
