//! Parser for the push2his per-stock fund-flow day-kline endpoint.
//!
//! Rows arrive oldest-first as comma-joined strings under
//! `{"data": {"klines": ["2025-02-28,...", ...]}}`.

use serde_json::Value;

use crate::errors::Error;
use crate::types::{Cell, Table};

use super::date_cell;

const COLUMNS: &[&str] = &[
    "日期",
    "主力净流入-净额",
    "小单净流入-净额",
    "中单净流入-净额",
    "大单净流入-净额",
    "超大单净流入-净额",
    "主力净流入-净占比",
    "小单净流入-净占比",
    "中单净流入-净占比",
    "大单净流入-净占比",
    "超大单净流入-净占比",
    "收盘价",
    "涨跌幅",
];

fn numeric_field(fields: &[&str], idx: usize) -> Cell {
    match fields.get(idx) {
        None => Cell::Null,
        Some(s) if s.is_empty() || *s == "-" => Cell::Null,
        Some(s) => match s.parse() {
            Ok(d) => Cell::Decimal(d),
            Err(_) => Cell::Text((*s).to_string()),
        },
    }
}

pub(crate) fn fund_flow_daykline(body: &Value) -> Result<Table, Error> {
    let mut table = Table::new(COLUMNS.iter().copied());
    let klines = match body.pointer("/data/klines") {
        None | Some(Value::Null) => return Ok(table),
        Some(Value::Array(lines)) => lines,
        Some(other) => {
            return Err(Error::Payload(format!("klines is not a list: {}", other)))
        }
    };
    for line in klines {
        let Some(line) = line.as_str() else {
            return Err(Error::Payload(format!("kline row is not text: {}", line)));
        };
        let fields: Vec<&str> = line.split(',').collect();
        let mut row = Vec::with_capacity(COLUMNS.len());
        row.push(fields.first().map(|s| date_cell(s)).unwrap_or(Cell::Null));
        for idx in 1..COLUMNS.len() {
            row.push(numeric_field(&fields, idx));
        }
        table.push_row(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn klines_parse_oldest_first() {
        let body = json!({"data": {"klines": [
            "2025-02-27,1.2e8,-3.0e7,-2.0e7,5.0e7,7.0e7,3.1,-0.8,-0.5,1.3,1.8,11.26,0.54",
            "2025-02-28,-9.0e7,4.0e7,1.0e7,-6.0e7,-3.0e7,-2.2,1.0,0.2,-1.5,-0.7,11.10,-1.42"
        ]}});
        let table = fund_flow_daykline(&body).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.cell(0, "日期"),
            Some(&Cell::Date(NaiveDate::from_ymd_opt(2025, 2, 27).unwrap()))
        );
        assert_eq!(
            table.cell(1, "收盘价"),
            Some(&Cell::Decimal("11.10".parse().unwrap()))
        );
    }

    #[test]
    fn short_rows_pad_with_null() {
        let body = json!({"data": {"klines": ["2025-02-28,1.0"]}});
        let table = fund_flow_daykline(&body).unwrap();
        assert_eq!(table.cell(0, "涨跌幅"), Some(&Cell::Null));
    }

    #[test]
    fn missing_data_is_empty() {
        assert!(fund_flow_daykline(&json!({"data": null})).unwrap().is_empty());
        assert!(fund_flow_daykline(&json!({})).unwrap().is_empty());
    }
}
