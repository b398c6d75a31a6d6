//! Parsers for the news feeds: the CLS telegraph roll and the EastMoney
//! fast-news list used as its secondary source.

use chrono::{DateTime, TimeDelta};
use serde_json::Value;

use crate::errors::Error;
use crate::types::{Cell, Table};

use super::{datetime_cell, text_cell};

/// Splits a unix-seconds publication time into date and time-of-day cells.
/// Both feeds publish Beijing wall-clock times (UTC+8).
fn published_cells(value: Option<&Value>) -> (Cell, Cell) {
    let Some(secs) = value.and_then(Value::as_i64) else {
        return (Cell::Null, Cell::Null);
    };
    match DateTime::from_timestamp(secs, 0) {
        Some(utc) => {
            let local = (utc + TimeDelta::hours(8)).naive_utc();
            (Cell::Date(local.date()), Cell::Time(local.time()))
        }
        None => (Cell::Null, Cell::Null),
    }
}

/// CLS telegraph roll: `{"data": {"roll_data": [{title, content, ctime}]}}`,
/// newest entry first.
pub(crate) fn telegraph(body: &Value) -> Result<Table, Error> {
    let mut table = Table::new(["标题", "内容", "发布日期", "发布时间"]);
    let rows = match body.pointer("/data/roll_data") {
        None | Some(Value::Null) => return Ok(table),
        Some(Value::Array(rows)) => rows,
        Some(other) => {
            return Err(Error::Payload(format!("roll_data is not a list: {}", other)))
        }
    };
    for row in rows {
        let (date, time) = published_cells(row.get("ctime"));
        table.push_row(vec![
            text_cell(row.get("title")),
            text_cell(row.get("content")),
            date,
            time,
        ]);
    }
    Ok(table)
}

/// EastMoney fast news: `{"data": {"fastNewsList": [{title, summary, showTime}]}}`.
pub(crate) fn fast_news(body: &Value) -> Result<Table, Error> {
    let mut table = Table::new(["标题", "摘要", "发布时间"]);
    let rows = match body.pointer("/data/fastNewsList") {
        None | Some(Value::Null) => return Ok(table),
        Some(Value::Array(rows)) => rows,
        Some(other) => {
            return Err(Error::Payload(format!(
                "fastNewsList is not a list: {}",
                other
            )))
        }
    };
    for row in rows {
        let show_time = match row.get("showTime").and_then(Value::as_str) {
            Some(s) => datetime_cell(s),
            None => Cell::Null,
        };
        table.push_row(vec![
            text_cell(row.get("title")),
            text_cell(row.get("summary")),
            show_time,
        ]);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    #[test]
    fn telegraph_times_convert_to_beijing() {
        // 2025-02-28 06:55:00 UTC == 14:55:00 Beijing.
        let body = json!({"data": {"roll_data": [
            {"title": "快讯标题", "content": "快讯内容", "ctime": 1740725700}
        ]}});
        let table = telegraph(&body).unwrap();
        assert_eq!(
            table.cell(0, "发布日期"),
            Some(&Cell::Date(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()))
        );
        assert_eq!(
            table.cell(0, "发布时间"),
            Some(&Cell::Time(NaiveTime::from_hms_opt(14, 55, 0).unwrap()))
        );
    }

    #[test]
    fn missing_ctime_stays_null() {
        let body = json!({"data": {"roll_data": [{"title": "无时间"}]}});
        let table = telegraph(&body).unwrap();
        assert_eq!(table.cell(0, "发布日期"), Some(&Cell::Null));
        assert_eq!(table.cell(0, "内容"), Some(&Cell::Null));
    }

    #[test]
    fn fast_news_rows_parse() {
        let body = json!({"data": {"fastNewsList": [
            {"title": "标题一", "summary": "摘要一", "showTime": "2025-02-28 14:55:00"}
        ]}});
        let table = fast_news(&body).unwrap();
        assert_eq!(table.len(), 1);
        assert!(matches!(table.cell(0, "发布时间"), Some(Cell::DateTime(_))));
    }
}
