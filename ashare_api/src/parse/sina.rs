//! Parsers for the Sina quote endpoints: the `hq.sinajs.cn` JS-variable
//! quote text and the JSONP-wrapped minute kline service.

use serde_json::Value;

use crate::errors::Error;
use crate::types::{Cell, Table};

use super::datetime_cell;

fn decimal_field(fields: &[&str], idx: usize) -> Cell {
    match fields.get(idx).map(|s| s.trim()) {
        None => Cell::Null,
        Some("") => Cell::Null,
        Some(s) => match s.parse() {
            Ok(d) => Cell::Decimal(d),
            Err(_) => Cell::Text(s.to_string()),
        },
    }
}

fn int_field(fields: &[&str], idx: usize) -> Cell {
    match fields.get(idx).map(|s| s.trim()) {
        None => Cell::Null,
        Some("") => Cell::Null,
        Some(s) => match s.parse::<i64>() {
            Ok(i) => Cell::Int(i),
            Err(_) => decimal_field(fields, idx),
        },
    }
}

/// Parses lightweight index quote lines:
///
/// ```text
/// var hq_str_s_sh000001="上证指数,3320.90,26.13,0.79,3251869,40786948";
/// ```
///
/// Fields are name, price, change, percent, volume (手), amount (万元).
pub(crate) fn index_spot(text: &str) -> Result<Table, Error> {
    let mut table = Table::new([
        "代码",
        "名称",
        "最新价",
        "涨跌额",
        "涨跌幅",
        "成交量",
        "成交额",
    ]);
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(rest) = line.strip_prefix("var hq_str_s_") else {
            return Err(Error::Payload(format!("unexpected quote line: {}", line)));
        };
        let Some((code, quoted)) = rest.split_once('=') else {
            return Err(Error::Payload(format!("unexpected quote line: {}", line)));
        };
        let payload = quoted.trim().trim_end_matches(';').trim_matches('"');
        if payload.is_empty() {
            // A delisted or unknown code answers with an empty string.
            continue;
        }
        let fields: Vec<&str> = payload.split(',').collect();
        table.push_row(vec![
            Cell::Text(code.to_string()),
            fields
                .first()
                .map(|s| Cell::Text((*s).to_string()))
                .unwrap_or(Cell::Null),
            decimal_field(&fields, 1),
            decimal_field(&fields, 2),
            decimal_field(&fields, 3),
            int_field(&fields, 4),
            decimal_field(&fields, 5),
        ]);
    }
    Ok(table)
}

/// Parses the minute kline JSONP payload. The service wraps a JSON array in
/// a callback invocation; everything between the outermost brackets is the
/// actual data: `[{"day":"2025-02-28 14:55:00","open":"11.26",...}, ...]`,
/// oldest bar first.
pub(crate) fn minute_bars(text: &str) -> Result<Table, Error> {
    let mut table = Table::new(["day", "open", "high", "low", "close", "volume"]);
    let start = text.find('[');
    let end = text.rfind(']');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(Error::Payload("no kline array in response".to_string()));
    };
    if start >= end {
        return Err(Error::Payload("no kline array in response".to_string()));
    }
    let bars: Vec<Value> = serde_json::from_str(&text[start..=end])
        .map_err(|e| Error::Payload(format!("kline array: {}", e)))?;

    let str_field = |bar: &Value, key: &str| -> Option<String> {
        bar.get(key).and_then(Value::as_str).map(str::to_string)
    };
    for bar in bars {
        let day = match str_field(&bar, "day") {
            Some(s) => datetime_cell(&s),
            None => Cell::Null,
        };
        let price = |key: &str| match str_field(&bar, key) {
            None => Cell::Null,
            Some(s) => match s.parse() {
                Ok(d) => Cell::Decimal(d),
                Err(_) => Cell::Text(s),
            },
        };
        let volume = match bar.get("volume") {
            None | Some(Value::Null) => Cell::Null,
            Some(Value::String(s)) => match s.parse::<i64>() {
                Ok(i) => Cell::Int(i),
                Err(_) => Cell::Text(s.clone()),
            },
            Some(v) => Cell::from_scalar(v),
        };
        table.push_row(vec![
            day,
            price("open"),
            price("high"),
            price("low"),
            price("close"),
            volume,
        ]);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn quote_lines_parse_into_rows() {
        let text = concat!(
            "var hq_str_s_sh000001=\"上证指数,3320.90,26.13,0.79,3251869,40786948\";\n",
            "var hq_str_s_sz399001=\"深证成指,10263.36,-12.72,-0.12,4125698,52145879\";\n",
        );
        let table = index_spot(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "代码"), Some(&Cell::Text("sh000001".into())));
        assert_eq!(
            table.cell(1, "涨跌额"),
            Some(&Cell::Decimal("-12.72".parse().unwrap()))
        );
        assert_eq!(table.cell(0, "成交量"), Some(&Cell::Int(3251869)));
    }

    #[test]
    fn empty_quote_payloads_are_skipped() {
        let table = index_spot("var hq_str_s_sh999999=\"\";\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn non_quote_text_is_a_payload_error() {
        assert!(matches!(index_spot("<html>blocked</html>"), Err(Error::Payload(_))));
    }

    #[test]
    fn jsonp_wrapper_is_stripped() {
        let text = r#"/*<script>*/cb_2025(([{"day":"2025-02-28 14:55:00","open":"11.26","high":"11.28","low":"11.25","close":"11.27","volume":"3580900"}]));"#;
        let table = minute_bars(text).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.cell(0, "day"),
            Some(&Cell::DateTime(
                NaiveDate::from_ymd_opt(2025, 2, 28)
                    .unwrap()
                    .and_hms_opt(14, 55, 0)
                    .unwrap()
            ))
        );
        assert_eq!(table.cell(0, "volume"), Some(&Cell::Int(3580900)));
    }

    #[test]
    fn missing_kline_array_is_a_payload_error() {
        assert!(matches!(minute_bars("null"), Err(Error::Payload(_))));
    }
}
