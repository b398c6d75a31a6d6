//! Parsers for the push2ex limit-pool endpoints (涨停/跌停/炸板股池).
//!
//! Payload shape: `{"data": {"pool": [ {...}, ... ]}}`, with `data` null on
//! non-trading days. A null pool is an empty table, never an error.

use serde_json::Value;

use crate::errors::Error;
use crate::types::{Cell, Table};

use super::{code_cell, decimal_cell, hhmmss_cell, int_cell, is_missing, scaled_price_cell, text_cell};

fn pool_rows(body: &Value) -> Result<Vec<Value>, Error> {
    match body.pointer("/data") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(data) => match data.get("pool") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(rows)) => Ok(rows.clone()),
            Some(other) => Err(Error::Payload(format!(
                "pool is not an array: {}",
                other
            ))),
        },
    }
}

/// 涨停统计 arrives as `{"days": d, "ct": c}` and reads as `d/c`.
fn streak_cell(value: Option<&Value>) -> Cell {
    match value {
        Some(v) if is_missing(v) => Cell::Null,
        Some(v) => match (
            v.get("days").and_then(Value::as_i64),
            v.get("ct").and_then(Value::as_i64),
        ) {
            (Some(days), Some(ct)) => Cell::Text(format!("{}/{}", days, ct)),
            _ => Cell::Raw(v.clone()),
        },
        None => Cell::Null,
    }
}

pub(crate) fn limit_up_pool(body: &Value) -> Result<Table, Error> {
    let mut table = Table::new([
        "代码",
        "名称",
        "涨跌幅",
        "最新价",
        "成交额",
        "流通市值",
        "总市值",
        "换手率",
        "封板资金",
        "首次封板时间",
        "最后封板时间",
        "炸板次数",
        "涨停统计",
        "连板数",
        "所属行业",
    ]);
    for row in pool_rows(body)? {
        table.push_row(vec![
            code_cell(row.get("c")),
            text_cell(row.get("n")),
            decimal_cell(row.get("zdp")),
            scaled_price_cell(row.get("p")),
            int_cell(row.get("amount")),
            decimal_cell(row.get("ltsz")),
            decimal_cell(row.get("tshare")),
            decimal_cell(row.get("hs")),
            int_cell(row.get("fund")),
            hhmmss_cell(row.get("fbt")),
            hhmmss_cell(row.get("lbt")),
            int_cell(row.get("zbc")),
            streak_cell(row.get("zttj")),
            int_cell(row.get("lbc")),
            text_cell(row.get("hybk")),
        ]);
    }
    Ok(table)
}

pub(crate) fn limit_down_pool(body: &Value) -> Result<Table, Error> {
    let mut table = Table::new([
        "代码",
        "名称",
        "涨跌幅",
        "最新价",
        "成交额",
        "流通市值",
        "总市值",
        "动态市盈率",
        "换手率",
        "封单资金",
        "最后封板时间",
        "板上成交额",
        "连续跌停",
        "开板次数",
        "所属行业",
    ]);
    for row in pool_rows(body)? {
        table.push_row(vec![
            code_cell(row.get("c")),
            text_cell(row.get("n")),
            decimal_cell(row.get("zdp")),
            scaled_price_cell(row.get("p")),
            int_cell(row.get("amount")),
            decimal_cell(row.get("ltsz")),
            decimal_cell(row.get("tshare")),
            decimal_cell(row.get("pe")),
            decimal_cell(row.get("hs")),
            int_cell(row.get("fund")),
            hhmmss_cell(row.get("lbt")),
            int_cell(row.get("fba")),
            int_cell(row.get("days")),
            int_cell(row.get("oc")),
            text_cell(row.get("hybk")),
        ]);
    }
    Ok(table)
}

pub(crate) fn broken_board_pool(body: &Value) -> Result<Table, Error> {
    let mut table = Table::new([
        "代码",
        "名称",
        "涨跌幅",
        "最新价",
        "涨停价",
        "成交额",
        "流通市值",
        "换手率",
        "首次封板时间",
        "炸板次数",
        "涨停统计",
        "振幅",
        "所属行业",
    ]);
    for row in pool_rows(body)? {
        table.push_row(vec![
            code_cell(row.get("c")),
            text_cell(row.get("n")),
            decimal_cell(row.get("zdp")),
            scaled_price_cell(row.get("p")),
            scaled_price_cell(row.get("ztp")),
            int_cell(row.get("amount")),
            decimal_cell(row.get("ltsz")),
            decimal_cell(row.get("hs")),
            hhmmss_cell(row.get("fbt")),
            int_cell(row.get("zbc")),
            streak_cell(row.get("zttj")),
            decimal_cell(row.get("zf")),
            text_cell(row.get("hybk")),
        ]);
    }
    Ok(table)
}
