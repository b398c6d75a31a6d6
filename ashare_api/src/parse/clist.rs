//! Parser for the push2 `clist` family: ranked lists keyed by `f`-numbered
//! field codes under `{"data": {"diff": [...]}}`.

use serde_json::Value;

use crate::errors::Error;
use crate::query::FundFlowIndicator;
use crate::types::{Cell, Table};

use super::{code_cell, decimal_cell, int_cell, text_cell};

#[derive(Clone, Copy)]
pub(crate) enum FieldKind {
    /// Stock or board code, leading zeros restored.
    Code,
    /// Code prefixed with its exchange (`f13` market id + code): `sh000001`.
    PrefixedCode,
    Text,
    Decimal,
    Int,
}

pub(crate) struct FieldSpec {
    pub code: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

const fn field(code: &'static str, column: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { code, column, kind }
}

fn diff_rows(body: &Value) -> Result<Vec<Value>, Error> {
    match body.pointer("/data") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(data) => match data.get("diff") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(rows)) => Ok(rows.clone()),
            // Some releases key diff as an object of index → row.
            Some(Value::Object(map)) => Ok(map.values().cloned().collect()),
            Some(other) => Err(Error::Payload(format!("diff is not a list: {}", other))),
        },
    }
}

fn prefixed_code(row: &Value, code_field: &str) -> Cell {
    let code = match code_cell(row.get(code_field)) {
        Cell::Text(c) => c,
        other => return other,
    };
    match row.get("f13").and_then(Value::as_i64) {
        Some(1) => Cell::Text(format!("sh{}", code)),
        Some(0) => Cell::Text(format!("sz{}", code)),
        _ => Cell::Text(code),
    }
}

pub(crate) fn diff_table(body: &Value, spec: &[FieldSpec]) -> Result<Table, Error> {
    let mut table = Table::new(spec.iter().map(|f| f.column));
    for row in diff_rows(body)? {
        table.push_row(
            spec.iter()
                .map(|f| match f.kind {
                    FieldKind::Code => code_cell(row.get(f.code)),
                    FieldKind::PrefixedCode => prefixed_code(&row, f.code),
                    FieldKind::Text => text_cell(row.get(f.code)),
                    FieldKind::Decimal => decimal_cell(row.get(f.code)),
                    FieldKind::Int => int_cell(row.get(f.code)),
                })
                .collect(),
        );
    }
    Ok(table)
}

pub(crate) fn sector_fund_flow_rank(
    body: &Value,
    indicator: FundFlowIndicator,
) -> Result<Table, Error> {
    let spec = [
        field("f12", "代码", FieldKind::Code),
        field("f14", "名称", FieldKind::Text),
        field("f3", "涨跌幅", FieldKind::Decimal),
        field(indicator.amount_fid(), "主力净流入-净额", FieldKind::Decimal),
        field(indicator.percent_fid(), "主力净流入-净占比", FieldKind::Decimal),
        field("f204", "领涨股", FieldKind::Text),
    ];
    diff_table(body, &spec)
}

pub(crate) fn stock_fund_flow_rank(
    body: &Value,
    indicator: FundFlowIndicator,
) -> Result<Table, Error> {
    let spec = [
        field("f12", "代码", FieldKind::Code),
        field("f14", "名称", FieldKind::Text),
        field("f2", "最新价", FieldKind::Decimal),
        field("f3", "涨跌幅", FieldKind::Decimal),
        field(indicator.amount_fid(), "主力净流入-净额", FieldKind::Decimal),
        field(indicator.percent_fid(), "主力净流入-净占比", FieldKind::Decimal),
    ];
    diff_table(body, &spec)
}

const BOARD_SPOT_SPEC: &[FieldSpec] = &[
    field("f14", "板块名称", FieldKind::Text),
    field("f12", "板块代码", FieldKind::Code),
    field("f2", "最新价", FieldKind::Decimal),
    field("f4", "涨跌额", FieldKind::Decimal),
    field("f3", "涨跌幅", FieldKind::Decimal),
    field("f20", "总市值", FieldKind::Decimal),
    field("f8", "换手率", FieldKind::Decimal),
    field("f104", "上涨家数", FieldKind::Int),
    field("f105", "下跌家数", FieldKind::Int),
    field("f128", "领涨股票", FieldKind::Text),
    field("f136", "领涨股票-涨跌幅", FieldKind::Decimal),
];

pub(crate) fn concept_board_spot(body: &Value) -> Result<Table, Error> {
    diff_table(body, BOARD_SPOT_SPEC)
}

const QUOTE_SPEC: &[FieldSpec] = &[
    field("f12", "代码", FieldKind::Code),
    field("f14", "名称", FieldKind::Text),
    field("f2", "最新价", FieldKind::Decimal),
    field("f3", "涨跌幅", FieldKind::Decimal),
    field("f4", "涨跌额", FieldKind::Decimal),
    field("f5", "成交量", FieldKind::Int),
    field("f6", "成交额", FieldKind::Decimal),
    field("f7", "振幅", FieldKind::Decimal),
    field("f15", "最高", FieldKind::Decimal),
    field("f16", "最低", FieldKind::Decimal),
    field("f17", "今开", FieldKind::Decimal),
    field("f18", "昨收", FieldKind::Decimal),
    field("f8", "换手率", FieldKind::Decimal),
    field("f10", "量比", FieldKind::Decimal),
    field("f9", "市盈率-动态", FieldKind::Decimal),
];

pub(crate) fn concept_board_constituents(body: &Value) -> Result<Table, Error> {
    diff_table(body, QUOTE_SPEC)
}

const STOCK_SPOT_SPEC: &[FieldSpec] = &[
    field("f12", "代码", FieldKind::Code),
    field("f14", "名称", FieldKind::Text),
    field("f2", "最新价", FieldKind::Decimal),
    field("f3", "涨跌幅", FieldKind::Decimal),
    field("f4", "涨跌额", FieldKind::Decimal),
    field("f5", "成交量", FieldKind::Int),
    field("f6", "成交额", FieldKind::Decimal),
    field("f7", "振幅", FieldKind::Decimal),
    field("f15", "最高", FieldKind::Decimal),
    field("f16", "最低", FieldKind::Decimal),
    field("f17", "今开", FieldKind::Decimal),
    field("f18", "昨收", FieldKind::Decimal),
    field("f10", "量比", FieldKind::Decimal),
    field("f8", "换手率", FieldKind::Decimal),
    field("f9", "市盈率-动态", FieldKind::Decimal),
    field("f23", "市净率", FieldKind::Decimal),
    field("f20", "总市值", FieldKind::Decimal),
    field("f21", "流通市值", FieldKind::Decimal),
];

pub(crate) fn stock_spot(body: &Value) -> Result<Table, Error> {
    diff_table(body, STOCK_SPOT_SPEC)
}

const INDEX_SPOT_SPEC: &[FieldSpec] = &[
    field("f12", "代码", FieldKind::PrefixedCode),
    field("f14", "名称", FieldKind::Text),
    field("f2", "最新价", FieldKind::Decimal),
    field("f4", "涨跌额", FieldKind::Decimal),
    field("f3", "涨跌幅", FieldKind::Decimal),
    field("f5", "成交量", FieldKind::Int),
    field("f6", "成交额", FieldKind::Decimal),
];

pub(crate) fn index_spot(body: &Value) -> Result<Table, Error> {
    diff_table(body, INDEX_SPOT_SPEC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_diff_yields_empty_table() {
        let table = stock_spot(&json!({"data": null})).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns()[0], "代码");
    }

    #[test]
    fn object_keyed_diff_is_accepted() {
        let body = json!({"data": {"diff": {
            "0": {"f12": "600519", "f14": "贵州茅台", "f2": 1812.34, "f3": 10.01}
        }}});
        let table = concept_board_constituents(&body).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "名称"), Some(&Cell::Text("贵州茅台".into())));
    }

    #[test]
    fn indicator_selects_ranking_fields() {
        let body = json!({"data": {"diff": [
            {"f12": "BK0892", "f14": "人工智能", "f3": 2.5, "f164": 1.5e9, "f165": 4.2, "f204": "某领涨股"}
        ]}});
        let table = sector_fund_flow_rank(&body, FundFlowIndicator::FiveDay).unwrap();
        assert_eq!(
            table.cell(0, "主力净流入-净额"),
            Some(&Cell::Decimal("1500000000".parse().unwrap()))
        );
    }

    #[test]
    fn index_codes_gain_exchange_prefix() {
        let body = json!({"data": {"diff": [
            {"f12": "000001", "f13": 1, "f14": "上证指数", "f2": 3320.9},
            {"f12": "399001", "f13": 0, "f14": "深证成指", "f2": 10263.4}
        ]}});
        let table = index_spot(&body).unwrap();
        assert_eq!(table.cell(0, "代码"), Some(&Cell::Text("sh000001".into())));
        assert_eq!(table.cell(1, "代码"), Some(&Cell::Text("sz399001".into())));
    }

    #[test]
    fn missing_markers_in_ranked_rows_become_null() {
        let body = json!({"data": {"diff": [
            {"f12": "600519", "f14": "贵州茅台", "f2": "-", "f3": null}
        ]}});
        let table = stock_fund_flow_rank(&body, FundFlowIndicator::Today).unwrap();
        assert_eq!(table.cell(0, "最新价"), Some(&Cell::Null));
        assert_eq!(table.cell(0, "涨跌幅"), Some(&Cell::Null));
    }
}
