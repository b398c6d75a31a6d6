//! One handler per logical data query.
//!
//! Every handler is a single linear pass: read query parameters with
//! defaults, call one upstream fetch (or an explicit fallback chain),
//! normalize the table with the route's slicing policy, wrap in the
//! envelope. All failures are handled here and rendered as the error
//! envelope.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use ashare_api::{FundFlowIndicator, Market, MinutePeriod, SectorType};
use axum::extract::{Query, State};
use axum::Json;
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::envelope::DataEnvelope;
use crate::error::RelayError;
use crate::normalize::{normalize_table, Record, Slice};
use crate::server::AppState;
use crate::sources::{first_success, Attempt};

type SharedState = Arc<AppState>;

/// The four major indexes the index route reports.
const MAJOR_INDEXES: [&str; 4] = ["sh000001", "sz399001", "sh000300", "sz399006"];

const NO_DATA: &str = "无数据";
const NO_DATA_NON_TRADING: &str = "无数据，可能非交易日";
/// Sentinel for a failed sub-query in the sentiment aggregate.
const FIELD_FAILED: &str = "获取失败";

fn today_compact() -> String {
    Local::now().format("%Y%m%d").to_string()
}

/// Parses an optional parameter against its typed vocabulary, falling back
/// to the default when absent or empty.
fn parse_or_default<T>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, RelayError>
where
    T: FromStr,
{
    match value.filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse()
            .map_err(|_| RelayError::InvalidParameter { name, value: s }),
    }
}

fn require(name: &'static str, value: Option<String>) -> Result<String, RelayError> {
    value
        .filter(|s| !s.is_empty())
        .ok_or(RelayError::MissingParameter(name))
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "status": "running",
        "service": "A股市场数据中转服务",
        "endpoints": [
            "/api/limit_up - 涨停板数据",
            "/api/limit_up_yesterday - 昨日涨停股池",
            "/api/sector_fund_flow - 板块资金流排名",
            "/api/stock_fund_flow - 个股资金流排名",
            "/api/stock_fund_flow_single - 单只个股资金流向",
            "/api/sector_spot - 板块实时行情",
            "/api/sector_stocks - 板块成分股",
            "/api/stock_spot - 个股实时行情",
            "/api/index_spot - 大盘指数行情",
            "/api/news - 财经快讯",
            "/api/minute - 分钟级行情",
            "/api/market_sentiment - 赚钱效应分析",
        ],
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

#[derive(Debug, Deserialize)]
pub struct DateParams {
    date: Option<String>,
}

pub async fn limit_up(
    State(state): State<SharedState>,
    Query(params): Query<DateParams>,
) -> Result<Json<DataEnvelope>, RelayError> {
    let date = params.date.filter(|d| !d.is_empty()).unwrap_or_else(today_compact);
    let table = state.client.limit_up_pool(&date).await?;
    let records = normalize_table(Some(&table), Slice::All);
    Ok(Json(
        DataEnvelope::new(records)
            .with_date(date)
            .or_msg(NO_DATA_NON_TRADING),
    ))
}

pub async fn limit_up_yesterday(
    State(state): State<SharedState>,
) -> Result<Json<DataEnvelope>, RelayError> {
    let table = state.client.limit_up_pool_previous().await?;
    let records = normalize_table(Some(&table), Slice::All);
    Ok(Json(DataEnvelope::new(records).or_msg(NO_DATA)))
}

#[derive(Debug, Deserialize)]
pub struct SectorFundFlowParams {
    indicator: Option<String>,
    sector_type: Option<String>,
}

pub async fn sector_fund_flow(
    State(state): State<SharedState>,
    Query(params): Query<SectorFundFlowParams>,
) -> Result<Json<DataEnvelope>, RelayError> {
    let indicator = parse_or_default(
        "indicator",
        params.indicator,
        FundFlowIndicator::default(),
    )?;
    let sector_type =
        parse_or_default("sector_type", params.sector_type, SectorType::default())?;
    let table = state
        .client
        .sector_fund_flow_rank(indicator, sector_type)
        .await?;
    let records = normalize_table(Some(&table), Slice::All);
    Ok(Json(DataEnvelope::new(records).or_msg(NO_DATA)))
}

#[derive(Debug, Deserialize)]
pub struct StockFundFlowParams {
    indicator: Option<String>,
}

pub async fn stock_fund_flow(
    State(state): State<SharedState>,
    Query(params): Query<StockFundFlowParams>,
) -> Result<Json<DataEnvelope>, RelayError> {
    let indicator = parse_or_default(
        "indicator",
        params.indicator,
        FundFlowIndicator::default(),
    )?;
    let table = state.client.stock_fund_flow_rank(indicator).await?;
    let records = normalize_table(Some(&table), Slice::All);
    Ok(Json(DataEnvelope::new(records).or_msg(NO_DATA)))
}

#[derive(Debug, Deserialize)]
pub struct StockFundFlowSingleParams {
    stock: Option<String>,
    market: Option<String>,
}

pub async fn stock_fund_flow_single(
    State(state): State<SharedState>,
    Query(params): Query<StockFundFlowSingleParams>,
) -> Result<Json<DataEnvelope>, RelayError> {
    let stock = require("stock", params.stock)?;
    let market = match params.market.filter(|m| !m.is_empty()) {
        Some(m) => m.parse().map_err(|_| RelayError::InvalidParameter {
            name: "market",
            value: m,
        })?,
        None => Market::infer(&stock),
    };
    let table = state.client.stock_fund_flow(&stock, market).await?;
    // The day-kline arrives oldest-first; the most recent sessions are the tail.
    let records = normalize_table(Some(&table), Slice::Last(5));
    Ok(Json(DataEnvelope::new(records).or_msg(NO_DATA)))
}

pub async fn sector_spot(
    State(state): State<SharedState>,
) -> Result<Json<DataEnvelope>, RelayError> {
    let table = state.client.concept_board_spot().await?;
    let records = normalize_table(Some(&table), Slice::All);
    Ok(Json(DataEnvelope::new(records).or_msg(NO_DATA)))
}

#[derive(Debug, Deserialize)]
pub struct SectorStocksParams {
    symbol: Option<String>,
}

pub async fn sector_stocks(
    State(state): State<SharedState>,
    Query(params): Query<SectorStocksParams>,
) -> Result<Json<DataEnvelope>, RelayError> {
    let symbol = require("symbol", params.symbol)?;
    let table = state.client.concept_board_constituents(&symbol).await?;
    let records = normalize_table(Some(&table), Slice::All);
    Ok(Json(DataEnvelope::new(records).or_msg(NO_DATA)))
}

#[derive(Debug, Deserialize)]
pub struct StockSpotParams {
    codes: Option<String>,
}

pub async fn stock_spot(
    State(state): State<SharedState>,
    Query(params): Query<StockSpotParams>,
) -> Result<Json<DataEnvelope>, RelayError> {
    let mut table = state.client.stock_spot().await?;
    if let Some(codes) = params.codes.filter(|c| !c.is_empty()) {
        let wanted: HashSet<&str> = codes.split(',').map(str::trim).collect();
        table.retain_rows("代码", |cell| {
            cell.as_text().map(|c| wanted.contains(c)).unwrap_or(false)
        });
    }
    let records = normalize_table(Some(&table), Slice::All);
    Ok(Json(DataEnvelope::new(records).or_msg(NO_DATA)))
}

pub async fn index_spot(
    State(state): State<SharedState>,
) -> Result<Json<DataEnvelope>, RelayError> {
    let attempts = vec![
        Attempt::new("sina", state.client.index_spot_sina(&MAJOR_INDEXES)),
        Attempt::new("eastmoney", state.client.index_spot_em()),
    ];
    let (mut table, source) = first_success(attempts).await?;
    table.retain_rows("代码", |cell| {
        cell.as_text()
            .map(|c| MAJOR_INDEXES.contains(&c))
            .unwrap_or(false)
    });
    let records = normalize_table(Some(&table), Slice::All);
    Ok(Json(
        DataEnvelope::new(records).with_source(source).or_msg(NO_DATA),
    ))
}

pub async fn news(State(state): State<SharedState>) -> Result<Json<DataEnvelope>, RelayError> {
    let attempts = vec![
        Attempt::new("cls", state.client.telegraph_news()),
        Attempt::new("eastmoney", state.client.global_news_em()),
    ];
    let (table, source) = first_success(attempts).await?;
    // Both feeds roll newest-first; the most recent entries are the head.
    let records = normalize_table(Some(&table), Slice::First(50));
    Ok(Json(
        DataEnvelope::new(records).with_source(source).or_msg(NO_DATA),
    ))
}

#[derive(Debug, Deserialize)]
pub struct MinuteParams {
    symbol: Option<String>,
    period: Option<String>,
}

pub async fn minute(
    State(state): State<SharedState>,
    Query(params): Query<MinuteParams>,
) -> Result<Json<DataEnvelope>, RelayError> {
    let symbol = require("symbol", params.symbol)?;
    let period = parse_or_default("period", params.period, MinutePeriod::default())?;
    let prefixed = format!("{}{}", Market::infer(&symbol).prefix(), symbol);
    let table = state.client.minute_bars(&prefixed, period).await?;
    // Bars arrive oldest-first; the most recent hour is the tail.
    let records = normalize_table(Some(&table), Slice::Last(60));
    Ok(Json(DataEnvelope::new(records).or_msg(NO_DATA)))
}

/// One field of the sentiment aggregate: the row count on success, the
/// failure sentinel otherwise. A failed sub-query never fails the request.
fn count_field(field: &str, result: Result<ashare_api::types::Table, ashare_api::Error>) -> Value {
    match result {
        Ok(table) => Value::from(table.len()),
        Err(e) => {
            tracing::warn!(field, error = %e, "sentiment sub-query failed");
            Value::from(FIELD_FAILED)
        }
    }
}

pub async fn market_sentiment(
    State(state): State<SharedState>,
    Query(params): Query<DateParams>,
) -> Json<Value> {
    let date = params.date.filter(|d| !d.is_empty()).unwrap_or_else(today_compact);

    let mut data = Record::new();
    data.insert(
        "涨停数".to_string(),
        count_field("涨停数", state.client.limit_up_pool(&date).await),
    );
    data.insert(
        "跌停数".to_string(),
        count_field("跌停数", state.client.limit_down_pool(&date).await),
    );
    data.insert(
        "炸板数".to_string(),
        count_field("炸板数", state.client.broken_board_pool(&date).await),
    );
    data.insert("日期".to_string(), Value::from(date));

    Json(json!({ "data": data }))
}
