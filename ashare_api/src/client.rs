//! HTTP client for the upstream market-data providers.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::parse;
use crate::query::{FundFlowIndicator, Market, MinutePeriod, SectorType};
use crate::types::{Cell, Table};
use crate::user_agent::get_user_agent;
use crate::Error;

/// Access token the push2ex pool endpoints expect.
const POOL_UT: &str = "7eea3edcaed734bea9cbfc24409ed989";
/// Access token for the push2his fund-flow kline endpoint.
const FFLOW_UT: &str = "b2884a393a59ad64002292a3e90d46a5";

const FFLOW_FIELDS2: &str =
    "f51,f52,f53,f54,f55,f56,f57,f58,f59,f60,f61,f62,f63,f64,f65";

/// Upstream host a request goes to. Each has a production base URL that a
/// single test override replaces wholesale, so one mock server can play
/// every provider (the paths stay distinct).
#[derive(Clone, Copy, Debug)]
enum Host {
    Push2,
    Push2Ex,
    Push2His,
    SinaHq,
    SinaMinute,
    Cls,
    EmNews,
}

impl Host {
    fn default_base(self) -> &'static str {
        match self {
            Host::Push2 => "https://push2.eastmoney.com",
            Host::Push2Ex => "https://push2ex.eastmoney.com",
            Host::Push2His => "https://push2his.eastmoney.com",
            Host::SinaHq => "https://hq.sinajs.cn",
            Host::SinaMinute => "https://quotes.sina.cn",
            Host::Cls => "https://www.cls.cn",
            Host::EmNews => "https://np-listapi.eastmoney.com",
        }
    }

    fn referer(self) -> &'static str {
        match self {
            Host::Push2 | Host::Push2Ex | Host::Push2His => "https://quote.eastmoney.com/",
            Host::SinaHq | Host::SinaMinute => "https://finance.sina.com.cn/",
            Host::Cls => "https://www.cls.cn/telegraph",
            Host::EmNews => "https://kuaixun.eastmoney.com/",
        }
    }
}

/// Client for the upstream quote providers (EastMoney push2 family, Sina
/// quote services, CLS telegraph).
///
/// Sends requests with browser-like headers and a randomized user agent to
/// avoid being throttled. Each request builds a fresh `reqwest::Client`
/// with a 30-second timeout; there are no retries.
pub struct Client {
    /// When set, every host resolves to this base URL. Used for testing
    /// with wiremock.
    base_override: Option<String>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a client pointing at the production provider hosts.
    pub fn new() -> Self {
        Self { base_override: None }
    }

    /// Creates a client that sends every request to `base_url` instead of
    /// the per-provider production hosts.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_override: Some(base_url.trim_end_matches('/').to_string()),
        }
    }

    fn get_url(&self, host: Host, path: &str) -> Result<Url, Error> {
        let base = match &self.base_override {
            Some(base) => base.as_str(),
            None => host.default_base(),
        };
        Url::parse(format!("{}{}", base, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })
    }

    async fn get_response(&self, host: Host, url: Url) -> Result<reqwest::Response, Error> {
        let client = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let resp = client
            .get(url)
            .header("accept", "*/*")
            .header("accept-language", "zh-CN,zh;q=0.9,en;q=0.8")
            .header("referer", host.referer())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }
        Ok(resp)
    }

    async fn get_json(&self, host: Host, url: Url) -> Result<Value, Error> {
        let body = self
            .get_response(host, url)
            .await?
            .text()
            .await
            .map_err(|e| {
                tracing::error!("Failed to read response body: {}", e);
                Error::RequestFailed
            })?;
        serde_json::from_str(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::Payload(format!("not JSON: {}", e))
        })
    }

    /// Fetches a text body, decoding GBK when the provider does not label
    /// its charset (the Sina quote services).
    async fn get_text(&self, host: Host, url: Url, default_charset: &str) -> Result<String, Error> {
        self.get_response(host, url)
            .await?
            .text_with_charset(default_charset)
            .await
            .map_err(|e| {
                tracing::error!("Failed to read response body: {}", e);
                Error::RequestFailed
            })
    }

    async fn pool(&self, path: &str, date: Option<&str>, sort: &str) -> Result<Value, Error> {
        let mut url = self.get_url(Host::Push2Ex, path)?;
        url.query_pairs_mut()
            .append_pair("ut", POOL_UT)
            .append_pair("dpt", "wz.ztzt")
            .append_pair("Pageindex", "0")
            .append_pair("pagesize", "10000")
            .append_pair("sort", sort);
        if let Some(date) = date {
            url.query_pairs_mut().append_pair("date", date);
        }
        self.get_json(Host::Push2Ex, url).await
    }

    async fn clist(&self, fs: &str, fields: &str, sort_fid: &str) -> Result<Value, Error> {
        let mut url = self.get_url(Host::Push2, "/api/qt/clist/get")?;
        url.query_pairs_mut()
            .append_pair("pn", "1")
            .append_pair("pz", "5000")
            .append_pair("po", "1")
            .append_pair("np", "1")
            .append_pair("fltt", "2")
            .append_pair("invt", "2")
            .append_pair("fid", sort_fid)
            .append_pair("fs", fs)
            .append_pair("fields", fields);
        self.get_json(Host::Push2, url).await
    }

    /// Today's limit-up pool (涨停股池) for the given `YYYYMMDD` trade date.
    pub async fn limit_up_pool(&self, date: &str) -> Result<Table, Error> {
        let body = self.pool("/getTopicZTPool", Some(date), "fbt:asc").await?;
        parse::pool::limit_up_pool(&body)
    }

    /// The previous session's limit-up pool (昨日涨停股池).
    pub async fn limit_up_pool_previous(&self) -> Result<Table, Error> {
        let body = self.pool("/getYesterdayZTPool", None, "zs:desc").await?;
        parse::pool::limit_up_pool(&body)
    }

    /// The limit-down pool (跌停股池) for the given trade date.
    pub async fn limit_down_pool(&self, date: &str) -> Result<Table, Error> {
        let body = self.pool("/getTopicDTPool", Some(date), "fund:asc").await?;
        parse::pool::limit_down_pool(&body)
    }

    /// The broken-board pool (炸板股池) for the given trade date.
    pub async fn broken_board_pool(&self, date: &str) -> Result<Table, Error> {
        let body = self.pool("/getTopicZBPool", Some(date), "fbt:asc").await?;
        parse::pool::broken_board_pool(&body)
    }

    /// Sector fund-flow ranking over the given window and sector universe.
    pub async fn sector_fund_flow_rank(
        &self,
        indicator: FundFlowIndicator,
        sector_type: SectorType,
    ) -> Result<Table, Error> {
        let fields = format!(
            "f12,f14,f3,{},{},f204",
            indicator.amount_fid(),
            indicator.percent_fid()
        );
        let body = self
            .clist(sector_type.fs(), &fields, indicator.amount_fid())
            .await?;
        parse::clist::sector_fund_flow_rank(&body, indicator)
    }

    /// Per-stock fund-flow ranking over the given window, whole A-share market.
    pub async fn stock_fund_flow_rank(
        &self,
        indicator: FundFlowIndicator,
    ) -> Result<Table, Error> {
        let fields = format!(
            "f12,f14,f2,f3,{},{}",
            indicator.amount_fid(),
            indicator.percent_fid()
        );
        let body = self
            .clist(
                "m:0+t:6,m:0+t:80,m:1+t:2,m:1+t:23",
                &fields,
                indicator.amount_fid(),
            )
            .await?;
        parse::clist::stock_fund_flow_rank(&body, indicator)
    }

    /// Daily fund-flow history for one stock, oldest row first.
    pub async fn stock_fund_flow(&self, stock: &str, market: Market) -> Result<Table, Error> {
        let mut url = self.get_url(Host::Push2His, "/api/qt/stock/fflow/daykline/get")?;
        url.query_pairs_mut()
            .append_pair("lmt", "0")
            .append_pair("klt", "101")
            .append_pair("ut", FFLOW_UT)
            .append_pair("fields1", "f1,f2,f3,f7")
            .append_pair("fields2", FFLOW_FIELDS2)
            .append_pair("secid", &format!("{}.{}", market.secid(), stock));
        let body = self.get_json(Host::Push2His, url).await?;
        parse::fflow::fund_flow_daykline(&body)
    }

    /// Concept-board realtime ranking (板块实时行情).
    pub async fn concept_board_spot(&self) -> Result<Table, Error> {
        let body = self
            .clist(
                "m:90+t:3",
                "f12,f14,f2,f3,f4,f8,f20,f104,f105,f128,f136",
                "f3",
            )
            .await?;
        parse::clist::concept_board_spot(&body)
    }

    /// Constituent stocks of one concept board. `symbol` is either a board
    /// code (`BK0892`) or a board name, which is resolved against the board
    /// list first.
    pub async fn concept_board_constituents(&self, symbol: &str) -> Result<Table, Error> {
        let code = if symbol.starts_with("BK") {
            symbol.to_string()
        } else {
            self.resolve_board_code(symbol).await?
        };
        let body = self
            .clist(
                &format!("b:{}", code),
                "f12,f14,f2,f3,f4,f5,f6,f7,f15,f16,f17,f18,f8,f10,f9",
                "f3",
            )
            .await?;
        parse::clist::concept_board_constituents(&body)
    }

    async fn resolve_board_code(&self, name: &str) -> Result<String, Error> {
        let boards = self.concept_board_spot().await?;
        let (Some(name_idx), Some(code_idx)) = (
            boards.column_index("板块名称"),
            boards.column_index("板块代码"),
        ) else {
            return Err(Error::Payload("board list misses name/code columns".into()));
        };
        boards
            .rows()
            .iter()
            .find(|row| row[name_idx].as_text() == Some(name))
            .and_then(|row| match &row[code_idx] {
                Cell::Text(code) => Some(code.clone()),
                _ => None,
            })
            .ok_or_else(|| Error::UnknownBoard(name.to_string()))
    }

    /// Realtime quotes for the whole A-share market (沪深京A股).
    pub async fn stock_spot(&self) -> Result<Table, Error> {
        let body = self
            .clist(
                "m:0+t:6,m:0+t:80,m:1+t:2,m:1+t:23,m:0+t:81+s:2048",
                "f12,f14,f2,f3,f4,f5,f6,f7,f15,f16,f17,f18,f10,f8,f9,f23,f20,f21",
                "f3",
            )
            .await?;
        parse::clist::stock_spot(&body)
    }

    /// Index quotes from the Sina lightweight quote service. `codes` are
    /// exchange-prefixed index codes (`sh000001`).
    pub async fn index_spot_sina(&self, codes: &[&str]) -> Result<Table, Error> {
        let list = codes
            .iter()
            .map(|c| format!("s_{}", c))
            .collect::<Vec<_>>()
            .join(",");
        let url = self.get_url(Host::SinaHq, &format!("/list={}", list))?;
        let text = self.get_text(Host::SinaHq, url, "GBK").await?;
        parse::sina::index_spot(&text)
    }

    /// Index quotes from EastMoney, the secondary index source.
    pub async fn index_spot_em(&self) -> Result<Table, Error> {
        let body = self
            .clist("m:1+s:2,m:0+t:5", "f12,f13,f14,f2,f3,f4,f5,f6", "f3")
            .await?;
        parse::clist::index_spot(&body)
    }

    /// The CLS telegraph roll (财联社电报), newest entry first.
    pub async fn telegraph_news(&self) -> Result<Table, Error> {
        let mut url = self.get_url(Host::Cls, "/nodeapi/updateTelegraphList")?;
        url.query_pairs_mut()
            .append_pair("app", "CailianpressWeb")
            .append_pair("os", "web")
            .append_pair("sv", "8.4.6");
        let body = self.get_json(Host::Cls, url).await?;
        parse::cls::telegraph(&body)
    }

    /// EastMoney 7x24 fast news, the secondary news source.
    pub async fn global_news_em(&self) -> Result<Table, Error> {
        let mut url = self.get_url(Host::EmNews, "/comm/web/getFastNewsList")?;
        url.query_pairs_mut()
            .append_pair("client", "web")
            .append_pair("biz", "web_724")
            .append_pair("fastColumn", "102")
            .append_pair("sortEnd", "")
            .append_pair("pageSize", "50");
        let body = self.get_json(Host::EmNews, url).await?;
        parse::cls::fast_news(&body)
    }

    /// Minute bars for one exchange-prefixed symbol (`sh600519`), oldest bar
    /// first.
    pub async fn minute_bars(&self, symbol: &str, period: MinutePeriod) -> Result<Table, Error> {
        let mut url = self.get_url(
            Host::SinaMinute,
            "/cn/api/jsonp_v2.php/=/CN_MarketDataService.getKLineData",
        )?;
        url.query_pairs_mut()
            .append_pair("symbol", symbol)
            .append_pair("scale", period.scale())
            .append_pair("ma", "no")
            .append_pair("datalen", "1023");
        let text = self.get_text(Host::SinaMinute, url, "utf-8").await?;
        parse::sina::minute_bars(&text)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i <= MAX)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        format!("{}...[truncated]", &body[..cut])
    }
}
