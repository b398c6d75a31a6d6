//! HTTP server wiring: shared state, router, and the serve loop.

use std::sync::Arc;

use anyhow::Result;
use ashare_api::Client;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::routes;

/// State shared across handlers: the upstream client, never mutated after
/// startup. Requests share nothing else, so arbitrary concurrent
/// invocation is safe.
pub struct AppState {
    pub client: Client,
}

impl AppState {
    pub fn new(client: Client) -> Self {
        AppState { client }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/api/limit_up", get(routes::limit_up))
        .route("/api/limit_up_yesterday", get(routes::limit_up_yesterday))
        .route("/api/sector_fund_flow", get(routes::sector_fund_flow))
        .route("/api/stock_fund_flow", get(routes::stock_fund_flow))
        .route(
            "/api/stock_fund_flow_single",
            get(routes::stock_fund_flow_single),
        )
        .route("/api/sector_spot", get(routes::sector_spot))
        .route("/api/sector_stocks", get(routes::sector_stocks))
        .route("/api/stock_spot", get(routes::stock_spot))
        .route("/api/index_spot", get(routes::index_spot))
        .route("/api/news", get(routes::news))
        .route("/api/minute", get(routes::minute))
        .route("/api/market_sentiment", get(routes::market_sentiment))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Runs the relay until the process is stopped.
pub async fn run(config: &Config) -> Result<()> {
    let client = match &config.upstream_base {
        Some(base) => Client::with_base_url(base),
        None => Client::new(),
    };
    let app = router(AppState::new(client));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
