//! Ordered fallback chains over upstream data sources.
//!
//! Routes with a secondary provider list their sources explicitly; the
//! chain tries each in order and the first success wins. Only when every
//! source has failed does the combined error surface.

use ashare_api::types::Table;
use futures::future::BoxFuture;

use crate::error::RelayError;

/// One labeled fetch in a fallback chain. The label names the source in
/// logs, in the success envelope, and in the combined failure message.
pub struct Attempt<'a> {
    pub label: &'static str,
    pub fetch: BoxFuture<'a, Result<Table, ashare_api::Error>>,
}

impl<'a> Attempt<'a> {
    pub fn new<F>(label: &'static str, fetch: F) -> Self
    where
        F: std::future::Future<Output = Result<Table, ashare_api::Error>> + Send + 'a,
    {
        Attempt {
            label,
            fetch: Box::pin(fetch),
        }
    }
}

/// Tries each attempt in order; returns the first table that arrives along
/// with the winning source's label.
pub async fn first_success(attempts: Vec<Attempt<'_>>) -> Result<(Table, &'static str), RelayError> {
    let mut failures = Vec::with_capacity(attempts.len());
    for attempt in attempts {
        match attempt.fetch.await {
            Ok(table) => return Ok((table, attempt.label)),
            Err(e) => {
                tracing::warn!(source = attempt.label, error = %e, "data source failed");
                failures.push(format!("{}: {}", attempt.label, e));
            }
        }
    }
    Err(RelayError::AllSourcesFailed(failures.join("; ")))
}
