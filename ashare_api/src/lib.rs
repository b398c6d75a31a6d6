//! Typed client for the upstream A-share market-data providers.
//!
//! Every fetch flattens the provider's payload into a [`types::Table`] of
//! runtime-typed cells; callers decide how to serialize or filter it. The
//! providers are treated as black boxes: given typed parameters, each call
//! returns a `Table` or an [`Error`], nothing else.

mod client;
mod errors;
mod parse;
pub mod query;
pub mod types;
mod user_agent;

pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{FundFlowIndicator, Market, MinutePeriod, SectorType};
