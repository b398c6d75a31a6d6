//! Stateless HTTP relay: forwards market-data queries to the upstream
//! providers and reshapes their tabular answers into uniform JSON
//! envelopes. No caching, no cross-request state; each request is one
//! linear pass.

pub mod config;
pub mod envelope;
pub mod error;
pub mod normalize;
pub mod routes;
pub mod server;
pub mod sources;

pub use config::Config;
pub use envelope::{DataEnvelope, ErrorEnvelope};
pub use error::RelayError;
pub use server::{router, AppState};
