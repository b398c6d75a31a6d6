//! Error types for the upstream data-provider client.

/// Errors that can occur when fetching from an upstream provider.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unreadable body).
    #[error("request failed")]
    RequestFailed,
    /// The provider returned a non-success status with a body snippet.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The provider answered 2xx but the payload shape was not understood.
    #[error("unexpected payload: {0}")]
    Payload(String),
    /// A board-constituents lookup named a board the provider does not list.
    #[error("unknown board `{0}`")]
    UnknownBoard(String),
}
