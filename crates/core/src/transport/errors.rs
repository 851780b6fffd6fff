//! Transport errors.

use thiserror::Error;

use crate::routes::RouteError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build request url")]
    Route(#[from] RouteError),

    #[error("http request failed")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed basket update payload")]
    Decode(#[source] serde_json::Error),

    #[error("basket server reported an error: {0}")]
    Server(String),
}
