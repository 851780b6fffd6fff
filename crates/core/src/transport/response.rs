//! Update response payloads.

use serde::{Deserialize, Serialize};

use super::TransportError;

/// Re-rendered cart returned by the quantity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// HTML fragment that replaces the cart region's contents.
    pub result: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reply {
    Rendered(UpdateResponse),
    Failed { error: String },
}

/// Decode the JSON body of a quantity change response.
///
/// Bodies carrying an `error` field instead of `result` are reported as
/// [`TransportError::Server`].
///
/// # Errors
///
/// Returns [`TransportError::Decode`] for bodies that match neither shape.
pub fn decode_update(body: &[u8]) -> Result<UpdateResponse, TransportError> {
    match serde_json::from_slice::<Reply>(body).map_err(TransportError::Decode)? {
        Reply::Rendered(response) => Ok(response),
        Reply::Failed { error } => Err(TransportError::Server(error)),
    }
}
