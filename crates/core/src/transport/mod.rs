//! Basket endpoint transport.

use async_trait::async_trait;
use mockall::automock;

use crate::items::{ItemKey, Quantity};

mod errors;
mod http;
mod response;

pub use errors::TransportError;
pub use http::HttpTransport;
pub use response::{UpdateResponse, decode_update};

/// Client side of the basket quantity endpoint.
#[automock]
#[async_trait]
pub trait BasketTransport: Send + Sync {
    /// Ask the server to set `item` to `quantity` and return the re-rendered
    /// cart fragment.
    async fn change_quantity(
        &self,
        item: &ItemKey,
        quantity: Quantity,
    ) -> Result<UpdateResponse, TransportError>;
}
