//! Prelude

pub use crate::{
    config::{ApplyPolicy, ClientConfig},
    events::{ChangeEvent, InputElement, QUANTITY_INPUT_SELECTOR},
    handler::{QuantityChangeHandler, UpdateError, UpdateOutcome},
    items::{ItemKey, Quantity},
    region::{CartRegion, MemoryRegion, SharedRegion},
    routes::change_quantity_url,
    transport::{BasketTransport, HttpTransport, TransportError, UpdateResponse},
};

#[cfg(not(target_arch = "wasm32"))]
pub use crate::subscription::{CartView, Subscription, UpdateReport, mount};
