//! Basket Sync for the browser
//!
//! Binds the quantity synchroniser to a cart container on a live page: one
//! delegated `change` listener on the container, requests through `fetch`, and
//! the container's `innerHTML` replaced with the server's rendering.

pub mod listener;
pub mod options;

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::{
    CartTableBinding, ElementRegion, WebMountError, log_to_console, mount_cart_table, page_options,
};
pub use listener::{ChangeListener, PendingChange};
pub use options::{CART_TABLE_SELECTOR, MountOptions};
