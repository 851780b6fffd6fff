//! Basket Sync
//!
//! Keeps a server-rendered shopping cart in step with quantity edits: a change
//! on any numeric quantity input inside the cart region is sent to the basket
//! server and the region is replaced with the fragment the server renders.

pub mod config;
pub mod events;
pub mod handler;
pub mod items;
pub mod region;
pub mod routes;
#[cfg(not(target_arch = "wasm32"))]
pub mod subscription;
pub mod transport;

pub mod prelude;
