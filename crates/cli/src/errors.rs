//! CLI errors.

use std::{error::Error as StdError, io};

use basket_sync::{handler::UpdateError, subscription::MountError, transport::TransportError};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("failed to build basket client")]
    Client(#[from] TransportError),

    #[error("failed to mount cart view")]
    Mount(#[from] MountError),

    #[error("quantity change failed")]
    Update(#[from] UpdateError),

    #[error("failed to read input")]
    Io(#[from] io::Error),
}

/// Render an error and its sources as a single `a: b: c` line.
pub(crate) fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
