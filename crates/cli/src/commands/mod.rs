//! CLI commands.

pub(crate) mod change;
pub(crate) mod replay;
