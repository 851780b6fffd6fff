//! Client configuration.

use std::time::Duration;

use url::Url;

/// How responses to overlapping edits are applied to the cart region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplyPolicy {
    /// Apply every successful response as it arrives. A slow response to an
    /// older edit can overwrite the rendering of a newer one.
    #[default]
    ArrivalOrder,

    /// Discard responses to edits older than the last applied edit.
    LatestEdit,
}

/// Settings for talking to the basket server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root the basket routes are resolved against.
    pub base_url: Url,

    /// Whole-request timeout. `None` waits indefinitely.
    ///
    /// Native only; the browser client ignores it and logs a warning.
    pub timeout: Option<Duration>,

    /// Ordering policy for overlapping updates.
    pub apply_policy: ApplyPolicy,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            apply_policy: ApplyPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_apply_policy(mut self, apply_policy: ApplyPolicy) -> Self {
        self.apply_policy = apply_policy;
        self
    }
}
