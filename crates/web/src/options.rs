//! Mount options

use basket_sync::config::{ApplyPolicy, ClientConfig};
use url::Url;

/// Selector of the cart container in the shop's basket template.
pub const CART_TABLE_SELECTOR: &str = ".cart-table";

/// Where to mount and which server to talk to.
#[derive(Debug, Clone)]
pub struct MountOptions {
    /// CSS selector of the cart container.
    pub selector: String,

    /// Basket server settings.
    pub client: ClientConfig,
}

impl MountOptions {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            selector: CART_TABLE_SELECTOR.to_string(),
            client: ClientConfig::new(base_url),
        }
    }

    /// Options for a page served from `href`; routes resolve against the
    /// page's origin.
    ///
    /// # Errors
    ///
    /// Returns an error when `href` is not an absolute URL.
    pub fn for_page(href: &str) -> Result<Self, url::ParseError> {
        let origin = Url::parse(href)?.join("/")?;

        Ok(Self::new(origin))
    }

    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    #[must_use]
    pub fn with_apply_policy(mut self, apply_policy: ApplyPolicy) -> Self {
        self.client = self.client.with_apply_policy(apply_policy);
        self
    }
}
