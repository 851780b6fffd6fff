//! HTTP transport for the basket endpoint.

#[cfg(not(target_arch = "wasm32"))]
use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
#[cfg(target_arch = "wasm32")]
use tracing::warn;
use tracing::debug;
use url::Url;

#[cfg(not(target_arch = "wasm32"))]
use super::BasketTransport;
use super::{TransportError, UpdateResponse, decode_update};
use crate::{
    config::ClientConfig,
    items::{ItemKey, Quantity},
    routes::change_quantity_url,
};

/// Header the basket server checks before answering with JSON.
const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// `reqwest` client for the basket quantity endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    http: Client,
}

impl HttpTransport {
    /// Create a transport with a default client and no timeout.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    /// Create a transport from client settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let builder = Client::builder();

        #[cfg(not(target_arch = "wasm32"))]
        let builder = match config.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };

        #[cfg(target_arch = "wasm32")]
        if let Some(timeout) = config.timeout {
            warn!(?timeout, "request timeouts are not supported in the browser, ignoring");
        }

        Ok(Self {
            base_url: config.base_url.clone(),
            http: builder.build()?,
        })
    }

    /// Server root the routes are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a quantity change and decode the re-rendered cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL cannot be built, the request fails, the
    /// server answers with a non-success status, or the body is not an
    /// update payload.
    pub async fn fetch(
        &self,
        item: &ItemKey,
        quantity: Quantity,
    ) -> Result<UpdateResponse, TransportError> {
        let url = change_quantity_url(&self.base_url, item, quantity)?;

        debug!(%url, "requesting basket quantity change");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(REQUESTED_WITH.0, REQUESTED_WITH.1)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(error) => {
                    debug!(%status, %error, "failed to read error response body");
                    String::new()
                }
            };

            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;

        decode_update(&body)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl BasketTransport for HttpTransport {
    async fn change_quantity(
        &self,
        item: &ItemKey,
        quantity: Quantity,
    ) -> Result<UpdateResponse, TransportError> {
        self.fetch(item, quantity).await
    }
}
