//! Basket endpoint routes.

use thiserror::Error;
use url::Url;

use crate::items::{ItemKey, Quantity};

/// Errors raised while building an endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("base url {0} cannot carry a path")]
    CannotBeABase(String),

    #[error("item identifier {0:?} is a dot segment")]
    DotSegment(String),
}

/// Build the quantity change URL for an item.
///
/// The URL has the shape `{base}/basket/change/{item}/quantity/{quantity}/`.
/// The item identifier is pushed as a single percent-encoded segment, so `/`,
/// `?`, `#` and `%` inside it cannot change the shape of the path. Any query
/// or fragment on `base` is dropped.
///
/// # Errors
///
/// Returns [`RouteError::CannotBeABase`] for bases such as `mailto:` URLs and
/// [`RouteError::DotSegment`] for the identifiers `.` and `..`, which URL path
/// normalisation would otherwise swallow.
pub fn change_quantity_url(
    base: &Url,
    item: &ItemKey,
    quantity: Quantity,
) -> Result<Url, RouteError> {
    if matches!(item.as_str(), "." | "..") {
        return Err(RouteError::DotSegment(item.to_string()));
    }

    let mut url = base.clone();

    url.set_query(None);
    url.set_fragment(None);

    url.path_segments_mut()
        .map_err(|()| RouteError::CannotBeABase(base.to_string()))?
        .pop_if_empty()
        .extend(["basket", "change"])
        .push(item.as_str())
        .push("quantity")
        .push(&quantity.to_string())
        .push("");

    Ok(url)
}

/// Path component of [`change_quantity_url`] against a server root.
///
/// # Errors
///
/// Returns [`RouteError::DotSegment`] for the identifiers `.` and `..`.
pub fn change_quantity_path(item: &ItemKey, quantity: Quantity) -> Result<String, RouteError> {
    let root = Url::parse("http://localhost/")
        .map_err(|error| RouteError::CannotBeABase(error.to_string()))?;

    change_quantity_url(&root, item, quantity).map(|url| url.path().to_string())
}
