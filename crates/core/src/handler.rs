//! Quantity change handler.

use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    config::ApplyPolicy,
    events::InputElement,
    items::{ItemKey, ItemKeyError, Quantity, QuantityError},
    region::{CartRegion, SharedRegion},
    transport::{BasketTransport, TransportError},
};

/// Reasons a quantity change did not reach the cart region.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("invalid item identifier")]
    InvalidItem(#[from] ItemKeyError),

    #[error("invalid quantity")]
    InvalidQuantity(#[from] QuantityError),

    #[error("basket update failed")]
    Transport(#[from] TransportError),
}

/// Result of a quantity change that the server acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub item: ItemKey,
    pub quantity: Quantity,

    /// `false` when the response was discarded as stale or arrived after the
    /// region was detached.
    pub applied: bool,

    /// The quantity was zero, which removes the line server-side.
    pub removed: bool,
}

/// Read the item identifier and quantity from an edited input.
///
/// # Errors
///
/// Returns an error when the name is blank or the value is not a
/// non-negative whole number.
pub fn read_input(input: &InputElement) -> Result<(ItemKey, Quantity), UpdateError> {
    let item = ItemKey::new(input.name.as_str())?;
    let quantity = input.value.parse::<Quantity>()?;

    Ok((item, quantity))
}

/// Position of an edit in the order edits were made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EditTicket(u64);

#[derive(Debug, Default)]
struct ApplyState {
    last_applied: u64,
    detached: bool,
}

/// Orders edits and decides whether their responses reach the region.
#[derive(Debug)]
pub struct EditSequencer {
    policy: ApplyPolicy,
    issued: AtomicU64,
    state: Mutex<ApplyState>,
}

impl EditSequencer {
    #[must_use]
    pub fn new(policy: ApplyPolicy) -> Self {
        Self {
            policy,
            issued: AtomicU64::new(0),
            state: Mutex::new(ApplyState::default()),
        }
    }

    #[must_use]
    pub fn policy(&self) -> ApplyPolicy {
        self.policy
    }

    /// Issue the ticket for a new edit.
    pub fn begin(&self) -> EditTicket {
        EditTicket(self.issued.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Write `html` into `region` unless the sequencer is detached or the
    /// policy marks `ticket` as stale.
    ///
    /// The checks and the write happen under one lock.
    pub fn apply(&self, ticket: EditTicket, region: &dyn CartRegion, html: &str) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.detached {
            return false;
        }

        if self.policy == ApplyPolicy::LatestEdit && ticket.0 < state.last_applied {
            return false;
        }

        region.replace_contents(html);
        state.last_applied = state.last_applied.max(ticket.0);

        true
    }

    /// Refuse every later write. Once this returns, no write is in progress
    /// and none will start.
    pub fn detach(&self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .detached = true;
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .detached
    }
}

/// A validated edit that has been given its place in the edit order.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    item: ItemKey,
    quantity: Quantity,
    ticket: EditTicket,
}

impl PendingEdit {
    #[must_use]
    pub fn item(&self) -> &ItemKey {
        &self.item
    }

    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// Synchronises the server basket and the cart region on quantity edits.
pub struct QuantityChangeHandler {
    transport: Arc<dyn BasketTransport>,
    region: SharedRegion,
    sequencer: EditSequencer,
}

impl fmt::Debug for QuantityChangeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantityChangeHandler")
            .field("sequencer", &self.sequencer)
            .finish_non_exhaustive()
    }
}

impl QuantityChangeHandler {
    #[must_use]
    pub fn new(
        transport: Arc<dyn BasketTransport>,
        region: SharedRegion,
        policy: ApplyPolicy,
    ) -> Self {
        Self {
            transport,
            region,
            sequencer: EditSequencer::new(policy),
        }
    }

    /// Handle one change of a quantity input.
    ///
    /// Sends exactly one request for a valid input. On success the region's
    /// contents are replaced with the response's `result`, subject to the
    /// apply policy.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input and for any failed request; the
    /// region is left unchanged in both cases.
    pub async fn on_quantity_changed(
        &self,
        input: &InputElement,
    ) -> Result<UpdateOutcome, UpdateError> {
        let edit = self.prepare(input)?;

        self.submit(edit).await
    }

    /// Stop writing to the region; responses still in flight are dropped.
    pub fn detach(&self) {
        self.sequencer.detach();
    }

    /// Validate an input and reserve its place in the edit order.
    ///
    /// # Errors
    ///
    /// Returns an error when the input's name or value is invalid.
    pub fn prepare(&self, input: &InputElement) -> Result<PendingEdit, UpdateError> {
        let (item, quantity) = read_input(input).inspect_err(|error| {
            warn!(name = %input.name, value = %input.value, %error, "rejected quantity change");
        })?;

        let ticket = self.sequencer.begin();

        debug!(%item, %quantity, ?ticket, "quantity change queued");

        Ok(PendingEdit {
            item,
            quantity,
            ticket,
        })
    }

    /// Send a prepared edit and apply the server's rendering.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails; the region is left unchanged.
    pub async fn submit(&self, edit: PendingEdit) -> Result<UpdateOutcome, UpdateError> {
        let PendingEdit {
            item,
            quantity,
            ticket,
        } = edit;

        let response = self
            .transport
            .change_quantity(&item, quantity)
            .await
            .inspect_err(|error| {
                warn!(%item, %quantity, %error, "basket update failed, cart left unchanged");
            })?;

        let applied = self
            .sequencer
            .apply(ticket, &*self.region, &response.result);

        if applied {
            info!(%item, %quantity, "cart updated");
        } else if self.sequencer.is_detached() {
            debug!(%item, %quantity, "cart detached, basket update dropped");
        } else {
            warn!(%item, %quantity, ?ticket, "discarded stale basket update");
        }

        Ok(UpdateOutcome {
            item,
            quantity,
            applied,
            removed: quantity.is_zero(),
        })
    }
}
