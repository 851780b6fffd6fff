//! Change handling shared by the DOM listener and its in-flight updates.

use basket_sync::{
    config::ApplyPolicy,
    events::InputElement,
    handler::{EditSequencer, EditTicket, UpdateError, UpdateOutcome, read_input},
    items::{ItemKey, Quantity},
    region::CartRegion,
    transport::{TransportError, UpdateResponse},
};

/// A validated change waiting for the server's response.
#[derive(Debug, Clone)]
pub struct PendingChange {
    pub item: ItemKey,
    pub quantity: Quantity,
    ticket: EditTicket,
}

/// Per-container listener state.
#[derive(Debug)]
pub struct ChangeListener {
    sequencer: EditSequencer,
}

impl ChangeListener {
    #[must_use]
    pub fn new(policy: ApplyPolicy) -> Self {
        Self {
            sequencer: EditSequencer::new(policy),
        }
    }

    /// Decide what to do with a change that bubbled up to the container.
    ///
    /// Returns `None` for inputs that are not quantity inputs and for any
    /// change after [`close`](Self::close).
    pub fn accept(&self, input: &InputElement) -> Option<Result<PendingChange, UpdateError>> {
        if !input.is_quantity_input() || self.sequencer.is_detached() {
            return None;
        }

        Some(read_input(input).map(|(item, quantity)| PendingChange {
            item,
            quantity,
            ticket: self.sequencer.begin(),
        }))
    }

    /// Apply the server's answer to `change`.
    ///
    /// Returns `None` once the listener is closed; the region is not touched.
    pub fn settle(
        &self,
        region: &dyn CartRegion,
        change: PendingChange,
        response: Result<UpdateResponse, TransportError>,
    ) -> Option<Result<UpdateOutcome, UpdateError>> {
        if self.sequencer.is_detached() {
            return None;
        }

        let PendingChange {
            item,
            quantity,
            ticket,
        } = change;

        let outcome = response.map_err(UpdateError::from).map(|response| UpdateOutcome {
            applied: self.sequencer.apply(ticket, region, &response.result),
            removed: quantity.is_zero(),
            item,
            quantity,
        });

        Some(outcome)
    }

    /// Stop accepting changes and drop responses still in flight.
    pub fn close(&self) {
        self.sequencer.detach();
    }
}
