//! Delegated change listener scoped to a mounted cart view.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use thiserror::Error;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::{JoinHandle, JoinSet},
};
use tracing::{debug, trace, warn};

use crate::{
    config::ApplyPolicy,
    events::{ChangeEvent, InputElement},
    handler::{QuantityChangeHandler, UpdateError, UpdateOutcome},
    region::SharedRegion,
    transport::BasketTransport,
};

#[derive(Debug, Error)]
pub enum MountError {
    #[error("cart view already has a live subscription")]
    AlreadyMounted,
}

/// Outcome of one handled change event.
#[derive(Debug)]
pub struct UpdateReport {
    /// The input as it was when the change was raised.
    pub input: InputElement,

    pub result: Result<UpdateOutcome, UpdateError>,
}

/// A cart container on a page: the region it renders into and the point where
/// change events from its descendants arrive.
#[derive(Clone)]
pub struct CartView {
    region: SharedRegion,
    listener: Arc<Mutex<Option<UnboundedSender<ChangeEvent>>>>,
}

impl fmt::Debug for CartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartView")
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

impl CartView {
    #[must_use]
    pub fn new(region: SharedRegion) -> Self {
        Self {
            region,
            listener: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn region(&self) -> &SharedRegion {
        &self.region
    }

    /// Whether a live subscription is attached.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Deliver a change event that bubbled up from a descendant input.
    ///
    /// Returns `false` when no live subscription is attached.
    pub fn dispatch_change(&self, input: InputElement) -> bool {
        let listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(sender) = listener.as_ref() else {
            trace!(name = %input.name, "change event on unmounted cart view");
            return false;
        };

        sender.send(ChangeEvent::from(input)).is_ok()
    }

    fn attach(&self, sender: UnboundedSender<ChangeEvent>) -> Result<(), MountError> {
        let mut listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);

        if listener.as_ref().is_some_and(|current| !current.is_closed()) {
            return Err(MountError::AlreadyMounted);
        }

        *listener = Some(sender);

        Ok(())
    }

    fn detach(&self) {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Live delegated listener on a [`CartView`].
///
/// Dropping the subscription detaches it and aborts updates still in flight,
/// so the view's region is not written to after it unmounts.
pub struct Subscription {
    view: CartView,
    handler: Arc<QuantityChangeHandler>,
    task: JoinHandle<()>,
    reports: UnboundedReceiver<UpdateReport>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("view", &self.view)
            .field("finished", &self.task.is_finished())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Wait for the next handled change.
    ///
    /// Returns `None` once the listener has stopped and every report has
    /// been received.
    pub async fn next_report(&mut self) -> Option<UpdateReport> {
        self.reports.recv().await
    }

    /// Detach from the view.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Updates already past their last await still reach `apply`.
        self.handler.detach();
        self.view.detach();
        self.task.abort();
    }
}

/// Attach a delegated quantity listener to `view`.
///
/// Every change event delivered to the view is matched against
/// [`QUANTITY_INPUT_SELECTOR`](crate::events::QUANTITY_INPUT_SELECTOR) when it
/// arrives, so inputs rendered after mounting are covered. Each matching event
/// is handled on its own task and reported through
/// [`Subscription::next_report`].
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns [`MountError::AlreadyMounted`] if the view already has a live
/// subscription.
pub fn mount(
    view: &CartView,
    transport: Arc<dyn BasketTransport>,
    policy: ApplyPolicy,
) -> Result<Subscription, MountError> {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (reports_tx, reports_rx) = mpsc::unbounded_channel();

    view.attach(events_tx)?;

    let handler = Arc::new(QuantityChangeHandler::new(
        transport,
        Arc::clone(&view.region),
        policy,
    ));

    let task = tokio::spawn(listen(Arc::clone(&handler), events_rx, reports_tx));

    debug!(?policy, "cart view mounted");

    Ok(Subscription {
        view: view.clone(),
        handler,
        task,
        reports: reports_rx,
    })
}

async fn listen(
    handler: Arc<QuantityChangeHandler>,
    mut events: UnboundedReceiver<ChangeEvent>,
    reports: UnboundedSender<UpdateReport>,
) {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(ChangeEvent { target }) = event else {
                    break;
                };

                if !target.is_quantity_input() {
                    trace!(input_type = %target.input_type, "ignoring change on non-quantity input");
                    continue;
                }

                // Tickets are issued here, in dispatch order, not on the spawned task.
                match handler.prepare(&target) {
                    Ok(edit) => {
                        let handler = Arc::clone(&handler);
                        let reports = reports.clone();

                        in_flight.spawn(async move {
                            let result = handler.submit(edit).await;

                            _ = reports.send(UpdateReport { input: target, result });
                        });
                    }
                    Err(error) => {
                        _ = reports.send(UpdateReport {
                            input: target,
                            result: Err(error),
                        });
                    }
                }
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(error) = joined {
                    warn!(%error, "basket update task failed");
                }
            }
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(error) = joined {
            warn!(%error, "basket update task failed");
        }
    }
}
