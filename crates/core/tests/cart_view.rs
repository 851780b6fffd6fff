//! Integration tests for delegated quantity updates on a mounted cart view.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, mpsc as std_mpsc},
    time::Duration,
};

use async_trait::async_trait;
use testresult::TestResult;
use tokio::sync::{mpsc, oneshot};

use basket_sync::prelude::*;

/// Transport whose responses are released by the test, one gate per quantity.
struct GatedTransport {
    gates: Mutex<HashMap<u32, oneshot::Receiver<String>>>,
    started: mpsc::UnboundedSender<String>,
}

impl GatedTransport {
    fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (started, started_rx) = mpsc::unbounded_channel();

        (
            Self {
                gates: Mutex::new(HashMap::new()),
                started,
            },
            started_rx,
        )
    }

    fn gate(&self, quantity: u32) -> oneshot::Sender<String> {
        let (release, gate) = oneshot::channel();

        if let Ok(mut gates) = self.gates.lock() {
            gates.insert(quantity, gate);
        }

        release
    }
}

#[async_trait]
impl BasketTransport for GatedTransport {
    async fn change_quantity(
        &self,
        item: &ItemKey,
        quantity: Quantity,
    ) -> Result<UpdateResponse, TransportError> {
        let gate = self
            .gates
            .lock()
            .ok()
            .and_then(|mut gates| gates.remove(&quantity.get()));

        _ = self
            .started
            .send(request_path(item, quantity).unwrap_or_default());

        let Some(gate) = gate else {
            return Err(TransportError::Server(format!("no gate for {quantity}")));
        };

        gate.await
            .map(|result| UpdateResponse { result })
            .map_err(|error| TransportError::Server(error.to_string()))
    }
}

/// Transport that holds its worker inside the poll that completes the request
/// until the test lets it return.
struct StalledTransport {
    responding: mpsc::UnboundedSender<()>,
    resume: Mutex<std_mpsc::Receiver<()>>,
}

#[async_trait]
impl BasketTransport for StalledTransport {
    async fn change_quantity(
        &self,
        _item: &ItemKey,
        _quantity: Quantity,
    ) -> Result<UpdateResponse, TransportError> {
        _ = self.responding.send(());

        let resumed = self
            .resume
            .lock()
            .map_err(|error| TransportError::Server(error.to_string()))?
            .recv_timeout(Duration::from_secs(5));

        resumed.map_err(|error| TransportError::Server(error.to_string()))?;

        Ok(UpdateResponse {
            result: "<tr>late</tr>".to_string(),
        })
    }
}

fn request_path(item: &ItemKey, quantity: Quantity) -> Option<String> {
    basket_sync::routes::change_quantity_path(item, quantity).ok()
}

fn cart_view(html: &str) -> (CartView, MemoryRegion) {
    let region = MemoryRegion::new(html);

    (CartView::new(Arc::new(region.clone())), region)
}

#[tokio::test]
async fn quantity_edit_sends_one_request_and_renders_result() -> TestResult {
    let (view, region) = cart_view(r#"<tr><input type="number" name="item-42" value="2"></tr>"#);
    let (transport, mut started) = GatedTransport::new();
    let release = transport.gate(5);

    let mut subscription = mount(&view, Arc::new(transport), ApplyPolicy::ArrivalOrder)?;

    view.dispatch_change(InputElement::number("item-42", "5"));

    assert_eq!(
        started.recv().await.as_deref(),
        Some("/basket/change/item-42/quantity/5/")
    );

    release
        .send("<tr>item-42 x5</tr>".to_string())
        .map_err(|_unsent| "listener dropped the request")?;

    let report = subscription.next_report().await.ok_or("no report")?;
    let outcome = report.result?;

    assert!(outcome.applied, "response should be applied");
    assert_eq!(region.contents(), "<tr>item-42 x5</tr>");
    assert!(
        started.try_recv().is_err(),
        "exactly one request should be sent"
    );

    Ok(())
}

#[tokio::test]
async fn arrival_order_lets_a_stale_response_win() -> TestResult {
    let (view, region) = cart_view("<tr>item-42 x2</tr>");
    let (transport, mut started) = GatedTransport::new();
    let release_a = transport.gate(3);
    let release_b = transport.gate(5);

    let mut subscription = mount(&view, Arc::new(transport), ApplyPolicy::ArrivalOrder)?;

    view.dispatch_change(InputElement::number("item-42", "3"));
    view.dispatch_change(InputElement::number("item-42", "5"));

    started.recv().await.ok_or("edit A not sent")?;
    started.recv().await.ok_or("edit B not sent")?;

    release_b
        .send("<tr>item-42 x5</tr>".to_string())
        .map_err(|_unsent| "edit B dropped")?;
    subscription.next_report().await.ok_or("no report for B")?.result?;

    release_a
        .send("<tr>item-42 x3</tr>".to_string())
        .map_err(|_unsent| "edit A dropped")?;
    let late = subscription.next_report().await.ok_or("no report for A")?.result?;

    // Known defect of arrival-order application: the older edit's rendering
    // overwrites the newer one.
    assert!(late.applied, "stale response is applied under ArrivalOrder");
    assert_eq!(region.contents(), "<tr>item-42 x3</tr>");

    Ok(())
}

#[tokio::test]
async fn latest_edit_discards_a_stale_response() -> TestResult {
    let (view, region) = cart_view("<tr>item-42 x2</tr>");
    let (transport, mut started) = GatedTransport::new();
    let release_a = transport.gate(3);
    let release_b = transport.gate(5);

    let mut subscription = mount(&view, Arc::new(transport), ApplyPolicy::LatestEdit)?;

    view.dispatch_change(InputElement::number("item-42", "3"));
    view.dispatch_change(InputElement::number("item-42", "5"));

    started.recv().await.ok_or("edit A not sent")?;
    started.recv().await.ok_or("edit B not sent")?;

    release_b
        .send("<tr>item-42 x5</tr>".to_string())
        .map_err(|_unsent| "edit B dropped")?;
    let newer = subscription.next_report().await.ok_or("no report for B")?.result?;

    release_a
        .send("<tr>item-42 x3</tr>".to_string())
        .map_err(|_unsent| "edit A dropped")?;
    let older = subscription.next_report().await.ok_or("no report for A")?.result?;

    assert!(newer.applied, "newest edit is applied");
    assert!(!older.applied, "older edit is discarded");
    assert_eq!(older.quantity, Quantity::new(3));
    assert_eq!(region.contents(), "<tr>item-42 x5</tr>");

    Ok(())
}

#[tokio::test]
async fn inputs_rendered_after_mount_are_still_observed() -> TestResult {
    let (view, region) = cart_view(r#"<tr><input type="number" name="item-1" value="1"></tr>"#);
    let (transport, _started) = GatedTransport::new();
    let release_first = transport.gate(2);
    let release_second = transport.gate(7);

    let mut subscription = mount(&view, Arc::new(transport), ApplyPolicy::ArrivalOrder)?;

    let rerendered = concat!(
        r#"<tr><input type="number" name="item-1" value="2"></tr>"#,
        r#"<tr><input type="number" name="item-9" value="1"></tr>"#,
    );

    view.dispatch_change(InputElement::number("item-1", "2"));
    release_first
        .send(rerendered.to_string())
        .map_err(|_unsent| "first edit dropped")?;
    subscription.next_report().await.ok_or("no first report")?.result?;

    assert_eq!(region.contents(), rerendered);

    // item-9 did not exist when the view was mounted.
    view.dispatch_change(InputElement::number("item-9", "7"));
    release_second
        .send("<tr>item-9 x7</tr>".to_string())
        .map_err(|_unsent| "second edit dropped")?;
    let report = subscription.next_report().await.ok_or("no second report")?;

    assert_eq!(report.result?.item.as_str(), "item-9");
    assert_eq!(region.contents(), "<tr>item-9 x7</tr>");

    Ok(())
}

#[tokio::test]
async fn failed_update_is_reported_and_region_kept() -> TestResult {
    let (view, region) = cart_view("<tr>item-42 x2</tr>");
    let (transport, _started) = GatedTransport::new();

    let mut subscription = mount(&view, Arc::new(transport), ApplyPolicy::ArrivalOrder)?;

    // No gate for this quantity: the transport fails.
    view.dispatch_change(InputElement::number("item-42", "4"));

    let report = subscription.next_report().await.ok_or("no report")?;

    assert!(
        matches!(
            report.result,
            Err(UpdateError::Transport(TransportError::Server(_)))
        ),
        "expected transport failure, got {:?}",
        report.result
    );
    assert_eq!(report.input.value, "4");
    assert_eq!(region.contents(), "<tr>item-42 x2</tr>");

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn response_completing_during_dispose_is_not_written() -> TestResult {
    let (view, region) = cart_view("<tr>before</tr>");
    let (responding, mut responding_rx) = mpsc::unbounded_channel();
    let (resume, resume_rx) = std_mpsc::channel();

    let transport = Arc::new(StalledTransport {
        responding,
        resume: Mutex::new(resume_rx),
    });

    let subscription = mount(
        &view,
        Arc::clone(&transport) as Arc<dyn BasketTransport>,
        ApplyPolicy::ArrivalOrder,
    )?;

    view.dispatch_change(InputElement::number("item-42", "5"));
    responding_rx.recv().await.ok_or("request not sent")?;

    // The update task is inside its final poll; abort cannot stop it now.
    subscription.dispose();
    assert!(!view.is_mounted(), "disposed view should not be mounted");

    resume.send(())?;

    // The listener and update tasks release the transport once they finish.
    tokio::time::timeout(Duration::from_secs(5), async {
        while Arc::strong_count(&transport) > 1 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await?;

    assert_eq!(region.contents(), "<tr>before</tr>");

    Ok(())
}
