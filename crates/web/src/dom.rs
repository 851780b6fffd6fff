//! DOM binding of the quantity synchroniser.

use std::rc::Rc;

use basket_sync::{
    events::InputElement,
    handler::{UpdateError, UpdateOutcome},
    region::CartRegion,
    transport::{HttpTransport, TransportError},
};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlInputElement, console};

use crate::{listener::ChangeListener, options::MountOptions};

/// Callback receiving each handled change.
type Reporter = dyn Fn(&InputElement, &Result<UpdateOutcome, UpdateError>);

#[derive(Debug, Error)]
pub enum WebMountError {
    #[error("no document is available")]
    NoDocument,

    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    #[error("no element matches {0:?}")]
    NotFound(String),

    #[error("failed to add change listener: {0}")]
    Listener(String),

    #[error("cannot read page location: {0}")]
    Location(String),

    #[error("page location is not an absolute URL")]
    PageUrl(#[from] url::ParseError),

    #[error("failed to build basket client")]
    Client(#[from] TransportError),
}

/// Cart region backed by an element's `innerHTML`.
#[derive(Debug, Clone)]
pub struct ElementRegion(Element);

impl ElementRegion {
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self(element)
    }
}

impl CartRegion for ElementRegion {
    fn replace_contents(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn contents(&self) -> String {
        self.0.inner_html()
    }
}

/// Live change listener on a cart container.
///
/// Dropping the binding removes the listener; responses still in flight are
/// not written to the container afterwards.
pub struct CartTableBinding {
    container: Element,
    listener: Closure<dyn FnMut(Event)>,
    state: Rc<ChangeListener>,
}

impl std::fmt::Debug for CartTableBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartTableBinding")
            .field("container", &self.container.tag_name())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Drop for CartTableBinding {
    fn drop(&mut self) {
        self.state.close();

        if let Err(error) = self
            .container
            .remove_event_listener_with_callback("change", self.listener.as_ref().unchecked_ref())
        {
            console::warn_2(&"basket-sync: failed to remove change listener".into(), &error);
        }
    }
}

/// Options for the current page, resolving routes against its origin.
///
/// # Errors
///
/// Returns an error when there is no window or its location is unreadable.
pub fn page_options() -> Result<MountOptions, WebMountError> {
    let href = web_sys::window()
        .ok_or(WebMountError::NoDocument)?
        .location()
        .href()
        .map_err(|error| WebMountError::Location(describe(&error)))?;

    Ok(MountOptions::for_page(&href)?)
}

/// Mount the synchroniser on the first element matching `options.selector`.
///
/// `on_report` is called once for every change of a quantity input inside
/// the container, after its update has settled. Inputs are matched by their
/// `type`, which is the `input[type=number]` test the DOM would apply.
///
/// # Errors
///
/// Returns an error when there is no document, the selector matches nothing,
/// or the listener cannot be attached.
pub fn mount_cart_table(
    options: &MountOptions,
    on_report: impl Fn(&InputElement, &Result<UpdateOutcome, UpdateError>) + 'static,
) -> Result<CartTableBinding, WebMountError> {
    console_error_panic_hook::set_once();

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(WebMountError::NoDocument)?;

    let container = document
        .query_selector(&options.selector)
        .map_err(|error| WebMountError::Selector {
            selector: options.selector.clone(),
            message: describe(&error),
        })?
        .ok_or_else(|| WebMountError::NotFound(options.selector.clone()))?;

    let transport = Rc::new(HttpTransport::from_config(&options.client)?);
    let state = Rc::new(ChangeListener::new(options.client.apply_policy));
    let region = Rc::new(ElementRegion::new(container.clone()));
    let reporter: Rc<Reporter> = Rc::new(on_report);

    let listener = {
        let state = Rc::clone(&state);

        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(input) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };

            let snapshot = InputElement::new(input.type_(), input.name(), input.value());

            let change = match state.accept(&snapshot) {
                None => return,
                Some(Ok(change)) => change,
                Some(Err(error)) => {
                    (*reporter)(&snapshot, &Err(error));
                    return;
                }
            };

            let transport = Rc::clone(&transport);
            let state = Rc::clone(&state);
            let region = Rc::clone(&region);
            let reporter = Rc::clone(&reporter);

            spawn_local(async move {
                let response = transport.fetch(&change.item, change.quantity).await;

                if let Some(result) = state.settle(&*region, change, response) {
                    (*reporter)(&snapshot, &result);
                }
            });
        })
    };

    container
        .add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        .map_err(|error| WebMountError::Listener(describe(&error)))?;

    Ok(CartTableBinding {
        container,
        listener,
        state,
    })
}

/// Report handler that writes failures and discarded responses to the
/// browser console.
pub fn log_to_console(input: &InputElement, result: &Result<UpdateOutcome, UpdateError>) {
    match result {
        Ok(outcome) if !outcome.applied => {
            console::warn_1(&format!("basket-sync: discarded stale update for {}", outcome.item).into());
        }
        Ok(_) => {}
        Err(error) => {
            console::warn_1(
                &format!("basket-sync: {} = {:?} not applied: {error}", input.name, input.value).into(),
            );
        }
    }
}

fn describe(error: &JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}
