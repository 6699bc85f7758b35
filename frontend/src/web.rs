//! Browser host: the live document behind [`Dom`], `localStorage` behind
//! [`KeyValueStore`], and the glue that turns DOM listeners, an
//! intersection observer and `setTimeout` into controller calls.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue, UnwrapThrowExt};
use web_sys::{
    Document, Element, EventTarget, FormData, HtmlButtonElement, HtmlElement,
    HtmlFormElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    ScrollBehavior, ScrollToOptions, Storage, Window,
};

use crate::config::Settings;
use crate::controller::PageController;
use crate::counter::VISIBLE_RATIO;
use crate::dom::{Dom, FieldMap, KeyValueStore};
use crate::events::{Event, EventKind, Source};

#[cfg(feature = "http-submit")]
type SiteSubmitter = crate::forms::http::HttpSubmitter;
#[cfg(not(feature = "http-submit"))]
type SiteSubmitter = crate::forms::submit::SimulatedSubmitter;

type WebController = PageController<WebDom, LocalStore, SiteSubmitter>;

thread_local! {
    static RUNTIME: RefCell<Option<Rc<Runtime>>> = RefCell::new(None);
}

pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn collect(list: Result<web_sys::NodeList, JsValue>) -> Vec<Element> {
        let Ok(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        Self::collect(self.document.query_selector_all(selector))
    }

    fn query_in(&self, root: &Element, selector: &str) -> Option<Element> {
        root.query_selector(selector).ok().flatten()
    }

    fn query_all_in(&self, root: &Element, selector: &str) -> Vec<Element> {
        Self::collect(root.query_selector_all(selector))
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &web_sys::Node = node.as_ref();
        ancestor.contains(Some(node))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_disabled(&mut self, node: &Element, disabled: bool) {
        if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if disabled {
            let _ = node.set_attribute("disabled", "");
        } else {
            let _ = node.remove_attribute("disabled");
        }
    }

    fn focus(&mut self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            let _ = element.focus();
        }
    }

    fn create_element(&mut self, tag: &str) -> Element {
        self.document.create_element(tag).unwrap_throw()
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        let _ = parent.append_child(child);
    }

    fn prepend_child(&mut self, parent: &Element, child: &Element) {
        let _ = parent.insert_before(child, parent.first_child().as_ref());
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn form_values(&self, form: &Element) -> FieldMap {
        let mut values = FieldMap::new();
        let Some(form) = form.dyn_ref::<HtmlFormElement>() else {
            return values;
        };
        let Ok(data) = FormData::new_with_form(form) else {
            return values;
        };
        let Ok(Some(entries)) = js_sys::try_iter(&JsValue::from(data)) else {
            return values;
        };
        for entry in entries.flatten() {
            let pair = js_sys::Array::from(&entry);
            // File inputs yield non-string values; the forms here have none.
            if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                values.insert(name, value);
            }
        }
        values
    }

    fn offset_top(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map_or(0.0, |element| element.offset_top() as f64)
    }

    fn offset_height(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map_or(0.0, |element| element.offset_height() as f64)
    }

    fn document_top(&self, node: &Element) -> f64 {
        node.get_bounding_client_rect().top() + self.scroll_y()
    }

    fn scroll_y(&self) -> f64 {
        self.window.page_y_offset().unwrap_or(0.0)
    }

    fn inner_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_to(&mut self, top: f64, smooth: bool) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        if smooth {
            options.set_behavior(ScrollBehavior::Smooth);
        }
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn css_var(&self, name: &str) -> Option<String> {
        let root = self.document.document_element()?;
        let style = self.window.get_computed_style(&root).ok().flatten()?;
        let value = style.get_property_value(name).ok()?;
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn navigate(&mut self, href: &str) {
        let _ = self.window.location().set_href(href);
    }

    fn is_online(&self) -> bool {
        self.window.navigator().on_line()
    }
}

pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage
            .as_ref()
            .and_then(|storage| storage.get_item(key).ok())
            .flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        let stored = self
            .storage
            .as_ref()
            .map_or(false, |storage| storage.set_item(key, value).is_ok());
        if !stored {
            warn!("could not persist {}", key);
        }
    }
}

/// Ties one controller to the browser's event loop for the page lifetime.
struct Runtime {
    controller: RefCell<WebController>,
    window: Window,
    origin: f64,
    /// Deadline the pending timeout was armed for.
    armed: Cell<Option<u64>>,
}

impl Runtime {
    fn now(&self) -> u64 {
        let now = self
            .window
            .performance()
            .map_or(self.origin, |performance| performance.now());
        (now - self.origin).max(0.0) as u64
    }

    fn handle(self: &Rc<Self>, event: Event<Element>) -> bool {
        let prevent = match self.controller.try_borrow_mut() {
            Ok(mut controller) => controller.dispatch(event).prevent_default,
            Err(_) => {
                debug!("event dropped while the controller is busy");
                false
            }
        };
        self.rearm();
        prevent
    }

    fn tick(self: &Rc<Self>) {
        let now = self.now();
        if let Ok(mut controller) = self.controller.try_borrow_mut() {
            controller.advance_to(now);
        }
        self.rearm();
    }

    /// Makes sure a timeout is pending for the earliest scheduled task.
    /// Superseded timeouts fire into a check and do nothing.
    fn rearm(self: &Rc<Self>) {
        let Ok(controller) = self.controller.try_borrow() else {
            return;
        };
        let due = controller.next_due();
        drop(controller);

        if due == self.armed.get() {
            return;
        }
        self.armed.set(due);
        let Some(due) = due else {
            return;
        };

        let delay = due.saturating_sub(self.now()).min(u32::MAX as u64) as u32;
        let runtime = Rc::clone(self);
        let timeout = Timeout::new(delay, move || {
            if runtime.armed.get() == Some(due) {
                runtime.armed.set(None);
                runtime.tick();
            }
        });
        timeout.forget();
    }

    fn listen(self: &Rc<Self>, target: &EventTarget, source: Source, kind: EventKind) {
        let Some(name) = kind.dom_name() else {
            return;
        };
        let runtime = Rc::clone(self);
        let callback = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let target = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok());
            let page_event = Event {
                target,
                ..Event::new(source, kind)
            };
            if runtime.handle(page_event) {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        let _ = target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
        callback.forget();
    }

    fn observe_counters(self: &Rc<Self>, counters: Vec<Element>) {
        if counters.is_empty() {
            return;
        }
        let runtime = Rc::clone(self);
        let watched = counters.clone();
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Some(index) = watched.iter().position(|counter| *counter == target) {
                    runtime.handle(Event::intersect(index, entry.intersection_ratio()));
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(VISIBLE_RATIO));
        options.set_root_margin("0px");
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
            Ok(observer) => {
                for counter in &counters {
                    observer.observe(counter);
                }
            }
            Err(err) => warn!("intersection observer unavailable: {:?}", err),
        }
        callback.forget();
    }
}

fn target_for(elements: &crate::elements::Elements<Element>, source: Source) -> Option<EventTarget> {
    let element = match source {
        Source::MenuToggle => elements.menu_toggle.clone(),
        Source::NavLink(index) => elements.nav_links.get(index).cloned(),
        Source::AcceptCookies => elements.accept_cookies.clone(),
        Source::DeclineCookies => elements.decline_cookies.clone(),
        Source::ContactForm => elements.contact_form.clone(),
        Source::PollForm => elements.poll_form.clone(),
        Source::ScrollTop => elements.scroll_top.clone(),
        Source::Counter(_) | Source::Window | Source::Document => None,
    };
    element.map(EventTarget::from)
}

fn install(window: Window, document: Document, settings: Settings) {
    let origin = window.performance().map_or(0.0, |performance| performance.now());
    let store = LocalStore::new(&window);
    let submitter = site_submitter(&settings);
    let controller = PageController::start(
        WebDom::new(window.clone(), document.clone()),
        store,
        submitter,
        settings,
    );

    let rows = controller.bindings().rows().to_vec();
    let elements = controller.elements().clone();
    let runtime = Rc::new(Runtime {
        controller: RefCell::new(controller),
        window: window.clone(),
        origin,
        armed: Cell::new(None),
    });

    for row in rows {
        let target = match row.source {
            Source::Window => Some(EventTarget::from(window.clone())),
            Source::Document => Some(EventTarget::from(document.clone())),
            source => target_for(&elements, source),
        };
        if let Some(target) = target {
            runtime.listen(&target, row.source, row.kind);
        }
    }
    runtime.observe_counters(elements.counters.clone());
    runtime.rearm();

    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
}

#[cfg(feature = "http-submit")]
fn site_submitter(_settings: &Settings) -> SiteSubmitter {
    crate::forms::http::HttpSubmitter::new(
        crate::config::get_backend_url(),
        Rc::new(|form: crate::forms::FormKind, result: Result<(), crate::forms::submit::SubmitError>| {
            let runtime = RUNTIME.with(|slot| slot.borrow().clone());
            if let Some(runtime) = runtime {
                if let Ok(mut controller) = runtime.controller.try_borrow_mut() {
                    controller.finish_submission(form, result);
                }
                runtime.rearm();
            }
        }),
    )
}

#[cfg(not(feature = "http-submit"))]
fn site_submitter(settings: &Settings) -> SiteSubmitter {
    crate::forms::submit::SimulatedSubmitter::new(settings.submit_latency_ms)
}

/// Starts the page controller once the document is parsed.
pub fn start(settings: Settings) {
    let window = web_sys::window().unwrap_throw();
    let document = window.document().unwrap_throw();

    if document.ready_state() != "loading" {
        install(window, document, settings);
        return;
    }

    let target = document.clone();
    let ready = Closure::once(move || install(window, document, settings));
    let _ = target.add_event_listener_with_callback("DOMContentLoaded", ready.as_ref().unchecked_ref());
    ready.forget();
}
