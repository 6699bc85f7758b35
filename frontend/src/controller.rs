use log::{debug, info, warn};

use crate::components::notification::{self, NoticeId, NoticeKind, Notices};
use crate::config::Settings;
use crate::consent;
use crate::counter::Counters;
use crate::dom::{selectors, Dom, KeyValueStore};
use crate::elements::Elements;
use crate::events::{Bindings, Event, EventKind, Handler, Outcome, Source};
use crate::forms::submit::{Delivery, SubmitError, Submission, Submitter, SEND_FAILED, SENDING_LABEL};
use crate::forms::{self, FormKind};
use crate::menu;
use crate::scheduler::{Scheduler, Task};
use crate::scroll;
use crate::state::{CookieConsent, UiState};

/// The submission currently between "sending" and its result.
#[derive(Debug)]
struct InFlight<N> {
    form: FormKind,
    button: Option<N>,
    label: String,
}

/// Owns everything interactive on one page for the page's lifetime.
pub struct PageController<D: Dom, S, U> {
    dom: D,
    store: S,
    submitter: U,
    settings: Settings,
    state: UiState,
    elements: Elements<D::Node>,
    bindings: Bindings,
    scheduler: Scheduler,
    notices: Notices<D::Node>,
    counters: Counters<D::Node>,
    in_flight: Option<InFlight<D::Node>>,
}

impl<D, S, U> PageController<D, S, U>
where
    D: Dom,
    S: KeyValueStore,
    U: Submitter,
{
    /// Caches the page elements, builds the binding table and runs the
    /// start-up checks (stored cookie decision, connectivity).
    pub fn start(dom: D, store: S, submitter: U, settings: Settings) -> Self {
        let elements = Elements::cache(&dom);
        info!("page controller starting ({})", elements.summary());

        let bindings = bind_events(&elements);
        debug!("{} event bindings", bindings.len());

        let counters = Counters::new(elements.counters.clone());
        let mut controller = Self {
            dom,
            store,
            submitter,
            settings,
            state: UiState::default(),
            elements,
            bindings,
            scheduler: Scheduler::new(),
            notices: Notices::new(),
            counters,
            in_flight: None,
        };

        consent::init(
            &mut controller.dom,
            &controller.store,
            &controller.elements,
            &mut controller.state,
            &controller.settings.consent_key,
        );
        if !controller.dom.is_online() {
            warn!("page loaded while offline");
            controller.show_notice(notification::OFFLINE_AT_START, NoticeKind::Warning);
        }
        controller
    }

    pub fn dispatch(&mut self, event: Event<D::Node>) -> Outcome {
        let handlers = self.bindings.handlers_for(event.source, event.kind).to_vec();
        handlers
            .into_iter()
            .fold(Outcome::default(), |outcome, handler| {
                outcome.merge(self.run(handler, &event))
            })
    }

    fn run(&mut self, handler: Handler, event: &Event<D::Node>) -> Outcome {
        match handler {
            Handler::ToggleMenu => menu::toggle(&mut self.dom, &self.elements, &mut self.state),
            Handler::NavClick => {
                let Source::NavLink(index) = event.source else {
                    return Outcome::default();
                };
                let Some(link) = self.elements.nav_links.get(index).cloned() else {
                    return Outcome::default();
                };
                menu::nav_click(
                    &mut self.dom,
                    &self.elements,
                    &mut self.state,
                    &self.settings,
                    &link,
                )
            }
            Handler::AcceptCookies => {
                self.decide_cookies(CookieConsent::Accepted);
                Outcome::default()
            }
            Handler::DeclineCookies => {
                self.decide_cookies(CookieConsent::Declined);
                Outcome::default()
            }
            Handler::SubmitContact => {
                self.submit_form(FormKind::Contact);
                Outcome::prevented()
            }
            Handler::SubmitPoll => {
                self.submit_form(FormKind::Poll);
                Outcome::prevented()
            }
            Handler::ScrollToTop => {
                scroll::scroll_to_top(&mut self.dom);
                Outcome::default()
            }
            Handler::BackToTop => {
                scroll::update_back_to_top(&mut self.dom, &self.elements, &self.settings);
                Outcome::default()
            }
            Handler::ScrollSpy => {
                scroll::spy(&mut self.dom, &self.elements, &self.settings);
                Outcome::default()
            }
            Handler::CloseOnResize => {
                menu::close_on_resize(&mut self.dom, &self.elements, &mut self.state, &self.settings);
                Outcome::default()
            }
            Handler::CloseOnOutsideClick => {
                menu::close_on_outside_click(
                    &mut self.dom,
                    &self.elements,
                    &mut self.state,
                    event.target.as_ref(),
                );
                Outcome::default()
            }
            Handler::ConnectionRestored => {
                info!("connection restored");
                self.show_notice(notification::CONNECTION_RESTORED, NoticeKind::Success);
                Outcome::default()
            }
            Handler::ConnectionLost => {
                warn!("connection lost");
                self.show_notice(notification::CONNECTION_LOST, NoticeKind::Warning);
                Outcome::default()
            }
            Handler::CountUp => {
                if let (Source::Counter(index), Some(ratio)) = (event.source, event.intersection_ratio) {
                    self.counters.observe(
                        &mut self.dom,
                        &mut self.scheduler,
                        &self.settings,
                        index,
                        ratio,
                    );
                }
                Outcome::default()
            }
        }
    }

    /// Moves the clock to `now` and runs everything that came due.
    pub fn advance_to(&mut self, now: u64) {
        self.scheduler.advance_to(now);
        loop {
            let due = self.scheduler.take_due();
            if due.is_empty() {
                break;
            }
            for task in due {
                self.run_task(task);
            }
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::CompleteSubmission(form) => self.finish_submission(form, Ok(())),
            Task::DismissNotice(id) => self.notices.dismiss(&mut self.dom, id),
            Task::CounterFrame(index) => {
                self.counters
                    .step(&mut self.dom, &mut self.scheduler, &self.settings, index)
            }
        }
    }

    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    fn decide_cookies(&mut self, decision: CookieConsent) {
        consent::decide(
            &mut self.dom,
            &mut self.store,
            &self.elements,
            &mut self.state,
            &self.settings.consent_key,
            decision,
        );
    }

    fn form_node(&self, form: FormKind) -> Option<D::Node> {
        match form {
            FormKind::Contact => self.elements.contact_form.clone(),
            FormKind::Poll => self.elements.poll_form.clone(),
        }
    }

    fn submit_form(&mut self, kind: FormKind) {
        if self.state.form_submitting {
            debug!("{} form submit ignored, another submission is in flight", kind.slug());
            return;
        }
        let Some(form) = self.form_node(kind) else {
            return;
        };

        let fields = self.dom.form_values(&form);
        let errors = kind.validate(&fields);
        forms::clear_errors(&mut self.dom, &form);
        if !errors.is_empty() {
            info!(
                "{} form rejected: {:?}",
                kind.slug(),
                errors.keys().collect::<Vec<_>>()
            );
            forms::show_errors(&mut self.dom, &form, &errors);
            return;
        }

        self.state.form_submitting = true;
        let button = self.dom.query_in(&form, selectors::SUBMIT_BUTTON);
        let label = button
            .as_ref()
            .map(|button| self.dom.text(button))
            .unwrap_or_default();
        if let Some(button) = &button {
            self.dom.set_disabled(button, true);
            self.dom.set_text(button, SENDING_LABEL);
        }
        self.in_flight = Some(InFlight {
            form: kind,
            button,
            label,
        });

        info!("{} form submitting", kind.slug());
        let submission = Submission { form: kind, fields };
        match self.submitter.submit(&submission) {
            Delivery::After(delay) => {
                self.scheduler.schedule(delay, Task::CompleteSubmission(kind));
            }
            Delivery::Pending => {}
        }
    }

    /// Ends the in-flight submission of `form`. Success moves on to the
    /// confirmation page; failure re-enables the form and says so.
    pub fn finish_submission(&mut self, form: FormKind, result: Result<(), SubmitError>) {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.form == form => in_flight,
            other => {
                self.in_flight = other;
                warn!("no {} submission in flight", form.slug());
                return;
            }
        };

        self.state.form_submitting = false;
        if let Some(button) = &in_flight.button {
            self.dom.set_disabled(button, false);
            self.dom.set_text(button, &in_flight.label);
        }

        match result {
            Ok(()) => {
                info!("{} form sent", form.slug());
                let path = self.settings.confirmation_path.clone();
                self.dom.navigate(&path);
            }
            Err(err) => {
                warn!("{} form failed: {}", form.slug(), err);
                self.show_notice(SEND_FAILED, NoticeKind::Warning);
            }
        }
    }

    fn show_notice(&mut self, message: &str, kind: NoticeKind) -> Option<NoticeId> {
        self.notices.show(
            &mut self.dom,
            &mut self.scheduler,
            self.settings.notice_lifetime_ms,
            message,
            kind,
        )
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn elements(&self) -> &Elements<D::Node> {
        &self.elements
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn submitter(&self) -> &U {
        &self.submitter
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn live_notices(&self) -> usize {
        self.notices.live()
    }
}

/// One row per element that exists; missing markup simply gets no listener.
pub fn bind_events<N>(elements: &Elements<N>) -> Bindings {
    let mut bindings = Bindings::new();

    if elements.menu_toggle.is_some() {
        bindings.bind(Source::MenuToggle, EventKind::Click, Handler::ToggleMenu);
    }
    for index in 0..elements.nav_links.len() {
        bindings.bind(Source::NavLink(index), EventKind::Click, Handler::NavClick);
    }
    if elements.accept_cookies.is_some() {
        bindings.bind(Source::AcceptCookies, EventKind::Click, Handler::AcceptCookies);
    }
    if elements.decline_cookies.is_some() {
        bindings.bind(Source::DeclineCookies, EventKind::Click, Handler::DeclineCookies);
    }
    if elements.contact_form.is_some() {
        bindings.bind(Source::ContactForm, EventKind::Submit, Handler::SubmitContact);
    }
    if elements.poll_form.is_some() {
        bindings.bind(Source::PollForm, EventKind::Submit, Handler::SubmitPoll);
    }
    if elements.scroll_top.is_some() {
        bindings.bind(Source::ScrollTop, EventKind::Click, Handler::ScrollToTop);
    }

    bindings.bind(Source::Window, EventKind::Scroll, Handler::BackToTop);
    bindings.bind(Source::Window, EventKind::Resize, Handler::CloseOnResize);
    bindings.bind(Source::Document, EventKind::Click, Handler::CloseOnOutsideClick);

    if !elements.sections.is_empty() {
        bindings.bind(Source::Window, EventKind::Scroll, Handler::ScrollSpy);
    }
    for index in 0..elements.counters.len() {
        bindings.bind(Source::Counter(index), EventKind::Intersect, Handler::CountUp);
    }

    bindings.bind(Source::Window, EventKind::Online, Handler::ConnectionRestored);
    bindings.bind(Source::Window, EventKind::Offline, Handler::ConnectionLost);

    bindings
}
