#![allow(dead_code)]

use brochure_frontend::config::Settings;
use brochure_frontend::dom::memory::{MemoryDom, MemoryStore, NodeId};
use brochure_frontend::forms::submit::SimulatedSubmitter;
use brochure_frontend::PageController;

pub type TestController = PageController<MemoryDom, MemoryStore, SimulatedSubmitter>;

/// Handles to the interesting parts of [`landing_page`].
pub struct Page {
    pub dom: MemoryDom,
    pub toggle: NodeId,
    pub panel: NodeId,
    pub links: Vec<NodeId>,
    pub banner: NodeId,
    pub container: NodeId,
    pub hero_text: NodeId,
    pub contact: ContactForm,
    pub poll: PollForm,
    pub scroll_top: NodeId,
    pub counter: NodeId,
}

pub struct ContactForm {
    pub form: NodeId,
    pub first_name: NodeId,
    pub last_name: NodeId,
    pub email: NodeId,
    pub subject: NodeId,
    pub message: NodeId,
    pub consent: NodeId,
    pub submit: NodeId,
}

pub struct PollForm {
    pub form: NodeId,
    pub options: Vec<NodeId>,
    pub submit: NodeId,
}

fn field(dom: &mut MemoryDom, form: NodeId, tag: &str, name: &str) -> NodeId {
    let group = dom.add(form, "div").class("mb-3").id();
    dom.add(group, "label").text(name);
    dom.add(group, tag).attr("name", name).id()
}

/// A one-page site with every interactive element the controller knows.
pub fn landing_page() -> Page {
    let mut dom = MemoryDom::new();
    let root = dom.root();

    let header = dom.add(root, "header").id();
    let toggle = dom
        .add(header, "button")
        .class("navbar-toggler")
        .attr("aria-expanded", "false")
        .id();
    let panel = dom.add(header, "div").class("navbar-collapse").id();
    let links: Vec<NodeId> = ["#home", "#about", "#contact", "impressum.html"]
        .iter()
        .map(|href| dom.add(panel, "a").class("nav-link").attr("href", href).id())
        .collect();

    let container = dom.add(root, "main").class("container").id();
    let home = dom
        .add(container, "section")
        .attr("id", "home")
        .layout(0.0, 700.0)
        .id();
    let hero_text = dom.add(home, "h1").text("Willkommen").id();
    let about = dom
        .add(container, "section")
        .attr("id", "about")
        .layout(700.0, 900.0)
        .id();
    let counter = dom
        .add(about, "span")
        .attr("data-count-up", "250")
        .text("0")
        .id();

    let contact_section = dom
        .add(container, "section")
        .attr("id", "contact")
        .layout(1600.0, 1200.0)
        .id();
    let form = dom.add(contact_section, "form").attr("id", "contactForm").id();
    let first_name = field(&mut dom, form, "input", "firstName");
    let last_name = field(&mut dom, form, "input", "lastName");
    let email = field(&mut dom, form, "input", "email");
    let subject = field(&mut dom, form, "input", "subject");
    let message = field(&mut dom, form, "textarea", "message");
    let consent_row = dom.add(form, "div").class("form-check").id();
    let consent = dom
        .add(consent_row, "input")
        .attr("type", "checkbox")
        .attr("name", "privacyConsent")
        .id();
    let submit = dom
        .add(form, "button")
        .attr("type", "submit")
        .text("Nachricht senden")
        .id();
    let contact = ContactForm {
        form,
        first_name,
        last_name,
        email,
        subject,
        message,
        consent,
        submit,
    };

    let poll_form = dom.add(contact_section, "form").attr("id", "pollForm").id();
    let group = dom.add(poll_form, "fieldset").id();
    let options: Vec<NodeId> = ["time", "budget", "skills"]
        .iter()
        .map(|value| {
            dom.add(group, "input")
                .attr("type", "radio")
                .attr("name", "challenge")
                .attr("value", value)
                .id()
        })
        .collect();
    let poll_submit = dom
        .add(poll_form, "button")
        .attr("type", "submit")
        .text("Abstimmen")
        .id();
    let poll = PollForm {
        form: poll_form,
        options,
        submit: poll_submit,
    };

    let scroll_top = dom.add(root, "button").attr("data-scroll-top", "").id();
    let banner = dom.add(root, "div").attr("id", "cookieConsent").id();
    dom.add(banner, "button").attr("id", "acceptCookies");
    dom.add(banner, "button").attr("id", "declineCookies");

    Page {
        dom,
        toggle,
        panel,
        links,
        banner,
        container,
        hero_text,
        contact,
        poll,
        scroll_top,
        counter,
    }
}

pub fn fill_valid_contact(dom: &mut MemoryDom, form: &ContactForm) {
    dom.set_value(form.first_name, "Ada");
    dom.set_value(form.last_name, "Lovelace");
    dom.set_value(form.email, "ada@example.org");
    dom.set_value(form.subject, "Anfrage");
    dom.set_value(form.message, "Bitte melden Sie sich bei mir.");
    dom.set_checked(form.consent, true);
}

pub fn start(dom: MemoryDom) -> TestController {
    start_with_store(dom, MemoryStore::new())
}

pub fn start_with_store(dom: MemoryDom, store: MemoryStore) -> TestController {
    let settings = Settings::default();
    let submitter = SimulatedSubmitter::new(settings.submit_latency_ms);
    PageController::start(dom, store, submitter, settings)
}
