//! The document surface the page controller talks to.
//!
//! Everything the controller needs from a browser page goes through [`Dom`]
//! and [`KeyValueStore`], so the same code runs against the live document
//! (`web` module, wasm only) and against [`memory::MemoryDom`] in tests.

pub mod memory;

use std::collections::BTreeMap;
use std::fmt::Debug;

/// Named form fields, one value per name; a later control with the same name wins.
pub type FieldMap = BTreeMap<String, String>;

/// Selectors and class names shared with the page markup.
pub mod selectors {
    pub const MENU_TOGGLE: &str = ".navbar-toggler";
    pub const NAV_PANEL: &str = ".navbar-collapse";
    pub const NAV_LINK: &str = ".nav-link";
    pub const COOKIE_BANNER: &str = "#cookieConsent";
    pub const ACCEPT_COOKIES: &str = "#acceptCookies";
    pub const DECLINE_COOKIES: &str = "#declineCookies";
    pub const CONTACT_FORM: &str = "#contactForm";
    pub const POLL_FORM: &str = "#pollForm";
    pub const SCROLL_TOP: &str = "[data-scroll-top]";
    pub const SECTION: &str = "section[id]";
    pub const COUNTER: &str = "[data-count-up]";
    pub const NOTICE_HOST: &str = ".container";
    pub const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";
    pub const INVALID: &str = ".is-invalid";
    pub const FEEDBACK: &str = ".invalid-feedback";

    pub const SHOW: &str = "show";
    pub const MENU_OPEN: &str = "menu-open";
    pub const VISIBLE: &str = "is-visible";
    pub const ACTIVE: &str = "active";
    pub const INVALID_CLASS: &str = "is-invalid";
    pub const FEEDBACK_CLASS: &str = "invalid-feedback";
    pub const COUNTED: &str = "counted";

    pub const COUNT_UP_ATTR: &str = "data-count-up";
    pub const HEADER_HEIGHT_VAR: &str = "--header-h";
}

pub trait Dom {
    type Node: Clone + PartialEq + Debug;

    fn query(&self, selector: &str) -> Option<Self::Node>;
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn query_in(&self, root: &Self::Node, selector: &str) -> Option<Self::Node>;
    fn query_all_in(&self, root: &Self::Node, selector: &str) -> Vec<Self::Node>;
    fn body(&self) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Inclusive: a node contains itself.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);
    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&mut self, node: &Self::Node, text: &str);
    fn set_disabled(&mut self, node: &Self::Node, disabled: bool);
    fn focus(&mut self, node: &Self::Node);

    fn create_element(&mut self, tag: &str) -> Self::Node;
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);
    fn prepend_child(&mut self, parent: &Self::Node, child: &Self::Node);
    fn remove(&mut self, node: &Self::Node);

    /// Successful controls of a form, as `FormData` would collect them.
    fn form_values(&self, form: &Self::Node) -> FieldMap;

    fn offset_top(&self, node: &Self::Node) -> f64;
    fn offset_height(&self, node: &Self::Node) -> f64;
    /// Top edge relative to the document, independent of offset parents.
    fn document_top(&self, node: &Self::Node) -> f64;
    fn scroll_y(&self) -> f64;
    fn inner_width(&self) -> f64;
    fn scroll_to(&mut self, top: f64, smooth: bool);
    fn css_var(&self, name: &str) -> Option<String>;
    fn navigate(&mut self, href: &str);
    fn is_online(&self) -> bool;
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Integer prefix of `input` the way `parseInt(input, 10)` reads it.
pub fn parse_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let value = digits.parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}
