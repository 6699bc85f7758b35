use crate::dom::{selectors, Dom};

/// Interactive elements looked up once at start-up. Anything the markup
/// leaves out is simply `None` or empty.
#[derive(Debug, Clone)]
pub struct Elements<N> {
    pub body: Option<N>,
    pub menu_toggle: Option<N>,
    pub nav_panel: Option<N>,
    pub nav_links: Vec<N>,
    pub cookie_banner: Option<N>,
    pub accept_cookies: Option<N>,
    pub decline_cookies: Option<N>,
    pub contact_form: Option<N>,
    pub poll_form: Option<N>,
    pub scroll_top: Option<N>,
    pub sections: Vec<N>,
    pub counters: Vec<N>,
}

impl<N: Clone> Elements<N> {
    pub fn cache<D: Dom<Node = N>>(dom: &D) -> Self {
        Self {
            body: dom.body(),
            menu_toggle: dom.query(selectors::MENU_TOGGLE),
            nav_panel: dom.query(selectors::NAV_PANEL),
            nav_links: dom.query_all(selectors::NAV_LINK),
            cookie_banner: dom.query(selectors::COOKIE_BANNER),
            accept_cookies: dom.query(selectors::ACCEPT_COOKIES),
            decline_cookies: dom.query(selectors::DECLINE_COOKIES),
            contact_form: dom.query(selectors::CONTACT_FORM),
            poll_form: dom.query(selectors::POLL_FORM),
            scroll_top: dom.query(selectors::SCROLL_TOP),
            sections: dom.query_all(selectors::SECTION),
            counters: dom.query_all(selectors::COUNTER),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "nav links: {}, sections: {}, counters: {}, contact form: {}, poll form: {}, cookie banner: {}",
            self.nav_links.len(),
            self.sections.len(),
            self.counters.len(),
            self.contact_form.is_some(),
            self.poll_form.is_some(),
            self.cookie_banner.is_some(),
        )
    }
}
