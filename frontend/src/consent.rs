use crate::dom::{selectors, Dom, KeyValueStore};
use crate::elements::Elements;
use crate::state::{CookieConsent, UiState};

/// Reads the stored decision and shows the banner only when there is none.
pub fn init<D: Dom, S: KeyValueStore>(
    dom: &mut D,
    store: &S,
    elements: &Elements<D::Node>,
    state: &mut UiState,
    key: &str,
) {
    state.cookie_consent = CookieConsent::from_stored(store.get(key).as_deref());
    if state.cookie_consent.is_decided() {
        return;
    }
    if let Some(banner) = &elements.cookie_banner {
        dom.add_class(banner, selectors::VISIBLE);
    }
}

/// Persists `decision` and hides the banner. Safe to repeat.
pub fn decide<D: Dom, S: KeyValueStore>(
    dom: &mut D,
    store: &mut S,
    elements: &Elements<D::Node>,
    state: &mut UiState,
    key: &str,
    decision: CookieConsent,
) {
    if let Some(value) = decision.as_stored() {
        store.set(key, value);
    }
    state.cookie_consent = decision;
    log::info!("cookie consent: {:?}", decision);
    if let Some(banner) = &elements.cookie_banner {
        dom.remove_class(banner, selectors::VISIBLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDom, MemoryStore};

    const KEY: &str = "cookieConsent";

    fn page() -> (MemoryDom, Elements<crate::dom::memory::NodeId>) {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let banner = dom.add(root, "div").attr("id", "cookieConsent").id();
        dom.add(banner, "button").attr("id", "acceptCookies");
        dom.add(banner, "button").attr("id", "declineCookies");
        let elements = Elements::cache(&dom);
        (dom, elements)
    }

    #[test]
    fn banner_shows_without_a_stored_decision() {
        let (mut dom, elements) = page();
        let mut state = UiState::default();
        init(&mut dom, &MemoryStore::new(), &elements, &mut state, KEY);

        let banner = elements.cookie_banner.unwrap();
        assert!(dom.has_class(&banner, selectors::VISIBLE));
        assert_eq!(state.cookie_consent, CookieConsent::Unset);
    }

    #[test]
    fn stored_decision_keeps_banner_hidden() {
        let (mut dom, elements) = page();
        let mut state = UiState::default();
        let store = MemoryStore::with_entry(KEY, "declined");
        init(&mut dom, &store, &elements, &mut state, KEY);

        let banner = elements.cookie_banner.unwrap();
        assert!(!dom.has_class(&banner, selectors::VISIBLE));
        assert_eq!(state.cookie_consent, CookieConsent::Declined);
    }

    #[test]
    fn deciding_twice_is_harmless() {
        let (mut dom, elements) = page();
        let mut state = UiState::default();
        let mut store = MemoryStore::new();
        init(&mut dom, &store, &elements, &mut state, KEY);

        for _ in 0..2 {
            decide(&mut dom, &mut store, &elements, &mut state, KEY, CookieConsent::Accepted);
        }

        let banner = elements.cookie_banner.unwrap();
        assert!(!dom.has_class(&banner, selectors::VISIBLE));
        assert_eq!(store.get(KEY).as_deref(), Some("accepted"));
        assert_eq!(state.cookie_consent, CookieConsent::Accepted);
    }
}
