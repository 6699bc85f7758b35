use crate::config::Settings;
use crate::dom::{selectors, Dom};
use crate::elements::Elements;
use crate::events::Outcome;
use crate::scroll;
use crate::state::UiState;

/// Sets the menu state and writes it to the toggle, the panel and the body.
/// The body class only follows when the panel exists.
pub fn set_open<D: Dom>(dom: &mut D, elements: &Elements<D::Node>, state: &mut UiState, open: bool) {
    state.menu_open = open;
    if let Some(toggle) = &elements.menu_toggle {
        dom.set_attribute(toggle, "aria-expanded", if open { "true" } else { "false" });
    }
    if let Some(panel) = &elements.nav_panel {
        if open {
            dom.add_class(panel, selectors::SHOW);
        } else {
            dom.remove_class(panel, selectors::SHOW);
        }
        if let Some(body) = &elements.body {
            if open {
                dom.add_class(body, selectors::MENU_OPEN);
            } else {
                dom.remove_class(body, selectors::MENU_OPEN);
            }
        }
    }
}

pub fn toggle<D: Dom>(dom: &mut D, elements: &Elements<D::Node>, state: &mut UiState) -> Outcome {
    let open = !state.menu_open;
    log::debug!("menu {}", if open { "opened" } else { "closed" });
    set_open(dom, elements, state, open);
    Outcome::prevented()
}

pub fn close<D: Dom>(dom: &mut D, elements: &Elements<D::Node>, state: &mut UiState) {
    if state.menu_open {
        log::debug!("menu closed");
        set_open(dom, elements, state, false);
    }
}

/// In-page anchors close the menu and scroll below the sticky header;
/// other links close the menu and navigate normally.
pub fn nav_click<D: Dom>(
    dom: &mut D,
    elements: &Elements<D::Node>,
    state: &mut UiState,
    settings: &Settings,
    link: &D::Node,
) -> Outcome {
    let href = dom.attribute(link, "href").unwrap_or_default();
    let Some(anchor) = href.strip_prefix('#') else {
        close(dom, elements, state);
        return Outcome::default();
    };

    let target = if anchor.is_empty() {
        None
    } else {
        dom.query(&format!("[id=\"{}\"]", anchor))
    };
    if let Some(target) = target {
        close(dom, elements, state);
        scroll::scroll_to_anchor(dom, settings, &target);
    }
    Outcome::prevented()
}

pub fn close_on_outside_click<D: Dom>(
    dom: &mut D,
    elements: &Elements<D::Node>,
    state: &mut UiState,
    target: Option<&D::Node>,
) {
    if !state.menu_open {
        return;
    }
    let (Some(panel), Some(target)) = (&elements.nav_panel, target) else {
        return;
    };
    let inside_panel = dom.contains(panel, target);
    let on_toggle = elements
        .menu_toggle
        .as_ref()
        .map_or(false, |toggle| dom.contains(toggle, target));
    if !inside_panel && !on_toggle {
        close(dom, elements, state);
    }
}

pub fn close_on_resize<D: Dom>(
    dom: &mut D,
    elements: &Elements<D::Node>,
    state: &mut UiState,
    settings: &Settings,
) {
    if dom.inner_width() >= settings.desktop_breakpoint && state.menu_open {
        close(dom, elements, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryDom;

    #[test]
    fn body_class_needs_the_panel() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let toggle = dom.add(root, "button").class("navbar-toggler").id();
        let elements = Elements::cache(&dom);
        let mut state = UiState::default();

        set_open(&mut dom, &elements, &mut state, true);

        assert!(state.menu_open);
        assert_eq!(dom.attribute(&toggle, "aria-expanded").as_deref(), Some("true"));
        assert!(!dom.has_class(&root, selectors::MENU_OPEN));
    }

    #[test]
    fn close_is_a_no_op_when_already_closed() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let toggle = dom.add(root, "button").class("navbar-toggler").id();
        let elements = Elements::cache(&dom);
        let mut state = UiState::default();

        close(&mut dom, &elements, &mut state);

        assert_eq!(dom.attribute(&toggle, "aria-expanded"), None);
    }

    #[test]
    fn bare_hash_link_is_prevented_but_keeps_menu_open() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let panel = dom.add(root, "div").class("navbar-collapse").id();
        let link = dom.add(panel, "a").class("nav-link").attr("href", "#").id();
        let elements = Elements::cache(&dom);
        let mut state = UiState::default();
        set_open(&mut dom, &elements, &mut state, true);

        let outcome = nav_click(&mut dom, &elements, &mut state, &Settings::default(), &link);

        assert!(outcome.prevent_default);
        assert!(state.menu_open);
        assert!(dom.scroll_requests().is_empty());
    }
}
