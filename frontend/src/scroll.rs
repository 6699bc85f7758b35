use crate::config::Settings;
use crate::dom::{parse_int, selectors, Dom};
use crate::elements::Elements;

/// Sticky header height from `--header-h`, or the fallback when the
/// property is missing, zero or not a number.
pub fn header_offset<D: Dom>(dom: &D, settings: &Settings) -> f64 {
    match dom
        .css_var(selectors::HEADER_HEIGHT_VAR)
        .and_then(|value| parse_int(&value))
    {
        Some(height) if height != 0 => height as f64,
        _ => settings.header_fallback,
    }
}

pub fn scroll_to_anchor<D: Dom>(dom: &mut D, settings: &Settings, target: &D::Node) {
    let top = dom.document_top(target) - header_offset(dom, settings) - settings.header_margin;
    dom.scroll_to(top, true);
}

pub fn scroll_to_top<D: Dom>(dom: &mut D) {
    dom.scroll_to(0.0, true);
}

pub fn update_back_to_top<D: Dom>(dom: &mut D, elements: &Elements<D::Node>, settings: &Settings) {
    let Some(button) = &elements.scroll_top else {
        return;
    };
    if dom.scroll_y() > settings.back_to_top_after {
        dom.add_class(button, selectors::VISIBLE);
    } else {
        dom.remove_class(button, selectors::VISIBLE);
    }
}

/// Highlights the nav link of the section under the scroll position plus
/// the lookahead. Returns the id of the section that won, if any. When no
/// section matches the links are left as they were.
pub fn spy<D: Dom>(dom: &mut D, elements: &Elements<D::Node>, settings: &Settings) -> Option<String> {
    let position = dom.scroll_y() + settings.spy_lookahead;
    let mut active = None;

    for section in &elements.sections {
        let top = dom.offset_top(section);
        let bottom = top + dom.offset_height(section);
        if position < top || position >= bottom {
            continue;
        }
        let Some(id) = dom.attribute(section, "id") else {
            continue;
        };
        let href = format!("#{}", id);
        for link in &elements.nav_links {
            dom.remove_class(link, selectors::ACTIVE);
            dom.remove_attribute(link, "aria-current");
            if dom.attribute(link, "href").as_deref() == Some(href.as_str()) {
                dom.add_class(link, selectors::ACTIVE);
                dom.set_attribute(link, "aria-current", "page");
            }
        }
        active = Some(id);
    }

    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDom, NodeId};

    fn page() -> (MemoryDom, Elements<NodeId>, [NodeId; 2]) {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let nav = dom.add(root, "nav").id();
        let home = dom.add(nav, "a").class("nav-link").attr("href", "#home").id();
        let about = dom.add(nav, "a").class("nav-link").attr("href", "#about").id();
        dom.add(root, "section").attr("id", "home").layout(0.0, 600.0);
        dom.add(root, "section").attr("id", "about").layout(600.0, 800.0);
        dom.add(root, "button").attr("data-scroll-top", "");
        let elements = Elements::cache(&dom);
        (dom, elements, [home, about])
    }

    #[test]
    fn spy_uses_lookahead() {
        let (mut dom, elements, [home, about]) = page();
        let settings = Settings::default();

        dom.set_scroll_y(479.0);
        assert_eq!(spy(&mut dom, &elements, &settings).as_deref(), Some("home"));
        assert!(dom.has_class(&home, selectors::ACTIVE));
        assert_eq!(dom.attribute(&home, "aria-current").as_deref(), Some("page"));

        dom.set_scroll_y(480.0);
        assert_eq!(spy(&mut dom, &elements, &settings).as_deref(), Some("about"));
        assert!(!dom.has_class(&home, selectors::ACTIVE));
        assert_eq!(dom.attribute(&home, "aria-current"), None);
        assert!(dom.has_class(&about, selectors::ACTIVE));
    }

    #[test]
    fn spy_leaves_links_alone_past_the_last_section() {
        let (mut dom, elements, [_, about]) = page();
        let settings = Settings::default();
        dom.set_scroll_y(700.0);
        spy(&mut dom, &elements, &settings);

        dom.set_scroll_y(5000.0);
        assert_eq!(spy(&mut dom, &elements, &settings), None);
        assert!(dom.has_class(&about, selectors::ACTIVE));
    }

    #[test]
    fn back_to_top_appears_strictly_after_threshold() {
        let (mut dom, elements, _) = page();
        let settings = Settings::default();
        let button = elements.scroll_top.unwrap();

        dom.set_scroll_y(300.0);
        update_back_to_top(&mut dom, &elements, &settings);
        assert!(!dom.has_class(&button, selectors::VISIBLE));

        dom.set_scroll_y(301.0);
        update_back_to_top(&mut dom, &elements, &settings);
        assert!(dom.has_class(&button, selectors::VISIBLE));

        scroll_to_top(&mut dom);
        update_back_to_top(&mut dom, &elements, &settings);
        assert!(!dom.has_class(&button, selectors::VISIBLE));
    }

    #[test]
    fn header_offset_reads_css_property() {
        let mut dom = MemoryDom::new();
        let settings = Settings::default();
        assert_eq!(header_offset(&dom, &settings), 80.0);

        dom.set_css_var("--header-h", " 64px");
        assert_eq!(header_offset(&dom, &settings), 64.0);

        dom.set_css_var("--header-h", "0px");
        assert_eq!(header_offset(&dom, &settings), 80.0);

        dom.set_css_var("--header-h", "auto");
        assert_eq!(header_offset(&dom, &settings), 80.0);
    }
}
