//! Headless document used by tests and by anything that wants to drive the
//! controller without a browser.
//!
//! Layout is explicit: each element carries its own `top` and `height`, so
//! `offset_top` and `document_top` are the same value here.

use std::collections::{BTreeMap, HashMap};
use std::iter::Peekable;
use std::str::Chars;

use super::{Dom, FieldMap, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    value: String,
    checked: bool,
    disabled: bool,
    top: f64,
    height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub smooth: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryDom {
    elements: Vec<Element>,
    body: NodeId,
    focused: Option<NodeId>,
    scroll_y: f64,
    inner_width: f64,
    css_vars: HashMap<String, String>,
    online: bool,
    navigations: Vec<String>,
    scroll_requests: Vec<ScrollRequest>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let body = Element {
            tag: "body".to_string(),
            ..Element::default()
        };
        Self {
            elements: vec![body],
            body: NodeId(0),
            focused: None,
            scroll_y: 0.0,
            inner_width: 1024.0,
            css_vars: HashMap::new(),
            online: true,
            navigations: Vec::new(),
            scroll_requests: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.body
    }

    /// Appends a new `tag` element under `parent` and returns a builder for it.
    pub fn add(&mut self, parent: NodeId, tag: &str) -> ElementBuilder<'_> {
        let id = self.create_element(tag);
        self.append_child(&parent, &id);
        ElementBuilder { dom: self, id }
    }

    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    pub fn set_inner_width(&mut self, width: f64) {
        self.inner_width = width;
    }

    pub fn set_css_var(&mut self, name: &str, value: &str) {
        self.css_vars.insert(name.to_string(), value.to_string());
    }

    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.elements[node.0].value = value.to_string();
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        self.elements[node.0].checked = checked;
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.elements[node.0].disabled
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.elements[id.0].parent;
        }
        false
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.elements[node.0].children
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    /// Attached descendants of `root` in document order, `root` excluded.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.elements[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.elements[id.0].children.iter().rev().copied());
        }
        out
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        let element = &self.elements[node.0];
        if let Some(tag) = &selector.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &selector.id {
            if element.attributes.get("id") != Some(id) {
                return false;
            }
        }
        if !selector.classes.iter().all(|c| element.classes.contains(c)) {
            return false;
        }
        selector.attributes.iter().all(|(name, expected)| {
            match (element.attributes.get(name), expected) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
            }
        })
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.elements[node.0].parent.take() {
            self.elements[parent.0].children.retain(|c| *c != node);
        }
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let parsed = Selector::parse(selector);
        std::iter::once(self.body)
            .chain(self.descendants(self.body))
            .filter(|id| self.matches(*id, &parsed))
            .collect()
    }

    fn query_in(&self, root: &NodeId, selector: &str) -> Option<NodeId> {
        self.query_all_in(root, selector).into_iter().next()
    }

    fn query_all_in(&self, root: &NodeId, selector: &str) -> Vec<NodeId> {
        let parsed = Selector::parse(selector);
        self.descendants(*root)
            .into_iter()
            .filter(|id| self.matches(*id, &parsed))
            .collect()
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.elements[node.0].parent
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            current = self.elements[id.0].parent;
        }
        false
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.elements[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.elements[node.0].classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        self.elements[node.0].classes.retain(|c| c != class);
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.elements[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if name == "class" {
            self.elements[node.0].classes = value.split_whitespace().map(str::to_string).collect();
            return;
        }
        self.elements[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        self.elements[node.0].attributes.remove(name);
    }

    fn text(&self, node: &NodeId) -> String {
        self.elements[node.0].text.clone()
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.elements[node.0].text = text.to_string();
    }

    fn set_disabled(&mut self, node: &NodeId, disabled: bool) {
        self.elements[node.0].disabled = disabled;
    }

    fn focus(&mut self, node: &NodeId) {
        self.focused = Some(*node);
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.elements.push(Element {
            tag: tag.to_string(),
            ..Element::default()
        });
        NodeId(self.elements.len() - 1)
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.detach(*child);
        self.elements[child.0].parent = Some(*parent);
        self.elements[parent.0].children.push(*child);
    }

    fn prepend_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.detach(*child);
        self.elements[child.0].parent = Some(*parent);
        self.elements[parent.0].children.insert(0, *child);
    }

    fn remove(&mut self, node: &NodeId) {
        self.detach(*node);
        if self.focused.map_or(false, |f| self.contains(node, &f)) {
            self.focused = None;
        }
    }

    fn form_values(&self, form: &NodeId) -> FieldMap {
        let mut values = FieldMap::new();
        for id in self.descendants(*form) {
            let element = &self.elements[id.0];
            let Some(name) = element.attributes.get("name") else {
                continue;
            };
            if element.disabled || name.is_empty() {
                continue;
            }
            let kind = element.attributes.get("type").map(String::as_str);
            let value = match (element.tag.as_str(), kind) {
                ("input", Some("checkbox" | "radio")) => {
                    if !element.checked {
                        continue;
                    }
                    element
                        .attributes
                        .get("value")
                        .cloned()
                        .unwrap_or_else(|| "on".to_string())
                }
                ("input", Some("submit" | "button" | "reset")) => continue,
                ("input" | "textarea" | "select", _) => element.value.clone(),
                _ => continue,
            };
            values.insert(name.clone(), value);
        }
        values
    }

    fn offset_top(&self, node: &NodeId) -> f64 {
        self.elements[node.0].top
    }

    fn offset_height(&self, node: &NodeId) -> f64 {
        self.elements[node.0].height
    }

    fn document_top(&self, node: &NodeId) -> f64 {
        self.elements[node.0].top
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn inner_width(&self) -> f64 {
        self.inner_width
    }

    fn scroll_to(&mut self, top: f64, smooth: bool) {
        self.scroll_requests.push(ScrollRequest { top, smooth });
        self.scroll_y = top.max(0.0);
    }

    fn css_var(&self, name: &str) -> Option<String> {
        self.css_vars.get(name).cloned()
    }

    fn navigate(&mut self, href: &str) {
        self.navigations.push(href.to_string());
    }

    fn is_online(&self) -> bool {
        self.online
    }
}

pub struct ElementBuilder<'a> {
    dom: &'a mut MemoryDom,
    id: NodeId,
}

impl<'a> ElementBuilder<'a> {
    pub fn class(mut self, class: &str) -> Self {
        self.dom.add_class(&self.id, class);
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.dom.set_attribute(&self.id, name, value);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.dom.set_text(&self.id, text);
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.dom.set_value(self.id, value);
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.dom.set_checked(self.id, checked);
        self
    }

    pub fn layout(mut self, top: f64, height: f64) -> Self {
        let element = &mut self.dom.elements[self.id.0];
        element.top = top;
        element.height = height;
        self
    }

    pub fn id(self) -> NodeId {
        self.id
    }
}

/// A single compound selector: `tag`, `#id`, `.class`, `[attr]` and
/// `[attr="value"]` in any combination. No combinators.
#[derive(Debug, Default, PartialEq)]
struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Selector {
    fn parse(input: &str) -> Self {
        let mut selector = Selector::default();
        let mut chars = input.trim().chars().peekable();

        let tag = ident(&mut chars);
        if !tag.is_empty() {
            selector.tag = Some(tag);
        }
        while let Some(c) = chars.next() {
            match c {
                '.' => selector.classes.push(ident(&mut chars)),
                '#' => selector.id = Some(ident(&mut chars)),
                '[' => {
                    let mut body = String::new();
                    for c in chars.by_ref() {
                        if c == ']' {
                            break;
                        }
                        body.push(c);
                    }
                    let attribute = match body.split_once('=') {
                        Some((name, value)) => (
                            name.trim().to_string(),
                            Some(value.trim().trim_matches(|c| c == '"' || c == '\'').to_string()),
                        ),
                        None => (body.trim().to_string(), None),
                    };
                    selector.attributes.push(attribute);
                }
                _ => {}
            }
        }
        selector
    }
}

fn ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    out
}

/// In-memory stand-in for `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.set(key, value);
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selector_parses_compound_forms() {
        assert_eq!(
            Selector::parse("button[type=\"submit\"]"),
            Selector {
                tag: Some("button".to_string()),
                attributes: vec![("type".to_string(), Some("submit".to_string()))],
                ..Selector::default()
            }
        );
        assert_eq!(
            Selector::parse("section[id]"),
            Selector {
                tag: Some("section".to_string()),
                attributes: vec![("id".to_string(), None)],
                ..Selector::default()
            }
        );
        let nav = Selector::parse(".navbar-collapse.show");
        assert_eq!(nav.classes, vec!["navbar-collapse".to_string(), "show".to_string()]);
    }

    #[test]
    fn queries_follow_document_order() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let first = dom.add(root, "div").class("item").id();
        let nested = dom.add(first, "span").class("item").id();
        let second = dom.add(root, "div").class("item").id();

        assert_eq!(dom.query_all(".item"), vec![first, nested, second]);
        assert_eq!(dom.query_in(&first, ".item"), Some(nested));
        assert_eq!(dom.query("#missing"), None);
    }

    #[test]
    fn removed_nodes_leave_the_tree() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let host = dom.add(root, "div").class("container").id();
        let child = dom.add(host, "p").id();
        dom.focus(&child);

        dom.remove(&child);
        assert!(!dom.is_attached(child));
        assert!(dom.children(host).is_empty());
        assert_eq!(dom.focused(), None);
    }

    #[test]
    fn form_values_skip_unchecked_and_disabled_controls() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let form = dom.add(root, "form").attr("id", "f").id();
        dom.add(form, "input").attr("name", "firstName").value("Ada");
        dom.add(form, "textarea").attr("name", "message").value("hello");
        dom.add(form, "input").attr("name", "consent").attr("type", "checkbox");
        dom.add(form, "input")
            .attr("name", "choice")
            .attr("type", "radio")
            .attr("value", "b")
            .checked(true);
        let disabled = dom.add(form, "input").attr("name", "skip").value("x").id();
        dom.set_disabled(&disabled, true);
        dom.add(form, "button").attr("type", "submit").text("Send");

        let values = dom.form_values(&form);
        let expected: FieldMap = [("choice", "b"), ("firstName", "Ada"), ("message", "hello")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(values, expected);
    }
}
