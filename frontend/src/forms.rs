use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::{selectors, Dom, FieldMap};

pub mod submit;
pub mod validation;
#[cfg(all(target_arch = "wasm32", feature = "http-submit"))]
pub mod http;

/// Field name to the message shown under that field.
pub type FormErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Contact,
    Poll,
}

impl FormKind {
    pub fn selector(&self) -> &'static str {
        match self {
            FormKind::Contact => selectors::CONTACT_FORM,
            FormKind::Poll => selectors::POLL_FORM,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            FormKind::Contact => "contact",
            FormKind::Poll => "poll",
        }
    }

    pub fn validate(&self, fields: &FieldMap) -> FormErrors {
        match self {
            FormKind::Contact => validation::validate_contact(fields),
            FormKind::Poll => validation::validate_poll(fields),
        }
    }
}

/// Drops the invalid marker from every field and blanks every inline
/// message. Message elements stay in place for reuse.
pub fn clear_errors<D: Dom>(dom: &mut D, form: &D::Node) {
    for field in dom.query_all_in(form, selectors::INVALID) {
        dom.remove_class(&field, selectors::INVALID_CLASS);
    }
    for feedback in dom.query_all_in(form, selectors::FEEDBACK) {
        dom.set_text(&feedback, "");
    }
}

/// Marks each field named in `errors` and writes its message next to it,
/// then focuses the first marked field in document order. Errors for fields
/// the form does not contain are skipped.
pub fn show_errors<D: Dom>(dom: &mut D, form: &D::Node, errors: &FormErrors) {
    for (name, message) in errors {
        let Some(field) = dom.query_in(form, &format!("[name=\"{}\"]", name)) else {
            continue;
        };
        dom.add_class(&field, selectors::INVALID_CLASS);

        let Some(container) = dom.parent(&field) else {
            continue;
        };
        let feedback = match dom.query_in(&container, selectors::FEEDBACK) {
            Some(existing) => existing,
            None => {
                let created = dom.create_element("div");
                dom.add_class(&created, selectors::FEEDBACK_CLASS);
                dom.append_child(&container, &created);
                created
            }
        };
        dom.set_text(&feedback, message);
    }

    if let Some(first) = dom.query_in(form, selectors::INVALID) {
        dom.focus(&first);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDom, NodeId};
    use pretty_assertions::assert_eq;

    fn poll_form() -> (MemoryDom, NodeId, NodeId) {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let form = dom.add(root, "form").attr("id", "pollForm").id();
        let group = dom.add(form, "fieldset").id();
        let radio = dom
            .add(group, "input")
            .attr("type", "radio")
            .attr("name", "challenge")
            .attr("value", "time")
            .id();
        (dom, form, radio)
    }

    fn errors(pairs: &[(&str, &str)]) -> FormErrors {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn show_errors_creates_feedback_once_and_focuses() {
        let (mut dom, form, radio) = poll_form();
        let errs = errors(&[("challenge", "pick one")]);

        show_errors(&mut dom, &form, &errs);
        show_errors(&mut dom, &form, &errs);

        let feedback = dom.query_all_in(&form, selectors::FEEDBACK);
        assert_eq!(feedback.len(), 1);
        assert_eq!(dom.text(&feedback[0]), "pick one");
        assert!(dom.has_class(&radio, selectors::INVALID_CLASS));
        assert_eq!(dom.focused(), Some(radio));
    }

    #[test]
    fn clear_errors_keeps_feedback_nodes_but_blanks_them() {
        let (mut dom, form, radio) = poll_form();
        show_errors(&mut dom, &form, &errors(&[("challenge", "pick one")]));

        clear_errors(&mut dom, &form);

        assert!(!dom.has_class(&radio, selectors::INVALID_CLASS));
        let feedback = dom.query_all_in(&form, selectors::FEEDBACK);
        assert_eq!(feedback.len(), 1);
        assert_eq!(dom.text(&feedback[0]), "");
    }

    #[test]
    fn errors_for_absent_fields_are_ignored() {
        let (mut dom, form, _) = poll_form();
        show_errors(&mut dom, &form, &errors(&[("nope", "missing")]));

        assert!(dom.query_all_in(&form, selectors::FEEDBACK).is_empty());
        assert_eq!(dom.focused(), None);
    }

    #[test]
    fn focus_follows_document_order_not_error_order() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let form = dom.add(root, "form").id();
        let first_row = dom.add(form, "div").id();
        let zeta = dom.add(first_row, "input").attr("name", "zeta").id();
        let second_row = dom.add(form, "div").id();
        dom.add(second_row, "input").attr("name", "alpha");

        show_errors(&mut dom, &form, &errors(&[("alpha", "a"), ("zeta", "z")]));

        assert_eq!(dom.focused(), Some(zeta));
    }
}
