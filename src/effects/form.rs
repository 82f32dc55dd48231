//! Client-side form validation.
//!
//! Applies to every `<form data-validate>`. Submission is always handled in
//! place: required fields with a blank value get `error`, and only a fully
//! valid form is captured, acknowledged through its `.form-success` element
//! and cleared.

use crate::dom::{Document, NodeId};
use crate::runtime::{Behavior, Context, PageEvent};
use crate::types::FormSubmission;
use tracing::debug;

pub const VALIDATE_ATTR: &str = "data-validate";
pub const ERROR_CLASS: &str = "error";
pub const SUCCESS_CLASS: &str = "form-success";
pub const VISIBLE_CLASS: &str = "visible";

const FIELD_TAGS: [&str; 3] = ["input", "select", "textarea"];

fn fields(doc: &Document, form: NodeId) -> Vec<NodeId> {
    doc.query_within(form, |n| n.tag().is_some_and(|t| FIELD_TAGS.contains(&t)))
}

/// Mark blank required fields with `error` and clear it from the rest.
/// Returns the number of invalid fields.
pub fn validate(doc: &mut Document, form: NodeId) -> usize {
    let mut invalid = 0;
    for field in fields(doc, form) {
        let node = doc.node_mut(field);
        if !node.has_attr("required") {
            continue;
        }
        let blank = node.value().trim().is_empty();
        node.toggle_class(ERROR_CLASS, blank);
        if blank {
            invalid += 1;
        }
    }
    invalid
}

#[derive(Default)]
pub struct FormValidation {
    forms: Vec<NodeId>,
}

impl FormValidation {
    pub fn new() -> Self {
        Self::default()
    }

    fn accept(&self, form: NodeId, cx: &mut Context<'_>) {
        let now = cx.now();
        let doc = cx.doc_mut();
        let inputs = fields(doc, form);
        let captured = inputs
            .iter()
            .filter_map(|&f| {
                let node = doc.node(f);
                node.attr("name")
                    .map(|name| (name.to_string(), node.value().to_string()))
            })
            .collect();
        let submission = FormSubmission {
            form_id: doc.node(form).id().map(str::to_string),
            fields: captured,
            submitted_at: now,
        };

        if let Some(&success) = doc
            .query_within(form, |n| n.has_class(SUCCESS_CLASS))
            .first()
        {
            doc.node_mut(success).add_class(VISIBLE_CLASS);
        }
        for field in inputs {
            doc.node_mut(field).set_value("");
        }
        debug!(form = ?submission.form_id, fields = submission.fields.len(), "form accepted");
        cx.record_submission(submission);
    }
}

impl Behavior for FormValidation {
    fn name(&self) -> &'static str {
        "form-validation"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        self.forms = cx
            .doc()
            .query(|n| n.tag() == Some("form") && n.has_attr(VALIDATE_ATTR));
        if self.forms.is_empty() {
            debug!("no validated forms on page");
        }
    }

    fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>) {
        let PageEvent::Submit { form } = *event else {
            return;
        };
        if !self.forms.contains(&form) {
            return;
        }
        cx.prevent_default();
        let invalid = validate(cx.doc_mut(), form);
        if invalid > 0 {
            debug!(invalid, "form rejected");
            return;
        }
        self.accept(form, cx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn contact_form(validated: bool) -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        let mut form = El::new("form").id("contact-form");
        if validated {
            form = form.attr(VALIDATE_ATTR, "");
        }
        let form = doc.append(body, form);
        doc.append(
            form,
            El::new("input").id("name").attr("name", "name").attr("required", ""),
        );
        doc.append(
            form,
            El::new("input").id("email").attr("name", "email").attr("required", ""),
        );
        doc.append(form, El::new("textarea").id("message").attr("name", "message"));
        doc.append(form, El::new("div").id("done").class(SUCCESS_CLASS));
        doc
    }

    fn fill(rt: &mut Runtime, id: &str, value: &str) {
        let node = find_id(rt.document(), id);
        rt.page_mut().document.node_mut(node).set_value(value);
    }

    #[test]
    fn blank_required_fields_are_flagged_and_submission_stops() {
        let mut rt = ready_runtime(contact_form(true));
        rt.register(FormValidation::new());
        fill(&mut rt, "name", "   ");
        let form = find_id(rt.document(), "contact-form");

        assert!(rt.submit(form));
        let doc = rt.document();
        assert!(has_class(doc, find_id(doc, "name"), ERROR_CLASS));
        assert!(has_class(doc, find_id(doc, "email"), ERROR_CLASS));
        assert!(!has_class(doc, find_id(doc, "message"), ERROR_CLASS));
        assert!(!has_class(doc, find_id(doc, "done"), VISIBLE_CLASS));
        assert!(rt.page().submissions.is_empty());
    }

    #[test]
    fn fixing_a_field_clears_its_error() {
        let mut rt = ready_runtime(contact_form(true));
        rt.register(FormValidation::new());
        let form = find_id(rt.document(), "contact-form");
        rt.submit(form);
        fill(&mut rt, "name", "Ada");
        rt.submit(form);
        let doc = rt.document();
        assert!(!has_class(doc, find_id(doc, "name"), ERROR_CLASS));
        assert!(has_class(doc, find_id(doc, "email"), ERROR_CLASS));
    }

    #[test]
    fn valid_form_is_captured_acknowledged_and_reset() {
        let mut rt = ready_runtime(contact_form(true));
        rt.register(FormValidation::new());
        fill(&mut rt, "name", "Ada Lovelace");
        fill(&mut rt, "email", "ada@example.org");
        fill(&mut rt, "message", "Hello");
        rt.advance(1200);
        let form = find_id(rt.document(), "contact-form");

        assert!(rt.submit(form));
        let submission = &rt.page().submissions[0];
        assert_eq!(submission.form_id.as_deref(), Some("contact-form"));
        assert_eq!(submission.field("email"), Some("ada@example.org"));
        assert_eq!(submission.field("message"), Some("Hello"));
        assert_eq!(submission.submitted_at, 1200);

        let doc = rt.document();
        assert!(has_class(doc, find_id(doc, "done"), VISIBLE_CLASS));
        for field in ["name", "email", "message"] {
            assert_eq!(doc.node(find_id(doc, field)).value(), "");
        }
    }

    #[test]
    fn forms_without_marker_are_left_alone() {
        let mut rt = ready_runtime(contact_form(false));
        rt.register(FormValidation::new());
        let form = find_id(rt.document(), "contact-form");
        assert!(!rt.submit(form));
        let doc = rt.document();
        assert!(!has_class(doc, find_id(doc, "name"), ERROR_CLASS));
    }

    #[test]
    fn validate_counts_invalid() {
        let mut doc = contact_form(true);
        let form = find_id(&doc, "contact-form");
        assert_eq!(validate(&mut doc, form), 2);
        let email = find_id(&doc, "email");
        doc.node_mut(email).set_value("x@y.z");
        assert_eq!(validate(&mut doc, form), 1);
    }
}
