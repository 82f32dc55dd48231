//! FAQ accordion: at most one `.faq-item` is open at a time.

use crate::dom::NodeId;
use crate::runtime::{Behavior, Context, PageEvent};
use tracing::debug;

pub const ITEM_CLASS: &str = "faq-item";
pub const QUESTION_CLASS: &str = "faq-question";
pub const OPEN_CLASS: &str = "open";

#[derive(Default)]
pub struct Faq {
    items: Vec<NodeId>,
}

impl Faq {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently open item, if any.
    pub fn open_item(&self, cx: &Context<'_>) -> Option<NodeId> {
        self.items
            .iter()
            .copied()
            .find(|&item| cx.doc().node(item).has_class(OPEN_CLASS))
    }

    fn toggle(&self, clicked: NodeId, cx: &mut Context<'_>) {
        let doc = cx.doc_mut();
        let was_open = doc.node(clicked).has_class(OPEN_CLASS);
        for &item in &self.items {
            doc.node_mut(item).remove_class(OPEN_CLASS);
        }
        doc.node_mut(clicked).toggle_class(OPEN_CLASS, !was_open);
    }
}

impl Behavior for Faq {
    fn name(&self) -> &'static str {
        "faq"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        self.items = cx.doc().query_class(ITEM_CLASS);
        if self.items.is_empty() {
            debug!("no FAQ items on page");
        }
    }

    fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>) {
        let PageEvent::Click { target } = *event else {
            return;
        };
        let doc = cx.doc();
        let Some(question) = doc.closest(target, |n| n.has_class(QUESTION_CLASS)) else {
            return;
        };
        let Some(item) = doc.closest(question, |n| n.has_class(ITEM_CLASS)) else {
            return;
        };
        if self.items.contains(&item) {
            self.toggle(item, cx);
        }
    }
}
