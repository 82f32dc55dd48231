//! Scroll progress bar.
//!
//! Appends `<div class="scroll-progress">` to the body and keeps its width at
//! the page's scroll percentage.

use crate::dom::{El, NodeId};
use crate::runtime::{Behavior, Context, PageEvent};

pub const PROGRESS_CLASS: &str = "scroll-progress";

#[derive(Default)]
pub struct ScrollProgress {
    bar: Option<NodeId>,
}

impl ScrollProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bar(&self) -> Option<NodeId> {
        self.bar
    }

    fn update(&self, cx: &mut Context<'_>) {
        let Some(bar) = self.bar else { return };
        let percent = cx.viewport().scroll_percent();
        cx.doc_mut()
            .node_mut(bar)
            .set_style("width", format!("{percent}%"));
    }
}

impl Behavior for ScrollProgress {
    fn name(&self) -> &'static str {
        "scroll-progress"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let body = cx.doc().body();
        self.bar = Some(cx.doc_mut().append(body, El::new("div").class(PROGRESS_CLASS)));
        self.update(cx);
    }

    fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>) {
        if matches!(event, PageEvent::Scroll | PageEvent::Resize) {
            self.update(cx);
        }
    }
}
