//! Page loader overlay.
//!
//! ```text
//!            complete at attach ─┐
//!   load + min_display_ms ───────┼──► Hiding ── exit_ms ──► Removed
//!   max_wait_ms after attach ────┘   (class `hidden`)       (detached)
//! ```
//!
//! Whichever trigger comes first wins; the others fire later and find
//! nothing left to do.

use crate::config::LoaderConfig;
use crate::dom::NodeId;
use crate::page::ReadyState;
use crate::runtime::{Behavior, Context, PageEvent};
use crate::scheduler::TaskId;
use serde::Serialize;
use tracing::debug;

pub const HIDDEN_CLASS: &str = "hidden";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderState {
    Visible,
    Hiding,
    Removed,
}

pub struct Loader {
    config: LoaderConfig,
    element: Option<NodeId>,
    state: LoaderState,
    /// Timers that start hiding: the load floor and the ceiling.
    hide_triggers: Vec<TaskId>,
    removal: Option<TaskId>,
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            element: None,
            state: LoaderState::Visible,
            hide_triggers: Vec::new(),
            removal: None,
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    fn hide(&mut self, cx: &mut Context<'_>, reason: &'static str) {
        if self.state != LoaderState::Visible {
            return;
        }
        let Some(element) = self.element else { return };
        cx.doc_mut().node_mut(element).add_class(HIDDEN_CLASS);
        self.removal = Some(cx.set_timeout(self.config.exit_ms));
        self.state = LoaderState::Hiding;
        debug!(reason, at = cx.now(), "hiding page loader");
    }

    fn remove(&mut self, cx: &mut Context<'_>) {
        if let Some(element) = self.element {
            cx.doc_mut().remove(element);
        }
        self.state = LoaderState::Removed;
        debug!(at = cx.now(), "page loader removed");
    }
}

impl Behavior for Loader {
    fn name(&self) -> &'static str {
        "loader"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        self.element = cx.doc().get_by_id(&self.config.element_id);
        if self.element.is_none() {
            debug!(id = %self.config.element_id, "no loader element on page");
            self.state = LoaderState::Removed;
            return;
        }
        if cx.ready_state() == ReadyState::Complete {
            self.hide(cx, "already loaded");
            return;
        }
        self.hide_triggers.push(cx.set_timeout(self.config.max_wait_ms));
    }

    fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>) {
        match *event {
            PageEvent::Load if self.state == LoaderState::Visible => {
                self.hide_triggers.push(cx.set_timeout(self.config.min_display_ms));
            }
            PageEvent::Timer { task } if Some(task) == self.removal => {
                self.removal = None;
                self.remove(cx);
            }
            PageEvent::Timer { task } if self.hide_triggers.contains(&task) => {
                self.hide_triggers.retain(|&t| t != task);
                let reason = if cx.ready_state() == ReadyState::Complete {
                    "loaded"
                } else {
                    "max wait elapsed"
                };
                self.hide(cx, reason);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn with_loader() -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, El::new("div").id("page-loader").class("loader"));
        doc
    }

    fn loader_node(rt: &Runtime) -> Option<NodeId> {
        rt.document().get_by_id("page-loader")
    }

    #[test]
    fn load_then_floor_then_exit() {
        let mut rt = ready_runtime(with_loader());
        let id = rt.register(Loader::new(LoaderConfig::default()));
        let el = find_id(rt.document(), "page-loader");

        rt.advance(200);
        rt.load();
        rt.advance(499);
        assert_eq!(rt.behavior::<Loader>(id).unwrap().state(), LoaderState::Visible);
        rt.advance(1);
        assert_eq!(rt.behavior::<Loader>(id).unwrap().state(), LoaderState::Hiding);
        assert!(has_class(rt.document(), el, HIDDEN_CLASS));
        assert!(loader_node(&rt).is_some());

        rt.advance(500);
        assert_eq!(rt.behavior::<Loader>(id).unwrap().state(), LoaderState::Removed);
        assert!(loader_node(&rt).is_none());
    }

    #[test]
    fn ceiling_hides_without_load() {
        let mut rt = ready_runtime(with_loader());
        let id = rt.register(Loader::new(LoaderConfig::default()));
        rt.advance(2999);
        assert_eq!(rt.behavior::<Loader>(id).unwrap().state(), LoaderState::Visible);
        rt.advance(1);
        assert_eq!(rt.behavior::<Loader>(id).unwrap().state(), LoaderState::Hiding);
        rt.advance(500);
        assert!(loader_node(&rt).is_none());
    }

    #[test]
    fn late_load_after_ceiling_changes_nothing() {
        let mut rt = ready_runtime(with_loader());
        let id = rt.register(Loader::new(LoaderConfig::default()));
        rt.advance(3600);
        rt.load();
        rt.advance(1000);
        assert_eq!(rt.behavior::<Loader>(id).unwrap().state(), LoaderState::Removed);
    }

    #[test]
    fn load_near_ceiling_lets_ceiling_win() {
        let mut rt = ready_runtime(with_loader());
        let id = rt.register(Loader::new(LoaderConfig::default()));
        rt.advance(2800);
        rt.load();
        rt.advance(200);
        assert_eq!(rt.behavior::<Loader>(id).unwrap().state(), LoaderState::Hiding);
        // Floor fires at 3300 while hiding; removal still at 3500
        rt.advance(499);
        assert!(loader_node(&rt).is_some());
        rt.advance(1);
        assert!(loader_node(&rt).is_none());
    }

    #[test]
    fn already_complete_hides_at_attach() {
        let page = Page::new(with_loader(), test_viewport()).with_ready_state(ReadyState::Complete);
        let mut rt = Runtime::new(page);
        let id = rt.register(Loader::new(LoaderConfig::default()));
        assert_eq!(rt.behavior::<Loader>(id).unwrap().state(), LoaderState::Hiding);
        rt.advance(500);
        assert!(loader_node(&rt).is_none());
    }

    #[test]
    fn missing_element_is_noop() {
        let mut rt = ready_runtime(Document::new());
        let id = rt.register(Loader::new(LoaderConfig::default()));
        assert_eq!(rt.page().scheduler.pending_for(id), 0);
        rt.load();
        rt.advance(5000);
        assert_eq!(rt.behavior::<Loader>(id).unwrap().state(), LoaderState::Removed);
    }
}
