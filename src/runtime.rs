//! Behavior runtime.
//!
//! A [`Runtime`] owns a [`Page`] and every registered [`Behavior`]. It plays
//! the role of the browser event loop:
//!
//! - registration goes through a [`ReadyGate`], so behaviors attach only once
//!   the DOM is ready,
//! - page events (`load`, `scroll`, `resize`, `click`, `submit`) are
//!   broadcast to every attached behavior,
//! - timers, animation frames and intersection reports are routed to the
//!   behavior that owns them,
//! - after each dispatch the runtime *settles*: it applies scroll requests
//!   made by behaviors and delivers any intersection changes they caused.
//!
//! ```text
//! register ──► ReadyGate ──► attach(cx)
//!                               │
//! scroll / click / advance ──► handle(event, cx) ──► settle ──► handle(...)
//! ```
//!
//! Behaviors never see each other. Everything they need goes through the
//! [`Context`] handed to each callback.

use crate::dom::{Document, NodeId};
use crate::intersection::{IntersectionEntry, ObserverBatch, ObserverId, ObserverOptions};
use crate::page::{Capabilities, Page, ReadyState, Viewport};
use crate::ready::ReadyGate;
use crate::scheduler::TaskId;
use crate::types::{BehaviorId, FormSubmission, Millis};
use std::any::Any;
use tracing::{debug, trace, warn};

/// Upper bound on settle rounds; a behavior that keeps requesting scrolls
/// from its own scroll handler would otherwise spin forever.
const MAX_SETTLE_ROUNDS: usize = 32;

/// Something that happened on the page.
#[derive(Debug, Clone, Copy)]
pub enum PageEvent<'a> {
    Load,
    Scroll,
    Resize,
    Click {
        target: NodeId,
    },
    Submit {
        form: NodeId,
    },
    Intersection {
        observer: ObserverId,
        entries: &'a [IntersectionEntry],
    },
    Timer {
        task: TaskId,
    },
    Frame {
        task: TaskId,
        timestamp: Millis,
    },
}

/// Lets the runtime hand out a registered behavior by concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A page component with lifecycle `attach → handle* → dispose`.
pub trait Behavior: AsAny {
    fn name(&self) -> &'static str;

    /// Called once, after the DOM is ready.
    fn attach(&mut self, cx: &mut Context<'_>);

    fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>);

    /// Called by [`Runtime::dispose`]. The runtime cancels the behavior's
    /// timers and disconnects its observers afterwards.
    fn dispose(&mut self, _cx: &mut Context<'_>) {}
}

/// A behavior's view of the page during one callback.
pub struct Context<'a> {
    page: &'a mut Page,
    owner: BehaviorId,
    default_prevented: bool,
}

impl<'a> Context<'a> {
    pub fn new(page: &'a mut Page, owner: BehaviorId) -> Self {
        Self {
            page,
            owner,
            default_prevented: false,
        }
    }

    pub fn page(&self) -> &Page {
        self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        self.page
    }

    pub fn doc(&self) -> &Document {
        &self.page.document
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.page.document
    }

    pub fn viewport(&self) -> &Viewport {
        &self.page.viewport
    }

    pub fn capabilities(&self) -> Capabilities {
        self.page.capabilities
    }

    pub fn ready_state(&self) -> ReadyState {
        self.page.ready_state
    }

    pub fn now(&self) -> Millis {
        self.page.now()
    }

    pub fn set_timeout(&mut self, delay: Millis) -> TaskId {
        self.page.scheduler.set_timeout(self.owner, delay)
    }

    pub fn set_interval(&mut self, period: Millis) -> TaskId {
        self.page.scheduler.set_interval(self.owner, period)
    }

    pub fn request_frame(&mut self) -> TaskId {
        self.page.scheduler.request_frame(self.owner)
    }

    /// Drop a pending task. Returns whether it was still pending.
    pub fn cancel(&mut self, task: TaskId) -> bool {
        self.page.scheduler.cancel(task)
    }

    /// Create an observer, or `None` when the platform cannot observe
    /// intersections.
    pub fn create_observer(&mut self, options: ObserverOptions) -> Option<ObserverId> {
        if !self.page.capabilities.intersection_observer {
            return None;
        }
        Some(self.page.observers.create(self.owner, options))
    }

    pub fn observe(&mut self, observer: ObserverId, target: NodeId) {
        self.page.observers.observe(observer, target);
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: NodeId) {
        self.page.observers.unobserve(observer, target);
    }

    /// Scroll the page once this callback returns.
    pub fn scroll_to(&mut self, y: f64) {
        self.page.request_scroll(y);
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn record_submission(&mut self, submission: FormSubmission) {
        self.page.submissions.push(submission);
    }
}

struct Slot {
    id: BehaviorId,
    behavior: Box<dyn Behavior>,
    attached: bool,
}

/// Owns the page and drives its behaviors.
pub struct Runtime {
    page: Page,
    slots: Vec<Slot>,
    gate: ReadyGate<BehaviorId>,
}

impl Runtime {
    pub fn new(page: Page) -> Self {
        let gate = ReadyGate::new(page.ready_state);
        Self {
            page,
            slots: Vec::new(),
            gate,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn document(&self) -> &Document {
        &self.page.document
    }

    pub fn now(&self) -> Millis {
        self.page.now()
    }

    /// Names of registered behaviors, in registration order.
    pub fn behavior_names(&self) -> Vec<&'static str> {
        self.slots.iter().map(|s| s.behavior.name()).collect()
    }

    pub fn is_attached(&self, id: BehaviorId) -> bool {
        self.slots.get(id.0).is_some_and(|s| s.attached)
    }

    /// Register a behavior. It attaches now if the DOM is ready, otherwise
    /// at [`Runtime::dom_content_loaded`].
    pub fn register<B: Behavior + 'static>(&mut self, behavior: B) -> BehaviorId {
        let id = BehaviorId(self.slots.len());
        self.slots.push(Slot {
            id,
            behavior: Box::new(behavior),
            attached: false,
        });
        if let Some(id) = self.gate.run_or_defer(id) {
            self.attach(id);
            self.settle();
        } else {
            debug!(behavior = self.slots[id.0].behavior.name(), "deferred until DOM ready");
        }
        id
    }

    fn attach(&mut self, id: BehaviorId) {
        let slot = &mut self.slots[id.0];
        if slot.attached {
            return;
        }
        slot.attached = true;
        let mut cx = Context::new(&mut self.page, id);
        slot.behavior.attach(&mut cx);
        debug!(behavior = slot.behavior.name(), "attached");
    }

    /// The DOM finished parsing: attach every deferred behavior.
    pub fn dom_content_loaded(&mut self) {
        if self.page.ready_state == ReadyState::Loading {
            self.page.ready_state = ReadyState::Interactive;
        }
        for id in self.gate.open() {
            self.attach(id);
        }
        self.settle();
    }

    /// The window `load` event. Implies DOM readiness.
    pub fn load(&mut self) {
        if self.page.ready_state == ReadyState::Complete {
            return;
        }
        self.dom_content_loaded();
        self.page.ready_state = ReadyState::Complete;
        self.broadcast(&PageEvent::Load);
        self.settle();
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.page.viewport.scroll_to(y);
        self.broadcast(&PageEvent::Scroll);
        self.settle();
    }

    /// Change the viewport height.
    pub fn resize(&mut self, inner_height: f64) {
        self.page.viewport.inner_height = inner_height.max(0.0);
        let y = self.page.viewport.scroll_y;
        self.page.viewport.scroll_to(y);
        self.broadcast(&PageEvent::Resize);
        self.settle();
    }

    /// Click on `target`. Returns whether a behavior prevented the default
    /// action.
    pub fn click(&mut self, target: NodeId) -> bool {
        let prevented = self.broadcast(&PageEvent::Click { target });
        self.settle();
        prevented
    }

    /// Submit `form`. Returns whether a behavior prevented the default
    /// submission.
    pub fn submit(&mut self, form: NodeId) -> bool {
        let prevented = self.broadcast(&PageEvent::Submit { form });
        self.settle();
        prevented
    }

    /// Report `target` at `ratio` to every observer watching it, regardless
    /// of layout.
    pub fn intersect(&mut self, target: NodeId, ratio: f64) {
        let batches = self.page.observers.force(target, ratio);
        self.deliver(batches);
        self.settle();
    }

    /// Run the clock forward by `ms`, firing every task that comes due.
    pub fn advance(&mut self, ms: Millis) {
        let until = self.page.now() + ms;
        while let Some(fired) = self.page.scheduler.pop_due(until) {
            let event = if fired.frame {
                PageEvent::Frame {
                    task: fired.task,
                    timestamp: fired.at,
                }
            } else {
                PageEvent::Timer { task: fired.task }
            };
            trace!(at = fired.at, frame = fired.frame, "task fired");
            self.dispatch_to(fired.owner, &event);
            self.settle();
        }
        self.page.scheduler.advance_to(until);
    }

    /// Borrow a registered behavior by concrete type.
    pub fn behavior<B: Behavior + 'static>(&self, id: BehaviorId) -> Option<&B> {
        let behavior: &dyn Behavior = self.slots.get(id.0)?.behavior.as_ref();
        behavior.as_any().downcast_ref::<B>()
    }

    /// Run `f` against a registered behavior with a live [`Context`], then
    /// settle. Used for operations a behavior exposes beyond events, such as
    /// observing dynamically inserted content.
    pub fn with_behavior<B, R>(
        &mut self,
        id: BehaviorId,
        f: impl FnOnce(&mut B, &mut Context<'_>) -> R,
    ) -> Option<R>
    where
        B: Behavior + 'static,
    {
        let slot = self.slots.get_mut(id.0)?;
        let behavior: &mut dyn Behavior = slot.behavior.as_mut();
        let typed = behavior.as_any_mut().downcast_mut::<B>()?;
        let mut cx = Context::new(&mut self.page, id);
        let out = f(typed, &mut cx);
        self.settle();
        Some(out)
    }

    /// Dispose every attached behavior and drop its timers and observers.
    pub fn dispose(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.attached) {
            let mut cx = Context::new(&mut self.page, slot.id);
            slot.behavior.dispose(&mut cx);
            self.page.scheduler.cancel_owned(slot.id);
            self.page.observers.disconnect_owned(slot.id);
            slot.attached = false;
            debug!(behavior = slot.behavior.name(), "disposed");
        }
    }

    fn broadcast(&mut self, event: &PageEvent<'_>) -> bool {
        let mut prevented = false;
        for slot in self.slots.iter_mut().filter(|s| s.attached) {
            let mut cx = Context::new(&mut self.page, slot.id);
            slot.behavior.handle(event, &mut cx);
            prevented |= cx.default_prevented();
        }
        prevented
    }

    fn dispatch_to(&mut self, id: BehaviorId, event: &PageEvent<'_>) -> bool {
        let Some(slot) = self.slots.get_mut(id.0).filter(|s| s.attached) else {
            return false;
        };
        let mut cx = Context::new(&mut self.page, id);
        slot.behavior.handle(event, &mut cx);
        cx.default_prevented()
    }

    fn deliver(&mut self, batches: Vec<ObserverBatch>) {
        for batch in batches {
            let event = PageEvent::Intersection {
                observer: batch.observer,
                entries: &batch.entries,
            };
            self.dispatch_to(batch.owner, &event);
        }
    }

    /// Apply pending scroll requests and intersection changes until the page
    /// is quiet.
    fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_ROUNDS {
            if let Some(y) = self.page.take_scroll_request() {
                self.page.viewport.scroll_to(y);
                self.broadcast(&PageEvent::Scroll);
                continue;
            }
            let batches = self
                .page
                .observers
                .collect(&self.page.document, &self.page.viewport);
            if batches.is_empty() {
                return;
            }
            self.deliver(batches);
        }
        warn!("page did not settle after {MAX_SETTLE_ROUNDS} rounds");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::El;
    use crate::intersection::RootMargin;

    /// Records every event it sees.
    #[derive(Default)]
    struct Recorder {
        attached_at: Option<ReadyState>,
        seen: Vec<String>,
        observer: Option<ObserverId>,
        watch: Option<NodeId>,
        prevent: bool,
    }

    impl Behavior for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn attach(&mut self, cx: &mut Context<'_>) {
            self.attached_at = Some(cx.ready_state());
            if let Some(target) = self.watch {
                self.observer = cx.create_observer(ObserverOptions::new(0.5, RootMargin::default()));
                if let Some(obs) = self.observer {
                    cx.observe(obs, target);
                }
            }
        }

        fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>) {
            let label = match event {
                PageEvent::Load => "load".to_string(),
                PageEvent::Scroll => format!("scroll:{}", cx.viewport().scroll_y),
                PageEvent::Resize => "resize".to_string(),
                PageEvent::Click { .. } => {
                    if self.prevent {
                        cx.prevent_default();
                    }
                    "click".to_string()
                }
                PageEvent::Submit { .. } => "submit".to_string(),
                PageEvent::Intersection { entries, .. } => {
                    format!("intersect:{}", entries[0].is_intersecting)
                }
                PageEvent::Timer { .. } => format!("timer@{}", cx.now()),
                PageEvent::Frame { timestamp, .. } => format!("frame@{timestamp}"),
            };
            self.seen.push(label);
        }
    }

    fn page() -> Page {
        Page::new(Document::new(), Viewport::new(800.0, 3000.0))
    }

    #[test]
    fn registration_waits_for_dom_ready() {
        let mut rt = Runtime::new(page());
        let id = rt.register(Recorder::default());
        assert!(!rt.is_attached(id));
        rt.dom_content_loaded();
        assert!(rt.is_attached(id));
        let rec = rt.behavior::<Recorder>(id).unwrap();
        assert_eq!(rec.attached_at, Some(ReadyState::Interactive));
    }

    #[test]
    fn registration_on_ready_page_attaches_immediately() {
        let mut rt = Runtime::new(page().with_ready_state(ReadyState::Complete));
        let id = rt.register(Recorder::default());
        assert!(rt.is_attached(id));
    }

    #[test]
    fn load_implies_ready_and_broadcasts_once() {
        let mut rt = Runtime::new(page());
        let id = rt.register(Recorder::default());
        rt.load();
        rt.load();
        let rec = rt.behavior::<Recorder>(id).unwrap();
        assert_eq!(rec.seen, vec!["load"]);
        assert_eq!(rt.page().ready_state, ReadyState::Complete);
    }

    #[test]
    fn timers_route_to_owner_only() {
        let mut rt = Runtime::new(page().with_ready_state(ReadyState::Interactive));
        let a = rt.register(Recorder::default());
        let b = rt.register(Recorder::default());
        rt.with_behavior::<Recorder, _>(a, |_, cx| {
            cx.set_timeout(100);
        });
        rt.advance(200);
        assert_eq!(rt.behavior::<Recorder>(a).unwrap().seen, vec!["timer@100"]);
        assert!(rt.behavior::<Recorder>(b).unwrap().seen.is_empty());
        assert_eq!(rt.now(), 200);
    }

    #[test]
    fn frames_carry_timestamp() {
        let mut rt = Runtime::new(page().with_ready_state(ReadyState::Interactive));
        let a = rt.register(Recorder::default());
        rt.with_behavior::<Recorder, _>(a, |_, cx| {
            cx.request_frame();
        });
        rt.advance(100);
        assert_eq!(rt.behavior::<Recorder>(a).unwrap().seen, vec!["frame@16"]);
    }

    #[test]
    fn click_reports_prevent_default() {
        let mut rt = Runtime::new(page().with_ready_state(ReadyState::Interactive));
        let body = rt.document().body();
        rt.register(Recorder::default());
        assert!(!rt.click(body));
        rt.register(Recorder {
            prevent: true,
            ..Default::default()
        });
        assert!(rt.click(body));
    }

    #[test]
    fn scroll_requests_are_applied_and_broadcast() {
        let mut rt = Runtime::new(page().with_ready_state(ReadyState::Interactive));
        let a = rt.register(Recorder::default());
        rt.with_behavior::<Recorder, _>(a, |_, cx| cx.scroll_to(400.0));
        assert_eq!(rt.page().viewport.scroll_y, 400.0);
        assert_eq!(rt.behavior::<Recorder>(a).unwrap().seen, vec!["scroll:400"]);
    }

    #[test]
    fn intersection_changes_are_delivered_after_scroll() {
        let mut doc = Document::new();
        let body = doc.body();
        let target = doc.append(body, El::new("div").at(1500.0, 100.0));
        let mut rt = Runtime::new(
            Page::new(doc, Viewport::new(800.0, 3000.0)).with_ready_state(ReadyState::Interactive),
        );
        let id = rt.register(Recorder {
            watch: Some(target),
            ..Default::default()
        });
        assert_eq!(rt.behavior::<Recorder>(id).unwrap().seen, vec!["intersect:false"]);
        rt.scroll_to(1000.0);
        let seen = &rt.behavior::<Recorder>(id).unwrap().seen;
        assert_eq!(seen[1..], ["scroll:1000", "intersect:true"]);
    }

    #[test]
    fn no_observer_capability_means_no_observer() {
        let mut doc = Document::new();
        let body = doc.body();
        let target = doc.append(body, El::new("div").at(0.0, 100.0));
        let page = Page::new(doc, Viewport::default())
            .with_ready_state(ReadyState::Interactive)
            .with_capabilities(Capabilities {
                intersection_observer: false,
                reduced_motion: false,
            });
        let mut rt = Runtime::new(page);
        let id = rt.register(Recorder {
            watch: Some(target),
            ..Default::default()
        });
        let rec = rt.behavior::<Recorder>(id).unwrap();
        assert!(rec.observer.is_none());
        assert!(rec.seen.is_empty());
    }

    #[test]
    fn dispose_cancels_owned_tasks() {
        let mut rt = Runtime::new(page().with_ready_state(ReadyState::Interactive));
        let a = rt.register(Recorder::default());
        rt.with_behavior::<Recorder, _>(a, |_, cx| {
            cx.set_interval(10);
        });
        rt.dispose();
        assert!(!rt.is_attached(a));
        assert_eq!(rt.page().scheduler.pending_for(a), 0);
        rt.advance(100);
        assert!(rt.behavior::<Recorder>(a).unwrap().seen.is_empty());
    }

    #[test]
    fn downcast_to_wrong_type_is_none() {
        struct Other;
        impl Behavior for Other {
            fn name(&self) -> &'static str {
                "other"
            }
            fn attach(&mut self, _cx: &mut Context<'_>) {}
            fn handle(&mut self, _event: &PageEvent<'_>, _cx: &mut Context<'_>) {}
        }
        let mut rt = Runtime::new(page());
        let id = rt.register(Other);
        assert!(rt.behavior::<Recorder>(id).is_none());
        assert_eq!(rt.behavior_names(), vec!["other"]);
    }
}
