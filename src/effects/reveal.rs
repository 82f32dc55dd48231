//! Reveal-on-intersect.
//!
//! Every element carrying one of the configured marker classes is watched
//! until it first intersects the viewport, then gains `revealed` and is
//! dropped from observation. A revealed element never goes back.
//!
//! Markup may override the observer settings per element:
//!
//! ```html
//! <section class="reveal" data-reveal-threshold="0.4" data-reveal-margin="0px 0px -120px 0px">
//! ```
//!
//! Elements sharing the same effective options share one observer.
//! Without intersection observation everything is revealed immediately.

use super::REVEALED_CLASS;
use crate::config::RevealConfig;
use crate::dom::{Document, NodeId};
use crate::intersection::{ObserverId, ObserverOptions, RootMargin};
use crate::runtime::{Behavior, Context, PageEvent};
use tracing::debug;

/// Connected elements carrying any of `markers`, in document order.
pub fn revealable(doc: &Document, markers: &[String]) -> Vec<NodeId> {
    doc.query(|n| markers.iter().any(|m| n.has_class(m)))
}

/// Mark every revealable element revealed. Returns how many were changed.
pub fn reveal_all(doc: &mut Document, markers: &[String]) -> usize {
    let mut changed = 0;
    for node in revealable(doc, markers) {
        let n = doc.node_mut(node);
        if !n.has_class(REVEALED_CLASS) {
            n.add_class(REVEALED_CLASS);
            changed += 1;
        }
    }
    changed
}

pub struct Reveal {
    config: RevealConfig,
    defaults: ObserverOptions,
    observers: Vec<(ObserverOptions, ObserverId)>,
    revealed: usize,
}

impl Reveal {
    pub fn new(config: RevealConfig) -> Self {
        let defaults = config.observer_options();
        Self {
            config,
            defaults,
            observers: Vec::new(),
            revealed: 0,
        }
    }

    /// Elements revealed by this behavior so far.
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Start watching `node`, e.g. after inserting it into the page.
    ///
    /// Reveals it at once when the platform cannot observe intersections.
    /// Already revealed nodes are ignored.
    pub fn observe(&mut self, cx: &mut Context<'_>, node: NodeId) {
        if cx.doc().node(node).has_class(REVEALED_CLASS) {
            return;
        }
        let options = self.options_for(cx.doc(), node);
        match self.observer_for(cx, options) {
            Some(observer) => cx.observe(observer, node),
            None => self.reveal(cx, node),
        }
    }

    fn options_for(&self, doc: &Document, node: NodeId) -> ObserverOptions {
        let n = doc.node(node);
        let threshold = n
            .attr("data-reveal-threshold")
            .and_then(|t| t.trim().parse::<f64>().ok())
            .filter(|t| (0.0..=1.0).contains(t))
            .unwrap_or(self.defaults.threshold);
        let root_margin = n
            .attr("data-reveal-margin")
            .and_then(|m| m.parse::<RootMargin>().ok())
            .unwrap_or(self.defaults.root_margin);
        ObserverOptions::new(threshold, root_margin)
    }

    fn observer_for(&mut self, cx: &mut Context<'_>, options: ObserverOptions) -> Option<ObserverId> {
        if let Some((_, id)) = self.observers.iter().find(|(o, _)| *o == options) {
            return Some(*id);
        }
        let id = cx.create_observer(options)?;
        self.observers.push((options, id));
        Some(id)
    }

    fn reveal(&mut self, cx: &mut Context<'_>, node: NodeId) {
        let n = cx.doc_mut().node_mut(node);
        if !n.has_class(REVEALED_CLASS) {
            n.add_class(REVEALED_CLASS);
            self.revealed += 1;
        }
    }

    fn owns(&self, observer: ObserverId) -> bool {
        self.observers.iter().any(|(_, id)| *id == observer)
    }
}

impl Behavior for Reveal {
    fn name(&self) -> &'static str {
        "reveal"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let targets = revealable(cx.doc(), &self.config.markers);
        if !cx.capabilities().intersection_observer {
            debug!(count = targets.len(), "intersection observation unavailable; revealing all");
        }
        for node in targets {
            self.observe(cx, node);
        }
    }

    fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>) {
        let PageEvent::Intersection { observer, entries } = *event else {
            return;
        };
        if !self.owns(observer) {
            return;
        }
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            self.reveal(cx, entry.target);
            cx.unobserve(observer, entry.target);
        }
    }
}
