//! Parallax background layers.
//!
//! Each `.parallax-layer` is shifted against the scroll direction by
//! `scrollY * data-speed` pixels. Scroll events only request a frame; the
//! frame applies the transforms, so a burst of scroll events costs one
//! update per frame.

use crate::config::ParallaxConfig;
use crate::dom::{Document, NodeId};
use crate::runtime::{Behavior, Context, PageEvent};
use crate::scheduler::TaskId;
use tracing::{debug, trace};

pub const LAYER_CLASS: &str = "parallax-layer";

/// Vertical offset for a layer moving at `speed`.
pub fn layer_offset(scroll_y: f64, speed: f64) -> f64 {
    let offset = -(scroll_y * speed);
    // Avoid rendering "-0px"
    if offset == 0.0 { 0.0 } else { offset }
}

pub fn layer_transform(offset: f64) -> String {
    format!("translate3d(0, {offset}px, 0)")
}

fn read_speed(doc: &Document, node: NodeId, default_speed: f64) -> f64 {
    doc.node(node)
        .attr("data-speed")
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|s| s.is_finite())
        .unwrap_or(default_speed)
}

pub struct Parallax {
    config: ParallaxConfig,
    layers: Vec<(NodeId, f64)>,
    /// The frame requested by the last scroll, while it is outstanding.
    ticking: Option<TaskId>,
}

impl Parallax {
    pub fn new(config: ParallaxConfig) -> Self {
        Self {
            config,
            layers: Vec::new(),
            ticking: None,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn apply(&self, cx: &mut Context<'_>) {
        let scroll_y = cx.viewport().scroll_y;
        trace!(scroll_y, layers = self.layers.len(), "parallax frame");
        for &(node, speed) in &self.layers {
            let transform = layer_transform(layer_offset(scroll_y, speed));
            cx.doc_mut().node_mut(node).set_style("transform", transform);
        }
    }
}

impl Behavior for Parallax {
    fn name(&self) -> &'static str {
        "parallax"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let default_speed = self.config.default_speed;
        self.layers = cx
            .doc()
            .query_class(LAYER_CLASS)
            .into_iter()
            .map(|node| (node, read_speed(cx.doc(), node, default_speed)))
            .collect();
        if self.layers.is_empty() {
            debug!("no parallax layers on page");
        }
    }

    fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>) {
        if self.layers.is_empty() {
            return;
        }
        match *event {
            PageEvent::Scroll if self.ticking.is_none() => {
                self.ticking = Some(cx.request_frame());
            }
            PageEvent::Frame { task, .. } if self.ticking == Some(task) => {
                self.ticking = None;
                self.apply(cx);
            }
            _ => {}
        }
    }
}
