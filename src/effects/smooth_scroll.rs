//! Smooth in-page anchor scrolling.
//!
//! Intercepts clicks on `<a href="#section">` and glides the viewport to the
//! target over a fixed duration with ease-in-out timing, one step per frame.

use crate::config::SmoothScrollConfig;
use crate::dom::{Document, NodeId};
use crate::runtime::{Behavior, Context, PageEvent};
use crate::scheduler::TaskId;
use crate::types::Millis;
use tracing::{debug, trace};

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Element named by the in-page link enclosing `clicked`, if any.
fn anchor_target(doc: &Document, clicked: NodeId) -> Option<NodeId> {
    let link = doc.closest(clicked, |n| {
        n.tag() == Some("a") && n.attr("href").is_some_and(|h| h.starts_with('#'))
    })?;
    let fragment = doc.node(link).attr("href")?.strip_prefix('#')?;
    if fragment.is_empty() {
        return None;
    }
    doc.get_by_id(fragment)
}

#[derive(Debug, Clone, Copy)]
struct Glide {
    from: f64,
    to: f64,
    start: Millis,
    frame: TaskId,
}

pub struct SmoothScroll {
    config: SmoothScrollConfig,
    instant: bool,
    glide: Option<Glide>,
}

impl SmoothScroll {
    pub fn new(config: SmoothScrollConfig) -> Self {
        Self {
            config,
            instant: false,
            glide: None,
        }
    }

    /// Jump straight to the target instead of animating.
    pub fn instant(mut self) -> Self {
        self.instant = true;
        self
    }

    pub fn is_scrolling(&self) -> bool {
        self.glide.is_some()
    }

    fn start(&mut self, target: NodeId, cx: &mut Context<'_>) {
        if let Some(replaced) = self.glide.take() {
            cx.cancel(replaced.frame);
        }
        let viewport = *cx.viewport();
        let top = cx.doc().node(target).bounds().top;
        let to = (top - self.config.offset_px).clamp(0.0, viewport.max_scroll());
        if self.instant || self.config.duration_ms == 0 {
            cx.scroll_to(to);
            return;
        }
        debug!(from = viewport.scroll_y, to, "smooth scroll");
        self.glide = Some(Glide {
            from: viewport.scroll_y,
            to,
            start: cx.now(),
            frame: cx.request_frame(),
        });
    }

    fn step(&mut self, timestamp: Millis, cx: &mut Context<'_>) {
        let Some(glide) = self.glide.as_mut() else { return };
        let elapsed = timestamp.saturating_sub(glide.start) as f64;
        let t = (elapsed / self.config.duration_ms as f64).min(1.0);
        let y = if t < 1.0 {
            glide.from + (glide.to - glide.from) * ease_in_out_cubic(t)
        } else {
            glide.to
        };
        trace!(y, t, "smooth scroll frame");
        cx.scroll_to(y);
        if t < 1.0 {
            glide.frame = cx.request_frame();
        } else {
            self.glide = None;
        }
    }
}

impl Behavior for SmoothScroll {
    fn name(&self) -> &'static str {
        "smooth-scroll"
    }

    fn attach(&mut self, _cx: &mut Context<'_>) {}

    fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>) {
        match *event {
            PageEvent::Click { target } => {
                if let Some(destination) = anchor_target(cx.doc(), target) {
                    cx.prevent_default();
                    self.start(destination, cx);
                }
            }
            // Frames from a replaced glide are ignored
            PageEvent::Frame { task, timestamp }
                if self.glide.is_some_and(|g| g.frame == task) =>
            {
                self.step(timestamp, cx);
            }
            _ => {}
        }
    }
}
