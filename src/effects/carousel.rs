//! Testimonial carousel.
//!
//! ```html
//! <div id="testimonial-track">
//!   <div class="testimonial-slide">…</div>
//!   <div class="testimonial-slide">…</div>
//! </div>
//! <div id="carousel-indicators"></div>
//! ```
//!
//! One indicator button per slide is generated into `#carousel-indicators`.
//! The track is shifted by whole slide widths; an interval advances it and
//! wraps around at the end. Clicking an indicator jumps without restarting
//! the interval.

use crate::config::CarouselConfig;
use crate::dom::{El, NodeId};
use crate::runtime::{Behavior, Context, PageEvent};
use crate::scheduler::TaskId;
use tracing::debug;

pub const TRACK_ID: &str = "testimonial-track";
pub const INDICATORS_ID: &str = "carousel-indicators";
pub const SLIDE_CLASS: &str = "testimonial-slide";
pub const INDICATOR_CLASS: &str = "carousel-indicator";
pub const ACTIVE_CLASS: &str = "active";

pub fn track_transform(index: usize) -> String {
    format!("translateX(-{}%)", index * 100)
}

pub struct Carousel {
    config: CarouselConfig,
    track: Option<NodeId>,
    slide_count: usize,
    indicators: Vec<NodeId>,
    current: usize,
    timer: Option<TaskId>,
}

impl Carousel {
    pub fn new(config: CarouselConfig) -> Self {
        Self {
            config,
            track: None,
            slide_count: 0,
            indicators: Vec::new(),
            current: 0,
            timer: None,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    fn go_to(&mut self, index: usize, cx: &mut Context<'_>) {
        let Some(track) = self.track else { return };
        self.current = index % self.slide_count;
        let doc = cx.doc_mut();
        doc.node_mut(track)
            .set_style("transform", track_transform(self.current));
        for (i, &indicator) in self.indicators.iter().enumerate() {
            doc.node_mut(indicator)
                .toggle_class(ACTIVE_CLASS, i == self.current);
        }
        debug!(index = self.current, "carousel moved");
    }
}

impl Behavior for Carousel {
    fn name(&self) -> &'static str {
        "carousel"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let Some(track) = cx.doc().get_by_id(TRACK_ID) else {
            debug!("no carousel track on page");
            return;
        };
        self.slide_count = cx
            .doc()
            .query_within(track, |n| n.has_class(SLIDE_CLASS))
            .len();
        if self.slide_count == 0 {
            debug!("carousel track has no slides");
            return;
        }
        self.track = Some(track);

        if let Some(container) = cx.doc().get_by_id(INDICATORS_ID) {
            let doc = cx.doc_mut();
            for i in 0..self.slide_count {
                let mut el = El::new("button")
                    .class(INDICATOR_CLASS)
                    .attr("data-index", &i.to_string())
                    .attr("aria-label", &format!("Show testimonial {}", i + 1));
                if i == 0 {
                    el = el.class(ACTIVE_CLASS);
                }
                self.indicators.push(doc.append(container, el));
            }
        }
        self.timer = Some(cx.set_interval(self.config.interval_ms));
    }

    fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>) {
        match *event {
            PageEvent::Timer { task } if Some(task) == self.timer => {
                self.go_to(self.current + 1, cx);
            }
            PageEvent::Click { target } => {
                let doc = cx.doc();
                let Some(indicator) = doc.closest(target, |n| n.has_class(INDICATOR_CLASS)) else {
                    return;
                };
                if !self.indicators.contains(&indicator) {
                    return;
                }
                let index = doc
                    .node(indicator)
                    .attr("data-index")
                    .and_then(|i| i.parse::<usize>().ok());
                if let Some(index) = index {
                    self.go_to(index, cx);
                }
            }
            _ => {}
        }
    }
}
