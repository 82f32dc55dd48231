//! The page aggregate: document, viewport, readiness and platform capabilities.

use crate::dom::Document;
use crate::intersection::Observers;
use crate::scheduler::Scheduler;
use crate::types::{FormSubmission, Millis};
use serde::Serialize;

/// Document readiness, as reported by `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// The DOM is parsed and can be queried.
    pub fn is_ready(self) -> bool {
        !matches!(self, ReadyState::Loading)
    }
}

/// Scroll position and dimensions of the browsing context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Current vertical scroll offset (`scrollY`).
    pub scroll_y: f64,
    /// Visible height (`innerHeight`).
    pub inner_height: f64,
    /// Total document height (`documentElement.scrollHeight`).
    pub scroll_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            inner_height: 800.0,
            scroll_height: 800.0,
        }
    }
}

impl Viewport {
    pub fn new(inner_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            inner_height,
            scroll_height,
        }
    }

    /// Largest reachable scroll offset; 0 for a non-scrollable document.
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.inner_height).max(0.0)
    }

    /// Vertical scroll progress in percent.
    ///
    /// `scroll_y / (scroll_height - inner_height) * 100`, or 0 when the
    /// document is not scrollable.
    pub fn scroll_percent(&self) -> f64 {
        let scrollable = self.scroll_height - self.inner_height;
        if scrollable <= 0.0 {
            return 0.0;
        }
        self.scroll_y / scrollable * 100.0
    }

    /// Move to `y`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }
}

/// Platform features the behaviors probe for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// `IntersectionObserver` is available.
    pub intersection_observer: bool,
    /// The user prefers reduced motion (`prefers-reduced-motion: reduce`).
    pub reduced_motion: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            intersection_observer: true,
            reduced_motion: false,
        }
    }
}

/// Everything a behavior can see and touch.
#[derive(Debug)]
pub struct Page {
    pub document: Document,
    pub viewport: Viewport,
    pub ready_state: ReadyState,
    pub capabilities: Capabilities,
    pub scheduler: Scheduler,
    pub observers: Observers,
    /// Forms that passed validation, oldest first.
    pub submissions: Vec<FormSubmission>,
    pending_scroll: Option<f64>,
}

impl Page {
    /// A page still loading, with default capabilities.
    pub fn new(document: Document, viewport: Viewport) -> Self {
        Self {
            document,
            viewport,
            ready_state: ReadyState::Loading,
            capabilities: Capabilities::default(),
            scheduler: Scheduler::new(),
            observers: Observers::default(),
            submissions: Vec::new(),
            pending_scroll: None,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_ready_state(mut self, ready_state: ReadyState) -> Self {
        self.ready_state = ready_state;
        self
    }

    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    /// Ask for a scroll to `y`; the runtime applies it once the current
    /// handler returns and broadcasts the resulting scroll event.
    pub fn request_scroll(&mut self, y: f64) {
        self.pending_scroll = Some(y);
    }

    pub(crate) fn take_scroll_request(&mut self) -> Option<f64> {
        self.pending_scroll.take()
    }
}
