//! Top-level startup: one call installs every page behavior.
//!
//! ```text
//! install(runtime, config)
//!   │
//!   ├─ reduced motion? ──yes──► static-motion (reveal all, settle counters)
//!   │                           smooth scroll in jump mode
//!   │
//!   └─ no ──► splitter, reveal, parallax, counter, smooth scroll
//!
//!   always: progress, loader, faq, carousel, form validation, footer
//! ```
//!
//! Reduced motion is decided once, here. Under it no behavior requests an
//! animation frame.

use crate::config::{CounterConfig, FxConfig};
use crate::effects::carousel::Carousel;
use crate::effects::counter::{self, Counter};
use crate::effects::faq::Faq;
use crate::effects::form::FormValidation;
use crate::effects::loader::Loader;
use crate::effects::parallax::Parallax;
use crate::effects::progress::ScrollProgress;
use crate::effects::reveal::{self, Reveal};
use crate::effects::smooth_scroll::SmoothScroll;
use crate::effects::splitter::Splitter;
use crate::footer::{self, Footer};
use crate::runtime::{Behavior, Context, PageEvent, Runtime};
use crate::types::BehaviorId;
use serde::Serialize;
use tracing::{debug, info};

/// Shows every animated element in its final state at once.
pub struct StaticMotion {
    markers: Vec<String>,
    counter: CounterConfig,
    revealed: usize,
    counters: usize,
}

impl StaticMotion {
    pub fn new(markers: Vec<String>, counter: CounterConfig) -> Self {
        Self {
            markers,
            counter,
            revealed: 0,
            counters: 0,
        }
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn counter_count(&self) -> usize {
        self.counters
    }
}

impl Behavior for StaticMotion {
    fn name(&self) -> &'static str {
        "static-motion"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        self.revealed = reveal::reveal_all(cx.doc_mut(), &self.markers);
        self.counters = counter::settle_all(cx.doc_mut(), &self.counter);
        debug!(
            revealed = self.revealed,
            counters = self.counters,
            "reduced motion: final state applied"
        );
    }

    fn handle(&mut self, _event: &PageEvent<'_>, _cx: &mut Context<'_>) {}
}

/// Ids of the installed behaviors. Motion behaviors are `None` under
/// reduced motion, `static_motion` is `None` otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct Installed {
    pub reduced_motion: bool,
    pub static_motion: Option<BehaviorId>,
    pub splitter: Option<BehaviorId>,
    pub reveal: Option<BehaviorId>,
    pub parallax: Option<BehaviorId>,
    pub counter: Option<BehaviorId>,
    pub progress: BehaviorId,
    pub loader: BehaviorId,
    pub smooth_scroll: BehaviorId,
    pub faq: BehaviorId,
    pub carousel: BehaviorId,
    pub form: BehaviorId,
    pub footer: BehaviorId,
}

/// Install every behavior, with the footer dated to the current year.
pub fn install(runtime: &mut Runtime, config: &FxConfig) -> Installed {
    install_with_year(runtime, config, footer::current_year())
}

/// Like [`install`], with a fixed footer year.
pub fn install_with_year(runtime: &mut Runtime, config: &FxConfig, year: i32) -> Installed {
    let capabilities = runtime.page().capabilities;
    let reduced_motion = capabilities.reduced_motion && config.motion.respect_reduced_motion;

    let mut installed = Installed {
        reduced_motion,
        static_motion: None,
        splitter: None,
        reveal: None,
        parallax: None,
        counter: None,
        progress: runtime.register(ScrollProgress::new()),
        loader: runtime.register(Loader::new(config.loader.clone())),
        smooth_scroll: runtime.register(if reduced_motion {
            SmoothScroll::new(config.smooth_scroll.clone()).instant()
        } else {
            SmoothScroll::new(config.smooth_scroll.clone())
        }),
        faq: runtime.register(Faq::new()),
        carousel: runtime.register(Carousel::new(config.carousel.clone())),
        form: runtime.register(FormValidation::new()),
        footer: runtime.register(Footer::with_year(config.footer.clone(), year)),
    };

    if reduced_motion {
        installed.static_motion = Some(runtime.register(StaticMotion::new(
            config.reveal.markers.clone(),
            config.counter.clone(),
        )));
    } else {
        installed.splitter = Some(runtime.register(Splitter::new(config.text.clone())));
        installed.reveal = Some(runtime.register(Reveal::new(config.reveal.clone())));
        installed.parallax = Some(runtime.register(Parallax::new(config.parallax.clone())));
        installed.counter = Some(runtime.register(Counter::new(config.counter.clone())));
    }

    info!(
        behaviors = runtime.behavior_names().len(),
        reduced_motion,
        observer = capabilities.intersection_observer,
        "site effects installed"
    );
    installed
}
