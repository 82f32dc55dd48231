//! Animated statistic counters.
//!
//! A counter element counts up from 0 to its `data-target` once it becomes
//! sufficiently visible. Each animation frame compares the frame timestamp
//! with the start time and displays
//!
//! ```text
//! floor(target * (1 - (1 - progress)^3))      progress = elapsed / duration, clamped to [0, 1]
//! ```
//!
//! so the count decelerates towards the end (cubic ease-out). When the next
//! frame boundary would overshoot the duration, the last step is a timeout
//! landing exactly on `start + duration`; it shows the exact target followed
//! by the optional `data-suffix`.
//!
//! ```html
//! <span class="counter" data-target="12500" data-suffix="+">0</span>
//! ```

use crate::config::CounterConfig;
use crate::dom::{Document, NodeId};
use crate::intersection::{ObserverId, ObserverOptions, RootMargin};
use crate::runtime::{Behavior, Context, PageEvent};
use crate::scheduler::TaskId;
use crate::types::Millis;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub const COUNTER_CLASS: &str = "counter";

/// Thousands-separator convention for displayed numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberLocale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "fr-FR")]
    FrFr,
    /// No grouping.
    #[serde(rename = "none")]
    Plain,
}

impl NumberLocale {
    fn separator(self) -> Option<char> {
        match self {
            NumberLocale::EnUs => Some(','),
            NumberLocale::DeDe => Some('.'),
            NumberLocale::FrFr => Some('\u{202f}'),
            NumberLocale::Plain => None,
        }
    }

    /// Render `n` with this locale's grouping.
    pub fn format(self, n: u64) -> String {
        let digits = n.to_string();
        let Some(sep) = self.separator() else {
            return digits;
        };
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(sep);
            }
            out.push(c);
        }
        out
    }
}

pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Value displayed `elapsed` ms into a `duration` ms count towards `target`.
pub fn counter_value(target: u64, elapsed: Millis, duration: Millis) -> u64 {
    let progress = if duration == 0 {
        1.0
    } else {
        (elapsed as f64 / duration as f64).clamp(0.0, 1.0)
    };
    if progress >= 1.0 {
        return target;
    }
    (target as f64 * ease_out_cubic(progress)).floor() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPhase {
    Idle,
    /// `tick` is the pending frame, or the closing timeout.
    Animating { start: Millis, tick: TaskId },
    Settled,
}

#[derive(Debug, Clone)]
struct CounterElement {
    node: NodeId,
    target: u64,
    suffix: String,
    duration: Millis,
    phase: CounterPhase,
}

impl CounterElement {
    fn read(doc: &Document, node: NodeId, default_duration: Millis) -> Self {
        let n = doc.node(node);
        // Non-negative integers only: "-5" or "12500+" count to 0
        let target = n
            .attr("data-target")
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(0);
        let duration = n
            .attr("data-duration")
            .and_then(|d| d.trim().parse().ok())
            .filter(|&d: &Millis| d > 0)
            .unwrap_or(default_duration);
        Self {
            node,
            target,
            suffix: n.attr("data-suffix").unwrap_or_default().to_string(),
            duration,
            phase: CounterPhase::Idle,
        }
    }

    fn final_text(&self, locale: NumberLocale) -> String {
        format!("{}{}", locale.format(self.target), self.suffix)
    }
}

/// Write every counter's final value without animating.
///
/// Used when motion is reduced. Returns the number of counters written.
pub fn settle_all(doc: &mut Document, config: &CounterConfig) -> usize {
    let nodes = doc.query_class(COUNTER_CLASS);
    for &node in &nodes {
        let counter = CounterElement::read(doc, node, config.duration_ms);
        doc.set_text(node, &counter.final_text(config.locale));
    }
    nodes.len()
}

/// Next animation frame, or a timeout at `end` when the frame would land
/// past it.
fn schedule_tick(cx: &mut Context<'_>, end: Millis) -> TaskId {
    let now = cx.now();
    if cx.page().scheduler.next_frame_at() > end {
        cx.set_timeout(end.saturating_sub(now))
    } else {
        cx.request_frame()
    }
}

/// Counts every `.counter` up once it scrolls into view.
pub struct Counter {
    config: CounterConfig,
    counters: Vec<CounterElement>,
    observer: Option<ObserverId>,
}

impl Counter {
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            counters: Vec::new(),
            observer: None,
        }
    }

    pub fn phase(&self, node: NodeId) -> Option<CounterPhase> {
        self.counters.iter().find(|c| c.node == node).map(|c| c.phase)
    }

    fn animating(&self, task: TaskId) -> Option<usize> {
        self.counters.iter().position(|c| {
            matches!(c.phase, CounterPhase::Animating { tick, .. } if tick == task)
        })
    }

    fn start(&mut self, index: usize, cx: &mut Context<'_>) {
        let locale = self.config.locale;
        let counter = &mut self.counters[index];
        if counter.phase != CounterPhase::Idle {
            return;
        }
        let start = cx.now();
        cx.doc_mut().set_text(counter.node, &locale.format(0));
        let tick = schedule_tick(cx, start + counter.duration);
        counter.phase = CounterPhase::Animating { start, tick };
        debug!(goal = counter.target, duration = counter.duration, "counter started");
    }

    fn step(&mut self, index: usize, timestamp: Millis, cx: &mut Context<'_>) {
        let locale = self.config.locale;
        let counter = &mut self.counters[index];
        let CounterPhase::Animating { start, .. } = counter.phase else {
            return;
        };
        let elapsed = timestamp.saturating_sub(start);
        if elapsed >= counter.duration {
            let text = counter.final_text(locale);
            cx.doc_mut().set_text(counter.node, &text);
            counter.phase = CounterPhase::Settled;
            debug!(goal = counter.target, "counter settled");
            return;
        }
        let value = counter_value(counter.target, elapsed, counter.duration);
        trace!(value, elapsed, "counter frame");
        cx.doc_mut().set_text(counter.node, &locale.format(value));
        let tick = schedule_tick(cx, start + counter.duration);
        counter.phase = CounterPhase::Animating { start, tick };
    }
}

impl Behavior for Counter {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let default_duration = self.config.duration_ms;
        self.counters = cx
            .doc()
            .query_class(COUNTER_CLASS)
            .into_iter()
            .map(|node| CounterElement::read(cx.doc(), node, default_duration))
            .collect();
        if self.counters.is_empty() {
            debug!("no counters on page");
            return;
        }

        let options = ObserverOptions::new(self.config.threshold, RootMargin::default());
        self.observer = cx.create_observer(options);
        match self.observer {
            Some(observer) => {
                for counter in &self.counters {
                    cx.observe(observer, counter.node);
                }
            }
            None => {
                debug!("intersection observation unavailable; settling counters");
                let locale = self.config.locale;
                for counter in &mut self.counters {
                    let text = counter.final_text(locale);
                    cx.doc_mut().set_text(counter.node, &text);
                    counter.phase = CounterPhase::Settled;
                }
            }
        }
    }

    fn handle(&mut self, event: &PageEvent<'_>, cx: &mut Context<'_>) {
        match *event {
            PageEvent::Intersection { observer, entries } if Some(observer) == self.observer => {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    cx.unobserve(observer, entry.target);
                    if let Some(index) = self.counters.iter().position(|c| c.node == entry.target) {
                        self.start(index, cx);
                    }
                }
            }
            PageEvent::Frame { task, timestamp } => {
                if let Some(index) = self.animating(task) {
                    self.step(index, timestamp, cx);
                }
            }
            PageEvent::Timer { task } => {
                if let Some(index) = self.animating(task) {
                    let now = cx.now();
                    self.step(index, now, cx);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn counter_doc(target: &str, suffix: Option<&str>, top: f64) -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        let mut el = El::new("span")
            .id("stat")
            .class(COUNTER_CLASS)
            .attr("data-target", target)
            .text("0")
            .at(top, 40.0);
        if let Some(suffix) = suffix {
            el = el.attr("data-suffix", suffix);
        }
        doc.append(body, el);
        doc
    }

    fn config(duration_ms: u64) -> CounterConfig {
        CounterConfig {
            duration_ms,
            ..CounterConfig::default()
        }
    }

    #[test]
    fn format_groups_thousands() {
        assert_eq!(NumberLocale::EnUs.format(0), "0");
        assert_eq!(NumberLocale::EnUs.format(999), "999");
        assert_eq!(NumberLocale::EnUs.format(1000), "1,000");
        assert_eq!(NumberLocale::EnUs.format(1_234_567), "1,234,567");
        assert_eq!(NumberLocale::DeDe.format(12_500), "12.500");
        assert_eq!(NumberLocale::FrFr.format(12_500), "12\u{202f}500");
        assert_eq!(NumberLocale::Plain.format(12_500), "12500");
    }

    #[test]
    fn ease_out_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
    }

    #[test]
    fn counter_value_curve() {
        assert_eq!(counter_value(1000, 0, 1000), 0);
        assert_eq!(counter_value(1000, 500, 1000), 875);
        assert_eq!(counter_value(1000, 1000, 1000), 1000);
        assert_eq!(counter_value(1000, 5000, 1000), 1000);
        assert_eq!(counter_value(7, 10, 0), 7);
    }

    #[test]
    fn counter_value_is_monotonic() {
        let values: Vec<u64> = (0..=1000).map(|t| counter_value(1000, t, 1000)).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn counts_up_when_visible_and_settles_with_suffix() {
        let mut rt = ready_runtime(counter_doc("1000", Some("+"), 100.0));
        let id = rt.register(Counter::new(config(1000)));
        let stat = find_id(rt.document(), "stat");

        // Visible at registration: animation starts at t=0 showing 0
        assert_eq!(rt.document().text_content(stat), "0");
        assert!(matches!(
            rt.behavior::<Counter>(id).unwrap().phase(stat),
            Some(CounterPhase::Animating { start: 0, .. })
        ));

        let mut seen = Vec::new();
        while rt.now() < 992 {
            rt.advance(16);
            let text = rt.document().text_content(stat);
            seen.push(text.replace(',', "").parse::<u64>().unwrap());
        }
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(*seen.last().unwrap() < 1000);

        rt.advance(16);
        assert_eq!(rt.document().text_content(stat), "1,000+");
        assert_eq!(
            rt.behavior::<Counter>(id).unwrap().phase(stat),
            Some(CounterPhase::Settled)
        );
    }

    #[test]
    fn settles_exactly_at_duration() {
        let mut rt = ready_runtime(counter_doc("1000", None, 100.0));
        let id = rt.register(Counter::new(config(1000)));
        let stat = find_id(rt.document(), "stat");

        rt.advance(999);
        assert_eq!(rt.document().text_content(stat), "999");
        rt.advance(1);
        assert_eq!(rt.document().text_content(stat), "1,000");
        assert_eq!(
            rt.behavior::<Counter>(id).unwrap().phase(stat),
            Some(CounterPhase::Settled)
        );
    }

    #[test]
    fn duration_on_a_frame_boundary_ends_on_that_frame() {
        let mut rt = ready_runtime(counter_doc("64", None, 100.0));
        let id = rt.register(Counter::new(config(64)));
        let stat = find_id(rt.document(), "stat");
        rt.advance(64);
        assert_eq!(rt.document().text_content(stat), "64");
        assert_eq!(rt.page().scheduler.frames_delivered(), 4);
        assert_eq!(rt.page().scheduler.pending_for(id), 0);
    }

    #[test]
    fn suffix_only_on_final_value() {
        let mut rt = ready_runtime(counter_doc("500", Some("%"), 100.0));
        rt.register(Counter::new(config(1000)));
        let stat = find_id(rt.document(), "stat");
        rt.advance(320);
        assert!(!rt.document().text_content(stat).ends_with('%'));
        rt.advance(1000);
        assert_eq!(rt.document().text_content(stat), "500%");
    }

    #[test]
    fn waits_until_half_visible() {
        let mut rt = ready_runtime(counter_doc("250", None, 2000.0));
        let id = rt.register(Counter::new(config(1000)));
        let stat = find_id(rt.document(), "stat");
        rt.advance(2000);
        assert_eq!(rt.behavior::<Counter>(id).unwrap().phase(stat), Some(CounterPhase::Idle));

        // 2000..2040 with viewport 1230..2030 is 75% visible
        rt.scroll_to(1230.0);
        assert!(matches!(
            rt.behavior::<Counter>(id).unwrap().phase(stat),
            Some(CounterPhase::Animating { start: 2000, .. })
        ));
        assert!(!rt.page().observers.is_observing(stat));
    }

    #[test]
    fn stops_requesting_frames_after_settling() {
        let mut rt = ready_runtime(counter_doc("10", None, 100.0));
        let id = rt.register(Counter::new(config(100)));
        rt.advance(500);
        assert_eq!(rt.page().scheduler.pending_for(id), 0);
        let delivered = rt.page().scheduler.frames_delivered();
        rt.advance(500);
        assert_eq!(rt.page().scheduler.frames_delivered(), delivered);
    }

    #[test]
    fn data_duration_overrides_default() {
        let mut doc = counter_doc("100", None, 100.0);
        let stat = find_id(&doc, "stat");
        doc.node_mut(stat).set_attr("data-duration", "200");
        let mut rt = ready_runtime(doc);
        rt.register(Counter::new(config(5000)));
        rt.advance(208);
        assert_eq!(rt.document().text_content(stat), "100");
    }

    #[test]
    fn negative_or_suffixed_target_counts_to_zero() {
        for target in ["-40", "12500+"] {
            let mut doc = counter_doc(target, None, 0.0);
            let written = settle_all(&mut doc, &CounterConfig::default());
            assert_eq!(written, 1);
            assert_eq!(doc.text_content(find_id(&doc, "stat")), "0", "target {target:?}");
        }
    }

    #[test]
    fn invalid_target_counts_to_zero() {
        let mut rt = ready_runtime(counter_doc("lots", Some("+"), 100.0));
        rt.register(Counter::new(config(100)));
        let stat = find_id(rt.document(), "stat");
        rt.advance(200);
        assert_eq!(rt.document().text_content(stat), "0+");
    }

    #[test]
    fn without_observer_counters_settle_immediately() {
        let mut rt = runtime_with(counter_doc("4200", Some("+"), 2500.0), no_observer());
        let id = rt.register(Counter::new(config(1000)));
        let stat = find_id(rt.document(), "stat");
        assert_eq!(rt.document().text_content(stat), "4,200+");
        assert_eq!(rt.page().scheduler.pending_for(id), 0);
    }

    #[test]
    fn settle_all_writes_final_values() {
        let mut doc = counter_doc("12500", Some(" students"), 0.0);
        let written = settle_all(&mut doc, &CounterConfig::default());
        let stat = find_id(&doc, "stat");
        assert_eq!(written, 1);
        assert_eq!(doc.text_content(stat), "12,500 students");
    }
}
