//! Intersection observation.
//!
//! Models `IntersectionObserver` against the page [`Viewport`]: the root is
//! the viewport grown (or shrunk) by a [`RootMargin`], and an element's
//! intersection ratio is the fraction of its height inside that root.
//!
//! Observers report a target whenever its intersecting state changes, and
//! once on first observation, mirroring the initial callback browsers
//! deliver. A target counts as intersecting when its ratio reaches the
//! observer's threshold (and is non-zero for a zero threshold).

use crate::dom::{Bounds, Document, NodeId};
use crate::page::Viewport;
use crate::types::BehaviorId;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarginError {
    #[error("root margin must have 1 to 4 values, got {0}")]
    Arity(usize),
    #[error("invalid root margin value '{0}' (expected px or %)")]
    Value(String),
}

/// One side of a root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginLength {
    Px(f64),
    /// Percentage of the viewport height.
    Percent(f64),
}

impl MarginLength {
    fn resolve(self, inner_height: f64) -> f64 {
        match self {
            MarginLength::Px(px) => px,
            MarginLength::Percent(pct) => inner_height * pct / 100.0,
        }
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginLength::Px(v) => write!(f, "{v}px"),
            MarginLength::Percent(v) => write!(f, "{v}%"),
        }
    }
}

impl FromStr for MarginLength {
    type Err = MarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |num: &str| {
            num.trim()
                .parse::<f64>()
                .map_err(|_| MarginError::Value(s.to_string()))
        };
        if let Some(num) = s.strip_suffix("px") {
            Ok(MarginLength::Px(parse(num)?))
        } else if let Some(num) = s.strip_suffix('%') {
            Ok(MarginLength::Percent(parse(num)?))
        } else if s == "0" {
            Ok(MarginLength::Px(0.0))
        } else {
            Err(MarginError::Value(s.to_string()))
        }
    }
}

/// CSS margin shorthand applied to the observation root.
///
/// Only the vertical sides affect the result since the page model has no
/// horizontal layout; the horizontal sides are kept for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl Default for RootMargin {
    fn default() -> Self {
        let zero = MarginLength::Px(0.0);
        Self {
            top: zero,
            right: zero,
            bottom: zero,
            left: zero,
        }
    }
}

impl FromStr for RootMargin {
    type Err = MarginError;

    /// Parse `"10px"`, `"10px 5%"`, `"0px 0px -50px"` or `"0px 0px -50px 0px"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<MarginLength>, _>>()?;
        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            other => return Err(MarginError::Arity(other.len())),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Observer configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl ObserverOptions {
    pub fn new(threshold: f64, root_margin: RootMargin) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            root_margin,
        }
    }

    pub fn is_intersecting(&self, ratio: f64) -> bool {
        if self.threshold <= 0.0 {
            ratio > 0.0
        } else {
            ratio >= self.threshold
        }
    }
}

/// Fraction of `bounds` visible inside the viewport grown by `margin`.
///
/// Zero-height elements count as fully visible when their top edge lies
/// inside the root.
pub fn intersection_ratio(bounds: Bounds, viewport: &Viewport, margin: &RootMargin) -> f64 {
    let root_top = viewport.scroll_y - margin.top.resolve(viewport.inner_height);
    let root_bottom =
        viewport.scroll_y + viewport.inner_height + margin.bottom.resolve(viewport.inner_height);
    if root_bottom <= root_top {
        return 0.0;
    }
    if bounds.height <= 0.0 {
        return if bounds.top >= root_top && bounds.top <= root_bottom {
            1.0
        } else {
            0.0
        };
    }
    let visible = bounds.bottom().min(root_bottom) - bounds.top.max(root_top);
    (visible / bounds.height).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(usize);

/// A reported change for one observed target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub ratio: f64,
    pub is_intersecting: bool,
}

/// Entries collected for one observer.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverBatch {
    pub owner: BehaviorId,
    pub observer: ObserverId,
    pub entries: Vec<IntersectionEntry>,
}

#[derive(Debug)]
struct Observer {
    owner: BehaviorId,
    options: ObserverOptions,
    targets: Vec<NodeId>,
    last: HashMap<NodeId, bool>,
    disconnected: bool,
}

/// Registry of every observer on the page.
#[derive(Debug, Default)]
pub struct Observers {
    observers: Vec<Observer>,
}

impl Observers {
    pub fn create(&mut self, owner: BehaviorId, options: ObserverOptions) -> ObserverId {
        self.observers.push(Observer {
            owner,
            options,
            targets: Vec::new(),
            last: HashMap::new(),
            disconnected: false,
        });
        ObserverId(self.observers.len() - 1)
    }

    pub fn observe(&mut self, observer: ObserverId, target: NodeId) {
        if let Some(o) = self.observers.get_mut(observer.0) {
            if !o.disconnected && !o.targets.contains(&target) {
                o.targets.push(target);
            }
        }
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: NodeId) {
        if let Some(o) = self.observers.get_mut(observer.0) {
            o.targets.retain(|&t| t != target);
            o.last.remove(&target);
        }
    }

    /// Stop observing everything; the observer never reports again.
    pub fn disconnect(&mut self, observer: ObserverId) {
        if let Some(o) = self.observers.get_mut(observer.0) {
            o.targets.clear();
            o.last.clear();
            o.disconnected = true;
        }
    }

    /// Disconnect every observer created by `owner`.
    pub fn disconnect_owned(&mut self, owner: BehaviorId) {
        let ids: Vec<ObserverId> = (0..self.observers.len())
            .filter(|&i| self.observers[i].owner == owner)
            .map(ObserverId)
            .collect();
        for id in ids {
            self.disconnect(id);
        }
    }

    /// Whether any observer is watching `target`.
    pub fn is_observing(&self, target: NodeId) -> bool {
        self.observers.iter().any(|o| o.targets.contains(&target))
    }

    pub fn observed_count(&self, observer: ObserverId) -> usize {
        self.observers
            .get(observer.0)
            .map(|o| o.targets.len())
            .unwrap_or(0)
    }

    /// Recompute every target and collect state changes.
    ///
    /// Detached targets are reported as non-intersecting.
    pub fn collect(&mut self, document: &Document, viewport: &Viewport) -> Vec<ObserverBatch> {
        let mut batches = Vec::new();
        for (index, observer) in self.observers.iter_mut().enumerate() {
            let mut entries = Vec::new();
            for &target in &observer.targets {
                let ratio = if document.is_connected(target) {
                    intersection_ratio(
                        document.node(target).bounds(),
                        viewport,
                        &observer.options.root_margin,
                    )
                } else {
                    0.0
                };
                let is_intersecting = observer.options.is_intersecting(ratio);
                if observer.last.insert(target, is_intersecting) != Some(is_intersecting) {
                    entries.push(IntersectionEntry {
                        target,
                        ratio,
                        is_intersecting,
                    });
                }
            }
            if !entries.is_empty() {
                batches.push(ObserverBatch {
                    owner: observer.owner,
                    observer: ObserverId(index),
                    entries,
                });
            }
        }
        batches
    }

    /// Build batches reporting `target` at a forced `ratio` for every observer
    /// watching it, regardless of layout. Used to simulate intersections.
    pub fn force(&mut self, target: NodeId, ratio: f64) -> Vec<ObserverBatch> {
        let mut batches = Vec::new();
        for (index, observer) in self.observers.iter_mut().enumerate() {
            if !observer.targets.contains(&target) {
                continue;
            }
            let is_intersecting = observer.options.is_intersecting(ratio);
            observer.last.insert(target, is_intersecting);
            batches.push(ObserverBatch {
                owner: observer.owner,
                observer: ObserverId(index),
                entries: vec![IntersectionEntry {
                    target,
                    ratio,
                    is_intersecting,
                }],
            });
        }
        batches
    }
}
