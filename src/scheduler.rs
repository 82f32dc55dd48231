//! Single-threaded task queue driven by a virtual clock.
//!
//! Stands in for the browser event loop's timer and animation-frame queues.
//! Nothing runs on its own: the [`Runtime`](crate::runtime::Runtime) pops due
//! tasks with [`Scheduler::pop_due`] and routes each one to the behavior that
//! scheduled it.
//!
//! Tasks fire in `(due, sequence)` order, so two tasks due at the same
//! millisecond fire in the order they were scheduled. Animation-frame
//! requests are due at the next frame boundary after the request; every
//! request made before that boundary fires at it, which is how a chain of
//! frame callbacks paces itself.

use crate::types::{BehaviorId, Millis};
use std::collections::BTreeMap;

/// Default frame period, roughly 60 Hz.
pub const FRAME_INTERVAL_MS: Millis = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Timeout,
    Interval { period: Millis },
    Frame,
}

#[derive(Debug, Clone, Copy)]
struct Task {
    id: TaskId,
    owner: BehaviorId,
    kind: TaskKind,
}

/// A task that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub task: TaskId,
    pub owner: BehaviorId,
    pub at: Millis,
    pub frame: bool,
}

#[derive(Debug)]
pub struct Scheduler {
    now: Millis,
    frame_interval: Millis,
    next_seq: u64,
    queue: BTreeMap<(Millis, u64), Task>,
    frames_delivered: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_frame_interval(FRAME_INTERVAL_MS)
    }

    pub fn with_frame_interval(frame_interval: Millis) -> Self {
        Self {
            now: 0,
            frame_interval: frame_interval.max(1),
            next_seq: 0,
            queue: BTreeMap::new(),
            frames_delivered: 0,
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Animation frames handed out so far.
    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }

    fn schedule(&mut self, owner: BehaviorId, due: Millis, kind: TaskKind) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = TaskId(seq);
        self.queue.insert((due, seq), Task { id, owner, kind });
        id
    }

    /// Fire once, `delay` ms from now.
    pub fn set_timeout(&mut self, owner: BehaviorId, delay: Millis) -> TaskId {
        self.schedule(owner, self.now + delay, TaskKind::Timeout)
    }

    /// Fire every `period` ms until cancelled. A zero period is treated as 1.
    pub fn set_interval(&mut self, owner: BehaviorId, period: Millis) -> TaskId {
        let period = period.max(1);
        self.schedule(owner, self.now + period, TaskKind::Interval { period })
    }

    /// Time of the next frame boundary strictly after now.
    pub fn next_frame_at(&self) -> Millis {
        (self.now / self.frame_interval + 1) * self.frame_interval
    }

    /// Fire at the next frame boundary.
    pub fn request_frame(&mut self, owner: BehaviorId) -> TaskId {
        let due = self.next_frame_at();
        self.schedule(owner, due, TaskKind::Frame)
    }

    /// Drop a pending task. Returns whether it was still pending.
    pub fn cancel(&mut self, task: TaskId) -> bool {
        let key = self
            .queue
            .iter()
            .find(|(_, t)| t.id == task)
            .map(|(k, _)| *k);
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    /// Drop every pending task owned by `owner`.
    pub fn cancel_owned(&mut self, owner: BehaviorId) {
        self.queue.retain(|_, t| t.owner != owner);
    }

    /// Pending tasks owned by `owner`.
    pub fn pending_for(&self, owner: BehaviorId) -> usize {
        self.queue.values().filter(|t| t.owner == owner).count()
    }

    /// Pending frame requests owned by `owner`.
    pub fn pending_frames_for(&self, owner: BehaviorId) -> usize {
        self.queue
            .values()
            .filter(|t| t.owner == owner && t.kind == TaskKind::Frame)
            .count()
    }

    pub fn is_pending(&self, task: TaskId) -> bool {
        self.queue.values().any(|t| t.id == task)
    }

    /// Pop the earliest task due at or before `until`, advancing the clock to
    /// its due time. Intervals are re-armed for their next period.
    pub fn pop_due(&mut self, until: Millis) -> Option<Fired> {
        let (&(due, seq), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        let task = self.queue.remove(&(due, seq))?;
        self.now = self.now.max(due);

        if let TaskKind::Interval { period } = task.kind {
            self.queue.insert((due + period, seq), task);
        }
        let frame = task.kind == TaskKind::Frame;
        if frame {
            self.frames_delivered += 1;
        }
        Some(Fired {
            task: task.id,
            owner: task.owner,
            at: due,
            frame,
        })
    }

    /// Move the clock forward to `t` without firing anything.
    pub fn advance_to(&mut self, t: Millis) {
        self.now = self.now.max(t);
    }
}
