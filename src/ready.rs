//! Ready-gate: run work now if the DOM is ready, otherwise once it is.

use crate::page::ReadyState;

/// Holds work back until the document is interactive.
///
/// The runtime keeps one gate for behavior attachment: behaviors registered
/// on a ready page attach immediately, the rest wait for
/// `DOMContentLoaded`.
#[derive(Debug)]
pub struct ReadyGate<T> {
    open: bool,
    pending: Vec<T>,
}

impl<T> ReadyGate<T> {
    pub fn new(state: ReadyState) -> Self {
        Self {
            open: state.is_ready(),
            pending: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Hand back `item` to run now if the gate is open, otherwise keep it.
    pub fn run_or_defer(&mut self, item: T) -> Option<T> {
        if self.open {
            Some(item)
        } else {
            self.pending.push(item);
            None
        }
    }

    /// Open the gate and return the deferred work in arrival order.
    pub fn open(&mut self) -> Vec<T> {
        self.open = true;
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
