//! Small shared types used across the page model and the behaviors.

use serde::Serialize;

/// Virtual page time in whole milliseconds since the page started.
pub type Millis = u64;

/// Identifies a behavior registered with a [`Runtime`](crate::runtime::Runtime).
///
/// Timers, frame requests and observers are owned by a behavior; the runtime
/// uses this id to route their callbacks back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BehaviorId(pub(crate) usize);

/// A validated form captured by the form behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSubmission {
    /// The form's `id` attribute, if it has one.
    pub form_id: Option<String>,
    /// Captured `(name, value)` pairs in document order.
    pub fields: Vec<(String, String)>,
    /// Page time at which the form was submitted.
    pub submitted_at: Millis,
}

impl FormSubmission {
    /// Look up a captured field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}
