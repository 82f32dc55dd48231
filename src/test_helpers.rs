//! Shared test utilities for the behavior test suites.
//!
//! Provides page/runtime builders and lookups that panic with a clear
//! message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! doc.append(body, El::new("section").id("about").class("reveal").at(1200.0, 200.0));
//!
//! let mut rt = ready_runtime(doc);
//! let about = find_id(rt.document(), "about");
//! ```

pub use crate::dom::{Document, El, NodeId};
pub use crate::page::{Capabilities, Page, ReadyState, Viewport};
pub use crate::runtime::Runtime;

/// Viewport used by most tests: 800px tall over a 3000px document.
pub fn test_viewport() -> Viewport {
    Viewport::new(800.0, 3000.0)
}

/// A page whose DOM is already interactive.
pub fn ready_page(doc: Document) -> Page {
    Page::new(doc, test_viewport()).with_ready_state(ReadyState::Interactive)
}

/// A runtime over an interactive page with default capabilities.
pub fn ready_runtime(doc: Document) -> Runtime {
    Runtime::new(ready_page(doc))
}

/// A runtime over an interactive page with the given capabilities.
pub fn runtime_with(doc: Document, capabilities: Capabilities) -> Runtime {
    Runtime::new(ready_page(doc).with_capabilities(capabilities))
}

pub fn no_observer() -> Capabilities {
    Capabilities {
        intersection_observer: false,
        reduced_motion: false,
    }
}

pub fn reduced_motion() -> Capabilities {
    Capabilities {
        intersection_observer: true,
        reduced_motion: true,
    }
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a connected element by id. Panics if not found.
pub fn find_id(doc: &Document, id: &str) -> NodeId {
    doc.get_by_id(id).unwrap_or_else(|| {
        let ids: Vec<String> = doc
            .query(|n| n.id().is_some())
            .into_iter()
            .filter_map(|n| doc.node(n).id().map(str::to_string))
            .collect();
        panic!("element '#{id}' not found. Available: {ids:?}")
    })
}

pub fn has_class(doc: &Document, node: NodeId, class: &str) -> bool {
    doc.node(node).has_class(class)
}

/// Number of connected elements carrying `class`.
pub fn count_class(doc: &Document, class: &str) -> usize {
    doc.query_class(class).len()
}

/// Inline style property of `node`. Panics if unset.
pub fn style_of(doc: &Document, node: NodeId, property: &str) -> String {
    doc.node(node)
        .style(property)
        .unwrap_or_else(|| panic!("{node:?} has no '{property}' style"))
        .to_string()
}
