//! # site-fx
//!
//! Client-side embellishments for a static institutional website, modelled
//! headlessly: reveal-on-scroll, text splitting, a scroll progress bar,
//! parallax layers, a page loader, statistic counters, a FAQ accordion, a
//! testimonial carousel, smooth anchor scrolling, form validation and a
//! footer generator.
//!
//! # Architecture: Behaviors on a Page
//!
//! A [`page::Page`] holds everything the browser would: the element tree,
//! the viewport, the ready state, platform capabilities, a timer/frame queue
//! and the intersection observers. Each embellishment is a
//! [`runtime::Behavior`] that owns its own state and only touches the page
//! through the [`runtime::Context`] handed to it.
//!
//! ```text
//!                  ┌──────────── Runtime ────────────┐
//!   scroll/click ─►│ broadcast ─► Behavior::handle    │
//!   advance(ms)  ─►│ Scheduler ─► owner's handle      │──► Page (DOM, viewport)
//!                  │ Observers ─► owner's handle      │
//!                  └──────────────────────────────────┘
//! ```
//!
//! Nothing runs on its own. Time only passes through
//! [`runtime::Runtime::advance`], which makes every behavior deterministic
//! and testable without a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | Arena-backed element tree with classes, attributes, styles, text and layout bounds |
//! | [`page`] | Viewport, ready state, capabilities and the `Page` aggregate |
//! | [`scheduler`] | Virtual clock; timeouts, intervals and animation frames |
//! | [`intersection`] | Root margins, intersection ratios and the observer registry |
//! | [`ready`] | Run-now-or-defer gate on document readiness |
//! | [`runtime`] | `Behavior` trait, event dispatch and settling |
//! | [`effects`] | One module per page behavior |
//! | [`footer`] | Footer markup rendered with Maud, and its placement |
//! | [`site`] | Installs every behavior from config, applies reduced motion |
//! | [`config`] | `site-fx.toml` loading, merging and validation |
//! | [`demo`] | Built-in demo page, scripted session and HTML snapshot |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Small shared types (`Millis`, `BehaviorId`, `FormSubmission`) |
//!
//! # Design Decisions
//!
//! ## Behaviors Own Their State
//!
//! There is no module-level mutable state. A carousel's index, a counter's
//! start time or the parallax frame guard live in the behavior value, which
//! the runtime owns. Tests reach them through
//! [`runtime::Runtime::behavior`].
//!
//! ## Events Go Everywhere, Callbacks Go Home
//!
//! Page events (`load`, `scroll`, `resize`, `click`, `submit`) are broadcast
//! to every attached behavior, like document-level listeners. Timers, frames
//! and intersection reports are routed only to the behavior that asked for
//! them.
//!
//! ## Reduced Motion Is Decided Once
//!
//! [`site::install`] checks the capability a single time. Under reduced
//! motion the animated behaviors are not installed at all; a static
//! behavior applies their final states instead, so no animation frame is
//! ever requested.
//!
//! ## Missing Markup Is Not an Error
//!
//! A page without a carousel, loader or counters is normal. Behaviors log at
//! `debug` and stay idle. Only configuration loading and file output return
//! errors.

pub mod config;
pub mod demo;
pub mod dom;
pub mod effects;
pub mod footer;
pub mod intersection;
pub mod output;
pub mod page;
pub mod ready;
pub mod runtime;
pub mod scheduler;
pub mod site;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
