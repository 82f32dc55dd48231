//! Page behaviors.
//!
//! Each submodule provides one self-contained [`Behavior`](crate::runtime::Behavior)
//! that locates its targets through the markup contract below, keeps its own
//! state, and reacts to page events.
//!
//! | Behavior | Reads | Writes |
//! |----------|-------|--------|
//! | [`reveal::Reveal`] | `.reveal`, `.text-reveal`, `.char-reveal`, `data-reveal-threshold`, `data-reveal-margin` | `revealed` |
//! | [`splitter::Splitter`] | `.text-reveal`, `.char-reveal` | wrapper / per-character spans |
//! | [`progress::ScrollProgress`] | viewport | `div.scroll-progress` width |
//! | [`parallax::Parallax`] | `.parallax-layer`, `data-speed` | `transform` |
//! | [`loader::Loader`] | `#page-loader` | `hidden`, detaches |
//! | [`counter::Counter`] | `.counter`, `data-target`, `data-suffix`, `data-duration` | text |
//! | [`smooth_scroll::SmoothScroll`] | `a[href^="#"]` | scroll position |
//! | [`faq::Faq`] | `.faq-item`, `.faq-question` | `open` |
//! | [`carousel::Carousel`] | `#testimonial-track`, `.testimonial-slide`, `#carousel-indicators` | `transform`, `active` |
//! | [`form::FormValidation`] | `form[data-validate]`, `[required]`, `.form-success` | `error`, `visible`, values |
//!
//! Missing targets are never an error: the behavior logs at `debug` and stays
//! idle.

pub mod carousel;
pub mod counter;
pub mod faq;
pub mod form;
pub mod loader;
pub mod parallax;
pub mod progress;
pub mod reveal;
pub mod smooth_scroll;
pub mod splitter;

/// Class added to revealed elements.
pub const REVEALED_CLASS: &str = "revealed";
