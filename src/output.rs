//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Config
//!     Source: site/site-fx.toml
//! Reveal
//!     threshold 0.1, margin 0px 0px -50px 0px
//!     markers: reveal, text-reveal, char-reveal
//! Counter
//!     2000 ms, threshold 0.5, locale en-US
//! ...
//! Footer
//!     template full: 5 links, 4 divisions, 3 social
//! Config OK
//! ```
//!
//! ## Demo
//!
//! ```text
//! Behaviors
//! 001 scroll-progress
//! 002 loader
//! ...
//! Session
//!     Elapsed: 10500 ms, 412 frames
//!     Scroll: 1800px (progress 54.5%)
//!     Revealed: 7 of 7
//!     Counters: 12,500+ | 98% | 340 | 1,911
//!     Loader: removed
//!     FAQ open: faq-1
//!     Carousel: slide 2
//!     Footer: replaced-placeholder
//! Submissions
//! 001 contact-form (3 fields) at 7500 ms
//! Wrote demo-out/index.html
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::FxConfig;
use crate::demo::DemoReport;
use crate::footer::FooterTemplate;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn section(lines: &mut Vec<String>, title: &str, body: &[String]) {
    lines.push(title.to_string());
    lines.extend(body.iter().map(|l| format!("{}{}", indent(1), l)));
}

/// Serialized name of a serde enum value, e.g. `"en-US"` or `"removed"`.
fn serde_name<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

// ============================================================================
// check
// ============================================================================

/// Format the resolved configuration. `source` is the config file, or
/// `None` when stock defaults are in use.
pub fn format_check_output(config: &FxConfig, source: Option<&Path>) -> Vec<String> {
    let mut lines = Vec::new();
    let origin = match source {
        Some(path) => format!("Source: {}", path.display()),
        None => "Source: stock defaults".to_string(),
    };
    section(&mut lines, "Config", &[origin]);

    let motion = if config.motion.respect_reduced_motion {
        "honors reduced motion"
    } else {
        "ignores reduced motion"
    };
    section(&mut lines, "Motion", &[motion.to_string()]);

    section(
        &mut lines,
        "Reveal",
        &[
            format!(
                "threshold {}, margin {}",
                config.reveal.threshold, config.reveal.root_margin
            ),
            format!("markers: {}", config.reveal.markers.join(", ")),
            format!("char stagger {} ms", config.text.char_stagger_ms),
        ],
    );
    section(
        &mut lines,
        "Counter",
        &[format!(
            "{} ms, threshold {}, locale {}",
            config.counter.duration_ms,
            config.counter.threshold,
            serde_name(&config.counter.locale)
        )],
    );
    section(
        &mut lines,
        "Parallax",
        &[format!("default speed {}", config.parallax.default_speed)],
    );
    section(
        &mut lines,
        "Loader",
        &[format!(
            "#{}: min {} ms, max {} ms, exit {} ms",
            config.loader.element_id,
            config.loader.min_display_ms,
            config.loader.max_wait_ms,
            config.loader.exit_ms
        )],
    );
    section(
        &mut lines,
        "Carousel",
        &[format!("every {} ms", config.carousel.interval_ms)],
    );
    section(
        &mut lines,
        "Smooth scroll",
        &[format!(
            "{} ms, offset {}px",
            config.smooth_scroll.duration_ms, config.smooth_scroll.offset_px
        )],
    );

    let footer = &config.footer;
    let layout = match footer.template {
        FooterTemplate::Full => format!(
            "template full: {} links, {} divisions, {} social",
            footer.navigation.len(),
            footer.divisions.len(),
            footer.social.len()
        ),
        FooterTemplate::Compact => {
            format!("template compact: {} links", footer.navigation.len())
        }
    };
    section(&mut lines, "Footer", &[footer.organization.clone(), layout]);

    lines.push("Config OK".to_string());
    lines
}

pub fn print_check_output(config: &FxConfig, source: Option<&Path>) {
    for line in format_check_output(config, source) {
        println!("{}", line);
    }
}

// ============================================================================
// demo
// ============================================================================

/// Format a finished demo session. `written` is the snapshot path, if one
/// was written.
pub fn format_demo_report(report: &DemoReport, written: Option<&Path>) -> Vec<String> {
    let mut lines = vec!["Behaviors".to_string()];
    for (i, name) in report.behaviors.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), name));
    }

    let mut session = vec![
        format!(
            "Elapsed: {} ms, {} frames",
            report.elapsed_ms, report.frames
        ),
        match &report.progress_width {
            Some(width) => format!("Scroll: {}px (progress {})", report.scroll_y, width),
            None => format!("Scroll: {}px", report.scroll_y),
        },
        format!("Revealed: {} of {}", report.revealed, report.revealable),
    ];
    if report.reduced_motion {
        session.push("Reduced motion: final states applied".to_string());
    }
    if !report.counters.is_empty() {
        session.push(format!("Counters: {}", report.counters.join(" | ")));
    }
    if let Some(loader) = report.loader {
        session.push(format!("Loader: {}", serde_name(&loader)));
    }
    session.push(if report.faq_open.is_empty() {
        "FAQ open: none".to_string()
    } else {
        format!("FAQ open: {}", report.faq_open.join(", "))
    });
    if let Some(index) = report.carousel_index {
        session.push(format!("Carousel: slide {}", index + 1));
    }
    if let Some(footer) = report.footer {
        session.push(format!("Footer: {}", serde_name(&footer)));
    }
    section(&mut lines, "Session", &session);

    if !report.submissions.is_empty() {
        lines.push("Submissions".to_string());
        for (i, submission) in report.submissions.iter().enumerate() {
            lines.push(format!(
                "{} {} ({} fields) at {} ms",
                format_index(i + 1),
                submission.form_id.as_deref().unwrap_or("(unnamed form)"),
                submission.fields.len(),
                submission.submitted_at
            ));
        }
    }

    if let Some(path) = written {
        lines.push(format!("Wrote {}", path.display()));
    }
    lines
}

pub fn print_demo_report(report: &DemoReport, written: Option<&Path>) {
    for line in format_demo_report(report, written) {
        println!("{}", line);
    }
}
