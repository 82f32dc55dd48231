//! Built-in demo page and scripted visitor session.
//!
//! [`demo_page`] builds a small institutional landing page that exercises
//! every behavior. [`run`] installs the effects on it and plays a fixed
//! session against the virtual clock:
//!
//! 1. DOM ready at 0 ms, `load` at 300 ms
//! 2. scroll to the bottom in 400px steps
//! 3. click the "FAQ" nav link and let the smooth scroll finish
//! 4. open two FAQ entries
//! 5. jump the carousel to the third slide, wait one auto-advance
//! 6. submit the contact form empty, then filled in
//! 7. idle until every animation has settled
//!
//! The resulting DOM can be written out as a static HTML snapshot.
//!
//! ```text
//! demo-out/
//! ├── index.html      # DOM after the session, with demo styles
//! └── report.json     # DemoReport
//! ```

use crate::config::FxConfig;
use crate::dom::{Document, El, NodeId};
use crate::effects::counter::COUNTER_CLASS;
use crate::effects::faq::{ITEM_CLASS, OPEN_CLASS};
use crate::effects::loader::{Loader, LoaderState};
use crate::effects::progress::PROGRESS_CLASS;
use crate::effects::reveal;
use crate::effects::{REVEALED_CLASS, carousel::Carousel};
use crate::footer::{Footer, Placement};
use crate::page::{Capabilities, Page, Viewport};
use crate::runtime::Runtime;
use crate::site::{self, Installed};
use crate::types::{FormSubmission, Millis};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const CSS: &str = include_str!("../static/demo.css");

const VIEWPORT_HEIGHT: f64 = 800.0;
const SCROLL_STEP: f64 = 400.0;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct DemoOptions {
    pub capabilities: Capabilities,
    pub year: i32,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::default(),
            year: crate::footer::current_year(),
        }
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub capabilities: Capabilities,
    pub reduced_motion: bool,
    pub behaviors: Vec<&'static str>,
    pub elapsed_ms: Millis,
    pub frames: u64,
    pub scroll_y: f64,
    pub progress_width: Option<String>,
    pub revealed: usize,
    pub revealable: usize,
    pub counters: Vec<String>,
    pub faq_open: Vec<String>,
    pub carousel_index: Option<usize>,
    pub loader: Option<LoaderState>,
    pub footer: Option<Placement>,
    pub submissions: Vec<FormSubmission>,
}

pub struct DemoRun {
    pub runtime: Runtime,
    pub installed: Installed,
    pub report: DemoReport,
}

/// Lays sections out top to bottom.
struct Flow {
    top: f64,
}

impl Flow {
    fn take(&mut self, height: f64) -> (f64, f64) {
        let top = self.top;
        self.top += height;
        (top, height)
    }
}

fn section(doc: &mut Document, parent: NodeId, flow: &mut Flow, el: El, height: f64) -> NodeId {
    let (top, height) = flow.take(height);
    doc.append(parent, el.at(top, height))
}

/// The demo landing page. Returns the document and its total height.
pub fn demo_page() -> (Document, f64) {
    let mut doc = Document::new();
    let body = doc.body();
    let mut flow = Flow { top: 0.0 };

    let loader = doc.append(body, El::new("div").id("page-loader").class("page-loader"));
    doc.append(loader, El::new("div").class("spinner"));

    let header = section(&mut doc, body, &mut flow, El::new("header").class("site-header"), 80.0);
    let nav = doc.append(header, El::new("nav"));
    for (label, href) in [
        ("About", "#about"),
        ("Facts", "#stats"),
        ("FAQ", "#faq"),
        ("Contact", "#contact"),
        ("Top", "#"),
    ] {
        doc.append(nav, El::new("a").id(&format!("nav-{}", label.to_lowercase())).attr("href", href).text(label));
    }

    let main = doc.append(body, El::new("main"));

    let hero = section(&mut doc, main, &mut flow, El::new("section").id("hero").class("hero"), 620.0);
    doc.append(hero, El::new("div").class("parallax-layer").attr("data-speed", "0.3"));
    doc.append(hero, El::new("div").class("parallax-layer"));
    doc.append(hero, El::new("h1").class("char-reveal").text("Northbridge Institute").at(200.0, 80.0));
    doc.append(
        hero,
        El::new("p")
            .class("text-reveal")
            .text("Teaching, research and service since 1911")
            .at(300.0, 40.0),
    );

    let about = section(&mut doc, main, &mut flow, El::new("section").id("about").class("reveal"), 600.0);
    let top = doc.node(about).bounds().top;
    doc.append(about, El::new("h2").class("text-reveal").text("About the Institute").at(top + 60.0, 50.0));
    doc.append(
        about,
        El::new("p").text("A public institute of technology serving the northern harbour region."),
    );

    let stats = section(&mut doc, main, &mut flow, El::new("section").id("stats").class("reveal"), 500.0);
    let top = doc.node(stats).bounds().top;
    let row = doc.append(stats, El::new("div").class("stats"));
    for (i, (target, suffix, label)) in [
        ("12500", Some("+"), "Students"),
        ("98", Some("%"), "Graduate employment"),
        ("340", None, "Faculty"),
        ("1911", None, "Founded"),
    ]
    .into_iter()
    .enumerate()
    {
        let stat = doc.append(row, El::new("div").class("stat"));
        let mut counter = El::new("span")
            .id(&format!("stat-{i}"))
            .class(COUNTER_CLASS)
            .attr("data-target", target)
            .text("0")
            .at(top + 120.0, 60.0);
        if let Some(suffix) = suffix {
            counter = counter.attr("data-suffix", suffix);
        }
        doc.append(stat, counter);
        doc.append(stat, El::new("p").text(label));
    }

    let faq = section(&mut doc, main, &mut flow, El::new("section").id("faq"), 700.0);
    doc.append(faq, El::new("h2").text("Frequently asked questions"));
    for (i, (question, answer)) in [
        ("When are applications due?", "Applications for the autumn term close on 1 March."),
        ("Is there on-campus housing?", "Yes, for all first-year students."),
        ("Can I study part time?", "Most programmes offer a part-time track."),
    ]
    .into_iter()
    .enumerate()
    {
        let item = doc.append(faq, El::new("div").id(&format!("faq-{i}")).class(ITEM_CLASS));
        doc.append(item, El::new("button").id(&format!("faq-q-{i}")).class("faq-question").text(question));
        doc.append(item, El::new("div").class("faq-answer").text(answer));
    }

    let testimonials = section(
        &mut doc,
        main,
        &mut flow,
        El::new("section").id("testimonials").class("reveal"),
        500.0,
    );
    let frame = doc.append(testimonials, El::new("div").class("carousel"));
    let track = doc.append(frame, El::new("div").id("testimonial-track"));
    for quote in [
        "The lab facilities opened doors I did not know existed.",
        "Small classes and faculty who know your name.",
        "Evening courses let me change careers without quitting.",
    ] {
        doc.append(track, El::new("blockquote").class("testimonial-slide").text(quote));
    }
    doc.append(testimonials, El::new("div").id("carousel-indicators"));

    let contact = section(&mut doc, main, &mut flow, El::new("section").id("contact").class("reveal"), 700.0);
    let form = doc.append(contact, El::new("form").id("contact-form").attr("data-validate", ""));
    doc.append(
        form,
        El::new("input")
            .id("field-name")
            .attr("name", "name")
            .attr("type", "text")
            .attr("required", ""),
    );
    doc.append(
        form,
        El::new("input")
            .id("field-email")
            .attr("name", "email")
            .attr("type", "email")
            .attr("required", ""),
    );
    doc.append(form, El::new("textarea").id("field-message").attr("name", "message"));
    doc.append(form, El::new("button").attr("type", "submit").text("Send"));
    doc.append(form, El::new("div").class("form-success").text("Thank you, we will be in touch."));

    section(&mut doc, body, &mut flow, El::new("div").id("footer-placeholder"), 400.0);

    (doc, flow.top)
}

fn lookup(doc: &Document, id: &str) -> Option<NodeId> {
    let found = doc.get_by_id(id);
    if found.is_none() {
        warn!(id, "demo element missing");
    }
    found
}

fn fill(runtime: &mut Runtime, id: &str, value: &str) {
    if let Some(node) = lookup(runtime.document(), id) {
        runtime.page_mut().document.node_mut(node).set_value(value);
    }
}

fn click(runtime: &mut Runtime, id: &str) {
    if let Some(node) = lookup(runtime.document(), id) {
        runtime.click(node);
    }
}

/// Install the effects on the demo page and play the scripted session.
pub fn run(config: &FxConfig, options: &DemoOptions) -> DemoRun {
    let (doc, height) = demo_page();
    let page = Page::new(doc, Viewport::new(VIEWPORT_HEIGHT, height))
        .with_capabilities(options.capabilities);
    let mut rt = Runtime::new(page);
    let installed = site::install_with_year(&mut rt, config, options.year);

    rt.dom_content_loaded();
    rt.advance(300);
    rt.load();
    rt.advance(600);

    let bottom = rt.page().viewport.max_scroll();
    let mut y = 0.0;
    while y < bottom {
        y = (y + SCROLL_STEP).min(bottom);
        rt.scroll_to(y);
        rt.advance(100);
    }

    click(&mut rt, "nav-faq");
    rt.advance(700);
    click(&mut rt, "faq-q-0");
    click(&mut rt, "faq-q-1");

    if let Some(&third) = rt.document().query_class("carousel-indicator").get(2) {
        rt.click(third);
    }
    rt.advance(config.carousel.interval_ms);

    if let Some(form) = lookup(rt.document(), "contact-form") {
        rt.submit(form);
        fill(&mut rt, "field-name", "Grace Hopper");
        fill(&mut rt, "field-email", "grace@example.org");
        fill(&mut rt, "field-message", "I would like a campus tour.");
        rt.submit(form);
    }

    rt.advance(config.counter.duration_ms + 1000);

    let report = summarize(&rt, &installed, config);
    info!(
        elapsed_ms = report.elapsed_ms,
        frames = report.frames,
        revealed = report.revealed,
        "demo session finished"
    );
    DemoRun {
        runtime: rt,
        installed,
        report,
    }
}

fn summarize(rt: &Runtime, installed: &Installed, config: &FxConfig) -> DemoReport {
    let doc = rt.document();
    let page = rt.page();
    let ids = |nodes: Vec<NodeId>| -> Vec<String> {
        nodes
            .into_iter()
            .filter_map(|n| doc.node(n).id().map(str::to_string))
            .collect()
    };
    DemoReport {
        capabilities: page.capabilities,
        reduced_motion: installed.reduced_motion,
        behaviors: rt.behavior_names(),
        elapsed_ms: rt.now(),
        frames: page.scheduler.frames_delivered(),
        scroll_y: page.viewport.scroll_y,
        progress_width: doc
            .query_class(PROGRESS_CLASS)
            .first()
            .and_then(|&bar| doc.node(bar).style("width"))
            .map(str::to_string),
        revealed: doc.query_class(REVEALED_CLASS).len(),
        revealable: reveal::revealable(doc, &config.reveal.markers).len(),
        counters: doc
            .query_class(COUNTER_CLASS)
            .into_iter()
            .map(|n| doc.text_content(n))
            .collect(),
        faq_open: ids(doc.query(|n| n.has_class(ITEM_CLASS) && n.has_class(OPEN_CLASS))),
        carousel_index: rt
            .behavior::<Carousel>(installed.carousel)
            .map(Carousel::current),
        loader: rt.behavior::<Loader>(installed.loader).map(Loader::state),
        footer: rt
            .behavior::<Footer>(installed.footer)
            .and_then(Footer::placement),
        submissions: page.submissions.clone(),
    }
}

/// Wraps `content` in a standalone HTML page with the demo styles.
fn base_document(title: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Standalone HTML page showing the document's body.
pub fn snapshot_html(doc: &Document, reduced_motion: bool) -> String {
    let body: String = doc
        .node(doc.body())
        .children()
        .iter()
        .map(|&child| doc.outer_html(child))
        .collect();
    let body_class = reduced_motion.then_some("reduced-motion");
    base_document("Northbridge Institute | Demo", CSS, body_class, PreEscaped(body)).into_string()
}

pub fn report_json(report: &DemoReport) -> Result<String, DemoError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write `index.html` and `report.json` into `dir`. Returns the page path.
pub fn write_output(dir: &Path, run: &DemoRun) -> Result<PathBuf, DemoError> {
    fs::create_dir_all(dir)?;
    let page = dir.join("index.html");
    fs::write(
        &page,
        snapshot_html(run.runtime.document(), run.report.reduced_motion),
    )?;
    fs::write(dir.join("report.json"), report_json(&run.report)?)?;
    Ok(page)
}
