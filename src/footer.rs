//! Site footer generation.
//!
//! The footer is a fixed fragment rendered with [maud] from
//! [`FooterConfig`] and a year. Two layouts are available:
//!
//! - **full**: brand, quick links, divisions, contact, social links, copyright
//! - **compact**: brand, quick links, contact, copyright
//!
//! [`inject_footer`] places the rendered markup on the page:
//!
//! 1. replacing `#footer-placeholder` if present,
//! 2. otherwise right after `<main>`,
//! 3. otherwise at the end of `<body>`.
//!
//! Rendering is pure: the same config and year always give the same markup,
//! so the output for two years differs only in the copyright year.

use crate::config::{ContactConfig, FooterConfig, Link};
use crate::dom::{Adjacent, Document};
use crate::runtime::{Behavior, Context, PageEvent};
use chrono::Datelike;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const PLACEHOLDER_ID: &str = "footer-placeholder";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterTemplate {
    #[default]
    Full,
    Compact,
}

/// Where [`inject_footer`] put the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    ReplacedPlaceholder,
    AfterMain,
    EndOfBody,
}

/// The current year in local time.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Render the footer fragment.
pub fn render_footer(config: &FooterConfig, year: i32) -> Markup {
    let full = config.template == FooterTemplate::Full;
    html! {
        footer.site-footer {
            div.footer-grid {
                div.footer-brand {
                    h3 { (config.organization) }
                    @if !config.tagline.is_empty() {
                        p.footer-tagline { (config.tagline) }
                    }
                }
                (link_column("footer-nav", "Quick Links", &config.navigation))
                @if full {
                    (link_column("footer-divisions", "Schools & Divisions", &config.divisions))
                }
                (contact_block(&config.contact))
                @if full && !config.social.is_empty() {
                    div.footer-social {
                        h4 { "Follow Us" }
                        ul {
                            @for link in &config.social {
                                li {
                                    a href=(link.href) target="_blank" rel="noopener" { (link.label) }
                                }
                            }
                        }
                    }
                }
            }
            div.footer-bottom {
                p.copyright {
                    "© " (year) " " (config.organization) ". All rights reserved."
                }
            }
        }
    }
}

fn link_column(class: &str, heading: &str, links: &[Link]) -> Markup {
    html! {
        @if !links.is_empty() {
            nav class=(class) aria-label=(heading) {
                h4 { (heading) }
                ul {
                    @for link in links {
                        li { a href=(link.href) { (link.label) } }
                    }
                }
            }
        }
    }
}

/// `tel:` URI for a display phone number: keeps digits and a leading `+`.
fn tel_href(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .enumerate()
        .filter(|&(i, c)| c.is_ascii_digit() || (i == 0 && c == '+'))
        .map(|(_, c)| c)
        .collect();
    format!("tel:{digits}")
}

fn contact_block(contact: &ContactConfig) -> Markup {
    html! {
        div.footer-contact {
            h4 { "Contact" }
            @if !contact.address.is_empty() {
                address {
                    @for (i, line) in contact.address.iter().enumerate() {
                        @if i > 0 { br; }
                        (line)
                    }
                }
            }
            @if !contact.phone.is_empty() {
                p { a href=(tel_href(&contact.phone)) { (contact.phone) } }
            }
            @if !contact.email.is_empty() {
                p { a href={ "mailto:" (contact.email) } { (contact.email) } }
            }
        }
    }
}

/// Place footer markup on the page. See the module docs for the order.
pub fn inject_footer(doc: &mut Document, markup: String) -> Placement {
    if let Some(placeholder) = doc.get_by_id(PLACEHOLDER_ID) {
        if doc.replace_with_markup(placeholder, markup.clone()).is_some() {
            return Placement::ReplacedPlaceholder;
        }
    }
    if let Some(&main) = doc.query_tag("main").first() {
        if doc
            .insert_adjacent_markup(main, Adjacent::AfterEnd, markup.clone())
            .is_some()
        {
            return Placement::AfterMain;
        }
    }
    let body = doc.body();
    doc.insert_adjacent_markup(body, Adjacent::BeforeEnd, markup);
    Placement::EndOfBody
}

/// Injects the footer once, when the page becomes ready.
pub struct Footer {
    config: FooterConfig,
    year: i32,
    placement: Option<Placement>,
}

impl Footer {
    pub fn new(config: FooterConfig) -> Self {
        Self::with_year(config, current_year())
    }

    pub fn with_year(config: FooterConfig, year: i32) -> Self {
        Self {
            config,
            year,
            placement: None,
        }
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }
}

impl Behavior for Footer {
    fn name(&self) -> &'static str {
        "footer"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let markup = render_footer(&self.config, self.year).into_string();
        let placement = inject_footer(cx.doc_mut(), markup);
        debug!(?placement, year = self.year, "footer injected");
        self.placement = Some(placement);
    }

    fn handle(&mut self, _event: &PageEvent<'_>, _cx: &mut Context<'_>) {}
}
