//! Text and character splitters.
//!
//! Rewrites reveal headings so the stylesheet can animate them:
//!
//! ```html
//! <h2 class="text-reveal">Our mission</h2>
//! → <h2 class="text-reveal" data-split=""><span class="text-reveal__inner">Our mission</span></h2>
//!
//! <h2 class="char-reveal">Hi there</h2>
//! → <h2 class="char-reveal" data-split="">
//!     <span class="char" style="transition-delay: 0ms">H</span>
//!     <span class="char" style="transition-delay: 30ms">i</span>
//!     " "
//!     <span class="char" style="transition-delay: 90ms">t</span> ...
//! ```
//!
//! Spaces stay plain text but still count towards the stagger index. The
//! actual motion is a CSS transition triggered by `revealed`; nothing here
//! runs per frame.

use crate::config::TextConfig;
use crate::dom::{Document, El, NodeId};
use crate::runtime::{Behavior, Context, PageEvent};
use tracing::debug;

pub const TEXT_REVEAL_CLASS: &str = "text-reveal";
pub const CHAR_REVEAL_CLASS: &str = "char-reveal";
pub const INNER_CLASS: &str = "text-reveal__inner";
pub const CHAR_CLASS: &str = "char";

/// Marks an element as already split.
const SPLIT_ATTR: &str = "data-split";

/// Wrap the text of `node` in a single inner span. Returns the span.
pub fn split_text(doc: &mut Document, node: NodeId) -> NodeId {
    let text = doc.text_content(node);
    doc.clear_children(node);
    doc.node_mut(node).set_attr(SPLIT_ATTR, "");
    doc.append(node, El::new("span").class(INNER_CLASS).text(&text))
}

/// Replace the text of `node` with one span per visible character.
/// Whitespace stays as plain text but still counts towards the stagger.
/// Returns the number of spans created.
pub fn split_chars(doc: &mut Document, node: NodeId, step_ms: u64) -> usize {
    let text = doc.text_content(node);
    doc.clear_children(node);
    doc.node_mut(node).set_attr(SPLIT_ATTR, "");
    let mut spans = 0;
    for (index, c) in text.chars().enumerate() {
        if c.is_whitespace() {
            doc.append_text(node, &c.to_string());
            continue;
        }
        let delay = index as u64 * step_ms;
        let span = doc.append(node, El::new("span").class(CHAR_CLASS).text(&c.to_string()));
        doc.node_mut(span)
            .set_style("transition-delay", format!("{delay}ms"));
        spans += 1;
    }
    spans
}

/// Splits every `.text-reveal` and `.char-reveal` element once, at attach.
pub struct Splitter {
    config: TextConfig,
    split: usize,
}

impl Splitter {
    pub fn new(config: TextConfig) -> Self {
        Self { config, split: 0 }
    }

    /// Elements rewritten at attach.
    pub fn split_count(&self) -> usize {
        self.split
    }
}

impl Behavior for Splitter {
    fn name(&self) -> &'static str {
        "splitter"
    }

    fn attach(&mut self, cx: &mut Context<'_>) {
        let doc = cx.doc_mut();
        for node in doc.query(|n| n.has_class(CHAR_REVEAL_CLASS) && !n.has_attr(SPLIT_ATTR)) {
            split_chars(doc, node, self.config.char_stagger_ms);
            self.split += 1;
        }
        for node in doc.query(|n| n.has_class(TEXT_REVEAL_CLASS) && !n.has_attr(SPLIT_ATTR)) {
            split_text(doc, node);
            self.split += 1;
        }
        debug!(elements = self.split, "split reveal text");
    }

    fn handle(&mut self, _event: &PageEvent<'_>, _cx: &mut Context<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn heading(class: &str, text: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let h = doc.append(body, El::new("h2").id("h").class(class).text(text));
        (doc, h)
    }

    #[test]
    fn text_reveal_wraps_content() {
        let (doc, h) = heading(TEXT_REVEAL_CLASS, "Our mission");
        let mut rt = ready_runtime(doc);
        rt.register(Splitter::new(TextConfig::default()));
        let doc = rt.document();
        let children = doc.node(h).children();
        assert_eq!(children.len(), 1);
        assert!(has_class(doc, children[0], INNER_CLASS));
        assert_eq!(doc.text_content(h), "Our mission");
    }

    #[test]
    fn char_reveal_staggers_by_index() {
        let (doc, h) = heading(CHAR_REVEAL_CLASS, "Hi there");
        let mut rt = ready_runtime(doc);
        rt.register(Splitter::new(TextConfig::default()));
        let doc = rt.document();

        let chars = doc.query_within(h, |n| n.has_class(CHAR_CLASS));
        assert_eq!(chars.len(), 7);
        assert_eq!(style_of(doc, chars[0], "transition-delay"), "0ms");
        assert_eq!(style_of(doc, chars[1], "transition-delay"), "30ms");
        // "t" sits after the space at index 2
        assert_eq!(doc.text_content(chars[2]), "t");
        assert_eq!(style_of(doc, chars[2], "transition-delay"), "90ms");
        assert_eq!(doc.text_content(h), "Hi there");
        assert_eq!(doc.node(h).children().len(), 8);
    }

    #[test]
    fn any_whitespace_stays_plain_text() {
        let (mut doc, h) = heading(CHAR_REVEAL_CLASS, "Hi\n\tthe\u{a0}re");
        assert_eq!(split_chars(&mut doc, h, 30), 7);
        let chars = doc.query_within(h, |n| n.has_class(CHAR_CLASS));
        assert!(chars.iter().all(|&c| !doc.text_content(c).trim().is_empty()));
        // "t" after newline and tab sits at index 4
        assert_eq!(doc.text_content(chars[2]), "t");
        assert_eq!(style_of(&doc, chars[2], "transition-delay"), "120ms");
        assert_eq!(doc.text_content(h), "Hi\n\tthe\u{a0}re");
    }

    #[test]
    fn custom_step() {
        let (mut doc, h) = heading(CHAR_REVEAL_CLASS, "abc");
        assert_eq!(split_chars(&mut doc, h, 50), 3);
        let chars = doc.query_within(h, |n| n.has_class(CHAR_CLASS));
        assert_eq!(style_of(&doc, chars[2], "transition-delay"), "100ms");
    }

    #[test]
    fn splits_only_once() {
        let (doc, h) = heading(TEXT_REVEAL_CLASS, "Once");
        let mut rt = ready_runtime(doc);
        let first = rt.register(Splitter::new(TextConfig::default()));
        let second = rt.register(Splitter::new(TextConfig::default()));
        assert_eq!(rt.behavior::<Splitter>(first).unwrap().split_count(), 1);
        assert_eq!(rt.behavior::<Splitter>(second).unwrap().split_count(), 0);
        assert_eq!(rt.document().query_within(h, |n| n.has_class(INNER_CLASS)).len(), 1);
    }

    #[test]
    fn empty_text_yields_no_spans() {
        let (mut doc, h) = heading(CHAR_REVEAL_CLASS, "");
        assert_eq!(split_chars(&mut doc, h, 30), 0);
        assert!(doc.node(h).children().is_empty());
    }

    #[test]
    fn nested_markup_is_flattened_to_text() {
        let mut doc = Document::new();
        let body = doc.body();
        let h = doc.append(body, El::new("h2").class(TEXT_REVEAL_CLASS).text("Open "));
        doc.append(h, El::new("em").text("days"));
        split_text(&mut doc, h);
        assert_eq!(doc.text_content(h), "Open days");
        assert!(doc.query_within(h, |n| n.tag() == Some("em")).is_empty());
    }
}
