//! In-memory document model.
//!
//! Behaviors operate on a [`Document`]: a flat arena of [`Node`]s linked into
//! a tree rooted at `<html>`. Only what the page behaviors read and write is
//! modelled:
//!
//! - element tag, `id`, class list, attributes and inline styles
//! - text nodes (for the text splitters)
//! - raw markup nodes (for injected fragments such as the footer)
//! - form control values
//! - layout [`Bounds`] in document coordinates, used by intersection checks
//!
//! Nodes are never freed. Removing a node detaches it from its parent; its
//! [`NodeId`] stays valid so behaviors holding it can still inspect it.
//!
//! ```text
//! html
//! └── body
//!     ├── div#page-loader
//!     ├── main
//!     │   └── section.reveal
//!     └── div#footer-placeholder
//! ```
//!
//! Queries return connected nodes only, in document (pre-)order.

use maud::html;
use std::collections::BTreeMap;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Vertical layout box in document coordinates (pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element(String),
    Text(String),
    /// Pre-rendered markup inserted verbatim.
    Markup(String),
}

/// Insertion point for [`Document::insert_adjacent_markup`], mirroring
/// `insertAdjacentHTML`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacent {
    BeforeBegin,
    AfterBegin,
    BeforeEnd,
    AfterEnd,
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    value: String,
    bounds: Bounds,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            value: String::new(),
            bounds: Bounds::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Tag name for elements, `None` for text and markup nodes.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Add or remove `class` depending on `on`.
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Inline style property, e.g. `style("width")`.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.styles.insert(property.to_string(), value.into());
    }

    /// Current value of a form control.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Declarative element description used to build documents.
///
/// ```rust
/// use site_fx::dom::{Document, El};
///
/// let mut doc = Document::new();
/// let body = doc.body();
/// let card = doc.append(body, El::new("section").class("reveal").at(1200.0, 300.0));
/// assert!(doc.node(card).has_class("reveal"));
/// ```
#[derive(Debug, Clone)]
pub struct El {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    value: Option<String>,
    bounds: Bounds,
}

impl El {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: Vec::new(),
            text: None,
            value: None,
            bounds: Bounds::default(),
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Give the element a single text child.
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Place the element at `top` with the given `height`.
    pub fn at(mut self, top: f64, height: f64) -> Self {
        self.bounds = Bounds::new(top, height);
        self
    }
}

/// The page's element tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty `<html><body></body></html>` document.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node::new(NodeKind::Element("html".to_string()))],
            root: NodeId(0),
            body: NodeId(0),
        };
        let body = doc.create(El::new("body"));
        doc.append_child(doc.root, body);
        doc.body = body;
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Create a detached element.
    pub fn create(&mut self, el: El) -> NodeId {
        let mut node = Node::new(NodeKind::Element(el.tag));
        for class in &el.classes {
            node.add_class(class);
        }
        for (name, value) in el.attributes {
            node.set_attr(&name, value);
        }
        if let Some(value) = el.value {
            node.value = value;
        }
        node.bounds = el.bounds;
        let id = self.push(node);
        if let Some(text) = el.text {
            self.append_text(id, &text);
        }
        id
    }

    /// Create an element and append it to `parent`.
    pub fn append(&mut self, parent: NodeId, el: El) -> NodeId {
        let id = self.create(el);
        self.append_child(parent, id);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.push(Node::new(NodeKind::Text(text.to_string())));
        self.append_child(parent, id);
        id
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` immediately before `reference`. No-op if `reference`
    /// has no parent.
    pub fn insert_before(&mut self, reference: NodeId, child: NodeId) {
        self.insert_relative(reference, child, 0);
    }

    /// Insert `child` immediately after `reference`. No-op if `reference`
    /// has no parent.
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) {
        self.insert_relative(reference, child, 1);
    }

    fn insert_relative(&mut self, reference: NodeId, child: NodeId, offset: usize) {
        let Some(parent) = self.nodes[reference.0].parent else {
            return;
        };
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let pos = siblings
            .iter()
            .position(|&c| c == reference)
            .map(|p| p + offset)
            .unwrap_or(siblings.len());
        siblings.insert(pos, child);
        self.nodes[child.0].parent = Some(parent);
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Detach `id` (and its subtree) from the document.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Whether `id` is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.nodes[node.0].parent;
        }
        false
    }

    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        self.append_text(id, text);
    }

    /// Concatenated text of the subtree (markup nodes excluded).
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        if let NodeKind::Text(text) = &node.kind {
            out.push_str(text);
        }
        for &child in &node.children {
            self.collect_text(child, out);
        }
    }

    /// All nodes below `root` in pre-order, excluding `root` itself.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Connected elements matching `pred`, in document order.
    pub fn query(&self, pred: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        self.query_within(self.root, pred)
    }

    /// Elements below `root` matching `pred`, in document order.
    pub fn query_within(&self, root: NodeId, pred: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| {
                let node = &self.nodes[id.0];
                node.is_element() && pred(node)
            })
            .collect()
    }

    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.query(|n| n.has_class(class))
    }

    pub fn query_tag(&self, tag: &str) -> Vec<NodeId> {
        self.query(|n| n.tag() == Some(tag))
    }

    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.query(|n| n.id() == Some(id)).into_iter().next()
    }

    /// Nearest inclusive ancestor of `id` matching `pred`.
    pub fn closest(&self, id: NodeId, pred: impl Fn(&Node) -> bool) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            let n = &self.nodes[node.0];
            if n.is_element() && pred(n) {
                return Some(node);
            }
            current = n.parent;
        }
        None
    }

    /// Replace `id`'s outer markup with `markup` (`outerHTML = ...`).
    pub fn replace_with_markup(&mut self, id: NodeId, markup: String) -> Option<NodeId> {
        self.nodes[id.0].parent?;
        let fragment = self.push(Node::new(NodeKind::Markup(markup)));
        self.insert_before(id, fragment);
        self.remove(id);
        Some(fragment)
    }

    /// Insert `markup` relative to `id` (`insertAdjacentHTML`).
    ///
    /// `BeforeBegin`/`AfterEnd` need a parent; returns `None` without one.
    pub fn insert_adjacent_markup(
        &mut self,
        id: NodeId,
        position: Adjacent,
        markup: String,
    ) -> Option<NodeId> {
        if matches!(position, Adjacent::BeforeBegin | Adjacent::AfterEnd) {
            self.nodes[id.0].parent?;
        }
        let fragment = self.push(Node::new(NodeKind::Markup(markup)));
        match position {
            Adjacent::BeforeBegin => self.insert_before(id, fragment),
            Adjacent::AfterEnd => self.insert_after(id, fragment),
            Adjacent::AfterBegin => {
                self.nodes[fragment.0].parent = Some(id);
                self.nodes[id.0].children.insert(0, fragment);
            }
            Adjacent::BeforeEnd => self.append_child(id, fragment),
        }
        Some(fragment)
    }

    /// Serialize the whole document as HTML (without a doctype).
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render(self.root, &mut out);
        out
    }

    /// Serialize the subtree rooted at `id`.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render(id, &mut out);
        out
    }

    fn render(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        let tag = match &node.kind {
            NodeKind::Text(text) => {
                out.push_str(&escape(text));
                return;
            }
            NodeKind::Markup(markup) => {
                out.push_str(markup);
                return;
            }
            NodeKind::Element(tag) => tag,
        };

        out.push('<');
        out.push_str(tag);
        if let Some(id_attr) = node.attr("id") {
            push_attr(out, "id", id_attr);
        }
        if !node.classes.is_empty() {
            push_attr(out, "class", &node.classes.join(" "));
        }
        for (name, value) in node.attributes.iter().filter(|(n, _)| *n != "id") {
            if value.is_empty() {
                out.push(' ');
                out.push_str(name);
            } else {
                push_attr(out, name, value);
            }
        }
        if !node.styles.is_empty() {
            let style = node
                .styles
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            push_attr(out, "style", &style);
        }
        if is_form_control(tag) && !node.value.is_empty() && tag != "textarea" {
            push_attr(out, "value", &node.value);
        }
        out.push('>');

        if is_void(tag) {
            return;
        }
        if tag == "textarea" {
            out.push_str(&escape(&node.value));
        }
        for &child in &node.children {
            self.render(child, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "hr" | "img" | "meta" | "link")
}

fn is_form_control(tag: &str) -> bool {
    matches!(tag, "input" | "textarea" | "select")
}
