//! Read-only snapshot of a rendered UI element tree.
//!
//! The [`ElementNode`] tree is constructed by the caller (typically an
//! adapter over a concrete UI runtime) and is never mutated by the engine.
//! Checks run over a flattened [`Snapshot`], which assigns every node a
//! document-order index and a stable selector string so findings can be
//! attributed and ordered deterministically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The subset of computed style the audit engine inspects.
///
/// Color fields are kept as raw strings; they are parsed lazily by the
/// contrast check so that a malformed color degrades to a finding on the
/// offending node rather than failing the whole audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComputedStyle {
    /// Foreground (text) color, as written in the computed style.
    pub color: Option<String>,
    /// Background color, as written in the computed style.
    pub background_color: Option<String>,
    /// Font size in CSS pixels.
    pub font_size: Option<f64>,
    /// Numeric font weight (400 regular, 700 bold).
    pub font_weight: Option<u16>,
    /// CSS visibility keyword (`visible`, `hidden`, `collapse`).
    pub visibility: Option<String>,
}

/// One node in a caller-supplied rendered-element tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementNode {
    /// Tag name (or equivalent role for non-HTML runtimes), lowercase.
    pub tag: String,
    /// Attribute map. Keys are lowercase attribute names.
    pub attributes: BTreeMap<String, String>,
    /// Text directly owned by this node (not including descendants).
    pub text: Option<String>,
    /// Computed style subset for this node.
    pub style: ComputedStyle,
    /// Child nodes, in document order.
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// Create an empty node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper: set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style helper: set the node's own text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder-style helper: append a child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style helper: set the computed style.
    #[must_use]
    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The node's `id` attribute, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// The node's explicit ARIA `role` attribute, if any.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.attr("role")
    }

    /// The heading level of this node, from `h1`–`h6` tags or
    /// `role="heading"` with an `aria-level` attribute.
    #[must_use]
    pub fn heading_level(&self) -> Option<u8> {
        if let Some(level) = self.tag.strip_prefix('h') {
            if let Ok(level @ 1..=6) = level.parse() {
                return Some(level);
            }
        }
        if self.role() == Some("heading") {
            return self.attr("aria-level").and_then(|l| l.parse().ok());
        }
        None
    }

    /// Whether this node is rendered (visibility is not `hidden` or
    /// `collapse`, and it is not `aria-hidden`).
    #[must_use]
    pub fn is_visible(&self) -> bool {
        let css_hidden = matches!(
            self.style.visibility.as_deref(),
            Some("hidden" | "collapse")
        );
        let aria_hidden = self.attr("aria-hidden") == Some("true");
        !css_hidden && !aria_hidden
    }

    /// The concatenated visible text of this node and its descendants,
    /// whitespace-normalized.
    #[must_use]
    pub fn inner_text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text(&self, parts: &mut Vec<String>) {
        if let Some(text) = &self.text {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
        for child in &self.children {
            child.collect_text(parts);
        }
    }
}

/// A flattened, depth-first view of an element tree.
///
/// Nodes appear in document order (pre-order traversal), each paired with a
/// stable selector. Building a snapshot twice from the same tree produces
/// identical selectors and indices, which is what makes check output
/// mergeable regardless of execution order.
#[derive(Debug)]
pub struct Snapshot<'a> {
    nodes: Vec<SnapshotNode<'a>>,
}

/// One entry in a [`Snapshot`]: a node, its document-order index, and its
/// selector.
#[derive(Debug)]
pub struct SnapshotNode<'a> {
    index: usize,
    selector: String,
    node: &'a ElementNode,
}

impl<'a> SnapshotNode<'a> {
    /// Document-order index of the node (0 is the root).
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// A stable selector identifying this node.
    ///
    /// Nodes with an `id` attribute use `tag#id`; other nodes use a
    /// `:nth-child` path from the root.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The underlying element.
    #[must_use]
    pub const fn node(&self) -> &'a ElementNode {
        self.node
    }
}

impl<'a> Snapshot<'a> {
    /// Flatten a tree into document order.
    #[must_use]
    pub fn new(root: &'a ElementNode) -> Self {
        let mut nodes = Vec::new();
        flatten(root, &root.tag, &mut nodes);
        Self { nodes }
    }

    /// Iterate over all nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &SnapshotNode<'a>> {
        self.nodes.iter()
    }

    /// The number of nodes in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a snapshot entry by document-order index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SnapshotNode<'a>> {
        self.nodes.get(index)
    }
}

fn flatten<'a>(node: &'a ElementNode, selector: &str, out: &mut Vec<SnapshotNode<'a>>) {
    let selector = node.id().map_or_else(
        || selector.to_string(),
        |id| format!("{}#{id}", node.tag),
    );

    out.push(SnapshotNode {
        index: out.len(),
        selector: selector.clone(),
        node,
    });

    for (position, child) in node.children.iter().enumerate() {
        let child_selector = format!("{selector} > {}:nth-child({})", child.tag, position + 1);
        flatten(child, &child_selector, out);
    }
}
