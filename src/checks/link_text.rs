//! Link and button text quality check.
//!
//! Activatable controls need a non-empty accessible name that makes sense
//! out of context. A built-in denylist of non-descriptive phrases can be
//! extended through [`crate::domain::Config`].

use nonempty::nonempty;

use super::{wcag, Check, Finding};
use crate::domain::{element::Snapshot, ElementNode, Issue, Severity, WcagLevel};

/// Phrases that say nothing about a link's destination.
const GENERIC_PHRASES: [&str; 6] = ["click here", "here", "more", "read more", "this", "link"];

/// Checks that activatable controls have descriptive text.
pub struct LinkText {
    extra_phrases: Vec<String>,
}

impl LinkText {
    /// A check using only the built-in denylist.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            extra_phrases: Vec::new(),
        }
    }

    /// A check whose denylist is extended with project-specific phrases.
    /// Phrases are matched case-insensitively.
    #[must_use]
    pub fn with_extra_phrases(phrases: &[String]) -> Self {
        Self {
            extra_phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    fn is_generic(&self, text: &str) -> bool {
        let normalized = text.trim().to_lowercase();
        GENERIC_PHRASES.contains(&normalized.as_str())
            || self.extra_phrases.iter().any(|p| p == &normalized)
    }
}

impl Default for LinkText {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for LinkText {
    fn id(&self) -> &'static str {
        "link-text"
    }

    fn run(&self, snapshot: &Snapshot<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for entry in snapshot.nodes() {
            let node = entry.node();
            if !is_activatable(node) || !node.is_visible() {
                continue;
            }

            let name = accessible_name(node);
            let selector = vec![entry.selector().to_string()];

            if name.trim().is_empty() {
                findings.push(Finding::new(
                    entry.index(),
                    Issue::failure(
                        "empty-link-text",
                        format!("{} has no accessible name", control_kind(node)),
                        Severity::Serious,
                        WcagLevel::A,
                        nonempty![wcag("2.4.4"), wcag("4.1.2")],
                    )
                    .with_elements(selector),
                ));
            } else if self.is_generic(&name) {
                findings.push(Finding::new(
                    entry.index(),
                    Issue::failure(
                        "generic-link-text",
                        format!(
                            "{} text '{}' does not describe its purpose",
                            control_kind(node),
                            name.trim()
                        ),
                        Severity::Moderate,
                        WcagLevel::A,
                        nonempty![wcag("2.4.4")],
                    )
                    .with_elements(selector),
                ));
            }
        }

        findings
    }
}

fn is_activatable(node: &ElementNode) -> bool {
    match node.tag.as_str() {
        "a" => node.attr("href").is_some(),
        "button" => true,
        _ => matches!(node.role(), Some("link" | "button")),
    }
}

fn control_kind(node: &ElementNode) -> &'static str {
    if node.tag == "a" || node.role() == Some("link") {
        "link"
    } else {
        "button"
    }
}

/// The text a screen reader would announce: an `aria-label` wins, otherwise
/// the subtree text.
fn accessible_name(node: &ElementNode) -> String {
    node.attr("aria-label")
        .map_or_else(|| node.inner_text(), ToString::to_string)
}
