//! Media alternative-text check.
//!
//! An image-equivalent node with no `alt` attribute at all is a hard
//! failure. An empty `alt` is acceptable only when the node is explicitly
//! marked decorative; otherwise it is flagged for human verification.

use nonempty::nonempty;

use super::{wcag, Check, Finding};
use crate::domain::{element::Snapshot, ElementNode, Issue, Severity, WcagLevel};

/// Checks that images carry alternative text.
pub struct ImageAlt;

impl Check for ImageAlt {
    fn id(&self) -> &'static str {
        "image-alt"
    }

    fn run(&self, snapshot: &Snapshot<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for entry in snapshot.nodes() {
            let node = entry.node();
            if !is_image(node) {
                continue;
            }

            let selector = vec![entry.selector().to_string()];

            match node.attr("alt") {
                None => {
                    findings.push(Finding::new(
                        entry.index(),
                        Issue::failure(
                            "missing-image-alt",
                            "image has no alt attribute",
                            Severity::Critical,
                            WcagLevel::A,
                            nonempty![wcag("1.1.1")],
                        )
                        .with_elements(selector),
                    ));
                }
                Some(alt) if alt.trim().is_empty() => {
                    if is_decorative(node) {
                        findings.push(Finding::new(
                            entry.index(),
                            Issue::pass(
                                "decorative-image",
                                "image is explicitly marked decorative",
                                WcagLevel::A,
                                nonempty![wcag("1.1.1")],
                            )
                            .with_elements(selector),
                        ));
                    } else {
                        findings.push(Finding::new(
                            entry.index(),
                            Issue::failure(
                                "empty-image-alt",
                                "image has an empty alt but is not marked decorative; \
                                 confirm it conveys no information",
                                Severity::Moderate,
                                WcagLevel::A,
                                nonempty![wcag("1.1.1")],
                            )
                            .with_elements(selector)
                            .pending_verification(),
                        ));
                    }
                }
                Some(_) => {}
            }
        }

        findings
    }
}

fn is_image(node: &ElementNode) -> bool {
    node.tag == "img"
        || node.role() == Some("img")
        || (node.tag == "input" && node.attr("type") == Some("image"))
}

fn is_decorative(node: &ElementNode) -> bool {
    matches!(node.role(), Some("presentation" | "none")) || node.attr("aria-hidden") == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ElementNode;

    fn run(tree: &ElementNode) -> Vec<Issue> {
        let snapshot = Snapshot::new(tree);
        ImageAlt
            .run(&snapshot)
            .into_iter()
            .map(|finding| finding.issue().clone())
            .collect()
    }

    #[test]
    fn missing_alt_is_a_critical_failure() {
        let tree = ElementNode::new("main").with_child(ElementNode::new("img"));
        let issues = run(&tree);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "missing-image-alt");
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].wcag_criteria.first().as_str(), "1.1.1");
        assert!(issues[0].counts_against_score());
    }

    #[test]
    fn descriptive_alt_passes_silently() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("img").with_attr("alt", "A sunny meadow"));
        assert!(run(&tree).is_empty());
    }

    #[test]
    fn empty_alt_without_decorative_marker_needs_verification() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("img").with_attr("alt", ""));
        let issues = run(&tree);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "empty-image-alt");
        assert!(issues[0].needs_manual_verification);
        assert!(!issues[0].counts_against_score());
    }

    #[test]
    fn decorative_empty_alt_is_a_passing_finding() {
        let tree = ElementNode::new("main").with_child(
            ElementNode::new("img")
                .with_attr("alt", "")
                .with_attr("role", "presentation"),
        );
        let issues = run(&tree);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "decorative-image");
        assert!(issues[0].passed);
    }

    #[test]
    fn role_img_divs_are_covered() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("div").with_attr("role", "img"));
        let issues = run(&tree);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "missing-image-alt");
    }

    #[test]
    fn image_inputs_are_covered() {
        let tree = ElementNode::new("form")
            .with_child(ElementNode::new("input").with_attr("type", "image"));
        let issues = run(&tree);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "missing-image-alt");
    }

    #[test]
    fn non_images_are_ignored() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("div"))
            .with_child(ElementNode::new("p").with_text("text"));
        assert!(run(&tree).is_empty());
    }
}
