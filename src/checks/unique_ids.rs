//! Duplicate-identifier check.
//!
//! An id that occurs more than once breaks every reference that targets it
//! (`label for`, `aria-labelledby`, `aria-controls`). Each duplicated value
//! is reported exactly once, anchored at its first duplicate occurrence.

use std::collections::BTreeMap;

use nonempty::nonempty;

use super::{wcag, Check, Finding};
use crate::domain::{element::Snapshot, Issue, Severity, WcagLevel};

/// Checks that element ids are unique within the document.
pub struct UniqueIds;

impl Check for UniqueIds {
    fn id(&self) -> &'static str {
        "unique-ids"
    }

    fn run(&self, snapshot: &Snapshot<'_>) -> Vec<Finding> {
        // id value -> (index, selector) of every occurrence, in document
        // order. BTreeMap keeps iteration deterministic.
        let mut occurrences: BTreeMap<&str, Vec<(usize, String)>> = BTreeMap::new();

        for entry in snapshot.nodes() {
            if let Some(id) = entry.node().id() {
                occurrences
                    .entry(id)
                    .or_default()
                    .push((entry.index(), entry.selector().to_string()));
            }
        }

        occurrences
            .into_iter()
            .filter(|(_, seen)| seen.len() > 1)
            .map(|(id, seen)| {
                // Anchor at the first *duplicate* (the second occurrence).
                let anchor = seen[1].0;
                let selectors = seen.into_iter().map(|(_, selector)| selector).collect();
                Finding::new(
                    anchor,
                    Issue::failure(
                        "duplicate-ids",
                        format!("id '{id}' is used by more than one element"),
                        Severity::Critical,
                        WcagLevel::A,
                        nonempty![wcag("4.1.1")],
                    )
                    .with_elements(selectors),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ElementNode;

    fn run(tree: &ElementNode) -> Vec<Issue> {
        let snapshot = Snapshot::new(tree);
        UniqueIds
            .run(&snapshot)
            .into_iter()
            .map(|finding| finding.issue().clone())
            .collect()
    }

    #[test]
    fn two_nodes_sharing_an_id_yield_exactly_one_critical_issue() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("div").with_attr("id", "x"))
            .with_child(ElementNode::new("span").with_attr("id", "x"));
        let issues = run(&tree);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "duplicate-ids");
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].elements_affected.len(), 2);
    }

    #[test]
    fn triplicate_id_is_still_one_issue() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("div").with_attr("id", "x"))
            .with_child(ElementNode::new("div").with_attr("id", "x"))
            .with_child(ElementNode::new("div").with_attr("id", "x"));
        let issues = run(&tree);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].elements_affected.len(), 3);
    }

    #[test]
    fn distinct_duplicated_ids_are_reported_separately() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("div").with_attr("id", "a"))
            .with_child(ElementNode::new("div").with_attr("id", "a"))
            .with_child(ElementNode::new("div").with_attr("id", "b"))
            .with_child(ElementNode::new("div").with_attr("id", "b"));
        assert_eq!(run(&tree).len(), 2);
    }

    #[test]
    fn unique_ids_pass() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("div").with_attr("id", "a"))
            .with_child(ElementNode::new("div").with_attr("id", "b"));
        assert!(run(&tree).is_empty());
    }

    #[test]
    fn nodes_without_ids_are_ignored() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("div"))
            .with_child(ElementNode::new("div"));
        assert!(run(&tree).is_empty());
    }
}
