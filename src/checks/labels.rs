//! Form-control labeling check.
//!
//! Every form-control-equivalent node needs an accessible label: an
//! `aria-label`, an `aria-labelledby` reference, or an associated `label`
//! element (`for` attribute matching the control's id, or a wrapping
//! `label`). A placeholder alone is flagged as a downgraded finding rather
//! than accepted.

use std::collections::HashSet;

use nonempty::nonempty;

use super::{wcag, Check, Finding};
use crate::domain::{element::Snapshot, ElementNode, Issue, Severity, WcagLevel};

/// ARIA roles that make a node a form control regardless of tag.
const CONTROL_ROLES: [&str; 9] = [
    "textbox",
    "searchbox",
    "combobox",
    "listbox",
    "slider",
    "spinbutton",
    "switch",
    "checkbox",
    "radio",
];

/// Input types that carry their own label and are exempt.
const SELF_LABELLED_TYPES: [&str; 5] = ["hidden", "button", "submit", "reset", "image"];

/// Checks that form controls have accessible labels.
pub struct FormLabels;

impl Check for FormLabels {
    fn id(&self) -> &'static str {
        "form-labels"
    }

    fn run(&self, snapshot: &Snapshot<'_>) -> Vec<Finding> {
        // ids referenced by `<label for="...">` anywhere in the document.
        let labelled_ids: HashSet<&str> = snapshot
            .nodes()
            .filter(|entry| entry.node().tag == "label")
            .filter_map(|entry| entry.node().attr("for"))
            .collect();

        let mut findings = Vec::new();

        for entry in snapshot.nodes() {
            let node = entry.node();
            if !is_form_control(node) || !node.is_visible() {
                continue;
            }

            if has_direct_label(node) {
                continue;
            }

            if node.id().is_some_and(|id| labelled_ids.contains(id)) {
                continue;
            }

            let issue = if has_placeholder(node) {
                Issue::failure(
                    "placeholder-as-label",
                    "control relies on its placeholder as a label; placeholders disappear \
                     on input and are not reliably announced",
                    Severity::Moderate,
                    WcagLevel::A,
                    nonempty![wcag("3.3.2"), wcag("1.3.1")],
                )
            } else {
                Issue::failure(
                    "missing-form-label",
                    "form control has no associated label",
                    Severity::Serious,
                    WcagLevel::A,
                    nonempty![wcag("3.3.2"), wcag("1.3.1"), wcag("4.1.2")],
                )
            };

            findings.push(Finding::new(
                entry.index(),
                issue.with_elements(vec![entry.selector().to_string()]),
            ));
        }

        findings
    }
}

fn is_form_control(node: &ElementNode) -> bool {
    match node.tag.as_str() {
        "input" => !node
            .attr("type")
            .is_some_and(|t| SELF_LABELLED_TYPES.contains(&t)),
        "select" | "textarea" => true,
        _ => node.role().is_some_and(|role| CONTROL_ROLES.contains(&role)),
    }
}

fn has_direct_label(node: &ElementNode) -> bool {
    let non_empty = |name: &str| node.attr(name).is_some_and(|value| !value.trim().is_empty());
    non_empty("aria-label") || non_empty("aria-labelledby") || non_empty("title")
}

fn has_placeholder(node: &ElementNode) -> bool {
    node.attr("placeholder")
        .is_some_and(|value| !value.trim().is_empty())
}
