//! Keyboard operability check.
//!
//! A node with a click-equivalent handler must be reachable by sequential
//! focus: natively focusable, or carrying an explicit non-negative focus
//! order.

use nonempty::nonempty;

use super::{wcag, Check, Finding};
use crate::domain::{element::Snapshot, ElementNode, Issue, Severity, WcagLevel};

/// Attributes that indicate a click-equivalent handler in a snapshot.
const CLICK_HANDLERS: [&str; 3] = ["onclick", "onmousedown", "onmouseup"];

/// Roles that imply an interactive, focusable widget.
const INTERACTIVE_ROLES: [&str; 8] = [
    "button",
    "link",
    "checkbox",
    "radio",
    "switch",
    "tab",
    "menuitem",
    "option",
];

/// Checks that clickable nodes are keyboard reachable.
pub struct KeyboardAccess;

impl Check for KeyboardAccess {
    fn id(&self) -> &'static str {
        "keyboard-access"
    }

    fn run(&self, snapshot: &Snapshot<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for entry in snapshot.nodes() {
            let node = entry.node();
            if !has_click_handler(node) || !node.is_visible() {
                continue;
            }

            if is_sequentially_focusable(node) {
                continue;
            }

            let description = if node.role().is_some_and(|role| {
                INTERACTIVE_ROLES.contains(&role)
            }) && has_negative_tabindex(node)
            {
                "interactive element is removed from the tab order by a negative tabindex"
            } else {
                "clickable element cannot be reached with the keyboard; add a focusable \
                 element or a non-negative tabindex"
            };

            findings.push(Finding::new(
                entry.index(),
                Issue::failure(
                    "keyboard-inaccessible",
                    description,
                    Severity::Serious,
                    WcagLevel::A,
                    nonempty![wcag("2.1.1")],
                )
                .with_elements(vec![entry.selector().to_string()]),
            ));
        }

        findings
    }
}

fn has_click_handler(node: &ElementNode) -> bool {
    CLICK_HANDLERS
        .iter()
        .any(|handler| node.attr(handler).is_some())
}

/// Whether the node participates in sequential focus navigation.
fn is_sequentially_focusable(node: &ElementNode) -> bool {
    if let Some(raw) = node.attr("tabindex") {
        // An explicit tabindex decides either way: non-negative joins the tab
        // order, negative removes the node from it.
        return raw.parse::<i32>().is_ok_and(|index| index >= 0);
    }

    match node.tag.as_str() {
        "a" | "area" => node.attr("href").is_some(),
        "button" | "select" | "textarea" => true,
        "input" => node.attr("type") != Some("hidden"),
        _ => false,
    }
}

fn has_negative_tabindex(node: &ElementNode) -> bool {
    node.attr("tabindex")
        .is_some_and(|raw| raw.parse::<i32>().is_ok_and(|index| index < 0))
}
