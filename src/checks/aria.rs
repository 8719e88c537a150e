//! ARIA role misuse checks.
//!
//! Three families of misuse are covered: abstract roles (never valid in
//! content), roles with required owned elements, and roles with required
//! paired attributes.

use nonempty::nonempty;

use super::{wcag, Check, Finding};
use crate::domain::{element::Snapshot, ElementNode, Issue, Severity, WcagLevel};

/// Roles the ARIA specification reserves for its own taxonomy. Using one in
/// content is always an error.
const ABSTRACT_ROLES: [&str; 12] = [
    "command",
    "composite",
    "input",
    "landmark",
    "range",
    "roletype",
    "section",
    "sectionhead",
    "select",
    "structure",
    "widget",
    "window",
];

/// Container roles and the owned roles they must contain somewhere in their
/// subtree.
const REQUIRED_OWNED: [(&str, &str); 4] = [
    ("list", "listitem"),
    ("menu", "menuitem"),
    ("radiogroup", "radio"),
    ("tablist", "tab"),
];

/// Roles that are only meaningful when paired with specific ARIA attributes.
const REQUIRED_ATTRIBUTES: [(&str, &[&str]); 3] = [
    ("combobox", &["aria-expanded", "aria-controls"]),
    ("slider", &["aria-valuenow"]),
    ("checkbox", &["aria-checked"]),
];

/// Checks explicit ARIA roles for structural misuse.
pub struct AriaRoles;

impl Check for AriaRoles {
    fn id(&self) -> &'static str {
        "aria-roles"
    }

    fn run(&self, snapshot: &Snapshot<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for entry in snapshot.nodes() {
            let node = entry.node();
            let Some(role) = node.role() else { continue };

            if ABSTRACT_ROLES.contains(&role) {
                findings.push(Finding::new(
                    entry.index(),
                    Issue::failure(
                        "abstract-aria-role",
                        format!("role '{role}' is abstract and must not be used in content"),
                        Severity::Serious,
                        WcagLevel::A,
                        nonempty![wcag("4.1.2")],
                    )
                    .with_elements(vec![entry.selector().to_string()]),
                ));
                continue;
            }

            if let Some((_, owned)) = REQUIRED_OWNED.iter().find(|(owner, _)| *owner == role) {
                if !subtree_contains_role(node, owned) {
                    findings.push(Finding::new(
                        entry.index(),
                        Issue::failure(
                            "missing-required-children",
                            format!("role '{role}' requires a descendant with role '{owned}'"),
                            Severity::Serious,
                            WcagLevel::A,
                            nonempty![wcag("1.3.1"), wcag("4.1.2")],
                        )
                        .with_elements(vec![entry.selector().to_string()]),
                    ));
                }
            }

            if let Some((_, required)) =
                REQUIRED_ATTRIBUTES.iter().find(|(owner, _)| *owner == role)
            {
                let missing: Vec<_> = required
                    .iter()
                    .filter(|attribute| node.attr(attribute).is_none())
                    .copied()
                    .collect();
                if !missing.is_empty() {
                    findings.push(Finding::new(
                        entry.index(),
                        Issue::failure(
                            "missing-required-aria-attributes",
                            format!("role '{role}' requires attributes: {}", missing.join(", ")),
                            Severity::Serious,
                            WcagLevel::A,
                            nonempty![wcag("4.1.2")],
                        )
                        .with_elements(vec![entry.selector().to_string()]),
                    ));
                }
            }
        }

        findings
    }
}

/// Whether any descendant of `node` (excluding `node` itself) fills `role`,
/// either explicitly or through a native tag equivalent.
fn subtree_contains_role(node: &ElementNode, role: &str) -> bool {
    node.children.iter().any(|child| {
        fills_role(child, role) || subtree_contains_role(child, role)
    })
}

fn fills_role(node: &ElementNode, role: &str) -> bool {
    if node.role() == Some(role) {
        return true;
    }
    // Native tags that imply the owned role.
    match role {
        "listitem" => node.tag == "li",
        "radio" => node.tag == "input" && node.attr("type") == Some("radio"),
        _ => false,
    }
}
