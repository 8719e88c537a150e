//! Heading hierarchy check.
//!
//! Flags heading-level jumps greater than one in document order, and a
//! level-1 heading count other than exactly one.

use nonempty::nonempty;

use super::{wcag, Check, Finding};
use crate::domain::{element::Snapshot, Issue, Severity, WcagLevel};

/// Checks that headings form a coherent outline.
pub struct HeadingStructure;

impl Check for HeadingStructure {
    fn id(&self) -> &'static str {
        "heading-structure"
    }

    fn run(&self, snapshot: &Snapshot<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        let headings: Vec<_> = snapshot
            .nodes()
            .filter_map(|entry| {
                entry
                    .node()
                    .heading_level()
                    .map(|level| (entry.index(), entry.selector().to_string(), level))
            })
            .collect();

        let mut previous_level: Option<u8> = None;
        for (index, selector, level) in &headings {
            if let Some(previous) = previous_level {
                // aria-level is caller-supplied and may be as high as 255.
                if *level > previous.saturating_add(1) {
                    findings.push(Finding::new(
                        *index,
                        Issue::failure(
                            "heading-level-skip",
                            format!(
                                "heading level jumps from h{previous} to h{level}, skipping \
                                 intermediate levels"
                            ),
                            Severity::Moderate,
                            WcagLevel::A,
                            nonempty![wcag("1.3.1"), wcag("2.4.6")],
                        )
                        .with_elements(vec![selector.clone()]),
                    ));
                }
            }
            previous_level = Some(*level);
        }

        let top_level: Vec<_> = headings
            .iter()
            .filter(|(_, _, level)| *level == 1)
            .collect();

        match top_level.as_slice() {
            [] => {
                findings.push(Finding::new(
                    0,
                    Issue::failure(
                        "missing-h1",
                        "document has no level-1 heading",
                        Severity::Moderate,
                        WcagLevel::A,
                        nonempty![wcag("1.3.1"), wcag("2.4.6")],
                    )
                    .with_elements(vec![root_selector(snapshot)]),
                ));
            }
            [_] => {}
            extra => {
                let (anchor, _, _) = extra[1];
                findings.push(Finding::new(
                    *anchor,
                    Issue::failure(
                        "multiple-h1",
                        format!("document has {} level-1 headings, expected one", extra.len()),
                        Severity::Moderate,
                        WcagLevel::A,
                        nonempty![wcag("1.3.1"), wcag("2.4.6")],
                    )
                    .with_elements(
                        extra
                            .iter()
                            .map(|(_, selector, _)| selector.clone())
                            .collect(),
                    ),
                ));
            }
        }

        findings
    }
}

fn root_selector(snapshot: &Snapshot<'_>) -> String {
    snapshot
        .get(0)
        .map_or_else(String::new, |entry| entry.selector().to_string())
}
