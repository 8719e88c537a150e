//! Text color-contrast check.
//!
//! Evaluates every visible node that renders its own text and declares both
//! a foreground and a background color. Malformed colors are degraded to a
//! finding on the offending node rather than failing the audit, and
//! contrast failures come with a compliant grayscale suggestion from the
//! inverse search.

use nonempty::nonempty;

use super::{wcag, Check, Finding};
use crate::domain::{
    color::{check_contrast, find_contrasting_color, ColorValue, TextCategory},
    element::Snapshot,
    ElementNode, Issue, Severity, WcagLevel,
};

/// Default computed font size when the snapshot omits one.
const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Default computed font weight when the snapshot omits one.
const DEFAULT_FONT_WEIGHT: u16 = 400;

/// Checks text contrast against the WCAG AA thresholds.
pub struct ColorContrast;

impl Check for ColorContrast {
    fn id(&self) -> &'static str {
        "color-contrast"
    }

    fn run(&self, snapshot: &Snapshot<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for entry in snapshot.nodes() {
            let node = entry.node();
            if !renders_own_text(node) || !node.is_visible() {
                continue;
            }

            let (Some(raw_fg), Some(raw_bg)) = (
                node.style.color.as_deref(),
                node.style.background_color.as_deref(),
            ) else {
                // Without both declared colors the effective pair depends on
                // inherited styles the snapshot does not carry.
                continue;
            };

            let selector = vec![entry.selector().to_string()];

            let (foreground, background) =
                match (raw_fg.parse::<ColorValue>(), raw_bg.parse::<ColorValue>()) {
                    (Ok(fg), Ok(bg)) => (fg, bg),
                    (Err(error), _) | (_, Err(error)) => {
                        findings.push(Finding::new(
                            entry.index(),
                            Issue::failure(
                                "unparseable-color",
                                format!("could not evaluate contrast: {error}"),
                                Severity::Moderate,
                                WcagLevel::AA,
                                nonempty![wcag("1.4.3")],
                            )
                            .with_elements(selector)
                            .pending_verification(),
                        ));
                        continue;
                    }
                };

            let category = TextCategory::from_style(
                node.style.font_size.unwrap_or(DEFAULT_FONT_SIZE),
                node.style.font_weight.unwrap_or(DEFAULT_FONT_WEIGHT),
            );
            let result = check_contrast(foreground, background, category);

            if result.is_aa_compliant {
                findings.push(Finding::new(
                    entry.index(),
                    Issue::pass(
                        "sufficient-contrast",
                        result.message,
                        WcagLevel::AA,
                        nonempty![wcag("1.4.3")],
                    )
                    .with_elements(selector),
                ));
            } else {
                let description = find_contrasting_color(background, result.min_required_ratio)
                    .map_or_else(
                        || result.message.clone(),
                        |suggested| {
                            format!("{}; a compliant alternative is {suggested}", result.message)
                        },
                    );
                findings.push(Finding::new(
                    entry.index(),
                    Issue::failure(
                        "insufficient-contrast",
                        description,
                        Severity::Serious,
                        WcagLevel::AA,
                        nonempty![wcag("1.4.3")],
                    )
                    .with_elements(selector),
                ));
            }
        }

        findings
    }
}

fn renders_own_text(node: &ElementNode) -> bool {
    node.text.as_deref().is_some_and(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComputedStyle, ElementNode};

    fn styled(fg: &str, bg: &str, size: f64, weight: u16) -> ElementNode {
        ElementNode::new("p").with_text("body copy").with_style(ComputedStyle {
            color: Some(fg.to_string()),
            background_color: Some(bg.to_string()),
            font_size: Some(size),
            font_weight: Some(weight),
            visibility: None,
        })
    }

    fn run(tree: &ElementNode) -> Vec<Issue> {
        let snapshot = Snapshot::new(tree);
        ColorContrast
            .run(&snapshot)
            .into_iter()
            .map(|finding| finding.issue().clone())
            .collect()
    }

    #[test]
    fn black_on_white_passes() {
        let tree = ElementNode::new("main").with_child(styled("#000000", "#ffffff", 16.0, 400));
        let issues = run(&tree);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "sufficient-contrast");
        assert!(issues[0].passed);
    }

    #[test]
    fn boundary_gray_on_white_fails_with_a_suggestion() {
        // #777777 on white is ≈4.48:1, just under AA for normal text.
        let tree = ElementNode::new("main").with_child(styled("#777777", "#ffffff", 16.0, 400));
        let issues = run(&tree);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "insufficient-contrast");
        assert!(issues[0].counts_against_score());
        assert!(issues[0].description.contains("compliant alternative"));
    }

    #[test]
    fn boundary_gray_passes_for_large_text() {
        let tree = ElementNode::new("main").with_child(styled("#777777", "#ffffff", 18.0, 400));
        let issues = run(&tree);
        assert_eq!(issues[0].id, "sufficient-contrast");
    }

    #[test]
    fn bold_fourteen_pixel_text_uses_the_large_threshold() {
        let tree = ElementNode::new("main").with_child(styled("#777777", "#ffffff", 14.0, 700));
        let issues = run(&tree);
        assert_eq!(issues[0].id, "sufficient-contrast");
    }

    #[test]
    fn malformed_color_degrades_to_a_pending_finding() {
        let tree = ElementNode::new("main").with_child(styled("#nothex", "#ffffff", 16.0, 400));
        let issues = run(&tree);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "unparseable-color");
        assert!(issues[0].needs_manual_verification);
        assert!(!issues[0].counts_against_score());
    }

    #[test]
    fn rgb_syntax_is_accepted() {
        let tree = ElementNode::new("main").with_child(styled(
            "rgb(0, 0, 0)",
            "rgb(255, 255, 255)",
            16.0,
            400,
        ));
        let issues = run(&tree);
        assert_eq!(issues[0].id, "sufficient-contrast");
    }

    #[test]
    fn nodes_without_declared_colors_are_skipped() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("p").with_text("inherits everything"));
        assert!(run(&tree).is_empty());
    }

    #[test]
    fn textless_nodes_are_skipped() {
        let tree = ElementNode::new("main").with_child(
            ElementNode::new("div").with_style(ComputedStyle {
                color: Some("#777777".to_string()),
                background_color: Some("#ffffff".to_string()),
                ..ComputedStyle::default()
            }),
        );
        assert!(run(&tree).is_empty());
    }

    #[test]
    fn hidden_text_is_skipped() {
        let mut node = styled("#777777", "#ffffff", 16.0, 400);
        node.style.visibility = Some("hidden".to_string());
        let tree = ElementNode::new("main").with_child(node);
        assert!(run(&tree).is_empty());
    }
}
