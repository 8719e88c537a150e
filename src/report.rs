//! Plain-text report rendering.
//!
//! Rendering is a pure function of the result: the same [`AuditResult`]
//! always formats to the same bytes, so reports can be diffed between runs
//! and asserted on in tests. Terminal styling is applied by the CLI on top
//! of this text, never inside it.

use crate::{
    audit::AuditResult,
    batch::AuditSummary,
    domain::{Issue, ManualStatus, ManualTest},
};

/// The coarse verdict a report headline carries.
///
/// This is a reporting band, not a conformance level: a target can reach
/// [`Band::Pass`] while its conformance level is only AA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Score ≥ 90.
    Pass,
    /// Score in `[70, 90)`.
    Partial,
    /// Score below 70.
    Fail,
}

impl Band {
    /// Map a score onto a reporting band.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Pass,
            70.. => Self::Partial,
            _ => Self::Fail,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Partial => write!(f, "PARTIAL"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Render one target's audit as plain text.
#[must_use]
pub fn format_result(result: &AuditResult) -> String {
    let mut out = String::new();
    let headline = format!("accessibility audit: {}", result.target_name);
    push_line(&mut out, &headline);
    push_line(&mut out, &"=".repeat(headline.len()));
    push_line(
        &mut out,
        &format!(
            "score: {}/100 (level {}) - {}",
            result.score,
            result.compliance_level,
            Band::from_score(result.score)
        ),
    );
    push_line(&mut out, &format!("audited: {}", result.timestamp.to_rfc3339()));

    let failed: Vec<_> = result
        .issues
        .iter()
        .filter(|issue| !issue.passed && !issue.needs_manual_verification)
        .collect();
    let pending: Vec<_> = result
        .issues
        .iter()
        .filter(|issue| !issue.passed && issue.needs_manual_verification)
        .collect();
    let passed: Vec<_> = result.issues.iter().filter(|issue| issue.passed).collect();

    push_issue_section(&mut out, "failed checks", &failed);
    push_issue_section(&mut out, "needs verification", &pending);
    push_issue_section(&mut out, "passed checks", &passed);

    if !result.manual_tests.is_empty() {
        push_line(&mut out, "");
        push_line(
            &mut out,
            &format!("manual tests ({}):", result.manual_tests.len()),
        );
        for test in &result.manual_tests {
            push_line(
                &mut out,
                &format!(
                    "  {} {}: {}",
                    status_marker(test),
                    test.id,
                    test.description
                ),
            );
        }
    }

    push_line(&mut out, "");
    push_line(&mut out, "next steps:");
    for (position, recommendation) in result.recommendations.iter().enumerate() {
        push_line(&mut out, &format!("  {}. {recommendation}", position + 1));
    }

    out
}

/// Render a batch summary as plain text, one line per target.
#[must_use]
pub fn format_summary(summary: &AuditSummary) -> String {
    let mut out = String::new();
    push_line(&mut out, "batch audit summary");
    push_line(&mut out, "===================");
    push_line(
        &mut out,
        &format!(
            "targets: {} ({} compliant, {} non-compliant)",
            summary.total_targets, summary.compliant_targets, summary.non_compliant_targets
        ),
    );
    push_line(
        &mut out,
        &format!("overall compliance rate: {}%", summary.overall_compliance_rate),
    );
    push_line(&mut out, "");

    let name_width = summary
        .targets
        .iter()
        .map(|result| result.target_name.len())
        .max()
        .unwrap_or(0);

    for result in &summary.targets {
        push_line(
            &mut out,
            &format!(
                "  {:<7} {:<name_width$}  {:>3}/100 (level {})",
                Band::from_score(result.score).to_string(),
                result.target_name,
                result.score,
                result.compliance_level,
            ),
        );
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_issue_section(out: &mut String, title: &str, issues: &[&Issue]) {
    if issues.is_empty() {
        return;
    }
    push_line(out, "");
    push_line(out, &format!("{title} ({}):", issues.len()));
    for issue in issues {
        push_line(
            out,
            &format!("  [{}] {}: {}", issue.severity, issue.id, issue.description),
        );
        if !issue.elements_affected.is_empty() {
            push_line(
                out,
                &format!("      elements: {}", issue.elements_affected.join(", ")),
            );
        }
        let citations: Vec<_> = issue
            .wcag_criteria
            .iter()
            .map(|criterion| criterion.as_str().to_string())
            .collect();
        push_line(
            out,
            &format!(
                "      wcag: {} (level {})",
                citations.join(", "),
                issue.wcag_level
            ),
        );
    }
}

const fn status_marker(test: &ManualTest) -> &'static str {
    match test.status {
        ManualStatus::Pending => "[ ]",
        ManualStatus::Pass => "[x]",
        ManualStatus::Fail => "[!]",
    }
}
