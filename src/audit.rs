//! Aggregation of findings into a score, a conformance level, and
//! recommendations.
//!
//! Aggregation is a pure function of its inputs and is recomputed wholesale
//! on every call: an [`AuditResult`] is an immutable artifact, never patched
//! incrementally, so auditing an unchanged tree twice yields the same result
//! apart from the caller-supplied timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    checks::CheckRegistry,
    domain::{ElementNode, Issue, ManualStatus, ManualTest, Severity},
    manual,
};

/// The WCAG conformance tier a score maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceLevel {
    /// Score ≥ 95.
    AAA,
    /// Score ≥ 90.
    AA,
    /// Score ≥ 80.
    A,
    /// Score below 80.
    #[serde(rename = "none")]
    None,
}

impl ComplianceLevel {
    /// Map an audit score onto a conformance tier.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            95.. => Self::AAA,
            90.. => Self::AA,
            80.. => Self::A,
            _ => Self::None,
        }
    }
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AAA => write!(f, "AAA"),
            Self::AA => write!(f, "AA"),
            Self::A => write!(f, "A"),
            Self::None => write!(f, "none"),
        }
    }
}

/// The complete outcome of auditing one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// The audited target's name.
    pub target_name: String,
    /// Automated findings, in deterministic document order.
    pub issues: Vec<Issue>,
    /// The human-verification checklist for this target.
    pub manual_tests: Vec<ManualTest>,
    /// Score in `[0, 100]`.
    pub score: u8,
    /// Conformance tier derived from the score.
    pub compliance_level: ComplianceLevel,
    /// Actionable next steps, most severe first.
    pub recommendations: Vec<String>,
    /// When the audit ran.
    pub timestamp: DateTime<Utc>,
}

impl AuditResult {
    /// Whether this target counts as compliant: score ≥ 90 and a
    /// conformance level other than `none`.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.score >= 90 && self.compliance_level != ComplianceLevel::None
    }
}

/// Deduction cap: at most ten issues count against the score.
const MAX_SCORED_ISSUES: usize = 10;

/// Compute the audit score from automated findings.
///
/// Each unresolved automated failure deducts ten points, capped at ten
/// failures. Findings awaiting manual confirmation stay visible but do not
/// deduct until a human resolves them.
#[must_use]
pub fn score(issues: &[Issue]) -> u8 {
    let failures = issues
        .iter()
        .filter(|issue| issue.counts_against_score())
        .count()
        .min(MAX_SCORED_ISSUES);
    let deduction = u8::try_from(failures * 10).expect("capped at 100");
    100 - deduction
}

/// Combine one target's findings and checklist into an [`AuditResult`].
///
/// Pure: the output depends only on the arguments.
#[must_use]
pub fn aggregate(
    target_name: &str,
    issues: Vec<Issue>,
    manual_tests: Vec<ManualTest>,
    timestamp: DateTime<Utc>,
) -> AuditResult {
    let score = score(&issues);
    let recommendations = recommendations(&issues, &manual_tests);

    AuditResult {
        target_name: target_name.to_string(),
        issues,
        manual_tests,
        score,
        compliance_level: ComplianceLevel::from_score(score),
        recommendations,
        timestamp,
    }
}

/// Run the full single-target pipeline: checks, checklist, aggregation.
#[instrument(skip(tree, registry))]
#[must_use]
pub fn audit(target_name: &str, tree: &ElementNode, registry: &CheckRegistry) -> AuditResult {
    let issues = registry.run(tree);
    let manual_tests = manual::checklist(target_name);
    aggregate(target_name, issues, manual_tests, Utc::now())
}

/// Build the ordered next-steps list: failures by severity (critical first),
/// then findings awaiting verification, then outstanding manual tests.
fn recommendations(issues: &[Issue], manual_tests: &[ManualTest]) -> Vec<String> {
    let mut recommendations = Vec::new();

    for severity in [
        Severity::Critical,
        Severity::Serious,
        Severity::Moderate,
        Severity::Minor,
    ] {
        for issue in issues
            .iter()
            .filter(|issue| issue.counts_against_score() && issue.severity == severity)
        {
            recommendations.push(format!(
                "fix {severity} issue '{}': {}",
                issue.id, issue.description
            ));
        }
    }

    for issue in issues
        .iter()
        .filter(|issue| issue.needs_manual_verification && !issue.passed)
    {
        recommendations.push(format!("verify '{}': {}", issue.id, issue.description));
    }

    for test in manual_tests {
        match test.status {
            ManualStatus::Fail => recommendations.push(format!(
                "address failed manual test '{}': {}",
                test.id, test.description
            )),
            ManualStatus::Pending => {
                recommendations.push(format!("complete manual test '{}'", test.id));
            }
            ManualStatus::Pass => {}
        }
    }

    if recommendations.is_empty() {
        recommendations.push("meets standards".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use nonempty::nonempty;
    use test_case::test_case;

    use super::*;
    use crate::{checks::wcag, domain::WcagLevel};

    fn failure(id: &str, severity: Severity) -> Issue {
        Issue::failure(
            id,
            format!("description of {id}"),
            severity,
            WcagLevel::A,
            nonempty![wcag("1.3.1")],
        )
    }

    fn resolved_manual_tests() -> Vec<ManualTest> {
        let mut tests = crate::manual::checklist("target");
        for test in &mut tests {
            test.record_outcome(true);
        }
        tests
    }

    #[test_case(0, 100; "no failures")]
    #[test_case(1, 90; "one failure")]
    #[test_case(5, 50; "five failures")]
    #[test_case(10, 0; "ten failures")]
    #[test_case(14, 0; "deduction is capped")]
    fn score_deducts_ten_per_failure(count: usize, expected: u8) {
        let issues: Vec<_> = (0..count)
            .map(|n| failure(&format!("issue-{n}"), Severity::Serious))
            .collect();
        assert_eq!(score(&issues), expected);
    }

    #[test]
    fn pending_and_passing_findings_do_not_deduct() {
        let issues = vec![
            failure("needs-check", Severity::Moderate).pending_verification(),
            Issue::pass("fine", "all good", WcagLevel::A, nonempty![wcag("1.1.1")]),
        ];
        assert_eq!(score(&issues), 100);
    }

    #[test_case(100, ComplianceLevel::AAA)]
    #[test_case(95, ComplianceLevel::AAA)]
    #[test_case(94, ComplianceLevel::AA)]
    #[test_case(90, ComplianceLevel::AA)]
    #[test_case(89, ComplianceLevel::A)]
    #[test_case(80, ComplianceLevel::A)]
    #[test_case(79, ComplianceLevel::None)]
    #[test_case(0, ComplianceLevel::None)]
    fn compliance_level_thresholds(score: u8, expected: ComplianceLevel) {
        assert_eq!(ComplianceLevel::from_score(score), expected);
    }

    #[test]
    fn clean_target_meets_standards() {
        let result = aggregate("target", Vec::new(), resolved_manual_tests(), Utc::now());
        assert_eq!(result.score, 100);
        assert_eq!(result.compliance_level, ComplianceLevel::AAA);
        assert_eq!(result.recommendations, ["meets standards"]);
        assert!(result.is_compliant());
    }

    #[test]
    fn single_critical_issue_scores_ninety_and_aa() {
        // The spec's worked example: one missing-image-alt critical issue.
        let issues = vec![failure("missing-image-alt", Severity::Critical)];
        let result = aggregate("target", issues, resolved_manual_tests(), Utc::now());
        assert_eq!(result.score, 90);
        assert_eq!(result.compliance_level, ComplianceLevel::AA);
        assert!(result.is_compliant());
    }

    #[test]
    fn recommendations_are_ordered_by_severity_then_manual_work() {
        let issues = vec![
            failure("minor-issue", Severity::Minor),
            failure("critical-issue", Severity::Critical),
            failure("pending-issue", Severity::Serious).pending_verification(),
            failure("moderate-issue", Severity::Moderate),
        ];
        let result = aggregate(
            "target",
            issues,
            crate::manual::checklist("target"),
            Utc::now(),
        );

        let kinds: Vec<_> = result
            .recommendations
            .iter()
            .map(|r| r.split('\'').nth(1).unwrap_or(r).to_string())
            .collect();
        assert_eq!(kinds[0], "critical-issue");
        assert_eq!(kinds[1], "moderate-issue");
        assert_eq!(kinds[2], "minor-issue");
        assert_eq!(kinds[3], "pending-issue");
        // The five pending manual tests follow.
        assert_eq!(result.recommendations.len(), 4 + 5);
    }

    #[test]
    fn failed_manual_tests_are_surfaced() {
        let mut tests = resolved_manual_tests();
        tests[0].record_outcome(false);
        let result = aggregate("target", Vec::new(), tests, Utc::now());
        assert_eq!(result.recommendations.len(), 1);
        assert!(result.recommendations[0].starts_with("address failed manual test"));
        // Manual outcomes never change the automated score.
        assert_eq!(result.score, 100);
    }

    #[test]
    fn aggregation_is_pure() {
        let timestamp = Utc::now();
        let issues = vec![failure("a", Severity::Serious)];
        let first = aggregate("t", issues.clone(), Vec::new(), timestamp);
        let second = aggregate("t", issues, Vec::new(), timestamp);
        assert_eq!(first, second);
    }

    #[test]
    fn full_pipeline_produces_pending_checklist() {
        let tree = ElementNode::new("main")
            .with_child(ElementNode::new("h1").with_text("Title"));
        let result = audit("home", &tree, &CheckRegistry::default());
        assert_eq!(result.manual_tests.len(), 5);
        assert!(result.manual_tests.iter().all(ManualTest::is_pending));
        // Pending manual work keeps the recommendation list non-empty.
        assert!(!result.recommendations.is_empty());
    }
}
