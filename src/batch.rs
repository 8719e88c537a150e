//! Multi-target orchestration.
//!
//! Each named target is audited independently: targets share no state, so
//! they run in parallel on a bounded worker pool, and a failing tree
//! provider is isolated to a synthetic result for that target instead of
//! aborting the batch.

use chrono::Utc;
use nonempty::nonempty;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{
    audit::{audit, AuditResult, ComplianceLevel},
    checks::{wcag, CheckRegistry},
    domain::{Config, ElementNode, Issue, Severity, WcagLevel},
};

/// The external collaborator that produces a tree snapshot for a target.
///
/// Implementations typically adapt a concrete UI runtime. Failure is an
/// expected outcome and is isolated per target by the orchestrator.
pub trait TreeProvider: Send + Sync {
    /// Produce the rendered-element tree for this target.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when no tree can be produced; the
    /// orchestrator converts this into a synthetic failure result.
    fn tree(&self) -> Result<ElementNode, ProviderError>;
}

impl<F> TreeProvider for F
where
    F: Fn() -> Result<ElementNode, ProviderError> + Send + Sync,
{
    fn tree(&self) -> Result<ElementNode, ProviderError> {
        self()
    }
}

/// Failure modes of a [`TreeProvider`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The underlying runtime or source could not be reached.
    #[error("tree provider is unavailable: {0}")]
    Unavailable(String),
    /// The provider ran but failed to produce a tree.
    #[error("tree provider failed: {0}")]
    Failed(String),
    /// The provider completed but returned no tree.
    #[error("tree provider returned no tree")]
    Empty,
}

/// Errors for structurally invalid orchestrator invocations.
///
/// These are the only failures that propagate to the caller; everything
/// else is degraded to per-target results.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The target registry was empty.
    #[error("no targets were provided to audit")]
    NoTargets,
    /// Two targets share a name, so their results would be ambiguous.
    #[error("duplicate target name '{0}' in registry")]
    DuplicateTarget(String),
    /// The worker pool could not be constructed.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// A named target paired with its tree provider.
pub type Target = (String, Box<dyn TreeProvider>);

/// The outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    /// Per-target results, in registry order.
    pub targets: Vec<AuditResult>,
    /// Number of targets audited.
    pub total_targets: usize,
    /// Targets with score ≥ 90 and a conformance level other than `none`.
    pub compliant_targets: usize,
    /// Targets that missed the compliance bar.
    pub non_compliant_targets: usize,
    /// `round(100 × compliant / total)`, and `0` when no targets were
    /// audited — "nothing audited" is not "fully compliant".
    pub overall_compliance_rate: u8,
}

impl AuditSummary {
    /// Build a summary from per-target results.
    #[must_use]
    pub fn from_results(targets: Vec<AuditResult>) -> Self {
        let total_targets = targets.len();
        let compliant_targets = targets.iter().filter(|r| r.is_compliant()).count();
        Self {
            total_targets,
            compliant_targets,
            non_compliant_targets: total_targets - compliant_targets,
            overall_compliance_rate: compliance_rate(compliant_targets, total_targets),
            targets,
        }
    }
}

/// Percentage of compliant targets, rounded to the nearest integer.
/// Zero targets yields zero.
fn compliance_rate(compliant: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (100 * compliant + total / 2) / total;
    u8::try_from(rounded).expect("rate never exceeds 100")
}

/// Runs audits across many named targets.
pub struct Orchestrator {
    registry: CheckRegistry,
    workers: Option<usize>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Orchestrator {
    /// An orchestrator using the built-in checks and the configured worker
    /// count.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            registry: CheckRegistry::with_defaults(config),
            workers: config.workers(),
        }
    }

    /// An orchestrator using a caller-assembled check registry.
    #[must_use]
    pub const fn with_registry(registry: CheckRegistry, workers: Option<usize>) -> Self {
        Self { registry, workers }
    }

    /// Audit every target and summarize the batch.
    ///
    /// Per-target failures never abort the batch: a target whose provider
    /// fails is recorded with score 0, compliance level `none`, and a single
    /// critical issue describing the failure.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError`] only for structurally invalid invocations: an
    /// empty registry, duplicate target names, or a worker pool that cannot
    /// be built.
    #[instrument(skip(self, targets), fields(targets = targets.len()))]
    pub fn run(&self, targets: &[Target]) -> Result<AuditSummary, BatchError> {
        if targets.is_empty() {
            return Err(BatchError::NoTargets);
        }

        let mut seen = std::collections::HashSet::new();
        for (name, _) in targets {
            if !seen.insert(name.as_str()) {
                return Err(BatchError::DuplicateTarget(name.clone()));
            }
        }

        let results = match self.workers {
            Some(workers) => rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()?
                .install(|| self.audit_all(targets)),
            None => self.audit_all(targets),
        };

        Ok(AuditSummary::from_results(results))
    }

    fn audit_all(&self, targets: &[Target]) -> Vec<AuditResult> {
        targets
            .par_iter()
            .map(|(name, provider)| match provider.tree() {
                Ok(tree) => audit(name, &tree, &self.registry),
                Err(error) => {
                    warn!(target = %name, %error, "tree provider failed; recording synthetic result");
                    failure_result(name, &error)
                }
            })
            .collect()
    }
}

/// The synthetic result recorded when a target's provider fails.
fn failure_result(target_name: &str, error: &ProviderError) -> AuditResult {
    let issue = Issue {
        automated: false,
        ..Issue::failure(
            "target-unavailable",
            format!("the target could not be audited: {error}"),
            Severity::Critical,
            WcagLevel::A,
            nonempty![wcag("4.1.1")],
        )
    };

    AuditResult {
        target_name: target_name.to_string(),
        issues: vec![issue],
        manual_tests: Vec::new(),
        score: 0,
        compliance_level: ComplianceLevel::None,
        recommendations: vec![format!(
            "restore the tree provider for '{target_name}' and re-run the audit"
        )],
        timestamp: Utc::now(),
    }
}
