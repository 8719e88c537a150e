//! WCAG 2.1 Accessibility Auditing
//!
//! Audits caller-supplied rendered-element trees against automated WCAG
//! checks, pairs the findings with a human-verification checklist, and
//! aggregates everything into scored, deterministic reports.

pub mod domain;
pub use domain::{ColorValue, Config, ElementNode, Issue, ManualTest, Severity, WcagLevel};

/// The automated rule engine.
pub mod checks;
pub use checks::{Check, CheckRegistry, Finding};

/// The fixed human-verification checklist.
pub mod manual;

/// Aggregation of findings into scored results.
pub mod audit;
pub use audit::{audit, AuditResult, ComplianceLevel};

/// Parallel orchestration across many targets.
pub mod batch;
pub use batch::{AuditSummary, BatchError, Orchestrator, ProviderError, TreeProvider};

/// Deterministic plain-text report rendering.
pub mod report;
