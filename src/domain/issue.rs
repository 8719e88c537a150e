//! Findings produced by the audit engine.
//!
//! An [`Issue`] is one automated finding; a [`ManualTest`] is a checklist
//! entry that only a human can resolve. Both cite at least one WCAG success
//! criterion — for issues that invariant is carried by the type
//! ([`nonempty::NonEmpty`]), not by a runtime assertion.

use std::{fmt, str::FromStr};

use non_empty_string::NonEmptyString;
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

/// How serious a finding is.
///
/// Variants are declared most-severe first so the derived ordering sorts
/// critical issues ahead of minor ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks access for some users outright.
    Critical,
    /// Major barrier with no reasonable workaround.
    Serious,
    /// Degrades the experience but a workaround exists.
    Moderate,
    /// Cosmetic or best-practice finding.
    Minor,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Serious => write!(f, "serious"),
            Self::Moderate => write!(f, "moderate"),
            Self::Minor => write!(f, "minor"),
        }
    }
}

/// A WCAG conformance level, in increasing strictness.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum WcagLevel {
    /// Level A.
    A,
    /// Level AA.
    AA,
    /// Level AAA.
    AAA,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::AA => write!(f, "AA"),
            Self::AAA => write!(f, "AAA"),
        }
    }
}

/// A validated WCAG success-criterion citation, such as `1.4.3`.
///
/// Guaranteed non-empty and made up of dot-separated numeric segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Criterion(NonEmptyString);

/// Error returned when a string is not a valid WCAG citation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid WCAG criterion '{0}': expected dot-separated numbers such as 1.4.3")]
pub struct InvalidCriterionError(String);

impl Criterion {
    /// Create a citation from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCriterionError`] if the string is empty or is not a
    /// sequence of dot-separated numeric segments.
    pub fn new(s: &str) -> Result<Self, InvalidCriterionError> {
        let valid = !s.is_empty()
            && s.split('.').all(|segment| {
                !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
            });
        if !valid {
            return Err(InvalidCriterionError(s.to_string()));
        }
        let inner = NonEmptyString::new(s.to_string())
            .map_err(|_| InvalidCriterionError(s.to_string()))?;
        Ok(Self(inner))
    }

    /// The citation as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Criterion {
    type Err = InvalidCriterionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Criterion {
    type Error = InvalidCriterionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Criterion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Criterion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// One automated finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Stable identifier of the finding kind (e.g. `missing-image-alt`).
    pub id: String,
    /// Human-readable description of what was found.
    pub description: String,
    /// How serious the finding is.
    pub severity: Severity,
    /// The strictest conformance level the finding jeopardises.
    pub wcag_level: WcagLevel,
    /// The WCAG success criteria the finding cites. Never empty.
    pub wcag_criteria: NonEmpty<Criterion>,
    /// Stable selectors of the affected elements.
    pub elements_affected: Vec<String>,
    /// Whether the finding was produced by an automated check.
    pub automated: bool,
    /// Whether a human must confirm the finding before it is conclusive.
    pub needs_manual_verification: bool,
    /// Whether the check passed for the cited elements. Failed findings
    /// (`passed == false`) that need no manual verification count against
    /// the audit score.
    pub passed: bool,
}

impl Issue {
    /// Create a failed automated finding.
    #[must_use]
    pub fn failure(
        id: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        wcag_level: WcagLevel,
        wcag_criteria: NonEmpty<Criterion>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            severity,
            wcag_level,
            wcag_criteria,
            elements_affected: Vec::new(),
            automated: true,
            needs_manual_verification: false,
            passed: false,
        }
    }

    /// Create a passing automated finding (recorded so reports can show
    /// what was checked, never counted against the score).
    #[must_use]
    pub fn pass(
        id: impl Into<String>,
        description: impl Into<String>,
        wcag_level: WcagLevel,
        wcag_criteria: NonEmpty<Criterion>,
    ) -> Self {
        Self {
            passed: true,
            ..Self::failure(id, description, Severity::Minor, wcag_level, wcag_criteria)
        }
    }

    /// Builder-style helper: attach affected element selectors.
    #[must_use]
    pub fn with_elements(mut self, selectors: Vec<String>) -> Self {
        self.elements_affected = selectors;
        self
    }

    /// Builder-style helper: mark the finding as needing human confirmation.
    /// Such findings stay visible in reports but are excluded from the score
    /// deduction until resolved.
    #[must_use]
    pub const fn pending_verification(mut self) -> Self {
        self.needs_manual_verification = true;
        self
    }

    /// Whether this finding counts against the automated score.
    #[must_use]
    pub const fn counts_against_score(&self) -> bool {
        !self.passed && !self.needs_manual_verification
    }
}

/// Progress of a human-verification checklist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualStatus {
    /// Awaiting human verification. The initial state.
    #[default]
    Pending,
    /// A human verified the behaviour.
    Pass,
    /// A human found the behaviour deficient.
    Fail,
}

impl fmt::Display for ManualStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// A checklist entry that only a human can resolve.
///
/// The engine creates these in the [`ManualStatus::Pending`] state and never
/// changes the status itself; [`ManualTest::record_outcome`] exists for the
/// caller to record the result of an actual human verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualTest {
    /// Stable identifier of the checklist entry.
    pub id: String,
    /// What the human should verify.
    pub description: String,
    /// Verification progress.
    pub status: ManualStatus,
    /// Step-by-step verification instructions.
    pub verification_steps: Vec<String>,
    /// The conformance level the entry relates to.
    pub wcag_level: WcagLevel,
    /// The WCAG success criteria the entry cites. Never empty.
    pub wcag_criteria: NonEmpty<Criterion>,
}

impl ManualTest {
    /// Create a pending checklist entry.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        verification_steps: Vec<String>,
        wcag_level: WcagLevel,
        wcag_criteria: NonEmpty<Criterion>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            status: ManualStatus::default(),
            verification_steps,
            wcag_level,
            wcag_criteria,
        }
    }

    /// Record the outcome of a human verification.
    pub const fn record_outcome(&mut self, passed: bool) {
        self.status = if passed {
            ManualStatus::Pass
        } else {
            ManualStatus::Fail
        };
    }

    /// Whether the entry still awaits human verification.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ManualStatus::Pending
    }
}
