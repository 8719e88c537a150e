//! The rule engine: an open registry of automated accessibility checks.
//!
//! Each [`Check`] is a pure function over an immutable [`Snapshot`] and can
//! therefore run in parallel with every other check. Findings carry a
//! document-order anchor; the registry sorts merged output by
//! `(anchor, check id)` so the result is identical regardless of execution
//! order or pool size.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::debug;

use crate::domain::{element::Snapshot, Config, Criterion, ElementNode, Issue};

mod aria;
mod contrast;
mod headings;
mod keyboard;
mod labels;
mod link_text;
mod media;
mod unique_ids;

pub use aria::AriaRoles;
pub use contrast::ColorContrast;
pub use headings::HeadingStructure;
pub use keyboard::KeyboardAccess;
pub use labels::FormLabels;
pub use link_text::LinkText;
pub use media::ImageAlt;
pub use unique_ids::UniqueIds;

/// Build a citation from a known-good built-in literal.
pub(crate) fn wcag(citation: &str) -> Criterion {
    Criterion::new(citation).expect("built-in citations are valid")
}

/// An [`Issue`] anchored to the document-order index of the first element it
/// concerns. The anchor exists purely to make merged check output
/// deterministic; it is not part of the reported finding.
#[derive(Debug)]
pub struct Finding {
    anchor: usize,
    issue: Issue,
}

impl Finding {
    /// Anchor a finding at a document-order index.
    #[must_use]
    pub const fn new(anchor: usize, issue: Issue) -> Self {
        Self { anchor, issue }
    }

    /// The document-order anchor.
    #[must_use]
    pub const fn anchor(&self) -> usize {
        self.anchor
    }

    /// The underlying issue.
    #[must_use]
    pub const fn issue(&self) -> &Issue {
        &self.issue
    }
}

/// A single automated accessibility check.
///
/// Implementations must be pure: the same snapshot yields the same findings
/// on every run, with no side effects or shared state. That property is what
/// allows the registry to run checks concurrently and still produce
/// deterministic output.
pub trait Check: Send + Sync {
    /// Stable identifier for the check, used as the secondary sort key when
    /// merging findings.
    fn id(&self) -> &'static str;

    /// Run the check over a snapshot.
    fn run(&self, snapshot: &Snapshot<'_>) -> Vec<Finding>;
}

/// An extensible registry of checks.
///
/// New checks can be added with [`CheckRegistry::register`] without touching
/// the aggregator or the orchestrator.
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::with_defaults(&Config::default())
    }
}

impl CheckRegistry {
    /// A registry with no checks installed.
    #[must_use]
    pub const fn empty() -> Self {
        Self { checks: Vec::new() }
    }

    /// A registry with all built-in checks installed.
    #[must_use]
    pub fn with_defaults(config: &Config) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(AriaRoles));
        registry.register(Box::new(ColorContrast));
        registry.register(Box::new(FormLabels));
        registry.register(Box::new(HeadingStructure));
        registry.register(Box::new(ImageAlt));
        registry.register(Box::new(KeyboardAccess));
        registry.register(Box::new(LinkText::with_extra_phrases(
            config.extra_generic_phrases(),
        )));
        registry.register(Box::new(UniqueIds));
        registry
    }

    /// Install a check.
    pub fn register(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    /// The identifiers of the installed checks.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|check| check.id())
    }

    /// The number of installed checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether the registry has no checks installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every installed check over the tree and merge the findings.
    ///
    /// Checks run in parallel; the merged output is sorted by
    /// `(document-order anchor, check id)`, so two runs over an unchanged
    /// tree always return identical issue lists.
    #[must_use]
    pub fn run(&self, tree: &ElementNode) -> Vec<Issue> {
        let snapshot = Snapshot::new(tree);

        let mut findings: Vec<(usize, &'static str, Issue)> = self
            .checks
            .par_iter()
            .map(|check| {
                let found = check.run(&snapshot);
                debug!(check = check.id(), findings = found.len(), "check complete");
                found
                    .into_iter()
                    .map(|finding| (finding.anchor, check.id(), finding.issue))
                    .collect::<Vec<_>>()
            })
            .reduce(Vec::new, |mut acc, mut batch| {
                acc.append(&mut batch);
                acc
            });

        findings.sort_by(|(anchor_a, id_a, _), (anchor_b, id_b, _)| {
            anchor_a.cmp(anchor_b).then_with(|| id_a.cmp(id_b))
        });

        findings.into_iter().map(|(_, _, issue)| issue).collect()
    }
}
