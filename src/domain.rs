//! Domain models for accessibility auditing.
//!
//! This module contains the core domain types: colors and contrast
//! mathematics, the caller-supplied element tree, findings, and
//! configuration.

/// Color parsing and WCAG contrast mathematics.
pub mod color;
pub use color::{ColorValue, ContrastResult, ParseColorError, TextCategory};

/// The read-only rendered-element tree and its flattened snapshot.
pub mod element;
pub use element::{ComputedStyle, ElementNode, Snapshot};

/// Automated findings and human-verification checklist entries.
pub mod issue;
pub use issue::{Criterion, Issue, ManualStatus, ManualTest, Severity, WcagLevel};

mod config;
pub use config::Config;
