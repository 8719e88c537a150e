use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for the audit engine.
///
/// This struct holds the settings that tune how audits are run: the size of
/// the worker pool used for batch runs and any project-specific additions to
/// the non-descriptive link-text denylist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of worker threads used when auditing multiple targets.
    ///
    /// `0` (the default) lets the thread pool size itself from the number of
    /// available cores.
    workers: usize,

    /// Additional phrases treated as non-descriptive link/button text, on
    /// top of the built-in denylist. Matched case-insensitively.
    extra_generic_phrases: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: 0,
            extra_generic_phrases: Vec::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The configured worker-pool size, or `None` when the pool should size
    /// itself automatically.
    #[must_use]
    pub const fn workers(&self) -> Option<usize> {
        match self.workers {
            0 => None,
            n => Some(n),
        }
    }

    /// Sets the worker-pool size. `0` restores automatic sizing.
    pub const fn set_workers(&mut self, workers: usize) {
        self.workers = workers;
    }

    /// Project-specific additions to the generic-phrase denylist.
    #[must_use]
    pub fn extra_generic_phrases(&self) -> &[String] {
        &self.extra_generic_phrases
    }

    /// Adds a phrase to the denylist additions.
    ///
    /// Phrases are normalized to lowercase before adding. Returns `true` if
    /// the phrase was added, `false` if it was already present.
    pub fn add_generic_phrase(&mut self, phrase: &str) -> bool {
        let phrase = phrase.to_lowercase();
        if self.extra_generic_phrases.contains(&phrase) {
            false
        } else {
            self.extra_generic_phrases.push(phrase);
            true
        }
    }
}
