//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of identical same-line reports
//! - The sticky `errored` flag, which survives limits, dedup, and flushing
//! - `ErrorGuaranteed` proof that errors were emitted

#[cfg(test)]
mod tests;

use crate::{Diagnostic, ErrorGuaranteed};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop a diagnostic identical in event, line, and message to one
    /// already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Count of queued errors (not warnings).
    error_count: usize,
    /// Set by the first error ever recorded; never cleared.
    errored: bool,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if it was queued, `false` if it was filtered. An error
    /// sets the sticky flag either way.
    pub fn push(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();
        if is_error {
            self.errored = true;
        }

        if is_error && self.limit_reached() {
            return false;
        }

        if self.config.deduplicate && self.is_duplicate(&diag) {
            return false;
        }

        if is_error {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Record an error and get proof it was recorded.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with a warning");
        self.push(diag);
        self.errored = true;
        ErrorGuaranteed::new()
    }

    fn is_duplicate(&self, diag: &Diagnostic) -> bool {
        self.diagnostics.iter().rev().any(|queued| {
            queued.event == diag.event
                && queued.pos.line == diag.pos.line
                && queued.message == diag.message
        })
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Number of errors currently queued.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// The sticky flag: true once any error has been recorded.
    pub fn errored(&self) -> bool {
        self.errored
    }

    /// Proof of an earlier error, if there was one.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        self.errored.then(ErrorGuaranteed::new)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Sort diagnostics by position and drain them.
    ///
    /// The sticky flag is not reset.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self.diagnostics.windows(2).all(|w| w[0].pos <= w[1].pos);
        if !already_sorted {
            self.diagnostics.sort_by_key(|d| d.pos);
        }
        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }
}
