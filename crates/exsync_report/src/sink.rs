//! Leveled diagnostics sink.

use std::fmt;

/// Severity of a diagnostic message, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Verbose detail.
    Debug,
    /// Normal progress information.
    Info,
    /// Something suspicious but not fatal.
    Warning,
    /// A failure.
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Debug => f.write_str("DEBUG"),
            DiagnosticLevel::Info => f.write_str("INFO"),
            DiagnosticLevel::Warning => f.write_str("WARNING"),
            DiagnosticLevel::Error => f.write_str("ERROR"),
        }
    }
}

/// Collects diagnostic messages at or above a minimum level, in log order.
///
/// Warning and error messages are stored with a level prefix
/// (`"WARNING: "`, `"ERROR: "`); debug and info messages are stored as
/// given.
#[derive(Debug, Clone)]
pub struct DiagnosticsSink {
    min_level: DiagnosticLevel,
    entries: Vec<String>,
}

impl DiagnosticsSink {
    /// Creates a sink retaining messages at or above `min_level`.
    #[must_use]
    pub fn new(min_level: DiagnosticLevel) -> Self {
        Self {
            min_level,
            entries: Vec::new(),
        }
    }

    /// Returns the configured minimum level.
    #[must_use]
    pub fn min_level(&self) -> DiagnosticLevel {
        self.min_level
    }

    /// Logs a debug message.
    pub fn debug(&mut self, message: impl Into<String>) {
        self.log(DiagnosticLevel::Debug, message.into());
    }

    /// Logs an info message.
    pub fn info(&mut self, message: impl Into<String>) {
        self.log(DiagnosticLevel::Info, message.into());
    }

    /// Logs a warning; stored text is prefixed with `WARNING: `.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(DiagnosticLevel::Warning, message.into());
    }

    /// Logs an error; stored text is prefixed with `ERROR: `.
    pub fn error(&mut self, message: impl Into<String>) {
        self.log(DiagnosticLevel::Error, message.into());
    }

    fn log(&mut self, level: DiagnosticLevel, message: String) {
        if level < self.min_level {
            return;
        }
        let entry = match level {
            DiagnosticLevel::Warning | DiagnosticLevel::Error => {
                format!("{level}: {message}")
            }
            _ => message,
        };
        self.entries.push(entry);
    }

    /// Returns the retained entries in log order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Joins all retained entries with newlines, in log order.
    #[must_use]
    pub fn join(&self) -> String {
        self.entries.join("\n")
    }

    /// Returns true if nothing was retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DiagnosticsSink {
    fn default() -> Self {
        Self::new(DiagnosticLevel::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering_is_ascending() {
        assert!(DiagnosticLevel::Debug < DiagnosticLevel::Info);
        assert!(DiagnosticLevel::Info < DiagnosticLevel::Warning);
        assert!(DiagnosticLevel::Warning < DiagnosticLevel::Error);
    }

    #[test]
    fn warnings_and_errors_are_prefixed() {
        let mut sink = DiagnosticsSink::new(DiagnosticLevel::Debug);
        sink.debug("probing");
        sink.info("uploading");
        sink.warning("slow response");
        sink.error("commit rejected");

        assert_eq!(
            sink.entries(),
            [
                "probing",
                "uploading",
                "WARNING: slow response",
                "ERROR: commit rejected",
            ]
        );
    }

    #[test]
    fn minimum_level_filters() {
        let mut sink = DiagnosticsSink::new(DiagnosticLevel::Warning);
        sink.debug("ignored");
        sink.info("ignored too");
        sink.warning("kept");

        assert_eq!(sink.entries(), ["WARNING: kept"]);
    }

    #[test]
    fn join_preserves_log_order() {
        let mut sink = DiagnosticsSink::new(DiagnosticLevel::Info);
        sink.info("first");
        sink.error("second");
        sink.info("third");

        assert_eq!(sink.join(), "first\nERROR: second\nthird");
    }
}
