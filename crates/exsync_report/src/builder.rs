//! Outcome record assembly.

use crate::sink::DiagnosticsSink;
use indexmap::IndexMap;
use serde::Serialize;

/// The final outcome of a synchronization run, as handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    /// Whether the run succeeded.
    pub success: bool,
    /// Retained diagnostics, joined by newlines in log order.
    pub diagnostics: String,
    /// Named payload fields, insertion-ordered.
    pub fields: IndexMap<String, serde_json::Value>,
}

impl SyncReport {
    /// Returns a payload field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }
}

/// Assembles a [`SyncReport`].
///
/// Building is side-effect-free and repeatable: multiple `build()` calls
/// from the same builder yield independent copies with identical content.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    success: bool,
    diagnostics: String,
    fields: IndexMap<String, serde_json::Value>,
}

impl ReportBuilder {
    /// Creates an empty builder (success defaults to false).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the success flag.
    #[must_use]
    pub fn success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Takes the diagnostics text from a sink.
    #[must_use]
    pub fn diagnostics(mut self, sink: &DiagnosticsSink) -> Self {
        self.diagnostics = sink.join();
        self
    }

    /// Adds a named payload field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builds an independent report copy.
    #[must_use]
    pub fn build(&self) -> SyncReport {
        SyncReport {
            success: self.success,
            diagnostics: self.diagnostics.clone(),
            fields: self.fields.clone(),
        }
    }
}
