//! Diagnostics — notes emitted while expanding scopes.
//!
//! The engine is a best-effort analysis over possibly-incomplete programs:
//! "not found" is an ordinary empty result, never a diagnostic. The one
//! thing worth telling the caller about is a base class that failed to
//! resolve, because the affected class silently loses its inherited
//! members.

use std::sync::Arc;

use crate::base::FileId;

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// A diagnostic message with location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: FileId,
    /// Line (0-indexed).
    pub line: u32,
    /// Column (0-indexed).
    pub column: u32,
    /// Severity level.
    pub severity: Severity,
    /// Note code (e.g. "I0001").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new informational diagnostic.
    pub fn info(file: FileId, line: u32, column: u32, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            line,
            column,
            severity: Severity::Info,
            code: None,
            message: message.into(),
        }
    }

    /// Set the note code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Diagnostic codes emitted by the lookup engine.
pub mod codes {
    /// A base class name that did not resolve to any class.
    pub const UNRESOLVED_BASE_CLASS: &str = "I0001";
}

/// Collects diagnostics during scope expansion.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// All collected diagnostics, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take the collected diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
