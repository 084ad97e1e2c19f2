//! Accumulates diagnostics across the semantic passes.

use diag::{Diagnostic, DiagnosticKind, Severity};

/// Flat, append-only sink for diagnostics.
///
/// Every pass writes into the same collector; a pass is free to keep going
/// after reporting, so one bad declaration does not hide the rest of the
/// program's problems.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ErrorCollector {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorCollector {
    pub fn new() -> ErrorCollector {
        ErrorCollector { ..Default::default() }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        trace!("Collected {:?}: {}", diagnostic.kind(), diagnostic.message());
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
            .filter(|d| d.severity() == Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Whether any collected diagnostic has the given kind.
    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind() == kind)
    }

    pub fn decompose(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
