//! Diagnostic values produced by the semantic passes.

use span::Span;

/// How bad a diagnostic is.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// Why a constraint could not be solved.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum UnsolvableCause {
    /// A constraint failed after every subsumption attempt.
    Mismatch,
    /// A disjunction left more than one viable alternative.
    Ambiguous,
    /// A disjunction had no viable alternative.
    NoViableOverload,
}

/// The kinds of error semantic analysis can report.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum DiagnosticKind {
    /// A non-overloadable name was declared twice in one scope.
    DuplicateDeclaration,
    /// A name was redeclared with an incompatible overloadability.
    InvalidRedeclaration,
    /// An identifier used as a type annotation does not name a type.
    InvalidTypeIdentifier,
    /// A specialization list was applied to a non-generic type.
    NonGenericType,
    /// A specialization list names a placeholder the type does not have.
    SuperfluousSpecialization,
    /// An identifier has no declaration in any accessible scope.
    UndefinedSymbol,
    /// The solver could not satisfy a typing constraint.
    UnsolvableConstraint(UnsolvableCause),
    /// The solver exhausted its branch budget.
    GiveUp,
}

/// A single diagnostic: kind, severity, message, and the source range the
/// message is attributed to.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    severity: Severity,
    span: Span,
    message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, span: Span, message: String) -> Diagnostic {
        Diagnostic { kind, severity: Severity::Error, span, message }
    }

    pub fn warning(kind: DiagnosticKind, span: Span, message: String) -> Diagnostic {
        Diagnostic { kind, severity: Severity::Warning, span, message }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
