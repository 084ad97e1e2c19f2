//! Diagnostics reported by semantic analysis.
//!
//! Passes never abort on a bad program: they push a `Diagnostic` into the
//! context's `ErrorCollector` and keep going, attaching the error type to
//! the offending node so later constraints do not cascade.

mod errors;
mod collector;

pub use self::errors::{Diagnostic, DiagnosticKind, Severity, UnsolvableCause};
pub use self::collector::ErrorCollector;
