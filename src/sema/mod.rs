//! Semantic analysis passes.
//!
//! `type_check` drives the pipeline over a parsed, scope-resolved module:
//!
//! 1. `ItemConstrainer` types declarations and their symbols,
//! 2. `ExprConstrainer` walks bodies emitting typing constraints,
//! 3. `ConstraintSolver` unifies them into a substitution, and
//! 4. `Dispatcher` reifies node types and pins identifiers to symbols.
//!
//! Every pass records problems in the context's `ErrorCollector` and keeps
//! going; the result only says whether the module type checked cleanly.

mod constraint;
mod realizer;
mod item_constrainer;
mod expr_constrainer;
mod substitution;
mod solver;
mod dispatch;

#[cfg(test)]
mod tests;

pub use self::constraint::{
    Constraint, ConstraintAnchor, ConstraintCause, ConstraintKind};
pub use self::realizer::TypeRealizer;
pub use self::item_constrainer::ItemConstrainer;
pub use self::expr_constrainer::ExprConstrainer;
pub use self::substitution::{SubstitutionSnapshot, SubstitutionTable};
pub use self::solver::{ConstraintSolver, Solution};
pub use self::dispatch::Dispatcher;

use ast::Module;
use scope::ScopeMap;
use types::CompilerContext;

/// Type check a module in place.
///
/// On return every expression and declaration carries a reified type (or
/// the error type), every identifier a symbol, and binary operations have
/// been rewritten into explicit method calls. Diagnostics accumulate in
/// `context.errors`; `Err(())` means at least one error was recorded.
pub fn type_check(module: &mut Module,
                  scopes: &ScopeMap,
                  context: &mut CompilerContext)
                  -> Result<(), ()> {
    debug!("Type checking module {}", module.name());
    ItemConstrainer::new(scopes, context).run(module);
    ExprConstrainer::new(scopes, context).run(module);

    let constraints = context.take_constraints();
    debug!("Solving {} constraints", constraints.len());
    let solution = ConstraintSolver::new(scopes, constraints).solve(context);

    Dispatcher::new(scopes, context, solution.substitution).run(module);

    if context.errors.has_errors() {
        Err(())
    }
    else {
        Ok(())
    }
}
