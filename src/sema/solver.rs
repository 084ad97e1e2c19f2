//! The constraint solver.
//!
//! A worklist of constraints is drained one at a time: equalities unify,
//! conformances apply the binding-operator rules, member and construction
//! constraints resolve against scopes once their owner is known, and
//! disjunctions fork the solver over snapshots, first viable branch wins.
//!
//! Failure never unwinds the pipeline. A top-level constraint that cannot
//! hold becomes a diagnostic and its unresolved variables absorb into the
//! error type; inside a fork, failure just kills the branch.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use ast::BindingOperator;
use diag::{Diagnostic, DiagnosticKind, UnsolvableCause};
use scope::{ScopeId, ScopeMap, SymbolId};
use sema::constraint::{Constraint, ConstraintCause, ConstraintKind};
use sema::substitution::SubstitutionTable;
use types::lifecycle;
use types::{BuiltinName, CompilerContext, QualSet, Ty, TypeId};

/// How many disjunction branches may be explored before giving up.
const BRANCH_BUDGET: usize = 10_000;

/// What the solver hands to the dispatcher.
#[derive(Debug)]
pub struct Solution {
    pub substitution: SubstitutionTable,
    /// The disjunction branches the successful path committed to.
    pub choices: Vec<(ConstraintCause, usize)>,
}

enum Progress {
    Solved,
    Deferred,
}

enum SolverFailure {
    /// A constraint failed; solving continues without it.
    Unsatisfied(Constraint),
    /// The branch budget ran out inside the disjunction at `cause`.
    GaveUp(ConstraintCause),
}

/// Worklist unification engine over the generated constraints.
#[derive(Debug)]
pub struct ConstraintSolver<'s> {
    scopes: &'s ScopeMap,
    worklist: VecDeque<Constraint>,
    substitution: SubstitutionTable,
    choices: Vec<(ConstraintCause, usize)>,
    branch_budget: usize,
}

impl<'s> ConstraintSolver<'s> {
    pub fn new(scopes: &'s ScopeMap,
               constraints: Vec<Constraint>)
               -> ConstraintSolver<'s> {
        ConstraintSolver {
            scopes,
            worklist: constraints.into_iter().collect(),
            substitution: SubstitutionTable::new(),
            choices: Vec::new(),
            branch_budget: BRANCH_BUDGET,
        }
    }

    pub fn with_budget(mut self, budget: usize) -> ConstraintSolver<'s> {
        self.branch_budget = budget;
        self
    }

    /// Solve to quiescence, reporting every failed constraint.
    pub fn solve(mut self, context: &mut CompilerContext) -> Solution {
        loop {
            match self.run(context) {
                Ok(()) => break,
                Err(SolverFailure::GaveUp(cause)) => {
                    context.report(Diagnostic::error(
                        DiagnosticKind::GiveUp,
                        cause.span(),
                        "type checking gave up: too many overload \
                         alternatives".into()));
                    break;
                }
                Err(SolverFailure::Unsatisfied(constraint)) => {
                    self.diagnose(context, &constraint);
                    self.absorb(context, &constraint);
                }
            }
        }
        debug!("Solved with {} bindings, {} choices",
               self.substitution.len(), self.choices.len());
        Solution {
            substitution: self.substitution,
            choices: self.choices,
        }
    }

    fn run(&mut self, context: &mut CompilerContext)
           -> Result<(), SolverFailure> {
        let mut stalled = 0usize;
        while let Some(constraint) = self.worklist.pop_front() {
            trace!("Solving {:?}", constraint);
            match self.process(context, constraint)? {
                Progress::Solved => stalled = 0,
                Progress::Deferred => {
                    stalled += 1;
                    if stalled > self.worklist.len() {
                        // Every remaining constraint is deferred; nothing
                        // can make progress. Fail the one just requeued.
                        let failed = self.worklist.pop_back()
                            .expect("Deferred constraint was not requeued");
                        return Err(SolverFailure::Unsatisfied(failed));
                    }
                }
            }
        }
        Ok(())
    }

    fn process(&mut self,
               context: &mut CompilerContext,
               constraint: Constraint)
               -> Result<Progress, SolverFailure> {
        let kind = constraint.kind().clone();
        let cause = constraint.cause();
        match kind {
            ConstraintKind::Equality { t, u } => {
                match self.unify(context, t, u) {
                    Ok(()) => Ok(Progress::Solved),
                    Err(()) => Err(SolverFailure::Unsatisfied(constraint)),
                }
            }
            ConstraintKind::Conformance { t, u, op } => {
                match self.conform(context, t, u, op) {
                    Ok(()) => Ok(Progress::Solved),
                    Err(()) => Err(SolverFailure::Unsatisfied(constraint)),
                }
            }
            ConstraintKind::Member { owner, ref name, u } => {
                self.resolve_member(context, constraint.clone(),
                                    owner, name, u, cause)
            }
            ConstraintKind::Construction { callee, fun } => {
                self.resolve_construction(context, constraint.clone(),
                                          callee, fun, cause)
            }
            ConstraintKind::Disjunction(branches) => {
                self.fork(context, branches, cause)
            }
        }
    }

    /// Structural unification, extending the substitution.
    fn unify(&mut self,
             context: &CompilerContext,
             t: TypeId,
             u: TypeId)
             -> Result<(), ()> {
        let t = self.substitution.walk(context, t);
        let u = self.substitution.walk(context, u);
        if t == u {
            return Ok(());
        }
        match (context.ty(t).clone(), context.ty(u).clone()) {
            // The error type absorbs without substituting.
            (Ty::Error, _) | (_, Ty::Error) => Ok(()),
            (Ty::Variable(var), _) => self.bind_var(context, var, u),
            (_, Ty::Variable(var)) => self.bind_var(context, var, t),
            (Ty::Qualified { quals: q1, base: b1 },
             Ty::Qualified { quals: q2, base: b2 }) => {
                if q1 == q2 {
                    self.unify(context, b1, b2)
                }
                else {
                    Err(())
                }
            }
            // A single qualifier wrapper is transparent to equality;
            // conformance owns the qualifier rules.
            (Ty::Qualified { base, .. }, _) => self.unify(context, base, u),
            (_, Ty::Qualified { base, .. }) => self.unify(context, t, base),
            (Ty::Function(f1), Ty::Function(f2)) => {
                if f1.params.len() != f2.params.len()
                    || f1.placeholders != f2.placeholders {
                    return Err(());
                }
                for (&(ref l1, p1), &(ref l2, p2)) in
                    f1.params.iter().zip(f2.params.iter()) {
                    if l1 != l2 {
                        return Err(());
                    }
                    self.unify(context, p1, p2)?;
                }
                self.unify(context, f1.codomain, f2.codomain)
            }
            (Ty::Metatype(a), Ty::Metatype(b)) => self.unify(context, a, b),
            (Ty::OpenedNominal { base: b1, bindings: m1 },
             Ty::OpenedNominal { base: b2, bindings: m2 }) => {
                if b1 != b2 {
                    return Err(());
                }
                self.unify_bindings(context, &m1, &m2)
            }
            (Ty::OpenedNominal { base, bindings }, Ty::Nominal(_))
                if base == u => {
                // The unspecialized nominal: placeholders stand for
                // themselves.
                self.bind_each_to_key(context, &bindings)
            }
            (Ty::Nominal(_), Ty::OpenedNominal { base, bindings })
                if base == t => {
                self.bind_each_to_key(context, &bindings)
            }
            (Ty::OpenedNominal { base: b1, bindings: m1 },
             Ty::BoundGeneric { base: b2, bindings: m2 })
            | (Ty::BoundGeneric { base: b2, bindings: m2 },
               Ty::OpenedNominal { base: b1, bindings: m1 }) => {
                if b1 != b2 {
                    return Err(());
                }
                self.unify_bindings(context, &m1, &m2)
            }
            (Ty::BoundGeneric { base: b1, bindings: m1 },
             Ty::BoundGeneric { base: b2, bindings: m2 }) => {
                if b1 != b2 {
                    return Err(());
                }
                self.unify_bindings(context, &m1, &m2)
            }
            (Ty::BoundGeneric { base, bindings }, Ty::Nominal(_))
                if base == u => {
                self.bind_each_to_key(context, &bindings)
            }
            (Ty::Nominal(_), Ty::BoundGeneric { base, bindings })
                if base == t => {
                self.bind_each_to_key(context, &bindings)
            }
            _ => Err(()),
        }
    }

    fn bind_var(&mut self,
                context: &CompilerContext,
                var: u32,
                ty: TypeId)
                -> Result<(), ()> {
        if self.substitution.occurs(context, var, ty) {
            debug!("Occurs check rejected ${} := {}", var, context.describe(ty));
            return Err(());
        }
        self.substitution.bind(var, ty);
        Ok(())
    }

    fn unify_bindings(&mut self,
                      context: &CompilerContext,
                      m1: &[(TypeId, TypeId)],
                      m2: &[(TypeId, TypeId)])
                      -> Result<(), ()> {
        if m1.len() != m2.len() {
            return Err(());
        }
        // Both sides are sorted by placeholder at interning time.
        for (&(k1, v1), &(k2, v2)) in m1.iter().zip(m2.iter()) {
            if k1 != k2 {
                return Err(());
            }
            self.unify(context, v1, v2)?;
        }
        Ok(())
    }

    fn bind_each_to_key(&mut self,
                        context: &CompilerContext,
                        bindings: &[(TypeId, TypeId)])
                        -> Result<(), ()> {
        for &(placeholder, value) in bindings {
            self.unify(context, value, placeholder)?;
        }
        Ok(())
    }

    /// Conformance: the unqualified sides must unify and the qualifier
    /// sets must be admissible under the binding operator; without an
    /// operator, the subtype relation is the fallback.
    fn conform(&mut self,
               context: &CompilerContext,
               t: TypeId,
               u: TypeId,
               op: Option<BindingOperator>)
               -> Result<(), ()> {
        let t = self.substitution.walk(context, t);
        let u = self.substitution.walk(context, u);
        let (t_quals, t_base) = context.split_quals(t);
        let (u_quals, u_base) = context.split_quals(u);

        match op {
            // A copy is free over qualifier combinations; the unqualified
            // types must agree.
            None | Some(BindingOperator::Copy) => {}
            // Moves need value semantics on both sides.
            Some(BindingOperator::Move) => {
                if t_quals.map_or(false, |q| !q.contains(QualSet::VAL))
                    || u_quals.map_or(false, |q| !q.contains(QualSet::VAL)) {
                    return Err(());
                }
            }
            // A ref binding needs a reference-semantics lvalue.
            Some(BindingOperator::Ref) => {
                if u_quals.map_or(false, |q| !q.contains(QualSet::REF)) {
                    return Err(());
                }
            }
        }

        let snapshot = self.substitution.snapshot();
        if self.unify(context, t_base, u_base).is_ok() {
            return Ok(());
        }
        self.substitution.restore(snapshot);

        if op.is_none() {
            // Subtype fallback: everything conforms to the top type, and
            // the bottom type to everything.
            let t_root = self.substitution.walk(context, t_base);
            let u_root = self.substitution.walk(context, u_base);
            if u_root == context.builtin(BuiltinName::Anything)
                || t_root == context.builtin(BuiltinName::Nothing) {
                return Ok(());
            }
        }
        Err(())
    }

    /// Resolve a member constraint once the owner's shape is known.
    fn resolve_member(&mut self,
                      context: &mut CompilerContext,
                      constraint: Constraint,
                      owner: TypeId,
                      name: &str,
                      u: TypeId,
                      cause: ConstraintCause)
                      -> Result<Progress, SolverFailure> {
        let owner = self.substitution.walk(context, owner);
        let (_, stripped) = context.split_quals(owner);
        let data = context.ty(stripped).clone();
        match data {
            Ty::Variable(_) => {
                trace!("Deferring member {} on unresolved owner", name);
                self.worklist.push_back(constraint);
                Ok(Progress::Deferred)
            }
            Ty::Error => Ok(Progress::Solved),
            Ty::Metatype(inner) => {
                let inner = self.substitution.walk(context, inner);
                if context.ty(inner).is_variable() {
                    trace!("Deferring static member {} on unresolved type",
                           name);
                    self.worklist.push_back(constraint);
                    return Ok(Progress::Deferred);
                }
                if context.ty(inner).is_error() {
                    return Ok(Progress::Solved);
                }
                match self.owner_parts(context, inner) {
                    Some((scope, bindings)) => {
                        self.push_member_branches(
                            context, constraint, scope, &bindings,
                            name, u, None, cause)
                    }
                    None => Err(SolverFailure::Unsatisfied(constraint)),
                }
            }
            Ty::Builtin { .. } | Ty::Nominal(_)
            | Ty::OpenedNominal { .. } | Ty::BoundGeneric { .. } => {
                match self.owner_parts(context, stripped) {
                    Some((scope, bindings)) => {
                        self.push_member_branches(
                            context, constraint, scope, &bindings,
                            name, u, Some(stripped), cause)
                    }
                    None => Err(SolverFailure::Unsatisfied(constraint)),
                }
            }
            _ => Err(SolverFailure::Unsatisfied(constraint)),
        }
    }

    /// The member scope and placeholder bindings of an owner type.
    fn owner_parts(&self,
                   context: &CompilerContext,
                   owner: TypeId)
                   -> Option<(ScopeId, FxHashMap<TypeId, TypeId>)> {
        match context.ty(owner).clone() {
            Ty::Builtin { scope, .. } => Some((scope, FxHashMap::default())),
            Ty::Nominal(nominal) => {
                Some((nominal.scope, FxHashMap::default()))
            }
            Ty::OpenedNominal { base, bindings }
            | Ty::BoundGeneric { base, bindings } => {
                match *context.ty(base) {
                    Ty::Nominal(ref nominal) => {
                        Some((nominal.scope,
                              bindings.into_iter().collect()))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Queue equality branches for every member candidate; a method seen
    /// through an instance applies its `Self` parameter to the owner.
    fn push_member_branches(&mut self,
                            context: &mut CompilerContext,
                            constraint: Constraint,
                            scope: ScopeId,
                            owner_bindings: &FxHashMap<TypeId, TypeId>,
                            name: &str,
                            u: TypeId,
                            instance: Option<TypeId>,
                            cause: ConstraintCause)
                            -> Result<Progress, SolverFailure> {
        let symbols: Vec<SymbolId> =
            self.scopes.scope(scope).symbols(name).to_vec();
        if symbols.is_empty() {
            return Err(SolverFailure::Unsatisfied(constraint));
        }
        let branches: Vec<Constraint> = symbols.iter()
            .map(|&symbol| {
                let candidate = self.instantiate_member(
                    context, symbol, owner_bindings);
                match instance {
                    Some(owner) if self.scopes.symbol(symbol).is_method() => {
                        let applied = context.function_type(
                            vec![(None, owner)], u, vec![]);
                        Constraint::equality(candidate, applied, cause)
                    }
                    _ => Constraint::equality(candidate, u, cause),
                }
            })
            .collect();
        if branches.len() == 1 {
            let branch = branches.into_iter()
                .next()
                .expect("Checked a single branch above");
            self.worklist.push_front(branch);
        }
        else {
            self.worklist.push_front(
                Constraint::disjunction(branches, cause));
        }
        Ok(Progress::Solved)
    }

    /// A member symbol's type as seen from this owner: the owner's
    /// placeholder bindings substituted in, then the member's own
    /// placeholders opened fresh.
    fn instantiate_member(&mut self,
                          context: &mut CompilerContext,
                          symbol: SymbolId,
                          owner_bindings: &FxHashMap<TypeId, TypeId>)
                          -> TypeId {
        let ty = match self.scopes.symbol(symbol).ty() {
            Some(ty) => ty,
            None => return context.error(),
        };
        let closed = lifecycle::close(context, ty, owner_bindings);
        let mut fresh = FxHashMap::default();
        lifecycle::open(context, closed, &mut fresh)
    }

    /// Resolve a construction constraint: the callee must be a metatype of
    /// a nominal with a `new` whose signature matches.
    fn resolve_construction(&mut self,
                            context: &mut CompilerContext,
                            constraint: Constraint,
                            callee: TypeId,
                            fun: TypeId,
                            cause: ConstraintCause)
                            -> Result<Progress, SolverFailure> {
        let callee = self.substitution.walk(context, callee);
        let (_, stripped) = context.split_quals(callee);
        let data = context.ty(stripped).clone();
        match data {
            Ty::Variable(_) => {
                trace!("Deferring construction on unresolved callee");
                self.worklist.push_back(constraint);
                Ok(Progress::Deferred)
            }
            Ty::Error => Ok(Progress::Solved),
            Ty::Metatype(inner) => {
                let inner = self.substitution.walk(context, inner);
                if context.ty(inner).is_variable() {
                    self.worklist.push_back(constraint);
                    return Ok(Progress::Deferred);
                }
                if context.ty(inner).is_error() {
                    return Ok(Progress::Solved);
                }
                match self.owner_parts(context, inner) {
                    Some((scope, bindings)) => {
                        self.push_member_branches(
                            context, constraint, scope, &bindings,
                            "new", fun, None, cause)
                    }
                    None => Err(SolverFailure::Unsatisfied(constraint)),
                }
            }
            _ => Err(SolverFailure::Unsatisfied(constraint)),
        }
    }

    /// Explore a disjunction's branches in order; first viable wins.
    fn fork(&mut self,
            context: &mut CompilerContext,
            branches: Vec<Constraint>,
            cause: ConstraintCause)
            -> Result<Progress, SolverFailure> {
        for (index, branch) in branches.iter().enumerate() {
            if self.branch_budget == 0 {
                return Err(SolverFailure::GaveUp(cause));
            }
            self.branch_budget -= 1;
            trace!("Trying alternative {} of {}", index, branches.len());

            let snapshot = self.substitution.snapshot();
            let saved_worklist = self.worklist.clone();
            let saved_choices = self.choices.len();

            self.choices.push((cause, index));
            self.worklist.push_front(branch.clone());
            match self.run(context) {
                Ok(()) => {
                    debug!("Alternative {} of {} succeeded",
                           index, branches.len());
                    return Ok(Progress::Solved);
                }
                Err(SolverFailure::GaveUp(cause)) => {
                    return Err(SolverFailure::GaveUp(cause));
                }
                Err(SolverFailure::Unsatisfied(failed)) => {
                    trace!("Alternative {} failed on {:?}", index, failed);
                    self.substitution.restore(snapshot);
                    self.worklist = saved_worklist;
                    self.choices.truncate(saved_choices);
                }
            }
        }
        Err(SolverFailure::Unsatisfied(
            Constraint::disjunction(branches, cause)))
    }

    /// Report a failed constraint at its source location.
    fn diagnose(&mut self,
                context: &mut CompilerContext,
                constraint: &Constraint) {
        let (cause, message) = match *constraint.kind() {
            ConstraintKind::Equality { t, u } => {
                let t = self.substitution.reify(context, t);
                let u = self.substitution.reify(context, u);
                (UnsolvableCause::Mismatch,
                 format!("type mismatch: expected `{}`, found `{}`",
                         context.describe(u), context.describe(t)))
            }
            ConstraintKind::Conformance { t, u, .. } => {
                let t = self.substitution.reify(context, t);
                let u = self.substitution.reify(context, u);
                (UnsolvableCause::Mismatch,
                 format!("`{}` does not conform to `{}`",
                         context.describe(t), context.describe(u)))
            }
            ConstraintKind::Member { owner, ref name, .. } => {
                let owner = self.substitution.reify(context, owner);
                let message = if context.contains_variable(owner) {
                    format!("could not resolve member `{}`", name)
                }
                else {
                    format!("type `{}` has no member `{}`",
                            context.describe(owner), name)
                };
                (UnsolvableCause::Mismatch, message)
            }
            ConstraintKind::Construction { callee, .. } => {
                let callee = self.substitution.reify(context, callee);
                (UnsolvableCause::Mismatch,
                 format!("`{}` cannot be constructed",
                         context.describe(callee)))
            }
            ConstraintKind::Disjunction(_) => {
                (UnsolvableCause::NoViableOverload,
                 "no viable overload satisfies the constraints".into())
            }
        };
        context.report(Diagnostic::error(
            DiagnosticKind::UnsolvableConstraint(cause),
            constraint.cause().span(),
            message));
    }

    /// Sink the unresolved variables of a failed constraint into the error
    /// type so one failure does not cascade.
    fn absorb(&mut self,
              context: &CompilerContext,
              constraint: &Constraint) {
        let error = context.error();
        let sides = match *constraint.kind() {
            ConstraintKind::Equality { t, u }
            | ConstraintKind::Conformance { t, u, .. } => vec![t, u],
            ConstraintKind::Member { u, .. } => vec![u],
            ConstraintKind::Construction { fun, .. } => vec![fun],
            ConstraintKind::Disjunction(_) => vec![],
        };
        for side in sides {
            let walked = self.substitution.walk(context, side);
            if let Ty::Variable(var) = *context.ty(walked) {
                self.substitution.bind(var, error);
            }
        }
    }
}
