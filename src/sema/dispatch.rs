//! Reification and symbol dispatch.
//!
//! Runs after the solver: every node-attached type is collapsed through
//! the substitution, every identifier is pinned to exactly one declaration
//! symbol, and binary operations are rewritten into explicit method calls
//! so downstream passes see a uniform invocation form.

use std::mem;

use rustc_hash::FxHashMap;

use ast::*;
use diag::{Diagnostic, DiagnosticKind, UnsolvableCause};
use scope::{ScopeId, ScopeMap, SymbolId};
use sema::substitution::SubstitutionTable;
use types::{CompilerContext, Ty, TypeId};

/// The post-solver pass.
#[derive(Debug)]
pub struct Dispatcher<'s, 'ctx> {
    scopes: &'s ScopeMap,
    context: &'ctx mut CompilerContext,
    substitution: SubstitutionTable,
}

impl<'s, 'ctx> Dispatcher<'s, 'ctx> {
    pub fn new(scopes: &'s ScopeMap,
               context: &'ctx mut CompilerContext,
               substitution: SubstitutionTable)
               -> Dispatcher<'s, 'ctx> {
        Dispatcher { scopes, context, substitution }
    }

    pub fn run(&mut self, module: &mut Module) {
        trace!("Dispatching {}", module.name());
        for stmt in module.stmts_mut() {
            self.dispatch_stmt(stmt);
        }
    }

    /// Reify through the substitution; anything still containing a
    /// variable collapses to the error type.
    fn finalize(&mut self, ty: TypeId) -> TypeId {
        let reified = self.substitution.reify(self.context, ty);
        if self.context.contains_variable(reified) {
            self.context.error()
        }
        else {
            reified
        }
    }

    fn dispatch_stmt(&mut self, stmt: &mut Stmt) {
        match *stmt {
            Stmt::Decl(ref mut decl) => self.dispatch_decl(decl),
            Stmt::Expression(ref mut expr) => self.dispatch_expr(expr),
            Stmt::Binding(ref mut binding) => {
                self.dispatch_expr(binding.lvalue_mut());
                self.dispatch_expr(binding.rvalue_mut());
            }
            Stmt::Return(ref mut return_) => {
                if let Some(value) = return_.value_mut() {
                    self.dispatch_expr(value);
                }
            }
        }
    }

    fn dispatch_decl(&mut self, decl: &mut Decl) {
        match *decl {
            Decl::Prop(ref mut prop) => {
                if let Some(value) = prop.initializer_mut() {
                    self.dispatch_expr(value);
                }
                if let Some(ty) = prop.ty() {
                    let reified = self.finalize(ty);
                    prop.set_ty(reified);
                    prop.ident().set_ty(reified);
                }
            }
            Decl::Fun(ref mut fun) => {
                for param in fun.params_mut() {
                    if let Some(default) = param.default_mut() {
                        self.dispatch_expr(default);
                    }
                    if let Some(ty) = param.ty() {
                        let reified = self.finalize(ty);
                        param.set_ty(reified);
                        param.ident().set_ty(reified);
                    }
                }
                if let Some(body) = fun.body_mut() {
                    self.dispatch_block(body);
                }
                if let Some(ty) = fun.ty() {
                    let reified = self.finalize(ty);
                    fun.set_ty(reified);
                    fun.ident().set_ty(reified);
                }
            }
            Decl::Nominal(ref mut nominal) => {
                for member in nominal.members_mut() {
                    self.dispatch_decl(member);
                }
            }
        }
    }

    fn dispatch_block(&mut self, block: &mut Block) {
        for stmt in block.stmts_mut() {
            self.dispatch_stmt(stmt);
        }
    }

    fn dispatch_expr(&mut self, expr: &mut Expression) {
        // Children first, so owners and callees are reified before the
        // node's own resolution looks at them.
        match *expr {
            Expression::Literal(_) | Expression::Ident(_) => {}
            Expression::Binary(ref mut binary) => {
                self.dispatch_expr(binary.left_mut());
                self.dispatch_expr(binary.right_mut());
            }
            Expression::Call(ref mut call) => {
                self.dispatch_expr(call.callee_mut());
                for arg in call.args_mut() {
                    self.dispatch_expr(arg.value_mut());
                }
            }
            Expression::Select(ref mut select) => {
                if let Some(owner) = select.owner_mut() {
                    self.dispatch_expr(owner);
                }
            }
            Expression::Subscript(ref mut subscript) => {
                self.dispatch_expr(subscript.callee_mut());
                for arg in subscript.args_mut() {
                    self.dispatch_expr(arg.value_mut());
                }
            }
            Expression::Lambda(ref mut lambda) => {
                for param in lambda.params() {
                    if let Some(ty) = param.ty() {
                        let reified = self.finalize(ty);
                        param.set_ty(reified);
                        param.ident().set_ty(reified);
                    }
                }
                self.dispatch_block(lambda.body_mut());
            }
            Expression::If(ref mut if_expr) => {
                self.dispatch_expr(if_expr.condition_mut());
                self.dispatch_expr(if_expr.then_branch_mut());
                if let Some(else_branch) = if_expr.else_branch_mut() {
                    self.dispatch_expr(else_branch);
                }
            }
        }

        if let Some(ty) = expr.ty() {
            let reified = self.finalize(ty);
            expr.set_ty(reified);
        }

        match *expr {
            Expression::Ident(ref ident) => self.dispatch_ident(ident),
            Expression::Select(ref select) => self.dispatch_select(select),
            _ => {}
        }

        let is_binary = match *expr {
            Expression::Binary(_) => true,
            _ => false,
        };
        if is_binary {
            self.rewrite_binary(expr);
        }
    }

    /// Pick the single declaration an identifier refers to.
    fn dispatch_ident(&mut self, ident: &Ident) {
        if ident.symbol().is_some() {
            // Declarations and realized type identifiers arrive bound.
            return;
        }
        let scope = match ident.scope() {
            Some(scope) => scope,
            None => return,
        };
        let ty = match ident.ty() {
            Some(ty) => ty,
            None => return,
        };
        if self.context.ty(ty).is_error() {
            // Already diagnosed during generation or solving.
            return;
        }
        let candidates = self.scopes.lookup_all(scope, ident.name());
        if candidates.is_empty() {
            return;
        }

        if self.context.ty(ty).is_function() {
            let mut pool = candidates;
            // A lone type symbol in callee position names a constructor:
            // the real choices are the type's `new` members.
            if pool.len() == 1 {
                if let Some(redirected) = self.constructor_pool(pool[0]) {
                    trace!("Redirecting {} to constructor overloads",
                           ident.name());
                    pool = redirected;
                }
            }
            let viable: Vec<SymbolId> = pool.iter()
                .cloned()
                .filter(|&symbol| self.candidate_matches(ty, symbol))
                .collect();
            match viable.len() {
                0 => {
                    self.context.report(Diagnostic::error(
                        DiagnosticKind::UnsolvableConstraint(
                            UnsolvableCause::NoViableOverload),
                        ident.span(),
                        format!("no overload of `{}` matches the type `{}`",
                                ident.name(), self.context.describe(ty))));
                }
                1 => ident.set_symbol(viable[0]),
                _ => {
                    self.context.report(Diagnostic::error(
                        DiagnosticKind::UnsolvableConstraint(
                            UnsolvableCause::Ambiguous),
                        ident.span(),
                        format!("ambiguous reference to `{}`",
                                ident.name())));
                    // Keep going downstream with the first match.
                    ident.set_symbol(viable[0]);
                }
            }
        }
        else {
            if candidates.len() > 1 {
                self.context.report(Diagnostic::error(
                    DiagnosticKind::UnsolvableConstraint(
                        UnsolvableCause::Ambiguous),
                    ident.span(),
                    format!("ambiguous reference to `{}`", ident.name())));
            }
            ident.set_symbol(candidates[0]);
        }
    }

    /// The `new` members of the nominal a metatype symbol names.
    fn constructor_pool(&mut self, symbol: SymbolId) -> Option<Vec<SymbolId>> {
        let symbol_ty = self.scopes.symbol(symbol).ty()?;
        let reified = self.substitution.reify(self.context, symbol_ty);
        let inner = match *self.context.ty(reified) {
            Ty::Metatype(inner) => inner,
            _ => return None,
        };
        let scope = self.member_scope_of(inner)?;
        let pool = self.scopes.scope(scope).symbols("new").to_vec();
        if pool.is_empty() {
            None
        }
        else {
            Some(pool)
        }
    }

    /// Resolve a select's member once the owner type is reified.
    fn dispatch_select(&mut self, select: &SelectExpr) {
        let ownee = select.ownee();
        if ownee.symbol().is_some() {
            return;
        }
        let ty = match ownee.ty() {
            Some(ty) => ty,
            None => return,
        };
        if self.context.ty(ty).is_error() {
            return;
        }
        let owner_ty = match select.owner() {
            Some(owner) => match owner.ty() {
                Some(owner_ty) => owner_ty,
                None => return,
            },
            // Implicit owner: static access on the node's own type.
            None => ty,
        };
        let (_, stripped) = self.context.split_quals(owner_ty);
        let scope = match self.member_scope_of(stripped) {
            Some(scope) => scope,
            None => return,
        };
        let candidates = self.scopes.scope(scope)
            .symbols(ownee.name())
            .to_vec();
        if candidates.is_empty() {
            return;
        }
        let viable: Vec<SymbolId> = candidates.iter()
            .cloned()
            .filter(|&symbol| self.candidate_matches(ty, symbol))
            .collect();
        match viable.len() {
            0 => {
                self.context.report(Diagnostic::error(
                    DiagnosticKind::UnsolvableConstraint(
                        UnsolvableCause::NoViableOverload),
                    ownee.span(),
                    format!("no member `{}` matches the type `{}`",
                            ownee.name(), self.context.describe(ty))));
            }
            1 => ownee.set_symbol(viable[0]),
            _ => {
                self.context.report(Diagnostic::error(
                    DiagnosticKind::UnsolvableConstraint(
                        UnsolvableCause::Ambiguous),
                    ownee.span(),
                    format!("ambiguous member `{}`", ownee.name())));
                ownee.set_symbol(viable[0]);
            }
        }
    }

    /// The scope a type's members live in.
    fn member_scope_of(&self, ty: TypeId) -> Option<ScopeId> {
        match *self.context.ty(ty) {
            Ty::Builtin { scope, .. } => Some(scope),
            Ty::Nominal(ref nominal) => Some(nominal.scope),
            Ty::BoundGeneric { base, .. }
            | Ty::OpenedNominal { base, .. } => self.member_scope_of(base),
            Ty::Metatype(inner) => self.member_scope_of(inner),
            _ => None,
        }
    }

    /// Whether the reified `ty` specializes a candidate symbol's type,
    /// unwrapping the `Self` currying of methods when needed.
    fn candidate_matches(&mut self, ty: TypeId, symbol: SymbolId) -> bool {
        let symbol_ty = match self.scopes.symbol(symbol).ty() {
            Some(symbol_ty) => symbol_ty,
            None => return false,
        };
        let general = self.substitution.reify(self.context, symbol_ty);
        let mut bindings = FxHashMap::default();
        if self.specializes(ty, general, &mut bindings) {
            return true;
        }
        if self.scopes.symbol(symbol).is_method() {
            let inner = match *self.context.ty(general) {
                Ty::Function(ref outer) if outer.params.len() == 1 => {
                    outer.codomain
                }
                _ => return false,
            };
            let mut bindings = FxHashMap::default();
            return self.specializes(ty, inner, &mut bindings);
        }
        false
    }

    /// Structural match treating the general type's placeholders as
    /// bindable variables.
    fn specializes(&mut self,
                   specialized: TypeId,
                   general: TypeId,
                   bindings: &mut FxHashMap<TypeId, TypeId>)
                   -> bool {
        if specialized == general {
            return true;
        }
        let general_data = self.context.ty(general).clone();
        match general_data {
            Ty::Error => return true,
            Ty::Placeholder { .. } => {
                return match bindings.get(&general) {
                    Some(&bound) => bound == specialized,
                    None => {
                        bindings.insert(general, specialized);
                        true
                    }
                };
            }
            _ => {}
        }
        let specialized_data = self.context.ty(specialized).clone();
        match (specialized_data, general_data) {
            (Ty::Error, _) => true,
            (Ty::Qualified { base, .. }, _) => {
                self.specializes(base, general, bindings)
            }
            (_, Ty::Qualified { base, .. }) => {
                self.specializes(specialized, base, bindings)
            }
            (Ty::Function(f1), Ty::Function(f2)) => {
                if f1.params.len() != f2.params.len() {
                    return false;
                }
                for (&(ref l1, p1), &(ref l2, p2)) in
                    f1.params.iter().zip(f2.params.iter()) {
                    if l1 != l2 || !self.specializes(p1, p2, bindings) {
                        return false;
                    }
                }
                self.specializes(f1.codomain, f2.codomain, bindings)
            }
            (Ty::Metatype(a), Ty::Metatype(b)) => {
                self.specializes(a, b, bindings)
            }
            (Ty::BoundGeneric { base: b1, bindings: m1 },
             Ty::BoundGeneric { base: b2, bindings: m2 }) => {
                if b1 != b2 || m1.len() != m2.len() {
                    return false;
                }
                for (&(k1, v1), &(k2, v2)) in m1.iter().zip(m2.iter()) {
                    if k1 != k2 || !self.specializes(v1, v2, bindings) {
                        return false;
                    }
                }
                true
            }
            // A closed generic specializes its raw base by binding each
            // placeholder to its argument.
            (Ty::BoundGeneric { base, bindings: m }, Ty::Nominal(_))
                if base == general => {
                m.iter().all(|&(placeholder, value)| {
                    self.specializes(value, placeholder, bindings)
                })
            }
            _ => false,
        }
    }

    /// Rewrite `L op R` into `L.op(R)` once the operator method is known.
    fn rewrite_binary(&mut self, expr: &mut Expression) {
        let resolved = {
            let binary = match *expr {
                Expression::Binary(ref binary) => binary,
                _ => return,
            };
            let node_ty = match binary.ty() {
                Some(ty) => ty,
                None => return,
            };
            let method_ty = match binary.method_ty() {
                Some(ty) => ty,
                None => return,
            };
            let left_ty = match binary.left().ty() {
                Some(ty) => ty,
                None => return,
            };
            if self.context.ty(node_ty).is_error()
                || self.context.ty(left_ty).is_error() {
                return;
            }
            let method_reified = self.finalize(method_ty);
            if self.context.ty(method_reified).is_error() {
                return;
            }
            let (_, stripped) = self.context.split_quals(left_ty);
            let scope = match self.member_scope_of(stripped) {
                Some(scope) => scope,
                None => return,
            };
            let name = binary.operator().name();
            let candidates = self.scopes.scope(scope).symbols(name).to_vec();
            let viable: Vec<SymbolId> = candidates.iter()
                .cloned()
                .filter(|&symbol| {
                    self.candidate_matches(method_reified, symbol)
                })
                .collect();
            match viable.first() {
                Some(&symbol) => (symbol, scope, method_reified, node_ty),
                None => return,
            }
        };
        let (symbol, scope, method_ty, node_ty) = resolved;

        let span = expr.span();
        let placeholder = Expression::Literal(
            Literal::new(LiteralValue::Bool(false), span));
        let owned = mem::replace(expr, placeholder);
        let binary = match owned {
            Expression::Binary(binary) => binary,
            _ => unreachable!("Checked binary expression above"),
        };
        let (left, operator, right) = binary.into_parts();
        debug!("Rewriting `{}` into a call on {:?}",
               operator.name(), symbol);

        let op_ident = Ident::new(operator.name(), span);
        op_ident.set_scope(scope);
        op_ident.set_ty(method_ty);
        op_ident.set_symbol(symbol);

        let select = SelectExpr::new(left, op_ident, span);
        let call = CallExpr::new(
            Box::new(Expression::Select(select)),
            vec![CallArg::positional(*right)],
            span);
        call.set_ty(node_ty);
        *expr = Expression::Call(call);
    }
}
