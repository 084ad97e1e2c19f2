//! Expression-level constraint generation.
//!
//! Walks function bodies and module statements leaves-before-parents,
//! giving every expression a fresh type variable (unless its type is
//! syntactically fixed) and emitting the constraints that tie the
//! variables together. Reading an identifier opens its symbol's type, so
//! each use of a generic function infers its own instantiation.

use rustc_hash::FxHashMap;

use ast::*;
use ast::visit::*;
use diag::{Diagnostic, DiagnosticKind};
use scope::{ScopeMap, SymbolId};
use sema::constraint::{Constraint, ConstraintAnchor, ConstraintCause};
use sema::item_constrainer::{synthesize_fun, synthesize_prop};
use sema::realizer::TypeRealizer;
use types::lifecycle;
use types::{BuiltinName, CompilerContext, QualSet, Ty, TypeId};

/// The expression pass.
#[derive(Debug)]
pub struct ExprConstrainer<'s, 'ctx> {
    scopes: &'s ScopeMap,
    context: &'ctx mut CompilerContext,
    /// Codomains of the enclosing functions, innermost last.
    codomains: Vec<TypeId>,
}

impl<'s, 'ctx> ExprConstrainer<'s, 'ctx> {
    pub fn new(scopes: &'s ScopeMap,
               context: &'ctx mut CompilerContext)
               -> ExprConstrainer<'s, 'ctx> {
        ExprConstrainer { scopes, context, codomains: Vec::new() }
    }

    pub fn run(&mut self, module: &Module) {
        trace!("Constraining bodies of {}", module.name());
        walk_module(self, module);
    }

    fn ty_of(&self, expr: &Expression) -> TypeId {
        expr.ty().unwrap_or_else(|| self.context.error())
    }

    fn symbol_ty(&mut self, symbol: SymbolId) -> TypeId {
        match self.scopes.symbol(symbol).ty() {
            Some(ty) => ty,
            None => {
                // Not typed yet; give the symbol a variable to agree on.
                let var = self.context.fresh_var();
                self.scopes.symbol(symbol).set_ty(var);
                var
            }
        }
    }

    /// The type an identifier reads as: the symbol's type with every
    /// in-scope placeholder replaced by a fresh variable.
    fn opened_symbol_ty(&mut self, symbol: SymbolId) -> TypeId {
        let ty = self.symbol_ty(symbol);
        let mut bindings = FxHashMap::default();
        lifecycle::open(self.context, ty, &mut bindings)
    }

    /// The codomain a function's body must return.
    fn body_codomain(&mut self, fun: &FunDecl) -> TypeId {
        let nothing = self.context.builtin(BuiltinName::Nothing);
        let ty = match fun.ty() {
            Some(ty) => ty,
            None => return nothing,
        };
        match fun.kind() {
            // Constructor bodies initialize Self; they return no value.
            FunKind::Constructor | FunKind::Destructor => nothing,
            FunKind::Regular => match *self.context.ty(ty) {
                Ty::Function(ref fun_ty) => fun_ty.codomain,
                _ => nothing,
            },
            FunKind::Method => {
                // Dig through the Self currying.
                let inner = match *self.context.ty(ty) {
                    Ty::Function(ref outer) => outer.codomain,
                    _ => return nothing,
                };
                match *self.context.ty(inner) {
                    Ty::Function(ref inner_ty) => inner_ty.codomain,
                    _ => nothing,
                }
            }
        }
    }
}

impl<'s, 'ctx> ModuleVisitor for ExprConstrainer<'s, 'ctx> {
    fn visit_module(&mut self, module: &Module) {
        walk_module(self, module);
    }
}

impl<'s, 'ctx> DeclVisitor for ExprConstrainer<'s, 'ctx> {
    fn visit_prop_decl(&mut self, prop: &PropDecl) {
        trace!("Visiting property {}", prop.name());
        if prop.ty().is_none() {
            // A local declaration the item pass never saw.
            synthesize_prop(self.scopes, self.context, prop);
        }
        let prop_ty = match prop.ty() {
            Some(ty) => ty,
            None => return,
        };
        if let Some((op, value)) = prop.initializer() {
            self.visit_expression(value);
            let cause = ConstraintCause::new(
                value.span(), ConstraintAnchor::Initializer);
            let value_ty = self.ty_of(value);
            self.context.add_constraint(
                Constraint::conformance(value_ty, prop_ty, Some(op), cause));
        }
    }

    fn visit_fun_decl(&mut self, fun: &FunDecl) {
        trace!("Visiting fn {}", fun.name());
        if fun.ty().is_none() {
            // A function declared in a body.
            synthesize_fun(self.scopes, self.context, fun, None);
        }
        for param in fun.params() {
            if let Some(default) = param.default() {
                self.visit_expression(default);
                let param_ty = param.ty()
                    .unwrap_or_else(|| self.context.error());
                let cause = ConstraintCause::new(
                    default.span(), ConstraintAnchor::Initializer);
                let default_ty = self.ty_of(default);
                self.context.add_constraint(Constraint::conformance(
                    default_ty, param_ty, None, cause));
            }
        }
        let codomain = self.body_codomain(fun);
        self.codomains.push(codomain);
        if let Some(body) = fun.body() {
            self.visit_block(body);
        }
        self.codomains.pop();
    }

    fn visit_nominal_decl(&mut self, nominal: &NominalDecl) {
        trace!("Visiting members of {}", nominal.name());
        walk_nominal_decl(self, nominal);
    }
}

impl<'s, 'ctx> StmtVisitor for ExprConstrainer<'s, 'ctx> {
    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_binding_stmt(&mut self, binding: &BindingStmt) {
        trace!("Visiting {} binding", binding.operator().token());
        self.visit_expression(binding.lvalue());
        self.visit_expression(binding.rvalue());
        let cause = ConstraintCause::new(
            binding.rvalue().span(), ConstraintAnchor::Rvalue);
        let rvalue_ty = self.ty_of(binding.rvalue());
        let lvalue_ty = self.ty_of(binding.lvalue());
        self.context.add_constraint(Constraint::conformance(
            rvalue_ty, lvalue_ty, Some(binding.operator()), cause));
    }

    fn visit_return_stmt(&mut self, return_: &ReturnStmt) {
        trace!("Visiting return");
        let codomain = match self.codomains.last() {
            Some(&codomain) => codomain,
            None => {
                debug!("Skipping return outside of a function");
                return;
            }
        };
        let cause = ConstraintCause::new(
            return_.span(), ConstraintAnchor::Return);
        match return_.value() {
            Some(value) => {
                self.visit_expression(value);
                let value_ty = self.ty_of(value);
                self.context.add_constraint(
                    Constraint::equality(value_ty, codomain, cause));
            }
            None => {
                // A bare return requires a value-less codomain.
                let nothing = self.context.builtin(BuiltinName::Nothing);
                self.context.add_constraint(
                    Constraint::equality(nothing, codomain, cause));
            }
        }
    }
}

impl<'s, 'ctx> ExprVisitor for ExprConstrainer<'s, 'ctx> {
    fn visit_literal_expr(&mut self, literal: &Literal) {
        trace!("Visiting literal {:?}", literal.value());
        let builtin = match *literal.value() {
            LiteralValue::Bool(_) => BuiltinName::Bool,
            LiteralValue::Int(_) => BuiltinName::Int,
            LiteralValue::Float(_) => BuiltinName::Float,
            LiteralValue::String(_) => BuiltinName::String,
        };
        let base = self.context.builtin(builtin);
        let ty = self.context.qualified(QualSet::literal(), base);
        literal.set_ty(ty);
    }

    fn visit_ident_expr(&mut self, ident: &Ident) {
        trace!("Visiting reference to {}", ident.name());
        let var = self.context.fresh_var();
        ident.set_ty(var);

        let scope = match ident.scope() {
            Some(scope) => scope,
            None => {
                debug!("Skipping unbound identifier {}", ident.name());
                ident.set_ty(self.context.error());
                return;
            }
        };
        let cause = ConstraintCause::new(
            ident.span(), ConstraintAnchor::Identifier);

        if !ident.specializations().is_empty() {
            // An explicitly specialized type in value position, e.g. the
            // callee `Box<Int>(value := 0)`.
            let realizer = TypeRealizer::new(self.scopes);
            let inner = realizer.realize_named(self.context, ident);
            ident.set_ty(var);
            let meta = self.context.metatype(inner);
            let mut bindings = FxHashMap::default();
            let opened = lifecycle::open(self.context, meta, &mut bindings);
            self.context.add_constraint(
                Constraint::equality(var, opened, cause));
            return;
        }

        let symbols = self.scopes.lookup_all(scope, ident.name());
        match symbols.len() {
            0 => {
                self.context.report(Diagnostic::error(
                    DiagnosticKind::UndefinedSymbol,
                    ident.span(),
                    format!("undefined symbol `{}`", ident.name())));
                ident.set_ty(self.context.error());
            }
            1 => {
                let opened = self.opened_symbol_ty(symbols[0]);
                self.context.add_constraint(
                    Constraint::equality(var, opened, cause));
            }
            _ => {
                let branches = symbols.iter()
                    .map(|&symbol| {
                        let opened = self.opened_symbol_ty(symbol);
                        Constraint::equality(var, opened, cause)
                    })
                    .collect();
                self.context.add_constraint(
                    Constraint::disjunction(branches, cause));
            }
        }
    }

    fn visit_binary_expr(&mut self, binary: &BinaryExpr) {
        trace!("Visiting binary {}", binary.operator().name());
        walk_binary_expr(self, binary);

        // `L op R` types as an invocation of L's operator method.
        let result = self.context.fresh_var();
        let operand = self.context.fresh_var();
        let method = self.context.function_type(
            vec![(None, operand)], result, vec![]);
        binary.set_ty(result);
        binary.set_method_ty(method);

        let cause = ConstraintCause::new(
            binary.span(), ConstraintAnchor::BinaryOperator);
        let right_ty = self.ty_of(binary.right());
        self.context.add_constraint(
            Constraint::conformance(right_ty, operand, None, cause));
        let left_ty = self.ty_of(binary.left());
        self.context.add_constraint(Constraint::member(
            left_ty, binary.operator().name(), method, cause));
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        trace!("Visiting call");
        walk_call_expr(self, call);

        // Mirror the argument labels with fresh parameter types; the callee
        // must either be a function of that shape or a type constructible
        // with it.
        let mut params = Vec::with_capacity(call.args().len());
        for arg in call.args() {
            let param = self.context.fresh_var();
            params.push((arg.label().map(String::from), param));
        }
        let codomain = self.context.fresh_var();
        let fun = self.context.function_type(
            params.clone(), codomain, vec![]);
        call.set_ty(codomain);

        for (index, (arg, &(_, param))) in
            call.args().iter().zip(params.iter()).enumerate() {
            let cause = ConstraintCause::new(
                arg.span(), ConstraintAnchor::CallArgument(index));
            let arg_ty = self.ty_of(arg.value());
            self.context.add_constraint(
                Constraint::conformance(arg_ty, param, None, cause));
        }

        let cause = ConstraintCause::new(
            call.callee().span(), ConstraintAnchor::Identifier);
        let callee_ty = self.ty_of(call.callee());
        self.context.add_constraint(Constraint::disjunction(vec![
            Constraint::equality(callee_ty, fun, cause),
            Constraint::construction(callee_ty, fun, cause),
        ], cause));
    }

    fn visit_select_expr(&mut self, select: &SelectExpr) {
        trace!("Visiting select of {}", select.ownee().name());
        walk_select_expr(self, select);

        let var = self.context.fresh_var();
        select.set_ty(var);
        let cause = ConstraintCause::new(
            select.span(), ConstraintAnchor::Select);
        let owner_ty = match select.owner() {
            Some(owner) => self.ty_of(owner),
            // `.case` style access: the owner is the metatype of whatever
            // this expression turns out to be.
            None => self.context.metatype(var),
        };
        self.context.add_constraint(Constraint::member(
            owner_ty, select.ownee().name(), var, cause));
    }

    fn visit_subscript_expr(&mut self, subscript: &SubscriptExpr) {
        trace!("Visiting subscript");
        walk_subscript_expr(self, subscript);

        let mut params = Vec::with_capacity(subscript.args().len());
        for arg in subscript.args() {
            let param = self.context.fresh_var();
            params.push((arg.label().map(String::from), param));
        }
        let codomain = self.context.fresh_var();
        let fun = self.context.function_type(
            params.clone(), codomain, vec![]);
        subscript.set_ty(codomain);

        for (index, (arg, &(_, param))) in
            subscript.args().iter().zip(params.iter()).enumerate() {
            let cause = ConstraintCause::new(
                arg.span(), ConstraintAnchor::CallArgument(index));
            let arg_ty = self.ty_of(arg.value());
            self.context.add_constraint(
                Constraint::conformance(arg_ty, param, None, cause));
        }

        let cause = ConstraintCause::new(
            subscript.span(), ConstraintAnchor::Select);
        let callee_ty = self.ty_of(subscript.callee());
        self.context.add_constraint(
            Constraint::member(callee_ty, "[]", fun, cause));
    }

    fn visit_lambda_expr(&mut self, lambda: &LambdaExpr) {
        trace!("Visiting lambda");
        let realizer = TypeRealizer::new(self.scopes);
        let mut params = Vec::with_capacity(lambda.params().len());
        for param in lambda.params() {
            let ty = match param.annotation() {
                Some(annotation) => {
                    realizer.realize(self.context, annotation)
                }
                None => self.context.fresh_var(),
            };
            param.set_ty(ty);
            param.ident().set_ty(ty);
            if let Some(symbol) = param.ident().symbol() {
                self.scopes.symbol(symbol).set_ty(ty);
            }
            params.push((param.label().map(String::from), ty));
        }
        let codomain = match lambda.codomain() {
            Some(annotation) => realizer.realize(self.context, annotation),
            None => self.context.fresh_var(),
        };
        let ty = self.context.function_type(params, codomain, vec![]);
        lambda.set_ty(ty);

        self.codomains.push(codomain);
        self.visit_block(lambda.body());
        self.codomains.pop();
    }

    fn visit_if_expr(&mut self, if_expr: &IfExpr) {
        trace!("Visiting if expression");
        self.visit_expression(if_expr.condition());
        let bool_ = self.context.builtin(BuiltinName::Bool);
        let cause = ConstraintCause::new(
            if_expr.condition().span(), ConstraintAnchor::Condition);
        let condition_ty = self.ty_of(if_expr.condition());
        self.context.add_constraint(
            Constraint::equality(condition_ty, bool_, cause));

        self.visit_expression(if_expr.then_branch());
        match if_expr.else_branch() {
            Some(else_branch) => {
                self.visit_expression(else_branch);
                let var = self.context.fresh_var();
                if_expr.set_ty(var);
                let then_ty = self.ty_of(if_expr.then_branch());
                let else_ty = self.ty_of(else_branch);
                let then_cause = ConstraintCause::new(
                    if_expr.then_branch().span(), ConstraintAnchor::Rvalue);
                self.context.add_constraint(
                    Constraint::equality(var, then_ty, then_cause));
                let else_cause = ConstraintCause::new(
                    else_branch.span(), ConstraintAnchor::Rvalue);
                self.context.add_constraint(
                    Constraint::equality(then_ty, else_ty, else_cause));
            }
            None => {
                // One-armed ifs have no value.
                let nothing = self.context.builtin(BuiltinName::Nothing);
                if_expr.set_ty(nothing);
            }
        }
    }
}
