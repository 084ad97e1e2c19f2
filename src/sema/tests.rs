//! End-to-end checks over hand-built modules.
//!
//! The parser and name binder run upstream of this crate, so these tests
//! construct their ASTs directly and wire up scopes with a small test
//! binder that follows the same contract: every identifier gets a scope,
//! and declaration identifiers arrive with their symbol pre-bound.

use ast::*;
use diag::{DiagnosticKind, UnsolvableCause};
use scope::{ScopeId, ScopeMap, SymbolId};
use sema;
use sema::constraint::{Constraint, ConstraintAnchor, ConstraintCause};
use sema::solver::ConstraintSolver;
use span::Span;
use types::{BuiltinName, CompilerContext, NominalKind, QualSet, Ty};

fn sp() -> Span {
    Span::default()
}

fn id(name: &str) -> Ident {
    Ident::new(name, sp())
}

fn var(name: &str) -> Expression {
    Expression::Ident(id(name))
}

fn int(value: i64) -> Expression {
    Expression::Literal(Literal::new(LiteralValue::Int(value), sp()))
}

fn boolean(value: bool) -> Expression {
    Expression::Literal(Literal::new(LiteralValue::Bool(value), sp()))
}

fn string(value: &str) -> Expression {
    Expression::Literal(
        Literal::new(LiteralValue::String(value.into()), sp()))
}

fn ann(name: &str) -> TypeAnnotation {
    TypeAnnotation::bare(TypeSign::Named(id(name)), sp())
}

fn let_(name: &str,
        annotation: Option<TypeAnnotation>,
        value: Expression)
        -> Stmt {
    Stmt::Decl(Decl::Prop(PropDecl::new(
        id(name), annotation,
        Some((BindingOperator::Copy, value)), sp())))
}

fn call(callee: Expression, args: Vec<(&str, Expression)>) -> Expression {
    let args = args.into_iter()
        .map(|(label, value)| CallArg::new(label, value))
        .collect();
    Expression::Call(CallExpr::new(Box::new(callee), args, sp()))
}

fn binary(left: Expression,
          operator: BinaryOperator,
          right: Expression)
          -> Expression {
    Expression::Binary(
        BinaryExpr::new(Box::new(left), operator, Box::new(right)))
}

fn ret(value: Expression) -> Stmt {
    Stmt::Return(ReturnStmt::new(Some(value), sp()))
}

fn fun_decl(kind: FunKind,
            name: &str,
            placeholders: &[&str],
            params: &[(&str, &str)],
            codomain: Option<&str>,
            body: Vec<Stmt>)
            -> FunDecl {
    FunDecl::new(
        kind,
        id(name),
        placeholders.iter().map(|&p| id(p)).collect(),
        params.iter()
            .map(|&(p, a)| ParamDecl::named(id(p), Some(ann(a))))
            .collect(),
        codomain.map(ann),
        Some(Block::new(body, sp())),
        sp())
}

fn fun(name: &str,
       placeholders: &[&str],
       params: &[(&str, &str)],
       codomain: Option<&str>,
       body: Vec<Stmt>)
       -> Stmt {
    Stmt::Decl(Decl::Fun(
        fun_decl(FunKind::Regular, name, placeholders, params,
                 codomain, body)))
}

/// Stand-in for the upstream name binder.
struct TestBinder<'s> {
    scopes: &'s mut ScopeMap,
}

impl<'s> TestBinder<'s> {
    fn bind(scopes: &'s mut ScopeMap, module: &Module) -> ScopeId {
        let root = scopes.root();
        let module_scope = scopes.push_scope(root);
        let mut binder = TestBinder { scopes };
        for stmt in module.stmts() {
            if let Stmt::Decl(ref decl) = *stmt {
                binder.declare(module_scope, decl);
            }
        }
        for stmt in module.stmts() {
            binder.bind_stmt(module_scope, stmt);
        }
        module_scope
    }

    fn declare(&mut self, scope: ScopeId, decl: &Decl) {
        match *decl {
            Decl::Prop(ref prop) => {
                let symbol = self.scopes
                    .define(scope, prop.name(), false, false)
                    .expect("Duplicate property in test module");
                prop.ident().set_scope(scope);
                prop.ident().set_symbol(symbol);
            }
            Decl::Fun(ref fun) => self.declare_fun(scope, fun),
            Decl::Nominal(ref nominal) => {
                let symbol = self.scopes
                    .define(scope, nominal.name(), false, false)
                    .expect("Duplicate nominal in test module");
                nominal.ident().set_scope(scope);
                nominal.ident().set_symbol(symbol);
                let members = self.scopes.push_scope(scope);
                nominal.set_scope(members);
                for placeholder in nominal.placeholders() {
                    let symbol = self.scopes
                        .define(members, placeholder.name(), false, false)
                        .expect("Duplicate placeholder in test module");
                    placeholder.set_scope(members);
                    placeholder.set_symbol(symbol);
                }
                for member in nominal.members() {
                    match *member {
                        Decl::Fun(ref fun) => self.declare_fun(members, fun),
                        ref other => self.declare(members, other),
                    }
                }
            }
        }
    }

    fn declare_fun(&mut self, scope: ScopeId, fun: &FunDecl) {
        let method = fun.kind() == FunKind::Method;
        let symbol = self.scopes
            .define(scope, fun.name(), true, method)
            .expect("Function declarations are overloadable");
        fun.ident().set_scope(scope);
        fun.ident().set_symbol(symbol);

        let inner = self.scopes.push_scope(scope);
        for placeholder in fun.placeholders() {
            let symbol = self.scopes
                .define(inner, placeholder.name(), false, false)
                .expect("Duplicate placeholder in test module");
            placeholder.set_scope(inner);
            placeholder.set_symbol(symbol);
        }
        for param in fun.params() {
            let symbol = self.scopes
                .define(inner, param.name(), false, false)
                .expect("Duplicate parameter in test module");
            param.ident().set_scope(inner);
            param.ident().set_symbol(symbol);
            if let Some(annotation) = param.annotation() {
                self.bind_annotation(inner, annotation);
            }
        }
        if let Some(annotation) = fun.codomain() {
            self.bind_annotation(inner, annotation);
        }
        if let Some(body) = fun.body() {
            body.set_scope(inner);
        }
    }

    fn bind_annotation(&mut self, scope: ScopeId, annotation: &TypeAnnotation) {
        match *annotation.sign() {
            TypeSign::Named(ref ident) => {
                ident.set_scope(scope);
                for &(_, ref argument) in ident.specializations() {
                    self.bind_annotation(scope, argument);
                }
            }
            TypeSign::Function(ref sign) => {
                for &(_, ref param) in sign.params() {
                    self.bind_annotation(scope, param);
                }
                self.bind_annotation(scope, sign.codomain());
            }
        }
    }

    fn bind_stmt(&mut self, scope: ScopeId, stmt: &Stmt) {
        match *stmt {
            Stmt::Decl(ref decl) => self.bind_decl(scope, decl),
            Stmt::Expression(ref expr) => self.bind_expr(scope, expr),
            Stmt::Binding(ref binding) => {
                self.bind_expr(scope, binding.lvalue());
                self.bind_expr(scope, binding.rvalue());
            }
            Stmt::Return(ref return_) => {
                if let Some(value) = return_.value() {
                    self.bind_expr(scope, value);
                }
            }
        }
    }

    fn bind_decl(&mut self, scope: ScopeId, decl: &Decl) {
        match *decl {
            Decl::Prop(ref prop) => {
                if prop.ident().symbol().is_none() {
                    // A body-local declaration seen in statement order.
                    let symbol = self.scopes
                        .define(scope, prop.name(), false, false)
                        .expect("Duplicate local in test module");
                    prop.ident().set_scope(scope);
                    prop.ident().set_symbol(symbol);
                }
                if let Some(annotation) = prop.annotation() {
                    self.bind_annotation(scope, annotation);
                }
                if let Some((_, value)) = prop.initializer() {
                    self.bind_expr(scope, value);
                }
            }
            Decl::Fun(ref fun) => {
                if let Some(body) = fun.body() {
                    let inner = body.scope()
                        .expect("Function scope was set at declaration");
                    for stmt in body.stmts() {
                        self.bind_stmt(inner, stmt);
                    }
                }
            }
            Decl::Nominal(ref nominal) => {
                let members = nominal.scope()
                    .expect("Member scope was set at declaration");
                for member in nominal.members() {
                    self.bind_decl(members, member);
                }
            }
        }
    }

    fn bind_expr(&mut self, scope: ScopeId, expr: &Expression) {
        match *expr {
            Expression::Literal(_) => {}
            Expression::Ident(ref ident) => {
                ident.set_scope(scope);
                for &(_, ref argument) in ident.specializations() {
                    self.bind_annotation(scope, argument);
                }
            }
            Expression::Binary(ref binary) => {
                self.bind_expr(scope, binary.left());
                self.bind_expr(scope, binary.right());
            }
            Expression::Call(ref call) => {
                self.bind_expr(scope, call.callee());
                for arg in call.args() {
                    self.bind_expr(scope, arg.value());
                }
            }
            Expression::Select(ref select) => {
                if let Some(owner) = select.owner() {
                    self.bind_expr(scope, owner);
                }
            }
            Expression::Subscript(ref subscript) => {
                self.bind_expr(scope, subscript.callee());
                for arg in subscript.args() {
                    self.bind_expr(scope, arg.value());
                }
            }
            Expression::Lambda(ref lambda) => {
                let inner = self.scopes.push_scope(scope);
                for param in lambda.params() {
                    let symbol = self.scopes
                        .define(inner, param.name(), false, false)
                        .expect("Duplicate parameter in test module");
                    param.ident().set_scope(inner);
                    param.ident().set_symbol(symbol);
                    if let Some(annotation) = param.annotation() {
                        self.bind_annotation(inner, annotation);
                    }
                }
                if let Some(codomain) = lambda.codomain() {
                    self.bind_annotation(inner, codomain);
                }
                lambda.body().set_scope(inner);
                for stmt in lambda.body().stmts() {
                    self.bind_stmt(inner, stmt);
                }
            }
            Expression::If(ref if_expr) => {
                self.bind_expr(scope, if_expr.condition());
                self.bind_expr(scope, if_expr.then_branch());
                if let Some(else_branch) = if_expr.else_branch() {
                    self.bind_expr(scope, else_branch);
                }
            }
        }
    }
}

fn check(module: &mut Module) -> (CompilerContext, ScopeMap, Result<(), ()>) {
    let _ = ::env_logger::try_init();
    let mut context = CompilerContext::new();
    let mut scopes = ScopeMap::with_builtins(&mut context);
    TestBinder::bind(&mut scopes, module);
    let result = sema::type_check(module, &scopes, &mut context);
    (context, scopes, result)
}

fn prop_at<'m>(module: &'m Module, index: usize) -> &'m PropDecl {
    match module.stmts()[index] {
        Stmt::Decl(Decl::Prop(ref prop)) => prop,
        ref other => panic!("Expected a property, got {:?}", other),
    }
}

fn initializer_of<'m>(prop: &'m PropDecl) -> &'m Expression {
    prop.initializer()
        .expect("Property was built with an initializer")
        .1
}

fn callee_symbol(prop: &PropDecl) -> SymbolId {
    match *initializer_of(prop) {
        Expression::Call(ref call) => match *call.callee() {
            Expression::Ident(ref ident) => ident.symbol()
                .expect("Callee was not dispatched"),
            ref other => panic!("Expected an ident callee, got {:?}", other),
        },
        ref other => panic!("Expected a call initializer, got {:?}", other),
    }
}

fn fun_symbol_at(module: &Module, index: usize) -> SymbolId {
    match module.stmts()[index] {
        Stmt::Decl(Decl::Fun(ref fun)) => fun.ident().symbol()
            .expect("Function declaration was not bound"),
        ref other => panic!("Expected a function, got {:?}", other),
    }
}

#[test]
fn overloaded_monomorphic_dispatch() {
    let mut module = Module::new("overloads", vec![
        fun("mono", &[], &[("x", "Int")], Some("Int"), vec![ret(var("x"))]),
        fun("mono", &[], &[("x", "Bool")], Some("Bool"), vec![ret(var("x"))]),
        let_("a", None, call(var("mono"), vec![("x", int(0))])),
        let_("b", None, call(var("mono"), vec![("x", boolean(true))])),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Ok(()), "{:?}", context.errors.diagnostics());

    let int_ty = context.builtin(BuiltinName::Int);
    let bool_ty = context.builtin(BuiltinName::Bool);
    assert_eq!(prop_at(&module, 2).ty(), Some(int_ty));
    assert_eq!(prop_at(&module, 3).ty(), Some(bool_ty));

    assert_eq!(callee_symbol(prop_at(&module, 2)), fun_symbol_at(&module, 0));
    assert_eq!(callee_symbol(prop_at(&module, 3)), fun_symbol_at(&module, 1));
}

#[test]
fn polymorphic_instantiation_per_use() {
    let mut module = Module::new("poly", vec![
        fun("poly", &["T"], &[("x", "T")], Some("T"), vec![ret(var("x"))]),
        let_("a", None, call(var("poly"), vec![("x", int(0))])),
        let_("b", None, call(var("poly"), vec![
            ("x", call(var("poly"), vec![("x", boolean(true))])),
        ])),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Ok(()), "{:?}", context.errors.diagnostics());

    assert_eq!(prop_at(&module, 1).ty(),
               Some(context.builtin(BuiltinName::Int)));
    assert_eq!(prop_at(&module, 2).ty(),
               Some(context.builtin(BuiltinName::Bool)));
    assert_eq!(callee_symbol(prop_at(&module, 1)), fun_symbol_at(&module, 0));
}

#[test]
fn linear_inference_over_two_placeholders() {
    let mut module = Module::new("linear", vec![
        fun("first", &["T", "U"], &[("x", "T"), ("y", "U")], Some("T"),
            vec![ret(var("x"))]),
        let_("a", None, call(var("first"), vec![
            ("x", int(0)), ("y", boolean(true)),
        ])),
        let_("b", None, call(var("first"), vec![
            ("x", boolean(true)), ("y", int(0)),
        ])),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Ok(()), "{:?}", context.errors.diagnostics());

    assert_eq!(prop_at(&module, 1).ty(),
               Some(context.builtin(BuiltinName::Int)));
    assert_eq!(prop_at(&module, 2).ty(),
               Some(context.builtin(BuiltinName::Bool)));
}

fn box_struct() -> Stmt {
    Stmt::Decl(Decl::Nominal(NominalDecl::new(
        NominalKind::Struct,
        id("Box"),
        vec![id("T")],
        vec![Decl::Fun(fun_decl(
            FunKind::Constructor, "new", &[], &[("value", "T")],
            None, vec![]))],
        sp())))
}

fn nominal_at<'m>(module: &'m Module, index: usize) -> &'m NominalDecl {
    match module.stmts()[index] {
        Stmt::Decl(Decl::Nominal(ref nominal)) => nominal,
        ref other => panic!("Expected a nominal, got {:?}", other),
    }
}

#[test]
fn generic_constructor_binds_placeholders() {
    let mut module = Module::new("boxes", vec![
        box_struct(),
        let_("b", None, call(var("Box"), vec![("value", int(0))])),
        let_("s", None, call(var("Box"), vec![("value", string("hi"))])),
    ]);
    let (mut context, _, result) = check(&mut module);
    assert_eq!(result, Ok(()), "{:?}", context.errors.diagnostics());

    let nominal = nominal_at(&module, 0);
    let box_symbol = nominal.ident().symbol()
        .expect("Nominal declaration was not bound");
    let box_ty = match nominal.ty().map(|ty| context.ty(ty).clone()) {
        Some(Ty::Metatype(inner)) => inner,
        ref other => panic!("Expected a metatype, got {:?}", other),
    };
    let t = context.placeholder("T", box_symbol);
    let int_ty = context.builtin(BuiltinName::Int);
    let string_ty = context.builtin(BuiltinName::String);

    let boxed_int = context.bound_generic(box_ty, vec![(t, int_ty)]);
    let boxed_string = context.bound_generic(box_ty, vec![(t, string_ty)]);
    assert_eq!(prop_at(&module, 1).ty(), Some(boxed_int));
    assert_eq!(prop_at(&module, 2).ty(), Some(boxed_string));
}

#[test]
fn binary_operators_rewrite_to_method_calls() {
    let mut module = Module::new("operators", vec![
        let_("a", None, binary(int(1), BinaryOperator::Addition, int(2))),
        let_("s", None,
             binary(string("a"), BinaryOperator::Addition, string("b"))),
    ]);
    let (context, scopes, result) = check(&mut module);
    assert_eq!(result, Ok(()), "{:?}", context.errors.diagnostics());

    let int_ty = context.builtin(BuiltinName::Int);
    let string_ty = context.builtin(BuiltinName::String);
    assert_eq!(prop_at(&module, 0).ty(), Some(int_ty));
    assert_eq!(prop_at(&module, 1).ty(), Some(string_ty));

    // Both initializers were rewritten into `left.+(right)` form.
    for (index, operand_ty) in [(0, int_ty), (1, string_ty)].iter() {
        let call = match *initializer_of(prop_at(&module, *index)) {
            Expression::Call(ref call) => call,
            ref other => panic!("Binary was not rewritten, got {:?}", other),
        };
        let select = match *call.callee() {
            Expression::Select(ref select) => select,
            ref other => panic!("Expected a select callee, got {:?}", other),
        };
        assert_eq!(select.ownee().name(), "+");
        let member_scope = match *context.ty(*operand_ty) {
            Ty::Builtin { scope, .. } => scope,
            ref other => panic!("Builtin interned as {:?}", other),
        };
        let expected = scopes.scope(member_scope).symbols("+")[0];
        assert_eq!(select.ownee().symbol(), Some(expected));
    }
}

#[test]
fn ill_typed_binding_reports_and_recovers() {
    let mut module = Module::new("mismatch", vec![
        let_("x", Some(ann("Int")), boolean(true)),
        let_("y", None, int(1)),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Err(()));
    assert!(context.errors.has_kind(
        DiagnosticKind::UnsolvableConstraint(UnsolvableCause::Mismatch)));
    // The annotated type survives the failed initializer.
    assert_eq!(prop_at(&module, 0).ty(),
               Some(context.builtin(BuiltinName::Int)));
    // Later statements still check.
    assert_eq!(prop_at(&module, 1).ty(),
               Some(context.builtin(BuiltinName::Int)));
}

#[test]
fn undefined_symbol_reports_and_continues() {
    let mut module = Module::new("undefined", vec![
        let_("x", None, var("nowhere")),
        let_("y", None, int(1)),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Err(()));
    assert!(context.errors.has_kind(DiagnosticKind::UndefinedSymbol));
    assert_eq!(prop_at(&module, 0).ty(), Some(context.error()));
    assert_eq!(prop_at(&module, 1).ty(),
               Some(context.builtin(BuiltinName::Int)));
}

#[test]
fn lambda_infers_codomain_from_return() {
    let lambda = Expression::Lambda(LambdaExpr::new(
        vec![ParamDecl::named(id("x"), Some(ann("Int")))],
        None,
        Block::new(vec![ret(var("x"))], sp()),
        sp()));
    let mut module = Module::new("lambdas", vec![
        let_("f", None, lambda),
    ]);
    let (mut context, _, result) = check(&mut module);
    assert_eq!(result, Ok(()), "{:?}", context.errors.diagnostics());

    let int_ty = context.builtin(BuiltinName::Int);
    let expected = context.function_type(
        vec![(Some("x".into()), int_ty)], int_ty, vec![]);
    assert_eq!(prop_at(&module, 0).ty(), Some(expected));
}

#[test]
fn if_expression_joins_its_branches() {
    let mut module = Module::new("ifs", vec![
        let_("c", None, Expression::If(IfExpr::new(
            Box::new(boolean(true)),
            Box::new(int(1)),
            Some(Box::new(int(2))),
            sp()))),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Ok(()), "{:?}", context.errors.diagnostics());
    assert_eq!(prop_at(&module, 0).ty(),
               Some(context.builtin(BuiltinName::Int)));
}

#[test]
fn one_armed_if_has_no_value() {
    let mut module = Module::new("ifs", vec![
        let_("c", None, Expression::If(IfExpr::new(
            Box::new(boolean(true)),
            Box::new(int(1)),
            None,
            sp()))),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Ok(()), "{:?}", context.errors.diagnostics());
    assert_eq!(prop_at(&module, 0).ty(),
               Some(context.builtin(BuiltinName::Nothing)));
}

#[test]
fn dispatch_ambiguity_is_diagnosed_not_asserted() {
    let mut module = Module::new("ambiguous", vec![
        fun("dup", &[], &[("x", "Int")], Some("Int"), vec![ret(var("x"))]),
        fun("dup", &[], &[("x", "Int")], Some("Int"), vec![ret(var("x"))]),
        let_("a", None, call(var("dup"), vec![("x", int(0))])),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Err(()));
    assert!(context.errors.has_kind(
        DiagnosticKind::UnsolvableConstraint(UnsolvableCause::Ambiguous)));
    // Downstream passes still get a symbol: the first viable candidate.
    assert_eq!(callee_symbol(prop_at(&module, 2)), fun_symbol_at(&module, 0));
}

#[test]
fn specializing_a_non_generic_type_is_an_error() {
    let annotation = TypeAnnotation::bare(
        TypeSign::Named(Ident::with_specializations(
            "Int", sp(), vec![("T".into(), ann("Bool"))])),
        sp());
    let mut module = Module::new("misuse", vec![
        Stmt::Decl(Decl::Prop(PropDecl::new(
            id("x"), Some(annotation), None, sp()))),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Err(()));
    assert!(context.errors.has_kind(DiagnosticKind::NonGenericType));
}

#[test]
fn superfluous_specialization_is_an_error() {
    let annotation = TypeAnnotation::bare(
        TypeSign::Named(Ident::with_specializations(
            "Box", sp(), vec![("U".into(), ann("Int"))])),
        sp());
    let mut module = Module::new("misuse", vec![
        box_struct(),
        Stmt::Decl(Decl::Prop(PropDecl::new(
            id("x"), Some(annotation), None, sp()))),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Err(()));
    assert!(context.errors.has_kind(
        DiagnosticKind::SuperfluousSpecialization));
}

#[test]
fn explicit_specialization_drives_construction() {
    let callee = Expression::Ident(Ident::with_specializations(
        "Box", sp(), vec![("T".into(), ann("Int"))]));
    let mut module = Module::new("boxes", vec![
        box_struct(),
        let_("b", None, call(callee, vec![("value", int(0))])),
    ]);
    let (mut context, _, result) = check(&mut module);
    assert_eq!(result, Ok(()), "{:?}", context.errors.diagnostics());

    let nominal = nominal_at(&module, 0);
    let box_symbol = nominal.ident().symbol()
        .expect("Nominal declaration was not bound");
    let box_ty = match nominal.ty().map(|ty| context.ty(ty).clone()) {
        Some(Ty::Metatype(inner)) => inner,
        ref other => panic!("Expected a metatype, got {:?}", other),
    };
    let t = context.placeholder("T", box_symbol);
    let int_ty = context.builtin(BuiltinName::Int);
    let expected = context.bound_generic(box_ty, vec![(t, int_ty)]);
    assert_eq!(prop_at(&module, 1).ty(), Some(expected));
}

#[test]
fn move_binding_requires_value_semantics() {
    // `x <- rvalue` where the rvalue has reference semantics must fail.
    let mut context = CompilerContext::new();
    let scopes = ScopeMap::with_builtins(&mut context);
    let int_ty = context.builtin(BuiltinName::Int);
    let reference = context.qualified(
        QualSet::CST | QualSet::STK | QualSet::REF, int_ty);
    let value = context.qualified(QualSet::literal(), int_ty);
    let cause = ConstraintCause::new(sp(), ConstraintAnchor::Rvalue);

    let constraints = vec![Constraint::conformance(
        reference, value, Some(BindingOperator::Move), cause)];
    ConstraintSolver::new(&scopes, constraints).solve(&mut context);
    assert!(context.errors.has_kind(
        DiagnosticKind::UnsolvableConstraint(UnsolvableCause::Mismatch)));
}

#[test]
fn ref_binding_rejects_a_value_lvalue() {
    let mut context = CompilerContext::new();
    let scopes = ScopeMap::with_builtins(&mut context);
    let int_ty = context.builtin(BuiltinName::Int);
    let value_lvalue = context.qualified(QualSet::literal(), int_ty);
    let cause = ConstraintCause::new(sp(), ConstraintAnchor::Rvalue);

    let rejected = vec![Constraint::conformance(
        int_ty, value_lvalue, Some(BindingOperator::Ref), cause)];
    ConstraintSolver::new(&scopes, rejected).solve(&mut context);
    assert!(context.errors.has_errors());
}

#[test]
fn ref_binding_accepts_a_ref_lvalue() {
    let mut context = CompilerContext::new();
    let scopes = ScopeMap::with_builtins(&mut context);
    let int_ty = context.builtin(BuiltinName::Int);
    let ref_lvalue = context.qualified(
        QualSet::MUT | QualSet::STK | QualSet::REF, int_ty);
    let cause = ConstraintCause::new(sp(), ConstraintAnchor::Rvalue);

    let accepted = vec![Constraint::conformance(
        int_ty, ref_lvalue, Some(BindingOperator::Ref), cause)];
    ConstraintSolver::new(&scopes, accepted).solve(&mut context);
    assert!(!context.errors.has_errors());
}

#[test]
fn everything_conforms_to_anything() {
    let mut context = CompilerContext::new();
    let scopes = ScopeMap::with_builtins(&mut context);
    let int_ty = context.builtin(BuiltinName::Int);
    let anything = context.builtin(BuiltinName::Anything);
    let nothing = context.builtin(BuiltinName::Nothing);
    let cause = ConstraintCause::new(sp(), ConstraintAnchor::CallArgument(0));

    let constraints = vec![
        Constraint::conformance(int_ty, anything, None, cause),
        Constraint::conformance(nothing, int_ty, None, cause),
    ];
    ConstraintSolver::new(&scopes, constraints).solve(&mut context);
    assert!(!context.errors.has_errors());
}

#[test]
fn disjunction_takes_the_first_viable_branch() {
    let mut context = CompilerContext::new();
    let scopes = ScopeMap::with_builtins(&mut context);
    let int_ty = context.builtin(BuiltinName::Int);
    let bool_ty = context.builtin(BuiltinName::Bool);
    let v = context.fresh_var();
    let cause = ConstraintCause::new(sp(), ConstraintAnchor::Identifier);

    let constraints = vec![Constraint::disjunction(vec![
        Constraint::equality(v, int_ty, cause),
        Constraint::equality(v, bool_ty, cause),
    ], cause)];
    let solution = ConstraintSolver::new(&scopes, constraints)
        .solve(&mut context);
    assert!(!context.errors.has_errors());

    let mut substitution = solution.substitution;
    assert_eq!(substitution.walk(&context, v), int_ty);
    assert_eq!(solution.choices, vec![(cause, 0)]);
}

#[test]
fn occurs_check_rejects_infinite_types() {
    let mut context = CompilerContext::new();
    let scopes = ScopeMap::with_builtins(&mut context);
    let int_ty = context.builtin(BuiltinName::Int);
    let v = context.fresh_var();
    let recursive = context.function_type(vec![(None, v)], int_ty, vec![]);
    let cause = ConstraintCause::new(sp(), ConstraintAnchor::Rvalue);

    let constraints = vec![Constraint::equality(v, recursive, cause)];
    let solution = ConstraintSolver::new(&scopes, constraints)
        .solve(&mut context);
    assert!(context.errors.has_kind(
        DiagnosticKind::UnsolvableConstraint(UnsolvableCause::Mismatch)));

    // The failed constraint absorbed into the error type, not a cycle.
    let mut substitution = solution.substitution;
    assert_eq!(substitution.walk(&context, v), context.error());
}

#[test]
fn subscript_resolves_through_the_index_member() {
    // struct Buf { new() {}  fun [](i: Int) -> Int { return i } }
    let buf = Stmt::Decl(Decl::Nominal(NominalDecl::new(
        NominalKind::Struct,
        id("Buf"),
        vec![],
        vec![
            Decl::Fun(fun_decl(
                FunKind::Constructor, "new", &[], &[], None, vec![])),
            Decl::Fun(fun_decl(
                FunKind::Method, "[]", &[], &[("i", "Int")], Some("Int"),
                vec![ret(var("i"))])),
        ],
        sp())));
    let subscript = Expression::Subscript(SubscriptExpr::new(
        Box::new(var("b")),
        vec![CallArg::new("i", int(0))],
        sp()));
    let mut module = Module::new("buffers", vec![
        buf,
        let_("b", None, call(var("Buf"), vec![])),
        let_("v", None, subscript),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Ok(()), "{:?}", context.errors.diagnostics());

    let nominal = nominal_at(&module, 0);
    let buf_ty = match nominal.ty().map(|ty| context.ty(ty).clone()) {
        Some(Ty::Metatype(inner)) => inner,
        ref other => panic!("Expected a metatype, got {:?}", other),
    };
    assert_eq!(prop_at(&module, 1).ty(), Some(buf_ty));
    assert_eq!(prop_at(&module, 2).ty(),
               Some(context.builtin(BuiltinName::Int)));
}

#[test]
fn no_viable_overload_is_diagnosed() {
    let mut module = Module::new("mismatched", vec![
        fun("mono", &[], &[("x", "Int")], Some("Int"), vec![ret(var("x"))]),
        let_("a", None, call(var("mono"), vec![("x", string("nope"))])),
    ]);
    let (context, _, result) = check(&mut module);
    assert_eq!(result, Err(()));
    assert!(context.errors.has_kind(
        DiagnosticKind::UnsolvableConstraint(
            UnsolvableCause::NoViableOverload)));
}
