//! Declaration-level constraint generation.
//!
//! Runs before the expression pass so that every module-level symbol
//! carries a type by the time a body mentions it: nominal headers first
//! (annotations may name any type in the module), then signatures.
//!
//! Parameter and codomain annotations are realized directly into the
//! synthesized function types rather than bridged through variables, so
//! that opening a generic signature at a use site instantiates its
//! placeholders independently per call.

use ast::{Decl, FunDecl, FunKind, Ident, Module, NominalDecl, PropDecl, Stmt};
use scope::{ScopeMap, SymbolId};
use sema::constraint::{Constraint, ConstraintAnchor, ConstraintCause};
use sema::realizer::TypeRealizer;
use types::{BuiltinName, CompilerContext, Ty, TypeId};

/// The declaration pass.
#[derive(Debug)]
pub struct ItemConstrainer<'s, 'ctx> {
    scopes: &'s ScopeMap,
    context: &'ctx mut CompilerContext,
}

impl<'s, 'ctx> ItemConstrainer<'s, 'ctx> {
    pub fn new(scopes: &'s ScopeMap,
               context: &'ctx mut CompilerContext)
               -> ItemConstrainer<'s, 'ctx> {
        ItemConstrainer { scopes, context }
    }

    pub fn run(&mut self, module: &Module) {
        trace!("Declaring nominal headers of {}", module.name());
        for stmt in module.stmts() {
            if let Stmt::Decl(Decl::Nominal(ref nominal)) = *stmt {
                declare_nominal(self.scopes, self.context, nominal);
            }
        }
        trace!("Synthesizing signatures of {}", module.name());
        for stmt in module.stmts() {
            if let Stmt::Decl(ref decl) = *stmt {
                self.constrain_decl(decl);
            }
        }
    }

    fn constrain_decl(&mut self, decl: &Decl) {
        match *decl {
            Decl::Prop(ref prop) => {
                synthesize_prop(self.scopes, self.context, prop);
            }
            Decl::Fun(ref fun) => {
                synthesize_fun(self.scopes, self.context, fun, None);
            }
            Decl::Nominal(ref nominal) => {
                self.constrain_members(nominal);
            }
        }
    }

    fn constrain_members(&mut self, nominal: &NominalDecl) {
        let self_ty = match nominal.ty().map(|ty| self.context.ty(ty).clone()) {
            Some(Ty::Metatype(inner)) => inner,
            _ => {
                debug!("Skipping members of undeclared nominal {}",
                       nominal.name());
                return;
            }
        };
        for member in nominal.members() {
            match *member {
                Decl::Prop(ref prop) => {
                    synthesize_prop(self.scopes, self.context, prop);
                }
                Decl::Fun(ref fun) => {
                    synthesize_fun(
                        self.scopes, self.context, fun, Some(self_ty));
                }
                Decl::Nominal(ref nested) => {
                    self.constrain_members(nested);
                }
            }
        }
    }
}

/// Intern the nominal's semantic type and type its symbol as a metatype.
///
/// Also types the symbols of the nominal's generic parameters, so member
/// annotations can refer to them.
pub(crate) fn declare_nominal(scopes: &ScopeMap,
                              context: &mut CompilerContext,
                              nominal: &NominalDecl) {
    let symbol = match nominal.ident().symbol() {
        Some(symbol) => symbol,
        None => {
            debug!("Skipping unbound nominal {}", nominal.name());
            return;
        }
    };
    let members = match nominal.scope() {
        Some(scope) => scope,
        None => {
            debug!("Skipping nominal {} without a member scope",
                   nominal.name());
            return;
        }
    };
    let placeholders = declare_placeholders(
        scopes, context, symbol, nominal.placeholders());
    let ty = context.nominal_type(
        nominal.kind(), nominal.name(), symbol, members, placeholders);
    let meta = context.metatype(ty);
    trace!("Declared nominal {} as {}", nominal.name(), context.describe(ty));
    nominal.set_ty(meta);
    nominal.ident().set_ty(meta);
    scopes.symbol(symbol).set_ty(meta);

    for member in nominal.members() {
        if let Decl::Nominal(ref nested) = *member {
            declare_nominal(scopes, context, nested);
        }
    }
}

/// Type a property declaration's symbol from its annotation, or leave a
/// fresh variable for inference.
pub(crate) fn synthesize_prop(scopes: &ScopeMap,
                              context: &mut CompilerContext,
                              prop: &PropDecl) {
    let symbol = match prop.ident().symbol() {
        Some(symbol) => symbol,
        None => {
            debug!("Skipping unbound property {}", prop.name());
            return;
        }
    };
    let ty = match prop.annotation() {
        Some(annotation) => {
            TypeRealizer::new(scopes).realize(context, annotation)
        }
        None => context.fresh_var(),
    };
    prop.set_ty(ty);
    prop.ident().set_ty(ty);
    scopes.symbol(symbol).set_ty(ty);
}

/// Synthesize a function's type and attach it to its symbol.
///
/// Constructors take the enclosing `Self` as codomain; methods are curried
/// `(Self) -> (params -> codomain)`; an unannotated codomain is `Nothing`.
pub(crate) fn synthesize_fun(scopes: &ScopeMap,
                             context: &mut CompilerContext,
                             fun: &FunDecl,
                             self_ty: Option<TypeId>) {
    let symbol = match fun.ident().symbol() {
        Some(symbol) => symbol,
        None => {
            debug!("Skipping unbound function {}", fun.name());
            return;
        }
    };
    let realizer = TypeRealizer::new(scopes);
    let placeholders = declare_placeholders(
        scopes, context, symbol, fun.placeholders());

    let params: Vec<(Option<String>, TypeId)> = fun.params().iter()
        .map(|param| {
            let ty = match param.annotation() {
                Some(annotation) => realizer.realize(context, annotation),
                None => context.fresh_var(),
            };
            param.set_ty(ty);
            param.ident().set_ty(ty);
            if let Some(param_symbol) = param.ident().symbol() {
                scopes.symbol(param_symbol).set_ty(ty);
            }
            (param.label().map(String::from), ty)
        })
        .collect();

    let codomain = match fun.kind() {
        FunKind::Constructor => {
            let self_ty = self_ty.unwrap_or_else(|| context.error());
            // An explicit codomain on a constructor must still be Self.
            if let Some(annotation) = fun.codomain() {
                let declared = realizer.realize(context, annotation);
                let cause = ConstraintCause::new(
                    annotation.span(), ConstraintAnchor::Codomain);
                context.add_constraint(
                    Constraint::equality(declared, self_ty, cause));
            }
            self_ty
        }
        FunKind::Destructor => context.builtin(BuiltinName::Nothing),
        FunKind::Regular | FunKind::Method => match fun.codomain() {
            Some(annotation) => realizer.realize(context, annotation),
            None => context.builtin(BuiltinName::Nothing),
        },
    };

    let ty = match fun.kind() {
        FunKind::Method | FunKind::Destructor => {
            let self_ty = self_ty.unwrap_or_else(|| context.error());
            let inner = context.function_type(params, codomain, vec![]);
            context.function_type(vec![(None, self_ty)], inner, placeholders)
        }
        FunKind::Regular | FunKind::Constructor => {
            context.function_type(params, codomain, placeholders)
        }
    };
    trace!("Synthesized {} : {}", fun.name(), context.describe(ty));
    fun.set_ty(ty);
    fun.ident().set_ty(ty);
    scopes.symbol(symbol).set_ty(ty);
}

/// Declare placeholder types for a generic parameter list and type the
/// parameters' own symbols as metatypes over them.
fn declare_placeholders(scopes: &ScopeMap,
                        context: &mut CompilerContext,
                        owner: SymbolId,
                        idents: &[Ident])
                        -> Vec<TypeId> {
    idents.iter()
        .map(|ident| {
            let placeholder = context.placeholder(ident.name(), owner);
            let meta = context.metatype(placeholder);
            ident.set_ty(meta);
            if let Some(symbol) = ident.symbol() {
                scopes.symbol(symbol).set_ty(meta);
            }
            placeholder
        })
        .collect()
}
