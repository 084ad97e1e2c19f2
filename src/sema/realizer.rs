//! Realizing type annotations into semantic types.

use rustc_hash::FxHashMap;

use ast::{Ident, TypeAnnotation, TypeSign};
use diag::{Diagnostic, DiagnosticKind};
use scope::ScopeMap;
use types::{CompilerContext, Ty, TypeId};

/// Turns written annotations into `TypeId`s.
///
/// Annotation identifiers are resolved through the scope tree like any
/// other name, but must refer to a metatype. The realizer caches its result
/// on the annotation node and fills in the identifier's symbol, so the
/// dispatcher has nothing left to do for type positions.
#[derive(Debug)]
pub struct TypeRealizer<'s> {
    scopes: &'s ScopeMap,
}

impl<'s> TypeRealizer<'s> {
    pub fn new(scopes: &'s ScopeMap) -> TypeRealizer<'s> {
        TypeRealizer { scopes }
    }

    /// The semantic type an annotation denotes.
    pub fn realize(&self,
                   context: &mut CompilerContext,
                   annotation: &TypeAnnotation)
                   -> TypeId {
        if let Some(ty) = annotation.ty() {
            return ty;
        }
        let base = match *annotation.sign() {
            TypeSign::Named(ref ident) => self.realize_named(context, ident),
            TypeSign::Function(ref sign) => {
                let params = sign.params().iter()
                    .map(|&(ref label, ref param)| {
                        (label.clone(), self.realize(context, param))
                    })
                    .collect();
                let codomain = self.realize(context, sign.codomain());
                context.function_type(params, codomain, vec![])
            }
        };
        let ty = context.qualified(annotation.quals(), base);
        annotation.set_ty(ty);
        ty
    }

    /// Resolve a type identifier, applying its specialization list.
    pub fn realize_named(&self,
                         context: &mut CompilerContext,
                         ident: &Ident)
                         -> TypeId {
        let scope = match ident.scope() {
            Some(scope) => scope,
            None => {
                debug!("Skipping unbound type identifier {}", ident.name());
                return context.error();
            }
        };
        let symbols = self.scopes.lookup_all(scope, ident.name());
        let symbol = match symbols.first() {
            Some(&symbol) => symbol,
            None => {
                context.report(Diagnostic::error(
                    DiagnosticKind::UndefinedSymbol,
                    ident.span(),
                    format!("undefined type `{}`", ident.name())));
                ident.set_ty(context.error());
                return context.error();
            }
        };
        ident.set_symbol(symbol);

        let symbol_ty = self.scopes.symbol(symbol).ty();
        let inner = match symbol_ty.map(|ty| context.ty(ty).clone()) {
            Some(Ty::Metatype(inner)) => inner,
            Some(Ty::Error) | None => {
                ident.set_ty(context.error());
                return context.error();
            }
            Some(_) => {
                context.report(Diagnostic::error(
                    DiagnosticKind::InvalidTypeIdentifier,
                    ident.span(),
                    format!("`{}` does not name a type", ident.name())));
                ident.set_ty(context.error());
                return context.error();
            }
        };
        ident.set_ty(symbol_ty.expect("Checked metatype above"));

        if ident.specializations().is_empty() {
            return inner;
        }
        self.specialize(context, ident, inner)
    }

    /// Apply an explicit specialization list, e.g. `Box<T = Int>`.
    fn specialize(&self,
                  context: &mut CompilerContext,
                  ident: &Ident,
                  inner: TypeId)
                  -> TypeId {
        let placeholders: FxHashMap<String, TypeId> = match *context.ty(inner) {
            Ty::Nominal(ref nominal) if !nominal.placeholders.is_empty() => {
                nominal.placeholders.iter()
                    .map(|&placeholder| {
                        let name = match *context.ty(placeholder) {
                            Ty::Placeholder { ref name, .. } => name.clone(),
                            ref other => panic!(
                                "Nominal placeholder interned as {:?}", other),
                        };
                        (name, placeholder)
                    })
                    .collect()
            }
            _ => {
                context.report(Diagnostic::error(
                    DiagnosticKind::NonGenericType,
                    ident.span(),
                    format!("type `{}` is not generic", ident.name())));
                return context.error();
            }
        };

        let mut bindings = Vec::with_capacity(ident.specializations().len());
        for &(ref name, ref annotation) in ident.specializations() {
            match placeholders.get(name) {
                Some(&placeholder) => {
                    let value = self.realize(context, annotation);
                    bindings.push((placeholder, value));
                }
                None => {
                    context.report(Diagnostic::error(
                        DiagnosticKind::SuperfluousSpecialization,
                        annotation.span(),
                        format!("type `{}` has no placeholder `{}`",
                                ident.name(), name)));
                }
            }
        }
        context.bound_generic(inner, bindings)
    }
}
