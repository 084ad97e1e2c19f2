//! Opening and closing generic types.
//!
//! `open` replaces the placeholders of a generic type with fresh type
//! variables so the solver can infer their instantiation at one use site.
//! `close` is the inverse direction: placeholders are substituted with
//! whatever the bindings map says, once known.
//!
//! Nominal types are deliberately not rewritten member-by-member in either
//! direction. Opening wraps them in an `OpenedNominal` and closing in a
//! `BoundGeneric`, so nominal identity survives unification and call sites
//! keep the specialization arguments for member lookup after dispatch.

use rustc_hash::FxHashMap;

use types::{CompilerContext, Ty, TypeId};

/// Replace in-scope placeholders with fresh variables.
///
/// `bindings` maps each placeholder to the variable that replaced it; it is
/// extended as new placeholders come into scope, and consulted so that one
/// placeholder opens to one variable across an entire signature.
pub fn open(context: &mut CompilerContext,
            ty: TypeId,
            bindings: &mut FxHashMap<TypeId, TypeId>)
            -> TypeId {
    let data = context.ty(ty).clone();
    match data {
        Ty::Error | Ty::Variable(_) | Ty::Builtin { .. } => ty,
        Ty::Placeholder { .. } => {
            bindings.get(&ty).cloned().unwrap_or(ty)
        }
        Ty::Function(fun) => {
            for &placeholder in fun.placeholders.iter() {
                if !bindings.contains_key(&placeholder) {
                    let fresh = context.fresh_var();
                    bindings.insert(placeholder, fresh);
                }
            }
            let params = fun.params.iter()
                .map(|&(ref label, param)| {
                    (label.clone(), open(context, param, bindings))
                })
                .collect();
            let codomain = open(context, fun.codomain, bindings);
            // The result is monomorphic; its placeholders are all spoken for.
            context.function_type(params, codomain, vec![])
        }
        Ty::Nominal(nominal) => {
            if nominal.placeholders.is_empty() {
                return ty;
            }
            let mut opened = Vec::with_capacity(nominal.placeholders.len());
            for &placeholder in nominal.placeholders.iter() {
                if !bindings.contains_key(&placeholder) {
                    let fresh = context.fresh_var();
                    bindings.insert(placeholder, fresh);
                }
                opened.push((placeholder, bindings[&placeholder]));
            }
            context.opened_nominal(ty, opened)
        }
        Ty::BoundGeneric { base, bindings: bound } => {
            // Only placeholder-valued bindings are rewritten; concrete
            // arguments stay as written.
            let rewritten = bound.iter()
                .map(|&(placeholder, value)| {
                    let value = match *context.ty(value) {
                        Ty::Placeholder { .. } =>
                            bindings.get(&value).cloned().unwrap_or(value),
                        _ => value,
                    };
                    (placeholder, value)
                })
                .collect();
            context.bound_generic(base, rewritten)
        }
        Ty::OpenedNominal { .. } => ty,
        Ty::Metatype(inner) => {
            let inner = open(context, inner, bindings);
            context.metatype(inner)
        }
        Ty::Qualified { quals, base } => {
            let base = open(context, base, bindings);
            context.qualified(quals, base)
        }
    }
}

/// Substitute bound types back into a type.
///
/// Any type id present in `bindings` is replaced outright, so the map can
/// carry placeholder-to-concrete substitutions as well as the inverse
/// variable-to-placeholder direction used to undo an `open`.
pub fn close(context: &mut CompilerContext,
             ty: TypeId,
             bindings: &FxHashMap<TypeId, TypeId>)
             -> TypeId {
    if let Some(&replacement) = bindings.get(&ty) {
        return replacement;
    }
    let data = context.ty(ty).clone();
    match data {
        Ty::Error | Ty::Variable(_) | Ty::Builtin { .. }
        | Ty::Placeholder { .. } | Ty::OpenedNominal { .. } => ty,
        Ty::Function(fun) => {
            let params = fun.params.iter()
                .map(|&(ref label, param)| {
                    (label.clone(), close(context, param, bindings))
                })
                .collect();
            let codomain = close(context, fun.codomain, bindings);
            let placeholders = fun.placeholders.iter()
                .cloned()
                .filter(|placeholder| !bindings.contains_key(placeholder))
                .collect();
            context.function_type(params, codomain, placeholders)
        }
        Ty::Nominal(nominal) => {
            // Keep the specialization arguments visible instead of
            // rewriting members; member lookup closes again on demand.
            let bound: Vec<_> = nominal.placeholders.iter()
                .filter_map(|&placeholder| {
                    bindings.get(&placeholder)
                        .map(|&value| (placeholder, value))
                })
                .collect();
            context.bound_generic(ty, bound)
        }
        Ty::BoundGeneric { base, bindings: bound } => {
            let rewritten = bound.iter()
                .map(|&(placeholder, value)| {
                    (placeholder, close(context, value, bindings))
                })
                .collect();
            context.bound_generic(base, rewritten)
        }
        Ty::Metatype(inner) => {
            let inner = close(context, inner, bindings);
            context.metatype(inner)
        }
        Ty::Qualified { quals, base } => {
            let base = close(context, base, bindings);
            context.qualified(quals, base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;
    use scope::ScopeMap;
    use types::{BuiltinName, CompilerContext, NominalKind, Ty};

    fn harness() -> (CompilerContext, ScopeMap) {
        let mut context = CompilerContext::new();
        let scopes = ScopeMap::with_builtins(&mut context);
        (context, scopes)
    }

    #[test]
    fn open_function_instantiates_placeholders() {
        let (mut context, scopes) = harness();
        let owner = scopes.scope(scopes.root()).symbols("Int")[0];
        let t = context.placeholder("T", owner);
        let poly = context.function_type(
            vec![(Some("x".into()), t)], t, vec![t]);

        let mut bindings = FxHashMap::default();
        let opened = open(&mut context, poly, &mut bindings);

        let fresh = bindings[&t];
        assert!(context.ty(fresh).is_variable());
        match *context.ty(opened) {
            Ty::Function(ref fun) => {
                assert_eq!(fun.params[0].1, fresh);
                assert_eq!(fun.codomain, fresh);
                assert!(fun.placeholders.is_empty());
            }
            ref other => panic!("Expected function type, got {:?}", other),
        }
    }

    #[test]
    fn open_nominal_wraps_instead_of_rewriting() {
        let (mut context, scopes) = harness();
        let owner = scopes.scope(scopes.root()).symbols("Int")[0];
        let t = context.placeholder("T", owner);
        let boxed = context.nominal_type(
            NominalKind::Struct, "Box", owner, scopes.root(), vec![t]);

        let mut bindings = FxHashMap::default();
        let opened = open(&mut context, boxed, &mut bindings);

        match *context.ty(opened) {
            Ty::OpenedNominal { base, ref bindings } => {
                assert_eq!(base, boxed);
                assert_eq!(bindings.len(), 1);
                assert_eq!(bindings[0].0, t);
            }
            ref other => panic!("Expected opened nominal, got {:?}", other),
        }
    }

    #[test]
    fn open_variable_is_identity() {
        let (mut context, _) = harness();
        let var = context.fresh_var();
        let mut bindings = FxHashMap::default();
        assert_eq!(open(&mut context, var, &mut bindings), var);
        assert!(bindings.is_empty());
    }

    #[test]
    fn close_inverts_open_on_functions() {
        let (mut context, scopes) = harness();
        let owner = scopes.scope(scopes.root()).symbols("Int")[0];
        let t = context.placeholder("T", owner);
        // A signature mentioning T without owning it, as a method's inner
        // function would.
        let fun = context.function_type(
            vec![(Some("x".into()), t)], t, vec![]);

        let mut forward = FxHashMap::default();
        forward.insert(t, context.fresh_var());
        let opened = open(&mut context, fun, &mut forward);
        assert_ne!(opened, fun);

        let inverse: FxHashMap<_, _> = forward.iter()
            .map(|(&placeholder, &var)| (var, placeholder))
            .collect();
        let closed = close(&mut context, opened, &inverse);
        assert_eq!(closed, fun);
    }

    #[test]
    fn close_placeholder_substitutes() {
        let (mut context, scopes) = harness();
        let owner = scopes.scope(scopes.root()).symbols("Int")[0];
        let int = context.builtin(BuiltinName::Int);
        let t = context.placeholder("T", owner);
        let mut bindings = FxHashMap::default();
        bindings.insert(t, int);
        assert_eq!(close(&mut context, t, &bindings), int);
    }

    #[test]
    fn close_nominal_binds_generic_arguments() {
        let (mut context, scopes) = harness();
        let owner = scopes.scope(scopes.root()).symbols("Int")[0];
        let int = context.builtin(BuiltinName::Int);
        let t = context.placeholder("T", owner);
        let boxed = context.nominal_type(
            NominalKind::Struct, "Box", owner, scopes.root(), vec![t]);

        let mut bindings = FxHashMap::default();
        bindings.insert(t, int);
        let closed = close(&mut context, boxed, &bindings);
        match *context.ty(closed) {
            Ty::BoundGeneric { base, ref bindings } => {
                assert_eq!(base, boxed);
                assert_eq!(bindings, &vec![(t, int)]);
            }
            ref other => panic!("Expected bound generic, got {:?}", other),
        }
    }
}
