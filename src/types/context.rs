//! The compiler context: type arena, interner, and shared pass state.

use rustc_hash::{FxHashMap, FxHashSet};

use diag::{Diagnostic, ErrorCollector};
use scope::{ScopeId, SymbolId};
use sema::Constraint;
use types::{BuiltinName, FunctionTy, NominalKind, NominalTy, QualSet, Ty, TypeId};

/// Process-scoped state shared by every semantic pass.
///
/// The context owns the type arena and its interning table, the constraint
/// set filled by the constrainers and drained by the solver, and the
/// diagnostic sink. All types live here for the duration of one
/// compilation; AST nodes and the substitution table refer to them by
/// `TypeId` only.
#[derive(Debug)]
pub struct CompilerContext {
    /// All types, indexed by `TypeId`.
    types: Vec<Ty>,
    /// Structural hash-consing table. Variables are never entered here.
    interned: FxHashMap<Ty, TypeId>,
    /// Id of the next fresh type variable.
    next_var: u32,
    /// The builtin types, registered when the root scope is seeded.
    builtins: FxHashMap<BuiltinName, TypeId>,
    /// Constraints accumulated during generation.
    constraints: Vec<Constraint>,
    /// Diagnostic sink, append-only across every pass.
    pub errors: ErrorCollector,
}

impl CompilerContext {
    pub fn new() -> CompilerContext {
        let mut context = CompilerContext {
            types: Vec::new(),
            interned: FxHashMap::default(),
            next_var: 0,
            builtins: FxHashMap::default(),
            constraints: Vec::new(),
            errors: ErrorCollector::new(),
        };
        // Reserve index 0 for the error singleton.
        context.intern(Ty::Error);
        context
    }

    fn intern(&mut self, ty: Ty) -> TypeId {
        debug_assert!(!ty.is_variable(), "Attempted to intern a type variable");
        if let Some(&found) = self.interned.get(&ty) {
            return found;
        }
        let id = TypeId(self.types.len() as u32);
        trace!("Interning {:?} as {:?}", ty, id);
        self.types.push(ty.clone());
        self.interned.insert(ty, id);
        id
    }

    /// The `Ty` a `TypeId` stands for.
    pub fn ty(&self, id: TypeId) -> &Ty {
        &self.types[id.index()]
    }

    /// The error singleton.
    pub fn error(&self) -> TypeId {
        TypeId(0)
    }

    /// Mint a fresh type variable. Never interned; every call is distinct.
    pub fn fresh_var(&mut self) -> TypeId {
        let var = self.next_var;
        self.next_var += 1;
        let id = TypeId(self.types.len() as u32);
        self.types.push(Ty::Variable(var));
        id
    }

    /// Register a builtin type with its member scope.
    pub fn builtin_type(&mut self, name: BuiltinName, scope: ScopeId) -> TypeId {
        let id = self.intern(Ty::Builtin { name, scope });
        self.builtins.insert(name, id);
        id
    }

    /// A previously registered builtin type.
    pub fn builtin(&self, name: BuiltinName) -> TypeId {
        *self.builtins.get(&name)
            .expect("Context was not seeded with builtin types")
    }

    pub fn placeholder(&mut self, name: &str, owner: SymbolId) -> TypeId {
        self.intern(Ty::Placeholder { name: name.into(), owner })
    }

    pub fn nominal_type(&mut self,
                        kind: NominalKind,
                        name: &str,
                        symbol: SymbolId,
                        scope: ScopeId,
                        placeholders: Vec<TypeId>)
                        -> TypeId {
        self.intern(Ty::Nominal(NominalTy {
            kind,
            name: name.into(),
            symbol,
            scope,
            placeholders: placeholders.into_iter().collect(),
        }))
    }

    pub fn function_type(&mut self,
                         params: Vec<(Option<String>, TypeId)>,
                         codomain: TypeId,
                         placeholders: Vec<TypeId>)
                         -> TypeId {
        self.intern(Ty::Function(FunctionTy {
            params: params.into_iter().collect(),
            codomain,
            placeholders: placeholders.into_iter().collect(),
        }))
    }

    pub fn metatype(&mut self, inner: TypeId) -> TypeId {
        if self.ty(inner).is_error() {
            return self.error();
        }
        self.intern(Ty::Metatype(inner))
    }

    /// A generic under specialization. Bindings are canonicalized by
    /// placeholder id so structurally equal specializations intern alike.
    pub fn bound_generic(&mut self,
                         base: TypeId,
                         mut bindings: Vec<(TypeId, TypeId)>)
                         -> TypeId {
        if bindings.is_empty() || self.ty(base).is_error() {
            return base;
        }
        bindings.sort_by_key(|&(placeholder, _)| placeholder);
        self.intern(Ty::BoundGeneric { base, bindings })
    }

    pub fn opened_nominal(&mut self,
                          base: TypeId,
                          mut bindings: Vec<(TypeId, TypeId)>)
                          -> TypeId {
        if bindings.is_empty() {
            return base;
        }
        bindings.sort_by_key(|&(placeholder, _)| placeholder);
        self.intern(Ty::OpenedNominal { base, bindings })
    }

    /// Attach qualifiers to a type. The empty set is the identity;
    /// requalifying a qualified type replaces its qualifiers.
    pub fn qualified(&mut self, quals: QualSet, base: TypeId) -> TypeId {
        if quals.is_empty() {
            return base;
        }
        let unqualified = match *self.ty(base) {
            Ty::Error => return self.error(),
            Ty::Qualified { base: inner, .. } => inner,
            _ => base,
        };
        self.intern(Ty::Qualified { quals, base: unqualified })
    }

    /// Split a type into its qualifiers (if any) and unqualified base.
    pub fn split_quals(&self, ty: TypeId) -> (Option<QualSet>, TypeId) {
        match *self.ty(ty) {
            Ty::Qualified { quals, base } => (Some(quals), base),
            _ => (None, ty),
        }
    }

    /// Whether the type (transitively) contains a type variable.
    pub fn contains_variable(&self, ty: TypeId) -> bool {
        match *self.ty(ty) {
            Ty::Variable(_) => true,
            Ty::Error | Ty::Builtin { .. } | Ty::Placeholder { .. } => false,
            Ty::Nominal(_) => false,
            Ty::Function(ref fun) => {
                fun.params.iter().any(|&(_, p)| self.contains_variable(p))
                    || self.contains_variable(fun.codomain)
            }
            Ty::BoundGeneric { base, ref bindings }
            | Ty::OpenedNominal { base, ref bindings } => {
                self.contains_variable(base)
                    || bindings.iter().any(|&(_, v)| self.contains_variable(v))
            }
            Ty::Metatype(inner) => self.contains_variable(inner),
            Ty::Qualified { base, .. } => self.contains_variable(base),
        }
    }

    /// The placeholders a type mentions but does not bind.
    pub fn unbound_placeholders(&self, ty: TypeId) -> FxHashSet<TypeId> {
        let mut found = FxHashSet::default();
        self.collect_placeholders(ty, &mut found);
        found
    }

    fn collect_placeholders(&self, ty: TypeId, found: &mut FxHashSet<TypeId>) {
        match *self.ty(ty) {
            Ty::Placeholder { .. } => {
                found.insert(ty);
            }
            Ty::Nominal(ref nominal) => {
                for &placeholder in nominal.placeholders.iter() {
                    found.insert(placeholder);
                }
            }
            Ty::Function(ref fun) => {
                for &(_, param) in fun.params.iter() {
                    self.collect_placeholders(param, found);
                }
                self.collect_placeholders(fun.codomain, found);
            }
            Ty::BoundGeneric { base, ref bindings } => {
                self.collect_placeholders(base, found);
                for &(placeholder, value) in bindings.iter() {
                    found.remove(&placeholder);
                    self.collect_placeholders(value, found);
                }
            }
            Ty::OpenedNominal { base, .. } => {
                self.collect_placeholders(base, found);
            }
            Ty::Metatype(inner) | Ty::Qualified { base: inner, .. } => {
                self.collect_placeholders(inner, found);
            }
            Ty::Error | Ty::Builtin { .. } | Ty::Variable(_) => {}
        }
    }

    /// Render a type for diagnostics.
    pub fn describe(&self, ty: TypeId) -> String {
        match *self.ty(ty) {
            Ty::Error => "<error>".into(),
            Ty::Builtin { name, .. } => name.name().into(),
            Ty::Variable(var) => format!("${}", var),
            Ty::Placeholder { ref name, .. } => name.clone(),
            Ty::Nominal(ref nominal) => nominal.name.clone(),
            Ty::Function(ref fun) => {
                let params: Vec<String> = fun.params.iter()
                    .map(|&(ref label, param)| match *label {
                        Some(ref label) =>
                            format!("{}: {}", label, self.describe(param)),
                        None => self.describe(param),
                    })
                    .collect();
                format!("({}) -> {}", params.join(", "), self.describe(fun.codomain))
            }
            Ty::BoundGeneric { base, ref bindings }
            | Ty::OpenedNominal { base, ref bindings } => {
                let args: Vec<String> = bindings.iter()
                    .map(|&(placeholder, value)| {
                        format!("{} = {}",
                                self.describe(placeholder), self.describe(value))
                    })
                    .collect();
                format!("{}<{}>", self.describe(base), args.join(", "))
            }
            Ty::Metatype(inner) => format!("{}.Type", self.describe(inner)),
            Ty::Qualified { quals, base } => {
                format!("{} {}", quals.describe(), self.describe(base))
            }
        }
    }

    /// Append a constraint for the solver.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Drain the accumulated constraints.
    pub fn take_constraints(&mut self) -> Vec<Constraint> {
        ::std::mem::replace(&mut self.constraints, Vec::new())
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.errors.add(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scope::ScopeMap;

    fn context_and_scopes() -> (CompilerContext, ScopeMap) {
        let mut context = CompilerContext::new();
        let scopes = ScopeMap::with_builtins(&mut context);
        (context, scopes)
    }

    #[test]
    fn interning_returns_identical_ids() {
        let (mut context, _) = context_and_scopes();
        let int = context.builtin(BuiltinName::Int);
        let bool_ = context.builtin(BuiltinName::Bool);
        let first = context.function_type(
            vec![(Some("x".into()), int)], bool_, vec![]);
        let second = context.function_type(
            vec![(Some("x".into()), int)], bool_, vec![]);
        assert_eq!(first, second);

        let labeled = context.function_type(
            vec![(Some("y".into()), int)], bool_, vec![]);
        assert_ne!(first, labeled);
    }

    #[test]
    fn fresh_vars_are_distinct() {
        let (mut context, _) = context_and_scopes();
        let first = context.fresh_var();
        let second = context.fresh_var();
        assert_ne!(first, second);
        assert_ne!(context.ty(first), context.ty(second));
    }

    #[test]
    fn qualified_normalizes() {
        let (mut context, _) = context_and_scopes();
        let int = context.builtin(BuiltinName::Int);
        assert_eq!(context.qualified(QualSet::empty(), int), int);

        let literal = context.qualified(QualSet::literal(), int);
        let requalified = context.qualified(
            QualSet::MUT | QualSet::STK | QualSet::VAL, literal);
        match *context.ty(requalified) {
            Ty::Qualified { base, .. } => assert_eq!(base, int),
            ref other => panic!("Expected qualified type, got {:?}", other),
        }

        let error = context.error();
        assert_eq!(context.qualified(QualSet::literal(), error), error);
    }

    #[test]
    fn metatype_of_error_absorbs() {
        let (mut context, _) = context_and_scopes();
        let error = context.error();
        assert_eq!(context.metatype(error), error);
    }

    #[test]
    fn bound_generic_bindings_are_canonicalized() {
        let (mut context, scopes) = context_and_scopes();
        let int = context.builtin(BuiltinName::Int);
        let bool_ = context.builtin(BuiltinName::Bool);
        let owner = scopes.scope(scopes.root()).symbols("Int")[0];
        let t = context.placeholder("T", owner);
        let u = context.placeholder("U", owner);
        let base = context.nominal_type(
            NominalKind::Struct, "Pair", owner, scopes.root(), vec![t, u]);
        let forward = context.bound_generic(base, vec![(t, int), (u, bool_)]);
        let backward = context.bound_generic(base, vec![(u, bool_), (t, int)]);
        assert_eq!(forward, backward);
    }
}
