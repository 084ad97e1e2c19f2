//! The substitution table produced by solving.

use rustc_hash::FxHashMap;

use types::{CompilerContext, Ty, TypeId};

/// A snapshot of the table, restorable across disjunction branches.
#[derive(Debug)]
pub struct SubstitutionSnapshot {
    bindings: FxHashMap<u32, TypeId>,
}

/// Maps type variables to the types the solver discovered for them.
///
/// Bindings chain (a variable may be bound to another variable); `walk`
/// follows the chain union-find style and compresses the path it took so
/// later lookups are direct. The table only grows while solving; branch
/// exploration rewinds it through snapshots.
#[derive(Debug, Default)]
pub struct SubstitutionTable {
    bindings: FxHashMap<u32, TypeId>,
}

impl SubstitutionTable {
    pub fn new() -> SubstitutionTable {
        SubstitutionTable { ..Default::default() }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind a variable. The variable must be unbound.
    pub fn bind(&mut self, var: u32, ty: TypeId) {
        trace!("Binding ${} := {:?}", var, ty);
        let previous = self.bindings.insert(var, ty);
        debug_assert!(previous.is_none(),
                      "Attempted to rebind ${}", var);
    }

    /// Resolve a type through the substitution to its root, compressing
    /// the visited chain.
    pub fn walk(&mut self, context: &CompilerContext, ty: TypeId) -> TypeId {
        let mut current = ty;
        let mut visited = Vec::new();
        loop {
            let var = match *context.ty(current) {
                Ty::Variable(var) => var,
                _ => break,
            };
            match self.bindings.get(&var) {
                Some(&next) => {
                    visited.push(var);
                    current = next;
                }
                None => break,
            }
        }
        // Path compression: point every variable we passed at the root.
        if visited.len() > 1 {
            for &var in &visited[..visited.len() - 1] {
                self.bindings.insert(var, current);
            }
        }
        current
    }

    /// Resolve without compressing; usable through a shared reference.
    pub fn probe(&self, context: &CompilerContext, ty: TypeId) -> TypeId {
        let mut current = ty;
        loop {
            let var = match *context.ty(current) {
                Ty::Variable(var) => var,
                _ => return current,
            };
            match self.bindings.get(&var) {
                Some(&next) => current = next,
                None => return current,
            }
        }
    }

    /// Whether `var` occurs in `ty` under the current substitution.
    /// Binding a variable to a type containing itself would make `walk`
    /// diverge, so the solver checks this first.
    pub fn occurs(&mut self,
                  context: &CompilerContext,
                  var: u32,
                  ty: TypeId)
                  -> bool {
        let walked = self.walk(context, ty);
        match context.ty(walked).clone() {
            Ty::Variable(other) => other == var,
            Ty::Function(fun) => {
                fun.params.iter()
                    .any(|&(_, param)| self.occurs(context, var, param))
                    || self.occurs(context, var, fun.codomain)
            }
            Ty::BoundGeneric { ref bindings, .. }
            | Ty::OpenedNominal { ref bindings, .. } => {
                bindings.iter()
                    .any(|&(_, value)| self.occurs(context, var, value))
            }
            Ty::Metatype(inner) | Ty::Qualified { base: inner, .. } => {
                self.occurs(context, var, inner)
            }
            Ty::Error | Ty::Builtin { .. } | Ty::Placeholder { .. }
            | Ty::Nominal(_) => false,
        }
    }

    /// Collapse a type to its substitution fix-point, rewriting inside
    /// composite types. Opened nominals come out as bound generics, so the
    /// specialization arguments survive into the typed AST.
    pub fn reify(&mut self,
                 context: &mut CompilerContext,
                 ty: TypeId)
                 -> TypeId {
        let walked = self.walk(context, ty);
        let data = context.ty(walked).clone();
        match data {
            Ty::Error | Ty::Builtin { .. } | Ty::Variable(_)
            | Ty::Placeholder { .. } | Ty::Nominal(_) => walked,
            Ty::Function(fun) => {
                let params = fun.params.iter()
                    .map(|&(ref label, param)| {
                        (label.clone(), self.reify(context, param))
                    })
                    .collect();
                let codomain = self.reify(context, fun.codomain);
                context.function_type(
                    params, codomain, fun.placeholders.to_vec())
            }
            Ty::BoundGeneric { base, bindings } => {
                let bindings = bindings.iter()
                    .map(|&(placeholder, value)| {
                        (placeholder, self.reify(context, value))
                    })
                    .collect();
                context.bound_generic(base, bindings)
            }
            Ty::OpenedNominal { base, bindings } => {
                let bindings = bindings.iter()
                    .map(|&(placeholder, value)| {
                        (placeholder, self.reify(context, value))
                    })
                    .collect();
                context.bound_generic(base, bindings)
            }
            Ty::Metatype(inner) => {
                let inner = self.reify(context, inner);
                context.metatype(inner)
            }
            Ty::Qualified { quals, base } => {
                let base = self.reify(context, base);
                context.qualified(quals, base)
            }
        }
    }

    pub fn snapshot(&self) -> SubstitutionSnapshot {
        SubstitutionSnapshot { bindings: self.bindings.clone() }
    }

    pub fn restore(&mut self, snapshot: SubstitutionSnapshot) {
        self.bindings = snapshot.bindings;
    }
}
