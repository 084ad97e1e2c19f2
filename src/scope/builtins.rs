//! The root scope and its builtin symbols.

use types::{BuiltinName, CompilerContext, Ty};
use scope::ScopeMap;

impl ScopeMap {
    /// A scope map whose root is seeded with the builtin types and their
    /// operator methods.
    ///
    /// Each builtin gets a member scope of its own, so `1 + 2` resolves
    /// `+` through the same member path as a method on a user struct.
    pub fn with_builtins(context: &mut CompilerContext) -> ScopeMap {
        let mut map = ScopeMap::new();
        let root = map.root();

        for name in BuiltinName::all().iter() {
            let members = map.push_scope(root);
            let ty = context.builtin_type(*name, members);
            let symbol = map.define(root, name.name(), false, false)
                .expect("Builtin name was already declared in the root scope");
            let meta = context.metatype(ty);
            map.symbol(symbol).set_ty(meta);
        }

        let bool_ = context.builtin(BuiltinName::Bool);

        // (closed arithmetic operators, Bool-valued comparison operators)
        let operators = hashmap! {
            BuiltinName::Int =>
                (vec!["+", "-", "*", "/", "%"],
                 vec!["==", "!=", "<", ">", "<=", ">="]),
            BuiltinName::Float =>
                (vec!["+", "-", "*", "/"],
                 vec!["==", "!=", "<", ">", "<=", ">="]),
            BuiltinName::Bool => (vec![], vec!["==", "!="]),
            BuiltinName::String => (vec!["+"], vec!["==", "!="]),
        };

        for (name, (arithmetic, comparison)) in operators {
            let self_ty = context.builtin(name);
            let members = match *context.ty(self_ty) {
                Ty::Builtin { scope, .. } => scope,
                ref other => panic!("Builtin {:?} interned as {:?}", name, other),
            };
            for op in arithmetic {
                let inner = context.function_type(
                    vec![(None, self_ty)], self_ty, vec![]);
                let method = context.function_type(
                    vec![(None, self_ty)], inner, vec![]);
                let symbol = map.define(members, op, true, true)
                    .expect("Operator was already declared on a builtin");
                map.symbol(symbol).set_ty(method);
            }
            for op in comparison {
                let inner = context.function_type(
                    vec![(None, self_ty)], bool_, vec![]);
                let method = context.function_type(
                    vec![(None, self_ty)], inner, vec![]);
                let symbol = map.define(members, op, true, true)
                    .expect("Operator was already declared on a builtin");
                map.symbol(symbol).set_ty(method);
            }
        }

        debug!("Seeded root scope with {} builtins", BuiltinName::all().len());
        map
    }
}
