//! Declaration symbols.

use std::cell::Cell;

use scope::ScopeId;
use types::TypeId;

/// Identifies a `Symbol` within a `ScopeMap`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One declared name: a variable, function, type, or generic parameter.
///
/// The binder creates symbols untyped; the item constrainer fills in `ty`
/// once signatures are known. Function symbols may be overloadable, in
/// which case several symbols share one name in one scope.
#[derive(Debug)]
pub struct Symbol {
    name: String,
    scope: ScopeId,
    overloadable: bool,
    method: bool,
    ty: Cell<Option<TypeId>>,
}

impl Symbol {
    pub(crate) fn new(name: String,
                      scope: ScopeId,
                      overloadable: bool,
                      method: bool)
                      -> Symbol {
        Symbol { name, scope, overloadable, method, ty: Cell::new(None) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scope the symbol was declared in.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Whether other declarations may share this symbol's name.
    pub fn is_overloadable(&self) -> bool {
        self.overloadable
    }

    /// Whether the symbol declares a method (its type is curried over `Self`).
    pub fn is_method(&self) -> bool {
        self.method
    }

    pub fn ty(&self) -> Option<TypeId> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ty.set(Some(ty));
    }
}
