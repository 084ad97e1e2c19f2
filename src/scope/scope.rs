//! The scope arena.

use rustc_hash::FxHashMap;

use diag::DiagnosticKind;
use scope::{Symbol, SymbolId};

/// Identifies a `Scope` within a `ScopeMap`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One lexical or member scope.
///
/// Symbols are kept per name in declaration order, so overload sets are
/// explored deterministically.
#[derive(Debug, Default)]
pub struct Scope {
    parent: Option<ScopeId>,
    symbols: FxHashMap<String, Vec<SymbolId>>,
}

impl Scope {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// The symbols declared under `name` in this scope alone.
    pub fn symbols(&self, name: &str) -> &[SymbolId] {
        self.symbols.get(name).map(|v| &v[..]).unwrap_or(&[])
    }
}

/// Arena of every scope and symbol in a compilation.
#[derive(Debug, Default)]
pub struct ScopeMap {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl ScopeMap {
    /// An empty map with a root scope. Most callers want
    /// `ScopeMap::with_builtins` instead.
    pub fn new() -> ScopeMap {
        let mut map = ScopeMap { scopes: Vec::new(), symbols: Vec::new() };
        map.scopes.push(Scope::default());
        map
    }

    /// The root scope, which holds the builtin symbols.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Create a child scope under `parent`.
    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope { parent: Some(parent), ..Default::default() });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// Declare `name` in `scope`.
    ///
    /// Overloadable symbols may pile up under one name; a second
    /// non-overloadable declaration is a `DuplicateDeclaration`, and mixing
    /// overloadable with non-overloadable is an `InvalidRedeclaration`.
    pub fn define(&mut self,
                  scope: ScopeId,
                  name: &str,
                  overloadable: bool,
                  method: bool)
                  -> Result<SymbolId, DiagnosticKind> {
        {
            let existing = self.scopes[scope.index()].symbols(name);
            if !existing.is_empty() {
                let prior_overloadable = existing.iter()
                    .all(|id| self.symbols[id.index()].is_overloadable());
                if prior_overloadable != overloadable {
                    return Err(DiagnosticKind::InvalidRedeclaration);
                }
                if !overloadable {
                    return Err(DiagnosticKind::DuplicateDeclaration);
                }
            }
        }
        let id = SymbolId(self.symbols.len() as u32);
        trace!("Defining {} as {:?} in {:?}", name, id, scope);
        self.symbols.push(Symbol::new(name.into(), scope, overloadable, method));
        self.scopes[scope.index()].symbols
            .entry(name.into())
            .or_insert_with(Vec::new)
            .push(id);
        Ok(id)
    }

    /// All symbols visible under `name` from `scope`.
    ///
    /// Walks out through parent scopes gathering overloads; stops at the
    /// first scope that contributes a non-overloadable symbol, since such a
    /// symbol shadows everything further out.
    pub fn lookup_all(&self, scope: ScopeId, name: &str) -> Vec<SymbolId> {
        let mut found = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let here = self.scope(id).symbols(name);
            found.extend_from_slice(here);
            if here.iter().any(|s| !self.symbol(*s).is_overloadable()) {
                break;
            }
            current = self.scope(id).parent();
        }
        trace!("Found {} symbol(s) for {} from {:?}", found.len(), name, scope);
        found
    }
}
