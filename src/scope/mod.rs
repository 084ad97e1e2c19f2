//! Scopes and symbols.
//!
//! The name binder runs before semantic analysis and hands over a tree of
//! scopes, each mapping names to the symbols declared under them. Semantic
//! analysis only reads the tree: identifier constraints look symbols up
//! through parent links, the solver resolves members in nominal member
//! scopes, and the dispatcher picks one symbol per identifier.
//!
//! Scopes and symbols are arena-allocated in a `ScopeMap` and addressed by
//! `ScopeId`/`SymbolId`, so AST nodes and types can refer to them without
//! ownership cycles.

mod scope;
mod symbol;
mod builtins;

pub use self::scope::{Scope, ScopeId, ScopeMap};
pub use self::symbol::{Symbol, SymbolId};
