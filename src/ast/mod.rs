//! Abstract syntax tree definitions.
//!
//! The parser and name binder build these nodes upstream; semantic analysis
//! only annotates them. Nodes carry interior-mutable slots for the data the
//! passes fill in: `ty` cells written with type variables by the
//! constrainers and rewritten with reified types by the dispatcher, and
//! `symbol` cells on identifiers written by the binder (for declarations)
//! or the dispatcher (for references).
//!
//! The tree itself stays immutable through inference; only the dispatcher
//! takes `&mut` access, to rewrite binary operations into explicit method
//! calls.

mod expression;
mod item;
mod stmt;
mod operator;
pub mod types;
pub mod visit;

pub use self::expression::*;
pub use self::item::*;
pub use self::stmt::*;
pub use self::operator::*;
pub use self::types::*;

use std::cell::Cell;

use scope::{ScopeId, SymbolId};
use span::Span;
use types::TypeId;

/// An identifier, in expression or type position.
///
/// The binder fills in `scope`; declarations also arrive with `symbol`
/// pre-bound, while references get theirs from the dispatcher once
/// overloads are resolved.
#[derive(Debug)]
pub struct Ident {
    name: String,
    span: Span,
    scope: Cell<Option<ScopeId>>,
    specializations: Vec<(String, TypeAnnotation)>,
    ty: Cell<Option<TypeId>>,
    symbol: Cell<Option<SymbolId>>,
}

impl Ident {
    pub fn new<S: Into<String>>(name: S, span: Span) -> Ident {
        Ident {
            name: name.into(),
            span,
            scope: Cell::new(None),
            specializations: Vec::new(),
            ty: Cell::new(None),
            symbol: Cell::new(None),
        }
    }

    /// An identifier with an explicit specialization list, e.g. `Box<Int>`.
    pub fn with_specializations<S: Into<String>>(
        name: S,
        span: Span,
        specializations: Vec<(String, TypeAnnotation)>)
        -> Ident {
        Ident {
            name: name.into(),
            span,
            scope: Cell::new(None),
            specializations,
            ty: Cell::new(None),
            symbol: Cell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.scope.get()
    }

    pub fn set_scope(&self, scope: ScopeId) {
        self.scope.set(Some(scope));
    }

    pub fn specializations(&self) -> &[(String, TypeAnnotation)] {
        &self.specializations
    }

    pub fn ty(&self) -> Option<TypeId> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ty.set(Some(ty));
    }

    pub fn symbol(&self) -> Option<SymbolId> {
        self.symbol.get()
    }

    pub fn set_symbol(&self, symbol: SymbolId) {
        self.symbol.set(Some(symbol));
    }
}

/// A single module of parsed code; the root of the syntax tree.
#[derive(Debug)]
pub struct Module {
    name: String,
    stmts: Vec<Stmt>,
}

impl Module {
    pub fn new<S: Into<String>>(name: S, stmts: Vec<Stmt>) -> Module {
        Module { name: name.into(), stmts }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn stmts_mut(&mut self) -> &mut [Stmt] {
        &mut self.stmts
    }
}
