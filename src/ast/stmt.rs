//! Statements and blocks.

use std::cell::Cell;

use ast::{BindingOperator, Decl, Expression};
use scope::ScopeId;
use span::Span;

/// Statement variants.
#[derive(Debug)]
pub enum Stmt {
    Decl(Decl),
    Expression(Expression),
    Binding(BindingStmt),
    Return(ReturnStmt),
}

/// A binding statement `lvalue op rvalue`.
#[derive(Debug)]
pub struct BindingStmt {
    lvalue: Expression,
    operator: BindingOperator,
    rvalue: Expression,
    span: Span,
}

impl BindingStmt {
    pub fn new(lvalue: Expression,
               operator: BindingOperator,
               rvalue: Expression)
               -> BindingStmt {
        let span = lvalue.span().merge(rvalue.span());
        BindingStmt { lvalue, operator, rvalue, span }
    }

    pub fn lvalue(&self) -> &Expression {
        &self.lvalue
    }

    pub fn lvalue_mut(&mut self) -> &mut Expression {
        &mut self.lvalue
    }

    pub fn operator(&self) -> BindingOperator {
        self.operator
    }

    pub fn rvalue(&self) -> &Expression {
        &self.rvalue
    }

    pub fn rvalue_mut(&mut self) -> &mut Expression {
        &mut self.rvalue
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// An explicit return statement.
#[derive(Debug)]
pub struct ReturnStmt {
    value: Option<Expression>,
    span: Span,
}

impl ReturnStmt {
    pub fn new(value: Option<Expression>, span: Span) -> ReturnStmt {
        ReturnStmt { value, span }
    }

    pub fn value(&self) -> Option<&Expression> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut Expression> {
        self.value.as_mut()
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A sequence of statements with its own lexical scope.
#[derive(Debug)]
pub struct Block {
    stmts: Vec<Stmt>,
    scope: Cell<Option<ScopeId>>,
    span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Block {
        Block { stmts, scope: Cell::new(None), span }
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn stmts_mut(&mut self) -> &mut [Stmt] {
        &mut self.stmts
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.scope.get()
    }

    pub fn set_scope(&self, scope: ScopeId) {
        self.scope.set(Some(scope));
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
