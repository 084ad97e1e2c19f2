//! Expression values.

use std::cell::Cell;

use ast::{BinaryOperator, Block, Ident, ParamDecl, TypeAnnotation};
use span::Span;
use types::TypeId;

/// Expression variants.
#[derive(Debug)]
pub enum Expression {
    /// Literal value
    Literal(Literal),
    /// Reference to a declared name
    Ident(Ident),
    /// Binary operation; rewritten to a method call by the dispatcher
    Binary(BinaryExpr),
    /// Invocation of a function or constructor
    Call(CallExpr),
    /// Member access `owner.ownee`
    Select(SelectExpr),
    /// Subscript access `callee[args]`
    Subscript(SubscriptExpr),
    /// Anonymous function
    Lambda(LambdaExpr),
    /// Inline conditional expression
    If(IfExpr),
}

impl Expression {
    pub fn span(&self) -> Span {
        match *self {
            Expression::Literal(ref inner) => inner.span(),
            Expression::Ident(ref inner) => inner.span(),
            Expression::Binary(ref inner) => inner.span(),
            Expression::Call(ref inner) => inner.span(),
            Expression::Select(ref inner) => inner.span(),
            Expression::Subscript(ref inner) => inner.span(),
            Expression::Lambda(ref inner) => inner.span(),
            Expression::If(ref inner) => inner.span(),
        }
    }

    /// The type slot of the node, once a pass has written it.
    pub fn ty(&self) -> Option<TypeId> {
        match *self {
            Expression::Literal(ref inner) => inner.ty(),
            Expression::Ident(ref inner) => inner.ty(),
            Expression::Binary(ref inner) => inner.ty(),
            Expression::Call(ref inner) => inner.ty(),
            Expression::Select(ref inner) => inner.ty(),
            Expression::Subscript(ref inner) => inner.ty(),
            Expression::Lambda(ref inner) => inner.ty(),
            Expression::If(ref inner) => inner.ty(),
        }
    }

    pub fn set_ty(&self, ty: TypeId) {
        match *self {
            Expression::Literal(ref inner) => inner.set_ty(ty),
            Expression::Ident(ref inner) => inner.set_ty(ty),
            Expression::Binary(ref inner) => inner.set_ty(ty),
            Expression::Call(ref inner) => inner.set_ty(ty),
            Expression::Select(ref inner) => inner.set_ty(ty),
            Expression::Subscript(ref inner) => inner.set_ty(ty),
            Expression::Lambda(ref inner) => inner.set_ty(ty),
            Expression::If(ref inner) => inner.set_ty(ty),
        }
    }
}

/// Values held by a literal.
#[derive(Debug, PartialEq, Clone)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// A literal expression; its type is fixed by its token.
#[derive(Debug)]
pub struct Literal {
    value: LiteralValue,
    span: Span,
    ty: Cell<Option<TypeId>>,
}

impl Literal {
    pub fn new(value: LiteralValue, span: Span) -> Literal {
        Literal { value, span, ty: Cell::new(None) }
    }

    pub fn value(&self) -> &LiteralValue {
        &self.value
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn ty(&self) -> Option<TypeId> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ty.set(Some(ty));
    }
}

/// A binary operation `left op right`.
///
/// Typed as an invocation of the operator method on the left operand; the
/// dispatcher rewrites the node into that explicit call once the method is
/// resolved. `method_ty` keeps the function type the constrainer made for
/// the operator so the dispatcher can pick among overloads.
#[derive(Debug)]
pub struct BinaryExpr {
    left: Box<Expression>,
    operator: BinaryOperator,
    right: Box<Expression>,
    span: Span,
    ty: Cell<Option<TypeId>>,
    method_ty: Cell<Option<TypeId>>,
}

impl BinaryExpr {
    pub fn new(left: Box<Expression>,
               operator: BinaryOperator,
               right: Box<Expression>)
               -> BinaryExpr {
        let span = left.span().merge(right.span());
        BinaryExpr {
            left,
            operator,
            right,
            span,
            ty: Cell::new(None),
            method_ty: Cell::new(None),
        }
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn left_mut(&mut self) -> &mut Expression {
        &mut self.left
    }

    pub fn operator(&self) -> BinaryOperator {
        self.operator
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }

    pub fn right_mut(&mut self) -> &mut Expression {
        &mut self.right
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn ty(&self) -> Option<TypeId> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ty.set(Some(ty));
    }

    pub fn method_ty(&self) -> Option<TypeId> {
        self.method_ty.get()
    }

    pub fn set_method_ty(&self, ty: TypeId) {
        self.method_ty.set(Some(ty));
    }

    /// Decompose for the dispatcher's call rewriting.
    pub fn into_parts(self) -> (Box<Expression>, BinaryOperator, Box<Expression>) {
        (self.left, self.operator, self.right)
    }
}

/// An argument in a call or subscript, matched to parameters by label.
#[derive(Debug)]
pub struct CallArg {
    label: Option<String>,
    value: Expression,
    span: Span,
}

impl CallArg {
    pub fn new<S: Into<String>>(label: S, value: Expression) -> CallArg {
        let span = value.span();
        CallArg { label: Some(label.into()), value, span }
    }

    pub fn positional(value: Expression) -> CallArg {
        let span = value.span();
        CallArg { label: None, value, span }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_ref().map(|l| &l[..])
    }

    pub fn value(&self) -> &Expression {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Expression {
        &mut self.value
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// Invocation of a callee, which may be a function or a type (constructor).
#[derive(Debug)]
pub struct CallExpr {
    callee: Box<Expression>,
    args: Vec<CallArg>,
    span: Span,
    ty: Cell<Option<TypeId>>,
}

impl CallExpr {
    pub fn new(callee: Box<Expression>, args: Vec<CallArg>, span: Span) -> CallExpr {
        CallExpr { callee, args, span, ty: Cell::new(None) }
    }

    pub fn callee(&self) -> &Expression {
        &self.callee
    }

    pub fn callee_mut(&mut self) -> &mut Expression {
        &mut self.callee
    }

    pub fn args(&self) -> &[CallArg] {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut [CallArg] {
        &mut self.args
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn ty(&self) -> Option<TypeId> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ty.set(Some(ty));
    }
}

/// Member access `owner.ownee`, or `.ownee` with an implicit owner.
#[derive(Debug)]
pub struct SelectExpr {
    owner: Option<Box<Expression>>,
    ownee: Ident,
    span: Span,
}

impl SelectExpr {
    pub fn new(owner: Box<Expression>, ownee: Ident, span: Span) -> SelectExpr {
        SelectExpr { owner: Some(owner), ownee, span }
    }

    /// A select with the owner omitted; resolved against the metatype of
    /// the expression's own inferred type.
    pub fn implicit(ownee: Ident, span: Span) -> SelectExpr {
        SelectExpr { owner: None, ownee, span }
    }

    pub fn owner(&self) -> Option<&Expression> {
        self.owner.as_ref().map(|o| o.as_ref())
    }

    pub fn owner_mut(&mut self) -> Option<&mut Expression> {
        self.owner.as_mut().map(|o| o.as_mut())
    }

    pub fn ownee(&self) -> &Ident {
        &self.ownee
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// The select's type is its ownee's.
    pub fn ty(&self) -> Option<TypeId> {
        self.ownee.ty()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ownee.set_ty(ty);
    }
}

/// Subscript access, typed like a call to the owner's `[]` member.
#[derive(Debug)]
pub struct SubscriptExpr {
    callee: Box<Expression>,
    args: Vec<CallArg>,
    span: Span,
    ty: Cell<Option<TypeId>>,
}

impl SubscriptExpr {
    pub fn new(callee: Box<Expression>, args: Vec<CallArg>, span: Span) -> SubscriptExpr {
        SubscriptExpr { callee, args, span, ty: Cell::new(None) }
    }

    pub fn callee(&self) -> &Expression {
        &self.callee
    }

    pub fn callee_mut(&mut self) -> &mut Expression {
        &mut self.callee
    }

    pub fn args(&self) -> &[CallArg] {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut [CallArg] {
        &mut self.args
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn ty(&self) -> Option<TypeId> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ty.set(Some(ty));
    }
}

/// An anonymous function.
#[derive(Debug)]
pub struct LambdaExpr {
    params: Vec<ParamDecl>,
    codomain: Option<TypeAnnotation>,
    body: Block,
    span: Span,
    ty: Cell<Option<TypeId>>,
}

impl LambdaExpr {
    pub fn new(params: Vec<ParamDecl>,
               codomain: Option<TypeAnnotation>,
               body: Block,
               span: Span)
               -> LambdaExpr {
        LambdaExpr { params, codomain, body, span, ty: Cell::new(None) }
    }

    pub fn params(&self) -> &[ParamDecl] {
        &self.params
    }

    pub fn codomain(&self) -> Option<&TypeAnnotation> {
        self.codomain.as_ref()
    }

    pub fn body(&self) -> &Block {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Block {
        &mut self.body
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn ty(&self) -> Option<TypeId> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ty.set(Some(ty));
    }
}

/// Inline if expression.
///
/// With both branches the node's type joins them; with only one, the
/// expression has no value and is typed `Nothing`.
#[derive(Debug)]
pub struct IfExpr {
    condition: Box<Expression>,
    then_branch: Box<Expression>,
    else_branch: Option<Box<Expression>>,
    span: Span,
    ty: Cell<Option<TypeId>>,
}

impl IfExpr {
    pub fn new(condition: Box<Expression>,
               then_branch: Box<Expression>,
               else_branch: Option<Box<Expression>>,
               span: Span)
               -> IfExpr {
        IfExpr { condition, then_branch, else_branch, span, ty: Cell::new(None) }
    }

    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    pub fn condition_mut(&mut self) -> &mut Expression {
        &mut self.condition
    }

    pub fn then_branch(&self) -> &Expression {
        &self.then_branch
    }

    pub fn then_branch_mut(&mut self) -> &mut Expression {
        &mut self.then_branch
    }

    pub fn else_branch(&self) -> Option<&Expression> {
        self.else_branch.as_ref().map(|e| e.as_ref())
    }

    pub fn else_branch_mut(&mut self) -> Option<&mut Expression> {
        self.else_branch.as_mut().map(|e| e.as_mut())
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn ty(&self) -> Option<TypeId> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ty.set(Some(ty));
    }
}
