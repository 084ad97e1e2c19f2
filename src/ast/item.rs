//! Declarations.

use std::cell::Cell;

use ast::{BindingOperator, Block, Expression, Ident, TypeAnnotation};
use scope::ScopeId;
use span::Span;
use types::{NominalKind, TypeId};

/// Declaration variants.
#[derive(Debug)]
pub enum Decl {
    /// A property (`let`/`var`) declaration
    Prop(PropDecl),
    /// A function, method, constructor, or destructor
    Fun(FunDecl),
    /// A struct, interface, or union declaration
    Nominal(NominalDecl),
}

/// A property declaration, possibly annotated and initialized:
/// `let x: Int := 0`.
#[derive(Debug)]
pub struct PropDecl {
    ident: Ident,
    annotation: Option<TypeAnnotation>,
    initializer: Option<(BindingOperator, Expression)>,
    span: Span,
    ty: Cell<Option<TypeId>>,
}

impl PropDecl {
    pub fn new(ident: Ident,
               annotation: Option<TypeAnnotation>,
               initializer: Option<(BindingOperator, Expression)>,
               span: Span)
               -> PropDecl {
        PropDecl { ident, annotation, initializer, span, ty: Cell::new(None) }
    }

    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    pub fn name(&self) -> &str {
        self.ident.name()
    }

    pub fn annotation(&self) -> Option<&TypeAnnotation> {
        self.annotation.as_ref()
    }

    pub fn initializer(&self) -> Option<(BindingOperator, &Expression)> {
        self.initializer.as_ref().map(|&(op, ref value)| (op, value))
    }

    pub fn initializer_mut(&mut self) -> Option<&mut Expression> {
        self.initializer.as_mut().map(|&mut (_, ref mut value)| value)
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

/// A function parameter.
#[derive(Debug)]
pub struct ParamDecl {
    label: Option<String>,
    ident: Ident,
    annotation: Option<TypeAnnotation>,
    default: Option<Expression>,
    span: Span,
    ty: Cell<Option<TypeId>>,
}

impl ParamDecl {
    /// A parameter whose argument label is its own name.
    pub fn named(ident: Ident, annotation: Option<TypeAnnotation>) -> ParamDecl {
        let span = ident.span();
        let label = Some(ident.name().into());
        ParamDecl { label, ident, annotation, default: None, span, ty: Cell::new(None) }
    }

    pub fn new(label: Option<String>,
               ident: Ident,
               annotation: Option<TypeAnnotation>,
               default: Option<Expression>,
               span: Span)
               -> ParamDecl {
        ParamDecl { label, ident, annotation, default, span, ty: Cell::new(None) }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_ref().map(|l| &l[..])
    }

    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    pub fn name(&self) -> &str {
        self.ident.name()
    }

    pub fn annotation(&self) -> Option<&TypeAnnotation> {
        self.annotation.as_ref()
    }

    pub fn default(&self) -> Option<&Expression> {
        self.default.as_ref()
    }

    pub fn default_mut(&mut self) -> Option<&mut Expression> {
        self.default.as_mut()
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

/// What kind of callable a `FunDecl` declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunKind {
    Regular,
    /// A member function; its type is curried over `Self`.
    Method,
    /// `new`; its codomain is the enclosing `Self`.
    Constructor,
    Destructor,
}

/// A function declaration.
#[derive(Debug)]
pub struct FunDecl {
    kind: FunKind,
    ident: Ident,
    placeholders: Vec<Ident>,
    params: Vec<ParamDecl>,
    codomain: Option<TypeAnnotation>,
    body: Option<Block>,
    span: Span,
    ty: Cell<Option<TypeId>>,
}

impl FunDecl {
    pub fn new(kind: FunKind,
               ident: Ident,
               placeholders: Vec<Ident>,
               params: Vec<ParamDecl>,
               codomain: Option<TypeAnnotation>,
               body: Option<Block>,
               span: Span)
               -> FunDecl {
        FunDecl {
            kind, ident, placeholders, params, codomain, body, span,
            ty: Cell::new(None),
        }
    }

    pub fn kind(&self) -> FunKind {
        self.kind
    }

    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    pub fn name(&self) -> &str {
        self.ident.name()
    }

    /// The generic parameters the function declares.
    pub fn placeholders(&self) -> &[Ident] {
        &self.placeholders
    }

    pub fn params(&self) -> &[ParamDecl] {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut [ParamDecl] {
        &mut self.params
    }

    pub fn codomain(&self) -> Option<&TypeAnnotation> {
        self.codomain.as_ref()
    }

    pub fn body(&self) -> Option<&Block> {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> Option<&mut Block> {
        self.body.as_mut()
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

/// A struct, interface, or union declaration.
#[derive(Debug)]
pub struct NominalDecl {
    kind: NominalKind,
    ident: Ident,
    placeholders: Vec<Ident>,
    members: Vec<Decl>,
    /// The member scope, filled in by the binder.
    scope: Cell<Option<ScopeId>>,
    span: Span,
    ty: Cell<Option<TypeId>>,
}

impl NominalDecl {
    pub fn new(kind: NominalKind,
               ident: Ident,
               placeholders: Vec<Ident>,
               members: Vec<Decl>,
               span: Span)
               -> NominalDecl {
        NominalDecl {
            kind, ident, placeholders, members, span,
            scope: Cell::new(None),
            ty: Cell::new(None),
        }
    }

    pub fn kind(&self) -> NominalKind {
        self.kind
    }

    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    pub fn name(&self) -> &str {
        self.ident.name()
    }

    pub fn placeholders(&self) -> &[Ident] {
        &self.placeholders
    }

    pub fn members(&self) -> &[Decl] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Decl] {
        &mut self.members
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

    pub fn ty(&self) -> Option<TypeId> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ty.set(Some(ty));
    }
}
