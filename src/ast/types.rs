//! Type annotations.
//!
//! Annotations are syntax: a qualifier prefix plus a type sign. The
//! realizer turns them into semantic `TypeId`s during constraint
//! generation and caches the result on the node.

use std::cell::Cell;

use ast::Ident;
use span::Span;
use types::{QualSet, TypeId};

/// A written type, e.g. `mut stk val Box<Int>`.
#[derive(Debug)]
pub struct TypeAnnotation {
    quals: QualSet,
    sign: TypeSign,
    span: Span,
    ty: Cell<Option<TypeId>>,
}

impl TypeAnnotation {
    pub fn new(quals: QualSet, sign: TypeSign, span: Span) -> TypeAnnotation {
        TypeAnnotation { quals, sign, span, ty: Cell::new(None) }
    }

    /// An unqualified annotation.
    pub fn bare(sign: TypeSign, span: Span) -> TypeAnnotation {
        TypeAnnotation::new(QualSet::empty(), sign, span)
    }

    pub fn quals(&self) -> QualSet {
        self.quals
    }

    pub fn sign(&self) -> &TypeSign {
        &self.sign
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// The realized semantic type, once the realizer has run.
    pub fn ty(&self) -> Option<TypeId> {
        self.ty.get()
    }

    pub fn set_ty(&self, ty: TypeId) {
        self.ty.set(Some(ty));
    }
}

/// The structural part of an annotation.
#[derive(Debug)]
pub enum TypeSign {
    /// A type name, possibly specialized: `Int`, `Box<Int>`.
    Named(Ident),
    /// A function sign: `(x: Int) -> Bool`.
    Function(FunctionSign),
}

#[derive(Debug)]
pub struct FunctionSign {
    params: Vec<(Option<String>, TypeAnnotation)>,
    codomain: Box<TypeAnnotation>,
}

impl FunctionSign {
    pub fn new(params: Vec<(Option<String>, TypeAnnotation)>,
               codomain: Box<TypeAnnotation>)
               -> FunctionSign {
        FunctionSign { params, codomain }
    }

    pub fn params(&self) -> &[(Option<String>, TypeAnnotation)] {
        &self.params
    }

    pub fn codomain(&self) -> &TypeAnnotation {
        &self.codomain
    }
}
