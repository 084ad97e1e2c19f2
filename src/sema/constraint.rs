//! Typing constraints.
//!
//! The constrainers translate the program into these; the solver consumes
//! them. Every constraint remembers where it came from so failures can be
//! attributed to a source range and a semantic anchor within the node.

use ast::BindingOperator;
use span::Span;
use types::TypeId;

/// What part of a node a constraint encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintAnchor {
    /// A written type annotation.
    Annotation,
    /// A function's declared codomain.
    Codomain,
    /// The right side of a binding.
    Rvalue,
    /// A property or parameter initializer.
    Initializer,
    /// The i-th argument of a call or subscript.
    CallArgument(usize),
    /// An operator's operand or member lookup.
    BinaryOperator,
    /// An identifier's declaration.
    Identifier,
    /// A member access.
    Select,
    /// A return statement against the enclosing codomain.
    Return,
    /// An `if` condition.
    Condition,
}

/// Where a constraint came from, for diagnostic attribution only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintCause {
    span: Span,
    anchor: ConstraintAnchor,
}

impl ConstraintCause {
    pub fn new(span: Span, anchor: ConstraintAnchor) -> ConstraintCause {
        ConstraintCause { span, anchor }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn anchor(&self) -> ConstraintAnchor {
        self.anchor
    }
}

/// The relation a constraint demands.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    /// `t` and `u` must unify.
    Equality { t: TypeId, u: TypeId },
    /// `t` must be admissible where a `u` is expected, under the rules of
    /// the binding operator when one is known.
    Conformance {
        t: TypeId,
        u: TypeId,
        op: Option<BindingOperator>,
    },
    /// `owner` must have a member `name` whose type unifies with `u`.
    Member {
        owner: TypeId,
        name: String,
        u: TypeId,
    },
    /// `callee` must be the metatype of a nominal with a constructor of
    /// type `fun`.
    Construction { callee: TypeId, fun: TypeId },
    /// Exactly one alternative must be satisfiable; first viable wins.
    Disjunction(Vec<Constraint>),
}

/// One typing constraint with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    kind: ConstraintKind,
    cause: ConstraintCause,
}

impl Constraint {
    pub fn new(kind: ConstraintKind, cause: ConstraintCause) -> Constraint {
        Constraint { kind, cause }
    }

    pub fn equality(t: TypeId, u: TypeId, cause: ConstraintCause) -> Constraint {
        Constraint::new(ConstraintKind::Equality { t, u }, cause)
    }

    pub fn conformance(t: TypeId,
                       u: TypeId,
                       op: Option<BindingOperator>,
                       cause: ConstraintCause)
                       -> Constraint {
        Constraint::new(ConstraintKind::Conformance { t, u, op }, cause)
    }

    pub fn member<S: Into<String>>(owner: TypeId,
                                   name: S,
                                   u: TypeId,
                                   cause: ConstraintCause)
                                   -> Constraint {
        Constraint::new(
            ConstraintKind::Member { owner, name: name.into(), u }, cause)
    }

    pub fn construction(callee: TypeId,
                        fun: TypeId,
                        cause: ConstraintCause)
                        -> Constraint {
        Constraint::new(ConstraintKind::Construction { callee, fun }, cause)
    }

    pub fn disjunction(branches: Vec<Constraint>,
                       cause: ConstraintCause)
                       -> Constraint {
        Constraint::new(ConstraintKind::Disjunction(branches), cause)
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn cause(&self) -> ConstraintCause {
        self.cause
    }
}
