//! Binding and binary operators.

/// How an rvalue is transferred to an lvalue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingOperator {
    /// `:=`, copying the rvalue.
    Copy,
    /// `<-`, moving the rvalue; both sides need value semantics.
    Move,
    /// `&-`, aliasing the rvalue.
    Ref,
}

impl BindingOperator {
    pub fn token(&self) -> &'static str {
        match *self {
            BindingOperator::Copy => ":=",
            BindingOperator::Move => "<-",
            BindingOperator::Ref => "&-",
        }
    }
}

/// Binary operators, resolved as method calls on their left operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulus,
    Equality,
    NonEquality,
    LessThan,
    GreaterThan,
    LessThanEquals,
    GreaterThanEquals,
}

impl BinaryOperator {
    /// The member name the operator dispatches to.
    pub fn name(&self) -> &'static str {
        match *self {
            BinaryOperator::Addition => "+",
            BinaryOperator::Subtraction => "-",
            BinaryOperator::Multiplication => "*",
            BinaryOperator::Division => "/",
            BinaryOperator::Modulus => "%",
            BinaryOperator::Equality => "==",
            BinaryOperator::NonEquality => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanEquals => "<=",
            BinaryOperator::GreaterThanEquals => ">=",
        }
    }
}
