//! Code for AST walking.

mod visitor;
mod walk;

pub use self::visitor::*;
pub use self::walk::*;
