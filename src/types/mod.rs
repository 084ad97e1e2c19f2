//! Semantic types.
//!
//! Types are a closed sum (`Ty`) arena-allocated in a `CompilerContext` and
//! addressed by `TypeId`. Every non-variable type is interned: structurally
//! equal types share one `TypeId`, so identity comparison of ids is also
//! semantic equality. Type variables are the one exception; each factory
//! call mints a fresh one for the solver to substitute.
//!
//! `lifecycle` holds the open/close operations that instantiate and
//! specialize generic types around inference.

mod quals;
mod ty;
mod context;
pub mod lifecycle;

pub use self::quals::QualSet;
pub use self::ty::{BuiltinName, FunctionTy, NominalKind, NominalTy, Ty, TypeId};
pub use self::context::CompilerContext;
