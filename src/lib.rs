//! Semantic analysis for the Sable programming language.
//!
//! This crate implements the middle of the Sable compiler: given a parsed,
//! scope-resolved AST it infers a semantic type for every expression and
//! declaration, and dispatches every identifier to a single declaration
//! symbol. Parsing and name binding happen upstream; IR generation happens
//! downstream. See `sema::type_check` for the entry point.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;
#[macro_use]
extern crate maplit;
extern crate rustc_hash;
extern crate smallvec;

#[cfg(test)]
extern crate env_logger;

pub mod span;
pub mod ast;
pub mod scope;
pub mod types;
pub mod diag;
pub mod sema;
