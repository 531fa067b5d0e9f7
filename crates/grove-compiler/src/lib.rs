//! Grove compiler front-end: forest disambiguation and declaration resolution.
//!
//! - `ast` - abstract syntax nodes, derivation cost (`Stats`), printer
//! - `registry` - `(sort, constructor)` to AST factory table
//! - `convert` - parse forest to AST conversion, including quoted fragment lifting
//! - `declare` - data type, alias and constructor declarations with forward references
//! - `config` - grammar naming conventions
//! - `trace` - conversion tracing

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod ast;
pub mod config;
pub mod convert;
pub mod declare;
pub mod error;
pub mod registry;
pub mod trace;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
pub mod test_utils;

pub use ast::{Arg, ArgKind, Ast, AstNode, AstPrinter, Body, Concrete, Stats};
pub use config::Config;
pub use convert::Converter;
pub use declare::{TypeEnv, TypeStore, evaluate_declarations, evaluate_toplevels};
pub use error::Error;
pub use registry::Registry;
pub use trace::{NoopTracer, PrintTracer, Tracer};

/// Result type for conversion and declaration operations.
pub type Result<T> = std::result::Result<T, Error>;
