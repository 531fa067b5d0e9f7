//! Abstract syntax produced by the converter.
//!
//! One closed node type covers every `(sort, constructor)` pair. Nodes are
//! immutable and shared through [`Ast`]: a forest node converted once may
//! appear under several parents.

mod node;
mod printer;
mod stats;


pub use node::{Arg, ArgKind, Ast, AstNode, Body, Concrete};
pub use printer::AstPrinter;
pub use stats::Stats;

pub(crate) use stats::Survivors;
