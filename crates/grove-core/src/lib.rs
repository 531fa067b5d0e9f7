#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared between the parser and the Grove front-end.
//!
//! - **Grammar** (`grammar`): symbols, productions, the production table
//! - **Forest** (`forest`): arena of parse forest nodes and the node-construction contract
//! - **Positions** (`span`): offsets, lengths, line/column resolution

pub mod forest;
pub mod grammar;
pub mod span;
pub mod utils;

mod invariants;

#[cfg(test)]
mod span_tests;

pub use forest::{Forest, ForestNode, NodeId, NodeKind};
pub use grammar::{Grammar, GrammarError, GrammarSymbol, ProdId, Production};
pub use span::{LineColumn, Location, PositionStore, Span};
