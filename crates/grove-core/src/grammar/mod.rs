//! Grammar model: symbols and productions of the parser's grammar.
//!
//! Forest nodes refer to productions by [`ProdId`]; the [`Grammar`] table owns
//! the productions and can be loaded from JSON.

mod invariants;
mod json;
mod types;

#[cfg(test)]
mod types_tests;

pub use json::GrammarError;
pub use types::{Grammar, GrammarSymbol, ProdId, Production};
