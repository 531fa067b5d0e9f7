//! Type declarations: data types, aliases, constructors and keyword parameters.
//!
//! Declarations may reference types declared later in the module. Evaluation
//! retries such declarations until no further progress is possible; see
//! `resolver` for the phase order.

mod model;
mod resolver;
mod types;


pub use model::{
    AliasDecl, DataAbstractDecl, DataDecl, Declaration, KeywordFormal, QualifiedName, TypeArg,
    TypeExpr, TypeVar, UserType, Variant, collect_declarations,
};
pub use types::{
    AdtDef, AliasDef, BasicType, ConstructorDef, Field, KeywordOwner, KeywordParameter, Type,
    TypeEnv, TypeStore,
};

use crate::Result;
use crate::ast::Ast;

/// Declare every type, constructor and keyword parameter of `declarations`
/// into `store`, in dependency order.
pub fn evaluate_declarations(declarations: &[Declaration], store: &mut impl TypeStore) -> Result<()> {
    resolver::Resolver::new(store).evaluate(declarations)
}

/// Collect the type declarations among module toplevels and evaluate them.
pub fn evaluate_toplevels(toplevels: &[Ast], store: &mut impl TypeStore) -> Result<()> {
    let declarations = collect_declarations(toplevels)?;
    tracing::debug!(count = declarations.len(), "evaluating type declarations");
    evaluate_declarations(&declarations, store)
}
