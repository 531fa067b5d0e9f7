//! Errors raised by conversion and declaration resolution.
//!
//! Filtered derivations are not errors: they surface as `Ok(None)` from the
//! converter and never reach the caller.

use grove_core::{NodeId, Span};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Expected sort not found, or a malformed declaration.
    #[error("syntax error: expected {expected}{}", at(.span))]
    Syntax { expected: String, span: Option<Span> },

    /// More than one derivation survived where exactly one is required.
    #[error("ambiguous code at {node}{}", at(.span))]
    Ambiguous { node: NodeId, span: Option<Span> },

    /// A type declaration that still holds tied readings after conversion.
    #[error("ambiguous declaration{}", at(.span))]
    AmbiguousDeclaration { span: Option<Span> },

    #[error("redeclared type `{name}`")]
    RedeclaredType { name: String },

    #[error("redeclared field `{field}` in constructor `{constructor}`")]
    RedeclaredField { field: String, constructor: String },

    #[error("declaration of `{name}` may not be qualified")]
    IllegalQualifiedDeclaration { name: String },

    #[error("undeclared type `{name}`")]
    UndeclaredType { name: String },

    /// Producer/consumer contract violation. Always a defect, never user error.
    #[error("implementation error: {0}")]
    Implementation(String),
}

impl Error {
    pub fn implementation(message: impl Into<String>) -> Self {
        Self::Implementation(message.into())
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. } | Self::AmbiguousDeclaration { .. })
    }

    pub fn is_undeclared_type(&self) -> bool {
        matches!(self, Self::UndeclaredType { .. })
    }
}

fn at(span: &Option<Span>) -> String {
    span.map(|s| format!(" at {s}")).unwrap_or_default()
}
