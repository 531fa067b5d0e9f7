//! Parse forest to AST conversion.
//!
//! A [`Converter`] walks a shared, possibly ambiguous forest and builds one
//! authoritative AST. Competing derivations are ranked by their [`Stats`];
//! equally good survivors are kept under an ambiguity node. Quoted concrete
//! fragments are handed to the lifter (`lift`).
//!
//! Results are memoized per forest node in four side tables. Conversion is
//! context-independent, so filtered results (`None`) are memoized as well.
//!
//! [`Stats`]: crate::ast::Stats

mod build;
mod lift;

#[cfg(test)]
mod convert_tests;
#[cfg(test)]
mod lift_tests;

use std::collections::HashMap;

use grove_core::{Forest, NodeId, NodeKind, Span};

use crate::Result;
use crate::ast::{Arg, Ast, Stats};
use crate::config::Config;
use crate::error::Error;
use crate::registry::Registry;
use crate::trace::{NoopTracer, Tracer};

pub use lift::type_symbol;

/// Forest to AST converter. One instance per forest.
pub struct Converter<'f, T: Tracer = NoopTracer> {
    forest: &'f Forest,
    registry: Registry,
    config: Config,
    tracer: T,
    amb_cache: HashMap<NodeId, Option<Ast>>,
    sort_cache: HashMap<NodeId, Option<Ast>>,
    lex_cache: HashMap<NodeId, Ast>,
    lift_cache: HashMap<NodeId, Option<Ast>>,
    last_success: Option<Span>,
}

impl<'f> Converter<'f, NoopTracer> {
    pub fn new(forest: &'f Forest) -> Self {
        Self::with_tracer(forest, NoopTracer)
    }
}

impl<'f, T: Tracer> Converter<'f, T> {
    pub fn with_tracer(forest: &'f Forest, tracer: T) -> Self {
        Self {
            forest,
            registry: Registry::standard(),
            config: Config::default(),
            tracer,
            amb_cache: HashMap::new(),
            sort_cache: HashMap::new(),
            lex_cache: HashMap::new(),
            lift_cache: HashMap::new(),
            last_success: None,
        }
    }

    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// Span of the most recently built constructor node.
    ///
    /// Best-effort position for reporting a conversion that failed as a whole.
    pub fn last_success(&self) -> Option<Span> {
        self.last_success
    }

    pub fn convert_expression(&mut self, root: NodeId) -> Result<Ast> {
        let sort = self.config.expression_sort.clone();
        self.convert(root, &sort)
    }

    pub fn convert_statement(&mut self, root: NodeId) -> Result<Ast> {
        let sort = self.config.statement_sort.clone();
        self.convert(root, &sort)
    }

    pub fn convert_command(&mut self, root: NodeId) -> Result<Ast> {
        let sort = self.config.command_sort.clone();
        self.convert(root, &sort)
    }

    /// Build the AST of sort `expected` rooted at `root`.
    ///
    /// A start symbol or a derivation root of another sort is treated as a
    /// wrapper and its direct children are searched. An ambiguity found inside
    /// a wrapper is ranked like any other. For an ambiguous root, the first
    /// alternative of the expected sort that builds wins.
    pub fn convert(&mut self, root: NodeId, expected: &str) -> Result<Ast> {
        let forest = self.forest;
        match forest.kind(root) {
            NodeKind::Appl { prod, .. } => {
                if self.sort_of(root) == expected && !forest.def_symbol(*prod).is_start() {
                    return self
                        .build_value(root)?
                        .ok_or_else(|| self.syntax_error(expected, root));
                }
                let inner = self
                    .forest
                    .children(root)
                    .iter()
                    .copied()
                    .filter(|&child| !self.forest.is_layout(child))
                    .find(|&child| {
                        (self.forest.is_appl(child) || self.forest.is_ambiguity(child))
                            && self.sort_of(child) == expected
                    });
                match inner {
                    Some(child) if forest.is_ambiguity(child) => self
                        .build_value(child)?
                        .ok_or_else(|| self.syntax_error(expected, child)),
                    Some(child) => self.convert(child, expected),
                    None => Err(self.syntax_error(expected, root)),
                }
            }
            NodeKind::Amb { alternatives } => {
                for &alt in alternatives {
                    if self.sort_of(alt) != expected {
                        continue;
                    }
                    if let Some(ast) = self.build_value(alt)? {
                        return Ok(ast);
                    }
                }
                Err(self.syntax_error(expected, root))
            }
            other => Err(Error::Implementation(format!(
                "{root} is not a {expected} root: {other:?}"
            ))),
        }
    }

    /// Build a module, accepting header-only parses.
    ///
    /// A header-only parse yields a module with an empty body. An ambiguous
    /// root with more than one complete-module reading is an error.
    pub fn convert_module(&mut self, root: NodeId) -> Result<Ast> {
        let module = self.config.module_sort.clone();
        let pre_module = self.config.pre_module_sort.clone();

        let forest = self.forest;
        let candidate = match forest.kind(root) {
            NodeKind::Appl { .. } => Some(root),
            NodeKind::Amb { alternatives } => {
                let mut modules = alternatives.iter().copied().filter(|&alt| {
                    let sort = self.sort_of(alt);
                    sort == module || sort == pre_module
                });
                let first = modules.next();
                if modules.next().is_some() {
                    return Err(Error::Ambiguous {
                        node: root,
                        span: self.forest.span(root),
                    });
                }
                first
            }
            _ => None,
        };

        match candidate {
            Some(node) if self.sort_of(node) == module => self
                .build_value(node)?
                .ok_or_else(|| self.syntax_error(&module, node)),
            Some(node) if self.sort_of(node) == pre_module => self.build_pre_module(node),
            _ => self.convert(root, &module),
        }
    }

    fn build_pre_module(&mut self, node: NodeId) -> Result<Ast> {
        let header = self
            .ast_children(node)
            .first()
            .copied()
            .ok_or_else(|| Error::Implementation(format!("{node} has no module header")))?;
        let header = self
            .build_value(header)?
            .ok_or_else(|| self.syntax_error("Header", header))?;
        let span = self.forest.span(node);
        let stats = header.stats();
        let body = self
            .registry
            .make("Body", "Toplevels", span, vec![Arg::List(Vec::new())], Stats::ZERO)?;
        self.registry.make(
            &self.config.module_sort,
            "Default",
            span,
            vec![Arg::Node(header), Arg::Node(body)],
            stats,
        )
    }

    /// Sort name with the internal prefix removed.
    fn sort_of(&self, node: NodeId) -> &'f str {
        self.config.sort_name(self.forest.sort_name(node))
    }

    fn syntax_error(&self, expected: &str, node: NodeId) -> Error {
        Error::Syntax {
            expected: expected.to_owned(),
            span: self.forest.span(node).or(self.last_success),
        }
    }
}
