//! AST node registry.
//!
//! Maps `(sort, constructor)` to a factory building the AST node. The
//! standard table is populated from [`SORTS`]; tests and embedders can swap
//! in custom factories per constructor. Every factory call is preceded by a
//! shape check: a mismatch between the built arguments and the declared
//! argument kinds is an [`Error::Implementation`].

mod table;


use std::rc::Rc;

use grove_core::Span;
use indexmap::IndexMap;

use crate::Result;
use crate::ast::{Arg, ArgKind, Ast, AstNode, Body, Stats};
use crate::error::Error;

pub use table::{ConsDef, SORTS, SortDef};

/// Constructor every sort accepts for tied derivations.
pub const AMBIGUITY: &str = "Ambiguity";
/// Constructor of token-level values in lexical sorts.
pub const LEXICAL: &str = "Lexical";

/// Builds an AST node from its span and checked arguments.
pub type Factory = Rc<dyn Fn(Option<Span>, Vec<Arg>) -> Ast>;

struct ConsEntry {
    name: Rc<str>,
    shape: Vec<ArgKind>,
    factory: Option<Factory>,
}

struct SortEntry {
    name: Rc<str>,
    lexical: bool,
    constructors: IndexMap<String, ConsEntry>,
}

#[derive(Default)]
pub struct Registry {
    sorts: IndexMap<String, SortEntry>,
}

impl Registry {
    /// Registry without any sort.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry of the built-in AST definitions.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for def in SORTS {
            registry.define(def);
        }
        registry
    }

    pub fn define(&mut self, def: &SortDef) {
        self.define_sort(def.name, def.lexical);
        for cons in def.constructors {
            self.define_constructor(def.name, cons.name, cons.args);
        }
    }

    /// Add a sort. Its `Ambiguity` constructor (and `Lexical` for lexical
    /// sorts) comes with it.
    pub fn define_sort(&mut self, name: &str, lexical: bool) {
        let entry = self
            .sorts
            .entry(name.to_owned())
            .or_insert_with(|| SortEntry {
                name: Rc::from(name),
                lexical,
                constructors: IndexMap::new(),
            });
        entry.lexical |= lexical;
        if !entry.constructors.contains_key(AMBIGUITY) {
            insert_cons(entry, AMBIGUITY, &[ArgKind::List]);
        }
        if entry.lexical && !entry.constructors.contains_key(LEXICAL) {
            insert_cons(entry, LEXICAL, &[ArgKind::Text]);
        }
    }

    pub fn define_constructor(&mut self, sort: &str, cons: &str, shape: &[ArgKind]) {
        self.define_sort(sort, false);
        if let Some(entry) = self.sorts.get_mut(sort) {
            insert_cons(entry, cons, shape);
        }
    }

    /// Replace the factory of a defined constructor.
    pub fn register(
        &mut self,
        sort: &str,
        cons: &str,
        factory: impl Fn(Option<Span>, Vec<Arg>) -> Ast + 'static,
    ) -> Result<()> {
        let entry = self
            .sorts
            .get_mut(sort)
            .and_then(|s| s.constructors.get_mut(cons))
            .ok_or_else(|| unknown(sort, cons))?;
        entry.factory = Some(Rc::new(factory));
        Ok(())
    }

    pub fn contains(&self, sort: &str, cons: &str) -> bool {
        self.shape(sort, cons).is_some()
    }

    pub fn shape(&self, sort: &str, cons: &str) -> Option<&[ArgKind]> {
        self.sorts
            .get(sort)?
            .constructors
            .get(cons)
            .map(|c| c.shape.as_slice())
    }

    pub fn is_lexical(&self, sort: &str) -> bool {
        self.sorts.get(sort).is_some_and(|s| s.lexical)
    }

    pub fn sorts(&self) -> impl Iterator<Item = &str> {
        self.sorts.keys().map(String::as_str)
    }

    /// Build `sort.cons(args)` with the given cost.
    pub fn make(
        &self,
        sort: &str,
        cons: &str,
        span: Option<Span>,
        args: Vec<Arg>,
        stats: Stats,
    ) -> Result<Ast> {
        let sort_entry = self.sorts.get(sort).ok_or_else(|| unknown(sort, cons))?;
        let entry = sort_entry
            .constructors
            .get(cons)
            .ok_or_else(|| unknown(sort, cons))?;
        check_shape(sort, cons, &entry.shape, &args)?;

        let mut ast = match &entry.factory {
            Some(factory) => factory(span, args),
            None => Rc::new(AstNode::new(
                Rc::clone(&sort_entry.name),
                Rc::clone(&entry.name),
                span,
                default_body(cons, args),
            )),
        };
        if ast.stats() != stats {
            Rc::make_mut(&mut ast).set_stats(stats);
        }
        Ok(ast)
    }

    pub fn make_lexical(&self, sort: &str, span: Option<Span>, text: String) -> Result<Ast> {
        self.make(sort, LEXICAL, span, vec![Arg::Text(text)], Stats::ZERO)
    }

    pub fn make_ambiguity(
        &self,
        sort: &str,
        span: Option<Span>,
        alternatives: Vec<Ast>,
        stats: Stats,
    ) -> Result<Ast> {
        self.make(sort, AMBIGUITY, span, vec![Arg::List(alternatives)], stats)
    }
}

fn insert_cons(entry: &mut SortEntry, cons: &str, shape: &[ArgKind]) {
    entry.constructors.insert(
        cons.to_owned(),
        ConsEntry {
            name: Rc::from(cons),
            shape: shape.to_vec(),
            factory: None,
        },
    );
}

fn default_body(cons: &str, mut args: Vec<Arg>) -> Body {
    match (cons, args.pop()) {
        (AMBIGUITY, Some(Arg::List(alts))) if args.is_empty() => Body::Ambiguity(alts),
        (LEXICAL, Some(Arg::Text(text))) if args.is_empty() => Body::Lexical(text),
        (_, last) => {
            args.extend(last);
            Body::Cons(args)
        }
    }
}

fn check_shape(sort: &str, cons: &str, shape: &[ArgKind], args: &[Arg]) -> Result<()> {
    if shape.len() == args.len() && shape.iter().zip(args).all(|(k, a)| *k == a.kind()) {
        return Ok(());
    }
    Err(Error::Implementation(format!(
        "{sort}.{cons} expects ({}), got ({})",
        kinds(shape.iter().copied()),
        kinds(args.iter().map(Arg::kind))
    )))
}

fn kinds(kinds: impl Iterator<Item = ArgKind>) -> String {
    kinds
        .map(|k| match k {
            ArgKind::Node => "node",
            ArgKind::List => "list",
            ArgKind::Text => "text",
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn unknown(sort: &str, cons: &str) -> Error {
    Error::Implementation(format!("no AST constructor {sort}.{cons}"))
}
