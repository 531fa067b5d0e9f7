//! Lifting of quoted concrete fragments.
//!
//! A quoted fragment is mirrored node by node into `Concrete*` AST nodes.
//! Anti-quote holes re-enter the converter to build the expression they hold,
//! which must fit the nonterminal expected at the hole's position.

use std::rc::Rc;

use grove_core::{GrammarSymbol, NodeId, NodeKind};
use tracing::debug;

use super::Converter;
use crate::Result;
use crate::ast::{Ast, AstNode, Concrete, Stats, Survivors};
use crate::error::Error;
use crate::trace::{CacheKind, Tracer};

impl<T: Tracer> Converter<'_, T> {
    /// Lift an embedding node. `Ok(None)` rejects this derivation.
    ///
    /// A lifted fragment must be unambiguous: leftover ambiguity is an error.
    pub(super) fn lift(&mut self, node: NodeId) -> Result<Option<Ast>> {
        if let Some(cached) = self.lift_cache.get(&node) {
            self.tracer.trace_cache_hit(node, CacheKind::Lift);
            return Ok(cached.clone());
        }
        self.tracer.trace_lift(node);

        let forest = self.forest;
        let mut result = None;
        if let Some(pattern) = self.concrete_pattern(node)?
            && let Some(ast) = self.lift_rec(pattern)?
        {
            let stats = Stats {
                concrete_fragment_count: 1,
                concrete_fragment_size: forest.span(pattern).map_or(0, |s| s.length),
                ..ast.stats()
            };
            if stats.ambiguous {
                return Err(Error::Ambiguous {
                    node: pattern,
                    span: forest.span(pattern),
                });
            }
            result = Some(ast.with_stats(stats));
        }

        self.lift_cache.insert(node, result.clone());
        Ok(result)
    }

    /// The quoted pattern: first argument of the plain form, last of the typed form.
    fn concrete_pattern(&self, node: NodeId) -> Result<Option<NodeId>> {
        if self.forest.is_empty_node(node) {
            return Ok(None);
        }
        let cons = self.forest.constructor_name(node).unwrap_or_default();
        let args = self.ast_children(node);
        if cons == self.config.quoted_constructor {
            Ok(args.first().copied())
        } else if cons == self.config.typed_quoted_constructor {
            Ok(args.last().copied())
        } else {
            Err(Error::Implementation(format!(
                "unexpected embedding syntax `{cons}` at {node}"
            )))
        }
    }

    fn lift_rec(&mut self, node: NodeId) -> Result<Option<Ast>> {
        if let Some(cached) = self.lift_cache.get(&node) {
            self.tracer.trace_cache_hit(node, CacheKind::Lift);
            return Ok(cached.clone());
        }

        let forest = self.forest;
        let result = match forest.kind(node) {
            NodeKind::Appl { prod, children } => {
                let production = forest.grammar().production(*prod);
                if let Some(cons) = production.constructor()
                    && self.config.is_meta_variable_constructor(cons)
                {
                    self.lift_variable(node)?.map(|held| {
                        let stats = Stats {
                            ambiguous: held.stats().ambiguous,
                            nested_meta_variables: 1,
                            ..Stats::ZERO
                        };
                        held.with_stats(stats)
                    })
                } else if production.is_lexical() || production.is_layout() {
                    let text = forest.yield_text(node);
                    Some(self.concrete(node, Concrete::Lexical { prod: *prod, text }, Stats::ZERO))
                } else if production.is_literal() || production.is_ci_literal() {
                    let text = forest.yield_text(node);
                    Some(self.concrete(node, Concrete::Literal { prod: *prod, text }, Stats::ZERO))
                } else {
                    let injections = u32::from(production.is_injection());
                    self.lift_children(children)?.map(|(children, stats)| {
                        let stats = stats + Stats { injections, ..Stats::ZERO };
                        self.concrete(node, Concrete::Appl { prod: *prod, children }, stats)
                    })
                }
            }
            NodeKind::List { prod, children, .. } => {
                let non_empty_plus =
                    forest.def_symbol(*prod).is_non_empty_list() && !children.is_empty();
                let injections = u32::from(non_empty_plus);
                self.lift_children(children)?.map(|(children, stats)| {
                    let stats = stats + Stats { injections, ..Stats::ZERO };
                    self.concrete(node, Concrete::List { prod: *prod, children }, stats)
                })
            }
            NodeKind::Opt { prod, child } => {
                self.lift_children(child.as_slice())?
                    .map(|(children, stats)| {
                        self.concrete(node, Concrete::Optional { prod: *prod, children }, stats)
                    })
            }
            NodeKind::Literal { text, prod } => Some(self.concrete(
                node,
                Concrete::Literal {
                    prod: *prod,
                    text: text.clone(),
                },
                Stats::ZERO,
            )),
            NodeKind::Char(code) => Some(self.concrete(node, Concrete::Char(*code), Stats::ZERO)),
            NodeKind::Amb { alternatives } => {
                let mut survivors = Survivors::new();
                for &alt in alternatives {
                    if let Some(ast) = self.lift_rec(alt)? {
                        let stats = ast.stats();
                        survivors.offer(ast, stats);
                    }
                }
                self.tracer
                    .trace_ambiguity(node, alternatives.len(), survivors.len());
                match survivors.len() {
                    0 => None,
                    1 => survivors.into_items().pop(),
                    _ => {
                        let stats = survivors.best().with_ambiguous(true);
                        let alts = survivors.into_items();
                        Some(self.concrete(node, Concrete::Amb(alts), stats))
                    }
                }
            }
            NodeKind::Cycle { .. } | NodeKind::Recovery { .. } => None,
        };

        self.lift_cache.insert(node, result.clone());
        Ok(result)
    }

    fn lift_children(&mut self, children: &[NodeId]) -> Result<Option<(Vec<Ast>, Stats)>> {
        let mut lifted = Vec::with_capacity(children.len());
        let mut stats = Stats::ZERO;
        for &child in children {
            let Some(ast) = self.lift_rec(child)? else {
                return Ok(None);
            };
            stats += ast.stats();
            lifted.push(ast);
        }
        Ok(Some((lifted, stats)))
    }

    fn concrete(&self, node: NodeId, concrete: Concrete, stats: Stats) -> Ast {
        AstNode::concrete(
            Rc::from(self.config.expression_sort.as_str()),
            self.forest.span(node),
            concrete,
            stats,
        )
    }

    /// Build the expression held by an anti-quote hole.
    fn lift_variable(&mut self, node: NodeId) -> Result<Option<Ast>> {
        let forest = self.forest;
        let expected = forest
            .production_of(node)
            .map(|p| p.def.clone())
            .ok_or_else(|| Error::Implementation(format!("anti-quote {node} has no production")))?;
        let held = self
            .ast_children(node)
            .last()
            .copied()
            .ok_or_else(|| Error::Implementation(format!("anti-quote {node} holds no expression")))?;

        if forest.is_ambiguity(held) {
            return self.filter_nested_pattern(node, held, &expected);
        }
        match self.build_value(held)? {
            Some(exp) if self.correctly_nested(&expected, &exp) => Ok(Some(exp)),
            _ => {
                debug!(node = node.as_u32(), %expected, "anti-quote rejected");
                self.tracer.trace_meta_variable_rejected(node);
                Ok(None)
            }
        }
    }

    /// Keep the alternatives of an ambiguous hole that fit its position.
    ///
    /// Alternatives that directly nest another quoted fragment are dropped.
    fn filter_nested_pattern(
        &mut self,
        anti_quote: NodeId,
        held: NodeId,
        expected: &GrammarSymbol,
    ) -> Result<Option<Ast>> {
        let forest = self.forest;
        let mut fitting: Vec<Ast> = Vec::new();
        for &alt in forest.alternatives(held) {
            if self.is_embedding(alt) {
                continue;
            }
            if let Some(exp) = self.build_value(alt)?
                && self.correctly_nested(expected, &exp)
            {
                fitting.push(exp);
            }
        }

        match fitting.len() {
            0 => {
                self.tracer.trace_meta_variable_rejected(anti_quote);
                Ok(None)
            }
            1 => Ok(fitting.pop()),
            _ => {
                let stats = fitting[0].stats().with_ambiguous(true);
                let ast = self.registry.make_ambiguity(
                    &self.config.expression_sort,
                    forest.span(anti_quote),
                    fitting,
                    stats,
                )?;
                Ok(Some(ast))
            }
        }
    }

    /// Does a hole's expression produce the nonterminal its position expects?
    ///
    /// Typed variables may also name the element of an expected list or
    /// optional, or a list or optional of the expected element. Guarded
    /// patterns must match exactly. Anything else fits.
    pub(super) fn correctly_nested(&self, expected: &GrammarSymbol, exp: &Ast) -> bool {
        let sort = self.config.expression_sort.as_str();
        let declared = || exp.node_arg(0).and_then(type_symbol);

        if exp.is(sort, "TypedVariable") {
            let Some(declared) = declared() else {
                return false;
            };
            declared.matches(expected)
                || declared.element().is_some_and(|elem| elem.matches(expected))
                || expected.element().is_some_and(|elem| elem.matches(&declared))
        } else if exp.is(sort, "Guarded") {
            declared().is_some_and(|declared| declared.matches(expected))
        } else {
            true
        }
    }
}

/// Grammar symbol named by a `Type` AST, if it names one.
pub fn type_symbol(ty: &Ast) -> Option<GrammarSymbol> {
    match (ty.sort(), ty.constructor()) {
        ("Type", "Symbol") => sym_symbol(ty.node_arg(0)?),
        ("Type", "Bracket") => type_symbol(ty.node_arg(0)?),
        ("Type", "User") => {
            let user = ty.node_arg(0)?;
            let name = qualified_name_tail(user.node_arg(0)?)?;
            match user.constructor() {
                "Name" => Some(GrammarSymbol::Sort(name)),
                "Parametric" => {
                    let params = user
                        .list_arg(1)?
                        .iter()
                        .map(type_symbol)
                        .collect::<Option<Vec<_>>>()?;
                    Some(GrammarSymbol::ParameterizedSort(name, params))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn sym_symbol(sym: &Ast) -> Option<GrammarSymbol> {
    if sym.sort() != "Sym" {
        return None;
    }
    let arg = |i: usize| sym.node_arg(i);
    let inner = |i: usize| arg(i).and_then(sym_symbol);
    let symbol = match sym.constructor() {
        "Nonterminal" => GrammarSymbol::Sort(arg(0)?.text()?.to_owned()),
        "Parametrized" => {
            let params = sym
                .list_arg(1)?
                .iter()
                .map(sym_symbol)
                .collect::<Option<Vec<_>>>()?;
            GrammarSymbol::ParameterizedSort(arg(0)?.text()?.to_owned(), params)
        }
        "Iter" => GrammarSymbol::iter_plus(inner(0)?),
        "IterStar" => GrammarSymbol::iter_star(inner(0)?),
        "IterSep" => GrammarSymbol::iter_plus_seps(inner(0)?, vec![inner(1)?]),
        "IterStarSep" => GrammarSymbol::iter_star_seps(inner(0)?, vec![inner(1)?]),
        "Optional" => GrammarSymbol::opt(inner(0)?),
        "Labeled" => GrammarSymbol::label(arg(1)?.text()?, inner(0)?),
        "Literal" => GrammarSymbol::lit(unquote(arg(0)?.text()?)),
        "CaseInsensitiveLiteral" => GrammarSymbol::CiLit(unquote(arg(0)?.text()?).to_owned()),
        "Empty" => GrammarSymbol::Empty,
        _ => return None,
    };
    Some(symbol)
}

/// Last segment of a `QualifiedName`.
fn qualified_name_tail(name: &Ast) -> Option<String> {
    let last = name.list_arg(0)?.last()?;
    last.text().map(str::to_owned)
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}
