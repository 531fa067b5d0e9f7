//! Recursive value building and ambiguity filtering.

use grove_core::{GrammarSymbol, NodeId, NodeKind};
use tracing::trace;

use super::Converter;
use crate::Result;
use crate::ast::{Arg, Ast, Stats, Survivors};
use crate::error::Error;
use crate::trace::{CacheKind, Tracer};

impl<T: Tracer> Converter<'_, T> {
    /// Build the AST value of one forest node.
    ///
    /// `Ok(None)` means the derivation was filtered out and a sibling
    /// alternative should be tried instead.
    pub fn build_value(&mut self, node: NodeId) -> Result<Option<Ast>> {
        let forest = self.forest;
        self.tracer.trace_enter(node, forest.sort_name(node));

        match forest.kind(node) {
            NodeKind::Amb { .. } => self.filter_amb(node),
            NodeKind::Appl { .. } => {
                if self.forest.is_lexical(node) {
                    return self.build_lexical(node).map(Some);
                }
                if self.is_embedding(node) {
                    return self.lift(node);
                }
                self.build_context_free(node)
            }
            NodeKind::Cycle { .. } | NodeKind::Recovery { .. } => {
                self.tracer.trace_filtered(node);
                Ok(None)
            }
            NodeKind::List { .. } => Err(Error::Implementation(format!(
                "build_value called on list {node}"
            ))),
            other => Err(Error::Implementation(format!(
                "unexpected {other:?} at {node}"
            ))),
        }
    }

    fn build_lexical(&mut self, node: NodeId) -> Result<Ast> {
        if let Some(cached) = self.lex_cache.get(&node) {
            self.tracer.trace_cache_hit(node, CacheKind::Lexical);
            return Ok(cached.clone());
        }
        let sort = self.sort_key(node)?;
        let ast = self.registry.make_lexical(
            &sort,
            self.forest.span(node),
            self.forest.yield_text(node),
        )?;
        self.lex_cache.insert(node, ast.clone());
        Ok(ast)
    }

    fn build_context_free(&mut self, node: NodeId) -> Result<Option<Ast>> {
        if let Some(cached) = self.sort_cache.get(&node) {
            self.tracer.trace_cache_hit(node, CacheKind::Sort);
            return Ok(cached.clone());
        }

        let cons = self
            .forest
            .constructor_name(node)
            .map(|c| self.config.constructor_key(c))
            .ok_or_else(|| {
                Error::Implementation(format!(
                    "production of {node} has no constructor name: {}",
                    self.forest.production_of(node).map_or_else(String::new, |p| p.to_string())
                ))
            })?;
        let sort = self.sort_key(node)?;

        let mut args = Vec::new();
        let mut total = Stats::ZERO;
        for child in self.ast_children(node) {
            let Some(arg) = self.build_arg(child)? else {
                trace!(node = node.as_u32(), child = child.as_u32(), "argument filtered");
                self.tracer.trace_filtered(node);
                self.sort_cache.insert(node, None);
                return Ok(None);
            };
            total += arg.stats();
            args.push(arg);
        }

        let ast = self
            .registry
            .make(&sort, &cons, self.forest.span(node), args, total)?;
        self.sort_cache.insert(node, Some(ast.clone()));
        if let Some(span) = ast.span() {
            self.last_success = Some(span);
        }
        Ok(Some(ast))
    }

    fn build_arg(&mut self, child: NodeId) -> Result<Option<Arg>> {
        if self.forest.is_list(child) {
            return Ok(self.build_list(child)?.map(Arg::List));
        }
        if self.forest.is_ambiguous_list(child) {
            return Ok(self.filter_list(child)?.map(Arg::List));
        }
        let forest = self.forest;
        if let NodeKind::Opt { child: inner, .. } = forest.kind(child) {
            return match inner {
                None => Ok(Some(Arg::List(Vec::new()))),
                Some(inner) => Ok(self.build_value(*inner)?.map(|v| Arg::List(vec![v]))),
            };
        }
        Ok(self.build_value(child)?.map(Arg::Node))
    }

    /// Resolve an ambiguity cluster by cost.
    ///
    /// An unresolvable ambiguity inside one alternative only aborts that
    /// alternative; it is re-raised when no alternative survives.
    fn filter_amb(&mut self, node: NodeId) -> Result<Option<Ast>> {
        if let Some(cached) = self.amb_cache.get(&node) {
            self.tracer.trace_cache_hit(node, CacheKind::Ambiguity);
            return Ok(cached.clone());
        }

        let forest = self.forest;
        let alternatives = forest.alternatives(node);
        let mut survivors = Survivors::new();
        let mut last_ambiguity = None;
        for &alt in alternatives {
            match self.build_value(alt) {
                Ok(Some(ast)) => {
                    let stats = ast.stats();
                    survivors.offer(ast, stats);
                }
                Ok(None) => {}
                Err(err) if err.is_ambiguous() => last_ambiguity = Some(err),
                Err(err) => return Err(err),
            }
        }
        self.tracer
            .trace_ambiguity(node, alternatives.len(), survivors.len());

        let result = match survivors.len() {
            0 => match last_ambiguity {
                Some(err) => return Err(err),
                None => None,
            },
            1 => survivors.into_items().pop(),
            _ => {
                let sort = self.sort_key(node)?;
                let stats = survivors.best().with_ambiguous(true);
                Some(self.registry.make_ambiguity(
                    &sort,
                    self.forest.span(node),
                    survivors.into_items(),
                    stats,
                )?)
            }
        };
        self.amb_cache.insert(node, result.clone());
        Ok(result)
    }

    /// Elements of a list node, with nested sub-lists spliced in.
    pub(super) fn build_list(&mut self, list: NodeId) -> Result<Option<Vec<Ast>>> {
        let mut result = Vec::new();
        for elem in self.list_elements(list) {
            if self.forest.is_ambiguous_list(elem) {
                match self.filter_list(elem)? {
                    Some(items) => result.extend(items),
                    None => return Ok(None),
                }
            } else if self.forest.is_list(elem) {
                match self.build_list(elem)? {
                    Some(items) => result.extend(items),
                    None => return Ok(None),
                }
            } else {
                match self.build_value(elem)? {
                    Some(item) => result.push(item),
                    None => return Ok(None),
                }
            }
        }
        Ok(Some(result))
    }

    /// Resolve an ambiguity between candidate element sequences.
    ///
    /// A list cannot carry an ambiguity marker, so tied survivors are an error.
    fn filter_list(&mut self, node: NodeId) -> Result<Option<Vec<Ast>>> {
        let forest = self.forest;
        let alternatives = forest.alternatives(node);
        let mut survivors = Survivors::new();
        for &alt in alternatives {
            if let Some(items) = self.build_list(alt)? {
                let stats = items.iter().map(|a| a.stats()).sum();
                survivors.offer(items, stats);
            }
        }
        self.tracer
            .trace_ambiguity(node, alternatives.len(), survivors.len());

        match survivors.len() {
            0 => Ok(None),
            1 => Ok(survivors.into_items().pop()),
            _ => Err(Error::Ambiguous {
                node,
                span: self.forest.span(node),
            }),
        }
    }

    /// Children of a derivation that become constructor arguments.
    ///
    /// Layout is skipped; literal, wrapped-literal and empty children are dropped.
    pub(super) fn ast_children(&self, node: NodeId) -> Vec<NodeId> {
        self.forest
            .children(node)
            .iter()
            .copied()
            .filter(|&child| !self.forest.is_layout(child))
            .filter(|&child| !self.is_syntax_noise(child))
            .collect()
    }

    fn is_syntax_noise(&self, node: NodeId) -> bool {
        if self.forest.is_literal(node) || self.forest.is_empty_node(node) {
            return true;
        }
        self.forest.production_of(node).is_some_and(|prod| {
            matches!(&prod.def, GrammarSymbol::ParameterizedSort(name, _)
                if *name == self.config.wrapped_literal_sort)
        })
    }

    /// Element positions of a list: layout skipped, separators stepped over.
    fn list_elements(&self, list: NodeId) -> Vec<NodeId> {
        let stride = self
            .forest
            .production_of(list)
            .map_or(0, |prod| prod.def.separators().iter().filter(|s| !s.is_layout()).count())
            + 1;
        self.forest
            .children(list)
            .iter()
            .copied()
            .filter(|&child| !self.forest.is_layout(child))
            .step_by(stride)
            .collect()
    }

    pub(super) fn is_embedding(&self, node: NodeId) -> bool {
        self.config.is_embedding_sort(self.forest.sort_name(node))
            && self
                .forest
                .constructor_name(node)
                .is_some_and(|c| self.config.is_embedding_constructor(c))
    }

    /// Registry sort key of a node.
    pub(super) fn sort_key(&self, node: NodeId) -> Result<String> {
        let raw = self.forest.sort_name(node);
        if raw.is_empty() {
            return Err(Error::Implementation(format!(
                "could not retrieve sort name of {node}"
            )));
        }
        Ok(self.config.sort_key(raw))
    }
}
