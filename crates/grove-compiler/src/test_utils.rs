//! Test utilities: a forest-building DSL and dump helpers.
//!
//! [`ForestBuilder`] lays tokens out left to right from a cursor, so every
//! node gets the span a parser would give it. Alternatives of an ambiguity
//! cover the same text: [`ForestBuilder::seek`] back before building the next.

use grove_core::{Forest, Grammar, GrammarSymbol, NodeId, ProdId, Production, Span};

use crate::ast::{Ast, AstPrinter};

pub struct ForestBuilder {
    forest: Forest,
    cursor: u32,
}

impl Default for ForestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self {
            forest: Forest::new(Grammar::new("test")),
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn seek(&mut self, offset: u32) {
        self.cursor = offset;
    }

    pub fn prod(&mut self, production: Production) -> ProdId {
        self.forest.grammar_mut().add(production)
    }

    /// Token of the lexical nonterminal `sort`, one char node per character.
    pub fn lexical(&mut self, sort: &str, text: &str) -> NodeId {
        let prod = self.prod(Production::lexical(sort));
        self.token(prod, text)
    }

    pub fn layout(&mut self, text: &str) -> NodeId {
        let prod = self.prod(Production::layout("LAYOUTLIST"));
        self.token(prod, text)
    }

    pub fn lit(&mut self, text: &str) -> NodeId {
        let prod = self.prod(Production::literal(text));
        let node = self.forest.literal_node(text, prod);
        self.advance(node, text)
    }

    /// Epsilon derivation at the cursor.
    pub fn empty(&mut self) -> NodeId {
        let prod = self.prod(Production::empty());
        let node = self.forest.sort_node(Vec::new(), prod);
        self.forest.set_span(node, Span::new(self.cursor, 0));
        node
    }

    /// Context-free derivation; the right-hand side is read off the children.
    pub fn appl(&mut self, sort: &str, cons: &str, children: &[NodeId]) -> NodeId {
        let symbols = children.iter().map(|&c| self.symbol_of(c)).collect();
        self.appl_with(Production::context_free(sort, cons, symbols), children)
    }

    pub fn appl_with(&mut self, production: Production, children: &[NodeId]) -> NodeId {
        let prod = self.prod(production);
        let node = self.forest.sort_node(children.to_vec(), prod);
        self.cover(node, children)
    }

    /// List node for the list symbol `def`.
    pub fn list(&mut self, def: GrammarSymbol, children: &[NodeId]) -> NodeId {
        let prod = self.prod(Production::regular(def));
        let node = self.forest.sort_node(children.to_vec(), prod);
        self.cover(node, children)
    }

    pub fn sub_list(&mut self, def: GrammarSymbol, children: &[NodeId]) -> NodeId {
        let prod = self.prod(Production::regular(def));
        let node = self.forest.sub_list_node(children.to_vec(), prod);
        self.cover(node, children)
    }

    pub fn opt(&mut self, def: GrammarSymbol, child: Option<NodeId>) -> NodeId {
        let prod = self.prod(Production::regular(GrammarSymbol::opt(def)));
        let children: Vec<NodeId> = child.into_iter().collect();
        let node = self.forest.sort_node(children.clone(), prod);
        self.cover(node, &children)
    }

    pub fn amb(&mut self, alternatives: &[NodeId]) -> NodeId {
        let node = self.forest.ambiguity_node(alternatives.to_vec());
        self.cover(node, alternatives)
    }

    pub fn cycle(&mut self, sort: &str) -> NodeId {
        let prod = self.prod(Production::new(GrammarSymbol::sort(sort), None, Vec::new()));
        self.forest.cycle_node(1, prod)
    }

    pub fn finish(self) -> Forest {
        self.forest
    }

    fn token(&mut self, prod: ProdId, text: &str) -> NodeId {
        let chars = text.chars().map(|c| self.forest.char_node(c as u32)).collect();
        let node = self.forest.sort_node(chars, prod);
        self.advance(node, text)
    }

    fn advance(&mut self, node: NodeId, text: &str) -> NodeId {
        let span = Span::new(self.cursor, text.len() as u32);
        self.forest.set_span(node, span);
        self.cursor = span.end();
        node
    }

    fn cover(&mut self, node: NodeId, children: &[NodeId]) -> NodeId {
        let span = children
            .iter()
            .filter_map(|&c| self.forest.span(c))
            .reduce(Span::cover)
            .unwrap_or(Span::new(self.cursor, 0));
        self.forest.set_span(node, span);
        self.cursor = self.cursor.max(span.end());
        node
    }

    fn symbol_of(&self, node: NodeId) -> GrammarSymbol {
        let node = self
            .forest
            .alternatives(node)
            .first()
            .copied()
            .unwrap_or(node);
        self.forest
            .production_of(node)
            .map_or(GrammarSymbol::Empty, |p| p.def.clone())
    }
}

pub fn dump(ast: &Ast) -> String {
    AstPrinter::new(ast).dump()
}

pub fn dump_with_stats(ast: &Ast) -> String {
    AstPrinter::new(ast).with_stats(true).dump()
}
