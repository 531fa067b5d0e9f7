//! Parse forest arena.
//!
//! A forest is the shared, possibly ambiguous structure a generalized parser
//! produces. Sub-derivations are shared between parents, so the forest is a
//! DAG: node identity is the [`NodeId`] index, never structural equality.
//!
//! Nodes are created through the construction methods on [`Forest`]
//! (`char_node`, `literal_node`, `sort_node`, ...) which follow the parser's
//! node-construction contract, then decorated with spans via
//! [`Forest::set_span`].

use crate::grammar::{Grammar, GrammarSymbol, ProdId, Production};
use crate::span::{Location, PositionStore, Span};

/// Handle to a node in a [`Forest`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shape of a forest node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Single input character.
    Char(u32),
    /// Keyword or punctuation token. Case sensitivity comes from the production.
    Literal { text: String, prod: ProdId },
    /// One concrete derivation.
    Appl { prod: ProdId, children: Vec<NodeId> },
    /// Repetition. `partial` marks a sub-list still to be spliced into its parent list.
    List {
        prod: ProdId,
        children: Vec<NodeId>,
        partial: bool,
    },
    /// Zero or one.
    Opt { prod: ProdId, child: Option<NodeId> },
    /// Competing derivations of one sort over one span, sorted and de-duplicated.
    Amb { alternatives: Vec<NodeId> },
    /// Cut-off point of a degenerate derivation.
    Cycle { depth: u32, prod: ProdId },
    /// Unparsable input kept by error recovery.
    Recovery { text: String },
}

#[derive(Clone, Debug)]
pub struct ForestNode {
    pub kind: NodeKind,
    pub span: Option<Span>,
}

/// Arena of forest nodes together with the production table they reference.
#[derive(Clone, Debug)]
pub struct Forest {
    grammar: Grammar,
    pub(crate) nodes: Vec<ForestNode>,
    source: String,
    positions: Option<PositionStore>,
}

impl Forest {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            nodes: Vec::new(),
            source: String::from("<input>"),
            positions: None,
        }
    }

    /// Name the input and enable line/column resolution for its offsets.
    pub fn with_input(mut self, source: &str, input: &str) -> Self {
        self.source = source.to_owned();
        self.positions = Some(PositionStore::new(input));
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Productions can be added while the forest is being built.
    pub fn grammar_mut(&mut self) -> &mut Grammar {
        &mut self.grammar
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ForestNode { kind, span: None });
        id
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    pub fn char_node(&mut self, code: u32) -> NodeId {
        self.push(NodeKind::Char(code))
    }

    pub fn literal_node(&mut self, text: &str, prod: ProdId) -> NodeId {
        self.push(NodeKind::Literal {
            text: text.to_owned(),
            prod,
        })
    }

    /// Node for a derivation of `prod`.
    ///
    /// Regular productions get their dedicated shape: list productions become
    /// [`NodeKind::List`], optional productions [`NodeKind::Opt`].
    pub fn sort_node(&mut self, children: Vec<NodeId>, prod: ProdId) -> NodeId {
        let production = self.grammar.production(prod);
        let (is_list, is_opt) = (production.is_list(), production.is_opt());
        if is_list {
            return self.list_node(children, prod);
        }
        if is_opt {
            self.assert_opt_children(&children);
            return self.push(NodeKind::Opt {
                prod,
                child: children.first().copied(),
            });
        }
        self.push(NodeKind::Appl { prod, children })
    }

    /// Partial list, spliced into the enclosing list by [`Forest::list_node`].
    pub fn sub_list_node(&mut self, children: Vec<NodeId>, prod: ProdId) -> NodeId {
        self.push(NodeKind::List {
            prod,
            children,
            partial: true,
        })
    }

    /// Complete list. Partial sub-lists of the same production are flattened.
    pub fn list_node(&mut self, children: Vec<NodeId>, prod: ProdId) -> NodeId {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match &self.node(child).kind {
                NodeKind::List {
                    prod: sub,
                    children: elems,
                    partial: true,
                } if *sub == prod => flat.extend_from_slice(elems),
                _ => flat.push(child),
            }
        }
        self.push(NodeKind::List {
            prod,
            children: flat,
            partial: false,
        })
    }

    /// Ambiguity cluster. A single distinct alternative is returned as is.
    ///
    /// # Panics
    /// Panics if `alternatives` is empty.
    pub fn ambiguity_node(&mut self, mut alternatives: Vec<NodeId>) -> NodeId {
        self.assert_alternatives(&alternatives);
        alternatives.sort_unstable();
        alternatives.dedup();
        if let [only] = alternatives[..] {
            return only;
        }
        self.push(NodeKind::Amb { alternatives })
    }

    pub fn cycle_node(&mut self, depth: u32, prod: ProdId) -> NodeId {
        self.push(NodeKind::Cycle { depth, prod })
    }

    /// Cycle inside a list under construction.
    pub fn sub_list_cycle_node(&mut self, prod: ProdId) -> NodeId {
        self.push(NodeKind::Cycle { depth: 1, prod })
    }

    /// Ambiguity between partial lists.
    pub fn sub_list_ambiguity_node(&mut self, alternatives: Vec<NodeId>) -> NodeId {
        self.ambiguity_node(alternatives)
    }

    /// Ambiguity between complete lists of the same span.
    pub fn list_ambiguity_node(&mut self, alternatives: Vec<NodeId>) -> NodeId {
        self.ambiguity_node(alternatives)
    }

    pub fn recovery_node(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Recovery {
            text: text.to_owned(),
        })
    }

    /// Attach position information.
    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.ensure_node_mut(id).span = Some(span);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// # Panics
    /// Panics if `id` was not issued by this forest.
    pub fn node(&self, id: NodeId) -> &ForestNode {
        self.ensure_node(id)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.node(id).span
    }

    /// Span resolved to source name and line/column, when positions are known.
    pub fn location(&self, id: NodeId) -> Option<Location> {
        let span = self.span(id)?;
        let positions = self.positions.as_ref()?;
        Some(Location {
            source: self.source.clone(),
            span,
            begin: positions.line_column(span.offset),
            end: positions.line_column(span.end()),
        })
    }

    /// Ordered children of derivation, list and optional nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Appl { children, .. } | NodeKind::List { children, .. } => children,
            NodeKind::Opt { child, .. } => child.as_slice(),
            _ => &[],
        }
    }

    /// Alternatives of an ambiguity node; empty for anything else.
    pub fn alternatives(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Amb { alternatives } => alternatives,
            _ => &[],
        }
    }

    pub fn production_id(&self, id: NodeId) -> Option<ProdId> {
        match &self.node(id).kind {
            NodeKind::Literal { prod, .. }
            | NodeKind::Appl { prod, .. }
            | NodeKind::List { prod, .. }
            | NodeKind::Opt { prod, .. }
            | NodeKind::Cycle { prod, .. } => Some(*prod),
            _ => None,
        }
    }

    pub fn production_of(&self, id: NodeId) -> Option<&Production> {
        self.production_id(id).map(|prod| self.grammar.production(prod))
    }

    /// Symbol defined by a production.
    pub fn def_symbol(&self, prod: ProdId) -> &GrammarSymbol {
        &self.grammar.production(prod).def
    }

    pub fn is_ambiguity(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Amb { .. })
    }

    pub fn is_appl(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Appl { .. })
    }

    pub fn is_list(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::List { .. })
    }

    /// Ambiguity whose alternatives are lists.
    pub fn is_ambiguous_list(&self, id: NodeId) -> bool {
        self.alternatives(id)
            .first()
            .is_some_and(|&alt| self.is_list(alt))
    }

    pub fn is_lexical(&self, id: NodeId) -> bool {
        self.is_appl(id) && self.production_of(id).is_some_and(Production::is_lexical)
    }

    pub fn is_literal(&self, id: NodeId) -> bool {
        match &self.node(id).kind {
            NodeKind::Literal { .. } => true,
            NodeKind::Appl { .. } => self
                .production_of(id)
                .is_some_and(|p| p.is_literal() || p.is_ci_literal()),
            _ => false,
        }
    }

    pub fn is_layout(&self, id: NodeId) -> bool {
        self.production_of(id).is_some_and(Production::is_layout)
    }

    /// Epsilon derivation.
    pub fn is_empty_node(&self, id: NodeId) -> bool {
        self.production_of(id).is_some_and(Production::is_empty)
    }

    /// Raw sort name of the node's production.
    ///
    /// Ambiguity nodes report the sort of their first alternative; all
    /// alternatives of a cluster share one sort.
    pub fn sort_name(&self, id: NodeId) -> &str {
        match &self.node(id).kind {
            NodeKind::Amb { alternatives } => alternatives
                .first()
                .map_or("", |&alt| self.sort_name(alt)),
            _ => self.production_of(id).map_or("", Production::sort_name),
        }
    }

    pub fn constructor_name(&self, id: NodeId) -> Option<&str> {
        self.production_of(id).and_then(Production::constructor)
    }

    /// Input text covered by a node.
    ///
    /// Ambiguity nodes yield their first alternative: all alternatives
    /// cover the same characters.
    pub fn yield_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_yield(id, &mut out);
        out
    }

    fn write_yield(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Char(code) => out.push(char::from_u32(*code).unwrap_or('\u{FFFD}')),
            NodeKind::Literal { text, .. } | NodeKind::Recovery { text } => out.push_str(text),
            NodeKind::Appl { children, .. } | NodeKind::List { children, .. } => {
                for &child in children {
                    self.write_yield(child, out);
                }
            }
            NodeKind::Opt { child, .. } => {
                if let Some(child) = child {
                    self.write_yield(*child, out);
                }
            }
            NodeKind::Amb { alternatives } => {
                if let Some(&first) = alternatives.first() {
                    self.write_yield(first, out);
                }
            }
            NodeKind::Cycle { .. } => {}
        }
    }
}
