use std::rc::Rc;

use grove_core::{ProdId, Span};

use super::Stats;

/// Shared, immutable AST node.
pub type Ast = Rc<AstNode>;

/// Shape of one constructor argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Node,
    List,
    Text,
}

/// Built constructor argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Node(Ast),
    List(Vec<Ast>),
    Text(String),
}

impl Arg {
    pub fn kind(&self) -> ArgKind {
        match self {
            Self::Node(_) => ArgKind::Node,
            Self::List(_) => ArgKind::List,
            Self::Text(_) => ArgKind::Text,
        }
    }

    pub fn as_node(&self) -> Option<&Ast> {
        match self {
            Self::Node(ast) => Some(ast),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Ast]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Cost of everything this argument holds.
    pub fn stats(&self) -> Stats {
        match self {
            Self::Node(ast) => ast.stats(),
            Self::List(items) => items.iter().map(|a| a.stats()).sum(),
            Self::Text(_) => Stats::ZERO,
        }
    }
}

/// Mirror of forest shape inside a lifted concrete fragment.
#[derive(Clone, Debug, PartialEq)]
pub enum Concrete {
    Appl { prod: ProdId, children: Vec<Ast> },
    List { prod: ProdId, children: Vec<Ast> },
    Optional { prod: ProdId, children: Vec<Ast> },
    Lexical { prod: ProdId, text: String },
    Literal { prod: ProdId, text: String },
    Amb(Vec<Ast>),
    Char(u32),
}

impl Concrete {
    fn constructor(&self) -> &'static str {
        match self {
            Self::Appl { .. } => "ConcreteAppl",
            Self::List { .. } => "ConcreteList",
            Self::Optional { .. } => "ConcreteOptional",
            Self::Lexical { .. } => "ConcreteLexical",
            Self::Literal { .. } => "ConcreteLiteral",
            Self::Amb(_) => "ConcreteAmb",
            Self::Char(_) => "ConcreteChar",
        }
    }

    pub fn children(&self) -> &[Ast] {
        match self {
            Self::Appl { children, .. }
            | Self::List { children, .. }
            | Self::Optional { children, .. }
            | Self::Amb(children) => children,
            _ => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Ordinary constructor application.
    Cons(Vec<Arg>),
    /// Token-level value.
    Lexical(String),
    /// Equally good derivations that could not be told apart.
    Ambiguity(Vec<Ast>),
    /// Lifted concrete syntax.
    Concrete(Concrete),
}

/// Node tagged by `(sort, constructor)`.
#[derive(Clone, Debug, PartialEq)]
pub struct AstNode {
    sort: Rc<str>,
    constructor: Rc<str>,
    span: Option<Span>,
    stats: Stats,
    body: Body,
}

impl AstNode {
    pub fn new(sort: Rc<str>, constructor: Rc<str>, span: Option<Span>, body: Body) -> Self {
        Self {
            sort,
            constructor,
            span,
            stats: Stats::ZERO,
            body,
        }
    }

    /// Lifted fragment node. Concrete syntax always lives in the expression sort.
    pub fn concrete(sort: Rc<str>, span: Option<Span>, concrete: Concrete, stats: Stats) -> Ast {
        let constructor = Rc::from(concrete.constructor());
        Rc::new(Self {
            sort,
            constructor,
            span,
            stats,
            body: Body::Concrete(concrete),
        })
    }

    pub fn sort(&self) -> &str {
        &self.sort
    }

    pub fn constructor(&self) -> &str {
        &self.constructor
    }

    pub fn is(&self, sort: &str, constructor: &str) -> bool {
        *self.sort == *sort && *self.constructor == *constructor
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Constructor arguments; empty for every other body.
    pub fn args(&self) -> &[Arg] {
        match &self.body {
            Body::Cons(args) => args,
            _ => &[],
        }
    }

    pub fn arg(&self, index: usize) -> Option<&Arg> {
        self.args().get(index)
    }

    pub fn node_arg(&self, index: usize) -> Option<&Ast> {
        self.arg(index).and_then(Arg::as_node)
    }

    pub fn list_arg(&self, index: usize) -> Option<&[Ast]> {
        self.arg(index).and_then(Arg::as_list)
    }

    /// Text of a lexical node.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Body::Lexical(text) => Some(text),
            Body::Concrete(Concrete::Lexical { text, .. } | Concrete::Literal { text, .. }) => {
                Some(text)
            }
            _ => None,
        }
    }

    pub fn alternatives(&self) -> &[Ast] {
        match &self.body {
            Body::Ambiguity(alts) | Body::Concrete(Concrete::Amb(alts)) => alts,
            _ => &[],
        }
    }

    pub fn is_ambiguity(&self) -> bool {
        matches!(
            self.body,
            Body::Ambiguity(_) | Body::Concrete(Concrete::Amb(_))
        )
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self.body, Body::Concrete(_))
    }

    /// Same node with a different cost.
    pub fn with_stats(self: &Rc<Self>, stats: Stats) -> Ast {
        if self.stats == stats {
            return Rc::clone(self);
        }
        let mut node = AstNode::clone(self);
        node.stats = stats;
        Rc::new(node)
    }

    pub(crate) fn set_stats(&mut self, stats: Stats) {
        self.stats = stats;
    }
}
