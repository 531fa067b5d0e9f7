//! Grammar symbol and production definitions.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Symbol of the parser's grammar language.
///
/// Productions define one symbol (`def`) in terms of a sequence of others.
/// Sorts, lexicals and keyword classes are nonterminals; the rest are
/// terminals, layout, or regular (list/optional) symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrammarSymbol {
    /// Context-free nonterminal.
    Sort(String),
    /// Lexical (token-level) nonterminal.
    Lex(String),
    /// Keyword class.
    Keywords(String),
    /// Layout (whitespace, comments).
    Layouts(String),
    /// Case-sensitive literal.
    Lit(String),
    /// Case-insensitive literal.
    CiLit(String),
    /// Epsilon.
    Empty,
    /// Zero or one.
    Opt(Box<GrammarSymbol>),
    /// One or more.
    IterPlus(Box<GrammarSymbol>),
    /// Zero or more.
    IterStar(Box<GrammarSymbol>),
    /// One or more, separated.
    IterPlusSeps(Box<GrammarSymbol>, Vec<GrammarSymbol>),
    /// Zero or more, separated.
    IterStarSeps(Box<GrammarSymbol>, Vec<GrammarSymbol>),
    /// Sort with actual type parameters, e.g. `Foo[Bar]`.
    ParameterizedSort(String, Vec<GrammarSymbol>),
    /// Field label on a right-hand-side symbol.
    Label(String, Box<GrammarSymbol>),
    /// Start symbol wrapper.
    Start(Box<GrammarSymbol>),
}

impl GrammarSymbol {
    pub fn sort(name: impl Into<String>) -> Self {
        Self::Sort(name.into())
    }

    pub fn lex(name: impl Into<String>) -> Self {
        Self::Lex(name.into())
    }

    pub fn lit(text: impl Into<String>) -> Self {
        Self::Lit(text.into())
    }

    pub fn layouts(name: impl Into<String>) -> Self {
        Self::Layouts(name.into())
    }

    pub fn iter_star(elem: GrammarSymbol) -> Self {
        Self::IterStar(Box::new(elem))
    }

    pub fn iter_plus(elem: GrammarSymbol) -> Self {
        Self::IterPlus(Box::new(elem))
    }

    pub fn iter_star_seps(elem: GrammarSymbol, seps: Vec<GrammarSymbol>) -> Self {
        Self::IterStarSeps(Box::new(elem), seps)
    }

    pub fn iter_plus_seps(elem: GrammarSymbol, seps: Vec<GrammarSymbol>) -> Self {
        Self::IterPlusSeps(Box::new(elem), seps)
    }

    pub fn opt(elem: GrammarSymbol) -> Self {
        Self::Opt(Box::new(elem))
    }

    pub fn label(name: impl Into<String>, sym: GrammarSymbol) -> Self {
        Self::Label(name.into(), Box::new(sym))
    }

    /// The symbol without any field label.
    pub fn strip_label(&self) -> &GrammarSymbol {
        match self {
            Self::Label(_, sym) => sym.strip_label(),
            other => other,
        }
    }

    /// Name of a named symbol (sorts, lexicals, keywords, layouts).
    ///
    /// Labels and start wrappers are looked through.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Sort(n)
            | Self::Lex(n)
            | Self::Keywords(n)
            | Self::Layouts(n)
            | Self::ParameterizedSort(n, _) => Some(n),
            Self::Label(_, sym) | Self::Start(sym) => sym.name(),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.strip_label(), Self::Lit(_))
    }

    pub fn is_ci_literal(&self) -> bool {
        matches!(self.strip_label(), Self::CiLit(_))
    }

    pub fn is_layout(&self) -> bool {
        matches!(self.strip_label(), Self::Layouts(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.strip_label(), Self::Empty)
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self.strip_label(), Self::Lex(_) | Self::Keywords(_))
    }

    pub fn is_opt(&self) -> bool {
        matches!(self.strip_label(), Self::Opt(_))
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start(_))
    }

    /// Any of the four repetition forms.
    pub fn is_any_list(&self) -> bool {
        matches!(
            self.strip_label(),
            Self::IterPlus(_) | Self::IterStar(_) | Self::IterPlusSeps(..) | Self::IterStarSeps(..)
        )
    }

    /// Repetitions that require at least one element.
    pub fn is_non_empty_list(&self) -> bool {
        matches!(
            self.strip_label(),
            Self::IterPlus(_) | Self::IterPlusSeps(..)
        )
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(
            self.strip_label(),
            Self::Sort(_) | Self::Lex(_) | Self::Keywords(_) | Self::ParameterizedSort(..)
        )
    }

    /// Element symbol of a list or optional.
    pub fn element(&self) -> Option<&GrammarSymbol> {
        match self.strip_label() {
            Self::Opt(elem)
            | Self::IterPlus(elem)
            | Self::IterStar(elem)
            | Self::IterPlusSeps(elem, _)
            | Self::IterStarSeps(elem, _) => Some(elem),
            _ => None,
        }
    }

    /// Separators of a separated list; empty for everything else.
    pub fn separators(&self) -> &[GrammarSymbol] {
        match self.strip_label() {
            Self::IterPlusSeps(_, seps) | Self::IterStarSeps(_, seps) => seps,
            _ => &[],
        }
    }

    /// Nonterminal equality as seen by quoted patterns.
    ///
    /// Labels are ignored, and a sort matches a lexical or keyword class of
    /// the same name: a pattern's declared type names the nonterminal without
    /// saying how it was defined.
    pub fn matches(&self, other: &GrammarSymbol) -> bool {
        let (a, b) = (self.strip_label(), other.strip_label());
        match (a, b) {
            (
                Self::Sort(x) | Self::Lex(x) | Self::Keywords(x),
                Self::Sort(y) | Self::Lex(y) | Self::Keywords(y),
            ) => x == y,
            (Self::ParameterizedSort(x, xs), Self::ParameterizedSort(y, ys)) => {
                x == y && xs.len() == ys.len() && xs.iter().zip(ys).all(|(p, q)| p.matches(q))
            }
            (Self::Opt(x), Self::Opt(y))
            | (Self::IterPlus(x), Self::IterPlus(y))
            | (Self::IterStar(x), Self::IterStar(y))
            | (Self::Start(x), Self::Start(y)) => x.matches(y),
            (Self::IterPlusSeps(x, xs), Self::IterPlusSeps(y, ys))
            | (Self::IterStarSeps(x, xs), Self::IterStarSeps(y, ys)) => {
                x.matches(y)
                    && xs.iter().filter(|s| !s.is_layout()).eq(ys.iter().filter(|s| !s.is_layout()))
            }
            _ => a == b,
        }
    }
}

impl fmt::Display for GrammarSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sort(n) | Self::Lex(n) | Self::Keywords(n) | Self::Layouts(n) => f.write_str(n),
            Self::Lit(s) => write!(f, "{s:?}"),
            Self::CiLit(s) => write!(f, "'{s}'"),
            Self::Empty => f.write_str("()"),
            Self::Opt(sym) => write!(f, "{sym}?"),
            Self::IterPlus(sym) => write!(f, "{sym}+"),
            Self::IterStar(sym) => write!(f, "{sym}*"),
            Self::IterPlusSeps(sym, seps) => write!(f, "{{{sym}{}}}+", SepList(seps)),
            Self::IterStarSeps(sym, seps) => write!(f, "{{{sym}{}}}*", SepList(seps)),
            Self::ParameterizedSort(n, params) => {
                write!(f, "{n}[")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str("]")
            }
            Self::Label(name, sym) => write!(f, "{sym} {name}"),
            Self::Start(sym) => write!(f, "start[{sym}]"),
        }
    }
}

struct SepList<'a>(&'a [GrammarSymbol]);

impl fmt::Display for SepList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sep in self.0.iter().filter(|s| !s.is_layout()) {
            write!(f, " {sep}")?;
        }
        Ok(())
    }
}

/// Index into a [`Grammar`]'s production table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProdId(u32);

impl ProdId {
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

/// A grammar production: `def = symbols`, optionally named by a constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Production {
    /// The symbol this production defines.
    pub def: GrammarSymbol,
    /// Constructor name of context-free productions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constructor: Option<String>,
    /// Right-hand side, including layout and literal positions.
    #[serde(default)]
    pub symbols: Vec<GrammarSymbol>,
    /// Token-level production, regardless of the defined symbol.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub lexical: bool,
}

impl Production {
    pub fn new(def: GrammarSymbol, constructor: Option<&str>, symbols: Vec<GrammarSymbol>) -> Self {
        Self {
            def,
            constructor: constructor.map(str::to_owned),
            symbols,
            lexical: false,
        }
    }

    /// Context-free production `sort = symbols` named `constructor`.
    pub fn context_free(sort: &str, constructor: &str, symbols: Vec<GrammarSymbol>) -> Self {
        Self::new(GrammarSymbol::sort(sort), Some(constructor), symbols)
    }

    /// Lexical production for the token-level nonterminal `name`.
    pub fn lexical(name: &str) -> Self {
        Self::new(GrammarSymbol::lex(name), None, Vec::new())
    }

    /// Production of a literal token.
    pub fn literal(text: &str) -> Self {
        Self::new(GrammarSymbol::lit(text), None, Vec::new())
    }

    /// Production of a case-insensitive literal token.
    pub fn ci_literal(text: &str) -> Self {
        Self::new(GrammarSymbol::CiLit(text.to_owned()), None, Vec::new())
    }

    /// Production of a layout nonterminal.
    pub fn layout(name: &str) -> Self {
        Self::new(GrammarSymbol::layouts(name), None, Vec::new())
    }

    /// Regular production for a list or optional symbol.
    pub fn regular(def: GrammarSymbol) -> Self {
        Self::new(def, None, Vec::new())
    }

    /// Epsilon production.
    pub fn empty() -> Self {
        Self::new(GrammarSymbol::Empty, None, Vec::new())
    }

    /// Mark as token-level.
    pub fn with_lexical(mut self, lexical: bool) -> Self {
        self.lexical = lexical;
        self
    }

    /// Name of the defined sort; empty for unnamed symbols.
    pub fn sort_name(&self) -> &str {
        self.def.name().unwrap_or("")
    }

    pub fn constructor(&self) -> Option<&str> {
        self.constructor.as_deref()
    }

    pub fn arity(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_lexical(&self) -> bool {
        self.lexical || self.def.is_lexical()
    }

    pub fn is_literal(&self) -> bool {
        self.def.is_literal()
    }

    pub fn is_ci_literal(&self) -> bool {
        self.def.is_ci_literal()
    }

    pub fn is_layout(&self) -> bool {
        self.def.is_layout()
    }

    pub fn is_empty(&self) -> bool {
        self.def.is_empty()
    }

    pub fn is_list(&self) -> bool {
        self.def.is_any_list()
    }

    pub fn is_opt(&self) -> bool {
        self.def.is_opt()
    }

    /// A single-symbol production that only renames its child's type.
    pub fn is_injection(&self) -> bool {
        !self.is_lexical() && self.symbols.len() == 1 && self.symbols[0].is_nonterminal()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.def)?;
        if let Some(cons) = &self.constructor {
            write!(f, ".{cons}")?;
        }
        f.write_str(" =")?;
        for sym in &self.symbols {
            write!(f, " {sym}")?;
        }
        Ok(())
    }
}

/// Append-only production table.
///
/// Identical productions are stored once, so a producer may call
/// [`Grammar::add`] for every node it builds without growing the table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grammar {
    /// Grammar name, for diagnostics.
    pub name: String,
    productions: IndexSet<Production>,
}

impl Grammar {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            productions: IndexSet::new(),
        }
    }

    /// Add a production, returning its id. Existing productions keep their id.
    pub fn add(&mut self, production: Production) -> ProdId {
        let (index, _) = self.productions.insert_full(production);
        ProdId(index as u32)
    }

    pub fn get(&self, id: ProdId) -> Option<&Production> {
        self.productions.get_index(id.index())
    }

    /// Look up a production that must exist.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this grammar.
    pub fn production(&self, id: ProdId) -> &Production {
        self.ensure_production(id)
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProdId, &Production)> {
        self.productions
            .iter()
            .enumerate()
            .map(|(i, p)| (ProdId(i as u32), p))
    }
}
