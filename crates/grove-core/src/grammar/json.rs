//! JSON loading of production tables.
//!
//! Parsers that build forests for Grove ship their production table as JSON:
//!
//! ```json
//! { "name": "demo",
//!   "productions": [
//!     { "def": { "sort": "Expression" }, "constructor": "call",
//!       "symbols": [ { "lex": "Name" }, { "lit": "(" } ] } ] }
//! ```

use serde::Deserialize;

use super::types::{Grammar, GrammarSymbol, Production};

/// Error during production table loading.
#[derive(Debug)]
pub enum GrammarError {
    Json(serde_json::Error),
    /// A production that is well-formed JSON but not a valid production.
    Invalid { index: usize, reason: String },
}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Invalid { index, reason } => write!(f, "invalid production #{index}: {reason}"),
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl Grammar {
    /// Parse a production table from JSON.
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let raw: RawGrammar = serde_json::from_str(json).map_err(GrammarError::Json)?;
        let mut grammar = Grammar::new(&raw.name);
        for (index, production) in raw.productions.into_iter().enumerate() {
            if let Some(reason) = validate(&production) {
                return Err(GrammarError::Invalid { index, reason });
            }
            grammar.add(production);
        }
        Ok(grammar)
    }

    /// Serialize the production table to pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("grammar serialization should not fail")
    }
}

/// Raw table; productions are validated one by one before insertion.
#[derive(Debug, Deserialize)]
struct RawGrammar {
    #[serde(default)]
    name: String,
    productions: Vec<Production>,
}

fn validate(production: &Production) -> Option<String> {
    let def = production.def.strip_label();

    if production.constructor.is_some()
        && !matches!(def, GrammarSymbol::Sort(_) | GrammarSymbol::ParameterizedSort(..))
    {
        return Some(format!("constructor on non-sort symbol {def}"));
    }

    if production.constructor.as_deref() == Some("") {
        return Some("empty constructor name".to_owned());
    }

    if (def.is_any_list() || def.is_opt()) && !production.symbols.is_empty() {
        return Some(format!("regular symbol {def} takes no right-hand side"));
    }

    None
}
