//! Naming conventions of the front-end grammar.

/// Sort and constructor names the converter relies on.
#[derive(Clone, Debug)]
pub struct Config {
    /// Prefix marking internal sorts of the front-end grammar.
    pub(crate) internal_prefix: String,
    pub(crate) expression_sort: String,
    /// Sort normalized to the expression sort (case-insensitive).
    pub(crate) pattern_sort: String,
    pub(crate) statement_sort: String,
    pub(crate) command_sort: String,
    pub(crate) module_sort: String,
    /// Header-only module parse.
    pub(crate) pre_module_sort: String,
    /// Parameterized sort wrapping literals that must never become arguments.
    pub(crate) wrapped_literal_sort: String,
    pub(crate) quoted_constructor: String,
    pub(crate) typed_quoted_constructor: String,
    pub(crate) meta_variable_constructors: Vec<String>,
    /// Registry keys for sorts whose name clashes with another sort.
    pub(crate) sort_renames: Vec<(String, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            internal_prefix: "_".into(),
            expression_sort: "Expression".into(),
            pattern_sort: "Pattern".into(),
            statement_sort: "Statement".into(),
            command_sort: "Command".into(),
            module_sort: "Module".into(),
            pre_module_sort: "PreModule".into(),
            wrapped_literal_sort: "_WrappedLiteral".into(),
            quoted_constructor: "ConcreteQuoted".into(),
            typed_quoted_constructor: "ConcreteTypedQuoted".into(),
            meta_variable_constructors: vec!["MetaVariable".into(), "TypedMetaVariable".into()],
            sort_renames: vec![("Mapping".into(), "Mapping_Expression".into())],
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix of internal sort names.
    pub fn internal_prefix(mut self, value: &str) -> Self {
        self.internal_prefix = value.to_owned();
        self
    }

    pub fn expression_sort(mut self, value: &str) -> Self {
        self.expression_sort = value.to_owned();
        self
    }

    pub fn pattern_sort(mut self, value: &str) -> Self {
        self.pattern_sort = value.to_owned();
        self
    }

    pub fn statement_sort(mut self, value: &str) -> Self {
        self.statement_sort = value.to_owned();
        self
    }

    pub fn command_sort(mut self, value: &str) -> Self {
        self.command_sort = value.to_owned();
        self
    }

    pub fn module_sort(mut self, value: &str) -> Self {
        self.module_sort = value.to_owned();
        self
    }

    pub fn pre_module_sort(mut self, value: &str) -> Self {
        self.pre_module_sort = value.to_owned();
        self
    }

    pub fn wrapped_literal_sort(mut self, value: &str) -> Self {
        self.wrapped_literal_sort = value.to_owned();
        self
    }

    /// Set the constructor names of the plain and type-annotated quote forms.
    pub fn embedding_constructors(mut self, quoted: &str, typed_quoted: &str) -> Self {
        self.quoted_constructor = quoted.to_owned();
        self.typed_quoted_constructor = typed_quoted.to_owned();
        self
    }

    /// Add a constructor name that marks an anti-quote hole.
    pub fn meta_variable_constructor(mut self, value: &str) -> Self {
        self.meta_variable_constructors.push(value.to_owned());
        self
    }

    /// Look up sort `from` under the registry key `to`.
    pub fn rename_sort(mut self, from: &str, to: &str) -> Self {
        self.sort_renames.push((from.to_owned(), to.to_owned()));
        self
    }

    /// Sort name with the internal prefix removed.
    pub fn sort_name<'a>(&self, raw: &'a str) -> &'a str {
        grove_core::utils::strip_prefix(raw, &self.internal_prefix)
    }

    /// Registry key for a raw sort name.
    ///
    /// Patterns share the expression sort; renamed sorts map to their key.
    pub fn sort_key(&self, raw: &str) -> String {
        let name = self.sort_name(raw);
        if name.eq_ignore_ascii_case(&self.pattern_sort) {
            return self.expression_sort.clone();
        }
        let name = grove_core::utils::capitalize(name);
        self.sort_renames
            .iter()
            .find(|(from, _)| *from == name)
            .map_or(name, |(_, to)| to.clone())
    }

    /// Registry key for a raw constructor name.
    pub fn constructor_key(&self, raw: &str) -> String {
        grove_core::utils::capitalize(raw)
    }

    pub fn is_embedding_constructor(&self, name: &str) -> bool {
        name == self.quoted_constructor || name == self.typed_quoted_constructor
    }

    pub fn is_meta_variable_constructor(&self, name: &str) -> bool {
        self.meta_variable_constructors.iter().any(|c| c == name)
    }

    /// Sorts that may hold an embedded concrete fragment.
    pub fn is_embedding_sort(&self, raw: &str) -> bool {
        let name = self.sort_name(raw);
        name == self.expression_sort || name.eq_ignore_ascii_case(&self.pattern_sort)
    }
}
