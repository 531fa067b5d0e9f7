use super::*;

#[test]
fn strip_label_looks_through_nesting() {
    let sym = GrammarSymbol::label("x", GrammarSymbol::label("y", GrammarSymbol::sort("E")));
    assert_eq!(sym.strip_label(), &GrammarSymbol::sort("E"));
    assert_eq!(sym.name(), Some("E"));
}

#[test]
fn list_classification() {
    let star = GrammarSymbol::iter_star(GrammarSymbol::sort("E"));
    let plus = GrammarSymbol::iter_plus_seps(GrammarSymbol::sort("E"), vec![GrammarSymbol::lit(",")]);

    assert!(star.is_any_list());
    assert!(!star.is_non_empty_list());
    assert!(plus.is_non_empty_list());
    assert_eq!(plus.element(), Some(&GrammarSymbol::sort("E")));
    assert!(star.separators().is_empty());
}

#[test]
fn matches_ignores_labels_and_lexical_distinction() {
    let sort = GrammarSymbol::sort("Id");
    let lex = GrammarSymbol::label("name", GrammarSymbol::lex("Id"));

    assert!(sort.matches(&lex));
    assert!(!sort.matches(&GrammarSymbol::sort("Other")));
    assert!(!sort.matches(&GrammarSymbol::iter_star(GrammarSymbol::sort("Id"))));
}

#[test]
fn matches_separated_lists_without_layout() {
    let with_layout = GrammarSymbol::iter_star_seps(
        GrammarSymbol::sort("E"),
        vec![
            GrammarSymbol::layouts("L"),
            GrammarSymbol::lit(","),
            GrammarSymbol::layouts("L"),
        ],
    );
    let bare = GrammarSymbol::iter_star_seps(GrammarSymbol::sort("E"), vec![GrammarSymbol::lit(",")]);

    assert!(with_layout.matches(&bare));
}

#[test]
fn injection_requires_single_nonterminal() {
    let inj = Production::context_free("Expression", "Literal", vec![GrammarSymbol::sort("Literal")]);
    let not_inj = Production::context_free("Expression", "Empty", vec![GrammarSymbol::lit("()")]);

    assert!(inj.is_injection());
    assert!(!not_inj.is_injection());
    assert!(!Production::lexical("Name").is_injection());
}

#[test]
fn symbol_display() {
    let sym = GrammarSymbol::iter_plus_seps(
        GrammarSymbol::sort("Expression"),
        vec![GrammarSymbol::layouts("L"), GrammarSymbol::lit(",")],
    );
    assert_eq!(sym.to_string(), "{Expression \",\"}+");

    let prod = Production::context_free(
        "Expression",
        "Call",
        vec![GrammarSymbol::lex("Name"), GrammarSymbol::lit("(")],
    );
    assert_eq!(prod.to_string(), "Expression.Call = Name \"(\"");
}

#[test]
fn add_deduplicates() {
    let mut grammar = Grammar::new("g");
    let a = grammar.add(Production::literal("("));
    let b = grammar.add(Production::literal("("));
    let c = grammar.add(Production::literal(")"));

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(grammar.len(), 2);
}

#[test]
#[should_panic(expected = "production 7 not found")]
fn production_panics_on_foreign_id() {
    let grammar = Grammar::new("g");
    grammar.production(ProdId::from_raw(7));
}
