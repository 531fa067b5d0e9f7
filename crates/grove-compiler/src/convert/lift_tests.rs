use grove_core::{GrammarSymbol, Production};

use super::type_symbol;
use crate::Converter;
use crate::ast::{Arg, Ast, Stats};
use crate::registry::Registry;
use crate::test_utils::{ForestBuilder, dump_with_stats};
use crate::trace::PrintTracer;

fn lex(sort: &str, text: &str) -> Ast {
    Registry::standard()
        .make_lexical(sort, None, text.to_owned())
        .unwrap()
}

fn node(sort: &str, cons: &str, args: Vec<Arg>) -> Ast {
    Registry::standard()
        .make(sort, cons, None, args, Stats::ZERO)
        .unwrap()
}

fn nonterminal(name: &str) -> Ast {
    node("Sym", "Nonterminal", vec![Arg::Node(lex("Nonterminal", name))])
}

fn symbol_type(sym: Ast) -> Ast {
    node("Type", "Symbol", vec![Arg::Node(sym)])
}

fn typed_variable(ty: Ast, name: &str) -> Ast {
    node(
        "Expression",
        "TypedVariable",
        vec![Arg::Node(ty), Arg::Node(lex("Name", name))],
    )
}

#[test]
fn fragment_mirrors_forest() {
    let mut b = ForestBuilder::new();
    let open = b.lit("`");
    let kw = b.lit("if");
    let ws = b.layout(" ");
    let id = b.lexical("Id", "x");
    let pattern = b.appl("Stat", "If", &[kw, ws, id]);
    let close = b.lit("`");
    let root = b.appl("Expression", "ConcreteQuoted", &[open, pattern, close]);
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_expression(root).unwrap();

    assert!(ast.is_concrete());
    insta::assert_snapshot!(dump_with_stats(&ast), @r#"
    Expression.ConcreteAppl [fragments=1 size=4]
      Expression.ConcreteLiteral "if" [-]
      Expression.ConcreteLexical " " [-]
      Expression.ConcreteLexical "x" [-]
    "#);
}

#[test]
fn injections_and_plus_lists_are_counted() {
    let mut b = ForestBuilder::new();
    let open = b.lit("`");
    let lbrace = b.lit("{");
    let id = b.lexical("Id", "x");
    let stat = b.appl("Stat", "Id", &[id]);
    let stats = b.list(GrammarSymbol::iter_plus(GrammarSymbol::sort("Stat")), &[stat]);
    let rbrace = b.lit("}");
    let block = b.appl("Block", "Default", &[lbrace, stats, rbrace]);
    let close = b.lit("`");
    let root = b.appl("Expression", "ConcreteQuoted", &[open, block, close]);
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_expression(root).unwrap();

    insta::assert_snapshot!(dump_with_stats(&ast), @r#"
    Expression.ConcreteAppl [inj=2 fragments=1 size=3]
      Expression.ConcreteLiteral "{" [-]
      Expression.ConcreteList [inj=2]
        Expression.ConcreteAppl [inj=1]
          Expression.ConcreteLexical "x" [-]
      Expression.ConcreteLiteral "}" [-]
    "#);
}

#[test]
fn fewer_injections_win() {
    let mut b = ForestBuilder::new();
    let open = b.lit("`");
    let id = b.lexical("Id", "x");
    let wrapped = b.appl("Stat", "Id", &[id]);
    let token = b.appl_with(
        Production::context_free("Stat", "Token", vec![GrammarSymbol::lex("Id")])
            .with_lexical(true),
        &[id],
    );
    let pattern = b.amb(&[wrapped, token]);
    let close = b.lit("`");
    let root = b.appl("Expression", "ConcreteQuoted", &[open, pattern, close]);
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_expression(root).unwrap();

    insta::assert_snapshot!(dump_with_stats(&ast), @r#"
    Expression.ConcreteLexical "x" [fragments=1 size=1]
    "#);
}

#[test]
fn tied_fragment_is_ambiguous() {
    let mut b = ForestBuilder::new();
    let open = b.lit("`");
    let id = b.lexical("Id", "x");
    b.seek(1);
    let keyword = b.lexical("Kw", "x");
    let pattern = b.amb(&[id, keyword]);
    let close = b.lit("`");
    let root = b.appl("Expression", "ConcreteQuoted", &[open, pattern, close]);
    let forest = b.finish();

    let err = Converter::new(&forest).convert_expression(root).unwrap_err();

    insta::assert_snapshot!(err, @"ambiguous code at #5 at 1..2");
}

#[test]
fn empty_fragment_is_filtered() {
    let mut b = ForestBuilder::new();
    let open = b.lit("`");
    let close = b.lit("`");
    let root = b.appl("Expression", "ConcreteQuoted", &[open, close]);
    let forest = b.finish();

    let err = Converter::new(&forest).convert_expression(root).unwrap_err();

    insta::assert_snapshot!(err, @"syntax error: expected Expression at 0..2");
}

/// `` `<Stat s>;` `` read as an expression statement and as a block: only the
/// hole expecting `Stat` accepts a `Stat`-typed variable.
#[test]
fn hole_of_wrong_sort_is_rejected() {
    let mut b = ForestBuilder::new();
    let open = b.lit("`");
    let lt = b.lit("<");
    let nt = b.lexical("Nonterminal", "Stat");
    let sym = b.appl("Sym", "Nonterminal", &[nt]);
    let ty = b.appl("Type", "Symbol", &[sym]);
    let ws = b.layout(" ");
    let name = b.lexical("Name", "s");
    let held = b.appl("Expression", "TypedVariable", &[ty, ws, name]);
    let gt = b.lit(">");
    let semi = b.lit(";");
    let hole = |def: &str| {
        Production::new(
            GrammarSymbol::sort(def),
            Some("MetaVariable"),
            vec![
                GrammarSymbol::lit("<"),
                GrammarSymbol::sort("Pattern"),
                GrammarSymbol::lit(">"),
            ],
        )
    };
    let exp_hole = b.appl_with(hole("Exp"), &[lt, held, gt]);
    let exp_stat = b.appl("Stat", "ExpStat", &[exp_hole, semi]);
    let stat_hole = b.appl_with(hole("Stat"), &[lt, held, gt]);
    let block = b.appl("Stat", "Block", &[stat_hole, semi]);
    let pattern = b.amb(&[exp_stat, block]);
    let close = b.lit("`");
    let root = b.appl("Expression", "ConcreteQuoted", &[open, pattern, close]);
    let forest = b.finish();

    let mut converter = Converter::with_tracer(&forest, PrintTracer::new().quiet(true));
    let ast = converter.convert_expression(root).unwrap();

    insta::assert_snapshot!(dump_with_stats(&ast), @r#"
    Expression.ConcreteAppl [holes=1 fragments=1 size=9]
      Expression.TypedVariable [holes=1]
        Type.Symbol [-]
          Sym.Nonterminal [-]
            Nonterminal.Lexical "Stat" [-]
        Name.Lexical "s" [-]
      Expression.ConcreteLiteral ";" [-]
    "#);
    insta::assert_snapshot!(converter.tracer().dump(), @r"
    lift  #22
    hole  #16 rejected
    hit   #13 sort
    amb   #20 2 -> 1
    ");
}

#[test]
fn typed_variable_nesting() {
    let forest = ForestBuilder::new().finish();
    let converter = Converter::new(&forest);
    let stat = GrammarSymbol::sort("Stat");
    let single = typed_variable(symbol_type(nonterminal("Stat")), "s");
    let many = typed_variable(
        symbol_type(node("Sym", "IterStar", vec![Arg::Node(nonterminal("Stat"))])),
        "ss",
    );

    assert!(converter.correctly_nested(&stat, &single));
    assert!(converter.correctly_nested(&GrammarSymbol::iter_star(stat.clone()), &single));
    assert!(converter.correctly_nested(&stat, &many));
    assert!(!converter.correctly_nested(&GrammarSymbol::sort("Exp"), &single));
}

#[test]
fn guarded_pattern_needs_exact_type() {
    let forest = ForestBuilder::new().finish();
    let converter = Converter::new(&forest);
    let stats_type = symbol_type(node("Sym", "IterStar", vec![Arg::Node(nonterminal("Stat"))]));
    let guarded = node(
        "Expression",
        "Guarded",
        vec![Arg::Node(stats_type), Arg::Node(lex("Name", "x"))],
    );
    let plain = node("Expression", "QualifiedName", vec![Arg::Node(lex("Name", "x"))]);

    assert!(!converter.correctly_nested(&GrammarSymbol::sort("Stat"), &guarded));
    assert!(converter.correctly_nested(
        &GrammarSymbol::iter_star(GrammarSymbol::sort("Stat")),
        &guarded
    ));
    assert!(converter.correctly_nested(&GrammarSymbol::sort("Stat"), &plain));
}

#[test]
fn type_symbol_of_symbol_types() {
    let separated = symbol_type(node(
        "Sym",
        "IterSep",
        vec![
            Arg::Node(nonterminal("Exp")),
            Arg::Node(node(
                "Sym",
                "Literal",
                vec![Arg::Node(lex("StringConstant", "\",\""))],
            )),
        ],
    ));
    let labeled = symbol_type(node(
        "Sym",
        "Labeled",
        vec![
            Arg::Node(nonterminal("Exp")),
            Arg::Node(lex("NonterminalLabel", "e")),
        ],
    ));

    assert_eq!(
        type_symbol(&separated),
        Some(GrammarSymbol::iter_plus_seps(
            GrammarSymbol::sort("Exp"),
            vec![GrammarSymbol::lit(",")]
        ))
    );
    assert_eq!(
        type_symbol(&labeled),
        Some(GrammarSymbol::label("e", GrammarSymbol::sort("Exp")))
    );
}

#[test]
fn type_symbol_of_user_and_basic_types() {
    let qualified = node(
        "QualifiedName",
        "Default",
        vec![Arg::List(vec![lex("Name", "lang"), lex("Name", "Exp")])],
    );
    let user = node(
        "Type",
        "User",
        vec![Arg::Node(node("UserType", "Name", vec![Arg::Node(qualified)]))],
    );
    let basic = node("Type", "Basic", vec![Arg::Node(node("BasicType", "Int", vec![]))]);

    assert_eq!(type_symbol(&user), Some(GrammarSymbol::sort("Exp")));
    assert_eq!(type_symbol(&basic), None);
}
