use std::cell::Cell;
use std::rc::Rc;

use grove_core::{Forest, GrammarSymbol, NodeId, Production};

use crate::Converter;
use crate::ast::{AstNode, AstPrinter, Body};
use crate::error::Error;
use crate::registry::Registry;
use crate::test_utils::{ForestBuilder, dump, dump_with_stats};
use crate::trace::PrintTracer;

/// `x` read as a qualified name and as a negation: two equally good derivations.
fn tied_forest() -> (Forest, NodeId) {
    let mut b = ForestBuilder::new();
    let x = b.lexical("Name", "x");
    let name = b.appl("Expression", "QualifiedName", &[x]);
    let neg = b.appl("Expression", "Negation", &[x]);
    let amb = b.amb(&[name, neg]);
    let root = b.appl("Expression", "Bracket", &[amb]);
    (b.finish(), root)
}

#[test]
fn call_with_arguments() {
    let mut b = ForestBuilder::new();
    let f = b.lexical("Name", "f");
    let open = b.lit("(");
    let one = b.lexical("IntLit", "1");
    let comma = b.lit(",");
    let ws = b.layout(" ");
    let two = b.lexical("IntLit", "2");
    let args_def = GrammarSymbol::iter_star_seps(
        GrammarSymbol::lex("IntLit"),
        vec![
            GrammarSymbol::layouts("LAYOUTLIST"),
            GrammarSymbol::lit(","),
            GrammarSymbol::layouts("LAYOUTLIST"),
        ],
    );
    let args = b.list(args_def, &[one, comma, ws, two]);
    let close = b.lit(")");
    let call = b.appl("Expression", "Call", &[f, open, args, close]);
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_expression(call).unwrap();

    assert!(!ast.stats().ambiguous);
    insta::assert_snapshot!(AstPrinter::new(&ast).with_spans(true).dump(), @r#"
    Expression.Call @0..7
      Name.Lexical "f" @0..1
      [
        IntLit.Lexical "1" @2..3
        IntLit.Lexical "2" @5..6
      ]
    "#);
}

#[test]
fn literals_layout_and_empty_are_not_arguments() {
    let mut b = ForestBuilder::new();
    let lhs = b.lexical("Name", "a");
    let ws1 = b.layout(" ");
    let plus = b.lit("+");
    let wrapped_def =
        GrammarSymbol::ParameterizedSort("_WrappedLiteral".into(), vec![GrammarSymbol::lit("+")]);
    let wrapped = b.appl_with(Production::regular(wrapped_def), &[plus]);
    let ws2 = b.layout(" ");
    let eps = b.empty();
    let rhs = b.lexical("Name", "b");
    let add = b.appl("Expression", "Addition", &[lhs, ws1, wrapped, ws2, eps, rhs]);
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_expression(add).unwrap();

    insta::assert_snapshot!(dump(&ast), @r#"
    Expression.Addition
      Name.Lexical "a"
      Name.Lexical "b"
    "#);
}

#[test]
fn unique_survivor_replaces_ambiguity() {
    let mut b = ForestBuilder::new();
    let x = b.lexical("Name", "x");
    let name = b.appl("Expression", "QualifiedName", &[x]);
    let cycle = b.cycle("Expression");
    let broken = b.appl("Expression", "Bracket", &[x, cycle]);
    let amb = b.amb(&[name, broken]);
    let root = b.appl("Expression", "Negation", &[amb]);
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_expression(root).unwrap();

    insta::assert_snapshot!(dump_with_stats(&ast), @r#"
    Expression.Negation [-]
      Expression.QualifiedName [-]
        Name.Lexical "x" [-]
    "#);
}

#[test]
fn tied_survivors_are_wrapped() {
    let (forest, root) = tied_forest();

    let ast = Converter::new(&forest).convert_expression(root).unwrap();

    assert!(ast.stats().ambiguous);
    insta::assert_snapshot!(dump_with_stats(&ast), @r#"
    Expression.Bracket [ambiguous]
      Expression.Ambiguity [ambiguous]
        Expression.QualifiedName [-]
          Name.Lexical "x" [-]
        Expression.Negation [-]
          Name.Lexical "x" [-]
    "#);
}

#[test]
fn conversion_is_deterministic() {
    let (forest, root) = tied_forest();

    let first = Converter::new(&forest).convert_expression(root).unwrap();
    let second = Converter::new(&forest).convert_expression(root).unwrap();

    assert_eq!(first, second);
    assert_eq!(dump_with_stats(&first), dump_with_stats(&second));
}

#[test]
fn shared_subtree_is_built_once() {
    let mut b = ForestBuilder::new();
    let x = b.lexical("Name", "x");
    let shared = b.appl("Expression", "QualifiedName", &[x]);
    let neg = b.appl("Expression", "Negation", &[shared]);
    let bracket = b.appl("Expression", "Bracket", &[shared]);
    let amb = b.amb(&[neg, bracket]);
    let root = b.appl("Expression", "Bracket", &[amb]);
    let forest = b.finish();

    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut registry = Registry::standard();
    registry
        .register("Expression", "QualifiedName", move |span, args| {
            counter.set(counter.get() + 1);
            Rc::new(AstNode::new(
                "Expression".into(),
                "QualifiedName".into(),
                span,
                Body::Cons(args),
            ))
        })
        .unwrap();

    let ast = Converter::new(&forest)
        .registry(registry)
        .convert_expression(root)
        .unwrap();

    assert_eq!(calls.get(), 1);
    let alts = ast.node_arg(0).unwrap().alternatives();
    assert_eq!(alts.len(), 2);
    assert!(Rc::ptr_eq(
        alts[0].node_arg(0).unwrap(),
        alts[1].node_arg(0).unwrap()
    ));
}

#[test]
fn tied_lists_are_an_error() {
    let mut b = ForestBuilder::new();
    let names = GrammarSymbol::iter_star(GrammarSymbol::lex("Name"));
    let a = b.lexical("Name", "a");
    let c = b.lexical("Name", "b");
    let split = b.list(names.clone(), &[a, c]);
    b.seek(0);
    let ab = b.lexical("Name", "ab");
    let joined = b.list(names, &[ab]);
    let amb = b.amb(&[split, joined]);
    let root = b.appl("Expression", "List", &[amb]);
    let forest = b.finish();

    let err = Converter::new(&forest).convert_expression(root).unwrap_err();

    insta::assert_snapshot!(err, @"ambiguous code at #9 at 0..2");
}

/// `start(Expression)` around `body`, padded with layout.
fn start(b: &mut ForestBuilder, body: NodeId) -> NodeId {
    let ws1 = b.layout(" ");
    let ws2 = b.layout(" ");
    let start = Production::new(
        GrammarSymbol::Start(Box::new(GrammarSymbol::sort("Expression"))),
        None,
        vec![
            GrammarSymbol::layouts("LAYOUTLIST"),
            GrammarSymbol::sort("Expression"),
            GrammarSymbol::layouts("LAYOUTLIST"),
        ],
    );
    b.appl_with(start, &[ws1, body, ws2])
}

#[test]
fn wrapper_root_is_searched() {
    let mut b = ForestBuilder::new();
    b.seek(1);
    let x = b.lexical("Name", "x");
    let expr = b.appl("Expression", "QualifiedName", &[x]);
    b.seek(0);
    let root = start(&mut b, expr);
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_expression(root).unwrap();

    insta::assert_snapshot!(AstPrinter::new(&ast).with_spans(true).dump(), @r#"
    Expression.QualifiedName @1..2
      Name.Lexical "x" @1..2
    "#);
}

#[test]
fn tied_readings_under_start_are_wrapped() {
    let mut b = ForestBuilder::new();
    let x = b.lexical("Name", "x");
    let name = b.appl("Expression", "QualifiedName", &[x]);
    let neg = b.appl("Expression", "Negation", &[x]);
    let amb = b.amb(&[name, neg]);
    let root = start(&mut b, amb);
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_expression(root).unwrap();

    assert!(ast.stats().ambiguous);
    insta::assert_snapshot!(dump_with_stats(&ast), @r#"
    Expression.Ambiguity [ambiguous]
      Expression.QualifiedName [-]
        Name.Lexical "x" [-]
      Expression.Negation [-]
        Name.Lexical "x" [-]
    "#);
}

#[test]
fn cheaper_reading_under_start_wins() {
    let mut b = ForestBuilder::new();
    let open = b.lit("`");
    let id = b.lexical("Id", "x");
    let injected = b.appl("Stat", "Id", &[id]);
    let close = b.lit("`");
    let costly = b.appl("Expression", "ConcreteQuoted", &[open, injected, close]);
    let cheap = b.appl("Expression", "ConcreteQuoted", &[open, id, close]);
    let amb = b.amb(&[costly, cheap]);
    let root = start(&mut b, amb);
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_expression(root).unwrap();

    insta::assert_snapshot!(dump_with_stats(&ast), @r#"
    Expression.ConcreteLexical "x" [fragments=1 size=1]
    "#);
}

#[test]
fn ambiguous_root_takes_first_building_alternative() {
    let mut b = ForestBuilder::new();
    let x = b.lexical("Name", "x");
    let cycle = b.cycle("Expression");
    let broken = b.appl("Expression", "Negation", &[x, cycle]);
    let name = b.appl("Expression", "QualifiedName", &[x]);
    let root = b.amb(&[broken, name]);
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_expression(root).unwrap();

    assert!(ast.is("Expression", "QualifiedName"));
}

#[test]
fn missing_sort_is_syntax_error() {
    let mut b = ForestBuilder::new();
    let x = b.lexical("Name", "x");
    let root = b.appl("Expression", "QualifiedName", &[x]);
    let forest = b.finish();

    let err = Converter::new(&forest).convert_statement(root).unwrap_err();

    insta::assert_snapshot!(err, @"syntax error: expected Statement at 0..1");
}

#[test]
fn filtered_root_is_syntax_error() {
    let mut b = ForestBuilder::new();
    let x = b.lexical("Name", "x");
    let cycle = b.cycle("Expression");
    let root = b.appl("Expression", "Negation", &[x, cycle]);
    let forest = b.finish();

    let err = Converter::new(&forest).convert_expression(root).unwrap_err();

    assert_eq!(
        err,
        Error::Syntax {
            expected: "Expression".into(),
            span: forest.span(root),
        }
    );
}

/// `module m` as a header-only parse.
fn pre_module(b: &mut ForestBuilder, cons: &str) -> NodeId {
    let start = b.cursor();
    let tag_list = b.list(GrammarSymbol::iter_star(GrammarSymbol::sort("Tag")), &[]);
    let tags = b.appl("Tags", "Default", &[tag_list]);
    let keyword = b.lit("module");
    let ws = b.layout(" ");
    let m = b.lexical("Name", "m");
    let parts = b.list(
        GrammarSymbol::iter_plus_seps(GrammarSymbol::lex("Name"), vec![GrammarSymbol::lit("::")]),
        &[m],
    );
    let name = b.appl("QualifiedName", "Default", &[parts]);
    let imports = b.list(GrammarSymbol::iter_star(GrammarSymbol::sort("Import")), &[]);
    let header = b.appl("Header", "Default", &[tags, keyword, ws, name, imports]);
    let node = b.appl("PreModule", cons, &[header]);
    b.seek(start);
    node
}

#[test]
fn header_only_module_gets_empty_body() {
    let mut b = ForestBuilder::new();
    let root = pre_module(&mut b, "Default");
    let forest = b.finish();

    let ast = Converter::new(&forest).convert_module(root).unwrap();

    insta::assert_snapshot!(dump(&ast), @r#"
    Module.Default
      Header.Default
        Tags.Default
          []
        QualifiedName.Default
          [
            Name.Lexical "m"
          ]
        []
      Body.Toplevels
        []
    "#);
}

#[test]
fn module_with_two_readings_is_ambiguous() {
    let mut b = ForestBuilder::new();
    let first = pre_module(&mut b, "Default");
    let second = pre_module(&mut b, "Other");
    let root = b.amb(&[first, second]);
    let forest = b.finish();

    let err = Converter::new(&forest).convert_module(root).unwrap_err();

    assert!(err.is_ambiguous());
}

#[test]
fn trace_shows_caching_and_ranking() {
    let (forest, root) = tied_forest();
    let mut converter = Converter::with_tracer(&forest, PrintTracer::new());

    converter.convert_expression(root).unwrap();
    converter.convert_expression(root).unwrap();

    insta::assert_snapshot!(converter.tracer().dump(), @r"
    enter #5 Expression
    enter #4 Expression
    enter #2 Expression
    enter #1 Name
    enter #3 Expression
    enter #1 Name
    hit   #1 lex
    amb   #4 2 -> 2
    enter #5 Expression
    hit   #5 sort
    ");
}
