use petrel_ast::ast::{ChainSeg, ExprKind, Ident};
use petrel_ast::pretty::print_expr;
use petrel_parser::parse_expr;

fn p(src: &str) -> String {
    print_expr(&parse_expr(src).unwrap())
}

#[test]
fn bare_name_is_a_reference() {
    assert_eq!(p("f"), "f");
    assert_eq!(p("m::n::f"), "m::n::f");
}

#[test]
fn call_with_one_argument() {
    assert_eq!(p("f(x)"), "(`f()` x)");
    assert_eq!(p("f()"), "(`f()` ())");
}

#[test]
fn multi_slot_chain_folds_arguments_into_a_tuple() {
    assert_eq!(p("if(c) else(b)"), "(`if() else()` (c, b))");
    assert_eq!(p("drop(n) while(pred)"), "(`drop() while()` (n, pred))");
    assert_eq!(p("f(x)(y)(z)"), "(`f()()()` (x, (y, z)))");
}

#[test]
fn naked_arguments_need_no_parens() {
    assert_eq!(p("f \"x\""), "(f \"x\")");
    assert_eq!(p("f [1; 2]"), "(f [1; 2])");
    assert_eq!(p("f { x }"), "(f (\\_ -> x))");
    assert_eq!(p("f do x"), "(f (\\_ -> x))");
    assert_eq!(p("when(c) then { x }"), "(`when() then` (c, (\\_ -> x)))");
}

#[test]
fn dot_call_passes_receiver_first() {
    assert_eq!(p("x.a"), "(.a x)");
    assert_eq!(p("x.f(y)"), "(`.f()` (x, y))");
    assert_eq!(p("x.f(y)(z)"), "(`.f()()` (x, (y, z)))");
}

#[test]
fn dot_chains_left_associate() {
    assert_eq!(p("x.a.b"), "(.b (.a x))");
    assert_eq!(p("x.a.M::N::B"), "(M::N::.B (.a x))");
    assert_eq!(p("f(x).g(y)"), "(`.g()` ((`f()` x), y))");
}

#[test]
fn partial_chain_binds_no_receiver_and_keeps_order() {
    assert_eq!(p(". a . M::N::b"), "(chain .a M::N::.b)");
    assert_eq!(p(".map(f).filter(g)"), "(chain (`.map()` f) (`.filter()` g))");
    assert_eq!(p(".a"), "(chain .a)");
}

#[test]
fn parenthesized_callee_applies_left_to_right() {
    assert_eq!(p("(f)(x)"), "(f x)");
    assert_eq!(p("(f)(x)(y)"), "((f x) y)");
    assert_eq!(p("[1; 2].len"), "(.len [1; 2])");
}

#[test]
fn comments_separate_chain_words() {
    // never one merged `kl` token: the chain keeps `k` and `l()` apart
    let e = parse_expr("k//comment\nl()").unwrap();
    let ExprKind::Call { func, .. } = &e.kind else { panic!("expected a call") };
    let ExprKind::Var(path) = &func.kind else { panic!("expected a callee path") };
    match &path.ident {
        Ident::Plain { word, chain } => {
            assert_eq!(word, "k");
            assert_eq!(
                chain,
                &vec![ChainSeg::Word("l".to_string()), ChainSeg::Slot],
            );
        }
        other => panic!("expected a plain identifier, got {other:?}"),
    }
    assert_eq!(p("k//comment\nl()"), p("k l()"));
}

#[test]
fn escaped_identifiers_admit_words_and_slots() {
    assert_eq!(p("`take first()`(x)"), "(`take first()` x)");
    assert_eq!(p("`if() else()`(c)(b)"), "(`if() else()` (c, b))");
    assert_eq!(p("`two words`"), "`two words`");
}

#[test]
fn escaped_operators_are_plain_references() {
    assert_eq!(p("`+`"), "+");
    assert_eq!(p("`+`(1, 2)"), "(+ (1, 2))");
    assert_eq!(p("m::`+`"), "m::+");
    assert_eq!(p("`prefix -`"), "`prefix -`");
    assert_eq!(p("f(`<<`)"), "(`f()` <<)");
}

#[test]
fn qualified_call_keeps_segment_order() {
    assert_eq!(p("m::n::f(x)"), "(m::n::`f()` x)");
    let e = parse_expr("outer::inner::g").unwrap();
    let ExprKind::Var(path) = &e.kind else { panic!("expected a reference") };
    assert_eq!(path.mods, vec!["outer".to_string(), "inner".to_string()]);
}
