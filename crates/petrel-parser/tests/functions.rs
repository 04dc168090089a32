use petrel_ast::pretty::print_expr;
use petrel_parser::{parse_expr, ParseError};

fn p(src: &str) -> String {
    print_expr(&parse_expr(src).unwrap())
}

#[test]
fn braced_block_is_a_function_literal() {
    assert_eq!(p("{ x }"), "(\\_ -> x)");
    assert_eq!(p("{ |x| x }"), "(\\x -> x)");
    assert_eq!(p("{ |_| 1 }"), "(\\_ -> 1)");
}

#[test]
fn statements_desugar_into_nested_lets() {
    assert_eq!(p("{ f(); x = y; x }"), "(\\_ -> (_ = (`f()` ()); (x = y; x)))");
}

#[test]
fn trailing_semicolon_yields_unit() {
    assert_eq!(p("{ f(); }"), "(\\_ -> (_ = (`f()` ()); ()))");
    assert_eq!(p("{ x = y; }"), "(\\_ -> (x = y; ()))");
    assert_eq!(p("{ }"), "(\\_ -> ())");
}

#[test]
fn equality_statement_is_not_a_binding() {
    assert_eq!(p("{ x == y; }"), "(\\_ -> (_ = (== (x, y)); ()))");
}

#[test]
fn binding_value_may_start_with_a_prefix_run() {
    // `=-` arrives as one operator token; `=` binds, `-` negates the value
    assert_eq!(p("{ x =-y; x }"), "(\\_ -> (x = (`prefix -` y); x))");
}

#[test]
fn binding_requires_semicolon() {
    assert!(matches!(parse_expr("{ x = 1 }"), Err(ParseError::Syntax { .. })));
}

#[test]
fn wildcard_binding_discards() {
    assert_eq!(p("{ _ = f(); 1 }"), "(\\_ -> (_ = (`f()` ()); 1))");
}

#[test]
fn annotated_patterns() {
    assert_eq!(p("{ |x: Int| x }"), "(\\x: Int -> x)");
    assert_eq!(p("{ n: Int = 1; n }"), "(\\_ -> (n: Int = 1; n))");
    assert_eq!(p("{ |xs: List<a>| xs }"), "(\\xs: List<a> -> xs)");
}

#[test]
fn do_form_is_equivalent_to_braces() {
    assert_eq!(p("do x"), "(\\_ -> x)");
    assert_eq!(p("do |acc| acc"), "(\\acc -> acc)");
    assert_eq!(p("do f(); h"), "(\\_ -> (_ = (`f()` ()); h))");
}

#[test]
fn do_form_ends_at_enclosing_delimiters() {
    assert_eq!(p("(do g(); h)"), "(\\_ -> (_ = (`g()` ()); h))");
    assert_eq!(p("f(do g(); h)"), "(`f()` (\\_ -> (_ = (`g()` ()); h)))");
    assert_eq!(p("[(do x); do y]"), "[(\\_ -> x); (\\_ -> y)]");
    assert_eq!(p("do x, do y"), "((\\_ -> x), (\\_ -> y))");
}

#[test]
fn blocks_nest() {
    assert_eq!(p("{ g = { |n| n }; g(1) }"), "(\\_ -> (g = (\\n -> n); (`g()` 1)))");
}

#[test]
fn block_value_may_be_a_tuple() {
    assert_eq!(p("{ 1, 2 }"), "(\\_ -> (1, 2))");
}

#[test]
fn unclosed_block_is_rejected() {
    assert!(matches!(parse_expr("{ x"), Err(ParseError::Syntax { .. })));
}

#[test]
fn missing_param_delimiter_is_rejected() {
    assert!(matches!(parse_expr("{ |x x }"), Err(ParseError::Syntax { .. })));
}
