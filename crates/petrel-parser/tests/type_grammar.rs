use petrel_ast::ast::TypeKind;
use petrel_ast::pretty::print_type;
use petrel_parser::{parse_type, ParseError};

fn p(src: &str) -> String {
    print_type(&parse_type(src).unwrap())
}

#[test]
fn function_types_curry_to_the_right() {
    assert_eq!(p("A -> B -> C"), "(A -> (B -> C))");
    assert_eq!(p("(A -> B) -> C"), "((A -> B) -> C)");
}

#[test]
fn omitted_effect_defaults_to_pure() {
    let t = parse_type("A -> B").unwrap();
    let TypeKind::Fun { eff, .. } = &t.kind else { panic!("expected function type") };
    assert!(matches!(eff.kind, TypeKind::Pure));
}

#[test]
fn effect_annotation_sits_between_bang_and_arrow() {
    assert_eq!(p("A !E -> B"), "(A !E -> B)");
    assert_eq!(p("A !e -> B -> C"), "(A !e -> (B -> C))");
}

#[test]
fn generic_application_left_associates() {
    assert_eq!(p("Foo<A><B>"), "Foo<A><B>");
    let t = parse_type("Foo<A><B>").unwrap();
    let TypeKind::Apply { base, .. } = &t.kind else { panic!("expected application") };
    assert!(matches!(base.kind, TypeKind::Apply { .. }));
}

#[test]
fn adjacent_angle_brackets_split() {
    // `>>` and `><` arrive as single operator tokens and are split here
    assert_eq!(p("Foo<Bar<Baz>>"), "Foo<Bar<Baz>>");
    assert_eq!(p("Pair<Foo<A>><B>"), "Pair<Foo<A>><B>");
}

#[test]
fn intersections_nest_to_the_left() {
    assert_eq!(p("A | B | C"), "((A | B) | C)");
    assert_eq!(p("A | B -> C"), "((A | B) -> C)");
}

#[test]
fn tuple_types_nest_to_the_right() {
    assert_eq!(p("A, B, C"), "(A, (B, C))");
    assert_eq!(p("A, B -> C, D"), "(A, ((B -> C), D))");
}

#[test]
fn atoms_keywords_and_variables() {
    assert_eq!(p("()"), "()");
    assert_eq!(p("pure"), "pure");
    assert_eq!(p("never"), "never");
    assert_eq!(p("a"), "a");
    assert_eq!(p("Foo"), "Foo");
    assert_eq!(p("m::n::Foo"), "m::n::Foo");
    assert_eq!(p("m::Foo<a>"), "m::Foo<a>");
}

#[test]
fn lowercase_qualified_names_are_atoms_not_variables() {
    let t = parse_type("m::foo").unwrap();
    assert!(matches!(t.kind, TypeKind::Atom(_)));
    let v = parse_type("foo").unwrap();
    assert!(matches!(v.kind, TypeKind::Var(_)));
}

#[test]
fn generic_argument_may_be_any_type() {
    assert_eq!(p("Foo<A -> B>"), "Foo<(A -> B)>");
    assert_eq!(p("Foo<A, B>"), "Foo<(A, B)>");
    assert_eq!(p("Result<Ok | Err>"), "Result<(Ok | Err)>");
}

#[test]
fn never_in_function_position() {
    assert_eq!(p("A -> never"), "(A -> never)");
    assert_eq!(p("() !io -> ()"), "(() !io -> ())");
}

#[test]
fn malformed_types_are_rejected() {
    assert!(matches!(parse_type("->"), Err(ParseError::Syntax { .. })));
    assert!(matches!(parse_type("Foo<A"), Err(ParseError::Syntax { .. })));
    assert!(matches!(parse_type("A !E B"), Err(ParseError::Syntax { .. })));
    assert!(matches!(parse_type("A |"), Err(ParseError::Syntax { .. })));
}
