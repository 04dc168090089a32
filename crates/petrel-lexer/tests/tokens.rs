use petrel_lexer::{lex, lex_skip_comments, Tok};

fn kinds(src: &str) -> Vec<Tok> {
    lex(src).unwrap().into_iter().map(|l| l.tok).collect()
}

fn texts(src: &str) -> Vec<String> {
    lex(src).unwrap().into_iter().map(|l| l.text.to_string()).collect()
}

#[test]
fn comments_are_tokens_not_deletions() {
    // `k` and `l` must never fuse across a comment
    assert_eq!(
        kinds("k//comment\nl()"),
        vec![Tok::Word, Tok::CommentLine, Tok::Word, Tok::LParen, Tok::RParen],
    );
    assert_eq!(texts("k//comment\nl()"), vec!["k", "//comment", "l", "(", ")"]);
}

#[test]
fn skip_comments_drops_only_comments() {
    let toks = lex_skip_comments("a // one\nb", 0).unwrap();
    let texts: Vec<_> = toks.iter().map(|l| l.text).collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn operator_runs_are_maximal() {
    assert_eq!(kinds("a+-b"), vec![Tok::Word, Tok::Op, Tok::Word]);
    assert_eq!(texts("a>>=b"), vec!["a", ">>=", "b"]);
}

#[test]
fn slash_never_joins_an_operator_run() {
    // `=` then a comment, not a single `=//` operator
    assert_eq!(kinds("x =//c\n1"), vec![Tok::Word, Tok::Op, Tok::CommentLine, Tok::Int(1)]);
    assert_eq!(texts("a / b"), vec!["a", "/", "b"]);
}

#[test]
fn numbers_decode_exactly() {
    assert_eq!(kinds("7"), vec![Tok::Int(7)]);
    assert_eq!(kinds("1.5e3"), vec![Tok::Float((15, 2))]);
    assert_eq!(kinds("0.1e-15"), vec![Tok::Float((1, -16))]);
    assert_eq!(kinds("2."), vec![Tok::Float((2, 0))]);
    // no leading-dot floats: that dot belongs to a chain
    assert_eq!(kinds(".5"), vec![Tok::Dot, Tok::Int(5)]);
}

#[test]
fn path_separator_wins_over_colon() {
    assert_eq!(kinds("a::b:c"), vec![Tok::Word, Tok::PathSep, Tok::Word, Tok::Colon, Tok::Word]);
}

#[test]
fn do_is_a_keyword_but_not_a_prefix_of_words() {
    assert_eq!(kinds("do done"), vec![Tok::Do, Tok::Word]);
}

#[test]
fn strings_span_interpolations_with_nested_strings() {
    let src = r#""x=\(f(")"))!" y"#;
    let toks = lex(src).unwrap();
    assert_eq!(toks.len(), 2);
    assert_eq!(toks[0].tok, Tok::Str(true));
    assert_eq!(toks[0].text, r#""x=\(f(")"))!""#);
    assert_eq!(toks[1].text, "y");
}

#[test]
fn unterminated_string_is_flagged() {
    let toks = lex(r#""abc"#).unwrap();
    assert_eq!(toks[0].tok, Tok::Str(false));
}

#[test]
fn escaped_identifiers_lex_whole() {
    let toks = lex("`take first()` x").unwrap();
    assert_eq!(toks[0].tok, Tok::Quoted);
    assert_eq!(toks[0].text, "`take first()`");
    assert_eq!(toks[1].text, "x");
}

#[test]
fn spans_are_absolute_with_a_base_offset() {
    let toks = lex_skip_comments("a b", 10).unwrap();
    assert_eq!(toks[0].span.offset, 10);
    assert_eq!(toks[1].span.offset, 12);
}

#[test]
fn stray_bytes_are_reported() {
    let err = lex("a \u{1}").unwrap_err();
    assert_eq!(err.offset, 2);
}
