use logos::{Lexer, Logos};
use petrel_ast::span::Span;

#[derive(Debug, Logos, PartialEq, Clone)]
pub enum Tok {
    // Whitespace is skipped
    #[regex(r"[ \t\r\n]+", logos::skip)]
    _Whitespace,

    // Line comments are preserved in the token stream; the parser filters
    // them, so a comment is always a hard token boundary.
    #[regex(r"//[^\n]*", priority = 10)]
    CommentLine,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    // Note: '::' must be matched before ':'
    #[token("::")]
    PathSep,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,

    #[token("do")]
    Do,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    // Escaped identifier: backticks admit embedded whitespace, words,
    // slots and operator symbols literally.
    #[regex(r"`[^`]*`")]
    Quoted,

    // Floats require a trailing decimal point; the value is kept as an
    // exact (mantissa, base-10 exponent) pair, never converted through f64.
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", parse_float, priority = 5)]
    Float((u64, i32)),

    #[regex(r"[0-9]+", parse_int)]
    Int(u64),

    // The payload records whether the closing quote was found; extent is
    // scanned by hand because interpolation makes strings non-regular.
    #[token("\"", scan_string)]
    Str(bool),

    // Maximal runs of operator symbols. '/' never joins a run: '//' opens
    // a comment, so '/' stands alone.
    #[regex(r"[+\-*<>=!&|^%~?@$]+", priority = 3)]
    #[token("/")]
    Op,
}

fn parse_int(lex: &mut Lexer<Tok>) -> Option<u64> {
    lex.slice().parse::<u64>().ok()
}

fn parse_float(lex: &mut Lexer<Tok>) -> Option<(u64, i32)> {
    let raw = lex.slice();
    let (mantissa_part, exp_part) = match raw.find(['e', 'E']) {
        Some(i) => (&raw[..i], &raw[i + 1..]),
        None => (raw, ""),
    };
    let dot = mantissa_part.find('.')?;
    let int_digits = &mantissa_part[..dot];
    let frac_digits = &mantissa_part[dot + 1..];
    let mut digits = String::with_capacity(int_digits.len() + frac_digits.len());
    digits.push_str(int_digits);
    digits.push_str(frac_digits);
    let mantissa = digits.parse::<u64>().ok()?;
    let written_exp = if exp_part.is_empty() { 0i32 } else { exp_part.parse::<i32>().ok()? };
    let exp10 = written_exp.checked_sub(frac_digits.len() as i32)?;
    Some((mantissa, exp10))
}

fn scan_string(lex: &mut Lexer<Tok>) -> Option<bool> {
    let (used, terminated) = string_extent(lex.remainder());
    lex.bump(used);
    Some(terminated)
}

#[derive(Clone, Copy, PartialEq)]
enum Frame {
    Str,
    Paren,
}

// Shared walker for string extents. `rem` starts just after the opening
// quote; returns (bytes consumed incl. the closing quote, terminated).
fn string_extent(rem: &str) -> (usize, bool) {
    let mut stack = vec![Frame::Str];
    let mut it = rem.char_indices();
    while let Some((i, c)) = it.next() {
        match stack.last() {
            Some(Frame::Str) => match c {
                '\\' => {
                    if let Some((_, esc)) = it.next() {
                        if esc == '(' {
                            stack.push(Frame::Paren);
                        }
                    } else {
                        return (rem.len(), false);
                    }
                }
                '"' => {
                    stack.pop();
                    if stack.is_empty() {
                        return (i + 1, true);
                    }
                }
                _ => {}
            },
            Some(Frame::Paren) => match c {
                '(' => stack.push(Frame::Paren),
                ')' => {
                    stack.pop();
                }
                '"' => stack.push(Frame::Str),
                _ => {}
            },
            None => unreachable!(),
        }
    }
    (rem.len(), false)
}

/// Byte offset of the `)` closing an interpolation escape. `rem` starts just
/// after `\(`. Balances nested parentheses and skips over nested strings.
pub fn interp_extent(rem: &str) -> Option<usize> {
    let mut stack = vec![Frame::Paren];
    let mut it = rem.char_indices();
    while let Some((i, c)) = it.next() {
        match stack.last() {
            Some(Frame::Paren) => match c {
                '(' => stack.push(Frame::Paren),
                ')' => {
                    stack.pop();
                    if stack.is_empty() {
                        return Some(i);
                    }
                }
                '"' => stack.push(Frame::Str),
                _ => {}
            },
            Some(Frame::Str) => match c {
                '\\' => {
                    let (_, esc) = it.next()?;
                    if esc == '(' {
                        stack.push(Frame::Paren);
                    }
                }
                '"' => {
                    stack.pop();
                }
                _ => {}
            },
            None => unreachable!(),
        }
    }
    None
}

#[derive(Debug, Clone)]
pub struct Lexed<'a> {
    pub tok: Tok,
    pub span: Span,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexFault {
    pub offset: usize,
    pub len: usize,
}

/// Tokenize `input`, reporting the first unrecognizable piece of text.
pub fn lex(input: &str) -> Result<Vec<Lexed<'_>>, LexFault> {
    lex_at(input, 0)
}

/// Tokenize a slice of a larger buffer; `base` is added to every span so
/// positions stay absolute (used when re-entering interpolation bodies).
pub fn lex_at(input: &str, base: usize) -> Result<Vec<Lexed<'_>>, LexFault> {
    let mut out = Vec::new();
    let mut l = Tok::lexer(input);
    while let Some(res) = l.next() {
        let range = l.span();
        match res {
            Ok(tok) => out.push(Lexed {
                tok,
                span: Span::new(base + range.start, range.len()),
                text: &input[range.clone()],
            }),
            Err(()) => return Err(LexFault { offset: base + range.start, len: range.len() }),
        }
    }
    Ok(out)
}

/// Convenience: lex while dropping comments (what the parsers consume).
pub fn lex_skip_comments(input: &str, base: usize) -> Result<Vec<Lexed<'_>>, LexFault> {
    Ok(lex_at(input, base)?.into_iter().filter(|lx| !matches!(lx.tok, Tok::CommentLine)).collect())
}
