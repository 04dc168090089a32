//! Parser for the petrel surface syntax.
//!
//! Two independent entry points share one lexer and one identifier/path
//! grammar: [`parse_expr`] (and [`parse_expr_with`] for a custom operator
//! table) for expressions, [`parse_type`] for types. Parsing is pure and
//! all-or-nothing: the result is either a complete span-tagged tree or the
//! first, most specific error, never a partial tree.

mod cursor;
mod expr;
mod ops;
mod pair;
mod types;

pub use ops::{Assoc, Fixity, OpTable};
pub use pair::Unordered;

use cursor::Cursor;
use petrel_ast::ast::{Expr, TypeExpr};
use petrel_lexer::LexFault;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{msg} at {line}:{col}")]
    Lex { msg: String, offset: usize, line: usize, col: usize },
    #[error("{msg} at {line}:{col}")]
    Syntax { msg: String, offset: usize, line: usize, col: usize },
    #[error("ambiguous mix of operators `{a}` and `{b}` at {line}:{col}")]
    Ambiguous { a: String, b: String, offset: usize, line: usize, col: usize },
}

impl ParseError {
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Lex { offset, .. }
            | ParseError::Syntax { offset, .. }
            | ParseError::Ambiguous { offset, .. } => *offset,
        }
    }
}

pub(crate) fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let prefix = &src[..offset.min(src.len())];
    let line = prefix.matches('\n').count() + 1;
    let col = prefix.chars().rev().take_while(|&c| c != '\n').count() + 1;
    (line, col)
}

pub(crate) fn syntax_err(src: &str, offset: usize, msg: impl Into<String>) -> ParseError {
    let (line, col) = line_col(src, offset);
    ParseError::Syntax { msg: msg.into(), offset, line, col }
}

pub(crate) fn lex_err(src: &str, offset: usize, msg: impl Into<String>) -> ParseError {
    let (line, col) = line_col(src, offset);
    ParseError::Lex { msg: msg.into(), offset, line, col }
}

pub(crate) fn ambig_err(src: &str, offset: usize, a: String, b: String) -> ParseError {
    let (line, col) = line_col(src, offset);
    ParseError::Ambiguous { a, b, offset, line, col }
}

pub(crate) fn fault_err(src: &str, fault: LexFault) -> ParseError {
    let msg = match src[fault.offset..].chars().next() {
        Some('`') => "unterminated escaped identifier",
        Some(c) if c.is_ascii_digit() => "malformed number literal",
        _ => "unrecognized character",
    };
    lex_err(src, fault.offset, msg)
}

fn tokens(src: &str) -> Result<Vec<petrel_lexer::Lexed<'_>>, ParseError> {
    petrel_lexer::lex_skip_comments(src, 0).map_err(|f| fault_err(src, f))
}

fn expect_end(c: &Cursor) -> Result<(), ParseError> {
    if c.at_end() {
        Ok(())
    } else {
        Err(syntax_err(c.src, c.here(), format!("expected end of input, found {}", c.describe())))
    }
}

/// Parse one expression with the standard operator table.
pub fn parse_expr(src: &str) -> Result<Expr, ParseError> {
    parse_expr_with(src, &OpTable::standard())
}

/// Parse one expression against a caller-supplied operator table.
pub fn parse_expr_with(src: &str, table: &OpTable) -> Result<Expr, ParseError> {
    let mut c = Cursor::new(src, tokens(src)?, src.len());
    let e = expr::parse_tuple(&mut c, table)?;
    expect_end(&c)?;
    Ok(e)
}

/// Parse one type. Type fixity is fixed by the grammar, so no table.
pub fn parse_type(src: &str) -> Result<TypeExpr, ParseError> {
    let mut c = Cursor::new(src, tokens(src)?, src.len());
    let t = types::parse_ty(&mut c)?;
    expect_end(&c)?;
    Ok(t)
}
