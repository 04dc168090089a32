//! Token cursor shared by the expression and type grammars.
//!
//! Operator tokens arrive from the lexer as maximal symbol runs; both
//! grammars consume them a few characters at a time (`op_rest`/`take_op`/
//! `munch`), so `>|` can serve a type's `>` and then a parameter's `|`.

use petrel_ast::span::Span;
use petrel_lexer::{Lexed, Tok};

pub(crate) struct Cursor<'a> {
    pub(crate) src: &'a str,
    toks: Vec<Lexed<'a>>,
    pos: usize,
    op_off: usize,
    end: usize,
}

/// Saved position for bounded lookahead.
pub(crate) type Mark = (usize, usize);

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str, toks: Vec<Lexed<'a>>, end: usize) -> Self {
        Self { src, toks, pos: 0, op_off: 0, end }
    }

    pub fn mark(&self) -> Mark {
        (self.pos, self.op_off)
    }

    pub fn reset(&mut self, m: Mark) {
        self.pos = m.0;
        self.op_off = m.1;
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.toks.len()
    }

    /// Current token, unless we are midway through an operator run.
    pub fn peek(&self) -> Option<&Lexed<'a>> {
        if self.op_off > 0 {
            None
        } else {
            self.toks.get(self.pos)
        }
    }

    pub fn peek_at(&self, n: usize) -> Option<&Lexed<'a>> {
        if self.op_off > 0 {
            None
        } else {
            self.toks.get(self.pos + n)
        }
    }

    pub fn bump(&mut self) -> Option<Lexed<'a>> {
        debug_assert_eq!(self.op_off, 0, "bump inside an operator run");
        let t = self.toks.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    /// Remaining text of the current operator token with its absolute offset.
    pub fn op_rest(&self) -> Option<(&'a str, usize)> {
        let t = self.toks.get(self.pos)?;
        if !matches!(t.tok, Tok::Op) {
            return None;
        }
        Some((&t.text[self.op_off..], t.span.offset + self.op_off))
    }

    /// Consume `n` bytes of the current operator token.
    pub fn take_op(&mut self, n: usize) -> Span {
        let t = &self.toks[self.pos];
        debug_assert!(matches!(t.tok, Tok::Op));
        let sp = Span::new(t.span.offset + self.op_off, n);
        self.op_off += n;
        if self.op_off >= t.text.len() {
            self.pos += 1;
            self.op_off = 0;
        }
        sp
    }

    /// Consume `s` if the pending operator text starts with it.
    pub fn munch(&mut self, s: &str) -> Option<Span> {
        let (rest, _) = self.op_rest()?;
        if rest.starts_with(s) {
            Some(self.take_op(s.len()))
        } else {
            None
        }
    }

    /// Absolute offset of whatever comes next (end of region if nothing).
    pub fn here(&self) -> usize {
        match self.toks.get(self.pos) {
            Some(t) => t.span.offset + self.op_off,
            None => self.end,
        }
    }

    /// Human description of the next thing, for error messages.
    pub fn describe(&self) -> String {
        match self.toks.get(self.pos) {
            None => "end of input".into(),
            Some(t) => match &t.tok {
                Tok::Op => format!("`{}`", &t.text[self.op_off..]),
                _ => format!("`{}`", t.text),
            },
        }
    }
}
