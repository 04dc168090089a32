//! Type grammar. Structurally parallel to the expression grammar but with
//! fixed fixity: grouping is decided by grammar shape alone, so there is no
//! operator table and no ambiguity check here.

use crate::cursor::Cursor;
use crate::expr::parse_quoted_name;
use crate::{syntax_err, ParseError};
use petrel_ast::ast::{TypeExpr, TypeKind, TypePath};
use petrel_ast::span::Span;
use petrel_lexer::Tok;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TyCfg {
    /// Whether a top-level `|` is an intersection. Parameter annotations
    /// turn this off because `|` closes the parameter there; parentheses
    /// re-enable it.
    pub inter: bool,
}

pub(crate) fn parse_ty(c: &mut Cursor) -> Result<TypeExpr, ParseError> {
    parse_ty_tuple(c, TyCfg { inter: true })
}

pub(crate) fn parse_ty_tuple(c: &mut Cursor, cfg: TyCfg) -> Result<TypeExpr, ParseError> {
    let mut items = vec![parse_ty_fun(c, cfg)?];
    while matches!(c.peek().map(|t| &t.tok), Some(Tok::Comma)) {
        c.bump();
        items.push(parse_ty_fun(c, cfg)?);
    }
    let mut out = items.pop().expect("at least one tuple item");
    while let Some(fst) = items.pop() {
        let span = Span::cover(fst.span, out.span);
        out = TypeExpr::new(TypeKind::Pair { fst: Box::new(fst), snd: Box::new(out) }, span);
    }
    Ok(out)
}

fn parse_ty_fun(c: &mut Cursor, cfg: TyCfg) -> Result<TypeExpr, ParseError> {
    let arg = parse_ty_inter(c, cfg)?;
    if let Some(arrow) = c.munch("->") {
        let eff = TypeExpr::new(TypeKind::Pure, Span::new(arrow.offset, 0));
        let ret = parse_ty_fun(c, cfg)?;
        let span = Span::cover(arg.span, ret.span);
        return Ok(TypeExpr::new(
            TypeKind::Fun { arg: Box::new(arg), eff: Box::new(eff), ret: Box::new(ret) },
            span,
        ));
    }
    if c.munch("!").is_some() {
        let eff = parse_ty_inter(c, cfg)?;
        if c.munch("->").is_none() {
            return Err(syntax_err(
                c.src,
                c.here(),
                format!("expected `->` after effect type, found {}", c.describe()),
            ));
        }
        let ret = parse_ty_fun(c, cfg)?;
        let span = Span::cover(arg.span, ret.span);
        return Ok(TypeExpr::new(
            TypeKind::Fun { arg: Box::new(arg), eff: Box::new(eff), ret: Box::new(ret) },
            span,
        ));
    }
    Ok(arg)
}

fn parse_ty_inter(c: &mut Cursor, cfg: TyCfg) -> Result<TypeExpr, ParseError> {
    let mut t = parse_ty_app(c, cfg)?;
    if !cfg.inter {
        return Ok(t);
    }
    while c.munch("|").is_some() {
        let right = parse_ty_app(c, cfg)?;
        let span = Span::cover(t.span, right.span);
        t = TypeExpr::new(TypeKind::Inter { left: Box::new(t), right: Box::new(right) }, span);
    }
    Ok(t)
}

fn parse_ty_app(c: &mut Cursor, _cfg: TyCfg) -> Result<TypeExpr, ParseError> {
    let mut t = parse_ty_atom(c)?;
    while c.munch("<").is_some() {
        let arg = parse_ty_tuple(c, TyCfg { inter: true })?;
        let close = match c.munch(">") {
            Some(sp) => sp,
            None => {
                return Err(syntax_err(
                    c.src,
                    c.here(),
                    format!("expected `>` to close type argument, found {}", c.describe()),
                ))
            }
        };
        let span = Span::new(t.span.offset, close.end() - t.span.offset);
        t = TypeExpr::new(TypeKind::Apply { base: Box::new(t), arg: Box::new(arg) }, span);
    }
    Ok(t)
}

fn parse_ty_atom(c: &mut Cursor) -> Result<TypeExpr, ParseError> {
    let Some(t) = c.peek().cloned() else {
        return Err(syntax_err(c.src, c.here(), format!("expected a type, found {}", c.describe())));
    };
    match t.tok {
        Tok::LParen => {
            c.bump();
            if matches!(c.peek().map(|x| &x.tok), Some(Tok::RParen)) {
                let r = c.bump().expect("peeked");
                let span = Span::new(t.span.offset, r.span.end() - t.span.offset);
                return Ok(TypeExpr::new(TypeKind::Unit, span));
            }
            let inner = parse_ty_tuple(c, TyCfg { inter: true })?;
            match c.peek().map(|x| &x.tok) {
                Some(Tok::RParen) => {
                    let r = c.bump().expect("peeked");
                    let span = Span::new(t.span.offset, r.span.end() - t.span.offset);
                    Ok(TypeExpr::new(inner.kind, span))
                }
                _ => Err(syntax_err(
                    c.src,
                    c.here(),
                    format!("expected `)`, found {}", c.describe()),
                )),
            }
        }
        Tok::Word | Tok::Quoted => parse_ty_name(c),
        _ => Err(syntax_err(
            c.src,
            c.here(),
            format!("expected a type, found {}", c.describe()),
        )),
    }
}

/// Qualified atom, keyword, or type variable.
fn parse_ty_name(c: &mut Cursor) -> Result<TypeExpr, ParseError> {
    let first = c.bump().expect("caller peeked a name token");
    let start = first.span;
    let mut quoted = matches!(first.tok, Tok::Quoted);
    let mut cur = ty_name_text(c, &first)?;
    let mut mods: Vec<String> = Vec::new();
    let mut end = first.span;
    while matches!(c.peek().map(|t| &t.tok), Some(Tok::PathSep)) {
        if quoted {
            return Err(syntax_err(c.src, c.here(), "escaped name cannot be a module segment"));
        }
        c.bump();
        let seg = match c.peek().map(|t| &t.tok) {
            Some(Tok::Word) | Some(Tok::Quoted) => c.bump().expect("peeked"),
            _ => {
                return Err(syntax_err(
                    c.src,
                    c.here(),
                    format!("expected a name after `::`, found {}", c.describe()),
                ))
            }
        };
        quoted = matches!(seg.tok, Tok::Quoted);
        mods.push(cur);
        cur = ty_name_text(c, &seg)?;
        end = seg.span;
    }
    let span = Span::cover(start, end);
    if mods.is_empty() && !quoted {
        match cur.as_str() {
            "pure" => return Ok(TypeExpr::new(TypeKind::Pure, span)),
            "never" => return Ok(TypeExpr::new(TypeKind::Never, span)),
            _ => {}
        }
        let leading = cur.chars().next().unwrap_or('_');
        if leading == '_' || leading.is_lowercase() {
            return Ok(TypeExpr::new(TypeKind::Var(cur), span));
        }
    }
    Ok(TypeExpr::new(TypeKind::Atom(TypePath { mods, name: cur }), span))
}

fn ty_name_text(c: &Cursor, t: &petrel_lexer::Lexed) -> Result<String, ParseError> {
    match t.tok {
        Tok::Word => Ok(t.text.to_string()),
        Tok::Quoted => parse_quoted_name(c.src, t),
        _ => unreachable!("callers only pass Word or Quoted"),
    }
}
