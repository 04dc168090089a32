//! Expression grammar.
//!
//! Recursive descent with committed choice; binary-operator and dot-call
//! chains are accumulated iteratively and folded afterwards, so parsing
//! stays linear and same-precedence runs can be checked for ambiguous
//! associativity before any grouping is committed.

use crate::cursor::Cursor;
use crate::ops::{resolve_run, Dir, Fixity, OpTable};
use crate::types::{self, TyCfg};
use crate::{ambig_err, fault_err, lex_err, syntax_err, ParseError};
use petrel_ast::ast::{
    ChainLink, ChainSeg, Expr, ExprKind, Ident, Path, Pattern, PatternKind, StrPart,
};
use petrel_ast::span::Span;
use petrel_lexer::{interp_extent, lex_skip_comments, Lexed, Tok};

const OP_CHARS: &str = "+-*/<>=!&|^%~?@$";

fn is_op_char(c: char) -> bool {
    OP_CHARS.contains(c)
}

/// Top level: comma tuples bind loosest of all.
pub(crate) fn parse_tuple(c: &mut Cursor, t: &OpTable) -> Result<Expr, ParseError> {
    let mut items = vec![parse_ops(c, t, 0)?];
    while matches!(c.peek().map(|x| &x.tok), Some(Tok::Comma)) {
        c.bump();
        items.push(parse_ops(c, t, 0)?);
    }
    Ok(fold_tuple(items))
}

/// Precedence climbing. Each same-precedence run is collected first, the
/// grouping direction is resolved (or rejected as ambiguous), then the run
/// folds into calls.
fn parse_ops(c: &mut Cursor, t: &OpTable, min: u16) -> Result<Expr, ParseError> {
    let mut lhs = parse_prefixed(c, t)?;
    loop {
        let Some((_, fix, _)) = peek_infix(c, t) else { break };
        if (fix.prec as u16) < min {
            break;
        }
        let prec = fix.prec;
        let mut run: Vec<(String, Fixity, usize)> = Vec::new();
        let mut operands = vec![lhs];
        while let Some((sym, fix2, off)) = peek_infix(c, t) {
            if fix2.prec != prec {
                break;
            }
            c.take_op(sym.len());
            run.push((sym, fix2, off));
            operands.push(parse_ops(c, t, prec as u16 + 1)?);
        }
        let dir = resolve_run(t, &run).map_err(|(a, b, off)| ambig_err(c.src, off, a, b))?;
        lhs = fold_run(dir, operands, &run);
    }
    Ok(lhs)
}

fn peek_infix(c: &Cursor, t: &OpTable) -> Option<(String, Fixity, usize)> {
    let (rest, off) = c.op_rest()?;
    let (sym, fix) = t.longest_infix(rest)?;
    Some((sym.to_string(), fix, off))
}

fn fold_run(dir: Dir, mut operands: Vec<Expr>, run: &[(String, Fixity, usize)]) -> Expr {
    match dir {
        Dir::Left => {
            let mut rest = operands.split_off(1);
            let mut acc = operands.pop().expect("run has a left operand");
            for (i, e) in rest.drain(..).enumerate() {
                let (sym, _, off) = &run[i];
                acc = call2(sym, *off, acc, e);
            }
            acc
        }
        Dir::Right => {
            let mut acc = operands.pop().expect("run has a right operand");
            for i in (0..run.len()).rev() {
                let (sym, _, off) = &run[i];
                let l = operands.pop().expect("one operand per operator");
                acc = call2(sym, *off, l, acc);
            }
            acc
        }
    }
}

/// Prefix operators wrap the whole postfix chain: `-x.c(y)` negates the
/// dot call. Chained prefixes nest right to left.
fn parse_prefixed(c: &mut Cursor, t: &OpTable) -> Result<Expr, ParseError> {
    let mut prefixes: Vec<(String, usize)> = Vec::new();
    while let Some((rest, off)) = c.op_rest() {
        match t.longest_prefix(rest) {
            Some(sym) => {
                let sym = sym.to_string();
                c.take_op(sym.len());
                prefixes.push((sym, off));
            }
            None => break,
        }
    }
    let mut e = parse_postfix(c, t)?;
    for (sym, off) in prefixes.into_iter().rev() {
        let func = Expr::new(
            ExprKind::Var(Path { mods: Vec::new(), ident: Ident::PrefixOp(sym.clone()) }),
            Span::new(off, sym.len()),
        );
        let span = Span::cover(Span::new(off, sym.len()), e.span);
        e = Expr::new(ExprKind::Call { func: Box::new(func), arg: Box::new(e) }, span);
    }
    Ok(e)
}

fn parse_postfix(c: &mut Cursor, t: &OpTable) -> Result<Expr, ParseError> {
    let mut e = parse_atom(c, t)?;
    loop {
        match c.peek().map(|x| x.tok.clone()) {
            Some(Tok::Dot) => e = parse_dot_call(c, t, e)?,
            Some(Tok::LParen) => {
                let (arg, end) = parse_paren_arg(c, t)?;
                let span = Span::new(e.span.offset, end - e.span.offset);
                e = Expr::new(ExprKind::Call { func: Box::new(e), arg: Box::new(arg) }, span);
            }
            _ => break,
        }
    }
    Ok(e)
}

fn parse_atom(c: &mut Cursor, t: &OpTable) -> Result<Expr, ParseError> {
    let Some(l) = c.peek().cloned() else {
        return Err(syntax_err(
            c.src,
            c.here(),
            format!("expected an expression, found {}", c.describe()),
        ));
    };
    match l.tok {
        Tok::Int(n) => {
            c.bump();
            Ok(Expr::new(ExprKind::Int(n), l.span))
        }
        Tok::Float((mantissa, exp10)) => {
            c.bump();
            Ok(Expr::new(ExprKind::Float { mantissa, exp10 }, l.span))
        }
        Tok::Str(terminated) => {
            c.bump();
            decode_str(c.src, t, &l, terminated)
        }
        Tok::LBracket => parse_seq(c, t),
        Tok::LBrace => parse_brace_fn(c, t),
        Tok::Do => parse_do_fn(c, t),
        Tok::LParen => {
            c.bump();
            if matches!(c.peek().map(|x| &x.tok), Some(Tok::RParen)) {
                let r = c.bump().expect("peeked");
                return Ok(Expr::new(ExprKind::Unit, Span::cover(l.span, r.span)));
            }
            let inner = parse_tuple(c, t)?;
            match c.peek().map(|x| &x.tok) {
                Some(Tok::RParen) => {
                    let r = c.bump().expect("peeked");
                    Ok(Expr::new(inner.kind, Span::cover(l.span, r.span)))
                }
                _ => Err(syntax_err(
                    c.src,
                    c.here(),
                    format!("expected `)`, found {}", c.describe()),
                )),
            }
        }
        Tok::Dot => parse_partial_chain(c, t),
        Tok::Word | Tok::Quoted => parse_call_expr(c, t),
        _ => Err(syntax_err(
            c.src,
            c.here(),
            format!("expected an expression, found {}", c.describe()),
        )),
    }
}

// ---------------------------------------------------------------------------
// Paths, call chains, dot calls

enum PathTerm {
    Word(String),
    Quoted(Ident),
}

/// `mod::sub::name` — returns (modules, terminal, start, end-of-name).
fn parse_path(c: &mut Cursor) -> Result<(Vec<String>, PathTerm, usize, usize), ParseError> {
    let mut mods = Vec::new();
    let start = c.here();
    loop {
        match c.peek().map(|x| x.tok.clone()) {
            Some(Tok::Word) => {
                if matches!(c.peek_at(1).map(|x| &x.tok), Some(Tok::PathSep)) {
                    let w = c.bump().expect("peeked");
                    mods.push(w.text.to_string());
                    c.bump();
                    continue;
                }
                let w = c.bump().expect("peeked");
                return Ok((mods, PathTerm::Word(w.text.to_string()), start, w.span.end()));
            }
            Some(Tok::Quoted) => {
                let q = c.bump().expect("peeked");
                let id = parse_quoted_ident(c.src, &q)?;
                return Ok((mods, PathTerm::Quoted(id), start, q.span.end()));
            }
            _ => {
                return Err(syntax_err(
                    c.src,
                    c.here(),
                    format!("expected an identifier, found {}", c.describe()),
                ))
            }
        }
    }
}

struct ChainFlags {
    /// Paren groups add slots to the chain (off for escaped callees, whose
    /// slots were written out explicitly).
    slots: bool,
    /// Bare words may extend the chain.
    words: bool,
}

struct ChainOut {
    chain: Vec<ChainSeg>,
    args: Vec<Expr>,
    end: usize,
}

/// Accumulate the word/slot chain after an identifier along with the
/// arguments its paren groups supply. A single naked argument (string,
/// sequence, or function literal) may close the chain.
fn parse_chain(
    c: &mut Cursor,
    t: &OpTable,
    flags: ChainFlags,
    mut chain: Vec<ChainSeg>,
    mut end: usize,
) -> Result<ChainOut, ParseError> {
    let mut args: Vec<Expr> = Vec::new();
    loop {
        match c.peek().map(|x| x.tok.clone()) {
            Some(Tok::LParen) => {
                let (arg, aend) = parse_paren_arg(c, t)?;
                args.push(arg);
                if flags.slots {
                    chain.push(ChainSeg::Slot);
                }
                end = aend;
            }
            Some(Tok::Word) if flags.words => {
                let w = c.bump().expect("peeked");
                chain.push(ChainSeg::Word(w.text.to_string()));
                end = w.span.end();
            }
            Some(Tok::Str(_)) | Some(Tok::LBracket) | Some(Tok::LBrace) | Some(Tok::Do) => {
                let arg = parse_naked(c, t)?;
                end = arg.span.end();
                args.push(arg);
                break;
            }
            _ => break,
        }
    }
    Ok(ChainOut { chain, args, end })
}

/// One parenthesized argument group; `()` supplies the unit value.
fn parse_paren_arg(c: &mut Cursor, t: &OpTable) -> Result<(Expr, usize), ParseError> {
    let open = c.bump().expect("caller peeked `(`");
    if matches!(c.peek().map(|x| &x.tok), Some(Tok::RParen)) {
        let r = c.bump().expect("peeked");
        return Ok((Expr::new(ExprKind::Unit, Span::cover(open.span, r.span)), r.span.end()));
    }
    let arg = parse_tuple(c, t)?;
    match c.peek().map(|x| &x.tok) {
        Some(Tok::RParen) => {
            let r = c.bump().expect("peeked");
            Ok((arg, r.span.end()))
        }
        _ => Err(syntax_err(c.src, c.here(), format!("expected `)`, found {}", c.describe()))),
    }
}

fn parse_naked(c: &mut Cursor, t: &OpTable) -> Result<Expr, ParseError> {
    let l = c.peek().cloned().expect("caller peeked a naked argument");
    match l.tok {
        Tok::Str(terminated) => {
            c.bump();
            decode_str(c.src, t, &l, terminated)
        }
        Tok::LBracket => parse_seq(c, t),
        Tok::LBrace => parse_brace_fn(c, t),
        Tok::Do => parse_do_fn(c, t),
        _ => unreachable!("not a naked argument start"),
    }
}

/// Regular-notation reference or call chain starting at a path.
fn parse_call_expr(c: &mut Cursor, t: &OpTable) -> Result<Expr, ParseError> {
    let (mods, term, start, term_end) = parse_path(c)?;
    enum Callee {
        Named { word: String, chain: Vec<ChainSeg>, extend: bool },
        Sym(Ident),
    }
    let callee = match term {
        PathTerm::Word(word) => Callee::Named { word, chain: Vec::new(), extend: true },
        PathTerm::Quoted(Ident::Plain { word, chain }) => {
            Callee::Named { word, chain, extend: false }
        }
        PathTerm::Quoted(id) => Callee::Sym(id),
    };
    let out = match &callee {
        Callee::Named { chain, extend, .. } => parse_chain(
            c,
            t,
            ChainFlags { slots: *extend, words: true },
            chain.clone(),
            term_end,
        )?,
        Callee::Sym(_) => {
            parse_chain(c, t, ChainFlags { slots: false, words: false }, Vec::new(), term_end)?
        }
    };
    let ident = match callee {
        Callee::Named { word, .. } => Ident::Plain { word, chain: out.chain },
        Callee::Sym(id) => id,
    };
    let path = Path { mods, ident };
    if out.args.is_empty() {
        let span = Span::new(start, out.end.max(term_end) - start);
        Ok(Expr::new(ExprKind::Var(path), span))
    } else {
        let func = Expr::new(ExprKind::Var(path), Span::new(start, term_end - start));
        let arg = fold_tuple(out.args);
        let span = Span::new(start, out.end - start);
        Ok(Expr::new(ExprKind::Call { func: Box::new(func), arg: Box::new(arg) }, span))
    }
}

/// Identifier after a `.`, with its tail-attached chain and arguments.
fn parse_dot_name_chain(
    c: &mut Cursor,
    t: &OpTable,
) -> Result<(Path, Vec<Expr>, Span, usize), ParseError> {
    let (mods, term, start, term_end) = parse_path(c)?;
    let (word, base, extend) = match term {
        PathTerm::Word(w) => (w, Vec::new(), true),
        PathTerm::Quoted(Ident::Plain { word, chain }) => (word, chain, false),
        PathTerm::Quoted(_) => {
            return Err(syntax_err(c.src, start, "expected an identifier after `.`"))
        }
    };
    let out = parse_chain(c, t, ChainFlags { slots: extend, words: true }, base, term_end)?;
    let path = Path { mods, ident: Ident::Dot { word, chain: out.chain } };
    Ok((path, out.args, Span::new(start, term_end - start), out.end))
}

/// `receiver.name(...)` — one call whose first tuple element is the receiver.
fn parse_dot_call(c: &mut Cursor, t: &OpTable, recv: Expr) -> Result<Expr, ParseError> {
    let rspan = recv.span;
    c.bump(); // '.'
    let (path, args, name_span, end) = parse_dot_name_chain(c, t)?;
    let func = Expr::new(ExprKind::Var(path), name_span);
    let mut items = vec![recv];
    items.extend(args);
    let arg = fold_tuple(items);
    let span = Span::new(rspan.offset, end.max(name_span.end()) - rspan.offset);
    Ok(Expr::new(ExprKind::Call { func: Box::new(func), arg: Box::new(arg) }, span))
}

/// Leading-dot chain with no receiver; link order is preserved as written.
fn parse_partial_chain(c: &mut Cursor, t: &OpTable) -> Result<Expr, ParseError> {
    let start = c.here();
    let mut links: Vec<ChainLink> = Vec::new();
    let mut end = start;
    while matches!(c.peek().map(|x| &x.tok), Some(Tok::Dot)) {
        let d = c.bump().expect("peeked");
        let (path, args, name_span, aend) = parse_dot_name_chain(c, t)?;
        let arg = if args.is_empty() { None } else { Some(fold_tuple(args)) };
        let lend = aend.max(name_span.end());
        links.push(ChainLink { path, arg, span: Span::new(d.span.offset, lend - d.span.offset) });
        end = lend;
    }
    Ok(Expr::new(ExprKind::Chain(links), Span::new(start, end - start)))
}

// ---------------------------------------------------------------------------
// Literals

fn parse_seq(c: &mut Cursor, t: &OpTable) -> Result<Expr, ParseError> {
    let open = c.bump().expect("caller peeked `[`");
    let mut items = Vec::new();
    loop {
        if matches!(c.peek().map(|x| &x.tok), Some(Tok::RBracket)) {
            let r = c.bump().expect("peeked");
            return Ok(Expr::new(ExprKind::Seq(items), Span::cover(open.span, r.span)));
        }
        items.push(parse_tuple(c, t)?);
        match c.peek().map(|x| &x.tok) {
            Some(Tok::Semicolon) => {
                c.bump();
            }
            Some(Tok::RBracket) => {}
            _ => {
                return Err(syntax_err(
                    c.src,
                    c.here(),
                    format!("expected `;` or `]`, found {}", c.describe()),
                ))
            }
        }
    }
}

/// Decode a string token into literal runs and interpolated expressions.
/// Interpolation bodies are re-lexed at their absolute offset so spans stay
/// anchored in the original buffer.
fn decode_str(src: &str, t: &OpTable, l: &Lexed, terminated: bool) -> Result<Expr, ParseError> {
    if !terminated {
        return Err(lex_err(src, l.span.offset, "unterminated string literal"));
    }
    let inner_start = l.span.offset + 1;
    let raw = &src[inner_start..l.span.end() - 1];
    let mut parts: Vec<StrPart> = Vec::new();
    let mut cur = String::new();
    let mut i = 0usize;
    while i < raw.len() {
        let ch = raw[i..].chars().next().expect("in-bounds index");
        if ch != '\\' {
            cur.push(ch);
            i += ch.len_utf8();
            continue;
        }
        let esc_off = inner_start + i;
        let Some(e) = raw[i + 1..].chars().next() else {
            return Err(lex_err(src, esc_off, "dangling escape in string literal"));
        };
        i += 1 + e.len_utf8();
        match e {
            'n' => cur.push('\n'),
            't' => cur.push('\t'),
            'r' => cur.push('\r'),
            '"' => cur.push('"'),
            '\\' => cur.push('\\'),
            'u' => {
                if !raw[i..].starts_with('{') {
                    return Err(lex_err(src, esc_off, "expected `{` in unicode escape"));
                }
                let close = raw[i..]
                    .find('}')
                    .ok_or_else(|| lex_err(src, esc_off, "unterminated unicode escape"))?;
                let hex = &raw[i + 1..i + close];
                let v = u32::from_str_radix(hex.trim(), 16)
                    .map_err(|_| lex_err(src, esc_off, "invalid unicode escape"))?;
                let decoded = char::from_u32(v)
                    .ok_or_else(|| lex_err(src, esc_off, "invalid unicode escape"))?;
                cur.push(decoded);
                i += close + 1;
            }
            '(' => {
                let rest = &raw[i..];
                let close = interp_extent(rest)
                    .ok_or_else(|| lex_err(src, esc_off, "unterminated interpolation"))?;
                if !cur.is_empty() {
                    parts.push(StrPart::Chars(std::mem::take(&mut cur)));
                }
                let seg = &rest[..close];
                let abs = inner_start + i;
                let toks = lex_skip_comments(seg, abs).map_err(|f| fault_err(src, f))?;
                let mut ic = Cursor::new(src, toks, abs + seg.len());
                let inner = parse_tuple(&mut ic, t)?;
                if !ic.at_end() {
                    return Err(syntax_err(
                        src,
                        ic.here(),
                        format!("expected `)` in interpolation, found {}", ic.describe()),
                    ));
                }
                parts.push(StrPart::Interp(inner));
                i += close + 1;
            }
            other => {
                return Err(lex_err(src, esc_off, format!("unsupported escape `\\{}`", other)))
            }
        }
    }
    if !cur.is_empty() {
        parts.push(StrPart::Chars(cur));
    }
    Ok(Expr::new(ExprKind::Str(parts), l.span))
}

// ---------------------------------------------------------------------------
// Function literals and statement sequences

fn parse_brace_fn(c: &mut Cursor, t: &OpTable) -> Result<Expr, ParseError> {
    let open = c.bump().expect("caller peeked `{`");
    let param = parse_param(c, t, open.span.end())?;
    let body = parse_stmts(c, t, true)?;
    match c.peek().map(|x| &x.tok) {
        Some(Tok::RBrace) => {
            let r = c.bump().expect("peeked");
            let span = Span::cover(open.span, r.span);
            Ok(Expr::new(ExprKind::Lambda { param, body: Box::new(body) }, span))
        }
        _ => Err(syntax_err(c.src, c.here(), format!("expected `}}`, found {}", c.describe()))),
    }
}

fn parse_do_fn(c: &mut Cursor, t: &OpTable) -> Result<Expr, ParseError> {
    let kw = c.bump().expect("caller peeked `do`");
    let param = parse_param(c, t, kw.span.end())?;
    let body = parse_stmts(c, t, false)?;
    let span = Span::new(kw.span.offset, body.span.end().max(kw.span.end()) - kw.span.offset);
    Ok(Expr::new(ExprKind::Lambda { param, body: Box::new(body) }, span))
}

fn parse_param(c: &mut Cursor, t: &OpTable, fallback: usize) -> Result<Pattern, ParseError> {
    if c.munch("|").is_none() {
        return Ok(Pattern::new(PatternKind::Wildcard { ty: None }, Span::new(fallback, 0)));
    }
    let pat = parse_pattern(c, t, true)?;
    if c.munch("|").is_none() {
        return Err(syntax_err(
            c.src,
            c.here(),
            format!("expected `|` after parameter, found {}", c.describe()),
        ));
    }
    Ok(pat)
}

fn parse_pattern(c: &mut Cursor, _t: &OpTable, in_param: bool) -> Result<Pattern, ParseError> {
    let Some(l) = c.peek().cloned() else {
        return Err(syntax_err(
            c.src,
            c.here(),
            format!("expected a pattern, found {}", c.describe()),
        ));
    };
    let name = match l.tok {
        Tok::Word => {
            c.bump();
            l.text.to_string()
        }
        Tok::Quoted => {
            c.bump();
            match parse_quoted_ident(c.src, &l)? {
                Ident::Plain { word, chain } if chain.is_empty() => word,
                _ => {
                    return Err(syntax_err(c.src, l.span.offset, "pattern must be a plain name"))
                }
            }
        }
        _ => {
            return Err(syntax_err(
                c.src,
                c.here(),
                format!("expected a pattern, found {}", c.describe()),
            ))
        }
    };
    let ty = if matches!(c.peek().map(|x| &x.tok), Some(Tok::Colon)) {
        c.bump();
        Some(types::parse_ty_tuple(c, TyCfg { inter: !in_param })?)
    } else {
        None
    };
    let span = match &ty {
        Some(ann) => Span::cover(l.span, ann.span),
        None => l.span,
    };
    let kind = if name == "_" {
        PatternKind::Wildcard { ty }
    } else {
        PatternKind::Var { name, ty }
    };
    Ok(Pattern::new(kind, span))
}

fn stmt_term(c: &Cursor, brace: bool) -> bool {
    if c.at_end() {
        return true;
    }
    match c.peek().map(|x| &x.tok) {
        Some(Tok::RBrace) => true,
        Some(Tok::RParen) | Some(Tok::RBracket) | Some(Tok::Comma) => !brace,
        _ => false,
    }
}

/// Statement sequence, desugared right-to-left into nested lets. A trailing
/// expression (no `;`) is the value; otherwise the value is unit. Inside a
/// `do` body bare commas end the sequence, so values parse above tuple level.
fn parse_stmts(c: &mut Cursor, t: &OpTable, brace: bool) -> Result<Expr, ParseError> {
    enum StmtK {
        Bind(Pattern),
        Eff,
    }
    let mut stmts: Vec<(StmtK, Expr)> = Vec::new();
    let mut tail: Option<Expr> = None;
    while !stmt_term(c, brace) {
        if let Some((pat, value)) = try_binding(c, t, brace)? {
            if matches!(c.peek().map(|x| &x.tok), Some(Tok::Semicolon)) {
                c.bump();
                stmts.push((StmtK::Bind(pat), value));
            } else {
                return Err(syntax_err(
                    c.src,
                    c.here(),
                    format!("expected `;` after binding, found {}", c.describe()),
                ));
            }
        } else {
            let e = if brace { parse_tuple(c, t)? } else { parse_ops(c, t, 0)? };
            if matches!(c.peek().map(|x| &x.tok), Some(Tok::Semicolon)) {
                c.bump();
                stmts.push((StmtK::Eff, e));
            } else {
                if !stmt_term(c, brace) {
                    return Err(syntax_err(
                        c.src,
                        c.here(),
                        format!("expected `;` or end of block, found {}", c.describe()),
                    ));
                }
                tail = Some(e);
                break;
            }
        }
    }
    let end = c.here();
    let mut body = tail.unwrap_or_else(|| Expr::new(ExprKind::Unit, Span::new(end, 0)));
    for (k, value) in stmts.into_iter().rev() {
        let pat = match k {
            StmtK::Bind(p) => p,
            StmtK::Eff => {
                Pattern::new(PatternKind::Wildcard { ty: None }, Span::new(value.span.offset, 0))
            }
        };
        let span = Span::cover(Span::cover(pat.span, value.span), body.span);
        body = Expr::new(
            ExprKind::Let { pat, value: Box::new(value), body: Box::new(body) },
            span,
        );
    }
    Ok(body)
}

/// Bounded lookahead for `pattern = expr`. The binding `=` is recognized
/// only when the pending operator run does not begin with a declared infix
/// operator, so `x == y ;` stays an effect statement. A `:` commits to a
/// binding, since annotations occur nowhere else.
fn try_binding(
    c: &mut Cursor,
    t: &OpTable,
    brace: bool,
) -> Result<Option<(Pattern, Expr)>, ParseError> {
    let m = c.mark();
    let Some(l) = c.peek().cloned() else { return Ok(None) };
    let name = match l.tok {
        Tok::Word => {
            c.bump();
            Some(l.text.to_string())
        }
        Tok::Quoted => {
            c.bump();
            match parse_quoted_ident(c.src, &l) {
                Ok(Ident::Plain { word, chain }) if chain.is_empty() => Some(word),
                _ => None,
            }
        }
        _ => None,
    };
    let Some(name) = name else {
        c.reset(m);
        return Ok(None);
    };
    let ty = if matches!(c.peek().map(|x| &x.tok), Some(Tok::Colon)) {
        c.bump();
        Some(types::parse_ty_tuple(c, TyCfg { inter: true })?)
    } else {
        None
    };
    let is_binding = match c.op_rest() {
        Some((rest, _)) => rest.starts_with('=') && t.longest_infix(rest).is_none(),
        None => false,
    };
    if !is_binding {
        if ty.is_some() {
            return Err(syntax_err(
                c.src,
                c.here(),
                format!("expected `=` after annotated binding, found {}", c.describe()),
            ));
        }
        c.reset(m);
        return Ok(None);
    }
    c.take_op(1);
    let span = match &ty {
        Some(ann) => Span::cover(l.span, ann.span),
        None => l.span,
    };
    let kind = if name == "_" {
        PatternKind::Wildcard { ty }
    } else {
        PatternKind::Var { name, ty }
    };
    let pat = Pattern::new(kind, span);
    let value = if brace { parse_tuple(c, t)? } else { parse_ops(c, t, 0)? };
    Ok(Some((pat, value)))
}

// ---------------------------------------------------------------------------
// Escaped identifiers

/// Content between backticks: a word/slot sequence, an operator symbol, or
/// `prefix` + an operator symbol.
pub(crate) fn parse_quoted_ident(src: &str, l: &Lexed) -> Result<Ident, ParseError> {
    let inner = &l.text[1..l.text.len() - 1];
    let base = l.span.offset + 1;
    let content = inner.trim();
    if content.is_empty() {
        return Err(syntax_err(src, l.span.offset, "empty escaped identifier"));
    }
    if let Some(rest) = content.strip_prefix("prefix") {
        if rest.starts_with(|ch: char| ch.is_whitespace()) {
            let sym = rest.trim();
            if !sym.is_empty() && sym.chars().all(is_op_char) {
                return Ok(Ident::PrefixOp(sym.to_string()));
            }
        }
    }
    if content.chars().all(is_op_char) {
        return Ok(Ident::Op(content.to_string()));
    }
    let mut chars = content.char_indices().peekable();
    let mut word: Option<String> = None;
    let mut chain: Vec<ChainSeg> = Vec::new();
    while let Some(&(j, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch == '(' {
            chars.next();
            if word.is_none() || !matches!(chars.next(), Some((_, ')'))) {
                return Err(syntax_err(src, base + j, "malformed slot in escaped identifier"));
            }
            chain.push(ChainSeg::Slot);
        } else if ch.is_alphanumeric() || ch == '_' {
            let mut w = String::new();
            while let Some(&(_, c2)) = chars.peek() {
                if c2.is_alphanumeric() || c2 == '_' {
                    w.push(c2);
                    chars.next();
                } else {
                    break;
                }
            }
            match word {
                None => word = Some(w),
                Some(_) => chain.push(ChainSeg::Word(w)),
            }
        } else {
            return Err(syntax_err(src, base + j, "malformed escaped identifier"));
        }
    }
    let word = word.expect("content is non-empty and starts with a word");
    Ok(Ident::Plain { word, chain })
}

/// Single-word escaped name (what the type grammar accepts).
pub(crate) fn parse_quoted_name(src: &str, l: &Lexed) -> Result<String, ParseError> {
    match parse_quoted_ident(src, l)? {
        Ident::Plain { word, chain } if chain.is_empty() => Ok(word),
        _ => Err(syntax_err(src, l.span.offset, "expected a plain escaped name")),
    }
}

// ---------------------------------------------------------------------------
// Small constructors

fn call2(sym: &str, off: usize, l: Expr, r: Expr) -> Expr {
    let func = Expr::new(
        ExprKind::Var(Path { mods: Vec::new(), ident: Ident::Op(sym.to_string()) }),
        Span::new(off, sym.len()),
    );
    let span = Span::cover(l.span, r.span);
    let arg = Expr::new(ExprKind::Pair { fst: Box::new(l), snd: Box::new(r) }, span);
    Expr::new(ExprKind::Call { func: Box::new(func), arg: Box::new(arg) }, span)
}

fn fold_tuple(mut items: Vec<Expr>) -> Expr {
    let mut out = items.pop().expect("tuple fold over a non-empty list");
    while let Some(fst) = items.pop() {
        let span = Span::cover(fst.span, out.span);
        out = Expr::new(ExprKind::Pair { fst: Box::new(fst), snd: Box::new(out) }, span);
    }
    out
}
