pub mod span {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    pub struct Span {
        pub offset: usize,
        pub len: usize,
    }
    impl Span {
        pub fn new(offset: usize, len: usize) -> Self {
            Self { offset, len }
        }
        /// Smallest span covering both `a` and `b`.
        pub fn cover(a: Span, b: Span) -> Span {
            let start = a.offset.min(b.offset);
            let end = (a.offset + a.len).max(b.offset + b.len);
            Span::new(start, end - start)
        }
        pub fn end(&self) -> usize {
            self.offset + self.len
        }
    }
}

pub mod ast {
    use crate::span::Span;
    use serde::{Deserialize, Serialize};

    /// One element of a word/slot call chain: a bare word, or an
    /// empty-parenthesis slot consuming one positional argument.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    pub enum ChainSeg {
        Word(String),
        Slot,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    pub enum Ident {
        /// `name` plus a body-attached chain, e.g. `if() else()`.
        Plain { word: String, chain: Vec<ChainSeg> },
        /// Identifier introduced after a receiver's `.`; the chain is
        /// tail-attached.
        Dot { word: String, chain: Vec<ChainSeg> },
        /// Infix operator symbol.
        Op(String),
        /// Unary-prefix operator symbol.
        PrefixOp(String),
    }

    /// Module segments plus a terminal identifier, order preserved as written.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    pub struct Path {
        pub mods: Vec<String>,
        pub ident: Ident,
    }
    impl Path {
        pub fn plain(word: impl Into<String>) -> Self {
            Path { mods: Vec::new(), ident: Ident::Plain { word: word.into(), chain: Vec::new() } }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub enum StrPart {
        Chars(String),
        Interp(Expr),
    }

    /// One link of a receiver-less partial call chain.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct ChainLink {
        pub path: Path,
        pub arg: Option<Expr>,
        pub span: Span,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub enum ExprKind {
        Var(Path),
        Int(u64),
        /// Exact decimal value: `mantissa * 10^exp10`. Never a binary float.
        Float { mantissa: u64, exp10: i32 },
        Str(Vec<StrPart>),
        Seq(Vec<Expr>),
        Call { func: Box<Expr>, arg: Box<Expr> },
        /// Tuple cell; n-ary tuples are right-nested pairs.
        Pair { fst: Box<Expr>, snd: Box<Expr> },
        Lambda { param: Pattern, body: Box<Expr> },
        /// Desugared statement: `pat = value; body`.
        Let { pat: Pattern, value: Box<Expr>, body: Box<Expr> },
        /// Leading-dot partial call chain, receiver unbound.
        Chain(Vec<ChainLink>),
        Unit,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct Expr {
        pub kind: ExprKind,
        pub span: Span,
    }
    impl Expr {
        pub fn new(kind: ExprKind, span: Span) -> Self {
            Self { kind, span }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub enum PatternKind {
        Var { name: String, ty: Option<TypeExpr> },
        Wildcard { ty: Option<TypeExpr> },
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct Pattern {
        pub kind: PatternKind,
        pub span: Span,
    }
    impl Pattern {
        pub fn new(kind: PatternKind, span: Span) -> Self {
            Self { kind, span }
        }
    }

    /// Qualified type atom, e.g. `m::Foo`.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    pub struct TypePath {
        pub mods: Vec<String>,
        pub name: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub enum TypeKind {
        Atom(TypePath),
        Var(String),
        Unit,
        /// The always-pure effect marker.
        Pure,
        /// The uninhabited type.
        Never,
        Apply { base: Box<TypeExpr>, arg: Box<TypeExpr> },
        /// Left-nested intersection chain.
        Inter { left: Box<TypeExpr>, right: Box<TypeExpr> },
        Fun { arg: Box<TypeExpr>, eff: Box<TypeExpr>, ret: Box<TypeExpr> },
        /// Right-nested tuple type.
        Pair { fst: Box<TypeExpr>, snd: Box<TypeExpr> },
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct TypeExpr {
        pub kind: TypeKind,
        pub span: Span,
    }
    impl TypeExpr {
        pub fn new(kind: TypeKind, span: Span) -> Self {
            Self { kind, span }
        }
    }
}

pub mod pretty {
    use crate::ast::*;

    pub fn print_ident(id: &Ident) -> String {
        match id {
            Ident::Plain { word, chain } => {
                if chain.is_empty() {
                    word.clone()
                } else {
                    format!("`{}`", word_chain(word, chain))
                }
            }
            Ident::Dot { word, chain } => {
                if chain.is_empty() {
                    format!(".{}", word)
                } else {
                    format!("`.{}`", word_chain(word, chain))
                }
            }
            Ident::Op(s) => s.clone(),
            Ident::PrefixOp(s) => format!("`prefix {}`", s),
        }
    }

    fn word_chain(word: &str, chain: &[ChainSeg]) -> String {
        let mut out = word.to_string();
        for seg in chain {
            match seg {
                ChainSeg::Word(w) => {
                    out.push(' ');
                    out.push_str(w);
                }
                ChainSeg::Slot => out.push_str("()"),
            }
        }
        out
    }

    pub fn print_path(p: &Path) -> String {
        let mut out = String::new();
        for m in &p.mods {
            out.push_str(m);
            out.push_str("::");
        }
        out.push_str(&print_ident(&p.ident));
        out
    }

    pub fn print_pattern(p: &Pattern) -> String {
        let (name, ty) = match &p.kind {
            PatternKind::Var { name, ty } => (name.as_str(), ty),
            PatternKind::Wildcard { ty } => ("_", ty),
        };
        match ty {
            Some(t) => format!("{}: {}", name, print_type(t)),
            None => name.to_string(),
        }
    }

    pub fn print_expr(e: &Expr) -> String {
        match &e.kind {
            ExprKind::Unit => "()".into(),
            ExprKind::Int(n) => format!("{n}"),
            ExprKind::Float { mantissa, exp10 } => format!("{}e{}", mantissa, exp10),
            ExprKind::Str(parts) => {
                let mut out = String::from("\"");
                for part in parts {
                    match part {
                        StrPart::Chars(s) => out.push_str(&s.escape_default().to_string()),
                        StrPart::Interp(inner) => {
                            out.push_str("\\(");
                            out.push_str(&print_expr(inner));
                            out.push(')');
                        }
                    }
                }
                out.push('"');
                out
            }
            ExprKind::Var(p) => print_path(p),
            ExprKind::Seq(xs) => {
                format!("[{}]", xs.iter().map(print_expr).collect::<Vec<_>>().join("; "))
            }
            ExprKind::Call { func, arg } => {
                format!("({} {})", print_expr(func), print_expr(arg))
            }
            ExprKind::Pair { fst, snd } => {
                format!("({}, {})", print_expr(fst), print_expr(snd))
            }
            ExprKind::Lambda { param, body } => {
                format!("(\\{} -> {})", print_pattern(param), print_expr(body))
            }
            ExprKind::Let { pat, value, body } => {
                format!("({} = {}; {})", print_pattern(pat), print_expr(value), print_expr(body))
            }
            ExprKind::Chain(links) => {
                let inner = links
                    .iter()
                    .map(|l| match &l.arg {
                        Some(a) => format!("({} {})", print_path(&l.path), print_expr(a)),
                        None => print_path(&l.path),
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("(chain {})", inner)
            }
        }
    }

    pub fn print_type(t: &TypeExpr) -> String {
        match &t.kind {
            TypeKind::Unit => "()".into(),
            TypeKind::Pure => "pure".into(),
            TypeKind::Never => "never".into(),
            TypeKind::Var(a) => a.clone(),
            TypeKind::Atom(p) => {
                let mut out = String::new();
                for m in &p.mods {
                    out.push_str(m);
                    out.push_str("::");
                }
                out.push_str(&p.name);
                out
            }
            TypeKind::Apply { base, arg } => {
                format!("{}<{}>", print_type(base), print_type(arg))
            }
            TypeKind::Inter { left, right } => {
                format!("({} | {})", print_type(left), print_type(right))
            }
            TypeKind::Fun { arg, eff, ret } => match eff.kind {
                TypeKind::Pure => format!("({} -> {})", print_type(arg), print_type(ret)),
                _ => format!("({} !{} -> {})", print_type(arg), print_type(eff), print_type(ret)),
            },
            TypeKind::Pair { fst, snd } => {
                format!("({}, {})", print_type(fst), print_type(snd))
            }
        }
    }
}
