//! Declared operator fixities and the mixed-associativity table.
//!
//! Operators are user-extensible: the parser never hardcodes a symbol, it
//! asks the table. Because the lexer hands over maximal runs of operator
//! characters, lookups work on *prefixes* of the pending run (longest
//! declared symbol wins), which is what lets `--1` read as two prefix
//! applications and `a+-b` as `a + (-b)`.

use crate::pair::Unordered;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixity {
    pub prec: u8,
    pub assoc: Assoc,
}

#[derive(Debug, Clone, Default)]
pub struct OpTable {
    infix: HashMap<String, Fixity>,
    prefix: HashSet<String>,
    mixes: HashMap<Unordered<String>, Assoc>,
}

impl OpTable {
    /// Table with no declarations at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// The prelude table a host language would declare.
    pub fn standard() -> Self {
        let mut t = Self::new();
        for sym in ["*", "/", "%"] {
            t.infix(sym, 90, Assoc::Left);
        }
        t.infix("+", 80, Assoc::Left);
        t.infix("-", 80, Assoc::Left);
        t.infix("++", 70, Assoc::Right);
        t.infix(">>", 60, Assoc::Left);
        t.infix("<<", 60, Assoc::Right);
        for sym in ["==", "!=", "<", "<=", ">", ">="] {
            t.infix(sym, 40, Assoc::None);
        }
        t.infix("&&", 30, Assoc::Right);
        t.infix("||", 20, Assoc::Right);
        t.prefix("-");
        t.prefix("!");
        t
    }

    pub fn infix(&mut self, sym: &str, prec: u8, assoc: Assoc) -> &mut Self {
        self.infix.insert(sym.to_string(), Fixity { prec, assoc });
        self
    }

    pub fn prefix(&mut self, sym: &str) -> &mut Self {
        self.prefix.insert(sym.to_string());
        self
    }

    /// Declare how two same-precedence operators of otherwise incompatible
    /// associativity group when juxtaposed. The pair is canonicalized, so
    /// declaration and lookup order never matter.
    pub fn allow_mix(&mut self, a: &str, b: &str, dir: Assoc) -> &mut Self {
        self.mixes.insert(Unordered::new(a.to_string(), b.to_string()), dir);
        self
    }

    /// Longest declared infix operator that prefixes the pending run.
    pub(crate) fn longest_infix(&self, rest: &str) -> Option<(&str, Fixity)> {
        self.infix
            .iter()
            .filter(|(sym, _)| rest.starts_with(sym.as_str()))
            .max_by_key(|(sym, _)| sym.len())
            .map(|(sym, fix)| (sym.as_str(), *fix))
    }

    /// Longest declared prefix operator that prefixes the pending run.
    pub(crate) fn longest_prefix(&self, rest: &str) -> Option<&str> {
        self.prefix
            .iter()
            .filter(|sym| rest.starts_with(sym.as_str()))
            .max_by_key(|sym| sym.len())
            .map(|s| s.as_str())
    }

    pub(crate) fn mix(&self, a: &str, b: &str) -> Option<Assoc> {
        self.mixes.get(&Unordered::new(a.to_string(), b.to_string())).copied()
    }
}

/// Direction a same-precedence run folds in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dir {
    Left,
    Right,
}

/// Decide how a run of same-precedence operators groups. Returns the pair
/// that could not be reconciled when the run is ambiguous.
pub(crate) fn resolve_run(
    table: &OpTable,
    run: &[(String, Fixity, usize)],
) -> Result<Dir, (String, String, usize)> {
    if run.len() == 1 {
        return Ok(match run[0].1.assoc {
            Assoc::Right => Dir::Right,
            _ => Dir::Left,
        });
    }
    let mut dir: Option<Dir> = None;
    for pair in run.windows(2) {
        let (a, fa, _) = &pair[0];
        let (b, fb, off) = &pair[1];
        let d = match (fa.assoc, fb.assoc) {
            (Assoc::Left, Assoc::Left) => Dir::Left,
            (Assoc::Right, Assoc::Right) => Dir::Right,
            _ => match table.mix(a, b) {
                Some(Assoc::Left) => Dir::Left,
                Some(Assoc::Right) => Dir::Right,
                _ => return Err((a.clone(), b.clone(), *off)),
            },
        };
        match dir {
            None => dir = Some(d),
            Some(prev) if prev == d => {}
            Some(_) => return Err((a.clone(), b.clone(), *off)),
        }
    }
    Ok(dir.expect("run has at least two operators"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_match_wins() {
        let t = OpTable::standard();
        assert_eq!(t.longest_infix("++-").map(|(s, _)| s), Some("++"));
        assert_eq!(t.longest_infix("+-").map(|(s, _)| s), Some("+"));
        assert_eq!(t.longest_infix("|||").map(|(s, _)| s), Some("||"));
        assert!(t.longest_infix("?").is_none());
    }

    #[test]
    fn mix_lookup_is_symmetric() {
        let mut t = OpTable::standard();
        t.allow_mix("<<", ">>", Assoc::Right);
        assert_eq!(t.mix(">>", "<<"), Some(Assoc::Right));
        assert_eq!(t.mix("<<", ">>"), Some(Assoc::Right));
    }
}
