//! Calculation of the nullable, FIRST and FOLLOW sets.
//!
//! All three are monotone fixed points over the cleaned grammar and
//! live in side tables keyed by symbol id, owned by [`SetAnalysis`].
//! FOLLOW requires the grammar to be augmented with `S' --> S $` first.

use crate::grammar::{Grammar, SymbolID};
use crate::types::{Map, SymbolSet};
use crate::util::{fixed_point, DisplayWith, Diverged};
use std::fmt;

#[derive(Debug)]
pub struct SetAnalysis {
    nullables: SymbolSet,
    firsts: Map<SymbolID, SymbolSet>,
    follows: Map<SymbolID, SymbolSet>,
}

impl SetAnalysis {
    /// Computes every set analysis for `grammar`, which must already be
    /// cleaned and augmented.
    #[tracing::instrument(skip_all)]
    pub fn compute(grammar: &Grammar) -> Result<Self, Diverged> {
        debug_assert!(grammar.is_augmented());
        let nullables = nullable_set(grammar)?;
        let firsts = first_sets(grammar, &nullables)?;
        let follows = follow_sets(grammar, &nullables, &firsts)?;
        Ok(Self {
            nullables,
            firsts,
            follows,
        })
    }

    /// True for epsilon itself and for every non-terminal that derives
    /// the empty string.
    pub fn is_nullable(&self, id: SymbolID) -> bool {
        id == SymbolID::EPSILON || self.nullables.contains(id)
    }

    pub fn nullables(&self) -> &SymbolSet {
        &self.nullables
    }

    pub fn first(&self, id: SymbolID) -> &SymbolSet {
        &self.firsts[&id]
    }

    pub fn follow(&self, id: SymbolID) -> &SymbolSet {
        &self.follows[&id]
    }

    /// `FIRST(α)` for a sentential form: the union over the nullable
    /// prefix of α plus its first non-nullable symbol.
    pub fn first_of(&self, symbols: &[SymbolID]) -> SymbolSet {
        first_of(&self.firsts, &self.nullables, symbols)
    }

    /// True iff every symbol of α derives the empty string.
    pub fn all_nullable(&self, symbols: &[SymbolID]) -> bool {
        symbols.iter().all(|&s| self.is_nullable(s))
    }

    pub fn display<'g>(&'g self, grammar: &'g Grammar) -> impl fmt::Display + 'g {
        DisplayWith(move |f: &mut fmt::Formatter<'_>| {
            write!(f, "nullable: ")?;
            for (i, id) in self.nullables.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", grammar.name(id))?;
            }
            writeln!(f, "\nfirst sets:")?;
            for id in grammar.non_terminals() {
                writeln!(f, "  {}: {}", grammar.name(id), names(grammar, self.first(id)))?;
            }
            writeln!(f, "follow sets:")?;
            for id in grammar.non_terminals() {
                writeln!(
                    f,
                    "  {}: {}",
                    grammar.name(id),
                    names(grammar, self.follow(id))
                )?;
            }
            Ok(())
        })
    }
}

fn names<'g>(grammar: &'g Grammar, set: &'g SymbolSet) -> impl fmt::Display + 'g {
    DisplayWith(move |f: &mut fmt::Formatter<'_>| {
        for (i, id) in set.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", grammar.name(id))?;
        }
        Ok(())
    })
}

fn is_nullable(nullables: &SymbolSet, id: SymbolID) -> bool {
    id == SymbolID::EPSILON || nullables.contains(id)
}

fn first_of(
    firsts: &Map<SymbolID, SymbolSet>,
    nullables: &SymbolSet,
    symbols: &[SymbolID],
) -> SymbolSet {
    let mut first = SymbolSet::default();
    for &s in symbols {
        if let Some(set) = firsts.get(&s) {
            first.union_with(set);
        }
        if !is_nullable(nullables, s) {
            break;
        }
    }
    first
}

/// A non-terminal is nullable iff some production's rhs consists only
/// of epsilon and nullable symbols.
fn nullable_set(grammar: &Grammar) -> Result<SymbolSet, Diverged> {
    let mut nullables = SymbolSet::default();
    let bound = grammar.production_count() + 1;
    fixed_point(bound, || {
        let mut changed = false;
        for (_, p) in grammar.productions() {
            if nullables.contains(p.left()) {
                continue;
            }
            if p.right().iter().all(|&s| is_nullable(&nullables, s)) {
                nullables.insert(p.left());
                changed = true;
            }
        }
        changed
    })?;
    Ok(nullables)
}

/// FIRST as constraint resolution: `A --> X1 .. Xn` contributes
/// `FIRST(A) ⊇ FIRST(Xi)` for every symbol of the nullable prefix and
/// the first non-nullable symbol after it.
fn first_sets(
    grammar: &Grammar,
    nullables: &SymbolSet,
) -> Result<Map<SymbolID, SymbolSet>, Diverged> {
    let mut map: Map<SymbolID, SymbolSet> = Map::default();

    // First(t) = {t} for every terminal; epsilon contributes nothing.
    for id in grammar.terminals() {
        map.insert(id, [id].into_iter().collect());
    }
    for id in grammar.non_terminals() {
        map.insert(id, SymbolSet::default());
    }
    map.entry(SymbolID::EPSILON).or_default();

    struct Constraint {
        sup: SymbolID,
        sub: SymbolID,
    }
    let mut constraints = vec![];
    for (_, p) in grammar.productions() {
        for &symbol in p.right() {
            if symbol != p.left() {
                constraints.push(Constraint {
                    sup: p.left(),
                    sub: symbol,
                });
            }
            if !is_nullable(nullables, symbol) {
                break;
            }
        }
    }

    let bound = constraints.len() * grammar.symbol_count() + 1;
    fixed_point(bound, || {
        let mut changed = false;
        for Constraint { sup, sub } in &constraints {
            let mut superset = map.swap_remove(sup).unwrap();
            let before = superset.len();
            superset.union_with(&map[sub]);
            changed |= superset.len() != before;
            map.insert(*sup, superset);
        }
        changed
    })?;

    Ok(map)
}

/// FOLLOW over the augmented grammar: for `A --> .. Xi γ` with `Xi` a
/// non-terminal, `FOLLOW(Xi) ⊇ FIRST(γ)`, and `FOLLOW(Xi) ⊇ FOLLOW(A)`
/// when γ is empty or fully nullable. `FOLLOW(S')` is seeded with `$`.
fn follow_sets(
    grammar: &Grammar,
    nullables: &SymbolSet,
    firsts: &Map<SymbolID, SymbolSet>,
) -> Result<Map<SymbolID, SymbolSet>, Diverged> {
    let mut map: Map<SymbolID, SymbolSet> = Map::default();
    for id in grammar.non_terminals() {
        map.insert(id, SymbolSet::default());
    }
    map[&SymbolID::START].insert(SymbolID::END);

    let bound = grammar.production_count() * grammar.symbol_count() + 1;
    fixed_point(bound, || {
        let mut changed = false;
        for (_, p) in grammar.productions() {
            for (i, &x) in p.right().iter().enumerate() {
                if grammar.symbol(x).is_terminal() {
                    continue;
                }
                let tail = &p.right()[i + 1..];
                let mut additions = first_of(firsts, nullables, tail);
                if p.left() != x && tail.iter().all(|&s| is_nullable(nullables, s)) {
                    additions.union_with(&map[&p.left()]);
                }
                let follow = &mut map[&x];
                let before = follow.len();
                follow.union_with(&additions);
                changed |= follow.len() != before;
            }
        }
        changed
    })?;

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze;
    use crate::grammar::Grammar;
    use pretty_assertions::assert_eq;

    fn analysed(rules: &[(char, &str)]) -> (Grammar, SetAnalysis) {
        let mut grammar = Grammar::from_productions(
            rules
                .iter()
                .map(|&(left, right)| (left, right.chars().collect())),
        )
        .unwrap();
        let sets = analyze(&mut grammar).unwrap();
        (grammar, sets)
    }

    fn set(grammar: &Grammar, names: &str) -> SymbolSet {
        names
            .chars()
            .map(|c| {
                if c == '$' {
                    SymbolID::END
                } else {
                    grammar.lookup(&c.to_string()).unwrap()
                }
            })
            .collect()
    }

    /// Z --> d | X Y Z ; Y --> ε | c ; X --> Y | a
    #[test]
    fn nullable_chain() {
        let (g, sets) = analysed(&[
            ('Z', "d"),
            ('Z', "XYZ"),
            ('Y', ""),
            ('Y', "c"),
            ('X', "Y"),
            ('X', "a"),
        ]);
        let (z, y, x) = (
            g.lookup("Z").unwrap(),
            g.lookup("Y").unwrap(),
            g.lookup("X").unwrap(),
        );
        assert!(!sets.is_nullable(z));
        assert!(sets.is_nullable(y));
        assert!(sets.is_nullable(x));

        assert_eq!(*sets.first(z), set(&g, "acd"));
        assert_eq!(*sets.first(y), set(&g, "c"));
        assert_eq!(*sets.first(x), set(&g, "ac"));

        assert_eq!(*sets.follow(z), set(&g, "$"));
        assert_eq!(*sets.follow(y), set(&g, "acd"));
        assert_eq!(*sets.follow(x), set(&g, "acd"));
    }

    /// The textbook LL(1) arithmetic grammar.
    #[test]
    fn arithmetic() {
        let (g, sets) = analysed(&[
            ('E', "TX"),
            ('X', "+TX"),
            ('X', ""),
            ('T', "FY"),
            ('Y', "*FY"),
            ('Y', ""),
            ('F', "(E)"),
            ('F', "i"),
        ]);
        let lk = |n: &str| g.lookup(n).unwrap();

        assert!(sets.is_nullable(lk("X")));
        assert!(sets.is_nullable(lk("Y")));
        assert!(!sets.is_nullable(lk("E")));

        assert_eq!(*sets.first(lk("E")), set(&g, "(i"));
        assert_eq!(*sets.first(lk("T")), set(&g, "(i"));
        assert_eq!(*sets.first(lk("F")), set(&g, "(i"));
        assert_eq!(*sets.first(lk("X")), set(&g, "+"));
        assert_eq!(*sets.first(lk("Y")), set(&g, "*"));

        assert_eq!(*sets.follow(SymbolID::START), set(&g, "$"));
        assert_eq!(*sets.follow(lk("E")), set(&g, ")$"));
        assert_eq!(*sets.follow(lk("X")), set(&g, ")$"));
        assert_eq!(*sets.follow(lk("T")), set(&g, "+)$"));
        assert_eq!(*sets.follow(lk("Y")), set(&g, "+)$"));
        assert_eq!(*sets.follow(lk("F")), set(&g, "*+)$"));
    }

    #[test]
    fn first_of_folds_the_nullable_prefix() {
        let (g, sets) = analysed(&[
            ('E', "TX"),
            ('X', "+TX"),
            ('X', ""),
            ('T', "FY"),
            ('Y', "*FY"),
            ('Y', ""),
            ('F', "(E)"),
            ('F', "i"),
        ]);
        let lk = |n: &str| g.lookup(n).unwrap();
        // X Y ) : both nullable, so ')' shows through.
        let alpha = [lk("X"), lk("Y"), lk(")")];
        assert_eq!(sets.first_of(&alpha), set(&g, "+*)"));
        assert!(!sets.all_nullable(&alpha));
        assert!(sets.all_nullable(&[lk("X"), lk("Y")]));
    }

    #[test]
    fn recomputing_converged_sets_changes_nothing() {
        let (g, sets) = analysed(&[('S', "aSb"), ('S', "")]);
        let again = SetAnalysis::compute(&g).unwrap();
        assert_eq!(sets.nullables, again.nullables);
        assert_eq!(sets.firsts, again.firsts);
        assert_eq!(sets.follows, again.follows);
    }
}
