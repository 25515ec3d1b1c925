//! Construction of the strong-LL(1) parse table.
//!
//! The table maps a (non-terminal, lookahead terminal) pair to the
//! index of the production to expand. A cell is unoccupied when the
//! inner map has no entry for the lookahead.

use crate::grammar::{Grammar, SymbolID};
use crate::sets::SetAnalysis;
use crate::types::Map;
use crate::util::DisplayWith;
use std::fmt;

#[derive(Debug)]
pub struct ParseTable {
    map: Map<SymbolID, Map<SymbolID, usize>>,
}

/// Two productions selected the same table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub non_terminal: String,
    pub terminal: String,
    pub existing: usize,
    pub replacement: usize,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}][{}]: production {:02} displaced {:02}",
            self.non_terminal, self.terminal, self.replacement, self.existing
        )
    }
}

/// The grammar is not strong LL(1). The table built so far is
/// discarded; callers must not parse against a conflicted table.
#[derive(Debug, thiserror::Error)]
#[error("grammar is not strong LL(1): {} conflicting table cell(s)", conflicts.len())]
pub struct NotStrongLL1 {
    pub conflicts: Vec<Conflict>,
}

impl ParseTable {
    /// Populates the table from the analysed grammar: a production
    /// `A --> α` lands in `[A][t]` for every `t ∈ FIRST(α)`, and in
    /// `[A][t]` for every `t ∈ FOLLOW(A)` when α is fully nullable.
    /// Cells are written last-write-wins; every displacement is
    /// recorded and reported as a conflict.
    #[tracing::instrument(skip_all)]
    pub fn generate(grammar: &Grammar, sets: &SetAnalysis) -> Result<Self, NotStrongLL1> {
        let mut map: Map<SymbolID, Map<SymbolID, usize>> = Map::default();
        for id in grammar.non_terminals() {
            map.insert(id, Map::default());
        }
        let terminals = grammar.terminals();

        let mut conflicts = vec![];
        for (index, production) in grammar.productions() {
            let first = sets.first_of(production.right());
            let nullable = sets.all_nullable(production.right());
            let row = &mut map[&production.left()];
            for &t in &terminals {
                let selected =
                    first.contains(t) || (nullable && sets.follow(production.left()).contains(t));
                if !selected {
                    continue;
                }
                if let Some(&existing) = row.get(&t) {
                    if existing != index {
                        conflicts.push(Conflict {
                            non_terminal: grammar.name(production.left()).to_owned(),
                            terminal: grammar.name(t).to_owned(),
                            existing,
                            replacement: index,
                        });
                    }
                }
                row.insert(t, index);
                tracing::debug!(
                    "[{}][{}] = {}",
                    grammar.name(production.left()),
                    grammar.name(t),
                    production.display(grammar),
                );
            }
        }

        if conflicts.is_empty() {
            Ok(Self { map })
        } else {
            Err(NotStrongLL1 { conflicts })
        }
    }

    /// The production index to expand for `(non_terminal, lookahead)`,
    /// or `None` when the cell is unoccupied.
    pub fn get(&self, non_terminal: SymbolID, lookahead: SymbolID) -> Option<usize> {
        self.map.get(&non_terminal)?.get(&lookahead).copied()
    }

    pub fn display<'g>(&'g self, grammar: &'g Grammar) -> impl fmt::Display + 'g {
        DisplayWith(move |f: &mut fmt::Formatter<'_>| {
            for (non_terminal, row) in &self.map {
                for (terminal, &index) in row {
                    writeln!(
                        f,
                        "[{}][{}] = {}",
                        grammar.name(*non_terminal),
                        grammar.name(*terminal),
                        grammar.production(index).display(grammar),
                    )?;
                }
            }
            Ok(())
        })
    }
}
