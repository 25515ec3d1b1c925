//! Production hygiene.
//!
//! Two mark-and-erase passes shrink the production list in place:
//! first the non-generating pass (rules that can never derive a
//! terminal string), then the unreachable pass (rules the start symbol
//! can never reach). Unreachability is only meaningful once the
//! non-productive rules are gone, so the order is fixed. Each pass is a
//! seed marking, a fixed-point propagation, and a retention predicate
//! over the marks.

use crate::grammar::Grammar;
use crate::types::SymbolSet;
use crate::util::{fixed_point, Diverged};

/// Runs both hygiene passes and reclassifies after each. Idempotent.
#[tracing::instrument(skip_all)]
pub fn clean(grammar: &mut Grammar) -> Result<(), Diverged> {
    let before = grammar.production_count();
    remove_non_generating(grammar)?;
    grammar.refresh();
    remove_unreachable(grammar)?;
    grammar.refresh();
    let dropped = before - grammar.production_count();
    if dropped > 0 {
        tracing::debug!("hygiene dropped {} production(s)", dropped);
    }
    Ok(())
}

/// Seed marking shared by the generating pass: every symbol currently
/// classified terminal, which covers epsilon.
fn terminal_seed(grammar: &Grammar) -> SymbolSet {
    grammar
        .productions()
        .flat_map(|(_, p)| p.right().iter().copied())
        .filter(|&s| grammar.symbol(s).is_terminal())
        .collect()
}

/// Marks the symbols that derive some terminal string, then drops every
/// production whose lhs is unmarked or whose rhs is not fully marked.
fn remove_non_generating(grammar: &mut Grammar) -> Result<(), Diverged> {
    let mut marked = terminal_seed(grammar);
    let bound = grammar.production_count() + 1;
    fixed_point(bound, || {
        let mut changed = false;
        for (_, p) in grammar.productions() {
            if !marked.contains(p.left()) && p.right().iter().all(|&s| marked.contains(s)) {
                marked.insert(p.left());
                changed = true;
            }
        }
        changed
    })?;
    grammar
        .retain_productions(|p| marked.contains(p.left()) && p.right().iter().all(|&s| marked.contains(s)));
    Ok(())
}

/// Marks the symbols reachable from the start symbol, then drops every
/// production whose lhs is unmarked.
fn remove_unreachable(grammar: &mut Grammar) -> Result<(), Diverged> {
    let mut marked = SymbolSet::default();
    marked.insert(grammar.start_symbol());
    let bound = grammar.production_count() + 1;
    fixed_point(bound, || {
        let mut changed = false;
        for (_, p) in grammar.productions() {
            if marked.contains(p.left()) {
                for &s in p.right() {
                    changed |= marked.insert(s);
                }
            }
        }
        changed
    })?;
    grammar.retain_productions(|p| marked.contains(p.left()));
    Ok(())
}
