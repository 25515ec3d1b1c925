//! A table-driven LL(1) recogniser for character-level context-free
//! grammars.
//!
//! The pipeline runs a parsed production list through hygiene
//! (non-generating then unreachable rules), start-symbol augmentation,
//! the nullable/FIRST/FOLLOW fixed points, strong-LL(1) table
//! construction, and a predictive stack parse with a per-step
//! prediction fallback for grammars whose table has conflicts.

pub mod grammar;
pub mod hygiene;
pub mod input;
pub mod parse_table;
pub mod parser;
pub mod sets;
pub mod syntax;
pub mod types;
pub mod util;

use crate::grammar::Grammar;
use crate::sets::SetAnalysis;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("grammar hygiene left no productions for the start symbol")]
    Degenerate,
    #[error(transparent)]
    Diverged(#[from] util::Diverged),
}

/// Prepares a freshly constructed grammar for parsing: hygiene, then
/// augmentation with `S' --> S $`, then the set analyses. The order is
/// load-bearing and this is the only place that sequences it.
#[tracing::instrument(skip_all)]
pub fn analyze(grammar: &mut Grammar) -> Result<SetAnalysis, AnalyzeError> {
    hygiene::clean(grammar)?;
    if !grammar.non_terminals().contains(&grammar.start_symbol()) {
        return Err(AnalyzeError::Degenerate);
    }
    tracing::debug!("cleaned grammar:\n{}", grammar);
    grammar.augment();
    Ok(SetAnalysis::compute(grammar)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_grammars_are_reported() {
        let mut grammar = Grammar::from_productions([('S', vec!['S', 'a'])]).unwrap();
        assert!(matches!(
            analyze(&mut grammar),
            Err(AnalyzeError::Degenerate)
        ));
    }

    #[test]
    fn a_non_generating_start_is_degenerate_despite_live_rules() {
        // S --> A ; A --> A a ; C --> c : the language of S is empty,
        // and the surviving rule for C must not take over as start.
        let mut grammar = Grammar::from_productions([
            ('S', vec!['A']),
            ('A', vec!['A', 'a']),
            ('C', vec!['c']),
        ])
        .unwrap();
        assert!(matches!(
            analyze(&mut grammar),
            Err(AnalyzeError::Degenerate)
        ));
    }
}
