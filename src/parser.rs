//! Table-driven LL(1) parsing.
//!
//! [`Ll1Parser::parse`] first builds the strong-LL(1) table and drives
//! a predictive stack parse against it. When table construction
//! reports conflicts the parse is retried with per-step prediction
//! from FIRST of each candidate rhs, which rejects or reports
//! ambiguity instead of trusting a conflicted table.

use crate::grammar::{Grammar, SymbolID};
use crate::parse_table::ParseTable;
use crate::sets::SetAnalysis;
use crate::util::{DisplayWith, Diverged};
use std::fmt;

/// One recorded parse action.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// A production was chosen for (stack top, lookahead).
    Predict {
        input: SymbolID,
        top: SymbolID,
        production: usize,
    },
    /// The stack top matched the current input terminal.
    Match { terminal: SymbolID },
}

/// What one prediction step decided.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Prediction {
    Matched(usize),
    NoMatch,
    Ambiguous(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("grammar is not LL(1): {count} candidate productions for ({non_terminal}, {terminal})")]
    NotLL1 {
        non_terminal: String,
        terminal: String,
        count: usize,
    },
    #[error(transparent)]
    Diverged(#[from] Diverged),
}

/// The verdict of one parse, with the trace and whatever was left on
/// the stack and in the input when it ended.
#[derive(Debug)]
pub struct Outcome {
    pub accepted: bool,
    pub steps: Vec<Step>,
    pub remaining_input: Vec<SymbolID>,
    pub remaining_stack: Vec<SymbolID>,
}

impl Outcome {
    /// Renders the trace, the verdict line and, on failure, the state
    /// dump.
    pub fn display<'g>(&'g self, grammar: &'g Grammar) -> impl fmt::Display + 'g {
        DisplayWith(move |f: &mut fmt::Formatter<'_>| {
            for step in &self.steps {
                match *step {
                    Step::Predict {
                        input,
                        top,
                        production,
                    } => writeln!(
                        f,
                        "... in: {} top: {} action: {}",
                        grammar.name(input),
                        grammar.name(top),
                        grammar.production(production).display(grammar),
                    )?,
                    Step::Match { terminal } => {
                        writeln!(f, "+++ match: {}", grammar.name(terminal))?
                    }
                }
            }
            if self.accepted {
                writeln!(f, "*** success: input recognized by grammar ***")
            } else {
                writeln!(f, "*** failure: input not recognized by grammar ***")?;
                writeln!(f, "*** begin state dump ***")?;
                writeln!(
                    f,
                    "input empty: {}",
                    if self.remaining_input.is_empty() {
                        "yes"
                    } else {
                        "no"
                    }
                )?;
                for &symbol in &self.remaining_input {
                    writeln!(f, " -- {}", grammar.name(symbol))?;
                }
                writeln!(
                    f,
                    "stack empty: {}",
                    if self.remaining_stack.is_empty() {
                        "yes"
                    } else {
                        "no"
                    }
                )?;
                for &symbol in &self.remaining_stack {
                    writeln!(f, " -- {}", grammar.name(symbol))?;
                }
                writeln!(f, "*** end state dump ***")
            }
        })
    }
}

pub struct Ll1Parser<'g> {
    grammar: &'g Grammar,
    sets: &'g SetAnalysis,
}

impl<'g> Ll1Parser<'g> {
    pub fn new(grammar: &'g Grammar, sets: &'g SetAnalysis) -> Self {
        Self { grammar, sets }
    }

    /// Decides whether `input` belongs to the grammar's language.
    ///
    /// Only the strong-LL(1) conflict is recovered here; an ambiguity
    /// in the fallback predictor is fatal for the input.
    #[tracing::instrument(skip_all)]
    pub fn parse(&self, input: &[SymbolID]) -> Result<Outcome, ParseError> {
        match ParseTable::generate(self.grammar, self.sets) {
            Ok(table) => {
                tracing::debug!("table:\n{}", table.display(self.grammar));
                self.drive(input, |top, lookahead| match table.get(top, lookahead) {
                    Some(index) => Prediction::Matched(index),
                    None => Prediction::NoMatch,
                })
            }
            Err(conflict) => {
                tracing::warn!("{}; retrying with per-step prediction", conflict);
                for detail in &conflict.conflicts {
                    tracing::debug!("conflict at {}", detail);
                }
                self.drive(input, |top, lookahead| self.predict(top, lookahead))
            }
        }
    }

    /// Every production for `top` whose rhs can begin with `lookahead`.
    fn predict(&self, top: SymbolID, lookahead: SymbolID) -> Prediction {
        let mut candidates = self
            .grammar
            .productions()
            .filter(|(_, p)| p.left() == top && self.sets.first_of(p.right()).contains(lookahead))
            .map(|(index, _)| index);
        match candidates.next() {
            None => Prediction::NoMatch,
            Some(index) => match candidates.count() {
                0 => Prediction::Matched(index),
                rest => Prediction::Ambiguous(rest + 1),
            },
        }
    }

    fn drive<P>(&self, input: &[SymbolID], mut predict: P) -> Result<Outcome, ParseError>
    where
        P: FnMut(SymbolID, SymbolID) -> Prediction,
    {
        let mut stack = vec![self.grammar.start_symbol()];
        let mut cursor = 0;
        let mut steps = vec![];

        // Left recursion that survives to the fallback predictor would
        // expand forever without consuming input; cap the step count.
        let bound =
            (input.len() + 2) * self.grammar.production_count() * self.grammar.symbol_count();
        let mut rounds = 0;

        let accepted = loop {
            rounds += 1;
            if rounds > bound {
                return Err(Diverged.into());
            }
            let Some(&top) = stack.last() else {
                break cursor == input.len();
            };
            let lookahead = input.get(cursor).copied().unwrap_or(SymbolID::END);

            if self.grammar.symbol(top).is_terminal() {
                stack.pop();
                if top == SymbolID::EPSILON {
                    // Epsilon is never matched against input.
                    continue;
                }
                if top != lookahead {
                    break false;
                }
                cursor += 1;
                steps.push(Step::Match { terminal: top });
                continue;
            }

            match predict(top, lookahead) {
                Prediction::Matched(index) => {
                    steps.push(Step::Predict {
                        input: lookahead,
                        top,
                        production: index,
                    });
                    stack.pop();
                    let production = self.grammar.production(index);
                    for &symbol in production.right().iter().rev() {
                        stack.push(symbol);
                    }
                }
                Prediction::NoMatch => break false,
                Prediction::Ambiguous(count) => {
                    return Err(ParseError::NotLL1 {
                        non_terminal: self.grammar.name(top).to_owned(),
                        terminal: self.grammar.name(lookahead).to_owned(),
                        count,
                    })
                }
            }
        };

        Ok(Outcome {
            accepted,
            steps,
            remaining_input: input[cursor..].to_vec(),
            remaining_stack: stack.iter().rev().copied().collect(),
        })
    }
}
