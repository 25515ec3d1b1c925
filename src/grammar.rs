//! Grammar types.
//!
//! Symbols are interned into [`SymbolID`]s; the [`Grammar`] owns the
//! registry and the ordered production list. Classification of a symbol
//! as terminal or start is not fixed at construction: it is re-derived
//! from the current production list by [`Grammar::refresh`], which must
//! run after every structural mutation.

use crate::types::{Map, Set, SymbolSet};
use crate::util::DisplayWith;
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolID {
    raw: u16,
}

impl SymbolID {
    /// Sentinel for "no symbol": the start symbol of an empty grammar.
    /// Never appears in a production.
    pub const DEAD: Self = Self::from_raw(0);
    /// Reserved symbol that stands for the empty string. The only rhs
    /// of an epsilon production, and never matched against input.
    pub const EPSILON: Self = Self::from_raw(1);
    /// Synthetic start symbol `S'` introduced by [`Grammar::augment`].
    pub const START: Self = Self::from_raw(2);
    /// Synthetic end-of-input terminal `$` introduced by [`Grammar::augment`].
    pub const END: Self = Self::from_raw(3);

    const OFFSET: u16 = 4;

    #[inline]
    pub(crate) const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub(crate) const fn into_raw(self) -> u16 {
        self.raw
    }
}

impl fmt::Debug for SymbolID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::DEAD => f.write_str("$dead"),
            Self::EPSILON => f.write_str("$epsilon"),
            Self::START => f.write_str("$start"),
            Self::END => f.write_str("$end"),
            Self { raw } => write!(f, "SymbolID({})", raw),
        }
    }
}

/// Registry entry for one interned symbol.
#[derive(Debug)]
pub struct Symbol {
    name: String,
    terminal: bool,
    start: bool,
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True iff the symbol appears as no production's lhs, as of the
    /// last `refresh`. Fresh symbols default to terminal.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_start(&self) -> bool {
        self.start
    }
}

/// One production rule `lhs --> rhs`. An epsilon production carries the
/// single reserved epsilon symbol as its rhs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    left: SymbolID,
    right: Vec<SymbolID>,
}

impl Production {
    pub fn left(&self) -> SymbolID {
        self.left
    }

    pub fn right(&self) -> &[SymbolID] {
        &self.right[..]
    }

    pub fn is_epsilon(&self) -> bool {
        self.right == [SymbolID::EPSILON]
    }

    pub fn display<'g>(&'g self, grammar: &'g Grammar) -> impl fmt::Display + 'g {
        DisplayWith(move |f: &mut fmt::Formatter<'_>| {
            write!(f, "{} -->", grammar.name(self.left))?;
            for &symbol in &self.right {
                write!(f, " {}", grammar.name(symbol))?;
            }
            Ok(())
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("grammar contains no productions")]
    Empty,
    #[error("reserved symbol `{0}` in production")]
    ReservedSymbol(char),
}

/// The grammar under analysis: a symbol registry plus the ordered
/// production list. The lhs of the first production becomes the start
/// symbol, fixed at construction.
#[derive(Debug)]
pub struct Grammar {
    names: Map<String, SymbolID>,
    symbols: Map<SymbolID, Symbol>,
    productions: Vec<Production>,
    start: SymbolID,
    next_symbol_id: u16,
}

impl Grammar {
    fn new() -> Self {
        let mut grammar = Self {
            names: Map::default(),
            symbols: Map::default(),
            productions: Vec::new(),
            start: SymbolID::DEAD,
            next_symbol_id: SymbolID::OFFSET,
        };
        for (id, name) in [
            (SymbolID::DEAD, "$dead"),
            (SymbolID::EPSILON, "\u{3b5}"),
            (SymbolID::START, "S'"),
            (SymbolID::END, "$"),
        ] {
            grammar.names.insert(name.to_owned(), id);
            grammar.symbols.insert(
                id,
                Symbol {
                    name: name.to_owned(),
                    terminal: true,
                    start: false,
                },
            );
        }
        grammar
    }

    /// Builds a grammar from the ordered production list produced by
    /// the description parser. An empty rhs denotes an epsilon
    /// production.
    pub fn from_productions<I>(rules: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (char, Vec<char>)>,
    {
        let mut grammar = Self::new();
        for (left, right) in rules {
            let left = grammar.intern_checked(left)?;
            let right = if right.is_empty() {
                vec![SymbolID::EPSILON]
            } else {
                right
                    .into_iter()
                    .map(|c| grammar.intern_checked(c))
                    .collect::<Result<_, _>>()?
            };
            grammar.productions.push(Production { left, right });
        }
        if grammar.productions.is_empty() {
            return Err(GrammarError::Empty);
        }
        grammar.start = grammar.productions[0].left;
        grammar.refresh();
        Ok(grammar)
    }

    fn intern_checked(&mut self, c: char) -> Result<SymbolID, GrammarError> {
        if c == '$' || c == '\u{3b5}' || c.is_whitespace() || c.is_control() {
            return Err(GrammarError::ReservedSymbol(c));
        }
        Ok(self.intern(c.to_string()))
    }

    fn intern(&mut self, name: String) -> SymbolID {
        if let Some(&id) = self.names.get(&name) {
            return id;
        }
        let id = SymbolID::from_raw(self.next_symbol_id);
        self.next_symbol_id += 1;
        self.names.insert(name.clone(), id);
        self.symbols.insert(
            id,
            Symbol {
                name,
                terminal: true,
                start: false,
            },
        );
        id
    }

    /// Interns one character of the candidate input string. Characters
    /// the grammar never mentions get a fresh id; no parse-table column
    /// exists for them, so they reject on lookup.
    pub fn input_symbol(&mut self, token: char) -> SymbolID {
        self.intern(token.to_string())
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolID> {
        self.names.get(name).copied()
    }

    pub fn symbol(&self, id: SymbolID) -> &Symbol {
        &self.symbols[&id]
    }

    pub fn name(&self, id: SymbolID) -> &str {
        self.symbols[&id].name()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn productions(&self) -> impl Iterator<Item = (usize, &Production)> + '_ {
        self.productions.iter().enumerate()
    }

    pub fn production(&self, index: usize) -> &Production {
        &self.productions[index]
    }

    pub fn production_count(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    pub(crate) fn retain_productions<F>(&mut self, f: F)
    where
        F: FnMut(&Production) -> bool,
    {
        self.productions.retain(f);
    }

    /// Re-derives every symbol's classification from the current
    /// production list: a symbol is a non-terminal iff it appears as
    /// some lhs, and carries the start flag iff it is the start symbol.
    /// Idempotent; must run after every structural mutation.
    pub fn refresh(&mut self) {
        let left_sides: SymbolSet = self.productions.iter().map(|p| p.left).collect();
        let start = self.start_symbol();
        for (&id, symbol) in self.symbols.iter_mut() {
            symbol.terminal = !left_sides.contains(id);
            symbol.start = id == start;
        }
    }

    /// The lhs of the first user production, as fixed at construction;
    /// the parse stack and reachability are seeded with it. Hygiene may
    /// reorder or erase productions and augmentation prepends `S'`, but
    /// neither changes the answer.
    pub fn start_symbol(&self) -> SymbolID {
        self.start
    }

    pub fn is_augmented(&self) -> bool {
        self.productions
            .first()
            .map_or(false, |p| p.left == SymbolID::START)
    }

    /// Inserts `S' --> S $` ahead of the user productions and
    /// reclassifies. Runs at most once per grammar.
    pub fn augment(&mut self) {
        if self.is_augmented() {
            return;
        }
        let start = self.start_symbol();
        self.productions.insert(
            0,
            Production {
                left: SymbolID::START,
                right: vec![start, SymbolID::END],
            },
        );
        self.refresh();
    }

    /// Every lhs symbol, in first-occurrence order.
    pub fn non_terminals(&self) -> Set<SymbolID> {
        self.productions.iter().map(|p| p.left).collect()
    }

    /// Every rhs symbol that is not an lhs, in first-occurrence order.
    /// The epsilon symbol is not a terminal of the language and is
    /// excluded; `$` is included once the grammar is augmented.
    pub fn terminals(&self) -> Set<SymbolID> {
        let left_sides: SymbolSet = self.productions.iter().map(|p| p.left).collect();
        self.productions
            .iter()
            .flat_map(|p| p.right.iter().copied())
            .filter(|&s| s != SymbolID::EPSILON && !left_sides.contains(s))
            .collect()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start symbol: {}", self.name(self.start_symbol()))?;
        write!(f, "non-terminals: ")?;
        for (i, id) in self.non_terminals().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.name(id))?;
        }
        write!(f, "\nterminals: ")?;
        for (i, id) in self.terminals().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.name(id))?;
        }
        writeln!(f, "\nproductions:")?;
        for (index, production) in self.productions() {
            writeln!(f, "  [{:02}] {}", index, production.display(self))?;
        }
        Ok(())
    }
}
