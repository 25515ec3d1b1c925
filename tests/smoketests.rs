use dialect::grammar::Grammar;
use dialect::parser::{Ll1Parser, ParseError};
use dialect::syntax;

/// Runs the whole pipeline over a grammar description and one input
/// string.
fn recognise(description: &str, input: &str) -> Result<bool, ParseError> {
    let rules = syntax::parse(description).unwrap();
    let mut grammar = Grammar::from_productions(rules).unwrap();
    let sets = dialect::analyze(&mut grammar).unwrap();
    let tokens: Vec<_> = input.chars().map(|c| grammar.input_symbol(c)).collect();
    Ll1Parser::new(&grammar, &sets)
        .parse(&tokens)
        .map(|outcome| outcome.accepted)
}

const ARITHMETIC: &str = "\
# arithmetic expressions
E --> T X
X --> + T X |
T --> F Y
Y --> * F Y |
F --> ( E ) | i
";

#[test]
fn arithmetic() {
    assert!(recognise(ARITHMETIC, "i+i*i").unwrap());
    assert!(recognise(ARITHMETIC, "(i+i)*i").unwrap());
    assert!(recognise(ARITHMETIC, "i").unwrap());
    assert!(!recognise(ARITHMETIC, "i+").unwrap());
    assert!(!recognise(ARITHMETIC, "+i").unwrap());
    assert!(!recognise(ARITHMETIC, "").unwrap());
}

#[test]
fn matched_pairs() {
    let g = "S --> a S b |\n";
    assert!(recognise(g, "").unwrap());
    assert!(recognise(g, "ab").unwrap());
    assert!(recognise(g, "aaabbb").unwrap());
    assert!(!recognise(g, "aab").unwrap());
    assert!(!recognise(g, "ba").unwrap());
}

#[test]
fn unreachable_rules_do_not_disturb_recognition() {
    let g = "S --> a\nU --> U b\n";
    assert!(recognise(g, "a").unwrap());
    assert!(!recognise(g, "b").unwrap());
}

#[test]
fn non_generating_rules_do_not_disturb_recognition() {
    let g = "S --> A B | a\nA --> a\nB --> B c\n";
    assert!(recognise(g, "a").unwrap());
    assert!(!recognise(g, "ac").unwrap());
}

#[test]
fn conflicted_grammar_is_recognised_by_fallback() {
    // [A][b] is claimed by both A --> b and the epsilon production.
    let g = "S --> a A a | b A b a\nA --> b |\n";
    assert!(recognise(g, "aba").unwrap());
    assert!(recognise(g, "bba").unwrap());
    assert!(!recognise(g, "ab").unwrap());
}

#[test]
fn ambiguous_fallback_prediction_is_fatal() {
    let g = "S --> A\nA --> a b | a c\n";
    assert!(matches!(
        recognise(g, "ab"),
        Err(ParseError::NotLL1 { .. })
    ));
}

#[test]
fn spaces_are_legal_terminals_of_the_input() {
    // The grammar cannot name a space, so spaced input rejects.
    let g = "S --> a b\n";
    assert!(recognise(g, "ab").unwrap());
    assert!(!recognise(g, "a b").unwrap());
}
