//! Parsing of grammar description files.
//!
//! A description is line oriented:
//!
//! ```text
//! # arithmetic expressions
//! E --> T X
//! X --> + T X |
//! T --> F Y
//! Y --> * F Y |
//! F --> ( E ) | i
//! ```
//!
//! Every symbol is a single character; whitespace only separates
//! symbols, `-->` and `|` are operators, and `#` comments to end of
//! line. An empty alternative denotes the empty string, so a trailing
//! `|` gives the lhs an epsilon production.

use logos::Logos;

#[derive(Debug, Copy, Clone, PartialEq, Logos)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
enum Token {
    #[token("-->")]
    Arrow,

    #[token("|")]
    Pipe,

    #[token("\n")]
    Newline,

    #[regex(r"[^ \t\r\n|#]", |lex| lex.slice().chars().next().unwrap())]
    Symbol(char),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("line {line}: unrecognised token")]
    Lexer { line: usize },
    #[error("line {line}: a production starts with a single head symbol")]
    ExpectedHead { line: usize },
    #[error("line {line}: expected `-->` after `{lhs}`")]
    ExpectedArrow { line: usize, lhs: char },
    #[error("line {line}: unexpected `-->`")]
    UnexpectedArrow { line: usize },
    #[error("grammar description contains no productions")]
    Empty,
}

/// Parses a description into the ordered production list consumed by
/// [`Grammar::from_productions`](crate::grammar::Grammar::from_productions).
/// An alternative list `L --> α | β` yields one list entry per
/// alternative, in source order.
pub fn parse(source: &str) -> Result<Vec<(char, Vec<char>)>, SyntaxError> {
    let mut tokens = vec![];
    let mut line = 1;
    for result in Token::lexer(source) {
        match result {
            Ok(token) => {
                tokens.push((token, line));
                if token == Token::Newline {
                    line += 1;
                }
            }
            Err(()) => return Err(SyntaxError::Lexer { line }),
        }
    }

    let mut rules = vec![];
    let mut iter = tokens.into_iter();
    while let Some((token, line)) = iter.next() {
        let lhs = match token {
            Token::Newline => continue,
            Token::Symbol(c) => c,
            _ => return Err(SyntaxError::ExpectedHead { line }),
        };
        match iter.next() {
            Some((Token::Arrow, _)) => {}
            _ => return Err(SyntaxError::ExpectedArrow { line, lhs }),
        }
        let mut alternative = vec![];
        loop {
            match iter.next() {
                Some((Token::Symbol(c), _)) => alternative.push(c),
                Some((Token::Pipe, _)) => rules.push((lhs, std::mem::take(&mut alternative))),
                Some((Token::Arrow, line)) => {
                    return Err(SyntaxError::UnexpectedArrow { line })
                }
                Some((Token::Newline, _)) | None => {
                    rules.push((lhs, alternative));
                    break;
                }
            }
        }
    }

    if rules.is_empty() {
        return Err(SyntaxError::Empty);
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lexer_smoketest() {
        let tokens: Vec<Token> = Token::lexer("E --> ( E ) | i # trailing\n")
            .collect::<Result<_, _>>()
            .unwrap();
        use Token::*;
        assert_eq!(
            tokens,
            [
                Symbol('E'),
                Arrow,
                Symbol('('),
                Symbol('E'),
                Symbol(')'),
                Pipe,
                Symbol('i'),
                Newline,
            ]
        );
    }

    #[test]
    fn alternatives_expand_in_source_order() {
        let rules = parse("S --> a S b |\nT --> c\n").unwrap();
        assert_eq!(
            rules,
            vec![
                ('S', vec!['a', 'S', 'b']),
                ('S', vec![]),
                ('T', vec!['c']),
            ]
        );
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let rules = parse("# heading\n\nS --> a # tail comment\n\n").unwrap();
        assert_eq!(rules, vec![('S', vec!['a'])]);
    }

    #[test]
    fn symbols_need_not_be_separated() {
        let rules = parse("E --> TX").unwrap();
        assert_eq!(rules, vec![('E', vec!['T', 'X'])]);
    }

    #[test]
    fn missing_arrow_is_reported() {
        assert_eq!(
            parse("S a\n"),
            Err(SyntaxError::ExpectedArrow { line: 1, lhs: 'S' })
        );
    }

    #[test]
    fn stray_arrow_is_reported() {
        assert_eq!(
            parse("S --> a --> b\n"),
            Err(SyntaxError::UnexpectedArrow { line: 1 })
        );
        assert_eq!(
            parse("--> a\n"),
            Err(SyntaxError::ExpectedHead { line: 1 })
        );
    }

    #[test]
    fn empty_description_is_reported() {
        assert_eq!(parse("# nothing here\n"), Err(SyntaxError::Empty));
    }
}
