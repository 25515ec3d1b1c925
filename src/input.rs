//! Reading of the candidate input string.

use std::fs;
use std::io::{self, BufRead as _, Write as _};

/// Reads the string to recognise from `source`, where `-` designates
/// standard input (one line, after a prompt). Line breaks are not part
/// of the input alphabet and are discarded; every other character,
/// spaces included, is one terminal.
pub fn read(source: &str) -> io::Result<Vec<char>> {
    let text = if source == "-" {
        print!("dialect: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line
    } else {
        fs::read_to_string(source)?
    };
    Ok(text.chars().filter(|&c| c != '\n' && c != '\r').collect())
}
