use anyhow::Context as _;
use clap::Parser;
use dialect::{grammar::Grammar, input, parser::Ll1Parser, syntax};
use std::{fs, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

/// Decides whether a string belongs to the language of a context-free
/// grammar, using a strong-LL(1) parse table.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Suppress the grammar and analysis dump.
    #[arg(short, long)]
    quiet: bool,

    /// Path of the grammar description file.
    grammar: PathBuf,

    /// Path of the input to recognise, or `-` for standard input.
    input: String,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    tracing::debug!("parsed CLI args = {:?}", args);

    let source = fs::read_to_string(&args.grammar)
        .with_context(|| format!("cannot open {}", args.grammar.display()))?;
    let rules = syntax::parse(&source).context("error encountered during grammar parse")?;
    let mut grammar = Grammar::from_productions(rules)?;
    if !args.quiet {
        println!("{}", grammar);
    }

    let sets = dialect::analyze(&mut grammar)?;
    if !args.quiet {
        println!("{}", sets.display(&grammar));
    }

    let tokens = input::read(&args.input)
        .with_context(|| format!("cannot open {}", args.input))?;
    let tokens: Vec<_> = tokens
        .into_iter()
        .map(|c| grammar.input_symbol(c))
        .collect();

    let outcome = Ll1Parser::new(&grammar, &sets).parse(&tokens)?;
    print!("{}", outcome.display(&grammar));

    Ok(if outcome.accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
