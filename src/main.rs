// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Count (and optionally print) the low-index congruences of a presentation.
//!
//! Letters are written `a`, `b`, `c`, ... and rules as `u=v`; an empty side
//! is the empty word, e.g. `--rule aa=` for `a^2 = 1` in a monoid.
//!
//! ```text
//! sims --letters 2 --monoid --rule aaa=a --rule bb=b --rule abab=a --nodes 5 --print
//! ```

use std::time::Instant;

use clap::Parser;
use log::info;

use sims_search::{CongruenceKind, Presentation, Rule, Sims, Word};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Size of the alphabet.
    #[arg(long, value_name = "INT")]
    letters: usize,

    /// A defining relation `u=v`, letters written a, b, c, ...
    #[arg(long = "rule", value_name = "U=V", value_parser = parse_rule)]
    rules: Vec<Rule>,

    /// Present a monoid (the empty word is a class representative).
    #[arg(long)]
    monoid: bool,

    /// Enumerate two-sided congruences instead of right congruences.
    #[arg(long)]
    two_sided: bool,

    /// Maximum number of classes.
    #[arg(long, value_name = "INT")]
    nodes: usize,

    /// Number of worker threads.
    #[arg(long, value_name = "INT", default_value = "1")]
    threads: usize,

    /// Print every congruence found.
    #[arg(long)]
    print: bool,

    /// Log search statistics.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_word(text: &str) -> Result<Word, String> {
    text.chars()
        .map(|c| {
            if c.is_ascii_lowercase() {
                Ok(c as usize - 'a' as usize)
            } else {
                Err(format!("'{}' is not a letter a-z", c))
            }
        })
        .collect()
}

fn parse_rule(text: &str) -> Result<Rule, String> {
    let (u, v) = text
        .split_once('=')
        .ok_or_else(|| format!("rule '{}' has no '='", text))?;
    Ok((parse_word(u.trim())?, parse_word(v.trim())?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let level = if args.verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut presentation = Presentation::new(args.letters).contains_empty_word(args.monoid);
    for (u, v) in &args.rules {
        presentation.add_rule(u, v);
    }
    let kind = if args.two_sided {
        CongruenceKind::TwoSided
    } else {
        CongruenceKind::OneSided
    };
    let sims = Sims::new(kind)
        .presentation(presentation)
        .number_of_threads(args.threads);

    let start = Instant::now();
    let count = if args.print {
        let mut count = 0u64;
        sims.for_each(args.nodes, |graph| {
            count += 1;
            println!("{}", graph);
        })?;
        count
    } else {
        sims.number_of_congruences(args.nodes)?
    };
    info!(
        "{} {} congruences with at most {} classes ({:.3}s)",
        count,
        kind,
        args.nodes,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule() {
        assert_eq!(parse_rule("aba=b"), Ok((vec![0, 1, 0], vec![1])));
        assert_eq!(parse_rule("aa="), Ok((vec![0, 0], vec![])));
        assert!(parse_rule("ab").is_err());
        assert!(parse_rule("aB=a").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "sims", "--letters", "2", "--rule", "aaa=a", "--rule", "bb=b", "--monoid",
            "--nodes", "5",
        ])
        .unwrap();
        assert_eq!(cli.rules.len(), 2);
        assert!(cli.monoid);
        assert!(!cli.two_sided);
        assert_eq!(cli.threads, 1);
    }
}
