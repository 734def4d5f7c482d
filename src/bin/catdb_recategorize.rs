//! Interactively review commands whose stored category the patterns do not
//! support.
//!
//! Only flagged commands are shown: those matching no pattern and those whose
//! category is not among their matches. The store is written only if a
//! reviewer actually changed something.

use anyhow::Result;
use clap::Parser;
use std::io;
use vim_prompt::prompt::ConsoleResolver;
use vim_prompt::report::render_recategorize;
use vim_prompt::{DbArgs, DbPaths, Palette, init_tracing, run_recategorize};

#[derive(Parser, Debug)]
#[command(name = "catdb-recategorize")]
#[command(about = "Review ambiguous or mismatched command categories")]
struct Cli {
    #[command(flatten)]
    db: DbArgs,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = DbPaths::resolve(&cli.db)?;
    let palette = if cli.no_color {
        Palette::plain()
    } else {
        Palette::auto()
    };

    println!("\n{}\n", palette.header("Starting Category Update"));
    let stdin = io::stdin();
    let mut resolver = ConsoleResolver::new(stdin.lock(), io::stdout(), palette);
    let report = run_recategorize(&paths, &mut resolver)?;
    render_recategorize(&mut io::stdout().lock(), palette, &report)?;
    Ok(())
}
