//! Validate category assignments against the catalogue patterns.
//!
//! Exits 0 when there are no errors and 1 otherwise; warnings never fail the
//! run. The store is only read.

use anyhow::Result;
use clap::Parser;
use vim_prompt::report::render_validation;
use vim_prompt::{DbArgs, DbPaths, Palette, init_tracing, run_validate};

#[derive(Parser, Debug)]
#[command(name = "catdb-validate")]
#[command(about = "Check stored categories for consistency with the catalogue")]
struct Cli {
    #[command(flatten)]
    db: DbArgs,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

fn main() {
    init_tracing();
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    let paths = DbPaths::resolve(&cli.db)?;
    let palette = if cli.no_color {
        Palette::plain()
    } else {
        Palette::auto()
    };

    let report = run_validate(&paths)?;
    render_validation(&mut std::io::stdout().lock(), palette, &report)?;
    Ok(report.passed())
}
