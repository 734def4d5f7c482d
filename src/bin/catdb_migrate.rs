//! Recompute every command's category from the catalogue patterns.
//!
//! Usage:
//!   catdb-migrate [--db-dir DIR] [--dry-run]
//!
//! The store is rewritten only when at least one category changed, so a
//! clean database produces no diff.

use anyhow::Result;
use clap::Parser;
use vim_prompt::report::render_migration;
use vim_prompt::{DbArgs, DbPaths, MigrateOptions, Palette, init_tracing, run_migrate};

#[derive(Parser, Debug)]
#[command(name = "catdb-migrate")]
#[command(about = "Recategorize every command automatically and persist changes")]
struct Cli {
    #[command(flatten)]
    db: DbArgs,
    /// Report what would change without writing the store.
    #[arg(long)]
    dry_run: bool,
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

    println!("Starting migration...");
    let report = run_migrate(
        &paths,
        MigrateOptions {
            dry_run: cli.dry_run,
        },
    )?;
    render_migration(&mut std::io::stdout().lock(), palette, &report)?;
    Ok(())
}
