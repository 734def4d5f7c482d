//! Build the command database from a legacy flat `commands.json`.
//!
//! Usage:
//!   catdb-import --legacy db/commands.json [--db-dir DIR] [--source rtorr] [--force]
//!
//! Writes `command_mappings.json` and `<source>_commands.json` into the
//! database directory. Categories are decided automatically.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use vim_prompt::legacy::{DEFAULT_SOURCE, DEFAULT_SOURCE_URL, ImportOptions, run_import};
use vim_prompt::report::render_import;
use vim_prompt::{DbArgs, DbPaths, Palette, init_tracing};

#[derive(Parser, Debug)]
#[command(name = "catdb-import")]
#[command(about = "Import a legacy command list into the mapping store")]
struct Cli {
    #[command(flatten)]
    db: DbArgs,
    /// Legacy JSON array of {command, name, description, rtorr_description}.
    #[arg(long, value_name = "FILE")]
    legacy: PathBuf,
    /// Source name; the side file is written as <source>_commands.json.
    #[arg(long, default_value = DEFAULT_SOURCE)]
    source: String,
    /// Base URL of the source's documentation page.
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    url: String,
    /// Replace an existing mapping store.
    #[arg(long)]
    force: bool,
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

    let options = ImportOptions {
        source: cli.source,
        url: cli.url,
        force: cli.force,
    };
    let report = run_import(&paths, &cli.legacy, &options)?;
    render_import(&mut std::io::stdout().lock(), palette, &report)?;
    Ok(())
}
