//! Search the command database and print picker lines or deep links.
//!
//! Usage:
//!   catdb-search <query> [--source rtorr] [--json]
//!   catdb-search --url dd --source rtorr
//!
//! Output is meant to be piped into a fuzzy picker; this binary never spawns
//! one itself.

use anyhow::{Context, Result, bail};
use clap::Parser;
use vim_prompt::report::render_search;
use vim_prompt::{CommandStore, DbArgs, DbPaths, SourceSet, init_tracing};

#[derive(Parser, Debug)]
#[command(name = "catdb-search")]
#[command(about = "Find commands by key, description or alias")]
struct Cli {
    #[command(flatten)]
    db: DbArgs,
    /// Case-insensitive substring to look for.
    query: Option<String>,
    /// Restrict results to one source.
    #[arg(long)]
    source: Option<String>,
    /// Emit hits as a JSON array instead of tab-separated lines.
    #[arg(long)]
    json: bool,
    /// Print the documentation URL for this command key (requires --source).
    #[arg(long, value_name = "KEY", conflicts_with = "query")]
    url: Option<String>,
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
    let sources = SourceSet::load_dir(&paths.db_dir)
        .with_context(|| format!("loading sources from {}", paths.db_dir.display()))?;

    if let Some(key) = cli.url.as_deref() {
        let Some(source) = cli.source.as_deref() else {
            bail!("--url requires --source");
        };
        let url = sources
            .url_for(key, source)
            .with_context(|| format!("command '{key}' not found in source '{source}'"))?;
        println!("{url}");
        return Ok(());
    }

    let store = CommandStore::load(&paths.store)
        .with_context(|| format!("loading command store {}", paths.store.display()))?;
    let query = cli.query.unwrap_or_default();
    let hits = sources.search(&store, &query, cli.source.as_deref());
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        render_search(&mut std::io::stdout().lock(), &hits)?;
    }
    Ok(())
}
