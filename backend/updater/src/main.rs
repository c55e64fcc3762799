use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use catalog::Tab;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};
use updater::{Options, update_tab, utils::parse_content_tab};

/// Replace a tab's seed data from a CSV and rebuild the DB.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the CSV export (UTF-8).
    #[arg(short, long)]
    file: PathBuf,

    /// Content table to replace: tab id, table name or menu number (1-6).
    #[arg(short, long, value_parser = parse_content_tab)]
    table: Tab,

    /// SQLite database to rebuild.
    #[arg(long, env = "DB_PATH", default_value = "app/app.db")]
    db: PathBuf,

    #[arg(long, default_value = "db/schema.sql")]
    schema: PathBuf,

    #[arg(long, default_value = "db/seed.sql")]
    seed: PathBuf,

    /// Only update the seed script, do not rebuild the DB.
    #[arg(long)]
    no_rebuild: bool,

    /// Rows to show after the rebuild.
    #[arg(long, default_value_t = 5)]
    preview: usize,
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => {
            println!("\nDone.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let options = Options {
        csv_path: args.file,
        tab: args.table,
        db_path: args.db,
        schema_path: args.schema,
        seed_path: args.seed,
        rebuild: !args.no_rebuild,
        preview: args.preview,
    };

    update_tab(&options).with_context(|| format!("Updating table '{}' failed", options.tab.table()))?;

    Ok(())
}
