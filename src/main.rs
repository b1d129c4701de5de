use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use superstore_demo::demo;

#[derive(Parser)]
#[command(
    name = "superstore-demo",
    version,
    about = "Create, insert, update, and delete demonstrations against a file-backed Superstore database"
)]
struct Cli {
    /// Path of the database file the demonstrations run against.
    #[arg(long, default_value = demo::DEFAULT_DATABASE)]
    database: PathBuf,

    #[command(subcommand)]
    command: Option<DemoCommand>,
}

#[derive(Subcommand)]
enum DemoCommand {
    /// Create the five Superstore tables in a fresh database file.
    Create,
    /// Create the tables and load the sample rows.
    Insert,
    /// Copy the database and shift early and late order dates by ten days.
    Update,
    /// Copy the database and delete early orders with their customers.
    Delete,
    /// Run the insert, update, and delete demonstrations in sequence.
    All,
}

/// Places a demonstration copy next to the source database file.
fn sibling(database: &Path, file_name: &str) -> PathBuf {
    match database.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

fn run(cli: &Cli) -> superstore_demo::Result<()> {
    match cli.command.as_ref().unwrap_or(&DemoCommand::All) {
        DemoCommand::Create => {
            demo::run_create(&cli.database)?;
        }
        DemoCommand::Insert => {
            demo::run_insert(&cli.database)?;
        }
        DemoCommand::Update => {
            demo::run_update(&cli.database, sibling(&cli.database, demo::UPDATE_COPY))?;
        }
        DemoCommand::Delete => {
            demo::run_delete(&cli.database, sibling(&cli.database, demo::DELETE_COPY))?;
        }
        DemoCommand::All => {
            demo::run_insert(&cli.database)?;
            demo::run_update(&cli.database, sibling(&cli.database, demo::UPDATE_COPY))?;
            demo::run_delete(&cli.database, sibling(&cli.database, demo::DELETE_COPY))?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("{err}");
        process::exit(1);
    }
}
