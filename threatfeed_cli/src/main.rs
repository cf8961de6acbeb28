mod cli;
mod handlers;
pub mod output;

use clap::Parser;
use cli::{Config, EntryArgs, ThreatfeedCli};
use rustyline::error::ReadlineError;
use threatfeed_core::{print_error, Connection, ConnectionErr};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Error, Debug)]
pub enum CLIErr {
    #[error(transparent)]
    ConnectionErr(#[from] ConnectionErr),
    #[error("Column \"{column}\" not found.")]
    UnknownColumnErr { column: String },
    #[error("Failed to write CSV.")]
    CSVErr(#[from] csv::Error),
    #[error("Failed to read line.")]
    ReadLineErr(#[from] ReadlineError),
    #[error("IO Error.")]
    FileIOErr(#[from] std::io::Error),
    #[error("Unsupported file format #{extension}.")]
    UnsupportedFileErr { extension: String },
    #[error("File output needs a path; set one with `.mode -p <path>`.")]
    MissingOutputPathErr,
}

fn run(args: EntryArgs) -> Result<(), CLIErr> {
    let mut config = Config::new(args.db_dir.clone(), args.data_dir);
    let mut connection = Connection::new(&args.db_dir)?;
    info!("using database {}", connection.db_path().display());

    if args.boot {
        return handlers::commands::handle_command(
            handlers::commands::ThreatfeedCommand::Boot,
            &mut connection,
            &mut config,
        );
    }

    let mut cli = ThreatfeedCli::new(connection, config)?;
    cli.repl()
}

pub fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(EntryArgs::parse()) {
        print_error(&err);
        std::process::exit(1);
    }
}
