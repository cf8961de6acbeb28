use tabled::{builder::Builder, settings::Style};
use threatfeed_core::{
    boot::{boot_connection, SourceStatus, ADMIN_USERNAME},
    Connection, CreateUserOutcome,
};

use crate::{cli::Config, CLIErr};

use super::import::describe_outcome;

pub fn handle_boot_command(connection: &Connection, config: &Config) -> Result<(), CLIErr> {
    println!("Reading from: {:?}", &config.data_dir);
    let report = boot_connection(connection, &config.data_dir)?;

    let mut rows = Vec::<Vec<String>>::new();
    rows.push(vec![
        "File".to_string(),
        "Table".to_string(),
        "Result".to_string(),
    ]);

    for source in &report.sources {
        let result = match &source.status {
            SourceStatus::Missing => "File not found".to_string(),
            SourceStatus::Skipped { existing_rows } => {
                format!("Skipped, table already holds {} rows", existing_rows)
            }
            SourceStatus::Imported(outcome) => describe_outcome(source.source.table, outcome),
            SourceStatus::CheckFailed(err) => format!("Could not inspect table: {}", err),
        };
        rows.push(vec![
            source.source.file_name.to_string(),
            source.source.table.to_string(),
            result,
        ]);
    }

    let mut table = Builder::from(rows).build();
    table.with(Style::modern_rounded());
    println!("{}", table);

    match report.admin {
        CreateUserOutcome::Created { .. } => println!("Created account \"{}\"", ADMIN_USERNAME),
        CreateUserOutcome::AlreadyExists => {
            println!("Account \"{}\" already exists", ADMIN_USERNAME)
        }
    }
    Ok(())
}
