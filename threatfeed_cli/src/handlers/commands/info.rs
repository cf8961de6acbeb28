use clap::Subcommand;
use dir_size::get_size_in_human_bytes;
use tabled::{builder::Builder, settings::Style};
use threatfeed_core::Connection;

use crate::{cli::Config, CLIErr};

#[derive(Debug, Subcommand)]
pub enum Info {
    Stat,
    Tables,
}

pub fn handle_info_command(
    connection: &Connection,
    config: &Config,
    command: Info,
) -> Result<(), CLIErr> {
    match command {
        Info::Stat => {
            let (num_tables, num_rows) = match connection.list_tables() {
                Ok(tables) => (
                    tables.len() as i64,
                    tables.iter().map(|table| table.rows as i64).sum::<i64>(),
                ),
                Err(_) => (-1, -1),
            };

            let dir_size = match get_size_in_human_bytes(&config.db_dir) {
                Ok(size) => size,
                Err(_) => "N/A".to_string(),
            };

            println!("Database: {}", connection.db_path().display());
            println!("Total Tables: {}", num_tables);
            println!("Total Rows: {}", num_rows);
            println!("Storage Used: {}", dir_size);

            Ok(())
        }
        Info::Tables => {
            let mut rows = Vec::<Vec<String>>::new();
            rows.push(vec![
                "Table".to_string(),
                "Rows".to_string(),
                "Columns".to_string(),
            ]);

            for table in connection.list_tables()? {
                rows.push(vec![
                    table.name,
                    table.rows.to_string(),
                    table.columns.join(", "),
                ]);
            }

            let mut table = Builder::from(rows).build();
            table.with(Style::modern_rounded());

            println!("{}", table);
            Ok(())
        }
    }
}
