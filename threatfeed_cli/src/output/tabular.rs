use tabled::{builder::Builder, settings::Style, Table};
use threatfeed_core::RowBatch;

use crate::{cli::Config, CLIErr};

use super::CliOutput;

pub struct Tabular;

impl CliOutput for Tabular {
    fn output(batch: &RowBatch, _: &Config) -> Result<(), CLIErr> {
        println!("{}", Tabular::build(batch));
        println!("{} rows", batch.len());
        Ok(())
    }
}

impl Tabular {
    fn build(batch: &RowBatch) -> Table {
        let mut builder = Builder::default();
        builder.push_record(batch.columns().iter().cloned());
        for row in batch.rows() {
            builder.push_record(row.iter().map(|value| value.to_string()));
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table
    }
}
