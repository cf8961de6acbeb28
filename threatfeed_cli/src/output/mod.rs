use threatfeed_core::RowBatch;

mod file;
pub mod graphical;
mod tabular;

use crate::{cli::Config, CLIErr};

pub trait CliOutput {
    fn output(batch: &RowBatch, config: &Config) -> Result<(), CLIErr>;
}

pub fn batch_output(batch: &RowBatch, config: &Config) -> Result<(), CLIErr> {
    match config.output_mode {
        crate::cli::OutputMode::Graphical => graphical::Graphical::output(batch, config),
        crate::cli::OutputMode::Tabular => tabular::Tabular::output(batch, config),
        crate::cli::OutputMode::File => file::FileWriter::output(batch, config),
    }
}
