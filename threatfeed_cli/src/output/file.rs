use std::path::Path;

use threatfeed_core::RowBatch;

use crate::{cli::Config, CLIErr};

use super::CliOutput;

pub struct FileWriter;

impl CliOutput for FileWriter {
    fn output(batch: &RowBatch, config: &Config) -> Result<(), CLIErr> {
        match &config.path {
            Some(path) => match path.extension().and_then(|ext| ext.to_str()) {
                Some("csv") => {
                    FileWriter::output_csv(batch, path)?;
                    println!("Wrote {} rows to {:?}", batch.len(), path);
                    Ok(())
                }
                None => Err(CLIErr::UnsupportedFileErr {
                    extension: "N/A".to_string(),
                }),
                Some(extension) => Err(CLIErr::UnsupportedFileErr {
                    extension: extension.to_string(),
                }),
            },
            None => Err(CLIErr::MissingOutputPathErr),
        }
    }
}

impl FileWriter {
    fn output_csv(batch: &RowBatch, path: &Path) -> Result<(), CLIErr> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(batch.columns())?;
        for row in batch.rows() {
            writer.write_record(row.iter().map(|value| value.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}
