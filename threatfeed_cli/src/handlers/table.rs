use threatfeed_core::Connection;

use crate::{cli::Config, output::batch_output, CLIErr};

/// Shows a whole table in the current output mode.
pub fn handle_table(table: &str, connection: &Connection, config: &Config) -> Result<(), CLIErr> {
    let batch = connection.read_table(table)?;
    batch_output(&batch, config)
}
