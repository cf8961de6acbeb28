use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rustyline::{error::ReadlineError, history::FileHistory, DefaultEditor};
use threatfeed_core::{boot::RAW_DATA_DIR, print_error, Connection};

use crate::{handlers, CLIErr};

const THREATFEED_CLI_HEADER: &str = r"
 _____ _                    _    __               _
|_   _| |__  _ __ ___  __ _| |_ / _| ___  ___  __| |
  | | | '_ \| '__/ _ \/ _` | __| |_ / _ \/ _ \/ _` |
  | | | | | | | |  __/ (_| | |_|  _|  __/  __/ (_| |
  |_| |_| |_|_|  \___|\__,_|\__|_|  \___|\___|\__,_|
";
const PROMPT: &str = "$ ";
const COMMAND_PREFIX: &str = ".";

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct EntryArgs {
    /// Directory holding the dashboard database.
    pub db_dir: PathBuf,

    /// Directory holding the seed CSV files.
    #[arg(short, long, default_value = RAW_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Run the boot sequence and exit instead of starting the REPL.
    #[arg(short, long, default_value_t = false)]
    pub boot: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Tabular,
    Graphical,
    File,
}

pub struct Config {
    pub db_dir: PathBuf,
    pub data_dir: PathBuf,
    pub output_mode: OutputMode,
    pub path: Option<PathBuf>,
    pub group_by: String,
}

impl Config {
    pub fn new(db_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            db_dir,
            data_dir,
            output_mode: OutputMode::Tabular,
            path: None,
            group_by: "category".to_string(),
        }
    }
}

pub struct ThreatfeedCli {
    rl: rustyline::Editor<(), FileHistory>,
    connection: Connection,
    config: Config,
}

impl ThreatfeedCli {
    pub fn new(connection: Connection, config: Config) -> Result<Self, CLIErr> {
        Ok(Self {
            rl: DefaultEditor::new()?,
            connection,
            config,
        })
    }

    pub fn repl(&mut self) -> Result<(), CLIErr> {
        println!("{}", THREATFEED_CLI_HEADER);

        loop {
            let input = self.rl.readline(PROMPT);
            match input {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if self.rl.add_history_entry(line).is_err() {
                        println!("Warning: Failed to add line to history.");
                    }

                    if let Some(command_str) = line.strip_prefix(COMMAND_PREFIX) {
                        let args = command_str.split_whitespace();

                        match handlers::commands::ThreatfeedCommand::try_parse_from(
                            std::iter::once("").chain(args),
                        ) {
                            Ok(handlers::commands::ThreatfeedCommand::Exit) => return Ok(()),
                            Ok(command) => {
                                if let Err(err) = handlers::commands::handle_command(
                                    command,
                                    &mut self.connection,
                                    &mut self.config,
                                ) {
                                    print_error(&err);
                                }
                            }
                            Err(err) => {
                                println!("{}", err);
                            }
                        }
                    } else if let Err(err) =
                        handlers::table::handle_table(line, &self.connection, &self.config)
                    {
                        print_error(&err);
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                    return Ok(());
                }
                Err(e) => {
                    return Err(CLIErr::ReadLineErr(e));
                }
            }
        }
    }
}
