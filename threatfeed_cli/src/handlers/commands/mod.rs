use std::path::PathBuf;

use clap::{
    builder::{NonEmptyStringValueParser, PossibleValuesParser, TypedValueParser},
    command, Parser,
};
use threatfeed_core::{
    ConflictPolicy, Connection, CreateUserOutcome, NewIncident, INCIDENT_STATUSES,
    SEVERITY_LEVELS, THREAT_TYPES,
};

use crate::{
    cli::{Config, OutputMode},
    CLIErr,
};

mod boot;
mod dashboard;
mod import;
mod info;

#[derive(Debug, Parser)]
#[command(name = "", version, about)]
pub enum ThreatfeedCommand {
    Exit,
    /// Seed empty tables from the data directory and ensure the admin account.
    Boot,
    Import {
        path: PathBuf,
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        table: String,
        #[arg(value_parser = PossibleValuesParser::new(["append", "replace", "fail"]).map(|s| match s.as_str() {
            "append" => ConflictPolicy::Append,
            "replace" => ConflictPolicy::Replace,
            "fail" => ConflictPolicy::FailIfExists,
            _ => unreachable!()
        }), short = 'e', long, default_value = "append")]
        if_exists: ConflictPolicy,
        /// Rename a source column before matching, as `old=new`.
        #[arg(short, long = "map", value_parser = parse_rename)]
        map: Vec<(String, String)>,
    },
    Info {
        #[command(subcommand)]
        command: info::Info,
    },
    Dashboard,
    /// Record a new incident.
    Log {
        date: String,
        #[arg(value_parser = PossibleValuesParser::new(THREAT_TYPES))]
        category: String,
        #[arg(value_parser = PossibleValuesParser::new(SEVERITY_LEVELS))]
        severity: String,
        #[arg(value_parser = PossibleValuesParser::new(INCIDENT_STATUSES))]
        status: String,
        #[arg(trailing_var_arg = true, num_args = 0..)]
        description: Vec<String>,
    },
    User {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,
        secret: String,
        #[arg(short, long, default_value = "user")]
        role: String,
    },
    Mode {
        #[arg(short, long, value_enum)]
        output_mode: Option<OutputMode>,

        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Column counted by the graphical output.
        #[arg(short, long)]
        group_by: Option<String>,
    },
}

fn parse_rename(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((old, new)) if !old.is_empty() && !new.is_empty() => {
            Ok((old.to_string(), new.to_string()))
        }
        _ => Err(format!("expected old=new, got \"{arg}\"")),
    }
}

pub fn handle_command(
    command: ThreatfeedCommand,
    connection: &mut Connection,
    config: &mut Config,
) -> Result<(), CLIErr> {
    match command {
        ThreatfeedCommand::Boot => boot::handle_boot_command(connection, config),
        ThreatfeedCommand::Import {
            path,
            table,
            if_exists,
            map,
        } => {
            import::handle_import_command(connection, path, table, if_exists, map);
            Ok(())
        }
        ThreatfeedCommand::Info { command } => info::handle_info_command(connection, config, command),
        ThreatfeedCommand::Dashboard => dashboard::handle_dashboard_command(connection),
        ThreatfeedCommand::Log {
            date,
            category,
            severity,
            status,
            description,
        } => {
            let id = connection.insert_incident(&NewIncident {
                date,
                category,
                severity,
                status,
                description: description.join(" "),
                reported_by: None,
            })?;
            println!("Logged incident #{}", id);
            Ok(())
        }
        ThreatfeedCommand::User { name, secret, role } => {
            match connection.create_user(&name, &secret, &role)? {
                CreateUserOutcome::Created { id } => println!("Created user \"{}\" (#{})", name, id),
                CreateUserOutcome::AlreadyExists => println!("User \"{}\" already exists", name),
            }
            Ok(())
        }
        ThreatfeedCommand::Exit => Ok(()),
        ThreatfeedCommand::Mode {
            output_mode,
            path: output_path,
            group_by,
        } => {
            if let Some(output_mode) = output_mode {
                config.output_mode = output_mode;
            }

            if let Some(output_path) = output_path {
                config.path = Some(output_path);
            }

            if let Some(group_by) = group_by {
                config.group_by = group_by;
            }

            Ok(())
        }
    }
}
