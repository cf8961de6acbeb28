//! First-run setup: schema, CSV seed data and the admin account.

use crate::{Connection, ConnectionErr, CreateUserOutcome, ImportOutcome, ImportRequest};
use std::path::Path;
use tracing::{error, info, warn};

pub const RAW_DATA_DIR: &str = "DATA";

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_SECRET: &str = "Admin123!";
pub const ADMIN_ROLE: &str = "admin";

/// A seed file and the table it loads into.
#[derive(Clone, Copy, Debug)]
pub struct CsvSource {
    pub file_name: &'static str,
    pub table: &'static str,
    pub rename: &'static [(&'static str, &'static str)],
}

pub const CSV_SOURCES: [CsvSource; 3] = [
    CsvSource {
        file_name: "cyber_incidents.csv",
        table: crate::schema::INCIDENTS_TABLE,
        rename: &[("incident_type", "category")],
    },
    CsvSource {
        file_name: "datasets_metadata.csv",
        table: crate::schema::DATASETS_TABLE,
        rename: &[],
    },
    CsvSource {
        file_name: "it_tickets.csv",
        table: crate::schema::TICKETS_TABLE,
        rename: &[],
    },
];

#[derive(Debug)]
pub enum SourceStatus {
    Missing,
    Skipped { existing_rows: usize },
    Imported(ImportOutcome),
    CheckFailed(ConnectionErr),
}

#[derive(Debug)]
pub struct SourceReport {
    pub source: CsvSource,
    pub status: SourceStatus,
}

#[derive(Debug)]
pub struct BootReport {
    pub sources: Vec<SourceReport>,
    pub admin: CreateUserOutcome,
}

/// Opens (creating if needed) the database in `db_dir` and seeds it.
pub fn boot_system(
    db_dir: impl AsRef<Path>,
    data_dir: impl AsRef<Path>,
) -> Result<BootReport, ConnectionErr> {
    let db_path = Connection::db_path_in(&db_dir);
    if db_path.exists() {
        info!("existing database detected: {}", db_path.display());
    } else {
        info!("creating new database at: {}", db_path.display());
    }

    let conn = Connection::new(&db_dir)?;
    boot_connection(&conn, data_dir)
}

/// Seeds every empty table from its CSV, then makes sure the admin account
/// exists. A missing or broken CSV is reported and the remaining sources
/// still load.
pub fn boot_connection(
    conn: &Connection,
    data_dir: impl AsRef<Path>,
) -> Result<BootReport, ConnectionErr> {
    let sources = CSV_SOURCES
        .iter()
        .map(|source| SourceReport {
            source: *source,
            status: load_source(conn, data_dir.as_ref(), source),
        })
        .collect();

    let admin = conn.create_user(ADMIN_USERNAME, ADMIN_SECRET, ADMIN_ROLE)?;
    match admin {
        CreateUserOutcome::Created { .. } => info!("admin account created"),
        CreateUserOutcome::AlreadyExists => info!("admin account already exists"),
    }

    Ok(BootReport { sources, admin })
}

fn load_source(conn: &Connection, data_dir: &Path, source: &CsvSource) -> SourceStatus {
    let path = data_dir.join(source.file_name);
    if !path.exists() {
        warn!("CSV not found: {}", path.display());
        return SourceStatus::Missing;
    }

    match conn.table_row_count(source.table) {
        Ok(0) => {
            let request = ImportRequest::new(path, source.table)
                .with_rename(source.rename.iter().copied());
            let outcome = conn.import_csv(&request);
            info!(
                "loaded {} records into '{}'",
                outcome.rows_written(),
                source.table
            );
            SourceStatus::Imported(outcome)
        }
        Ok(existing_rows) => {
            info!(
                "'{}' already contains {} rows; skipping import",
                source.table, existing_rows
            );
            SourceStatus::Skipped { existing_rows }
        }
        Err(err) => {
            error!("failed to check '{}' before import: {}", source.table, err);
            SourceStatus::CheckFailed(err)
        }
    }
}
