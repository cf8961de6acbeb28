use crate::store::sqlite::{self, SqliteTableStore};
use crate::store::StoreSource;
use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use crate::batch::RowBatch;
pub use crate::error::{print_error, ConnectionErr, ImportErr, ImportErrKind, StoreErr};
pub use crate::importer::{import_csv, ImportOutcome, ImportRequest};
pub use crate::metrics::IncidentMetrics;
pub use crate::records::datasets::NewDataset;
pub use crate::records::incidents::{
    NewIncident, INCIDENT_STATUSES, SEVERITY_LEVELS, THREAT_TYPES,
};
pub use crate::records::users::{CreateUserOutcome, User};
pub use crate::store::{ConflictPolicy, TableStore};

pub const DB_FILE_NAME: &str = "threatfeed.sqlite";

/// A single scalar cell, either parsed from a CSV field or read back from the
/// store.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    /// Wraps a raw CSV field. Empty fields are null; everything else stays
    /// text as written so the destination column's affinity decides the
    /// stored type.
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Self::Null
        } else {
            Self::Text(field.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(integer) => write!(f, "{}", integer),
            Self::Real(real) => write!(f, "{}", real),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Self::Integer(integer) => ToSqlOutput::from(*integer),
            Self::Real(real) => ToSqlOutput::from(*real),
            Self::Text(text) => ToSqlOutput::from(text.as_str()),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(integer) => Self::Integer(integer),
            ValueRef::Real(real) => Self::Real(real),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Self::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: usize,
}

/// Handle on the dashboard database. Record reads and writes go through the
/// connection held here; bulk imports open their own store per call.
pub struct Connection {
    db_dir: PathBuf,
    conn: rusqlite::Connection,
}

impl Connection {
    pub fn new(db_dir: impl AsRef<Path>) -> Result<Self, ConnectionErr> {
        let db_dir = db_dir.as_ref().to_path_buf();
        fs::create_dir_all(&db_dir).map_err(|source| ConnectionErr::DatabaseCreationErr {
            db_dir: db_dir.clone(),
            source,
        })?;

        let mut conn = rusqlite::Connection::open(Self::db_path_in(&db_dir))?;
        schema::create_all_tables(&mut conn)?;
        debug!("opened database in {}", db_dir.display());

        Ok(Self { db_dir, conn })
    }

    pub fn db_path_in(db_dir: impl AsRef<Path>) -> PathBuf {
        db_dir.as_ref().join(DB_FILE_NAME)
    }

    pub fn db_dir(&self) -> &Path {
        &self.db_dir
    }

    pub fn db_path(&self) -> PathBuf {
        Self::db_path_in(&self.db_dir)
    }

    pub fn import_csv(&self, request: &ImportRequest) -> ImportOutcome {
        importer::import_csv(self, request)
    }

    pub fn table_row_count(&self, table: &str) -> Result<usize, ConnectionErr> {
        Ok(sqlite::count_rows(&self.conn, table)?)
    }

    pub fn table_columns(&self, table: &str) -> Result<Vec<String>, ConnectionErr> {
        Ok(sqlite::table_columns(&self.conn, table)?)
    }

    pub fn read_table(&self, table: &str) -> Result<RowBatch, ConnectionErr> {
        let sql = format!("SELECT * FROM {}", sqlite::quote_identifier(table));
        Ok(sqlite::query_batch(&self.conn, &sql, [])?)
    }

    pub fn list_tables(&self) -> Result<Vec<TableSummary>, ConnectionErr> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<usize, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        names
            .into_iter()
            .map(|name| {
                Ok(TableSummary {
                    columns: self.table_columns(&name)?,
                    rows: self.table_row_count(&name)?,
                    name,
                })
            })
            .collect()
    }
}

impl StoreSource for Connection {
    type Store = SqliteTableStore;

    fn open_store(&self) -> Result<Self::Store, StoreErr> {
        SqliteTableStore::open(self.db_path())
    }
}

pub mod batch;
pub mod boot;
pub mod error;
pub mod importer;
pub mod metrics;
pub mod records;
pub mod schema;
pub mod store;

mod utils;

#[cfg(test)]
mod e2e_tests;
