use std::{error::Error, path::PathBuf};
use thiserror::Error;

pub fn print_error(err: &impl Error) {
    eprintln!("Encountered error: {}", err);
}

#[derive(Error, Debug)]
pub enum StoreErr {
    #[error("SQLite Error: {0}")]
    SQLiteErr(#[from] rusqlite::Error),
    #[error("Table \"{table}\" already holds {rows} rows.")]
    TableNotEmpty { table: String, rows: usize },
    #[error("Table \"{table}\" has no stored definition to recreate from.")]
    MissingTableErr { table: String },
}

/// Coarse classification of an [`ImportErr`], used by callers that only need
/// to know which boundary failed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ImportErrKind {
    File,
    Parse,
    Conflict,
    Store,
}

#[derive(Error, Debug)]
pub enum ImportErr {
    #[error("Failed to read source file {path:?}.")]
    FileErr {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path:?}: {source}")]
    ParseErr {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Source file {path:?} has no header row.")]
    MissingHeaderErr { path: PathBuf },
    #[error("Table \"{table}\" already holds {rows} rows; refusing to import.")]
    ConflictErr { table: String, rows: usize },
    #[error(transparent)]
    StoreErr(StoreErr),
}

impl ImportErr {
    pub fn kind(&self) -> ImportErrKind {
        match self {
            Self::FileErr { .. } => ImportErrKind::File,
            Self::ParseErr { .. } | Self::MissingHeaderErr { .. } => ImportErrKind::Parse,
            Self::ConflictErr { .. } => ImportErrKind::Conflict,
            Self::StoreErr(_) => ImportErrKind::Store,
        }
    }

    pub(crate) fn from_csv(path: PathBuf, err: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io_err) = err.kind() {
            let source = std::io::Error::new(io_err.kind(), io_err.to_string());
            return Self::FileErr { path, source };
        }
        Self::ParseErr { path, source: err }
    }
}

impl From<StoreErr> for ImportErr {
    fn from(err: StoreErr) -> Self {
        match err {
            StoreErr::TableNotEmpty { table, rows } => Self::ConflictErr { table, rows },
            other => Self::StoreErr(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConnectionErr {
    #[error("SQLite Error: {0}")]
    SQLiteErr(#[from] rusqlite::Error),
    #[error(transparent)]
    StoreErr(#[from] StoreErr),
    #[error("Failed to create the directory for the database: {db_dir}.")]
    DatabaseCreationErr {
        db_dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create user: {username}.")]
    UserCreationErr { username: String },
}
