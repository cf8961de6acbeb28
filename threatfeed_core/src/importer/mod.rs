//! CSV bulk import into an existing table.
//!
//! An import parses the source file, renames header names through the
//! optional map, then keeps only the columns the destination already
//! declares. Errors never escape [`import_csv`]; they come back inside the
//! [`ImportOutcome`] so a caller looping over several files can carry on.

use crate::store::{ConflictPolicy, StoreSource, TableStore};
use crate::{ImportErr, RowBatch};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

#[derive(Clone, Debug)]
pub struct ImportRequest {
    pub source_path: PathBuf,
    pub table: String,
    pub policy: ConflictPolicy,
    pub rename: Option<HashMap<String, String>>,
}

impl ImportRequest {
    pub fn new(source_path: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            table: table.into(),
            policy: ConflictPolicy::Append,
            rename: None,
        }
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_rename<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rename: HashMap<String, String> = pairs
            .into_iter()
            .map(|(old, new)| (old.into(), new.into()))
            .collect();
        self.rename = (!rename.is_empty()).then_some(rename);
        self
    }
}

#[derive(Debug)]
pub enum ImportOutcome {
    /// Surviving columns were written. `rows` is zero when the source held a
    /// header but no records.
    Written {
        rows: usize,
        columns: Vec<String>,
        dropped: Vec<String>,
    },
    /// No source column matched the destination; nothing was written.
    SchemaMismatch {
        table: String,
        dropped: Vec<String>,
    },
    Failed(ImportErr),
}

impl ImportOutcome {
    pub fn rows_written(&self) -> usize {
        match self {
            Self::Written { rows, .. } => *rows,
            Self::SchemaMismatch { .. } | Self::Failed(_) => 0,
        }
    }

    pub fn error(&self) -> Option<&ImportErr> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[instrument(skip_all, fields(table = %request.table, path = %request.source_path.display()))]
pub fn import_csv<S: StoreSource>(source: &S, request: &ImportRequest) -> ImportOutcome {
    match try_import(source, request) {
        Ok(outcome) => {
            match &outcome {
                ImportOutcome::Written { rows: 0, .. } => {
                    warn!("source file has no records; nothing written");
                }
                ImportOutcome::Written { rows, dropped, .. } => {
                    if !dropped.is_empty() {
                        info!(?dropped, "dropped columns unknown to the table");
                    }
                    info!(rows, "imported records");
                }
                ImportOutcome::SchemaMismatch { dropped, .. } => {
                    warn!(?dropped, "no source column matches the table; nothing written");
                }
                ImportOutcome::Failed(_) => {}
            }
            outcome
        }
        Err(err) => {
            error!(kind = ?err.kind(), "import failed: {err}");
            ImportOutcome::Failed(err)
        }
    }
}

fn try_import<S: StoreSource>(
    source: &S,
    request: &ImportRequest,
) -> Result<ImportOutcome, ImportErr> {
    let mut batch = RowBatch::from_csv_path(&request.source_path)?;

    if let Some(rename) = &request.rename {
        batch.rename_columns(rename);
    }

    let mut store = source.open_store()?;
    let table_columns: HashSet<String> = store
        .discover_columns(&request.table)?
        .into_iter()
        .collect();

    let dropped = batch.retain_columns(|column| table_columns.contains(column));
    if batch.columns().is_empty() {
        return Ok(ImportOutcome::SchemaMismatch {
            table: request.table.clone(),
            dropped,
        });
    }

    let rows = store.write_rows(&request.table, &batch, request.policy)?;
    // Rows are committed by now; a failed close must not report them lost.
    if let Err(err) = store.close() {
        warn!("store did not close cleanly after commit: {err}");
    }

    Ok(ImportOutcome::Written {
        rows,
        columns: batch.columns().to_vec(),
        dropped,
    })
}
