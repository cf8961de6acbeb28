use crate::{RowBatch, StoreErr};
use std::fmt::Display;
use std::str::FromStr;

pub mod sqlite;

/// What to do with rows already in the destination before writing.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ConflictPolicy {
    #[default]
    Append,
    /// Drop the table and recreate it from its own definition.
    Replace,
    FailIfExists,
}

impl FromStr for ConflictPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(Self::Append),
            "replace" => Ok(Self::Replace),
            "fail" => Ok(Self::FailIfExists),
            _ => Err(()),
        }
    }
}

impl Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Append => f.write_str("append"),
            Self::Replace => f.write_str("replace"),
            Self::FailIfExists => f.write_str("fail"),
        }
    }
}

/// Tabular destination for bulk imports.
pub trait TableStore {
    /// Declared column names, in table order. Empty when the table is absent.
    fn discover_columns(&self, table: &str) -> Result<Vec<String>, StoreErr>;
    fn row_count(&self, table: &str) -> Result<usize, StoreErr>;

    /// Applies `policy` and writes every row of `batch`, committing once.
    /// Returns the number of rows written.
    fn write_rows(
        &mut self,
        table: &str,
        batch: &RowBatch,
        policy: ConflictPolicy,
    ) -> Result<usize, StoreErr>;

    fn close(self) -> Result<(), StoreErr>
    where
        Self: Sized;
}

/// Hands out a fresh store for the duration of one import.
pub trait StoreSource {
    type Store: TableStore;

    fn open_store(&self) -> Result<Self::Store, StoreErr>;
}
