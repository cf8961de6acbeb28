use crate::{ImportErr, Value};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column-named rows of scalar values. Produced by parsing a CSV source for
/// import and by reading a table back out of the store.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RowBatch {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowBatch {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, ImportErr> {
        let file = File::open(path).map_err(|source| ImportErr::FileErr {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file, path)
    }

    /// Parses delimited text whose first record is the header. Any malformed
    /// record fails the whole batch.
    pub fn from_csv_reader(reader: impl Read, path: &Path) -> Result<Self, ImportErr> {
        let mut rdr = csv::Reader::from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|err| ImportErr::from_csv(path.to_path_buf(), err))?;
        if headers.is_empty() {
            return Err(ImportErr::MissingHeaderErr {
                path: path.to_path_buf(),
            });
        }

        let mut batch = Self::new(headers.iter().map(String::from).collect());
        for result in rdr.records() {
            let record = result.map_err(|err| ImportErr::from_csv(path.to_path_buf(), err))?;
            batch.push_row(record.iter().map(Value::from_field).collect());
        }

        Ok(batch)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Renames header names only; values are untouched.
    pub fn rename_columns(&mut self, rename: &HashMap<String, String>) {
        for column in &mut self.columns {
            if let Some(new_name) = rename.get(column.as_str()) {
                *column = new_name.clone();
            }
        }
    }

    /// Keeps the columns accepted by `keep`, in the batch's own order, and
    /// returns the names of the dropped ones. A repeated name only survives
    /// at its first position.
    pub fn retain_columns(&mut self, keep: impl Fn(&str) -> bool) -> Vec<String> {
        let mut seen = HashSet::new();
        let mask: Vec<bool> = self
            .columns
            .iter()
            .map(|column| keep(column) && seen.insert(column.clone()))
            .collect();

        if mask.iter().all(|kept| *kept) {
            return Vec::new();
        }

        let (kept, dropped) = partition_by_mask(std::mem::take(&mut self.columns), &mask);
        self.columns = kept;
        for row in &mut self.rows {
            *row = partition_by_mask(std::mem::take(row), &mask).0;
        }

        dropped
    }

    /// Counts non-null values of `column`, most frequent first, ties broken
    /// by value.
    pub fn value_counts(&self, column: &str) -> Vec<(String, usize)> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };

        let mut counts = BTreeMap::<String, usize>::new();
        for value in self.rows.iter().map(|row| &row[idx]) {
            if !value.is_null() {
                *counts.entry(value.to_string()).or_default() += 1;
            }
        }

        let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    pub fn count_equal(&self, column: &str, expected: &str) -> usize {
        self.column_index(column).map_or(0, |idx| {
            self.rows
                .iter()
                .filter(|row| row[idx].as_text() == Some(expected))
                .count()
        })
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| {
                        (
                            column.clone(),
                            serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
                        )
                    })
                    .collect()
            })
            .collect()
    }
}

fn partition_by_mask<T>(items: Vec<T>, mask: &[bool]) -> (Vec<T>, Vec<T>) {
    let mut kept = Vec::new();
    let mut dropped = Vec::new();
    for (item, keep) in items.into_iter().zip(mask) {
        if *keep {
            kept.push(item);
        } else {
            dropped.push(item);
        }
    }
    (kept, dropped)
}
