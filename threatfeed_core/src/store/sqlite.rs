use super::{ConflictPolicy, TableStore};
use crate::{RowBatch, StoreErr, Value};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Params};
use std::path::Path;
use tracing::debug;

pub struct SqliteTableStore {
    conn: Connection,
}

impl SqliteTableStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreErr> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }
}

impl TableStore for SqliteTableStore {
    fn discover_columns(&self, table: &str) -> Result<Vec<String>, StoreErr> {
        Ok(table_columns(&self.conn, table)?)
    }

    fn row_count(&self, table: &str) -> Result<usize, StoreErr> {
        Ok(count_rows(&self.conn, table)?)
    }

    fn write_rows(
        &mut self,
        table: &str,
        batch: &RowBatch,
        policy: ConflictPolicy,
    ) -> Result<usize, StoreErr> {
        let transaction = self.conn.transaction()?;

        match policy {
            ConflictPolicy::Append => {}
            ConflictPolicy::FailIfExists => {
                let rows = count_rows(&transaction, table)?;
                if rows > 0 {
                    return Err(StoreErr::TableNotEmpty {
                        table: table.to_string(),
                        rows,
                    });
                }
            }
            ConflictPolicy::Replace => recreate_table(&transaction, table)?,
        }

        let written = insert_batch(&transaction, table, batch)?;
        transaction.commit()?;

        Ok(written)
    }

    fn close(self) -> Result<(), StoreErr> {
        self.conn.close().map_err(|(_, err)| StoreErr::from(err))
    }
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;
    let columns = stmt
        .query_map([], |row| row.get::<usize, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

pub(crate) fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<usize> {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
        [],
        |row| row.get::<usize, i64>(0),
    )
    .map(|count| count as usize)
}

pub(crate) fn query_batch<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<RowBatch> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut batch = RowBatch::new(columns);
    let mut rows = stmt.query(params)?;
    while let Some(row) = rows.next()? {
        let values = (0..width)
            .map(|idx| row.get::<usize, Value>(idx))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        batch.push_row(values);
    }

    Ok(batch)
}

fn recreate_table(conn: &Connection, table: &str) -> Result<(), StoreErr> {
    let definition: Option<String> = conn
        .query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;

    let Some(definition) = definition else {
        return Err(StoreErr::MissingTableErr {
            table: table.to_string(),
        });
    };

    // Indexes and triggers go with the table on DROP.
    let dependents = {
        let mut stmt = conn.prepare(
            "SELECT sql FROM sqlite_master \
             WHERE tbl_name = ?1 AND type IN ('index', 'trigger') AND sql IS NOT NULL \
             ORDER BY rowid",
        )?;
        let dependents = stmt
            .query_map([table], |row| row.get::<usize, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        dependents
    };

    conn.execute(&format!("DROP TABLE {}", quote_identifier(table)), ())?;
    conn.execute(&definition, ())?;
    for sql in &dependents {
        conn.execute(sql, ())?;
    }
    debug!("recreated table {table} with {} dependents", dependents.len());

    Ok(())
}

fn insert_batch(conn: &Connection, table: &str, batch: &RowBatch) -> rusqlite::Result<usize> {
    if batch.columns().is_empty() {
        return Ok(0);
    }

    let columns: Vec<String> = batch
        .columns()
        .iter()
        .map(|column| quote_identifier(column))
        .collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|idx| format!("?{idx}")).collect();

    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        columns.join(", "),
        placeholders.join(", ")
    ))?;

    for row in batch.rows() {
        stmt.execute(params_from_iter(row.iter()))?;
    }

    Ok(batch.len())
}
