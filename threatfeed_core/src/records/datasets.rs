use crate::schema::DATASETS_TABLE;
use crate::store::sqlite::query_batch;
use crate::{Connection, ConnectionErr, RowBatch};
use rusqlite::params;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewDataset {
    pub dataset_name: String,
    pub category: String,
    pub source: String,
    pub last_updated: String,
    pub record_count: i64,
    pub file_size_mb: f64,
}

impl Connection {
    pub fn get_all_datasets(&self) -> Result<RowBatch, ConnectionErr> {
        Ok(query_batch(
            &self.conn,
            &format!("SELECT * FROM {} ORDER BY id DESC", DATASETS_TABLE),
            [],
        )?)
    }

    pub fn insert_dataset(&self, dataset: &NewDataset) -> Result<i64, ConnectionErr> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (dataset_name, category, source, last_updated, record_count, file_size_mb) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                DATASETS_TABLE
            ),
            params![
                dataset.dataset_name,
                dataset.category,
                dataset.source,
                dataset.last_updated,
                dataset.record_count,
                dataset.file_size_mb,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::*;
    use crate::Value;

    #[test]
    fn test_datasets_newest_first() {
        set_up_dirs!(dirs, "db");
        let conn = Connection::new(&dirs[0]).unwrap();

        for (name, count) in [("auth_logs", 10), ("dns_queries", 20)] {
            conn.insert_dataset(&NewDataset {
                dataset_name: name.to_string(),
                category: "Logs".to_string(),
                source: "SIEM".to_string(),
                last_updated: "2024-06-01".to_string(),
                record_count: count,
                file_size_mb: 0.25,
            })
            .unwrap();
        }

        let datasets = conn.get_all_datasets().unwrap();
        let name = datasets.column_index("dataset_name").unwrap();
        assert_eq!(datasets.rows()[0][name], Value::from("dns_queries"));
        assert_eq!(datasets.rows()[1][name], Value::from("auth_logs"));
    }
}
