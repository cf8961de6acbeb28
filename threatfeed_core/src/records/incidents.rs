use crate::schema::INCIDENTS_TABLE;
use crate::store::sqlite::query_batch;
use crate::{Connection, ConnectionErr, RowBatch};
use rusqlite::params;
use serde::Deserialize;
use tracing::info;

pub const THREAT_TYPES: [&str; 6] = ["Phishing", "Malware", "DDoS", "Ransomware", "Insider", "Other"];
pub const SEVERITY_LEVELS: [&str; 4] = ["Low", "Medium", "High", "Critical"];
pub const INCIDENT_STATUSES: [&str; 4] = ["Open", "Investigating", "Resolved", "Closed"];

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewIncident {
    pub date: String,
    pub category: String,
    pub severity: String,
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reported_by: Option<String>,
}

impl Connection {
    /// Every incident, newest first.
    pub fn get_all_incidents(&self) -> Result<RowBatch, ConnectionErr> {
        Ok(query_batch(
            &self.conn,
            &format!("SELECT * FROM {} ORDER BY id DESC", INCIDENTS_TABLE),
            [],
        )?)
    }

    pub fn insert_incident(&self, incident: &NewIncident) -> Result<i64, ConnectionErr> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (date, category, severity, status, description, reported_by) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                INCIDENTS_TABLE
            ),
            params![
                incident.date,
                incident.category,
                incident.severity,
                incident.status,
                incident.description,
                incident.reported_by,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(id, category = %incident.category, severity = %incident.severity, "logged incident");
        Ok(id)
    }
}
