use crate::schema::TICKETS_TABLE;
use crate::store::sqlite::query_batch;
use crate::{Connection, ConnectionErr, RowBatch};

impl Connection {
    pub fn get_all_tickets(&self) -> Result<RowBatch, ConnectionErr> {
        Ok(query_batch(
            &self.conn,
            &format!("SELECT * FROM {} ORDER BY id DESC", TICKETS_TABLE),
            [],
        )?)
    }
}
