use rusqlite::Connection;

pub const USERS_TABLE: &str = "users";
pub const INCIDENTS_TABLE: &str = "cyber_incidents";
pub const DATASETS_TABLE: &str = "datasets_metadata";
pub const TICKETS_TABLE: &str = "it_tickets";

pub const ALL_TABLES: [&str; 4] = [USERS_TABLE, INCIDENTS_TABLE, DATASETS_TABLE, TICKETS_TABLE];

pub fn create_all_tables(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    let transaction = conn.transaction()?;

    transaction.execute(
        &format!(
            "
                CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL UNIQUE,
                    secret TEXT NOT NULL,
                    role TEXT NOT NULL DEFAULT 'user',
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            ",
            USERS_TABLE
        ),
        (),
    )?;

    transaction.execute(
        &format!(
            "
                CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date TEXT,
                    category TEXT,
                    severity TEXT,
                    status TEXT,
                    description TEXT,
                    reported_by TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            ",
            INCIDENTS_TABLE
        ),
        (),
    )?;

    transaction.execute(
        &format!(
            "
                CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    dataset_name TEXT,
                    category TEXT,
                    source TEXT,
                    last_updated TEXT,
                    record_count INTEGER,
                    file_size_mb REAL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            ",
            DATASETS_TABLE
        ),
        (),
    )?;

    transaction.execute(
        &format!(
            "
                CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    ticket_id TEXT,
                    priority TEXT,
                    status TEXT,
                    category TEXT,
                    subject TEXT,
                    description TEXT,
                    created_date TEXT,
                    resolved_date TEXT,
                    assigned_to TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            ",
            TICKETS_TABLE
        ),
        (),
    )?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sqlite::table_columns;

    #[test]
    fn test_create_all_tables_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        create_all_tables(&mut conn).unwrap();
        create_all_tables(&mut conn).unwrap();

        assert_eq!(
            table_columns(&conn, INCIDENTS_TABLE).unwrap(),
            [
                "id",
                "date",
                "category",
                "severity",
                "status",
                "description",
                "reported_by",
                "created_at"
            ]
        );
    }
}
