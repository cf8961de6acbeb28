use crate::boot::{boot_connection, boot_system, SourceStatus, ADMIN_USERNAME};
use crate::schema::{DATASETS_TABLE, INCIDENTS_TABLE, TICKETS_TABLE};
use crate::utils::test::*;
use crate::{Connection, CreateUserOutcome, ImportErrKind, ImportOutcome, IncidentMetrics};
use std::path::Path;

fn write_seed_files(data_dir: &Path) {
    write_csv(
        data_dir.join("cyber_incidents.csv"),
        "date,incident_type,severity,status,description,analyst\n\
         2024-01-01,Phishing,High,Open,Credential lure,kim\n\
         2024-01-02,Malware,Critical,Resolved,Trojan on HR laptop,lee\n\
         2024-01-03,Phishing,Medium,Investigating,,kim\n",
    );
    write_csv(
        data_dir.join("datasets_metadata.csv"),
        "dataset_name,category,source,last_updated,record_count,file_size_mb\n\
         auth_logs,Logs,SIEM,2024-01-01,5000,12.5\n",
    );
}

#[test]
fn test_e2e_boot_seeds_and_skips_missing() {
    set_up_dirs!(dirs, "db", "data");
    write_seed_files(&dirs[1]);

    let report = boot_system(&dirs[0], &dirs[1]).unwrap();

    assert!(matches!(report.admin, CreateUserOutcome::Created { .. }));
    assert_eq!(report.sources.len(), 3);
    for source in &report.sources {
        match source.source.table {
            INCIDENTS_TABLE | DATASETS_TABLE => {
                assert!(matches!(source.status, SourceStatus::Imported(_)))
            }
            TICKETS_TABLE => assert!(matches!(source.status, SourceStatus::Missing)),
            other => panic!("unexpected table {other}"),
        }
    }

    let conn = Connection::new(&dirs[0]).unwrap();
    assert_eq!(conn.table_row_count(INCIDENTS_TABLE).unwrap(), 3);
    assert_eq!(conn.table_row_count(DATASETS_TABLE).unwrap(), 1);
    assert!(conn.user_exists(ADMIN_USERNAME).unwrap());

    let metrics = IncidentMetrics::from_batch(&conn.get_all_incidents().unwrap());
    assert_eq!(metrics.by_category[0], ("Phishing".to_string(), 2));
    assert_eq!(metrics.open, 1);
    assert_eq!(metrics.critical, 1);
}

#[test]
fn test_e2e_second_boot_skips_populated_tables() {
    set_up_dirs!(dirs, "db", "data");
    write_seed_files(&dirs[1]);

    boot_system(&dirs[0], &dirs[1]).unwrap();
    let report = boot_system(&dirs[0], &dirs[1]).unwrap();

    assert_eq!(report.admin, CreateUserOutcome::AlreadyExists);
    let incidents = report
        .sources
        .iter()
        .find(|source| source.source.table == INCIDENTS_TABLE)
        .unwrap();
    assert!(matches!(
        incidents.status,
        SourceStatus::Skipped { existing_rows: 3 }
    ));

    let conn = Connection::new(&dirs[0]).unwrap();
    assert_eq!(conn.table_row_count(INCIDENTS_TABLE).unwrap(), 3);
}

#[test]
fn test_e2e_bad_file_does_not_block_others() {
    set_up_dirs!(dirs, "db", "data");
    write_seed_files(&dirs[1]);
    write_csv(
        dirs[1].join("cyber_incidents.csv"),
        "date,severity\n2024-01-01,Low\n2024-01-02,Low,extra\n",
    );
    write_csv(
        dirs[1].join("it_tickets.csv"),
        "ticket_id,priority,status\nT-100,High,Open\n",
    );

    let conn = Connection::new(&dirs[0]).unwrap();
    let report = boot_connection(&conn, &dirs[1]).unwrap();

    let statuses: Vec<&SourceStatus> = report.sources.iter().map(|source| &source.status).collect();
    let SourceStatus::Imported(ImportOutcome::Failed(err)) = statuses[0] else {
        panic!("expected the incidents import to fail");
    };
    assert_eq!(err.kind(), ImportErrKind::Parse);
    assert_eq!(conn.table_row_count(INCIDENTS_TABLE).unwrap(), 0);
    assert_eq!(conn.table_row_count(DATASETS_TABLE).unwrap(), 1);
    assert_eq!(conn.table_row_count(TICKETS_TABLE).unwrap(), 1);
    assert!(conn.user_exists(ADMIN_USERNAME).unwrap());
}
