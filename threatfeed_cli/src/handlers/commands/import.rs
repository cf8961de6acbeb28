use std::path::PathBuf;

use threatfeed_core::{ConflictPolicy, Connection, ImportOutcome, ImportRequest};

pub fn handle_import_command(
    connection: &Connection,
    path: PathBuf,
    table: String,
    if_exists: ConflictPolicy,
    map: Vec<(String, String)>,
) {
    println!("Reading from: {:?}", &path);
    let request = ImportRequest::new(path, table)
        .with_policy(if_exists)
        .with_rename(map);

    let outcome = connection.import_csv(&request);
    println!("{}", describe_outcome(&request.table, &outcome));
}

/// One-line summary of an import, phrased for the operator.
pub fn describe_outcome(table: &str, outcome: &ImportOutcome) -> String {
    match outcome {
        ImportOutcome::Written { rows, dropped, .. } if dropped.is_empty() => {
            format!("Loaded {} records into \"{}\"", rows, table)
        }
        ImportOutcome::Written { rows, dropped, .. } => format!(
            "Loaded {} records into \"{}\" (ignored columns: {})",
            rows,
            table,
            dropped.join(", ")
        ),
        ImportOutcome::SchemaMismatch { dropped, .. } => format!(
            "No columns of the file match \"{}\"; nothing loaded (file columns: {})",
            table,
            dropped.join(", ")
        ),
        ImportOutcome::Failed(err) => format!("Import into \"{}\" failed: {}", table, err),
    }
}
