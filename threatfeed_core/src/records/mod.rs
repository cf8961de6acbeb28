//! Row-level reads and writes the dashboard and CLI use alongside bulk
//! imports. Column names match the ones the importer writes.

pub mod datasets;
pub mod incidents;
pub mod tickets;
pub mod users;
