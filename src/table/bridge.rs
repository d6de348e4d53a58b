//! Table snapshot bridge
//!
//! A [`TableBridge`] pulls a table object out of the engine by asking it to
//! write itself to a temporary file, then parses that file into a
//! [`TableSnapshot`]. The temporary directory lives for exactly one refresh.

use super::snapshot::TableSnapshot;
use crate::session::command::quote;
use crate::session::{PlantSimError, PlantSimResult, Session};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Prefix of the temporary directories used for table round trips
pub const TEMP_DIR_PREFIX: &str = "plantsim-table-";

/// Read-only bridge to one engine table
#[derive(Debug)]
pub struct TableBridge<'s> {
    session: &'s Session,
    path: String,
    snapshot: TableSnapshot,
    fetched_at: DateTime<Utc>,
}

impl<'s> TableBridge<'s> {
    /// Bind to the table at `path` and fetch it
    pub fn new(session: &'s Session, path: impl Into<String>) -> PlantSimResult<Self> {
        let path = path.into();
        let snapshot = fetch(session, &path)?;
        Ok(Self { session, path, snapshot, fetched_at: Utc::now() })
    }

    /// Fetch the table again, replacing the held snapshot
    ///
    /// On failure the previous snapshot and fetch time are kept.
    pub fn refresh(&mut self) -> PlantSimResult<&TableSnapshot> {
        self.snapshot = fetch(self.session, &self.path)?;
        self.fetched_at = Utc::now();
        Ok(&self.snapshot)
    }

    /// Object path of the table
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Snapshot from the most recent successful fetch
    pub fn current(&self) -> &TableSnapshot {
        &self.snapshot
    }

    /// When the current snapshot was fetched
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Release the session borrow, keeping the snapshot
    pub fn into_snapshot(self) -> TableSnapshot {
        self.snapshot
    }
}

/// One round trip: engine writes the table to a temp file, we parse it
#[instrument(skip(session))]
fn fetch(session: &Session, path: &str) -> PlantSimResult<TableSnapshot> {
    let dir = tempfile::Builder::new().prefix(TEMP_DIR_PREFIX).tempdir()?;
    let file = dir.path().join(temp_file_name(path));

    let result = write_and_parse(session, path, &file);
    with_cleanup(result, dir.close())
}

/// A directory left behind fails an otherwise good fetch
fn with_cleanup(
    result: PlantSimResult<TableSnapshot>,
    cleanup: std::io::Result<()>,
) -> PlantSimResult<TableSnapshot> {
    match (result, cleanup) {
        (result, Ok(())) => result,
        (Ok(_), Err(e)) => {
            warn!(error = %e, "could not remove temporary table directory");
            Err(PlantSimError::Io(e))
        }
        (Err(original), Err(e)) => {
            warn!(error = %e, "could not remove temporary table directory");
            Err(original)
        }
    }
}

fn write_and_parse(session: &Session, path: &str, file: &Path) -> PlantSimResult<TableSnapshot> {
    let command = format!("{}.writeFile({})", path, quote(&file.to_string_lossy()));
    session.execute_command(&command, &[], false).map_err(|e| {
        PlantSimError::parse(format!("table {} could not be written to a file: {}", path, e))
    })?;

    let bytes = fs::read(file).map_err(|e| {
        PlantSimError::parse(format!("table file {} could not be read: {}", file.display(), e))
    })?;

    let snapshot = TableSnapshot::parse_bytes(&bytes).map_err(|e| match e {
        PlantSimError::Parse(reason) => PlantSimError::parse(format!("table {}: {}", path, reason)),
        other => other,
    })?;
    debug!(rows = snapshot.row_count(), columns = snapshot.columns().len(), "table fetched");
    Ok(snapshot)
}

/// `<sanitized path>-<uuid>.txt`
fn temp_file_name(path: &str) -> String {
    let stem: String = path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() { "table" } else { stem };
    format!("{}-{}.txt", stem, Uuid::new_v4())
}
