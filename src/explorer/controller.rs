//! Attribute explorer controller
//!
//! An [`AttributeExplorer`] is bound to one explorer object in the model. It
//! caches the explorer's mode, moves the explorer table in and out of files and
//! hands out table bridges for the explorer's sub-tables.

use super::commands::{export_command, import_command};
use crate::session::{PlantSimError, PlantSimResult, Session};
use crate::table::TableBridge;
use crate::types::{ExplorerMode, Value};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Sub-table holding the explored attribute values
pub const EXPLORER_TABLE: &str = "ExplorerTable";
/// Sub-table listing the explored objects
pub const OBJECT_TABLE: &str = "ObjectTable";
/// Sub-table listing the explored attributes
pub const ATTRIBUTE_TABLE: &str = "AttributeTable";
/// Sub-table holding the object query
pub const QUERY_TABLE: &str = "QueryTable";

/// Controller for one attribute explorer object
#[derive(Debug)]
pub struct AttributeExplorer<'s> {
    session: &'s Session,
    path: String,
    mode: ExplorerMode,
}

impl<'s> AttributeExplorer<'s> {
    /// Bind to the explorer at `path`, reading its current mode
    pub fn new(session: &'s Session, path: impl Into<String>) -> PlantSimResult<Self> {
        let path = path.into();
        let mode = read_mode(session, &path)?;
        debug!(path = %path, %mode, "attribute explorer bound");
        Ok(Self { session, path, mode })
    }

    /// Object path of the explorer
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current mode, read from the engine
    pub fn mode(&mut self) -> PlantSimResult<ExplorerMode> {
        self.mode = read_mode(self.session, &self.path)?;
        Ok(self.mode)
    }

    /// Mode as of the last read or write, without contacting the engine
    pub fn cached_mode(&self) -> ExplorerMode {
        self.mode
    }

    /// Switch the explorer to `mode`
    pub fn set_mode(&mut self, mode: ExplorerMode) -> PlantSimResult<()> {
        self.session.set_value(&self.mode_path(), Value::from(mode.as_engine_str()))?;
        self.mode = mode;
        Ok(())
    }

    /// Replace the explorer table with the contents of `file`
    ///
    /// The explorer must be in [`ExplorerMode::Edit`]; the mode is read from
    /// the engine right before importing. `sheet` is passed for Excel files.
    #[instrument(skip(self, file), fields(explorer = %self.path, file = %file.as_ref().display()))]
    pub fn import_table(&mut self, file: impl AsRef<Path>, sheet: Option<&str>) -> PlantSimResult<()> {
        let mode = self.mode()?;
        if mode != ExplorerMode::Edit {
            return Err(PlantSimError::invalid_state(format!(
                "Table import into {} requires edit mode, the explorer is in {} mode",
                self.path, mode
            )));
        }

        let file = std::path::absolute(file.as_ref())?;
        self.session.execute_command(&import_command(&self.path, &file, sheet), &[], false)?;
        info!(file = %file.display(), "explorer table imported");
        Ok(())
    }

    /// Write the explorer table to `file`
    #[instrument(skip(self, file), fields(explorer = %self.path, file = %file.as_ref().display()))]
    pub fn export_table(&self, file: impl AsRef<Path>, sheet: Option<&str>) -> PlantSimResult<()> {
        let file = std::path::absolute(file.as_ref())?;
        self.session.execute_command(&export_command(&self.path, &file, sheet), &[], false)?;
        info!(file = %file.display(), "explorer table exported");
        Ok(())
    }

    /// Snapshot of the explorer table
    pub fn explorer_table(&self) -> PlantSimResult<TableBridge<'s>> {
        self.sub_table(EXPLORER_TABLE)
    }

    /// Snapshot of the object table
    pub fn object_table(&self) -> PlantSimResult<TableBridge<'s>> {
        self.sub_table(OBJECT_TABLE)
    }

    /// Snapshot of the attribute table
    pub fn attribute_table(&self) -> PlantSimResult<TableBridge<'s>> {
        self.sub_table(ATTRIBUTE_TABLE)
    }

    /// Snapshot of the query table
    pub fn query_table(&self) -> PlantSimResult<TableBridge<'s>> {
        self.sub_table(QUERY_TABLE)
    }

    fn sub_table(&self, name: &str) -> PlantSimResult<TableBridge<'s>> {
        TableBridge::new(self.session, format!("{}.{}", self.path, name))
    }

    fn mode_path(&self) -> String {
        mode_path(&self.path)
    }
}

fn mode_path(explorer: &str) -> String {
    format!("{}.Mode", explorer)
}

fn read_mode(session: &Session, explorer: &str) -> PlantSimResult<ExplorerMode> {
    let path = mode_path(explorer);
    let value = session.get_value(&path)?;
    value
        .as_str()
        .and_then(|mode| mode.parse().ok())
        .ok_or_else(|| PlantSimError::unexpected_value(path, "explorer mode", value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::{EngineCall, EngineMethod, MemoryDispatcher, MemoryEngine};

    const EXPLORER: &str = "Model.AttributeExplorer";

    fn engine_with_mode(mode: &str) -> MemoryEngine {
        MemoryEngine::new().with_value("Model.AttributeExplorer.Mode", mode)
    }

    fn connect(engine: &MemoryEngine) -> Session {
        Session::connect(&MemoryDispatcher::new(engine.clone()), None).unwrap()
    }

    #[test]
    fn test_construction_seeds_the_cache() {
        let engine = engine_with_mode("Watch");
        let session = connect(&engine);
        let explorer = AttributeExplorer::new(&session, EXPLORER).unwrap();

        assert_eq!(explorer.cached_mode(), ExplorerMode::Watch);
        assert_eq!(engine.call_count(EngineMethod::GetValue), 1);
    }

    #[test]
    fn test_mode_reads_live_and_refreshes_cache() {
        let engine = engine_with_mode("Watch");
        let session = connect(&engine);
        let mut explorer = AttributeExplorer::new(&session, EXPLORER).unwrap();

        engine.insert_value("Model.AttributeExplorer.Mode", "Edit");
        assert_eq!(explorer.cached_mode(), ExplorerMode::Watch);
        assert_eq!(explorer.mode().unwrap(), ExplorerMode::Edit);
        assert_eq!(explorer.cached_mode(), ExplorerMode::Edit);
    }

    #[test]
    fn test_set_mode_writes_then_caches() {
        let engine = engine_with_mode("Read");
        let session = connect(&engine);
        let mut explorer = AttributeExplorer::new(&session, EXPLORER).unwrap();
        engine.clear_journal();

        explorer.set_mode(ExplorerMode::Edit).unwrap();

        assert_eq!(explorer.cached_mode(), ExplorerMode::Edit);
        assert_eq!(
            engine.journal(),
            vec![EngineCall::SetValue(
                "Model.AttributeExplorer.Mode".to_string(),
                Value::from("Edit")
            )]
        );
    }

    #[test]
    fn test_unknown_mode_is_unexpected_value() {
        let engine = MemoryEngine::new().with_value("Model.AttributeExplorer.Mode", 3);
        let session = connect(&engine);

        let error = AttributeExplorer::new(&session, EXPLORER).unwrap_err();
        assert!(matches!(error, PlantSimError::UnexpectedValue { .. }));
    }

    #[test]
    fn test_import_outside_edit_mode_sends_nothing() {
        let engine = engine_with_mode("Watch");
        let session = connect(&engine);
        let mut explorer = AttributeExplorer::new(&session, EXPLORER).unwrap();

        let error = explorer.import_table("in.xlsx", Some("Data")).unwrap_err();

        assert!(matches!(error, PlantSimError::InvalidState(_)));
        assert!(error.to_string().contains("edit mode"));
        assert!(engine.commands().is_empty());
    }

    #[test]
    fn test_sub_table_paths() {
        let engine = engine_with_mode("Watch");
        engine.insert_table("Model.AttributeExplorer.ObjectTable", &["Object"], &[&["Model.Drill"]]);
        let session = connect(&engine);
        let explorer = AttributeExplorer::new(&session, EXPLORER).unwrap();

        let table = explorer.object_table().unwrap();
        assert_eq!(table.path(), "Model.AttributeExplorer.ObjectTable");
        assert_eq!(table.current().row_count(), 1);
    }
}
