//! Integration tests for table snapshots fetched through the bridge

use plantsim_remote::automation::EngineMethod;
use plantsim_remote::table::TEMP_DIR_PREFIX;
use plantsim_remote::*;

fn parts_engine() -> MemoryEngine {
    let engine = MemoryEngine::new();
    engine.insert_table(
        "Model.Parts",
        &["Name", "Qty"],
        &[&["Gear", "4"], &["Shaft", "2"], &["Bolt", "12"]],
    );
    engine
}

fn connect(engine: &MemoryEngine) -> Session {
    Session::connect(&MemoryDispatcher::new(engine.clone()), None).unwrap()
}

/// A two-column, three-row table arrives with names, kinds and cells intact
#[test]
fn test_two_column_three_row_table() {
    let engine = parts_engine();
    let session = connect(&engine);

    let bridge = session.table("Model.Parts").unwrap();
    let snapshot = bridge.current();

    assert_eq!(snapshot.column_names(), vec!["Name", "Qty"]);
    assert_eq!(snapshot.columns()[0].kind, ColumnKind::Text);
    assert_eq!(snapshot.columns()[1].kind, ColumnKind::Integer);
    assert_eq!(snapshot.row_count(), 3);
    assert_eq!(
        snapshot.column("Name"),
        Some(vec![&Value::from("Gear"), &Value::from("Shaft"), &Value::from("Bolt")])
    );
    assert_eq!(
        snapshot.column("Qty"),
        Some(vec![&Value::Integer(4), &Value::Integer(2), &Value::Integer(12)])
    );
}

/// Refreshing an unchanged table yields an equal snapshot
#[test]
fn test_repeated_refresh_is_stable() {
    let engine = parts_engine();
    let session = connect(&engine);
    let mut bridge = session.table("Model.Parts").unwrap();
    let first = bridge.current().clone();
    let first_fetch = bridge.fetched_at();

    bridge.refresh().unwrap();
    bridge.refresh().unwrap();

    assert_eq!(bridge.current(), &first);
    assert!(bridge.fetched_at() >= first_fetch);
    assert_eq!(engine.call_count(EngineMethod::ExecuteSimTalk), 3);
}

/// A `NaN` cell keeps its column textual and the snapshot comparable
#[test]
fn test_refresh_with_nan_cell_is_stable() {
    let engine = MemoryEngine::new();
    engine.insert_table("Model.Rates", &["Name", "Rate"], &[&["Gear", "1.5"], &["Shaft", "NaN"]]);
    let session = connect(&engine);
    let mut bridge = session.table("Model.Rates").unwrap();
    let first = bridge.current().clone();

    bridge.refresh().unwrap();

    assert_eq!(bridge.current(), &first);
    assert_eq!(first.columns()[1].kind, ColumnKind::Text);
    assert_eq!(first.get(0, "Rate"), Some(&Value::from("1.5")));
    assert_eq!(first.get(1, "Rate"), Some(&Value::from("NaN")));
}

/// Refresh picks up changes made in the engine
#[test]
fn test_refresh_sees_engine_changes() {
    let engine = parts_engine();
    let session = connect(&engine);
    let mut bridge = session.table("Model.Parts").unwrap();

    engine.insert_table("Model.Parts", &["Name", "Qty"], &[&["Gear", "5"]]);
    let snapshot = bridge.refresh().unwrap();

    assert_eq!(snapshot.row_count(), 1);
    assert_eq!(snapshot.get(0, "Qty"), Some(&Value::Integer(5)));
}

/// Nothing the round trip writes survives it
#[test]
fn test_temp_files_are_removed() {
    let engine = parts_engine();
    let session = connect(&engine);
    let mut bridge = session.table("Model.Parts").unwrap();
    bridge.refresh().unwrap();

    let written = engine.written_files();
    assert_eq!(written.len(), 2);
    assert_ne!(written[0], written[1]);
    for file in &written {
        assert!(!file.exists());
        let dir = file.parent().unwrap();
        assert!(!dir.exists());
        assert!(dir.file_name().unwrap().to_string_lossy().starts_with(TEMP_DIR_PREFIX));
        assert_eq!(file.extension().unwrap(), "txt");
    }
}

/// Temp files are removed when parsing fails too
#[test]
fn test_temp_files_are_removed_on_parse_failure() {
    let engine = MemoryEngine::new();
    engine.insert_table_text("Model.Broken", "");
    let session = connect(&engine);

    let error = session.table("Model.Broken").unwrap_err();

    assert!(matches!(error, PlantSimError::Parse(_)));
    let written = engine.written_files();
    assert_eq!(written.len(), 1);
    assert!(!written[0].exists());
    assert!(!written[0].parent().unwrap().exists());
}

/// The snapshot outlives the bridge and the session
#[test]
fn test_into_snapshot_outlives_session() {
    let engine = parts_engine();
    let session = connect(&engine);

    let snapshot = session.table("Model.Parts").unwrap().into_snapshot();
    session.quit().unwrap();

    assert_eq!(snapshot.get(2, "Name"), Some(&Value::from("Bolt")));
    let json = snapshot.to_json().unwrap();
    assert!(json.contains("\"Bolt\""));
}
