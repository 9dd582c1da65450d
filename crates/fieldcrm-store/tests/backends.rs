//! Record store behaviour over the on-disk backends.

use fieldcrm_protocol::{CallDate, CallId, CallRecord, SheetConnector};
use fieldcrm_store::{JsonlSheetConnector, RecordStore, SqliteSheetConnector};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::tempdir;

fn record(call_id: CallId, note: &str) -> CallRecord {
    CallRecord {
        call_id,
        hcp_id: "HCP_00123".to_string(),
        rep_id: "REP_048".to_string(),
        call_date: CallDate::parse("01/02/2024").expect("date"),
        raw_note: note.to_string(),
        summary: "Discussed efficacy".to_string(),
        sentiment: "Low".to_string(),
        topics: "General".to_string(),
        next_action: "Follow up with study data".to_string(),
        risk_flag: "FALSE".to_string(),
        coaching_tip: "Lead with data next time".to_string(),
    }
}

fn exercise(connector: Arc<dyn SheetConnector>) {
    let store = RecordStore::new(connector);
    assert_eq!(store.allocate_next_id(), CallId::first());

    let first = store.allocate_next_id();
    store.append(&record(first.clone(), "first note")).expect("append");
    let second = store.allocate_next_id();
    assert_eq!(second.as_str(), "CALL_000002");
    store.append(&record(second.clone(), "second note")).expect("append");

    // Re-submitting an id appends again; the last row wins by convention.
    store.append(&record(second.clone(), "edited note")).expect("append");
    assert_eq!(store.allocate_next_id().as_str(), "CALL_000003");

    let recent = store.read_recent(5);
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[2].get("call_id"), Some("CALL_000002"));
    assert_eq!(recent[2].get("raw_note"), Some("edited note"));
    assert_eq!(recent[2].get("call_date"), Some("01/02/2024"));
    assert_eq!(recent[1].get("raw_note"), Some("second note"));

    // Updating an older call must not hand out an id that already exists.
    store.append(&record(first, "first note, edited")).expect("append");
    assert_eq!(store.allocate_next_id().as_str(), "CALL_000003");
}

#[test]
fn sqlite_backend_supports_the_full_store_contract() {
    let temp = tempdir().expect("tempdir");
    let connector = SqliteSheetConnector::new(
        temp.path().join("crm.sqlite3"),
        "Pharma_CRM_Database",
        &CallRecord::COLUMNS,
    );
    exercise(Arc::new(connector));
}

#[test]
fn jsonl_backend_supports_the_full_store_contract() {
    let temp = tempdir().expect("tempdir");
    let connector = JsonlSheetConnector::new(temp.path().join("crm.jsonl"), &CallRecord::COLUMNS);
    exercise(Arc::new(connector));
}

#[test]
fn unreachable_backend_degrades_reads_and_fails_writes() {
    let temp = tempdir().expect("tempdir");
    let connector = JsonlSheetConnector::new(
        temp.path().join("missing").join("crm.jsonl"),
        &CallRecord::COLUMNS,
    );
    let store = RecordStore::new(Arc::new(connector));
    assert_eq!(store.allocate_next_id(), CallId::offline());
    assert!(store.read_recent(5).is_empty());
    assert!(store.append(&record(CallId::first(), "x")).is_err());
}

#[test]
fn jsonl_backend_keeps_rows_appended_to_an_empty_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("crm.jsonl");
    std::fs::write(&path, "").expect("touch");
    let store = RecordStore::new(Arc::new(JsonlSheetConnector::new(
        &path,
        &CallRecord::COLUMNS,
    )));

    store
        .append(&record(CallId::first(), "only note"))
        .expect("append");

    let recent = store.read_recent(5);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].get("raw_note"), Some("only note"));
    assert_eq!(store.allocate_next_id().as_str(), "CALL_000002");
}
