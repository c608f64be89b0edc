use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use bookkeeping_portal::domain::assignment::{AccountingStatus, MonthKey, TaskKind};
use bookkeeping_portal::domain::types::ClientId;
use bookkeeping_portal::index::{AssignmentFilter, AssignmentIndex};

fn ingest(records: Value) -> AssignmentIndex {
    let records: Vec<Value> = serde_json::from_value(records).unwrap();
    AssignmentIndex::ingest_raw(records)
}

fn record(client: &str, name: &str, month: u32, task: Option<&str>, removed: bool) -> Value {
    json!({
        "client": {"clientId": client, "name": name},
        "year": 2024,
        "month": month,
        "task": task,
        "isRemoved": removed
    })
}

#[test]
fn tombstoned_duplicate_is_ignored() {
    let index = ingest(json!([
        record("C1", "Acme Corp", 3, Some("VAT Filing"), false),
        record("C1", "Acme Corp", 3, None, false),
        record("C1", "Acme Corp", 3, Some("VAT Filing"), true),
    ]));

    let roster = index.roster();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].assignment_count, 2);

    let grouped = index.grouped();
    let march = &grouped[&ClientId::new("C1").unwrap()][&MonthKey::try_new(2024, 3).unwrap()];
    let tasks: Vec<&TaskKind> = march.iter().map(|a| &a.task).collect();
    assert_eq!(tasks, vec![&TaskKind::Bookkeeping, &TaskKind::VatFiling]);
}

#[test]
fn search_is_case_insensitive() {
    let index = ingest(json!([
        record("C1", "Acme Corp", 3, None, false),
        record("C2", "Beta LLC", 3, None, false),
    ]));
    let filter = AssignmentFilter::new(Some("acme".to_string()), None, None);

    let names: Vec<String> = index
        .filtered(&filter)
        .into_iter()
        .map(|a| a.client.name)
        .collect();

    assert_eq!(names, vec!["Acme Corp".to_string()]);
}

#[test]
fn empty_input_gives_empty_views() {
    let index = ingest(json!([]));

    assert!(index.is_empty());
    assert!(index.roster().is_empty());
    assert!(index.grouped().is_empty());
    assert_eq!(index.skipped(), 0);
}

#[test]
fn roster_and_grouping_agree_on_clients() {
    let index = ingest(json!([
        record("C2", "Beta LLC", 2, None, false),
        record("C1", "Acme Corp", 3, None, false),
        record("C3", "Gone Ltd", 3, None, true),
        {"client": {"name": "No Id"}, "year": 2024, "month": 3},
    ]));

    let snapshot = index.snapshot();
    let roster_ids: Vec<&str> = snapshot
        .roster
        .iter()
        .map(|entry| entry.client.client_id.as_str())
        .collect();

    assert_eq!(roster_ids, vec!["C2", "C1"]);
    assert_eq!(snapshot.grouped.len(), 2);
    assert_eq!(snapshot.skipped, 1);
}

#[test]
fn double_toggle_restores_status_with_advancing_stamps() {
    let mut index = ingest(json!([record("C1", "Acme Corp", 3, None, false)]));
    let key = index.records()[0].key();
    let now = Utc.with_ymd_and_hms(2024, 3, 28, 10, 0, 0).unwrap();

    let first = index.toggle_accounting_done(&key, now, Some("Jamie")).unwrap();
    let second = index.toggle_accounting_done(&key, now, Some("Jamie")).unwrap();

    assert_eq!(first.status, AccountingStatus::Done);
    assert_eq!(second.status, AccountingStatus::Pending);
    assert!(second.accounting_done_at > first.accounting_done_at);
    assert_eq!(second.accounting_done_by.as_deref(), Some("Jamie"));
}
