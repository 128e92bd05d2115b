//! Behavior every `Storage` backend must share.
//!
//! The SQLite cases always run. The MongoDB cases run only when
//! `JOURNAL_TEST_MONGODB_URI` points at a reachable server; each run uses a
//! fresh collection.

use chrono::Duration;
use journal_core::{DocumentStorage, Entry, SqliteStorage, Storage, StorageError};
use std::collections::HashSet;

const MONGODB_TEST_URI_ENV: &str = "JOURNAL_TEST_MONGODB_URI";

#[test]
fn sqlite_create_and_get_roundtrip() {
    create_and_get_roundtrip(&sqlite());
}

#[test]
fn sqlite_duplicate_create_is_rejected() {
    duplicate_create_is_rejected(&sqlite());
}

#[test]
fn sqlite_update_overwrites_mutable_fields_only() {
    update_overwrites_mutable_fields_only(&sqlite());
}

#[test]
fn sqlite_missing_ids_report_not_found() {
    missing_ids_report_not_found(&sqlite());
}

#[test]
fn sqlite_delete_removes_permanently() {
    delete_removes_permanently(&sqlite());
}

#[test]
fn sqlite_list_returns_every_entry() {
    list_returns_every_entry(&sqlite());
}

#[test]
fn sqlite_save_entries_upserts() {
    save_entries_upserts(&sqlite());
}

#[test]
fn sqlite_save_entries_keeps_updated_after_created() {
    save_entries_keeps_updated_after_created(&sqlite());
}

#[test]
fn sqlite_invalid_entries_are_not_written() {
    invalid_entries_are_not_written(&sqlite());
}

#[test]
fn sqlite_save_entries_rejects_whole_batch_on_invalid_entry() {
    save_entries_rejects_whole_batch_on_invalid_entry(&sqlite());
}

#[test]
fn boxed_storage_delegates() {
    let storage: Box<dyn Storage + Send + Sync> = Box::new(sqlite());
    create_and_get_roundtrip(&storage);
    list_returns_every_entry(&storage);
}

#[test]
fn document_storage_contract() {
    let Some(storage) = document() else {
        eprintln!("skipping: {MONGODB_TEST_URI_ENV} is not set");
        return;
    };

    create_and_get_roundtrip(&storage);
    duplicate_create_is_rejected(&storage);
    update_overwrites_mutable_fields_only(&storage);
    missing_ids_report_not_found(&storage);
    delete_removes_permanently(&storage);
    save_entries_upserts(&storage);
    save_entries_keeps_updated_after_created(&storage);
    invalid_entries_are_not_written(&storage);
    save_entries_rejects_whole_batch_on_invalid_entry(&storage);
}

fn sqlite() -> SqliteStorage {
    SqliteStorage::open_in_memory().unwrap()
}

fn document() -> Option<DocumentStorage> {
    let uri = std::env::var(MONGODB_TEST_URI_ENV).ok()?;
    let collection = format!("entries_test_{}", uuid::Uuid::new_v4().simple());
    Some(DocumentStorage::connect(&uri, "journal_test", &collection).unwrap())
}

fn create_and_get_roundtrip(storage: &impl Storage) {
    let entry = Entry::new("first entry", "dear diary");
    storage.create_entry(&entry).unwrap();

    let loaded = storage.get_entry(&entry.id).unwrap();
    assert_eq!(loaded, entry);
}

fn duplicate_create_is_rejected(storage: &impl Storage) {
    let entry = Entry::new("once", "only");
    storage.create_entry(&entry).unwrap();

    let err = storage.create_entry(&entry).unwrap_err();
    assert!(matches!(err, StorageError::DuplicateKey(ref id) if *id == entry.id));
}

fn update_overwrites_mutable_fields_only(storage: &impl Storage) {
    let entry = Entry::new("draft", "body");
    storage.create_entry(&entry).unwrap();

    let mut changed = entry.clone();
    changed.title = "final".to_string();
    changed.content = String::new();
    changed.updated = entry.updated + Duration::seconds(3);
    changed.created = entry.created + Duration::seconds(1);
    storage.update_entry(&changed).unwrap();

    let loaded = storage.get_entry(&entry.id).unwrap();
    assert_eq!(loaded.title, "final");
    assert_eq!(loaded.content, "");
    assert_eq!(loaded.updated, changed.updated);
    assert_eq!(loaded.created, entry.created);
}

fn missing_ids_report_not_found(storage: &impl Storage) {
    let ghost = Entry::new("ghost", "never stored");

    assert!(matches!(
        storage.get_entry(&ghost.id),
        Err(StorageError::NotFound(_))
    ));
    assert!(matches!(
        storage.update_entry(&ghost),
        Err(StorageError::NotFound(_))
    ));
    assert!(matches!(
        storage.delete_entry(&ghost.id),
        Err(StorageError::NotFound(_))
    ));
}

fn delete_removes_permanently(storage: &impl Storage) {
    let entry = Entry::new("short lived", "gone soon");
    storage.create_entry(&entry).unwrap();

    storage.delete_entry(&entry.id).unwrap();

    assert!(matches!(
        storage.get_entry(&entry.id),
        Err(StorageError::NotFound(_))
    ));
    assert!(matches!(
        storage.delete_entry(&entry.id),
        Err(StorageError::NotFound(_))
    ));
    assert!(storage
        .list_entries()
        .unwrap()
        .iter()
        .all(|stored| stored.id != entry.id));
}

fn list_returns_every_entry(storage: &impl Storage) {
    let before = storage.list_entries().unwrap().len();
    let created = (0..3)
        .map(|index| Entry::new(format!("entry {index}"), format!("content {index}")))
        .collect::<Vec<_>>();
    for entry in &created {
        storage.create_entry(entry).unwrap();
    }

    let listed = storage.list_entries().unwrap();
    assert_eq!(listed.len(), before + created.len());

    let ids = listed.iter().map(|entry| entry.id.as_str()).collect::<HashSet<_>>();
    for entry in &created {
        assert!(ids.contains(entry.id.as_str()));
        let stored = listed.iter().find(|stored| stored.id == entry.id).unwrap();
        assert_eq!(stored, entry);
    }
}

fn save_entries_upserts(storage: &impl Storage) {
    let existing = Entry::new("existing", "old content");
    storage.create_entry(&existing).unwrap();

    let mut replacement = existing.clone();
    replacement.title = "existing, edited".to_string();
    replacement.content = "new content".to_string();
    replacement.created = existing.created - Duration::days(1);
    replacement.updated = existing.updated + Duration::minutes(1);
    let fresh = Entry::new("imported", "from elsewhere");

    storage
        .save_entries(&[replacement.clone(), fresh.clone()])
        .unwrap();

    let loaded = storage.get_entry(&existing.id).unwrap();
    assert_eq!(loaded.title, "existing, edited");
    assert_eq!(loaded.content, "new content");
    assert_eq!(loaded.created, existing.created);
    assert_eq!(loaded.updated, replacement.updated);

    assert_eq!(storage.get_entry(&fresh.id).unwrap(), fresh);
}

fn save_entries_keeps_updated_after_created(storage: &impl Storage) {
    let existing = Entry::new("existing", "kept created");
    storage.create_entry(&existing).unwrap();

    let mut older = existing.clone();
    older.created = existing.created - Duration::days(2);
    older.updated = existing.created - Duration::days(1);
    older.validate().unwrap();

    storage.save_entries(&[older]).unwrap();

    let loaded = storage.get_entry(&existing.id).unwrap();
    assert_eq!(loaded.created, existing.created);
    assert_eq!(loaded.updated, existing.created);
    loaded.validate().unwrap();
}

fn invalid_entries_are_not_written(storage: &impl Storage) {
    let mut invalid = Entry::new("bad", "timestamps");
    invalid.updated = invalid.created - Duration::seconds(1);

    assert!(matches!(
        storage.create_entry(&invalid),
        Err(StorageError::Validation(_))
    ));
    assert!(matches!(
        storage.save_entries(&[invalid.clone()]),
        Err(StorageError::Validation(_))
    ));
    assert!(matches!(
        storage.get_entry(&invalid.id),
        Err(StorageError::NotFound(_))
    ));
}

fn save_entries_rejects_whole_batch_on_invalid_entry(storage: &impl Storage) {
    let valid = Entry::new("valid", "first in batch");
    let mut invalid = Entry::new("invalid", "second in batch");
    invalid.updated = invalid.created - Duration::seconds(1);

    assert!(matches!(
        storage.save_entries(&[valid.clone(), invalid]),
        Err(StorageError::Validation(_))
    ));
    assert!(matches!(
        storage.get_entry(&valid.id),
        Err(StorageError::NotFound(_))
    ));
}
