//! Integration tests for the record store.
//!
//! These tests run against SQLite (in memory, or a temp file when a second
//! connection is needed) and verify:
//! - Round-trip writes, batching, batch rollback and pagination
//! - Search, file listing and occupation statistics
//! - Updates, deletes and relation tag cascades

use sea_orm::{ConnectionTrait, Database};
use std::path::{Path, PathBuf};
use voterroll_core::{
    ExtractionEngine, Field, Provenance, RecordFields, RelationKind, SearchCriteria,
    StoreSettings,
};
use voterroll_store::{ConnectOptions, RecordStore, StoreError};

async fn memory_store() -> RecordStore {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let settings = StoreSettings {
        batch_size: 4,
        ..StoreSettings::default()
    };
    RecordStore::connect(options, settings)
        .await
        .expect("in-memory store should open")
}

fn person(serial: &str, name: &str, occupation: &str) -> RecordFields {
    RecordFields::default()
        .with(Field::SerialNumber, serial)
        .with(Field::Name, name)
        .with(Field::Occupation, occupation)
}

fn numbered(count: usize) -> Vec<RecordFields> {
    (1..=count)
        .map(|i| {
            RecordFields::default()
                .with(Field::SerialNumber, i.to_string())
                .with(Field::VoterNumber, format!("{i:06}"))
        })
        .collect()
}

#[tokio::test]
async fn test_round_trip_preserves_values() {
    let store = memory_store().await;
    let fields = RecordFields::default()
        .with(Field::SerialNumber, "০০০১")
        .with(Field::Name, "করিম উদ্দিন")
        .with(Field::VoterNumber, "০১২৩৪৫")
        .with(Field::FatherName, "রহিম")
        .with(Field::MotherName, "সালেহা")
        .with(Field::Occupation, "কৃষক")
        .with(Field::DateOfBirth, "০১/০২/১৯৮০")
        .with(Field::Address, "চরপাড়া");

    let inserted = store
        .add_records("ward1.txt", Some("union-7"), std::slice::from_ref(&fields))
        .await
        .expect("insert should succeed");
    assert_eq!(inserted, 1);

    let page = store
        .get_records("union-7/ward1.txt", 1, 10)
        .await
        .expect("page should load");
    assert_eq!(page.total, 1);
    let record = &page.items[0];
    assert_eq!(record.fields, fields);
    assert_eq!(record.provenance, Provenance::new("ward1.txt", Some("union-7")));
}

#[tokio::test]
async fn test_absent_fields_stay_absent() {
    let store = memory_store().await;
    let fields = RecordFields::default().with(Field::Name, "করিম");
    store
        .add_records("ward1.txt", None, std::slice::from_ref(&fields))
        .await
        .expect("insert should succeed");

    let all = store.get_all_records().await.expect("records should load");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].fields.get(Field::Address), None);
    assert_eq!(all[0].provenance.key(), "ward1.txt");
}

#[tokio::test]
async fn test_pagination() {
    let store = memory_store().await;
    store
        .add_records("ward1.txt", None, &numbered(15))
        .await
        .expect("insert should succeed");

    let first = store.get_records("ward1.txt", 1, 10).await.expect("page 1");
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 15);
    assert_eq!(first.pages, 2);

    let second = store.get_records("ward1.txt", 2, 10).await.expect("page 2");
    assert_eq!(second.items.len(), 5);
    assert_eq!(second.pages, 2);
    assert_eq!(
        second.items[0].fields.get(Field::SerialNumber),
        Some("11")
    );

    let beyond = store.get_records("ward1.txt", 3, 10).await.expect("page 3");
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 15);

    let zero = store.get_records("ward1.txt", 0, 10).await.expect("page 0");
    assert_eq!(zero.page, 1);
    assert_eq!(zero.items.len(), 10);
}

#[tokio::test]
async fn test_unknown_file_gives_empty_page() {
    let store = memory_store().await;
    let page = store
        .get_records("missing.txt", 1, 10)
        .await
        .expect("page should load");
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_batched_writes_keep_order() {
    let store = memory_store().await;
    // batch_size is 4, so this spans three transactions
    let inserted = store
        .add_records("ward1.txt", None, &numbered(10))
        .await
        .expect("insert should succeed");
    assert_eq!(inserted, 10);
    assert_eq!(store.count_records().await.expect("count"), 10);

    let serials: Vec<String> = store
        .get_all_records()
        .await
        .expect("records should load")
        .into_iter()
        .filter_map(|r| r.fields.serial_number)
        .collect();
    let expected: Vec<String> = (1..=10).map(|i| i.to_string()).collect();
    assert_eq!(serials, expected);
}

#[tokio::test]
async fn test_repeated_imports_accumulate() {
    let store = memory_store().await;
    let records = vec![person("১", "করিম", "কৃষক")];
    store.add_records("ward1.txt", None, &records).await.expect("first");
    store.add_records("ward1.txt", None, &records).await.expect("second");

    let all = store.get_all_records().await.expect("records should load");
    assert_eq!(all.len(), 2);
    assert_ne!(all[0].id, all[1].id);
    assert_eq!(all[0].fields, all[1].fields);
}

#[tokio::test]
async fn test_empty_import_is_noop() {
    let store = memory_store().await;
    let inserted = store
        .add_records("ward1.txt", None, &[])
        .await
        .expect("empty insert should succeed");
    assert_eq!(inserted, 0);
    assert!(store.list_file_names().await.expect("names").is_empty());
}

#[tokio::test]
async fn test_list_file_names_tracks_writes() {
    let store = memory_store().await;
    store
        .add_records("ward1.txt", None, &numbered(2))
        .await
        .expect("insert");
    store
        .add_records("ward2.txt", Some("union-7"), &numbered(2))
        .await
        .expect("insert");

    let names = store.list_file_names().await.expect("names");
    assert_eq!(names, vec!["union-7/ward2.txt", "ward1.txt"]);

    store.delete_file_data("ward1.txt").await.expect("delete");
    let names = store.list_file_names().await.expect("names after delete");
    assert_eq!(names, vec!["union-7/ward2.txt"]);

    store
        .add_records("ward3.txt", None, &numbered(1))
        .await
        .expect("insert");
    let names = store.list_file_names().await.expect("names after insert");
    assert_eq!(names, vec!["union-7/ward2.txt", "ward3.txt"]);
}

#[tokio::test]
async fn test_search_records() {
    let store = memory_store().await;
    let records = vec![
        person("1", "Abdul Karim", "কৃষক").with(Field::FatherName, "Rahim"),
        person("2", "Karima Begum", "শিক্ষক").with(Field::FatherName, "Jalal"),
        person("3", "Salma", "কৃষক"),
    ];
    store.add_records("ward1.txt", None, &records).await.expect("insert");

    let all = store
        .search_records(&SearchCriteria::new())
        .await
        .expect("search");
    assert_eq!(all.len(), 3);

    let blanks: SearchCriteria = [(Field::Name, ""), (Field::Occupation, "")]
        .into_iter()
        .collect();
    assert_eq!(store.search_records(&blanks).await.expect("search").len(), 3);

    let karims = store
        .search_records(&SearchCriteria::new().with(Field::Name, "KARIM"))
        .await
        .expect("search");
    assert_eq!(karims.len(), 2);

    let anded = SearchCriteria::new()
        .with(Field::Name, "karim")
        .with(Field::Occupation, "কৃষক");
    let hits = store.search_records(&anded).await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].fields.get(Field::Name), Some("Abdul Karim"));

    // A record without the field never matches a criterion on it
    let fathers = store
        .search_records(&SearchCriteria::new().with(Field::FatherName, "a"))
        .await
        .expect("search");
    assert_eq!(fathers.len(), 2);
}

#[tokio::test]
async fn test_occupation_stats() {
    let store = memory_store().await;
    store
        .add_records(
            "ward1.txt",
            Some("union-7"),
            &[
                person("1", "করিম", "কৃষক"),
                person("2", "রহিম", "কৃষক"),
                person("3", "সালমা", "শিক্ষক"),
            ],
        )
        .await
        .expect("insert");
    store
        .add_records(
            "ward2.txt",
            Some("union-8"),
            &[
                person("1", "জামাল", "শিক্ষক"),
                RecordFields::default().with(Field::Name, "no job"),
            ],
        )
        .await
        .expect("insert");

    let union7 = store
        .get_occupation_stats(Some("union-7"))
        .await
        .expect("stats");
    let pairs: Vec<(&str, u64)> = union7
        .iter()
        .map(|s| (s.occupation.as_str(), s.count))
        .collect();
    assert_eq!(pairs, vec![("কৃষক", 2), ("শিক্ষক", 1)]);

    let all = store.get_occupation_stats(Some("all")).await.expect("stats");
    let pairs: Vec<(&str, u64)> = all.iter().map(|s| (s.occupation.as_str(), s.count)).collect();
    assert_eq!(pairs, vec![("কৃষক", 2), ("শিক্ষক", 2)]);

    assert_eq!(store.get_occupation_stats(None).await.expect("stats"), all);
    assert!(
        store
            .get_occupation_stats(Some("union-9"))
            .await
            .expect("stats")
            .is_empty()
    );
}

#[tokio::test]
async fn test_update_record() {
    let store = memory_store().await;
    store
        .add_records("ward1.txt", Some("union-7"), &[person("1", "করিম", "কৃষক")])
        .await
        .expect("insert");
    let id = store.get_all_records().await.expect("records")[0].id;

    let patch = RecordFields::default().with(Field::Occupation, "শিক্ষক");
    assert!(store.update_record(id, &patch).await.expect("update"));

    let record = store
        .get_record(id)
        .await
        .expect("load")
        .expect("record should exist");
    assert_eq!(record.fields.get(Field::Occupation), Some("শিক্ষক"));
    assert_eq!(record.fields.get(Field::Name), Some("করিম"));
    assert_eq!(record.provenance.key(), "union-7/ward1.txt");

    assert!(!store.update_record(id + 100, &patch).await.expect("update"));
    assert_eq!(store.count_records().await.expect("count"), 1);
}

#[tokio::test]
async fn test_mark_relation_is_idempotent() {
    let store = memory_store().await;
    store
        .add_records("ward1.txt", Some("union-7"), &[person("1", "করিম", "কৃষক")])
        .await
        .expect("insert");
    let id = store.get_all_records().await.expect("records")[0].id;

    assert!(store.mark_relation(id, RelationKind::Friend).await.expect("mark"));
    assert!(store.mark_relation(id, RelationKind::Friend).await.expect("mark"));

    let friends = store
        .get_relations_by_type(RelationKind::Friend, None)
        .await
        .expect("list");
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].record_id, id);
    assert_eq!(friends[0].folder.as_deref(), Some("union-7"));
    assert_eq!(friends[0].fields.get(Field::Name), Some("করিম"));
}

#[tokio::test]
async fn test_mark_relation_replaces_and_clears() {
    let store = memory_store().await;
    store
        .add_records("ward1.txt", None, &[person("1", "করিম", "কৃষক")])
        .await
        .expect("insert");
    let id = store.get_all_records().await.expect("records")[0].id;

    store.mark_relation(id, RelationKind::Friend).await.expect("mark");
    store.mark_relation(id, RelationKind::Enemy).await.expect("re-mark");

    let friends = store
        .get_relations_by_type(RelationKind::Friend, None)
        .await
        .expect("friends");
    let enemies = store
        .get_relations_by_type(RelationKind::Enemy, None)
        .await
        .expect("enemies");
    assert!(friends.is_empty());
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].folder, None);

    assert!(store.mark_relation(id, RelationKind::None).await.expect("clear"));
    assert!(store.get_relation(id).await.expect("tag").is_none());
    assert!(
        store
            .get_relations_by_type(RelationKind::None, None)
            .await
            .expect("none")
            .is_empty()
    );
}

#[tokio::test]
async fn test_mark_missing_record_fails_softly() {
    let store = memory_store().await;
    assert!(!store.mark_relation(42, RelationKind::Friend).await.expect("mark"));
    assert!(
        store
            .get_relations_by_type(RelationKind::Friend, None)
            .await
            .expect("list")
            .is_empty()
    );
}

#[tokio::test]
async fn test_relation_folder_filter() {
    let store = memory_store().await;
    store
        .add_records("a.txt", Some("union-7"), &[person("1", "করিম", "কৃষক")])
        .await
        .expect("insert");
    store
        .add_records("b.txt", Some("union-8"), &[person("1", "রহিম", "কৃষক")])
        .await
        .expect("insert");
    for record in store.get_all_records().await.expect("records") {
        store
            .mark_relation(record.id, RelationKind::Enemy)
            .await
            .expect("mark");
    }

    let union7 = store
        .get_relations_by_type(RelationKind::Enemy, Some("union-7"))
        .await
        .expect("list");
    assert_eq!(union7.len(), 1);
    assert_eq!(union7[0].fields.get(Field::Name), Some("করিম"));

    let all = store
        .get_relations_by_type(RelationKind::Enemy, Some("all"))
        .await
        .expect("list");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_tag_snapshot_is_not_refreshed() {
    let store = memory_store().await;
    store
        .add_records("ward1.txt", None, &[person("1", "করিম", "কৃষক")])
        .await
        .expect("insert");
    let id = store.get_all_records().await.expect("records")[0].id;
    store.mark_relation(id, RelationKind::Friend).await.expect("mark");

    let patch = RecordFields::default().with(Field::Name, "করিম উদ্দিন");
    store.update_record(id, &patch).await.expect("update");

    let tag = store
        .get_relation(id)
        .await
        .expect("tag")
        .expect("tag should exist");
    assert_eq!(tag.fields.get(Field::Name), Some("করিম"));
}

#[tokio::test]
async fn test_delete_record_cascades_tag() {
    let store = memory_store().await;
    store
        .add_records(
            "ward1.txt",
            None,
            &[person("1", "করিম", "কৃষক"), person("2", "রহিম", "কৃষক")],
        )
        .await
        .expect("insert");
    let ids: Vec<i32> = store
        .get_all_records()
        .await
        .expect("records")
        .iter()
        .map(|r| r.id)
        .collect();
    for id in &ids {
        store.mark_relation(*id, RelationKind::Friend).await.expect("mark");
    }

    assert!(store.delete_record(ids[0]).await.expect("delete"));
    assert!(!store.delete_record(ids[0]).await.expect("second delete"));

    let friends = store
        .get_relations_by_type(RelationKind::Friend, None)
        .await
        .expect("list");
    assert_eq!(friends.len(), 1);
    assert!(friends.iter().all(|t| t.record_id != ids[0]));
    assert_eq!(store.count_records().await.expect("count"), 1);
}

#[tokio::test]
async fn test_delete_file_data_cascades() {
    let store = memory_store().await;
    store
        .add_records("ward1.txt", Some("union-7"), &numbered(3))
        .await
        .expect("insert");
    store
        .add_records("ward2.txt", Some("union-7"), &numbered(2))
        .await
        .expect("insert");
    for record in store.get_all_records().await.expect("records") {
        store
            .mark_relation(record.id, RelationKind::Enemy)
            .await
            .expect("mark");
    }

    let removed = store
        .delete_file_data("union-7/ward1.txt")
        .await
        .expect("delete");
    assert_eq!(removed, 3);
    assert_eq!(store.count_records().await.expect("count"), 2);

    let enemies = store
        .get_relations_by_type(RelationKind::Enemy, None)
        .await
        .expect("list");
    assert_eq!(enemies.len(), 2);
    assert!(enemies.iter().all(|t| t.file_name == "union-7/ward2.txt"));
}

#[tokio::test]
async fn test_delete_all_records() {
    let store = memory_store().await;
    store
        .add_records("ward1.txt", None, &numbered(5))
        .await
        .expect("insert");
    let id = store.get_all_records().await.expect("records")[0].id;
    store.mark_relation(id, RelationKind::Friend).await.expect("mark");

    assert_eq!(store.delete_all_records().await.expect("delete all"), 5);
    assert_eq!(store.count_records().await.expect("count"), 0);
    assert!(store.list_file_names().await.expect("names").is_empty());
    assert!(
        store
            .get_relations_by_type(RelationKind::Friend, None)
            .await
            .expect("list")
            .is_empty()
    );
}

#[tokio::test]
async fn test_extracted_document_round_trip() {
    let store = memory_store().await;
    let engine = ExtractionEngine::with_defaults().expect("default engine should build");
    let records = engine.extract("১. নাম: করিম, ভোটার নং: 123, পিতা: রহিম\n২. নাম: সালমা, ভোটার নং: 124");
    assert_eq!(records.len(), 2);

    store
        .add_records("roll.txt", None, &records)
        .await
        .expect("insert");
    let page = store.get_records("roll.txt", 1, 10).await.expect("page");
    let stored: Vec<RecordFields> = page.items.into_iter().map(|r| r.fields).collect();
    assert_eq!(stored, records);
    assert_eq!(stored[0].get(Field::SerialNumber), Some("১"));
    assert_eq!(stored[0].get(Field::FatherName), Some("রহিম"));
}

#[tokio::test]
async fn test_open_rejects_empty_url() {
    let result = RecordStore::open("  ", StoreSettings::default()).await;
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[tokio::test]
async fn test_ping_and_close() {
    let store = memory_store().await;
    store.ping().await.expect("ping should succeed");
    store.close().await.expect("close should succeed");
}

fn temp_db_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("voterroll-{name}-{}.db", std::process::id()))
}

fn remove_db_files(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}

#[tokio::test]
async fn test_failed_batch_rolls_back_and_keeps_earlier_batches() {
    let path = temp_db_path("batch-failure");
    remove_db_files(&path);
    let url = format!("sqlite://{}?mode=rwc", path.display());

    let mut options = ConnectOptions::new(url.as_str());
    options.max_connections(1).sqlx_logging(false);
    let settings = StoreSettings {
        batch_size: 4,
        ..StoreSettings::default()
    };
    let store = RecordStore::connect(options, settings)
        .await
        .expect("file store should open");

    let admin = Database::connect(url.as_str())
        .await
        .expect("second connection should open");
    admin
        .execute_unprepared(
            "CREATE TRIGGER reject_bad_serial BEFORE INSERT ON records \
             WHEN NEW.serial_number = 'bad' \
             BEGIN SELECT RAISE(ABORT, 'rejected serial'); END;",
        )
        .await
        .expect("trigger should install");
    admin.close().await.expect("admin connection should close");

    // Second batch is records 5..=8; its second record is rejected
    let records: Vec<RecordFields> = ["1", "2", "3", "4", "5", "bad", "7", "8", "9"]
        .into_iter()
        .map(|serial| RecordFields::default().with(Field::SerialNumber, serial))
        .collect();
    let err = store
        .add_records("ward1.txt", None, &records)
        .await
        .expect_err("batch with a rejected record should fail");
    assert!(!err.is_transient());

    let serials: Vec<String> = store
        .get_all_records()
        .await
        .expect("records should load")
        .into_iter()
        .filter_map(|r| r.fields.serial_number)
        .collect();
    assert_eq!(serials, vec!["1", "2", "3", "4"]);
    assert_eq!(
        store.list_file_names().await.expect("names"),
        vec!["ward1.txt"]
    );

    store.close().await.expect("close should succeed");
    remove_db_files(&path);
}
