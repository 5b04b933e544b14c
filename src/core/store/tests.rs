use super::{
    BlobStore, DocSnapshot, Document, DocumentStore, JsonDocumentStore, JsonScheduleStore,
    LocalBlobStore, SavedSchedule, ScheduleStore, UploadProgress,
};
use crate::core::grid::{CellPos, Roster};
use crate::core::navigation::{Period, PeriodKind};
use crate::core::shifts::{ShiftCell, ShiftTemplate};
use crate::errors::Error;
use chrono::NaiveDate;
use serde_json::json;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let uniq = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("igs-store-{name}-{nanos}-{uniq}"))
}

fn doc(pairs: &[(&str, serde_json::Value)]) -> Document {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

type Seen = Rc<RefCell<Vec<Vec<String>>>>;

fn recorder(seen: &Seen) -> Box<dyn FnMut(&[DocSnapshot])> {
    let seen = seen.clone();
    Box::new(move |docs: &[DocSnapshot]| {
        seen.borrow_mut()
            .push(docs.iter().map(|d| d.id.clone()).collect());
    })
}

// ---------- document.rs ----------
#[test]
fn add_persists_one_file_per_collection() {
    let dir = temp_dir("docs");
    let store = JsonDocumentStore::new(&dir);
    let id = store.add("swaps", doc(&[("remark", json!("x"))])).unwrap();
    assert_eq!(id, "000001");

    let reopened = JsonDocumentStore::new(&dir);
    let listed = reopened.list("swaps").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].data["remark"], json!("x"));
    assert!(dir.join("swaps.json").exists());
    assert!(reopened.list("uploadedFiles").unwrap().is_empty());
}

#[test]
fn ids_keep_increasing_after_delete() {
    let store = JsonDocumentStore::new(temp_dir("ids"));
    let first = store.add("swaps", Document::new()).unwrap();
    store.delete("swaps", &first).unwrap();
    let second = store.add("swaps", Document::new()).unwrap();
    assert_ne!(first, second);
}

#[test]
fn delete_of_unknown_id_is_a_store_error() {
    let store = JsonDocumentStore::new(temp_dir("missing"));
    match store.delete("swaps", "nope").unwrap_err() {
        Error::Store(msg) => assert!(msg.contains("'nope'")),
        other => panic!("expected store error, got {other:?}"),
    }
}

#[test]
fn collection_names_are_restricted() {
    let store = JsonDocumentStore::new(temp_dir("names"));
    assert!(store.add("../escape", Document::new()).is_err());
    assert!(store.list("").is_err());
}

#[test]
fn subscribe_delivers_current_state_then_every_change() {
    let store = JsonDocumentStore::new(temp_dir("sub"));
    store.add("swaps", Document::new()).unwrap();
    let seen: Seen = Rc::default();
    let sub = store.subscribe("swaps", recorder(&seen), Box::new(|_: &Error| {}));

    let id = store.add("swaps", Document::new()).unwrap();
    store.add("uploadedFiles", Document::new()).unwrap();
    store.delete("swaps", &id).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            vec!["000001".to_string()],
            vec!["000001".to_string(), "000002".to_string()],
            vec!["000001".to_string()],
        ]
    );
    assert!(sub.is_active());
}

#[test]
fn dropping_subscription_unregisters_listener() {
    let store = JsonDocumentStore::new(temp_dir("drop"));
    let seen: Seen = Rc::default();
    let sub = store.subscribe("swaps", recorder(&seen), Box::new(|_: &Error| {}));
    assert_eq!(store.listener_count(), 1);

    sub.unsubscribe();
    store.add("swaps", Document::new()).unwrap();

    assert_eq!(store.listener_count(), 0);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn unreadable_collection_reaches_error_listener() {
    let dir = temp_dir("corrupt");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("swaps.json"), "{oops").unwrap();
    let store = JsonDocumentStore::new(&dir);

    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    let seen: Seen = Rc::default();
    let _sub = store.subscribe(
        "swaps",
        recorder(&seen),
        Box::new(move |e: &Error| sink.borrow_mut().push(e.to_string())),
    );

    assert!(seen.borrow().is_empty());
    assert_eq!(errors.borrow().len(), 1);
    assert!(errors.borrow()[0].starts_with("Store error: Invalid JSON"));
}

// ---------- blob.rs ----------
#[test]
fn progress_percent_handles_empty_payload() {
    let p = UploadProgress {
        transferred: 0,
        total: 0,
    };
    assert_eq!(p.percent(), 100);
    let half = UploadProgress {
        transferred: 5,
        total: 10,
    };
    assert_eq!(half.percent(), 50);
}

#[test]
fn local_blob_store_writes_in_chunks() {
    let dir = temp_dir("blobs");
    let store = LocalBlobStore::new(&dir).with_chunk_size(3);
    let mut ticks = Vec::new();
    let url = store
        .upload("uploads/1_a.txt", b"abcdefg", &mut |p| ticks.push(p.transferred))
        .unwrap();

    assert_eq!(ticks, vec![0, 3, 6, 7]);
    assert!(url.starts_with("file://"));
    assert_eq!(fs::read(dir.join("uploads").join("1_a.txt")).unwrap(), b"abcdefg");
}

#[test]
fn local_blob_store_rejects_traversal() {
    let store = LocalBlobStore::new(temp_dir("trav"));
    assert!(store.upload("../x", b"", &mut |_| {}).is_err());
    assert!(store.upload("uploads//x", b"", &mut |_| {}).is_err());
}

// ---------- schedule.rs ----------
fn march_week() -> Period {
    Period::containing(
        PeriodKind::Week,
        NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
    )
}

#[test]
fn schedule_store_saves_by_name_and_maps_onto_current_roster() {
    let dir = temp_dir("sched");
    let store = JsonScheduleStore::new(&dir);
    let roster = Roster::new(["ORN TAK", "SOTH SOKLAY"]).unwrap();
    let late = ShiftTemplate::try_from_str("13:00-22:36").unwrap();
    let cells = vec![
        (CellPos::new(0, 0), ShiftCell::off()),
        (CellPos::new(2, 1), ShiftCell::work(&late)),
    ];
    assert_eq!(store.save(&march_week(), &roster, &cells).unwrap(), 2);

    let text = fs::read_to_string(store.path_for(&march_week())).unwrap();
    let saved: SavedSchedule = serde_json::from_str(&text).unwrap();
    assert_eq!(saved.period, "week-2024-03-04");

    let reordered = Roster::new(["SOTH SOKLAY", "NEW HIRE", "ORN TAK"]).unwrap();
    let mut loaded = store.load(&march_week(), &reordered).unwrap();
    loaded.sort_by_key(|(pos, _)| *pos);
    assert_eq!(
        loaded,
        vec![
            (CellPos::new(0, 2), ShiftCell::off()),
            (CellPos::new(2, 0), ShiftCell::work(&late)),
        ]
    );
}

#[test]
fn schedule_store_merges_later_saves() {
    let store = JsonScheduleStore::new(temp_dir("merge"));
    let roster = Roster::new(["A", "B"]).unwrap();
    let early = ShiftTemplate::try_from_str("06:00-16:36").unwrap();
    store
        .save(&march_week(), &roster, &[(CellPos::new(1, 0), ShiftCell::off())])
        .unwrap();
    store
        .save(
            &march_week(),
            &roster,
            &[
                (CellPos::new(1, 0), ShiftCell::work(&early)),
                (CellPos::new(1, 1), ShiftCell::off()),
            ],
        )
        .unwrap();

    let loaded = store.load(&march_week(), &roster).unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.contains(&(CellPos::new(1, 0), ShiftCell::work(&early))));
}

#[test]
fn schedule_store_load_without_file_is_empty() {
    let store = JsonScheduleStore::new(temp_dir("empty"));
    let roster = Roster::new(["A"]).unwrap();
    assert!(store.load(&march_week(), &roster).unwrap().is_empty());
}
