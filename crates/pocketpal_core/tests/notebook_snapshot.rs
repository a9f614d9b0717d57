use pocketpal_core::db::open_db_in_memory;
use pocketpal_core::{
    delete_notebook, load_notebook, save_notebook, Note, NoteSnapshotRepository, NoteStore,
    RepoError, SqliteNoteSnapshotRepository,
};
use rusqlite::Connection;

fn sample_store() -> NoteStore {
    let mut store = NoteStore::new();
    store.insert(
        Note::with_created_at("zeta", "first in order", 1_700_000_000_000)
            .with_tags(["work", "home", "work"])
            .with_contacts(["Ann", "Bob"]),
    );
    store.insert(Note::with_created_at("alpha", "second", 1_700_000_100_000));
    store.insert(
        Note::with_created_at("mid", "third", 1_700_000_200_000).with_contacts(["Ann"]),
    );
    store
}

#[test]
fn snapshot_round_trip_preserves_order_tags_contacts_and_dates() {
    let mut conn = open_db_in_memory().unwrap();
    let store = sample_store();

    let mut repo = SqliteNoteSnapshotRepository::try_new(&mut conn).unwrap();
    repo.save_snapshot(&store).unwrap();
    let loaded = repo.load_snapshot().unwrap();

    assert_eq!(loaded, store);
    let order: Vec<&str> = loaded.iter().map(|note| note.title.as_str()).collect();
    assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    assert_eq!(loaded.find("zeta").unwrap().tags, vec!["work", "home", "work"]);
}

#[test]
fn save_snapshot_replaces_previous_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteNoteSnapshotRepository::try_new(&mut conn).unwrap();
    let mut store = sample_store();
    repo.save_snapshot(&store).unwrap();

    store.delete("zeta").unwrap();
    repo.save_snapshot(&store).unwrap();

    let loaded = repo.load_snapshot().unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.find("zeta").is_none());
    assert!(loaded.find_by_tag("work").is_empty());
}

#[test]
fn empty_database_loads_empty_store() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteSnapshotRepository::try_new(&mut conn).unwrap();

    assert!(repo.load_snapshot().unwrap().is_empty());
}

#[test]
fn try_new_rejects_connection_without_notebook_schema() {
    let mut conn = Connection::open_in_memory().unwrap();

    let err = SqliteNoteSnapshotRepository::try_new(&mut conn)
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

#[test]
fn load_notebook_returns_empty_store_for_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sqlite3");

    let store = load_notebook(&path).unwrap();
    assert!(store.is_empty());
    assert!(!path.exists());
}

#[test]
fn save_then_load_notebook_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("notes.sqlite3");
    let store = sample_store();

    save_notebook(&path, &store).unwrap();
    assert!(path.exists());

    let loaded = load_notebook(&path).unwrap();
    assert_eq!(loaded, store);
}

#[test]
fn delete_notebook_removes_file_and_ignores_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");
    save_notebook(&path, &sample_store()).unwrap();

    delete_notebook(&path).unwrap();
    assert!(!path.exists());
    delete_notebook(&path).unwrap();

    assert!(load_notebook(&path).unwrap().is_empty());
}
