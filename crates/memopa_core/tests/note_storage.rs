use memopa_core::db::migrations::latest_version;
use memopa_core::db::{open_db, open_db_in_memory, DbError};
use memopa_core::editor::clipboard::NoClipboard;
use memopa_core::{
    CardDraft, Note, NoteListQuery, NoteRepository, NoteService, NoteServiceError, RepoError,
    SelectionRange, SqliteNoteRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn table_exists(conn: &Connection, table: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}

#[test]
fn in_memory_database_has_notes_schema() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert!(table_exists(&conn, "notes"));
}

#[test]
fn reopening_file_database_keeps_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memopa.db");

    let conn = open_db(&path).unwrap();
    let note = Note::new("kept [CARD:c:::T|||B]");
    SqliteNoteRepository::new(&conn).create_note(&note).unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let loaded = SqliteNoteRepository::new(&conn)
        .get_note(note.id)
        .unwrap()
        .unwrap();
    assert_eq!(loaded, note);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 42);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failed_migration_reports_version_and_keeps_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clashing.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE notes (uuid TEXT PRIMARY KEY);")
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::Migration { version, .. } => assert_eq!(*version, 1),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().starts_with("notes schema migration 1 failed"));
    assert!(std::error::Error::source(&err).is_some());

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 0);
}

#[test]
fn list_is_newest_first_with_pagination() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);
    for (index, created_at) in [100_i64, 300, 200].into_iter().enumerate() {
        let note = Note::with_id(Uuid::new_v4(), format!("note {index}"), created_at);
        repo.create_note(&note).unwrap();
    }

    let all = repo.list_notes(&NoteListQuery::default()).unwrap();
    let stamps = all.iter().map(|note| note.created_at).collect::<Vec<_>>();
    assert_eq!(stamps, vec![300, 200, 100]);

    let page = repo
        .list_notes(&NoteListQuery {
            limit: Some(1),
            offset: 1,
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].created_at, 200);
}

#[test]
fn update_and_delete_report_missing_notes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::new(&conn);
    let missing = Uuid::new_v4();

    assert!(matches!(
        repo.update_note_content(missing, "x"),
        Err(RepoError::NotFound(id)) if id == missing
    ));
    assert!(matches!(
        repo.delete_note(missing),
        Err(RepoError::NotFound(id)) if id == missing
    ));
}

#[test]
fn service_create_list_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn));

    let created = service.create_note("first").unwrap();
    assert_eq!(created.content, "first");

    let listed = service.list_notes(None, 0).unwrap();
    assert_eq!(listed.applied_limit, 20);
    assert_eq!(listed.items, vec![created.clone()]);

    service.delete_note(created.id).unwrap();
    assert!(service.get_note(created.id).unwrap().is_none());
    assert!(matches!(
        service.delete_note(created.id),
        Err(NoteServiceError::NoteNotFound(_))
    ));
}

#[test]
fn editor_changes_are_saved_as_marker_content() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn));
    let note = service.create_note("line1\nline2").unwrap();

    let mut editor = service.open_editor(note.id, &NoClipboard).unwrap();
    let run = editor.segments()[0].id().clone();
    editor.insert_cards(
        &run,
        &[CardDraft::new("Title", "Body")],
        SelectionRange::new(0, 5),
    );
    service.save_editor(&editor).unwrap();

    let stored = service.get_note(note.id).unwrap().unwrap();
    assert_eq!(stored.content, editor.note().content);
    assert!(stored.content.starts_with("line1\n[CARD:"));
    assert!(stored.content.ends_with(":::Title|||Body]line2"));

    let reopened = service.open_editor(note.id, &NoClipboard).unwrap();
    assert_eq!(reopened.segments().len(), 3);
}

#[test]
fn open_editor_for_missing_note_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&conn));
    assert!(matches!(
        service.open_editor(Uuid::new_v4(), &NoClipboard),
        Err(NoteServiceError::NoteNotFound(_))
    ));
}
