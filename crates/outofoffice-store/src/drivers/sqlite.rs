//! SQLite document driver.
//!
//! Documents are stored as JSON text in the `documents` table, one row per
//! `(collection, id)`. Field filters use `json_extract`, so lookups such as
//! "chats where userId1 = ?" stay single queries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Shared handle to a SQLite document database.
#[derive(Clone)]
pub struct SqliteDb {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteDb {
    /// Open (or create) the default application database.
    ///
    /// The file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/outofoffice/outofoffice.db`
    /// - macOS:   `~/Library/Application Support/com.outofoffice.outofoffice/outofoffice.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\outofoffice\outofoffice\data\outofoffice.db`
    pub fn new() -> Result<Self> {
        Self::open_at(&default_path()?)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::info!(path = %path.display(), "opening document database");

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Filesystem path of the open database, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` with exclusive access to the connection.
    pub(crate) async fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.conn.lock().await;
        f(&mut conn)
    }
}

/// Resolve the platform data directory path of the database file.
pub fn default_path() -> Result<PathBuf> {
    let project_dirs =
        ProjectDirs::from("com", "outofoffice", "outofoffice").ok_or(StoreError::NoDataDir)?;
    Ok(project_dirs.data_dir().join("outofoffice.db"))
}

// ---------------------------------------------------------------------------
// Document helpers
// ---------------------------------------------------------------------------

pub(crate) fn get_doc<T: DeserializeOwned>(
    conn: &Connection,
    collection: &str,
    id: &str,
) -> Result<Option<T>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()?;

    body.map(|b| serde_json::from_str(&b).map_err(StoreError::from))
        .transpose()
}

/// Insert or overwrite a document. An overwrite keeps the original `seq`.
pub(crate) fn put_doc<T: Serialize>(
    conn: &Connection,
    collection: &str,
    id: &str,
    doc: &T,
) -> Result<()> {
    let body = serde_json::to_string(doc)?;
    conn.execute(
        "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
         ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body",
        params![collection, id, body],
    )?;
    Ok(())
}

/// Insert only when no document has that id. Returns whether it was written.
pub(crate) fn insert_doc_if_absent<T: Serialize>(
    conn: &Connection,
    collection: &str,
    id: &str,
    doc: &T,
) -> Result<bool> {
    let body = serde_json::to_string(doc)?;
    let affected = conn.execute(
        "INSERT OR IGNORE INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
        params![collection, id, body],
    )?;
    Ok(affected > 0)
}

pub(crate) fn delete_doc(conn: &Connection, collection: &str, id: &str) -> Result<bool> {
    let affected = conn.execute(
        "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
        params![collection, id],
    )?;
    Ok(affected > 0)
}

/// Documents whose top-level string `field` equals `value`, in insertion
/// order. `field` must be a static field name, never user input.
pub(crate) fn query_docs<T: DeserializeOwned>(
    conn: &Connection,
    collection: &str,
    field: &'static str,
    value: &str,
) -> Result<Vec<T>> {
    let sql = format!(
        "SELECT body FROM documents
         WHERE collection = ?1 AND json_extract(body, '$.{field}') = ?2
         ORDER BY seq ASC"
    );
    collect_docs(conn, &sql, params![collection, value])
}

/// Every document of a collection, in insertion order.
pub(crate) fn all_docs<T: DeserializeOwned>(conn: &Connection, collection: &str) -> Result<Vec<T>> {
    collect_docs(
        conn,
        "SELECT body FROM documents WHERE collection = ?1 ORDER BY seq ASC",
        params![collection],
    )
}

/// The `limit` most recently inserted documents of a collection, newest first.
pub(crate) fn latest_docs<T: DeserializeOwned>(
    conn: &Connection,
    collection: &str,
    limit: usize,
) -> Result<Vec<T>> {
    collect_docs(
        conn,
        "SELECT body FROM documents WHERE collection = ?1 ORDER BY seq DESC LIMIT ?2",
        params![collection, limit as i64],
    )
}

fn collect_docs<T: DeserializeOwned>(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| row.get::<_, String>(0))?;

    // One bad document must not hide the rest of the collection.
    let mut docs = Vec::new();
    for row in rows {
        let body = row?;
        match serde_json::from_str(&body) {
            Ok(doc) => docs.push(doc),
            Err(e) => tracing::warn!(error = %e, "Skipping undecodable document"),
        }
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Note {
        id: String,
        chat_id: String,
    }

    fn note(id: &str, chat_id: &str) -> Note {
        Note {
            id: id.into(),
            chat_id: chat_id.into(),
        }
    }

    #[test]
    fn open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("test.db");

        let db = SqliteDb::open_at(&path).expect("should open");
        assert_eq!(db.path(), Some(path.as_path()));

        // Reopening runs no migration twice.
        drop(db);
        SqliteDb::open_at(&path).expect("should reopen");
    }

    #[tokio::test]
    async fn documents_put_get_query() {
        let db = SqliteDb::open_in_memory().unwrap();

        db.with_conn(|conn| {
            put_doc(conn, "notes", "a", &note("a", "c1"))?;
            put_doc(conn, "notes", "b", &note("b", "c2"))?;
            put_doc(conn, "notes", "c", &note("c", "c1"))?;

            let got: Option<Note> = get_doc(conn, "notes", "b")?;
            assert_eq!(got, Some(note("b", "c2")));

            let in_c1: Vec<Note> = query_docs(conn, "notes", "chatId", "c1")?;
            assert_eq!(in_c1, vec![note("a", "c1"), note("c", "c1")]);

            let latest: Vec<Note> = latest_docs(conn, "notes", 2)?;
            assert_eq!(latest, vec![note("c", "c1"), note("b", "c2")]);
            Ok(())
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_first() {
        let db = SqliteDb::open_in_memory().unwrap();

        db.with_conn(|conn| {
            assert!(insert_doc_if_absent(conn, "notes", "a", &note("a", "first"))?);
            assert!(!insert_doc_if_absent(conn, "notes", "a", &note("a", "second"))?);

            let got: Option<Note> = get_doc(conn, "notes", "a")?;
            assert_eq!(got.unwrap().chat_id, "first");

            assert!(delete_doc(conn, "notes", "a")?);
            assert!(!delete_doc(conn, "notes", "a")?);
            let all: Vec<Note> = all_docs(conn, "notes")?;
            assert!(all.is_empty());
            Ok(())
        })
        .await
        .unwrap();
    }
}
