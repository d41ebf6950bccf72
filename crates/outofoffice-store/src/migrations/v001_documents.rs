//! v001 -- Document table.
//!
//! Every collection lives in one table. `seq` preserves insertion order,
//! which the message log relies on for timestamp ties.

use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    seq        INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,                 -- e.g. chats, messages
    id         TEXT NOT NULL,                 -- document key within collection
    body       TEXT NOT NULL,                 -- JSON document

    UNIQUE (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection_seq
    ON documents(collection, seq);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
