use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_documents_chat_id
    ON documents(collection, json_extract(body, '$.chatId'));

CREATE INDEX IF NOT EXISTS idx_documents_event_id
    ON documents(collection, json_extract(body, '$.eventId'));
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
