use std::ops::Deref;
use std::path::PathBuf;

use crate::attendees::AbstractAttendees;
use crate::chats::AbstractChats;
use crate::drivers::{ReferenceDb, SqliteDb};
use crate::enrollments::AbstractEnrollments;
use crate::error::Result;
use crate::events::AbstractEvents;
use crate::messages::AbstractMessages;
use crate::users::AbstractUsers;

/// Every collection the core reads and writes.
pub trait AbstractDatabase:
    Sync
    + Send
    + AbstractUsers
    + AbstractEvents
    + AbstractEnrollments
    + AbstractAttendees
    + AbstractChats
    + AbstractMessages
{
}

impl<T> AbstractDatabase for T where
    T: Sync
        + Send
        + AbstractUsers
        + AbstractEvents
        + AbstractEnrollments
        + AbstractAttendees
        + AbstractChats
        + AbstractMessages
{
}

/// Database information to use to create a client
pub enum DatabaseInfo {
    /// In-memory reference database
    Reference,
    /// SQLite file at the platform data directory
    SqliteDefault,
    /// SQLite file at an explicit path
    Sqlite(PathBuf),
    /// Private in-memory SQLite database
    SqliteInMemory,
}

/// Database
#[derive(Clone)]
pub enum Database {
    /// Mock database
    Reference(ReferenceDb),
    /// SQLite document database
    Sqlite(SqliteDb),
}

impl DatabaseInfo {
    /// Create a database client from the given database information
    pub async fn connect(self) -> Result<Database> {
        Ok(match self {
            DatabaseInfo::Reference => Database::Reference(Default::default()),
            DatabaseInfo::SqliteDefault => Database::Sqlite(SqliteDb::new()?),
            DatabaseInfo::Sqlite(path) => Database::Sqlite(SqliteDb::open_at(&path)?),
            DatabaseInfo::SqliteInMemory => Database::Sqlite(SqliteDb::open_in_memory()?),
        })
    }
}

impl Deref for Database {
    type Target = dyn AbstractDatabase;

    fn deref(&self) -> &Self::Target {
        match self {
            Database::Reference(dummy) => dummy,
            Database::Sqlite(sqlite) => sqlite,
        }
    }
}
