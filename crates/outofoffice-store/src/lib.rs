//! # outofoffice-store
//!
//! Document storage for the OutOfOffice chat and matching core.
//!
//! Every collection is exposed as an async trait (`AbstractChats`,
//! `AbstractMessages`, ...) implemented by two drivers: an in-memory
//! [`ReferenceDb`] used by tests and demos, and a [`SqliteDb`] that keeps
//! each document as a JSON body in a single versioned SQLite table.
//! [`Database`] wraps whichever driver was selected through
//! [`DatabaseInfo`].

pub mod attendees;
pub mod chats;
pub mod database;
pub mod drivers;
pub mod enrollments;
pub mod events;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod users;

mod error;

pub use attendees::AbstractAttendees;
pub use chats::{AbstractChats, Participant};
pub use database::{AbstractDatabase, Database, DatabaseInfo};
pub use drivers::{ReferenceDb, SqliteDb};
pub use enrollments::AbstractEnrollments;
pub use error::{Result, StoreError};
pub use events::AbstractEvents;
pub use messages::AbstractMessages;
pub use models::*;
pub use users::AbstractUsers;
