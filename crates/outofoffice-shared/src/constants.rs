/// Application name
pub const APP_NAME: &str = "OutOfOffice";

/// Document collections
pub const USERS_COLLECTION: &str = "users";
pub const EVENTS_COLLECTION: &str = "events";
pub const ENROLLMENTS_COLLECTION: &str = "eventEnrollments";
pub const ATTENDEES_COLLECTION: &str = "eventAttendees";
pub const CHATS_COLLECTION: &str = "chats";
pub const MESSAGES_COLLECTION: &str = "messages";

/// Separator used by every composite id (`<eventId>_<userId>`, chat keys, ...)
pub const ID_SEPARATOR: char = '_';

/// A composite suffix is only treated as a user id below this many digits.
/// Event ids are millisecond timestamps (13 digits) and must not match.
pub const MAX_USER_ID_DIGITS: usize = 10;

/// Title snapshotted into a chat when the event carries none
pub const DEFAULT_EVENT_TITLE: &str = "Event";

/// Attendee name used when the enrolled user has no profile
pub const DEFAULT_ATTENDEE_NAME: &str = "Attendee";

/// Notification title when the sender cannot be resolved
pub const UNKNOWN_SENDER: &str = "Someone";

/// Notification body for legacy messages stored without text
pub const DEFAULT_NOTIFICATION_BODY: &str = "New message";

/// Default notification preview length in characters
pub const NOTIFICATION_PREVIEW_CHARS: usize = 100;

/// Messages older than this are never notified (5 minutes)
pub const NOTIFICATION_WINDOW_SECS: u64 = 5 * 60;

/// Number of newest messages inspected per notification poll
pub const NOTIFICATION_RECENT_LIMIT: usize = 50;

/// Number of processed message ids remembered by a notification session
pub const NOTIFICATION_PROCESSED_CAPACITY: usize = 100;

/// Default notification poll interval in milliseconds
pub const NOTIFICATION_POLL_MS: u64 = 2_000;
