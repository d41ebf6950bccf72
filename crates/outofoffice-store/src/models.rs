//! Documents persisted by the store.
//!
//! Field names follow the camelCase layout of the shared document database
//! so that records written by other clients deserialize unchanged. Id fields
//! that older writers stored as numbers go through
//! [`string_or_number`](outofoffice_shared::ids::string_or_number).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use outofoffice_shared::ids::{self, extract_user_id, string_or_number, ChatKey};
use outofoffice_shared::types::{EnrollmentStatus, EventMeta, SwipeAction};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered user. Owned by the user directory; read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    /// Always stored lowercased.
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Best human-readable label: name, then email.
    pub fn display_name(&self) -> Option<&str> {
        [self.name.as_str(), self.email.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// An event from the catalog. Date fields are free text in whatever shape
/// the provider used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Enrollment
// ---------------------------------------------------------------------------

/// Membership of a user in an event, keyed `"<userId>_<eventId>"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub user_id: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub event_id: String,
    #[serde(default)]
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    pub fn new(user_id: &str, event_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: ids::enrollment_id(user_id, event_id),
            user_id: user_id.to_string(),
            event_id: event_id.to_string(),
            status: EnrollmentStatus::Confirmed,
            enrolled_at: now,
            updated_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Attendees and swipes
// ---------------------------------------------------------------------------

/// Per-event projection of a user, shown as a swipe candidate.
///
/// Real attendees carry `user_id`; legacy placeholder entries do not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "string_or_number::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub event_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutual_connections: Option<u32>,
    /// Last swipe annotation, whoever made it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe_action: Option<SwipeAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swiped_at: Option<DateTime<Utc>>,
}

impl Attendee {
    /// Project `user` into `event_id`.
    pub fn from_user(event_id: &str, user: &User) -> Self {
        Self {
            id: ids::attendee_id(event_id, &user.id),
            user_id: Some(user.id.clone()),
            event_id: event_id.to_string(),
            name: user.name.clone(),
            job: user.job.clone(),
            company: user.company.clone(),
            age: user.age,
            bio: user.bio.clone(),
            image: user.image.clone(),
            interests: user.interests.clone(),
            ..Default::default()
        }
    }

    /// Placeholder entries predate real enrollments and carry no user id.
    pub fn is_placeholder(&self) -> bool {
        self.user_id.is_none()
    }

    /// The user behind this attendee, recovered from the composite id when
    /// the explicit field is missing.
    pub fn resolved_user_id(&self) -> &str {
        match self.user_id.as_deref() {
            Some(id) => id,
            None => extract_user_id(&self.id),
        }
    }
}

/// One swipe decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRecord {
    pub action: SwipeAction,
    pub swiped_at: DateTime<Utc>,
}

/// The `eventAttendees` document of one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeDocument {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub event_id: String,
    #[serde(default)]
    pub event_title: String,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    /// swiper id -> attendee id -> current decision
    #[serde(default)]
    pub user_swipes: BTreeMap<String, BTreeMap<String, SwipeRecord>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendeeDocument {
    pub fn new(event_id: &str, event_title: &str, now: DateTime<Utc>) -> Self {
        Self {
            event_id: event_id.to_string(),
            event_title: event_title.to_string(),
            attendees: Vec::new(),
            user_swipes: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the attendee list. Swipes and `created_at` survive.
    pub fn replace_attendees(&mut self, event_title: &str, attendees: &[Attendee], now: DateTime<Utc>) {
        self.event_title = event_title.to_string();
        self.attendees = attendees.to_vec();
        self.updated_at = now;
    }

    /// Set the last-swipe annotation on one attendee. Returns `false` when no
    /// attendee has that id.
    pub fn annotate(&mut self, attendee_id: &str, action: SwipeAction, now: DateTime<Utc>) -> bool {
        let Some(attendee) = self.attendees.iter_mut().find(|a| a.id == attendee_id) else {
            return false;
        };
        attendee.swipe_action = Some(action);
        attendee.swiped_at = Some(now);
        self.updated_at = now;
        true
    }

    /// Upsert the current decision of `swiper_id` on `attendee_id`.
    pub fn record_swipe(&mut self, swiper_id: &str, attendee_id: &str, record: SwipeRecord) {
        self.user_swipes
            .entry(swiper_id.to_string())
            .or_default()
            .insert(attendee_id.to_string(), record);
        self.updated_at = record.swiped_at;
    }

    pub fn swipes_of(&self, user_id: &str) -> Option<&BTreeMap<String, SwipeRecord>> {
        self.user_swipes.get(user_id)
    }

    /// Whether `swiper_id` currently likes `attendee_id`.
    pub fn likes(&self, swiper_id: &str, attendee_id: &str) -> bool {
        self.swipes_of(swiper_id)
            .and_then(|swipes| swipes.get(attendee_id))
            .is_some_and(|record| record.action.is_like())
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A conversation between two users about one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub user_id1: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub user_id2: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub event_id: String,
    #[serde(default)]
    pub event_title: String,
    #[serde(default)]
    pub event_image: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
}

impl Chat {
    /// Fresh conversation record keyed by [`ids::chat_id`].
    pub fn new(user_a: &str, user_b: &str, event: &EventMeta, now: DateTime<Utc>) -> Self {
        let (low, high) = ids::sorted_pair(user_a, user_b);
        Self {
            id: ids::chat_id(low, high, &event.id),
            user_id1: low.to_string(),
            user_id2: high.to_string(),
            event_id: event.id.clone(),
            event_title: event.display_title().to_string(),
            event_image: event.display_image().to_string(),
            created_at: now,
            updated_at: now,
            last_message: None,
            last_message_at: None,
        }
    }

    /// Most recent activity: last message, else last update.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_message_at.unwrap_or(self.updated_at)
    }

    pub fn has_messages(&self) -> bool {
        self.last_message.as_deref().is_some_and(|m| !m.is_empty())
    }

    /// Participant ids after normalization.
    pub fn normalized_participants(&self) -> (&str, &str) {
        (extract_user_id(&self.user_id1), extract_user_id(&self.user_id2))
    }

    /// The normalized id of the participant that is not `user_id`, or `None`
    /// when `user_id` takes no part in this chat.
    pub fn counterpart_of(&self, user_id: &str) -> Option<&str> {
        let (first, second) = self.normalized_participants();
        if first == user_id {
            Some(second)
        } else if second == user_id {
            Some(first)
        } else {
            None
        }
    }

    pub fn key(&self) -> ChatKey {
        ChatKey::normalized(&self.user_id1, &self.user_id2, &self.event_id)
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message. Immutable apart from `read`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub sender_id: String,
    /// Empty for legacy messages stored without text.
    #[serde(default)]
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Message {
    /// Unread from the point of view of `reader_id`.
    pub fn is_unread_for(&self, reader_id: &str) -> bool {
        !self.read && self.sender_id != reader_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_new_sorts_participants() {
        let chat = Chat::new("7", "42", &EventMeta::new("E1"), Utc::now());
        assert_eq!(chat.id, "42_7_E1");
        assert_eq!(chat.user_id1, "42");
        assert_eq!(chat.user_id2, "7");
        assert_eq!(chat.event_title, "Event");
        assert!(chat.last_message.is_none());
    }

    #[test]
    fn chat_counterpart_normalizes() {
        let mut chat = Chat::new("1", "E_2", &EventMeta::new("E"), Utc::now());
        assert_eq!(chat.counterpart_of("1"), Some("2"));
        assert_eq!(chat.counterpart_of("2"), Some("1"));
        assert_eq!(chat.counterpart_of("3"), None);

        chat.user_id2 = "2".into();
        assert_eq!(chat.key(), ChatKey::normalized("2", "1", "E"));
    }

    #[test]
    fn chat_accepts_numeric_ids() {
        let json = r#"{
            "id": "1_2_99",
            "userId1": 1,
            "userId2": "2",
            "eventId": 99,
            "eventTitle": "Meetup",
            "eventImage": "",
            "createdAt": "2026-01-01T10:00:00Z",
            "updatedAt": "2026-01-01T10:00:00Z",
            "lastMessage": null,
            "lastMessageAt": null
        }"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        assert_eq!(chat.user_id1, "1");
        assert_eq!(chat.event_id, "99");
        assert!(!chat.has_messages());
    }

    #[test]
    fn legacy_documents_without_optional_fields() {
        let message: Message = serde_json::from_str(
            r#"{"id":"m1","chatId":"c1","senderId":7,"timestamp":"2026-01-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(message.text, "");
        assert_eq!(message.sender_id, "7");
        assert!(message.is_unread_for("42"));

        let chat: Chat =
            serde_json::from_str(r#"{"id":"c1","userId1":"7","userId2":"42","eventId":"E1"}"#).unwrap();
        assert_eq!(chat.last_activity(), DateTime::<Utc>::default());
    }

    #[test]
    fn attendee_document_swipes_overwrite() {
        let now = Utc::now();
        let mut doc = AttendeeDocument::new("E1", "Meetup", now);
        let passed = SwipeRecord { action: SwipeAction::Passed, swiped_at: now };
        let liked = SwipeRecord { action: SwipeAction::Liked, swiped_at: now };

        doc.record_swipe("42", "E1_7", passed);
        doc.record_swipe("42", "E1_7", liked);

        let swipes = doc.swipes_of("42").unwrap();
        assert_eq!(swipes.len(), 1);
        assert!(doc.likes("42", "E1_7"));
        assert!(!doc.likes("7", "E1_42"));
    }

    #[test]
    fn attendee_resolves_user_from_composite() {
        let placeholder = Attendee {
            id: "E1_3".into(),
            event_id: "E1".into(),
            ..Default::default()
        };
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.resolved_user_id(), "3");
    }

    #[test]
    fn message_unread_for_recipient_only() {
        let msg = Message {
            id: "m1".into(),
            chat_id: "c".into(),
            sender_id: "42".into(),
            text: "hello".into(),
            timestamp: Utc::now(),
            read: false,
        };
        assert!(msg.is_unread_for("7"));
        assert!(!msg.is_unread_for("42"));
    }
}
