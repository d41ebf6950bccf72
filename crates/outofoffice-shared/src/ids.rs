//! Identifier normalization and derivation.
//!
//! Ids cross the store boundary in several shapes: plain user ids (`"42"`),
//! attendee composites (`"<eventId>_<userId>"`) that leaked into fields meant
//! to hold a user id, and numbers where a string was expected. Everything in
//! this module is pure so it can be applied at every read boundary.

use crate::constants::{ID_SEPARATOR, MAX_USER_ID_DIGITS};

/// Return the user id embedded in `id`.
///
/// When `id` is a composite whose last `_`-separated segment is a short run
/// of ASCII digits, that segment is returned. Anything else comes back
/// unchanged.
///
/// ```
/// use outofoffice_shared::ids::extract_user_id;
///
/// assert_eq!(extract_user_id("1763916921410_1"), "1");
/// assert_eq!(extract_user_id("42"), "42");
/// ```
pub fn extract_user_id(id: &str) -> &str {
    match id.rsplit_once(ID_SEPARATOR) {
        Some((_, suffix)) if is_short_numeric(suffix) => suffix,
        _ => id,
    }
}

fn is_short_numeric(segment: &str) -> bool {
    !segment.is_empty()
        && segment.len() < MAX_USER_ID_DIGITS
        && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Id of the attendee projection of `user_id` within `event_id`.
pub fn attendee_id(event_id: &str, user_id: &str) -> String {
    format!("{event_id}{ID_SEPARATOR}{user_id}")
}

/// Id of the enrollment document of `user_id` in `event_id`.
pub fn enrollment_id(user_id: &str, event_id: &str) -> String {
    format!("{user_id}{ID_SEPARATOR}{event_id}")
}

/// Order two user ids lexicographically.
pub fn sorted_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Deterministic conversation key for an unordered user pair within an event.
pub fn chat_id(user_a: &str, user_b: &str, event_id: &str) -> String {
    let (low, high) = sorted_pair(user_a, user_b);
    format!("{low}{ID_SEPARATOR}{high}{ID_SEPARATOR}{event_id}")
}

/// Logical identity of a conversation: the normalized unordered pair plus
/// the event. Several stored chats may share one key after id drift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatKey {
    pub low: String,
    pub high: String,
    pub event_id: String,
}

impl ChatKey {
    pub fn normalized(user_a: &str, user_b: &str, event_id: &str) -> Self {
        let (low, high) = sorted_pair(extract_user_id(user_a), extract_user_id(user_b));
        Self {
            low: low.to_string(),
            high: high.to_string(),
            event_id: event_id.to_string(),
        }
    }
}

/// Serde adapters for id fields that upstream writers stored either as
/// strings or as JSON numbers.
pub mod string_or_number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
        UInt(u64),
        Float(f64),
    }

    impl From<RawId> for String {
        fn from(raw: RawId) -> Self {
            match raw {
                RawId::Str(s) => s,
                RawId::Int(n) => n.to_string(),
                RawId::UInt(n) => n.to_string(),
                RawId::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
                    (f as i64).to_string()
                }
                RawId::Float(f) => f.to_string(),
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawId::deserialize(deserializer).map(String::from)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[test]
    fn extract_user_id_from_composite() {
        assert_eq!(extract_user_id("1763916921410_1"), "1");
        assert_eq!(extract_user_id("E1_7"), "7");
        assert_eq!(extract_user_id("a_b_12"), "12");
    }

    #[test]
    fn extract_user_id_leaves_plain_ids() {
        assert_eq!(extract_user_id("42"), "42");
        assert_eq!(extract_user_id(""), "");
        assert_eq!(extract_user_id("abc_def"), "abc_def");
        assert_eq!(extract_user_id("trailing_"), "trailing_");
    }

    #[test]
    fn extract_user_id_rejects_long_suffix() {
        // 10 digits is already an event-like id
        assert_eq!(extract_user_id("x_1234567890"), "x_1234567890");
        assert_eq!(extract_user_id("x_123456789"), "123456789");
    }

    #[test]
    fn chat_id_is_order_independent() {
        assert_eq!(chat_id("7", "42", "E1"), "42_7_E1");
        assert_eq!(chat_id("42", "7", "E1"), "42_7_E1");
        assert_eq!(chat_id("5", "5", "E1"), "5_5_E1");
    }

    #[test]
    fn chat_key_normalizes_composites() {
        let clean = ChatKey::normalized("1", "2", "E");
        let drifted = ChatKey::normalized("E_2", "1", "E");
        assert_eq!(clean, drifted);
        assert_ne!(clean, ChatKey::normalized("1", "2", "F"));
    }

    #[test]
    fn composite_ids() {
        assert_eq!(attendee_id("E1", "7"), "E1_7");
        assert_eq!(enrollment_id("7", "E1"), "7_E1");
    }

    #[derive(Deserialize)]
    struct Doc {
        #[serde(deserialize_with = "string_or_number::deserialize")]
        id: String,
        #[serde(default, deserialize_with = "string_or_number::deserialize_option")]
        other: Option<String>,
    }

    #[test]
    fn string_or_number_accepts_both_shapes() {
        let doc: Doc = serde_json::from_str(r#"{"id": 1763916921410, "other": "7"}"#).unwrap();
        assert_eq!(doc.id, "1763916921410");
        assert_eq!(doc.other.as_deref(), Some("7"));

        let doc: Doc = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(doc.id, "abc");
        assert!(doc.other.is_none());

        let doc: Doc = serde_json::from_str(r#"{"id": 3.0, "other": null}"#).unwrap();
        assert_eq!(doc.id, "3");
        assert!(doc.other.is_none());
    }
}
