use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EVENT_TITLE;

/// A swipe decision on an attendee.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Liked,
    Passed,
}

impl SwipeAction {
    pub fn is_like(self) -> bool {
        self == SwipeAction::Liked
    }
}

/// Lifecycle of a user's enrollment in an event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Confirmed,
    Attended,
}

/// How likes turn into matches.
///
/// `OneSided` treats every like as a match, which is what the app has always
/// shipped. `Mutual` additionally requires the liked user to have liked back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    OneSided,
    Mutual,
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-sided" | "onesided" | "one_sided" => Ok(Self::OneSided),
            "mutual" => Ok(Self::Mutual),
            other => Err(format!("unknown match mode: {other}")),
        }
    }
}

/// The slice of an event the chat core snapshots into conversations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl EventMeta {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Title to snapshot, falling back to a generic label.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_EVENT_TITLE)
    }

    pub fn display_image(&self) -> &str {
        self.image.as_deref().unwrap_or_default()
    }
}
