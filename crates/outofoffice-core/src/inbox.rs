//! Chat list reconciliation.
//!
//! Older clients sometimes stored a composite attendee id
//! (`"<eventId>_<userId>"`) in a participant field, which produced several
//! chat documents for the same pair and event. The list built here folds
//! those duplicates into one entry at read time; nothing is rewritten.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use outofoffice_shared::ids::ChatKey;
use outofoffice_shared::types::EventMeta;
use outofoffice_store::{Attendee, Chat, Participant, User};
use serde::Serialize;
use tracing::debug;

use crate::{degrade, Client, Result};

/// One entry of a user's chat list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    /// The canonical document, with normalized participant ids.
    #[serde(flatten)]
    pub chat: Chat,
    pub other_user_id: String,
    /// Unread messages across every document folded into this entry.
    pub unread_count: usize,
    /// Ids of the duplicate documents folded into this entry.
    pub merged_from: Vec<String>,
}

/// A chat of the event inbox, with the counterpart's profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxChat {
    #[serde(flatten)]
    pub summary: ChatSummary,
    pub other_user: User,
}

/// Someone to start talking to: a fresh match, or a chat nobody wrote in yet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMatch {
    pub user_id: String,
    pub user: User,
    /// Set when the match came from the attendee list.
    pub attendee: Option<Attendee>,
    /// Set when a chat document already exists.
    pub chat_id: Option<String>,
}

/// Per-event split between ongoing conversations and pending matches.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInbox {
    pub chats: Vec<InboxChat>,
    pub matches: Vec<PendingMatch>,
}

impl Client {
    /// Every conversation of `user_id`, one entry per pair and event, most
    /// recently active first.
    pub async fn get_user_chats(&self, user_id: &str) -> Vec<ChatSummary> {
        let as_first = degrade(
            self.db
                .fetch_chats_for_participant(Participant::First, user_id)
                .await,
            "fetch_chats_for_participant",
        );
        let as_second = degrade(
            self.db
                .fetch_chats_for_participant(Participant::Second, user_id)
                .await,
            "fetch_chats_for_participant",
        );
        // Composite participant ids never match the exact queries above.
        let everything = degrade(self.db.fetch_all_chats().await, "fetch_all_chats");

        let mut seen = HashSet::new();
        let mut mine = Vec::new();
        for chat in as_first.into_iter().chain(as_second).chain(everything) {
            if !seen.contains(&chat.id) && chat.counterpart_of(user_id).is_some() {
                seen.insert(chat.id.clone());
                mine.push(chat);
            }
        }

        let unread = join_all(
            mine.iter()
                .map(|chat| self.get_unread_message_count(&chat.id, user_id)),
        )
        .await;

        let summaries = mine.into_iter().zip(unread).filter_map(|(chat, unread_count)| {
            let other_user_id = chat.counterpart_of(user_id)?.to_string();
            let (first, second) = chat.normalized_participants();
            let (first, second) = (first.to_string(), second.to_string());
            Some(ChatSummary {
                chat: Chat {
                    user_id1: first,
                    user_id2: second,
                    ..chat
                },
                other_user_id,
                unread_count,
                merged_from: Vec::new(),
            })
        });

        let mut merged = merge_duplicates(summaries);
        merged.sort_by(|a, b| b.chat.last_activity().cmp(&a.chat.last_activity()));
        merged
    }

    /// Every stored chat, unfiltered.
    pub async fn get_all_chats(&self) -> Vec<Chat> {
        degrade(self.db.fetch_all_chats().await, "get_all_chats")
    }

    /// Split the user's conversations about one event into chats with
    /// messages and pending matches.
    ///
    /// Pending matches are liked attendees without any chat yet, followed by
    /// chats nobody has written in. Entries whose counterpart has no profile
    /// are left out.
    pub async fn get_event_inbox(&self, event_id: &str, user_id: &str) -> EventInbox {
        let chats: Vec<ChatSummary> = self
            .get_user_chats(user_id)
            .await
            .into_iter()
            .filter(|s| s.chat.event_id == event_id)
            .collect();

        let chat_user_ids: HashSet<String> =
            chats.iter().map(|s| s.other_user_id.clone()).collect();

        let profiles = join_all(chats.iter().map(|s| self.get_user_by_id(&s.other_user_id))).await;

        let mut inbox = EventInbox::default();
        let mut quiet = Vec::new();
        for (summary, profile) in chats.into_iter().zip(profiles) {
            let Some(other_user) = profile else {
                debug!(chat_id = %summary.chat.id, "counterpart has no profile, skipping");
                continue;
            };
            if summary.chat.has_messages() {
                inbox.chats.push(InboxChat {
                    summary,
                    other_user,
                });
            } else {
                quiet.push(PendingMatch {
                    user_id: summary.other_user_id,
                    user: other_user,
                    attendee: None,
                    chat_id: Some(summary.chat.id),
                });
            }
        }

        let fresh: Vec<Attendee> = self
            .get_user_matches(event_id, user_id)
            .await
            .into_iter()
            .filter(|a| !chat_user_ids.contains(a.resolved_user_id()))
            .collect();
        let fresh_profiles =
            join_all(fresh.iter().map(|a| self.get_user_by_id(a.resolved_user_id()))).await;

        for (attendee, profile) in fresh.into_iter().zip(fresh_profiles) {
            if let Some(user) = profile {
                inbox.matches.push(PendingMatch {
                    user_id: attendee.resolved_user_id().to_string(),
                    user,
                    attendee: Some(attendee),
                    chat_id: None,
                });
            }
        }
        inbox.matches.extend(quiet);
        inbox
    }

    /// The chat to open for a pending match: its existing chat when there is
    /// one, otherwise a newly created chat.
    pub async fn open_pending_match(
        &self,
        pending: &PendingMatch,
        user_id: &str,
        event: &EventMeta,
    ) -> Result<String> {
        if let Some(chat_id) = &pending.chat_id {
            return Ok(chat_id.clone());
        }
        self.get_or_create_chat(user_id, &pending.user_id, &event.id, Some(event))
            .await
    }
}

/// Fold summaries sharing a [`ChatKey`] into the most recently active one,
/// summing unread counts. Groups keep first-seen order.
fn merge_duplicates(summaries: impl IntoIterator<Item = ChatSummary>) -> Vec<ChatSummary> {
    let mut index: HashMap<ChatKey, usize> = HashMap::new();
    let mut groups: Vec<Vec<ChatSummary>> = Vec::new();

    for summary in summaries {
        let key = summary.chat.key();
        match index.get(&key) {
            Some(&i) => groups[i].push(summary),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![summary]);
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|mut group| {
            // Stable, so the first-seen document wins ties.
            group.sort_by(|a, b| b.chat.last_activity().cmp(&a.chat.last_activity()));
            let unread_count = group.iter().map(|s| s.unread_count).sum();
            let mut rest = group.into_iter();
            let mut canonical = rest.next()?;
            canonical.merged_from = rest.map(|s| s.chat.id).collect();
            if !canonical.merged_from.is_empty() {
                debug!(
                    chat_id = %canonical.chat.id,
                    merged = ?canonical.merged_from,
                    "merged duplicate chats"
                );
            }
            canonical.unread_count = unread_count;
            Some(canonical)
        })
        .collect()
}
