//! Message notifications for the signed-in user.
//!
//! A [`NotificationSession`] polls the newest messages of the log and turns
//! the ones addressed to its user into [`Notification`]s on an mpsc channel.
//! The session owns its polling task; stopping or dropping the session ends
//! it.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use chrono::Utc;
use outofoffice_shared::constants::{DEFAULT_NOTIFICATION_BODY, UNKNOWN_SENDER};
use outofoffice_store::Message;
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::{degrade, Client};

/// A notification ready to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Sender's name, email, or a generic label.
    pub title: String,
    /// Message preview.
    pub body: String,
    pub chat_id: String,
    pub sender_id: String,
}

/// Bounded set of message ids already handled. The oldest id is evicted
/// once capacity is reached.
#[derive(Debug)]
struct ProcessedIds {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl ProcessedIds {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn insert(&mut self, id: &str) {
        if self.capacity == 0 || !self.ids.insert(id.to_string()) {
            return;
        }
        self.order.push_back(id.to_string());
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
    }

    fn clear(&mut self) {
        self.order.clear();
        self.ids.clear();
    }
}

#[derive(Debug)]
struct SessionState {
    user_id: Option<String>,
    current_chat: Option<String>,
    processed: ProcessedIds,
}

/// Watches the message log on behalf of one user.
pub struct NotificationSession {
    client: Client,
    sink: mpsc::Sender<Notification>,
    state: Arc<Mutex<SessionState>>,
    task: Option<JoinHandle<()>>,
}

impl NotificationSession {
    pub fn new(client: Client, sink: mpsc::Sender<Notification>) -> Self {
        let settings = &client.config().notifications;
        // Ids still inside the polled window must never be evicted.
        let capacity = settings.processed_capacity.max(settings.recent_limit);
        Self {
            client,
            sink,
            state: Arc::new(Mutex::new(SessionState {
                user_id: None,
                current_chat: None,
                processed: ProcessedIds::new(capacity),
            })),
            task: None,
        }
    }

    /// Start polling for `user_id`. Calling again for the same user while
    /// running does nothing; calling for another user restarts the session.
    pub async fn start(&mut self, user_id: &str) {
        if self.is_running() && self.user_id().await.as_deref() == Some(user_id) {
            debug!(user_id, "notification session already running");
            return;
        }
        self.stop().await;

        {
            let mut state = self.state.lock().await;
            state.user_id = Some(user_id.to_string());
        }

        let client = self.client.clone();
        let sink = self.sink.clone();
        let state = self.state.clone();
        let poll_interval = client.config().notifications.poll_interval;

        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                poll(&client, &sink, &state).await;
                if sink.is_closed() {
                    debug!("notification receiver dropped, stopping poll loop");
                    break;
                }
            }
        }));

        info!(user_id, ?poll_interval, "notification session started");
    }

    /// Stop polling and forget the user, the current chat and every
    /// processed id.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        let mut state = self.state.lock().await;
        if let Some(user_id) = state.user_id.take() {
            info!(%user_id, "notification session stopped");
        }
        state.current_chat = None;
        state.processed.clear();
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub async fn user_id(&self) -> Option<String> {
        self.state.lock().await.user_id.clone()
    }

    /// Suppress notifications for the chat the user is looking at.
    pub async fn set_current_chat(&self, chat_id: &str) {
        self.state.lock().await.current_chat = Some(chat_id.to_string());
    }

    pub async fn clear_current_chat(&self) {
        self.state.lock().await.current_chat = None;
    }

    /// Run one poll now. Returns how many notifications were emitted.
    pub async fn poll_once(&self) -> usize {
        poll(&self.client, &self.sink, &self.state).await
    }
}

impl Drop for NotificationSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn poll(
    client: &Client,
    sink: &mpsc::Sender<Notification>,
    state: &Mutex<SessionState>,
) -> usize {
    let Some(user_id) = state.lock().await.user_id.clone() else {
        return 0;
    };
    let settings = &client.config().notifications;

    // Refreshed every pass, so chats created after start are covered.
    let chat_ids: HashSet<String> = client
        .get_user_chats(&user_id)
        .await
        .into_iter()
        .flat_map(|summary| std::iter::once(summary.chat.id).chain(summary.merged_from))
        .collect();
    if chat_ids.is_empty() {
        return 0;
    }

    let recent = degrade(
        client.db.fetch_recent_messages(settings.recent_limit).await,
        "fetch_recent_messages",
    );
    let now = Utc::now();

    let pending: Vec<Message> = {
        let mut state = state.lock().await;
        if state.user_id.as_deref() != Some(user_id.as_str()) {
            return 0;
        }

        let mut pending = Vec::new();
        // Oldest first, so notifications arrive in send order.
        for message in recent.into_iter().rev() {
            if state.processed.contains(&message.id) {
                continue;
            }
            let age = (now - message.timestamp).to_std().unwrap_or_default();
            if age > settings.recent_window
                || !chat_ids.contains(&message.chat_id)
                || !message.is_unread_for(&user_id)
            {
                continue;
            }

            state.processed.insert(&message.id);
            if state.current_chat.as_deref() == Some(message.chat_id.as_str()) {
                debug!(chat_id = %message.chat_id, "message in open chat, not notifying");
                continue;
            }
            pending.push(message);
        }
        pending
    };

    let mut emitted = 0;
    for message in pending {
        let title = client
            .get_user_by_id(&message.sender_id)
            .await
            .and_then(|sender| sender.display_name().map(str::to_string))
            .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

        let notification = Notification {
            title,
            body: preview(&message.text, settings.preview_chars),
            chat_id: message.chat_id,
            sender_id: message.sender_id,
        };

        if sink.send(notification).await.is_err() {
            break;
        }
        emitted += 1;
    }

    if emitted > 0 {
        debug!(%user_id, emitted, "notifications emitted");
    }
    emitted
}

/// Cut `text` to `max_chars` characters, marking the cut with `...`.
fn preview(text: &str, max_chars: usize) -> String {
    if text.is_empty() {
        return DEFAULT_NOTIFICATION_BODY.to_string();
    }
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Duration as TimeDelta;
    use outofoffice_store::{DatabaseInfo, User};

    use super::*;
    use crate::{CoreConfig, NotificationConfig};

    async fn setup() -> (Client, String) {
        let db = DatabaseInfo::Reference.connect().await.unwrap();
        let client = Client::new(db, CoreConfig::default());
        client
            .create_user(&User {
                id: "7".into(),
                email: "ana@example.com".into(),
                name: "Ana".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let chat_id = client.get_or_create_chat("42", "7", "E1", None).await.unwrap();
        (client, chat_id)
    }

    async fn session_for(client: &Client, user_id: &str) -> (NotificationSession, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(16);
        let session = NotificationSession::new(client.clone(), tx);
        session.state.lock().await.user_id = Some(user_id.to_string());
        (session, rx)
    }

    #[tokio::test]
    async fn notifies_incoming_once() {
        let (client, chat_id) = setup().await;
        let (session, mut rx) = session_for(&client, "42").await;

        client.send_message(&chat_id, "7", "hello there").await.unwrap();
        client.send_message(&chat_id, "42", "my own").await.unwrap();

        assert_eq!(session.poll_once().await, 1);
        let n = rx.try_recv().unwrap();
        assert_eq!(
            n,
            Notification {
                title: "Ana".into(),
                body: "hello there".into(),
                chat_id: chat_id.clone(),
                sender_id: "7".into(),
            }
        );

        // Already processed.
        assert_eq!(session.poll_once().await, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn skips_read_old_foreign_and_open_chat() {
        let (client, chat_id) = setup().await;
        let (session, mut rx) = session_for(&client, "42").await;

        // Read already.
        client.send_message(&chat_id, "7", "seen").await.unwrap();
        client.mark_messages_as_read(&chat_id, "42").await.unwrap();

        // Too old.
        client
            .database()
            .insert_message(&Message {
                id: "old".into(),
                chat_id: chat_id.clone(),
                sender_id: "7".into(),
                text: "ancient".into(),
                timestamp: Utc::now() - TimeDelta::minutes(10),
                read: false,
            })
            .await
            .unwrap();

        // Someone else's chat.
        let foreign = client.get_or_create_chat("7", "8", "E1", None).await.unwrap();
        client.send_message(&foreign, "8", "not yours").await.unwrap();

        assert_eq!(session.poll_once().await, 0);

        // Open chat: consumed without notifying, even after leaving it.
        session.set_current_chat(&chat_id).await;
        client.send_message(&chat_id, "7", "while open").await.unwrap();
        assert_eq!(session.poll_once().await, 0);
        session.clear_current_chat().await;
        assert_eq!(session.poll_once().await, 0);

        client.send_message(&chat_id, "7", "after").await.unwrap();
        assert_eq!(session.poll_once().await, 1);
        assert_eq!(rx.try_recv().unwrap().body, "after");
    }

    #[tokio::test]
    async fn unknown_sender_and_long_body() {
        let (client, _) = setup().await;
        let (session, mut rx) = session_for(&client, "42").await;
        let chat_id = client.get_or_create_chat("42", "99", "E2", None).await.unwrap();

        let long = "x".repeat(150);
        client.send_message(&chat_id, "99", &long).await.unwrap();

        assert_eq!(session.poll_once().await, 1);
        let n = rx.try_recv().unwrap();
        assert_eq!(n.title, UNKNOWN_SENDER);
        assert_eq!(n.body, format!("{}...", "x".repeat(100)));
    }

    #[tokio::test]
    async fn message_without_text_uses_default_body() {
        let (client, chat_id) = setup().await;
        let (session, mut rx) = session_for(&client, "42").await;

        client
            .database()
            .insert_message(&Message {
                id: "legacy".into(),
                chat_id: chat_id.clone(),
                sender_id: "7".into(),
                text: String::new(),
                timestamp: Utc::now(),
                read: false,
            })
            .await
            .unwrap();

        assert_eq!(session.poll_once().await, 1);
        let n = rx.try_recv().unwrap();
        assert_eq!(n.title, "Ana");
        assert_eq!(n.body, DEFAULT_NOTIFICATION_BODY);
    }

    #[tokio::test]
    async fn idle_without_user() {
        let (client, chat_id) = setup().await;
        let (tx, _rx) = mpsc::channel(4);
        let session = NotificationSession::new(client.clone(), tx);

        client.send_message(&chat_id, "7", "hello").await.unwrap();
        assert_eq!(session.poll_once().await, 0);
    }

    #[tokio::test]
    async fn background_task_delivers_and_stops() {
        let db = DatabaseInfo::Reference.connect().await.unwrap();
        let config = CoreConfig {
            notifications: NotificationConfig {
                poll_interval: Duration::from_millis(20),
                ..Default::default()
            },
            ..Default::default()
        };
        let client = Client::new(db, config);
        let chat_id = client.get_or_create_chat("42", "7", "E1", None).await.unwrap();

        let (tx, mut rx) = mpsc::channel(16);
        let mut session = NotificationSession::new(client.clone(), tx);
        session.start("42").await;
        session.start("42").await;
        assert!(session.is_running());
        assert_eq!(session.user_id().await.as_deref(), Some("42"));

        client.send_message(&chat_id, "7", "ping").await.unwrap();
        let n = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n.body, "ping");

        session.stop().await;
        assert!(session.user_id().await.is_none());

        client.send_message(&chat_id, "7", "after stop").await.unwrap();
        let late = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(late.is_err());
    }

    #[tokio::test]
    async fn window_larger_than_processed_capacity_notifies_once() {
        let db = DatabaseInfo::Reference.connect().await.unwrap();
        let config = CoreConfig {
            notifications: NotificationConfig {
                recent_limit: 200,
                ..Default::default()
            },
            ..Default::default()
        };
        let client = Client::new(db, config);
        let chat_id = client.get_or_create_chat("42", "7", "E1", None).await.unwrap();
        for i in 0..150 {
            client.send_message(&chat_id, "7", &format!("msg {i}")).await.unwrap();
        }

        let (tx, mut rx) = mpsc::channel(256);
        let session = NotificationSession::new(client.clone(), tx);
        session.state.lock().await.user_id = Some("42".to_string());

        assert_eq!(session.poll_once().await, 150);
        assert_eq!(session.poll_once().await, 0);

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 150);
    }

    #[test]
    fn processed_ids_evict_oldest() {
        let mut processed = ProcessedIds::new(2);
        processed.insert("a");
        processed.insert("b");
        processed.insert("b");
        processed.insert("c");
        assert!(!processed.contains("a"));
        assert!(processed.contains("b"));
        assert!(processed.contains("c"));
    }

    #[test]
    fn preview_counts_characters() {
        assert_eq!(preview("héllo", 3), "hél...");
        assert_eq!(preview("hi", 3), "hi");
        assert_eq!(preview("", 3), DEFAULT_NOTIFICATION_BODY);
    }
}
