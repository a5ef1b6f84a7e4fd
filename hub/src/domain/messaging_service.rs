//! Simulated administrator inbox.
//!
//! Every change is persisted under
//! [`StorageKey::AdminMessages`](super::session_store::StorageKey) before it
//! is published. Questions and urgent messages get a canned answer after a
//! jittered delay.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use super::auth_service::AuthService;
use super::messaging::{
    AdminMessage, MessageDraft, MessageStatus, MessageTemplate, MessagingError, MessagingStats,
};
use super::runtime::ServiceRuntime;
use super::session_store::{SessionStore, StorageKey};

/// Delays used by the simulated inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagingSettings {
    /// Delay before a sent message lands.
    pub send_latency: Duration,
    /// Window the automatic answer delay is drawn from.
    pub reply_delay: RangeInclusive<Duration>,
}

impl Default for MessagingSettings {
    fn default() -> Self {
        Self {
            send_latency: Duration::from_millis(1000),
            reply_delay: Duration::from_secs(5)..=Duration::from_secs(15),
        }
    }
}

/// Messages from survivors to the administrators.
#[derive(Debug)]
pub struct MessagingService {
    auth: Arc<AuthService>,
    store: SessionStore,
    runtime: ServiceRuntime,
    settings: MessagingSettings,
    next_id: AtomicU64,
    messages: watch::Sender<Vec<AdminMessage>>,
}

impl MessagingService {
    /// Load persisted messages and start serving.
    pub fn start(
        auth: Arc<AuthService>,
        store: SessionStore,
        runtime: ServiceRuntime,
        settings: MessagingSettings,
    ) -> Arc<Self> {
        let messages: Vec<AdminMessage> = store.load(StorageKey::AdminMessages).unwrap_or_default();
        let next_id = messages.iter().map(|m| m.id).max().map_or(1, |id| id + 1);
        info!(loaded = messages.len(), "messaging service started");
        let (messages, _) = watch::channel(messages);
        Arc::new(Self {
            auth,
            store,
            runtime,
            settings,
            next_id: AtomicU64::new(next_id),
            messages,
        })
    }

    /// Receive every message and each later change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<AdminMessage>> {
        self.messages.subscribe()
    }

    /// Every stored message.
    #[must_use]
    pub fn all_messages(&self) -> Vec<AdminMessage> {
        self.messages.borrow().clone()
    }

    /// Messages sent by the logged-in survivor; empty when anonymous.
    #[must_use]
    pub fn messages_for_current_user(&self) -> Vec<AdminMessage> {
        let Some(user) = self.auth.current_user() else {
            return Vec::new();
        };
        self.messages
            .borrow()
            .iter()
            .filter(|message| &message.email == user.email())
            .cloned()
            .collect()
    }

    /// Statistics over [`messages_for_current_user`](Self::messages_for_current_user).
    #[must_use]
    pub fn stats(&self) -> MessagingStats {
        MessagingStats::of(&self.messages_for_current_user())
    }

    /// Canned message starting points.
    #[must_use]
    pub fn templates(&self) -> [MessageTemplate; 5] {
        MessageTemplate::ALL
    }

    /// Send a message as the logged-in survivor.
    ///
    /// Waits the send latency, persists, publishes, then schedules the
    /// automatic answer when the message qualifies. Must run inside a Tokio
    /// runtime.
    pub async fn send(self: &Arc<Self>, draft: MessageDraft) -> Result<AdminMessage, MessagingError> {
        let user = self
            .auth
            .current_user()
            .ok_or(MessagingError::NotAuthenticated)?;
        let subject = non_blank(&draft.subject, "subject")?;
        let body = non_blank(&draft.body, "body")?;

        let message = AdminMessage {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            author: user.name().as_ref().to_owned(),
            email: user.email().clone(),
            subject,
            body,
            category: draft.category,
            priority: draft.priority,
            sent_at: self.runtime.clock.utc(),
            status: MessageStatus::Sent,
            reply: None,
            replied_at: None,
        };

        self.runtime.sleeper.sleep(self.settings.send_latency).await;
        self.commit(|messages| {
            messages.push(message.clone());
            Ok(())
        })?;
        info!(
            id = message.id,
            category = %message.category,
            priority = %message.priority,
            "admin message sent"
        );

        if message.wants_auto_reply() {
            let delay = self.runtime.chance.delay_within(self.settings.reply_delay.clone());
            let inbox = Arc::clone(self);
            let id = message.id;
            tokio::spawn(async move {
                inbox.runtime.sleeper.sleep(delay).await;
                inbox.auto_reply(id);
            });
        }
        Ok(message)
    }

    /// Mark a sent message as read.
    pub fn mark_read(&self, id: u64) -> Result<AdminMessage, MessagingError> {
        self.transition(id, |message| message.move_to(MessageStatus::Read))
    }

    /// Close a message.
    pub fn close(&self, id: u64) -> Result<AdminMessage, MessagingError> {
        self.transition(id, |message| message.move_to(MessageStatus::Closed))
    }

    /// Answer a message with `reply`, stamping the reply time.
    pub fn answer(&self, id: u64, reply: &str) -> Result<AdminMessage, MessagingError> {
        let reply = non_blank(reply, "reply")?;
        let now = self.runtime.clock.utc();
        self.transition(id, |message| {
            message.move_to(MessageStatus::Answered)?;
            message.reply = Some(reply);
            message.replied_at = Some(now);
            Ok(())
        })
    }

    fn auto_reply(&self, id: u64) {
        let category = self
            .messages
            .borrow()
            .iter()
            .find(|message| message.id == id)
            .map(|message| message.category);
        let Some(category) = category else {
            warn!(id, "auto-reply target vanished");
            return;
        };
        match self.answer(id, category.canned_reply()) {
            Ok(_) => info!(id, "admin message auto-answered"),
            Err(err) => warn!(id, error = %err, "auto-reply skipped"),
        }
    }

    fn transition(
        &self,
        id: u64,
        change: impl FnOnce(&mut AdminMessage) -> Result<(), MessagingError>,
    ) -> Result<AdminMessage, MessagingError> {
        let mut updated = None;
        self.commit(|messages| {
            let message = messages
                .iter_mut()
                .find(|message| message.id == id)
                .ok_or(MessagingError::NotFound { id })?;
            change(message)?;
            updated = Some(message.clone());
            Ok(())
        })?;
        updated.ok_or(MessagingError::NotFound { id })
    }

    /// Apply `change` to a copy of the list, persist it, then publish.
    ///
    /// The watch lock is held throughout so concurrent changes serialise.
    fn commit(
        &self,
        change: impl FnOnce(&mut Vec<AdminMessage>) -> Result<(), MessagingError>,
    ) -> Result<(), MessagingError> {
        let mut outcome = Ok(());
        self.messages.send_if_modified(|messages| {
            let mut next = messages.clone();
            if let Err(err) = change(&mut next) {
                outcome = Err(err);
                return false;
            }
            if let Err(err) = self.store.save(StorageKey::AdminMessages, &next) {
                outcome = Err(MessagingError::from(err));
                return false;
            }
            *messages = next;
            true
        });
        outcome
    }
}

fn non_blank(text: &str, field: &'static str) -> Result<String, MessagingError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MessagingError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}
