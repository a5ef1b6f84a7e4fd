//! Simulated survivor chat.
//!
//! Posts are attributed to the logged-in survivor. After a post, a persona
//! sometimes answers on a jittered timer to make the room feel alive.
//! Replies are cosmetic and may land out of strict real-time order.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::watch;
use tracing::debug;

use super::auth_service::AuthService;
use super::chat::{ChatMessage, MessageKind, OnlineUser, Persona, Presence};
use super::runtime::ServiceRuntime;

/// Reply simulation knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    /// Chance that a post gets a persona reply.
    pub reply_probability: f64,
    /// Window the reply delay is drawn from.
    pub reply_delay: RangeInclusive<Duration>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reply_probability: 0.3,
            reply_delay: Duration::from_secs(2)..=Duration::from_secs(5),
        }
    }
}

/// Public room, private conversations and the online list.
#[derive(Debug)]
pub struct ChatService {
    auth: Arc<AuthService>,
    runtime: ServiceRuntime,
    settings: ChatSettings,
    next_message_id: AtomicU64,
    next_user_id: AtomicU64,
    messages: watch::Sender<Vec<ChatMessage>>,
    online: watch::Sender<Vec<OnlineUser>>,
    private: Mutex<HashMap<u64, Vec<ChatMessage>>>,
}

impl ChatService {
    /// Open the room with its welcome messages and resident personas.
    pub fn start(auth: Arc<AuthService>, runtime: ServiceRuntime, settings: ChatSettings) -> Arc<Self> {
        let now = runtime.clock.utc();
        let messages = welcome_messages(now);
        let online = resident_personas(now);
        let next_message_id = AtomicU64::new(messages.last().map_or(1, |m| m.id + 1));
        let next_user_id = AtomicU64::new(online.last().map_or(1, |u| u.id + 1));
        let (messages, _) = watch::channel(messages);
        let (online, _) = watch::channel(online);
        Arc::new(Self {
            auth,
            runtime,
            settings,
            next_message_id,
            next_user_id,
            messages,
            online,
            private: Mutex::new(HashMap::new()),
        })
    }

    /// Receive the room history and every later change.
    pub fn subscribe_messages(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.messages.subscribe()
    }

    /// Receive the online list and every later change.
    pub fn subscribe_online_users(&self) -> watch::Receiver<Vec<OnlineUser>> {
        self.online.subscribe()
    }

    /// Snapshot of the room.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    /// Snapshot of the online list.
    #[must_use]
    pub fn online_users(&self) -> Vec<OnlineUser> {
        self.online.borrow().clone()
    }

    /// Post to the room as the logged-in survivor.
    ///
    /// Returns `None` without a session or when `text` is blank. Must run
    /// inside a Tokio runtime because a reply may be scheduled.
    pub fn post_message(self: &Arc<Self>, text: &str) -> Option<ChatMessage> {
        let message = self.append_to_room(self.compose(text)?);
        debug!(id = message.id, author = %message.author, "chat message posted");

        if self.runtime.chance.happens(self.settings.reply_probability) {
            let delay = self.runtime.chance.delay_within(self.settings.reply_delay.clone());
            let chat = Arc::clone(self);
            tokio::spawn(async move {
                chat.runtime.sleeper.sleep(delay).await;
                chat.post_persona_reply();
            });
        }
        Some(message)
    }

    /// Send a private line to the online user `user_id`.
    ///
    /// Same guards as [`post_message`](Self::post_message); no replies.
    pub fn post_private_message(&self, user_id: u64, text: &str) -> Option<ChatMessage> {
        let mut message = self.compose(text)?;
        let mut private = self.private.lock().unwrap_or_else(PoisonError::into_inner);
        message.id = self.next_message_id.fetch_add(1, Ordering::Relaxed);
        private.entry(user_id).or_default().push(message.clone());
        Some(message)
    }

    /// Conversation with `user_id`, oldest first.
    #[must_use]
    pub fn private_messages(&self, user_id: u64) -> Vec<ChatMessage> {
        self.private
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Set the logged-in survivor's presence, joining the list if needed.
    ///
    /// Returns `false` without a session.
    pub fn update_presence(&self, presence: Presence) -> bool {
        let Some(user) = self.auth.current_user() else {
            return false;
        };
        let name = user.name().as_ref().to_owned();
        let now = self.runtime.clock.utc();
        self.online.send_modify(|online| {
            if let Some(entry) = online.iter_mut().find(|entry| entry.name == name) {
                entry.presence = presence;
                entry.last_active = now;
            } else {
                online.push(OnlineUser {
                    id: self.next_user_id.fetch_add(1, Ordering::Relaxed),
                    name,
                    presence,
                    last_active: now,
                });
            }
        });
        true
    }

    /// Number `message` and append it while holding the room lock, so room
    /// ids always ascend in list order.
    fn append_to_room(&self, mut message: ChatMessage) -> ChatMessage {
        self.messages.send_modify(|messages| {
            message.id = self.next_message_id.fetch_add(1, Ordering::Relaxed);
            messages.push(message.clone());
        });
        message
    }

    /// Unnumbered line from the logged-in survivor.
    fn compose(&self, text: &str) -> Option<ChatMessage> {
        let user = self.auth.current_user()?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(ChatMessage {
            id: 0,
            author: user.name().as_ref().to_owned(),
            text: text.to_owned(),
            sent_at: self.runtime.clock.utc(),
            kind: MessageKind::User,
        })
    }

    fn post_persona_reply(&self) {
        let index = self.runtime.chance.pick_index(Persona::REPLIERS.len());
        let persona = Persona::REPLIERS
            .get(index)
            .copied()
            .unwrap_or(Persona::System);
        let message = self.append_to_room(ChatMessage {
            id: 0,
            author: persona.handle().to_owned(),
            text: persona.reply().to_owned(),
            sent_at: self.runtime.clock.utc(),
            kind: persona.kind(),
        });
        debug!(id = message.id, author = %message.author, "persona replied");
    }
}

fn minutes_before(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    now - TimeDelta::minutes(minutes)
}

fn welcome_messages(now: DateTime<Utc>) -> Vec<ChatMessage> {
    [
        (
            Persona::System,
            "Welcome to the survivors' chat! Share your strategies and experiences here.",
            5,
        ),
        (
            Persona::Joel,
            "Always check your supplies before heading out on patrol.",
            4,
        ),
        (
            Persona::Ellie,
            "Has anyone seen infected near the river? I heard strange noises last night.",
            3,
        ),
        (
            Persona::Tommy,
            "Area is clear for now. Keep your guard up.",
            2,
        ),
    ]
    .into_iter()
    .zip(1_u64..)
    .map(|((persona, text, minutes), id)| ChatMessage {
        id,
        author: persona.handle().to_owned(),
        text: text.to_owned(),
        sent_at: minutes_before(now, minutes),
        kind: persona.kind(),
    })
    .collect()
}

fn resident_personas(now: DateTime<Utc>) -> Vec<OnlineUser> {
    [
        (Persona::Joel, Presence::Online, now),
        (Persona::Ellie, Presence::Online, now),
        (Persona::Tommy, Presence::Away, minutes_before(now, 5)),
        (Persona::Dina, Presence::Online, now),
    ]
    .into_iter()
    .zip(1_u64..)
    .map(|((persona, presence, last_active), id)| OnlineUser {
        id,
        name: persona.handle().to_owned(),
        presence,
        last_active,
    })
    .collect()
}
