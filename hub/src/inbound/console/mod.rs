//! Line-oriented console adapter.
//!
//! Reads commands, hands them to the domain services and writes plain-text
//! replies. Chat lines from other survivors and administrator answers that
//! arrive while the console is idle are written as they happen.

mod command;
mod render;

use std::collections::HashSet;
use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tracing::debug;

use crate::domain::{
    AdminMessage, AuthService, CharacterService, ChatMessage, ChatService, MapError, MapService,
    MessageKind, MessageStatus, MessagingError, MessagingService, PasswordAssessment,
    TimelineService,
};

pub use command::{Command, CommandParseError, USAGE};

/// Outcome of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to show the survivor.
    Text(String),
    /// Nothing to show.
    Silent,
    /// End the session.
    Quit,
}

/// The services a console session drives.
#[derive(Debug, Clone)]
pub struct Console {
    auth: Arc<AuthService>,
    chat: Arc<ChatService>,
    messaging: Arc<MessagingService>,
    map: Arc<MapService>,
    characters: Arc<CharacterService>,
    timeline: Arc<TimelineService>,
}

impl Console {
    /// Bundle the services.
    pub fn new(
        auth: Arc<AuthService>,
        chat: Arc<ChatService>,
        messaging: Arc<MessagingService>,
        map: Arc<MapService>,
        characters: Arc<CharacterService>,
        timeline: Arc<TimelineService>,
    ) -> Self {
        Self {
            auth,
            chat,
            messaging,
            map,
            characters,
            timeline,
        }
    }

    /// Parse and execute one line.
    pub async fn respond(&self, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Reply::Silent,
            Err(err) => Reply::Text(format!("error: {err}")),
        }
    }

    /// Execute a parsed command.
    pub async fn execute(&self, command: Command) -> Reply {
        let text = match command {
            Command::Help => render::help(),
            Command::Quit => return Reply::Quit,
            Command::Register(form) => match self.auth.submit_registration(&form).await {
                Ok(user) => format!("welcome to Jackson, {}", user.name()),
                Err(err) => render::auth_error(&err),
            },
            Command::Login { email, password } => {
                match self.auth.submit_login(&email, &password).await {
                    Ok(user) => format!("welcome back, {}", user.name()),
                    Err(err) => render::auth_error(&err),
                }
            }
            Command::Logout => {
                self.auth.logout();
                "logged out".to_owned()
            }
            Command::WhoAmI => self
                .auth
                .current_user()
                .map_or_else(|| "not logged in".to_owned(), |user| render::user(&user)),
            Command::Countries => render::countries(),
            Command::Strength(password) => render::strength(&PasswordAssessment::of(&password)),
            Command::Say(text) => match self.chat.post_message(&text) {
                Some(message) => render::chat_line(&message),
                None => "log in to chat".to_owned(),
            },
            Command::Dm { user_id, text } => {
                match self.chat.post_private_message(user_id, &text) {
                    Some(message) => format!("to #{user_id}: {}", message.text),
                    None => "log in and write something to send a private message".to_owned(),
                }
            }
            Command::Private { user_id } => {
                render::chat_log(&self.chat.private_messages(user_id))
            }
            Command::Presence(presence) => {
                if self.chat.update_presence(presence) {
                    format!("you are now {presence}")
                } else {
                    "log in to set your presence".to_owned()
                }
            }
            Command::Chat => render::chat_log(&self.chat.messages()),
            Command::Online => render::online(&self.chat.online_users()),
            Command::Contact(draft) => match self.messaging.send(draft).await {
                Ok(message) => format!("sent {}", render::admin_message(&message)),
                Err(err) => format!("error: {err}"),
            },
            Command::Inbox => render::inbox(&self.messaging.messages_for_current_user()),
            Command::Read(id) => self.own_message(id, |messaging| messaging.mark_read(id)),
            Command::Close(id) => self.own_message(id, |messaging| messaging.close(id)),
            Command::Stats => render::stats(&self.messaging.stats()),
            Command::Templates => render::templates(&self.messaging.templates()),
            Command::Map(kind) => {
                let locations = match kind {
                    Some(kind) => self.map.locations_of_kind(kind),
                    None => self.map.locations(),
                };
                render::locations(&locations, &self.map.favourites())
            }
            Command::Tips(category) => {
                let tips = match category {
                    Some(category) => self.map.tips_in_category(category),
                    None => self.map.tips().iter().collect(),
                };
                render::tips(&tips, &self.map.favourites())
            }
            Command::Discover(id) => {
                if self.map.discover(&id) {
                    format!("{id} discovered")
                } else {
                    format!("error: unknown location '{id}'")
                }
            }
            Command::Favourite(id) => favourite_reply(&id, self.map.toggle_location_favourite(&id)),
            Command::TipFavourite(id) => favourite_reply(&id, self.map.toggle_tip_favourite(&id)),
            Command::Search(term) => render::locations(&self.map.search(&term), &self.map.favourites()),
            Command::Characters(status) => {
                let characters = match status {
                    Some(status) => self.characters.with_status(status),
                    None => self.characters.characters().iter().collect(),
                };
                render::characters(&characters)
            }
            Command::Character(id) => self
                .characters
                .character(id)
                .map_or_else(|| format!("error: character {id} not found"), render::character),
            Command::FindCharacter(term) => render::characters(&self.characters.search(&term)),
            Command::Timeline(arc) => {
                let events = match arc {
                    Some(arc) => self.timeline.in_arc(arc),
                    None => self.timeline.events().iter().collect(),
                };
                render::events(&events)
            }
            Command::Events(importance) => render::events(&self.timeline.of_importance(importance)),
            Command::Event(id) => self
                .timeline
                .event(id)
                .map_or_else(|| format!("error: event {id} not found"), render::event),
            Command::FindEvent(term) => render::events(&self.timeline.search(&term)),
        };
        Reply::Text(text)
    }

    /// Apply a lifecycle change to one of the current survivor's messages.
    fn own_message(
        &self,
        id: u64,
        change: impl FnOnce(&MessagingService) -> Result<AdminMessage, MessagingError>,
    ) -> String {
        let owned = self
            .messaging
            .messages_for_current_user()
            .iter()
            .any(|message| message.id == id);
        if !owned {
            return format!("error: message {id} not found");
        }
        match change(&self.messaging) {
            Ok(message) => render::admin_message(&message),
            Err(err) => format!("error: {err}"),
        }
    }

    /// Serve commands from `input` until `quit` or end of input.
    ///
    /// Chat lines posted by others and administrator answers to the
    /// survivor's messages are written between commands, including those
    /// that arrived while a command was still running.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut chat = self.chat.subscribe_messages();
        let mut inbox = self.messaging.subscribe();
        let mut last_seen = chat.borrow_and_update().last().map_or(0, |m| m.id);
        let mut answered: HashSet<u64> = inbox
            .borrow_and_update()
            .iter()
            .filter(|message| message.status == MessageStatus::Answered)
            .map(|message| message.id)
            .collect();

        write_block(&mut output, "survivor hub ready, type 'help' for commands").await?;
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match self.respond(&line).await {
                        Reply::Quit => {
                            write_block(&mut output, "stay safe out there").await?;
                            break;
                        }
                        Reply::Text(text) => write_block(&mut output, &text).await?,
                        Reply::Silent => {}
                    }
                    self.deliver_chat(&mut chat, &mut last_seen, &mut output).await?;
                    self.deliver_answers(&mut inbox, &mut answered, &mut output).await?;
                }
                Ok(()) = chat.changed() => {
                    self.deliver_chat(&mut chat, &mut last_seen, &mut output).await?;
                }
                Ok(()) = inbox.changed() => {
                    self.deliver_answers(&mut inbox, &mut answered, &mut output).await?;
                }
            }
        }
        output.flush().await
    }

    /// Write room lines newer than `last_seen`, skipping the survivor's own
    /// posts since `say` already echoed them.
    async fn deliver_chat<W: AsyncWrite + Unpin>(
        &self,
        chat: &mut watch::Receiver<Vec<ChatMessage>>,
        last_seen: &mut u64,
        output: &mut W,
    ) -> io::Result<()> {
        let fresh: Vec<ChatMessage> = chat
            .borrow_and_update()
            .iter()
            .filter(|message| message.id > *last_seen)
            .cloned()
            .collect();
        let Some(newest) = fresh.iter().map(|message| message.id).max() else {
            return Ok(());
        };
        *last_seen = newest;

        let own = self
            .auth
            .current_user()
            .map(|user| user.name().as_ref().to_owned());
        let others: Vec<ChatMessage> = fresh
            .into_iter()
            .filter(|message| {
                message.kind != MessageKind::User || own.as_deref() != Some(message.author.as_str())
            })
            .collect();
        if others.is_empty() {
            return Ok(());
        }
        debug!(count = others.len(), "chat lines delivered");
        write_block(output, &render::chat_log(&others)).await
    }

    /// Write the survivor's messages that gained an answer since the last
    /// look. Answers on other accounts are only remembered.
    async fn deliver_answers<W: AsyncWrite + Unpin>(
        &self,
        inbox: &mut watch::Receiver<Vec<AdminMessage>>,
        answered: &mut HashSet<u64>,
        output: &mut W,
    ) -> io::Result<()> {
        let own = self.auth.current_user();
        let fresh: Vec<AdminMessage> = inbox
            .borrow_and_update()
            .iter()
            .filter(|message| message.status == MessageStatus::Answered)
            .filter(|message| answered.insert(message.id))
            .filter(|message| {
                own.as_ref()
                    .is_some_and(|user| user.email() == &message.email)
            })
            .cloned()
            .collect();
        for message in &fresh {
            write_block(output, &render::admin_message(message)).await?;
        }
        Ok(())
    }
}

fn favourite_reply(id: &str, outcome: Result<bool, MapError>) -> String {
    match outcome {
        Ok(true) => format!("{id} added to favourites"),
        Ok(false) => format!("{id} removed from favourites"),
        Err(err) => format!("error: {err}"),
    }
}

async fn write_block<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

#[cfg(test)]
mod tests;
