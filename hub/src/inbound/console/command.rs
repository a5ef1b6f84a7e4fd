//! Console command grammar.
//!
//! One command per line: a keyword followed by its arguments. Free text
//! arguments run to the end of the line; multi-part forms separate their
//! parts with `|`.

use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::{
    Category, CharacterStatus, Importance, LocationKind, MessageDraft, ParsePresenceError,
    Presence, Priority, RegistrationForm, StoryArc, TipCategory, UnknownVariant,
};

/// A parsed console command.
#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Register(RegistrationForm),
    Login {
        email: String,
        password: Zeroizing<String>,
    },
    Logout,
    WhoAmI,
    Countries,
    Strength(Zeroizing<String>),
    Say(String),
    Dm {
        user_id: u64,
        text: String,
    },
    Private {
        user_id: u64,
    },
    Presence(Presence),
    Chat,
    Online,
    Contact(MessageDraft),
    Inbox,
    Read(u64),
    Close(u64),
    Stats,
    Templates,
    Map(Option<LocationKind>),
    Tips(Option<TipCategory>),
    Discover(String),
    Favourite(String),
    TipFavourite(String),
    Search(String),
    Characters(Option<CharacterStatus>),
    Character(u64),
    FindCharacter(String),
    Timeline(Option<StoryArc>),
    Events(Importance),
    Event(u64),
    FindEvent(String),
    Quit,
}

/// Why a line could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    /// The keyword is not a command.
    #[error("unknown command '{0}', type 'help' for the list")]
    Unknown(String),
    /// Arguments are missing or malformed.
    #[error("usage: {0}")]
    Usage(&'static str),
    /// An id argument is not a number.
    #[error("'{0}' is not a valid id")]
    InvalidId(String),
    /// Presence argument not recognised.
    #[error(transparent)]
    Presence(#[from] ParsePresenceError),
    /// An enumerated argument such as a category or story arc not recognised.
    #[error(transparent)]
    Variant(#[from] UnknownVariant),
}

/// Keyword and usage line for every command, in help order.
pub const USAGE: [(&str, &str); 33] = [
    ("help", "help"),
    ("register", "register name|surname|email|country|password"),
    ("login", "login email password"),
    ("logout", "logout"),
    ("whoami", "whoami"),
    ("countries", "countries"),
    ("strength", "strength password"),
    ("say", "say text"),
    ("dm", "dm user-id text"),
    ("private", "private user-id"),
    ("presence", "presence online|away|busy"),
    ("chat", "chat"),
    ("online", "online"),
    ("contact", "contact category priority subject|body"),
    ("inbox", "inbox"),
    ("read", "read message-id"),
    ("close", "close message-id"),
    ("stats", "stats"),
    ("templates", "templates"),
    ("map", "map [kind]"),
    ("tips", "tips [category]"),
    ("discover", "discover location-id"),
    ("fav", "fav location-id"),
    ("tip-fav", "tip-fav tip-id"),
    ("search", "search term"),
    ("characters", "characters [status]"),
    ("character", "character character-id"),
    ("find-character", "find-character term"),
    ("timeline", "timeline [arc]"),
    ("events", "events importance"),
    ("event", "event event-id"),
    ("find-event", "find-event term"),
    ("quit", "quit"),
];

fn usage(keyword: &str) -> &'static str {
    USAGE
        .iter()
        .find(|(name, _)| *name == keyword)
        .map_or("help", |(_, line)| line)
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    ///
    /// # Examples
    /// ```
    /// use survivor_hub::inbound::console::Command;
    ///
    /// let command = Command::parse("dm 2 see you at the dam").unwrap();
    /// assert!(matches!(command, Some(Command::Dm { user_id: 2, .. })));
    /// ```
    pub fn parse(line: &str) -> Result<Option<Self>, CommandParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };
        let keyword = keyword.to_ascii_lowercase();
        let usage_error = || CommandParseError::Usage(usage(&keyword));

        let command = match keyword.as_str() {
            "help" => Self::Help,
            "register" => Self::Register(registration(rest).ok_or_else(usage_error)?),
            "login" => {
                let (email, password) = rest.split_once(char::is_whitespace).ok_or_else(usage_error)?;
                Self::Login {
                    email: email.to_owned(),
                    password: Zeroizing::new(password.trim_start().to_owned()),
                }
            }
            "logout" => Self::Logout,
            "whoami" => Self::WhoAmI,
            "countries" => Self::Countries,
            "strength" => Self::Strength(Zeroizing::new(rest.to_owned())),
            "say" => Self::Say(required(rest).ok_or_else(usage_error)?),
            "dm" => {
                let (id, text) = rest.split_once(char::is_whitespace).ok_or_else(usage_error)?;
                Self::Dm {
                    user_id: parse_id(id)?,
                    text: text.trim().to_owned(),
                }
            }
            "private" => Self::Private {
                user_id: parse_id(required(rest).ok_or_else(usage_error)?.as_str())?,
            },
            "presence" => Self::Presence(required(rest).ok_or_else(usage_error)?.parse()?),
            "chat" => Self::Chat,
            "online" => Self::Online,
            "contact" => Self::Contact(contact(rest, usage_error)?),
            "inbox" => Self::Inbox,
            "read" => Self::Read(parse_id(required(rest).ok_or_else(usage_error)?.as_str())?),
            "close" => Self::Close(parse_id(required(rest).ok_or_else(usage_error)?.as_str())?),
            "stats" => Self::Stats,
            "templates" => Self::Templates,
            "map" => Self::Map(required(rest).map(|kind| kind.parse()).transpose()?),
            "tips" => Self::Tips(required(rest).map(|category| category.parse()).transpose()?),
            "discover" => Self::Discover(required(rest).ok_or_else(usage_error)?),
            "fav" => Self::Favourite(required(rest).ok_or_else(usage_error)?),
            "tip-fav" => Self::TipFavourite(required(rest).ok_or_else(usage_error)?),
            "search" => Self::Search(required(rest).ok_or_else(usage_error)?),
            "characters" => {
                Self::Characters(required(rest).map(|status| status.parse()).transpose()?)
            }
            "character" => {
                Self::Character(parse_id(required(rest).ok_or_else(usage_error)?.as_str())?)
            }
            "find-character" => Self::FindCharacter(required(rest).ok_or_else(usage_error)?),
            "timeline" => Self::Timeline(required(rest).map(|arc| arc.parse()).transpose()?),
            "events" => Self::Events(required(rest).ok_or_else(usage_error)?.parse()?),
            "event" => Self::Event(parse_id(required(rest).ok_or_else(usage_error)?.as_str())?),
            "find-event" => Self::FindEvent(required(rest).ok_or_else(usage_error)?),
            "quit" | "exit" => Self::Quit,
            _ => return Err(CommandParseError::Unknown(keyword)),
        };
        Ok(Some(command))
    }
}

fn required(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_owned())
}

fn parse_id(value: &str) -> Result<u64, CommandParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| CommandParseError::InvalidId(value.trim().to_owned()))
}

fn registration(rest: &str) -> Option<RegistrationForm> {
    let mut parts = rest.splitn(5, '|');
    let mut next = || parts.next().map(str::trim);
    let form = RegistrationForm {
        name: next()?.to_owned(),
        surname: next()?.to_owned(),
        email: next()?.to_owned(),
        country: next()?.to_owned(),
        password: Zeroizing::new(next()?.to_owned()),
    };
    Some(form)
}

fn contact(
    rest: &str,
    usage_error: impl Fn() -> CommandParseError,
) -> Result<MessageDraft, CommandParseError> {
    let mut words = rest.splitn(3, char::is_whitespace);
    let category: Category = words.next().filter(|w| !w.is_empty()).ok_or_else(&usage_error)?.parse()?;
    let priority: Priority = words.next().ok_or_else(&usage_error)?.parse()?;
    let (subject, body) = words
        .next()
        .and_then(|text| text.split_once('|'))
        .ok_or_else(&usage_error)?;
    Ok(MessageDraft {
        subject: subject.to_owned(),
        body: body.to_owned(),
        category,
        priority,
    })
}
