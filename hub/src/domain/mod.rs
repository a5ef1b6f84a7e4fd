//! Domain types and services for the survivor hub.
//!
//! Purpose: model survivors, sessions and the simulated community services
//! without any knowledge of the terminal or the storage medium. Services
//! reach storage through the [`ports::KeyValueStore`] port and time,
//! waiting and randomness through [`ServiceRuntime`].
//!
//! Public surface:
//! - [`User`], [`RegisteredUser`] and their validated fields.
//! - [`AuthService`]: registration, login and the observable session.
//! - [`SessionStore`]: typed JSON records keyed by [`StorageKey`].
//! - [`ChatService`], [`MessagingService`] and [`MapService`].
//! - [`CharacterService`] and [`TimelineService`]: read-only story guides.

pub mod auth_service;
pub mod character;
pub mod character_service;
pub mod chat;
pub mod chat_service;
pub mod credentials;
pub mod error;
pub mod map;
pub mod map_service;
pub mod messaging;
pub mod messaging_service;
pub mod ports;
pub mod runtime;
pub mod session;
pub mod session_store;
pub mod timeline;
pub mod timeline_service;
pub mod user;

pub use self::auth_service::{AuthLatency, AuthService, RegisteredUserTable};
pub use self::character::{Character, CharacterStatus};
pub use self::character_service::CharacterService;
pub use self::chat::{ChatMessage, MessageKind, OnlineUser, ParsePresenceError, Persona, Presence};
pub use self::chat_service::{ChatService, ChatSettings};
pub use self::credentials::{
    FieldError, FormField, LoginCredentials, PasswordAssessment, PasswordRule, PasswordStrength,
    RegistrationForm, RegistrationInput, ValidationErrors,
};
pub use self::error::AuthError;
pub use self::map::{
    Coordinates, Difficulty, Favourites, Importance, LocationKind, MapLocation, SurvivalTip,
    TipCategory,
};
pub use self::map_service::{MapError, MapService};
pub use self::messaging::{
    AdminMessage, Category, MessageDraft, MessageStatus, MessageTemplate, MessagingError,
    MessagingStats, Priority, UnknownVariant,
};
pub use self::messaging_service::{MessagingService, MessagingSettings};
pub use self::runtime::{Chance, RandomChance, ServiceRuntime, Sleeper, TokioSleeper};
pub use self::session::SessionState;
pub use self::session_store::{SessionStore, StorageKey, StoreError};
pub use self::timeline::{StoryArc, TimelineEvent};
pub use self::timeline_service::TimelineService;
pub use self::user::{
    Country, Email, NAME_MIN, PASSWORD_MIN, Password, PersonName, RegisteredUser, User,
    UserValidationError,
};
