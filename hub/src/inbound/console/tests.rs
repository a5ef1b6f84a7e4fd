//! Tests for the console adapter.

use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::*;
use crate::domain::{
    AuthLatency, ChatSettings, MessagingSettings, ServiceRuntime, SessionStore, TokioSleeper,
};
use crate::outbound::storage::InMemoryKeyValueStore;
use crate::test_support::{FixedChance, MutableClock, instant_runtime, outbreak_day};

const REGISTER_ELLIE: &str = "register Ellie|Williams|ellie@jackson.org|México|Abcdef1";

fn console(chance: FixedChance) -> Console {
    let (runtime, _clock) = instant_runtime(chance);
    let store = SessionStore::new(Arc::new(InMemoryKeyValueStore::default()));
    let auth = Arc::new(AuthService::start(
        store.clone(),
        runtime.clone(),
        AuthLatency::none(),
    ));
    let chat = ChatService::start(auth.clone(), runtime.clone(), ChatSettings::default());
    let messaging = MessagingService::start(
        auth.clone(),
        store.clone(),
        runtime,
        MessagingSettings::default(),
    );
    let map = Arc::new(MapService::start(store));
    Console::new(
        auth,
        chat,
        messaging,
        map,
        Arc::new(CharacterService::default()),
        Arc::new(TimelineService::default()),
    )
}

/// A console whose services wait on tokio time, for paused-clock tests.
fn timed_console(chat_settings: ChatSettings, messaging_settings: MessagingSettings) -> Console {
    let runtime = ServiceRuntime::new(
        Arc::new(MutableClock::new(outbreak_day())),
        Arc::new(TokioSleeper),
        Arc::new(FixedChance::always()),
    );
    let store = SessionStore::new(Arc::new(InMemoryKeyValueStore::default()));
    let auth = Arc::new(AuthService::start(
        store.clone(),
        runtime.clone(),
        AuthLatency::none(),
    ));
    let chat = ChatService::start(auth.clone(), runtime.clone(), chat_settings);
    let messaging = MessagingService::start(auth.clone(), store.clone(), runtime, messaging_settings);
    let map = Arc::new(MapService::start(store));
    Console::new(
        auth,
        chat,
        messaging,
        map,
        Arc::new(CharacterService::default()),
        Arc::new(TimelineService::default()),
    )
}

async fn text(console: &Console, line: &str) -> String {
    match console.respond(line).await {
        Reply::Text(text) => text,
        other => panic!("expected text for {line:?}, got {other:?}"),
    }
}

#[tokio::test]
async fn registration_logs_the_survivor_in() {
    let console = console(FixedChance::never());

    assert_eq!(text(&console, "whoami").await, "not logged in");
    assert_eq!(
        text(&console, REGISTER_ELLIE).await,
        "welcome to Jackson, Ellie"
    );
    assert!(
        text(&console, "whoami")
            .await
            .starts_with("Ellie Williams <ellie@jackson.org> from México")
    );

    assert_eq!(text(&console, "logout").await, "logged out");
    assert_eq!(text(&console, "logout").await, "logged out");
    assert_eq!(text(&console, "whoami").await, "not logged in");
}

#[tokio::test]
async fn auth_failures_show_a_hint() {
    let console = console(FixedChance::never());
    text(&console, REGISTER_ELLIE).await;
    text(&console, "logout").await;

    let duplicate = text(&console, REGISTER_ELLIE).await;
    assert!(duplicate.ends_with("hint: log in with that email instead"));

    let wrong = text(&console, "login ellie@jackson.org abcdef1").await;
    assert_eq!(
        wrong,
        "error: incorrect password\nhint: check your password and try again"
    );

    let back = text(&console, "login ELLIE@jackson.org Abcdef1").await;
    assert_eq!(back, "welcome back, Ellie");
}

#[tokio::test]
async fn invalid_forms_list_each_field() {
    let console = console(FixedChance::never());

    let reply = text(&console, "register E|W|ellie|Narnia|abc").await;

    let fields: Vec<_> = reply
        .lines()
        .filter_map(|line| line.split_once(':').map(|(field, _)| field))
        .collect();
    assert_eq!(fields, ["name", "surname", "email", "country", "password"]);
}

#[rstest]
#[case("fly", "error: unknown command 'fly', type 'help' for the list")]
#[case("dm x hello", "error: 'x' is not a valid id")]
#[tokio::test]
async fn parse_errors_are_reported(#[case] line: &str, #[case] expected: &str) {
    let console = console(FixedChance::never());

    assert_eq!(text(&console, line).await, expected);
}

#[tokio::test]
async fn blank_lines_and_quit() {
    let console = console(FixedChance::never());

    assert_eq!(console.respond("  ").await, Reply::Silent);
    assert_eq!(console.respond("quit").await, Reply::Quit);
}

#[tokio::test]
async fn chat_needs_a_session() {
    let console = console(FixedChance::never());

    assert_eq!(text(&console, "say anyone there?").await, "log in to chat");
    assert_eq!(
        text(&console, "presence busy").await,
        "log in to set your presence"
    );

    text(&console, REGISTER_ELLIE).await;
    assert_eq!(
        text(&console, "say anyone there?").await,
        "[08:00] Ellie: anyone there?"
    );
    assert_eq!(text(&console, "presence busy").await, "you are now busy");
    assert!(text(&console, "online").await.contains("Ellie (busy)"));
    assert!(text(&console, "chat").await.ends_with("Ellie: anyone there?"));

    assert_eq!(text(&console, "dm 1 meet at the dam").await, "to #1: meet at the dam");
    assert!(text(&console, "private 1").await.ends_with("meet at the dam"));
}

#[tokio::test]
async fn inbox_commands_drive_the_lifecycle() {
    let console = console(FixedChance::never());
    assert_eq!(
        text(&console, "contact bug low Map|Marker is off").await,
        "error: log in to contact the administrators"
    );
    text(&console, REGISTER_ELLIE).await;

    let sent = text(&console, "contact bug high Map|Marker is off").await;
    assert_eq!(sent, "sent #1 [sent] bug/high Map");
    assert_eq!(text(&console, "read 1").await, "#1 [read] bug/high Map");
    assert_eq!(text(&console, "close 1").await, "#1 [closed] bug/high Map");
    assert_eq!(
        text(&console, "close 1").await,
        "error: message 1 cannot go from closed to closed"
    );
    assert_eq!(text(&console, "read 9").await, "error: message 9 not found");
    assert!(text(&console, "stats").await.starts_with("sent: 1\npending: 0"));
    assert_eq!(text(&console, "templates").await.lines().count(), 5);
}

#[tokio::test]
async fn map_commands_track_discovery_and_favourites() {
    let console = console(FixedChance::never());

    assert_eq!(text(&console, "map danger").await.lines().count(), 1);
    assert_eq!(
        text(&console, "discover infected_forest").await,
        "infected_forest discovered"
    );
    assert_eq!(
        text(&console, "fav supply_cache").await,
        "supply_cache added to favourites"
    );
    assert!(text(&console, "search hidden").await.ends_with(" *"));
    assert_eq!(
        text(&console, "fav supply_cache").await,
        "supply_cache removed from favourites"
    );
    assert_eq!(
        text(&console, "tip-fav tip_9").await,
        "error: unknown tip 'tip_9'"
    );
    assert_eq!(text(&console, "tips resources").await.lines().count(), 2);
}

#[rstest]
#[case::dead_characters("characters dead", "3 Joel Miller (56, dead): Veteran smuggler and Ellie's father figure")]
#[case::missing_character("character 9", "error: character 9 not found")]
#[case::prologue("timeline prologue", "5 [prologue, high] Abby's Past at Salt Lake City hospital")]
#[case::missing_event("event 0", "error: event 0 not found")]
#[case::no_match("find-event clicker", "no events")]
#[case::no_character_match("find-character bloater", "no characters")]
#[tokio::test]
async fn story_guides_answer_without_a_session(#[case] line: &str, #[case] expected: &str) {
    let console = console(FixedChance::never());
    assert_eq!(text(&console, line).await, expected);
}

#[tokio::test]
async fn story_guides_list_and_detail() {
    let console = console(FixedChance::never());

    assert_eq!(text(&console, "characters").await.lines().count(), 6);
    assert_eq!(text(&console, "find-character MILLER").await.lines().count(), 2);
    assert!(
        text(&console, "character 6")
            .await
            .starts_with("Lev [alive], 14 years, Seraphite island, Seattle")
    );
    assert_eq!(text(&console, "timeline").await.lines().count(), 8);
    assert_eq!(text(&console, "events medium").await.lines().count(), 2);
    assert!(
        text(&console, "event 8")
            .await
            .ends_with("with: Ellie, Dina, JJ")
    );
}

#[tokio::test]
async fn strength_meter_lists_missing_rules() {
    let console = console(FixedChance::never());

    assert_eq!(
        text(&console, "strength abc").await,
        "strength: weak (25/100)\n  - use at least 6 characters\n  - add an upper-case letter\n  - add a digit"
    );
}

#[tokio::test]
async fn run_serves_a_scripted_session() {
    let console = console(FixedChance::never());
    let script = format!("{REGISTER_ELLIE}\n\nwhoami\nquit\nwhoami\n");
    let mut output = Vec::new();

    console
        .run(script.as_bytes(), &mut output)
        .await
        .expect("session");

    let transcript = String::from_utf8(output).expect("utf-8");
    let lines: Vec<_> = transcript.lines().collect();
    assert_eq!(lines.first(), Some(&"survivor hub ready, type 'help' for commands"));
    assert_eq!(lines.get(1), Some(&"welcome to Jackson, Ellie"));
    assert_eq!(lines.last(), Some(&"stay safe out there"));
    assert_eq!(lines.len(), 4);
}

#[tokio::test]
async fn run_delivers_persona_replies_between_commands() {
    let console = console(FixedChance::always());
    let (client, server) = tokio::io::duplex(4096);
    let (server_read, server_write) = tokio::io::split(server);
    let session = tokio::spawn(async move {
        console
            .run(BufReader::new(server_read), server_write)
            .await
    });

    let (client_read, mut client_write) = tokio::io::split(client);
    let mut replies = BufReader::new(client_read).lines();
    client_write
        .write_all(format!("{REGISTER_ELLIE}\nsay hello Jackson\n").as_bytes())
        .await
        .expect("write");

    let reply = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(line) = replies.next_line().await.expect("read") {
            if line.contains("Joel_Miller: Good point") {
                return line;
            }
        }
        panic!("session ended before the persona replied");
    })
    .await
    .expect("persona reply in time");
    assert_eq!(reply, "[08:00] Joel_Miller: Good point, we need to be careful.");

    client_write.write_all(b"quit\n").await.expect("write");
    session.await.expect("join").expect("session");
}

#[tokio::test(start_paused = true)]
async fn chat_arriving_during_a_slow_command_is_still_shown() {
    let console = timed_console(
        ChatSettings {
            reply_probability: 1.0,
            reply_delay: Duration::from_secs(1)..=Duration::from_secs(1),
        },
        MessagingSettings {
            send_latency: Duration::from_secs(5),
            reply_delay: Duration::from_secs(60)..=Duration::from_secs(60),
        },
    );
    let script = format!("{REGISTER_ELLIE}\nsay anyone?\ncontact bug low Door|stuck\nquit\n");
    let mut output = Vec::new();

    console
        .run(script.as_bytes(), &mut output)
        .await
        .expect("session");

    let transcript = String::from_utf8(output).expect("utf-8");
    let sent = transcript.find("sent #1").expect("contact confirmed");
    let reply = transcript
        .find("Joel_Miller: Good point")
        .expect("persona reply shown");
    assert!(sent < reply, "{transcript}");
    assert!(transcript.trim_end().ends_with("stay safe out there"));
}

#[tokio::test(start_paused = true)]
async fn run_announces_admin_answers() {
    let console = timed_console(
        ChatSettings::default(),
        MessagingSettings {
            send_latency: Duration::ZERO,
            reply_delay: Duration::from_secs(3)..=Duration::from_secs(3),
        },
    );
    let (client, server) = tokio::io::duplex(4096);
    let (server_read, server_write) = tokio::io::split(server);
    let session = tokio::spawn(async move {
        console
            .run(BufReader::new(server_read), server_write)
            .await
    });

    let (client_read, mut client_write) = tokio::io::split(client);
    let mut replies = BufReader::new(client_read).lines();
    client_write
        .write_all(format!("{REGISTER_ELLIE}\ncontact question high Water|Is the river safe?\n").as_bytes())
        .await
        .expect("write");

    let answer = tokio::time::timeout(Duration::from_secs(30), async {
        while let Some(line) = replies.next_line().await.expect("read") {
            if line.starts_with("    admin: ") {
                return line;
            }
        }
        panic!("session ended before the answer arrived");
    })
    .await
    .expect("answer in time");
    assert!(answer.len() > "    admin: ".len());

    client_write.write_all(b"quit\n").await.expect("write");
    session.await.expect("join").expect("session");
}
