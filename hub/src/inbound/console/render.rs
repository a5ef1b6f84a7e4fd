//! Plain-text rendering of domain values for the console.

use crate::domain::{
    AdminMessage, AuthError, Character, ChatMessage, Country, Favourites, MapLocation,
    MessageKind, MessageTemplate, MessagingStats, OnlineUser, PasswordAssessment, SurvivalTip,
    TimelineEvent, User,
};

use super::command::USAGE;

pub(super) fn help() -> String {
    let mut lines = vec!["commands:".to_owned()];
    lines.extend(USAGE.iter().map(|(_, usage)| format!("  {usage}")));
    lines.join("\n")
}

pub(super) fn user(user: &User) -> String {
    format!(
        "{} {} <{}> from {}, registered {}",
        user.name(),
        user.surname(),
        user.email(),
        user.country(),
        user.registration_date().format("%Y-%m-%d"),
    )
}

pub(super) fn auth_error(err: &AuthError) -> String {
    let mut lines = match err {
        AuthError::Validation(errors) => errors.iter().map(ToString::to_string).collect(),
        other => vec![format!("error: {other}")],
    };
    if let Some(hint) = err.suggestion() {
        lines.push(format!("hint: {hint}"));
    }
    lines.join("\n")
}

pub(super) fn countries() -> String {
    Country::ALL
        .iter()
        .map(|country| country.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(super) fn strength(assessment: &PasswordAssessment) -> String {
    let mut lines = vec![format!(
        "strength: {} ({}/100)",
        assessment.strength(),
        assessment.score()
    )];
    lines.extend(
        assessment
            .missing()
            .iter()
            .map(|rule| format!("  - {}", rule.hint())),
    );
    lines.join("\n")
}

pub(super) fn chat_line(message: &ChatMessage) -> String {
    let marker = match message.kind {
        MessageKind::User => "",
        MessageKind::System => "* ",
        MessageKind::Admin => "! ",
    };
    format!(
        "[{}] {marker}{}: {}",
        message.sent_at.format("%H:%M"),
        message.author,
        message.text
    )
}

pub(super) fn chat_log(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return "no messages yet".to_owned();
    }
    messages
        .iter()
        .map(chat_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn online(users: &[OnlineUser]) -> String {
    users
        .iter()
        .map(|user| format!("#{} {} ({})", user.id, user.name, user.presence))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn admin_message(message: &AdminMessage) -> String {
    let mut line = format!(
        "#{} [{}] {}/{} {}",
        message.id, message.status, message.category, message.priority, message.subject
    );
    if let Some(reply) = &message.reply {
        line.push_str(&format!("\n    admin: {reply}"));
    }
    line
}

pub(super) fn inbox(messages: &[AdminMessage]) -> String {
    if messages.is_empty() {
        return "inbox empty".to_owned();
    }
    messages
        .iter()
        .map(admin_message)
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn stats(stats: &MessagingStats) -> String {
    format!(
        "sent: {}\npending: {}\nanswered: {}\naverage response: {}h",
        stats.total_sent, stats.pending, stats.answered, stats.average_response_hours
    )
}

pub(super) fn templates(templates: &[MessageTemplate]) -> String {
    templates
        .iter()
        .map(|template| {
            format!(
                "{} ({}): {}",
                template.key(),
                template.category(),
                template.body()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn locations(locations: &[MapLocation], favourites: &Favourites) -> String {
    if locations.is_empty() {
        return "no locations".to_owned();
    }
    locations
        .iter()
        .map(|location| {
            let star = if favourites.locations.contains(&location.id) {
                " *"
            } else {
                ""
            };
            let seen = if location.discovered { "" } else { " (undiscovered)" };
            format!(
                "{} {} [{}, {}] at {},{}{seen}{star}",
                location.id,
                location.name,
                location.kind,
                location.difficulty,
                location.coordinates.x,
                location.coordinates.y
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn tips(tips: &[&SurvivalTip], favourites: &Favourites) -> String {
    tips.iter()
        .map(|tip| {
            let star = if favourites.tips.contains(&tip.id) {
                " *"
            } else {
                ""
            };
            format!("{} [{}] {}: {}{star}", tip.id, tip.category, tip.title, tip.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn characters(characters: &[&Character]) -> String {
    if characters.is_empty() {
        return "no characters".to_owned();
    }
    characters
        .iter()
        .map(|character| {
            format!(
                "{} {} ({}, {}): {}",
                character.id, character.name, character.age, character.status, character.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn character(character: &Character) -> String {
    format!(
        "{} [{}], {} years, {}\n  {}\n  skills: {}\n  {}",
        character.name,
        character.status,
        character.age,
        character.location,
        character.description,
        character.skills.join(", "),
        character.story
    )
}

pub(super) fn events(events: &[&TimelineEvent]) -> String {
    if events.is_empty() {
        return "no events".to_owned();
    }
    events
        .iter()
        .map(|event| {
            format!(
                "{} [{}, {}] {} at {}",
                event.id, event.arc, event.importance, event.title, event.location
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn event(event: &TimelineEvent) -> String {
    format!(
        "{} ({}, {})\n  {}\n  {}\n  with: {}",
        event.title,
        event.date,
        event.arc,
        event.location,
        event.description,
        event.characters_involved.join(", ")
    )
}

#[cfg(test)]
mod tests {
    //! Regression coverage for console rendering.
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{Email, PersonName, Presence, ValidationErrors};

    #[test]
    fn validation_errors_render_one_line_per_field() {
        let errors: ValidationErrors = crate::domain::RegistrationForm {
            name: "E".to_owned(),
            email: "not-an-email".to_owned(),
            country: "México".to_owned(),
            surname: "Williams".to_owned(),
            password: zeroize::Zeroizing::new("Abcdef1".to_owned()),
        }
        .validate()
        .expect_err("invalid");

        let text = auth_error(&AuthError::Validation(errors));

        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|line| !line.starts_with("hint")));
    }

    #[test]
    fn auth_errors_carry_their_hint() {
        let email = Email::new("joel@jackson.org").expect("email");
        let text = auth_error(&AuthError::UserNotFound { email });

        assert_eq!(
            text,
            "error: no account found for joel@jackson.org\nhint: register a new account with that email"
        );
    }

    #[test]
    fn users_render_with_their_country_label() {
        let registered = Utc
            .with_ymd_and_hms(2033, 9, 26, 8, 0, 0)
            .single()
            .expect("instant");
        let ellie = User::new(
            PersonName::new("Ellie").expect("name"),
            PersonName::new("Williams").expect("surname"),
            Email::new("ellie@jackson.org").expect("email"),
            Country::Mexico,
            registered,
        );

        assert_eq!(
            user(&ellie),
            "Ellie Williams <ellie@jackson.org> from México, registered 2033-09-26"
        );
    }

    #[test]
    fn system_lines_are_marked() {
        let sent_at = Utc
            .with_ymd_and_hms(2033, 9, 26, 7, 55, 0)
            .single()
            .expect("instant");
        let message = ChatMessage {
            id: 1,
            author: "System".to_owned(),
            text: "Welcome".to_owned(),
            sent_at,
            kind: MessageKind::System,
        };
        let tommy = OnlineUser {
            id: 3,
            name: "Tommy_Miller".to_owned(),
            presence: Presence::Away,
            last_active: sent_at,
        };

        assert_eq!(chat_line(&message), "[07:55] * System: Welcome");
        assert_eq!(online(&[tommy]), "#3 Tommy_Miller (away)");
    }
}
