//! Contact-the-administrators model.
//!
//! Messages move `Sent → Read → Answered → Closed`. Reading may be skipped
//! and any open message may be closed; nothing leaves `Closed`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session_store::StoreError;
use super::user::Email;

/// Text did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// What the message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bug,
    Suggestion,
    Question,
    Feedback,
    Other,
}

impl Category {
    /// Every category in form order.
    pub const ALL: [Self; 5] = [
        Self::Bug,
        Self::Suggestion,
        Self::Question,
        Self::Feedback,
        Self::Other,
    ];

    /// Canned administrator answer for this category.
    #[must_use]
    pub const fn canned_reply(self) -> &'static str {
        match self {
            Self::Question => {
                "Thanks for your question. We have received your message and will reply within the next 24 hours."
            }
            Self::Bug => {
                "We have logged the reported bug. Our technical team will review it and work on a fix."
            }
            Self::Suggestion => {
                "We appreciate your suggestion and will consider it for future updates of the platform."
            }
            Self::Feedback => {
                "Thanks for your feedback. It helps us improve the experience for every survivor."
            }
            Self::Other => "We have received your message and will be in touch soon with more information.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bug => "bug",
            Self::Suggestion => "suggestion",
            Self::Question => "question",
            Self::Feedback => "feedback",
            Self::Other => "other",
        })
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.to_string() == wanted)
            .ok_or_else(|| UnknownVariant::new("category", value.trim()))
    }
}

/// How urgent the sender considers the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        })
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|priority| priority.to_string() == wanted)
            .ok_or_else(|| UnknownVariant::new("priority", value.trim()))
    }
}

/// Where a message is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sent,
    Read,
    Answered,
    Closed,
}

impl MessageStatus {
    /// Whether moving to `next` is allowed.
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Sent, Self::Read)
                | (Self::Sent | Self::Read, Self::Answered)
                | (Self::Sent | Self::Read | Self::Answered, Self::Closed)
        )
    }

    /// Still waiting on the administrators.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Sent | Self::Read)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sent => "sent",
            Self::Read => "read",
            Self::Answered => "answered",
            Self::Closed => "closed",
        })
    }
}

/// A message to the administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMessage {
    pub id: u64,
    pub author: String,
    pub email: Email,
    pub subject: String,
    pub body: String,
    pub category: Category,
    pub priority: Priority,
    pub sent_at: DateTime<Utc>,
    pub status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_at: Option<DateTime<Utc>>,
}

impl AdminMessage {
    /// Questions and urgent messages get an automatic answer.
    #[must_use]
    pub fn wants_auto_reply(&self) -> bool {
        self.category == Category::Question || self.priority == Priority::Urgent
    }

    pub(crate) fn move_to(&mut self, next: MessageStatus) -> Result<(), MessagingError> {
        if !self.status.can_become(next) {
            return Err(MessagingError::InvalidTransition {
                id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

/// A message being composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub subject: String,
    pub body: String,
    pub category: Category,
    pub priority: Priority,
}

/// Summary of the current survivor's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagingStats {
    pub total_sent: usize,
    pub pending: usize,
    pub answered: usize,
    pub average_response_hours: i64,
}

impl MessagingStats {
    /// Hours quoted when nothing has been answered yet.
    pub const DEFAULT_RESPONSE_HOURS: i64 = 24;

    /// Summarise `messages`.
    ///
    /// The average is the rounded mean over answered messages that carry a
    /// reply time.
    pub fn of<'a>(messages: impl IntoIterator<Item = &'a AdminMessage>) -> Self {
        const HOUR_MS: i64 = 3_600_000;
        let mut stats = Self {
            total_sent: 0,
            pending: 0,
            answered: 0,
            average_response_hours: Self::DEFAULT_RESPONSE_HOURS,
        };
        let mut timed = 0_i64;
        let mut total_ms = 0_i64;
        for message in messages {
            stats.total_sent += 1;
            if message.status.is_pending() {
                stats.pending += 1;
            }
            if message.status == MessageStatus::Answered {
                stats.answered += 1;
                if let Some(replied_at) = message.replied_at {
                    timed += 1;
                    total_ms += (replied_at - message.sent_at).num_milliseconds();
                }
            }
        }
        if timed > 0 {
            let mean_ms = total_ms.div_euclid(timed);
            stats.average_response_hours = (mean_ms + HOUR_MS / 2).div_euclid(HOUR_MS);
        }
        stats
    }
}

/// Starting points for common messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTemplate {
    BugReport,
    Improvement,
    GeneralQuestion,
    PositiveFeedback,
    TechnicalIssue,
}

impl MessageTemplate {
    /// Every template in display order.
    pub const ALL: [Self; 5] = [
        Self::BugReport,
        Self::Improvement,
        Self::GeneralQuestion,
        Self::PositiveFeedback,
        Self::TechnicalIssue,
    ];

    /// Short identifier.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BugReport => "bug_report",
            Self::Improvement => "improvement",
            Self::GeneralQuestion => "general_question",
            Self::PositiveFeedback => "positive_feedback",
            Self::TechnicalIssue => "technical_issue",
        }
    }

    /// Category the template fits.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::BugReport | Self::TechnicalIssue => Category::Bug,
            Self::Improvement => Category::Suggestion,
            Self::GeneralQuestion => Category::Question,
            Self::PositiveFeedback => Category::Feedback,
        }
    }

    /// Body text with bracketed placeholders.
    #[must_use]
    pub const fn body(self) -> &'static str {
        match self {
            Self::BugReport => {
                "I found a bug in the app. Description: [describe the bug]. Steps to reproduce: [list the steps]. Browser: [Chrome/Firefox/Safari/etc.]"
            }
            Self::Improvement => {
                "I have a suggestion to improve the app: [describe your suggestion]. This would help because: [explain the benefits]."
            }
            Self::GeneralQuestion => {
                "I have a question about: [topic]. I would like to know: [specific question]."
            }
            Self::PositiveFeedback => {
                "I wanted to share a positive experience with the app: [what you liked]. I found this especially useful: [specific features]."
            }
            Self::TechnicalIssue => {
                "I am having a technical problem: [describe the problem]. It happens when: [specific situation]. My device: [device details]."
            }
        }
    }
}

/// Failures raised by the messaging service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessagingError {
    /// Sending requires a logged-in survivor.
    #[error("log in to contact the administrators")]
    NotAuthenticated,
    /// A required text field is blank.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    /// No message has the id.
    #[error("message {id} not found")]
    NotFound { id: u64 },
    /// The lifecycle does not allow the move.
    #[error("message {id} cannot go from {from} to {to}")]
    InvalidTransition {
        id: u64,
        from: MessageStatus,
        to: MessageStatus,
    },
    /// The change could not be persisted.
    #[error("could not save messages: {0}")]
    Storage(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    #[fixture]
    fn message() -> AdminMessage {
        AdminMessage {
            id: 1,
            author: "Ellie".to_owned(),
            email: Email::new("ellie@jackson.org").expect("email"),
            subject: "Map".to_owned(),
            body: "The river marker is wrong".to_owned(),
            category: Category::Bug,
            priority: Priority::Low,
            sent_at: DateTime::<Utc>::UNIX_EPOCH,
            status: MessageStatus::Sent,
            reply: None,
            replied_at: None,
        }
    }

    #[rstest]
    #[case(MessageStatus::Sent, MessageStatus::Read, true)]
    #[case(MessageStatus::Sent, MessageStatus::Answered, true)]
    #[case(MessageStatus::Read, MessageStatus::Answered, true)]
    #[case(MessageStatus::Sent, MessageStatus::Closed, true)]
    #[case(MessageStatus::Answered, MessageStatus::Closed, true)]
    #[case(MessageStatus::Read, MessageStatus::Sent, false)]
    #[case(MessageStatus::Read, MessageStatus::Read, false)]
    #[case(MessageStatus::Answered, MessageStatus::Read, false)]
    #[case(MessageStatus::Closed, MessageStatus::Closed, false)]
    #[case(MessageStatus::Closed, MessageStatus::Answered, false)]
    fn lifecycle_transitions(
        #[case] from: MessageStatus,
        #[case] to: MessageStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_become(to), allowed);
    }

    #[rstest]
    fn illegal_moves_leave_status_unchanged(mut message: AdminMessage) {
        message.move_to(MessageStatus::Closed).expect("close");
        let err = message
            .move_to(MessageStatus::Read)
            .expect_err("closed is final");

        assert_eq!(message.status, MessageStatus::Closed);
        assert_eq!(err.to_string(), "message 1 cannot go from closed to read");
    }

    #[rstest]
    #[case(Category::Question, Priority::Low, true)]
    #[case(Category::Bug, Priority::Urgent, true)]
    #[case(Category::Feedback, Priority::High, false)]
    fn auto_reply_rule(
        mut message: AdminMessage,
        #[case] category: Category,
        #[case] priority: Priority,
        #[case] expected: bool,
    ) {
        message.category = category;
        message.priority = priority;
        assert_eq!(message.wants_auto_reply(), expected);
    }

    #[rstest]
    fn stats_default_to_a_day_without_answers(message: AdminMessage) {
        let stats = MessagingStats::of([&message]);
        assert_eq!(
            stats,
            MessagingStats {
                total_sent: 1,
                pending: 1,
                answered: 0,
                average_response_hours: 24,
            }
        );
    }

    #[rstest]
    fn stats_round_the_mean_response_time(message: AdminMessage) {
        let answered = |id: u64, minutes: i64| AdminMessage {
            id,
            status: MessageStatus::Answered,
            replied_at: Some(message.sent_at + TimeDelta::minutes(minutes)),
            ..message.clone()
        };
        let closed = AdminMessage {
            id: 9,
            status: MessageStatus::Closed,
            ..message.clone()
        };
        let messages = [answered(2, 60), answered(3, 150), message.clone(), closed];

        let stats = MessagingStats::of(&messages);

        assert_eq!(stats.total_sent, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.answered, 2);
        // Mean of 1h and 2.5h is 1.75h.
        assert_eq!(stats.average_response_hours, 2);
    }

    #[rstest]
    #[case("bug", Category::Bug)]
    #[case(" Question ", Category::Question)]
    fn categories_parse(#[case] text: &str, #[case] expected: Category) {
        assert_eq!(text.parse::<Category>(), Ok(expected));
    }

    #[test]
    fn unknown_priority_is_named() {
        let err = "whenever".parse::<Priority>().expect_err("unknown");
        assert_eq!(err.to_string(), "unknown priority 'whenever'");
    }

    #[rstest]
    fn optional_reply_fields_default_when_missing(message: AdminMessage) {
        let json = serde_json::to_value(&message).expect("serialise");
        assert!(json.get("reply").is_none());
        assert_eq!(json["sentAt"], "1970-01-01T00:00:00Z");

        let decoded: AdminMessage = serde_json::from_value(json).expect("decode");
        assert_eq!(decoded, message);
    }

    #[test]
    fn every_template_has_placeholders() {
        for template in MessageTemplate::ALL {
            assert!(template.body().contains('['), "{}", template.key());
        }
        assert_eq!(MessageTemplate::GeneralQuestion.category(), Category::Question);
    }
}
