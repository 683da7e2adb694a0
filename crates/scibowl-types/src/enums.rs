//! Enumeration types for the SciBowl Arena API.
//!
//! Every enumeration is a closed set of string tags on the wire. The
//! scoring event type uses lowercase tags; everything inherited from the
//! tournament and question models uses upper snake case tags.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Parse a wire tag (e.g. `"COMPLETED"` or `"bonus"`) into an enum value.
///
/// Returns `None` for tags outside the enumeration. Leading and trailing
/// whitespace is ignored.
pub fn parse_tag<T: DeserializeOwned>(tag: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(tag.trim().to_owned())).ok()
}

// ---------------------------------------------------------------------------
// Scoring (MoSS)
// ---------------------------------------------------------------------------

/// The kind of a live scoring event recorded during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ScoringEventType {
    /// An answer was given.
    Answer,
    /// A player buzzed in.
    Buzzer,
    /// A tossup answer was ruled correct.
    Correct,
    /// A tossup answer was ruled incorrect.
    Incorrect,
    /// A tossup was read.
    Tossup,
    /// A bonus was answered correctly.
    Bonus,
}

impl ScoringEventType {
    /// Every member of the enumeration, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Answer,
        Self::Buzzer,
        Self::Correct,
        Self::Incorrect,
        Self::Tossup,
        Self::Bonus,
    ];

    /// The wire tag for this event type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Answer => "answer",
            Self::Buzzer => "buzzer",
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
            Self::Tossup => "tossup",
            Self::Bonus => "bonus",
        }
    }
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

/// Competitive division a tournament is run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum Division {
    /// High school teams.
    HighSchool,
    /// Middle school teams.
    MiddleSchool,
    /// College teams.
    Collegiate,
    /// Open to anyone.
    Open,
}

impl Division {
    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighSchool => "High School",
            Self::MiddleSchool => "Middle School",
            Self::Collegiate => "Collegiate",
            Self::Open => "Open",
        }
    }
}

/// Bracket format of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum TournamentFormat {
    /// Every team plays every other team in its pool.
    RoundRobin,
    /// Teams are eliminated after two losses.
    DoubleElim,
    /// Teams are eliminated after one loss.
    SingleElim,
    /// Swiss pairing by record.
    Swiss,
    /// Anything else.
    Custom,
}

/// Lifecycle status of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum TournamentStatus {
    /// Announced, registration not yet open.
    Upcoming,
    /// Registration is open.
    Registration,
    /// Games are being played.
    InProgress,
    /// All games are finished.
    Completed,
    /// The tournament will not take place.
    Cancelled,
}

impl TournamentStatus {
    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Registration => "Registration Open",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Teams may currently register.
    pub const fn is_registration_open(self) -> bool {
        matches!(self, Self::Registration)
    }

    /// Play has not started yet.
    pub const fn is_upcoming(self) -> bool {
        matches!(self, Self::Upcoming | Self::Registration)
    }
}

/// Status of a room during a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum RoomStatus {
    /// No game has started in the room.
    NotStarted,
    /// A game is running.
    InProgress,
    /// The room is done for the day.
    Finished,
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// Science Bowl subject category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum Category {
    /// Biology.
    Biology,
    /// Chemistry.
    Chemistry,
    /// Physics.
    Physics,
    /// Earth and space science.
    EarthSpace,
    /// Mathematics.
    Math,
    /// Energy.
    Energy,
    /// Uncategorized.
    Other,
}

/// Whether a question is read as a tossup or a bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum QuestionType {
    /// Open to both teams; first buzz answers.
    Tossup,
    /// Awarded to the team that answered the tossup.
    Bonus,
}

/// Answer format of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum QuestionStyle {
    /// Free-form short answer.
    ShortAnswer,
    /// Pick one of W, X, Y, Z.
    MultipleChoice,
    /// Identify every matching option.
    IdentifyAll,
    /// Put the options in order.
    Rank,
}

/// Difficulty rating of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Difficulty {
    /// Easy.
    Easy,
    /// Medium.
    Medium,
    /// Hard.
    Hard,
}
