//! Entity records exchanged between the API and its clients.
//!
//! The first group (`Tournament`, `Question`, `User`, `ScoringEvent`) is
//! the flat shared contract every client depends on. The remaining
//! records are the richer projections served by the detail endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    Category, Difficulty, Division, QuestionStyle, QuestionType, RoomStatus, ScoringEventType,
    TournamentFormat, TournamentStatus,
};
use crate::ids::{
    BookmarkId, GameId, HistoryId, PlayerId, QuestionId, RoomId, RoundId, ScoringEventId, TeamId,
    TournamentId, UserId,
};

/// `part / whole` as a percentage, or `0.0` when `whole` is zero.
#[allow(clippy::arithmetic_side_effects)]
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(whole) * 100.0
}

// ---------------------------------------------------------------------------
// Shared contract
// ---------------------------------------------------------------------------

/// A tournament in its flat contract form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Tournament {
    /// Tournament identifier.
    pub id: TournamentId,
    /// Display name.
    pub name: String,
    /// Day the tournament is held.
    pub date: NaiveDate,
    /// City or address.
    pub location: String,
    /// The tournament director, if one is assigned.
    pub director_id: Option<UserId>,
}

/// A question in its flat contract form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Question {
    /// Question identifier.
    pub id: QuestionId,
    /// The full question as read aloud.
    pub question_text: String,
    /// The accepted answer.
    pub answer: String,
    /// Subject category.
    pub category: Category,
    /// Where the question came from (packet set, user submission, ...).
    pub source: String,
    /// Difficulty rating.
    pub difficulty: Difficulty,
}

/// A registered user in its flat contract form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Contact address.
    pub email: String,
}

/// A single live scoring event recorded by a moderator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScoringEvent {
    /// Event identifier.
    pub id: ScoringEventId,
    /// Tournament the event belongs to.
    pub tournament_id: TournamentId,
    /// What happened.
    pub event_type: ScoringEventType,
    /// Team credited with the event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub team_id: Option<TeamId>,
    /// Player credited with the event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub player_id: Option<PlayerId>,
    /// Points awarded (may be negative for interrupts).
    pub points: i32,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tournament projections
// ---------------------------------------------------------------------------

/// Tournament row served by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TournamentSummary {
    /// Tournament identifier.
    pub id: TournamentId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Division the tournament is run for.
    pub division: Division,
    /// Bracket format.
    pub format: TournamentFormat,
    /// Lifecycle status.
    pub status: TournamentStatus,
    /// Day the tournament is held.
    pub tournament_date: NaiveDate,
    /// Last day to register, if set.
    pub registration_deadline: Option<NaiveDate>,
    /// City or address.
    pub location: String,
    /// Building or venue name.
    pub venue: String,
    /// School or club hosting the event.
    pub host_organization: String,
    /// Team cap, if any.
    pub max_teams: Option<u32>,
    /// Teams registered so far.
    pub current_teams: u32,
    /// Tournament information page.
    pub website_url: String,
    /// External registration link.
    pub registration_url: String,
}

/// Public information about a tournament director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DirectorInfo {
    /// The director's user ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Short biography.
    pub bio: String,
    /// Affiliated school.
    pub school: String,
}

/// Tournament detail with related counts and director info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TournamentDetail {
    /// The list-view fields.
    #[serde(flatten)]
    pub summary: TournamentSummary,
    /// Number of teams entered.
    pub teams_count: u32,
    /// Number of rooms configured.
    pub rooms_count: u32,
    /// The director, if assigned.
    pub director: Option<DirectorInfo>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A team entered in a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Team {
    /// Team identifier.
    pub id: TeamId,
    /// Team name, unique within the tournament.
    pub name: String,
    /// School the team represents.
    pub school: String,
    /// Seed, if seeded.
    pub seed: Option<u32>,
    /// Pool assignment (`A`, `B`, ...), empty when unassigned.
    pub pool: String,
    /// Number of players on the roster.
    pub players_count: u32,
}

/// A player with their accumulated tournament statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Player {
    /// Player identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Grade level as entered at registration.
    pub grade_level: String,
    /// Name of the player's team.
    pub team_name: String,
    /// Net points scored.
    pub total_points: i32,
    /// Tossups heard.
    pub tossups_heard: u32,
    /// Correct buzzes.
    pub correct_buzzes: u32,
    /// Incorrect buzzes.
    pub incorrect_buzzes: u32,
    /// Correct buzzes as a percentage of all buzzes.
    pub accuracy: f64,
}

/// A room games are played in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Room {
    /// Room identifier.
    pub id: RoomId,
    /// Room name, unique within the tournament.
    pub name: String,
    /// Current status.
    pub status: RoomStatus,
    /// Round currently being played in the room.
    pub current_round: u32,
}

/// A round of play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Round {
    /// Round identifier.
    pub id: RoundId,
    /// Round number, unique within the tournament.
    pub round_number: u32,
    /// Optional round name (e.g. `Semifinal`).
    pub name: String,
    /// Packet assigned to the round.
    pub packet_name: String,
}

/// A game between two teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Game {
    /// Game identifier.
    pub id: GameId,
    /// Round the game belongs to.
    pub round_number: u32,
    /// Room the game is played in.
    pub room_name: String,
    /// First team.
    pub team1_name: String,
    /// Second team.
    pub team2_name: String,
    /// First team's score.
    pub team1_score: i32,
    /// Second team's score.
    pub team2_score: i32,
    /// Tossup currently being read.
    pub current_tossup: u32,
    /// Whether the game has finished.
    pub is_complete: bool,
    /// Winner's name; `None` while running or on a tie.
    pub winner_name: Option<String>,
    /// When play started.
    pub started_at: Option<DateTime<Utc>>,
    /// When play finished.
    pub completed_at: Option<DateTime<Utc>>,
}

/// A team's aggregate score from recorded scoring events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TeamStanding {
    /// Team identifier.
    pub team_id: TeamId,
    /// Team name.
    pub team_name: String,
    /// Sum of event points.
    pub points: i32,
    /// Number of events credited to the team.
    pub events: u32,
}

// ---------------------------------------------------------------------------
// Question projections
// ---------------------------------------------------------------------------

/// A question with its answer options, explanation, and statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuestionDetail {
    /// The contract fields.
    #[serde(flatten)]
    pub question: Question,
    /// Tossup or bonus.
    pub question_type: QuestionType,
    /// Answer format.
    pub question_style: QuestionStyle,
    /// Options W, X, Y, Z (empty for short answer).
    pub options: Vec<String>,
    /// Explanation of the answer.
    pub explanation: Option<String>,
    /// Times the question has been answered.
    pub times_answered: u32,
    /// Times it was answered correctly.
    pub times_correct: u32,
    /// Correct answers as a percentage of all answers.
    pub accuracy_rate: f64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// One attempt by a user at a practice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HistoryEntry {
    /// Entry identifier.
    pub id: HistoryId,
    /// The question attempted.
    pub question: Question,
    /// What the user answered.
    pub user_answer: String,
    /// Whether the answer was correct.
    pub is_correct: bool,
    /// Seconds taken, if timed.
    pub time_taken: Option<u32>,
    /// When the attempt was recorded.
    pub answered_at: DateTime<Utc>,
}

/// A question saved for later review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Bookmark {
    /// Bookmark identifier.
    pub id: BookmarkId,
    /// The bookmarked question.
    pub question: Question,
    /// The user's notes.
    pub notes: Option<String>,
    /// When the bookmark was created.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// User projections
// ---------------------------------------------------------------------------

/// The signed-in user's own profile, including email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Short biography.
    pub bio: Option<String>,
    /// Affiliated school.
    pub school: Option<String>,
    /// Grade level.
    pub grade_level: Option<u32>,
    /// Practice questions answered.
    pub total_questions_answered: u32,
    /// Practice questions answered correctly.
    pub correct_answers: u32,
    /// Correct answers as a percentage.
    pub accuracy: f64,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Another user's public profile (no email).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PublicProfile {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Short biography.
    pub bio: Option<String>,
    /// Affiliated school.
    pub school: Option<String>,
    /// Grade level.
    pub grade_level: Option<u32>,
    /// Practice questions answered.
    pub total_questions_answered: u32,
    /// Practice questions answered correctly.
    pub correct_answers: u32,
    /// Correct answers as a percentage.
    pub accuracy: f64,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for PublicProfile {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            username: p.username,
            first_name: p.first_name,
            last_name: p.last_name,
            bio: p.bio,
            school: p.school,
            grade_level: p.grade_level,
            total_questions_answered: p.total_questions_answered,
            correct_answers: p.correct_answers,
            accuracy: p.accuracy,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Access and refresh tokens issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TokenPair {
    /// Short-lived bearer token for API calls.
    pub access: String,
    /// Long-lived token exchanged for new access tokens.
    pub refresh: String,
}
