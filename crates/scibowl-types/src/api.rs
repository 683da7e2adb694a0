//! Request and response envelopes for the REST API.
//!
//! Every JSON body the server returns is an [`ApiResponse`]. Create and
//! update payloads carry `validator` rules mirroring the client-side
//! form checks, so both sides reject the same input with the same
//! messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::enums::{
    Category, Difficulty, Division, QuestionStyle, QuestionType, ScoringEventType,
    TournamentFormat,
};
use crate::ids::{PlayerId, QuestionId, TeamId};

/// Generic response envelope.
///
/// `error` is present only on failure; when it is, `data` is not
/// authoritative (the server sends `null`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ApiResponse<T> {
    /// The payload.
    pub data: T,
    /// Failure message, if the request failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wrap a successful payload.
    pub const fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    /// Whether `data` can be trusted.
    pub const fn is_authoritative(&self) -> bool {
        self.error.is_none()
    }
}

impl ApiResponse<serde_json::Value> {
    /// Build a failure envelope with a `null` payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: serde_json::Value::Null,
            error: Some(message.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Reject text that is empty once surrounding whitespace is trimmed. The
/// catalog stores trimmed text, so the check runs on the same value.
///
/// # Errors
///
/// Returns a `blank` error for empty or whitespace-only text.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Usernames need at least three characters after trimming.
///
/// # Errors
///
/// Returns a `length` error for shorter usernames.
pub fn username_length(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 3 {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

/// Payload for creating a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TournamentCreate {
    /// Display name.
    #[validate(custom(function = "not_blank", message = "Tournament name is required"))]
    pub name: String,
    /// Start time; only the calendar date is kept.
    pub date: DateTime<Utc>,
    /// City or address.
    #[validate(custom(function = "not_blank", message = "Location is required"))]
    pub location: String,
    /// User ID of the tournament director.
    #[validate(range(min = 1, message = "director_id must be a positive integer"))]
    pub director_id: u32,
    /// Division (defaults to high school).
    #[serde(default)]
    #[ts(optional)]
    pub division: Option<Division>,
    /// Format (defaults to round robin).
    #[serde(default)]
    #[ts(optional)]
    pub format: Option<TournamentFormat>,
    /// Free-form description.
    #[serde(default)]
    #[ts(optional)]
    pub description: Option<String>,
    /// Venue name.
    #[serde(default)]
    #[ts(optional)]
    pub venue: Option<String>,
    /// Hosting organization.
    #[serde(default)]
    #[ts(optional)]
    pub host_organization: Option<String>,
    /// Team cap.
    #[serde(default)]
    #[ts(optional)]
    #[validate(range(min = 2, message = "max_teams must be at least 2"))]
    pub max_teams: Option<u32>,
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// Payload for submitting a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuestionCreate {
    /// The question as read aloud.
    #[validate(custom(function = "not_blank", message = "Question text is required"))]
    pub question_text: String,
    /// The accepted answer.
    #[validate(custom(function = "not_blank", message = "Answer is required"))]
    pub answer: String,
    /// Subject category.
    pub category: Category,
    /// Where the question came from.
    pub source: String,
    /// Difficulty rating.
    pub difficulty: Difficulty,
    /// Tossup or bonus (defaults to tossup).
    #[serde(default)]
    #[ts(optional)]
    pub question_type: Option<QuestionType>,
    /// Answer format (defaults to short answer, or multiple choice when
    /// options are given).
    #[serde(default)]
    #[ts(optional)]
    pub question_style: Option<QuestionStyle>,
    /// Options W, X, Y, Z.
    #[serde(default)]
    #[validate(length(max = 4, message = "At most four options are allowed"))]
    pub options: Vec<String>,
    /// Explanation of the answer.
    #[serde(default)]
    #[ts(optional)]
    pub explanation: Option<String>,
}

/// Payload for recording a practice attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HistoryCreate {
    /// The question attempted.
    pub question_id: QuestionId,
    /// What the user answered.
    #[validate(length(max = 1000, message = "Answer is too long"))]
    pub user_answer: String,
    /// Whether the answer was correct.
    pub is_correct: bool,
    /// Seconds taken.
    #[serde(default)]
    #[ts(optional)]
    pub time_taken: Option<u32>,
}

/// Payload for bookmarking a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BookmarkCreate {
    /// The question to bookmark.
    pub question_id: QuestionId,
    /// Optional notes.
    #[serde(default)]
    #[ts(optional)]
    pub notes: Option<String>,
}

/// Payload for editing a bookmark's notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BookmarkUpdate {
    /// Replacement notes; `null` clears them.
    #[serde(default)]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Users and authentication
// ---------------------------------------------------------------------------

/// Payload for registering a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserCreate {
    /// Login name.
    #[validate(custom(
        function = "username_length",
        message = "Username must be at least 3 characters"
    ))]
    pub username: String,
    /// Contact address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Plain-text password (hashed before storage).
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Must repeat `password`.
    #[validate(must_match(other = "password", message = "Password fields didn't match."))]
    pub password_confirm: String,
    /// Given name.
    #[serde(default)]
    #[ts(optional)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    #[ts(optional)]
    pub last_name: Option<String>,
    /// Affiliated school.
    #[serde(default)]
    #[ts(optional)]
    pub school: Option<String>,
    /// Grade level.
    #[serde(default)]
    #[ts(optional)]
    #[validate(range(min = 1, max = 16, message = "grade_level must be between 1 and 16"))]
    pub grade_level: Option<u32>,
}

/// Payload for editing the signed-in user's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProfileUpdate {
    /// New email address.
    #[serde(default)]
    #[ts(optional)]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// New given name.
    #[serde(default)]
    #[ts(optional)]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(default)]
    #[ts(optional)]
    pub last_name: Option<String>,
    /// New biography.
    #[serde(default)]
    #[ts(optional)]
    pub bio: Option<String>,
    /// New school.
    #[serde(default)]
    #[ts(optional)]
    pub school: Option<String>,
    /// New grade level.
    #[serde(default)]
    #[ts(optional)]
    #[validate(range(min = 1, max = 16, message = "grade_level must be between 1 and 16"))]
    pub grade_level: Option<u32>,
}

/// Payload for `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LoginRequest {
    /// Login name.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Plain-text password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Payload for `POST /api/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RefreshRequest {
    /// A refresh token from a previous login.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh: String,
}

/// Response of `POST /api/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AccessToken {
    /// A fresh access token.
    pub access: String,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Payload for recording a scoring event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScoringEventCreate {
    /// What happened.
    pub event_type: ScoringEventType,
    /// Team credited with the event.
    #[serde(default)]
    #[ts(optional)]
    pub team_id: Option<TeamId>,
    /// Player credited with the event.
    #[serde(default)]
    #[ts(optional)]
    pub player_id: Option<PlayerId>,
    /// Points; defaults from the event type when omitted.
    #[serde(default)]
    #[ts(optional)]
    #[validate(range(min = -100, max = 100, message = "points must be between -100 and 100"))]
    pub points: Option<i32>,
    /// The buzz came after the question was fully read.
    #[serde(default)]
    pub at_end: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user_create() -> UserCreate {
        UserCreate {
            username: String::from("curie"),
            email: String::from("marie@example.com"),
            password: String::from("polonium84"),
            password_confirm: String::from("polonium84"),
            first_name: None,
            last_name: None,
            school: None,
            grade_level: None,
        }
    }

    #[test]
    fn whitespace_username_is_too_short() {
        let mut payload = user_create();
        payload.username = String::from("     ");
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));

        payload.username = String::from("  ab  ");
        assert!(payload.validate().is_err());
        payload.username = String::from(" abc ");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn blank_text_is_rejected_after_trimming() {
        assert!(not_blank("   ").is_err());
        assert!(not_blank("\t\n").is_err());
        assert!(not_blank(" x ").is_ok());
        assert!(username_length("ab ").is_err());
    }

    #[test]
    fn failure_envelope_has_null_data() {
        let resp = ApiResponse::failure("not found: tournament 9");
        assert!(!resp.is_authoritative());
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["error"], "not found: tournament 9");
    }

    #[test]
    fn success_envelope_omits_error() {
        let json = serde_json::to_value(ApiResponse::ok(3_u32)).unwrap();
        assert_eq!(json, serde_json::json!({ "data": 3 }));
    }

    #[test]
    fn valid_user_create_passes() {
        assert!(user_create().validate().is_ok());
    }

    #[test]
    fn short_username_and_password_fail() {
        let mut payload = user_create();
        payload.username = String::from("mc");
        payload.password = String::from("short");
        payload.password_confirm = String::from("short");
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn mismatched_password_confirm_fails() {
        let mut payload = user_create();
        payload.password_confirm = String::from("polonium85");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn bad_email_fails() {
        let mut payload = user_create();
        payload.email = String::from("not-an-email");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn tournament_create_requires_name_and_positive_director() {
        let raw = serde_json::json!({
            "name": "",
            "date": "2025-02-01T09:00:00Z",
            "location": "Boston",
            "director_id": 0
        });
        let payload: TournamentCreate = serde_json::from_value(raw).unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("director_id"));
        assert!(!fields.contains_key("location"));
    }

    #[test]
    fn tournament_create_rejects_non_datetime_date() {
        let raw = serde_json::json!({
            "name": "Regional",
            "date": "next saturday",
            "location": "Boston",
            "director_id": 1
        });
        assert!(serde_json::from_value::<TournamentCreate>(raw).is_err());
    }

    #[test]
    fn question_create_rejects_unknown_difficulty() {
        let raw = serde_json::json!({
            "question_text": "What is the SI unit of force?",
            "answer": "Newton",
            "category": "PHYSICS",
            "source": "USER_SUBMITTED",
            "difficulty": "impossible"
        });
        assert!(serde_json::from_value::<QuestionCreate>(raw).is_err());
    }

    #[test]
    fn scoring_event_create_points_are_optional() {
        let raw = serde_json::json!({ "event_type": "bonus", "team_id": 4 });
        let payload: ScoringEventCreate = serde_json::from_value(raw).unwrap();
        assert_eq!(payload.points, None);
        assert!(!payload.at_end);
        assert_eq!(payload.team_id, Some(TeamId::new(4)));
        assert!(payload.validate().is_ok());
    }
}
