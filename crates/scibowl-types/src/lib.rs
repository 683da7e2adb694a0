//! Shared type definitions for SciBowl Arena.
//!
//! This crate is the single source of truth for the JSON contract between
//! the server and its clients. Types defined here flow downstream to
//! `TypeScript` via `ts-rs`, so a field renamed here breaks the frontend
//! build instead of failing silently at runtime.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for all entity identifiers
//! - [`enums`] -- Closed string-tag enumerations (event types, statuses, categories)
//! - [`structs`] -- Records served by the API (tournaments, questions, users, scoring)
//! - [`api`] -- Response envelope and validated create/update payloads

pub mod api;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use api::{
    AccessToken, ApiResponse, BookmarkCreate, BookmarkUpdate, HistoryCreate, LoginRequest,
    ProfileUpdate, QuestionCreate, RefreshRequest, ScoringEventCreate, TournamentCreate,
    UserCreate,
};
pub use enums::{
    Category, Difficulty, Division, QuestionStyle, QuestionType, RoomStatus, ScoringEventType,
    TournamentFormat, TournamentStatus, parse_tag,
};
pub use ids::{
    BookmarkId, GameId, HistoryId, PlayerId, QuestionId, RoomId, RoundId, ScoringEventId, TeamId,
    TournamentId, UserId,
};
pub use structs::{
    Bookmark, DirectorInfo, Game, HistoryEntry, Player, PublicProfile, Question, QuestionDetail,
    Room, Round, ScoringEvent, Team, TeamStanding, TokenPair, Tournament, TournamentDetail,
    TournamentSummary, User, UserProfile, percentage,
};
