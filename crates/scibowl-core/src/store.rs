//! In-memory catalog of every entity the API serves.
//!
//! The catalog owns plain records keyed by sequential integer IDs (one
//! sequence per entity type) and builds the wire projections on demand, so
//! derived values like team counts, accuracy, and winners are always
//! consistent with the underlying rows.
//!
//! The catalog is synchronous. The server wraps it in a
//! `tokio::sync::RwLock`; every method here is short and never awaits.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use scibowl_types::{
    Bookmark, BookmarkCreate, BookmarkId, BookmarkUpdate, Category, DirectorInfo, Division, Game,
    GameId, HistoryCreate, HistoryEntry, HistoryId, Player, PlayerId, ProfileUpdate,
    PublicProfile, Question, QuestionCreate, QuestionDetail, QuestionId, QuestionStyle,
    QuestionType, Room, RoomId, RoomStatus, Round, RoundId, ScoringEvent, ScoringEventCreate,
    ScoringEventId, Team, TeamId, TeamStanding, Tournament, TournamentCreate, TournamentDetail,
    TournamentFormat, TournamentId, TournamentStatus, TournamentSummary, User, UserCreate, UserId,
    UserProfile, parse_tag, percentage,
};

use crate::scoring::{self, PlayerStats};

/// Errors returned by catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The referenced entity does not exist (or is not visible to the
    /// caller).
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Entity kind, e.g. `"tournament"`.
        entity: &'static str,
        /// The identifier or name that was looked up.
        key: String,
    },

    /// The operation would violate a uniqueness rule.
    #[error("{0}")]
    Conflict(String),

    /// The input is well-formed but semantically invalid.
    #[error("{0}")]
    Validation(String),

    /// Credentials were rejected.
    #[error("{0}")]
    Unauthorized(String),

    /// An ID sequence ran out.
    #[error("{0} id space exhausted")]
    Exhausted(&'static str),
}

impl CatalogError {
    /// The rejection for a failed login, identical for unknown users and
    /// wrong passwords.
    pub fn invalid_credentials() -> Self {
        Self::Unauthorized(String::from(
            "No active account found with the given credentials",
        ))
    }

    fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// `usize` count as a wire `u32`, saturating.
fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Rows of one entity type with its ID sequence.
#[derive(Debug, Clone)]
pub(crate) struct Table<V> {
    entity: &'static str,
    rows: BTreeMap<u32, V>,
    last: u32,
}

impl<V> Table<V> {
    const fn new(entity: &'static str) -> Self {
        Self {
            entity,
            rows: BTreeMap::new(),
            last: 0,
        }
    }

    /// Allocate the next ID and store the row built from it.
    pub(crate) fn insert(&mut self, make: impl FnOnce(u32) -> V) -> Result<u32, CatalogError> {
        let id = self
            .last
            .checked_add(1)
            .ok_or(CatalogError::Exhausted(self.entity))?;
        self.last = id;
        self.rows.insert(id, make(id));
        Ok(id)
    }

    pub(crate) fn get(&self, id: u32) -> Result<&V, CatalogError> {
        self.rows
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(self.entity, id))
    }

    fn get_mut(&mut self, id: u32) -> Result<&mut V, CatalogError> {
        let entity = self.entity;
        self.rows
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found(entity, id))
    }

    fn remove(&mut self, id: u32) -> Option<V> {
        self.rows.remove(&id)
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct TournamentRecord {
    pub(crate) id: TournamentId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) division: Division,
    pub(crate) format: TournamentFormat,
    pub(crate) status: TournamentStatus,
    pub(crate) tournament_date: NaiveDate,
    pub(crate) registration_deadline: Option<NaiveDate>,
    pub(crate) location: String,
    pub(crate) venue: String,
    pub(crate) host_organization: String,
    pub(crate) director: Option<UserId>,
    pub(crate) max_teams: Option<u32>,
    pub(crate) website_url: String,
    pub(crate) registration_url: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct TeamRecord {
    pub(crate) id: TeamId,
    pub(crate) tournament: TournamentId,
    pub(crate) name: String,
    pub(crate) school: String,
    pub(crate) seed: Option<u32>,
    pub(crate) pool: String,
}

#[derive(Debug, Clone)]
pub(crate) struct PlayerRecord {
    pub(crate) id: PlayerId,
    pub(crate) team: TeamId,
    pub(crate) name: String,
    pub(crate) grade_level: String,
    pub(crate) stats: PlayerStats,
}

#[derive(Debug, Clone)]
pub(crate) struct RoomRecord {
    pub(crate) id: RoomId,
    pub(crate) tournament: TournamentId,
    pub(crate) name: String,
    pub(crate) status: RoomStatus,
    pub(crate) current_round: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct RoundRecord {
    pub(crate) id: RoundId,
    pub(crate) tournament: TournamentId,
    pub(crate) round_number: u32,
    pub(crate) name: String,
    pub(crate) packet_name: String,
}

#[derive(Debug, Clone)]
pub(crate) struct GameRecord {
    pub(crate) id: GameId,
    pub(crate) tournament: TournamentId,
    pub(crate) round: RoundId,
    pub(crate) room: RoomId,
    pub(crate) team1: TeamId,
    pub(crate) team2: TeamId,
    pub(crate) team1_score: i32,
    pub(crate) team2_score: i32,
    pub(crate) current_tossup: u32,
    pub(crate) is_complete: bool,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub(crate) struct QuestionRecord {
    pub(crate) id: QuestionId,
    pub(crate) question_text: String,
    pub(crate) answer: String,
    pub(crate) category: Category,
    pub(crate) question_type: QuestionType,
    pub(crate) question_style: QuestionStyle,
    pub(crate) options: Vec<String>,
    pub(crate) source: String,
    pub(crate) difficulty: scibowl_types::Difficulty,
    pub(crate) explanation: Option<String>,
    pub(crate) times_answered: u32,
    pub(crate) times_correct: u32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct UserRecord {
    pub(crate) id: UserId,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) bio: Option<String>,
    pub(crate) school: Option<String>,
    pub(crate) grade_level: Option<u32>,
    pub(crate) total_questions_answered: u32,
    pub(crate) correct_answers: u32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct HistoryRecord {
    id: HistoryId,
    user: UserId,
    question: QuestionId,
    user_answer: String,
    is_correct: bool,
    time_taken: Option<u32>,
    answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct BookmarkRecord {
    id: BookmarkId,
    user: UserId,
    question: QuestionId,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Raw tournament list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TournamentParams {
    /// Comma-separated status tags.
    pub status: Option<String>,
    /// Division tag.
    pub division: Option<String>,
}

/// Parsed tournament list filter.
///
/// Unknown tags match nothing rather than being rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentFilter {
    statuses: Option<Vec<TournamentStatus>>,
    division: Option<Option<Division>>,
}

impl TournamentFilter {
    /// Build from raw query parameters. Empty parameters do not filter.
    pub fn from_params(params: &TournamentParams) -> Self {
        let statuses = params
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.split(',').filter_map(parse_tag).collect());
        let division = params
            .division
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(parse_tag);
        Self { statuses, division }
    }

    fn matches(&self, t: &TournamentRecord) -> bool {
        let status_ok = self
            .statuses
            .as_ref()
            .is_none_or(|wanted| wanted.contains(&t.status));
        let division_ok = self
            .division
            .is_none_or(|wanted| wanted == Some(t.division));
        status_ok && division_ok
    }
}

/// Sort order for question lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionOrdering {
    /// Oldest first.
    CreatedAt,
    /// Newest first.
    #[default]
    NewestFirst,
    /// Least answered first.
    TimesAnswered,
    /// Most answered first.
    MostAnswered,
}

impl QuestionOrdering {
    /// Parse an `ordering` parameter (`created_at`, `-created_at`,
    /// `times_answered`, `-times_answered`).
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        match raw.trim() {
            "created_at" => Ok(Self::CreatedAt),
            "-created_at" => Ok(Self::NewestFirst),
            "times_answered" => Ok(Self::TimesAnswered),
            "-times_answered" => Ok(Self::MostAnswered),
            other => Err(CatalogError::Validation(format!(
                "Invalid ordering: {other}"
            ))),
        }
    }
}

/// Raw question list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionParams {
    /// Category tag.
    pub category: Option<String>,
    /// Question type tag.
    pub question_type: Option<String>,
    /// Question style tag.
    pub question_style: Option<String>,
    /// Exact source.
    pub source: Option<String>,
    /// Case-insensitive substring of the question text.
    pub search: Option<String>,
    /// Sort order.
    pub ordering: Option<String>,
}

/// Parsed question list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionQuery {
    /// Only this category.
    pub category: Option<Category>,
    /// Only this type.
    pub question_type: Option<QuestionType>,
    /// Only this style.
    pub question_style: Option<QuestionStyle>,
    /// Only this source.
    pub source: Option<String>,
    /// Lowercased search needle.
    pub search: Option<String>,
    /// Sort order.
    pub ordering: QuestionOrdering,
}

fn parse_choice<T: serde::de::DeserializeOwned>(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<T>, CatalogError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    parse_tag(raw).map(Some).ok_or_else(|| {
        CatalogError::Validation(format!(
            "Select a valid choice. {raw} is not one of the available choices for {field}."
        ))
    })
}

impl QuestionQuery {
    /// Build from raw query parameters; unknown tags are rejected.
    pub fn from_params(params: &QuestionParams) -> Result<Self, CatalogError> {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        Ok(Self {
            category: parse_choice("category", params.category.as_deref())?,
            question_type: parse_choice("question_type", params.question_type.as_deref())?,
            question_style: parse_choice("question_style", params.question_style.as_deref())?,
            source: non_empty(&params.source),
            search: non_empty(&params.search).map(|s| s.to_lowercase()),
            ordering: params
                .ordering
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(QuestionOrdering::parse)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    fn matches(&self, q: &QuestionRecord) -> bool {
        self.category.is_none_or(|c| c == q.category)
            && self.question_type.is_none_or(|t| t == q.question_type)
            && self.question_style.is_none_or(|s| s == q.question_style)
            && self.source.as_deref().is_none_or(|s| s == q.source)
            && self
                .search
                .as_deref()
                .is_none_or(|needle| q.question_text.to_lowercase().contains(needle))
    }

    fn compare(&self, a: &QuestionRecord, b: &QuestionRecord) -> Ordering {
        let newest = || b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id));
        match self.ordering {
            QuestionOrdering::CreatedAt => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
            QuestionOrdering::NewestFirst => newest(),
            QuestionOrdering::TimesAnswered => {
                a.times_answered.cmp(&b.times_answered).then_with(newest)
            }
            QuestionOrdering::MostAnswered => {
                b.times_answered.cmp(&a.times_answered).then_with(newest)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Every entity the API serves.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub(crate) tournaments: Table<TournamentRecord>,
    pub(crate) teams: Table<TeamRecord>,
    pub(crate) players: Table<PlayerRecord>,
    pub(crate) rooms: Table<RoomRecord>,
    pub(crate) rounds: Table<RoundRecord>,
    pub(crate) games: Table<GameRecord>,
    pub(crate) questions: Table<QuestionRecord>,
    pub(crate) users: Table<UserRecord>,
    history: Table<HistoryRecord>,
    bookmarks: Table<BookmarkRecord>,
    events: Table<ScoringEvent>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// An empty catalog.
    pub const fn new() -> Self {
        Self {
            tournaments: Table::new("tournament"),
            teams: Table::new("team"),
            players: Table::new("player"),
            rooms: Table::new("room"),
            rounds: Table::new("round"),
            games: Table::new("game"),
            questions: Table::new("question"),
            users: Table::new("user"),
            history: Table::new("history entry"),
            bookmarks: Table::new("bookmark"),
            events: Table::new("scoring event"),
        }
    }

    // -- projections -------------------------------------------------------

    fn teams_in(&self, tournament: TournamentId) -> impl Iterator<Item = &TeamRecord> {
        self.teams.values().filter(move |t| t.tournament == tournament)
    }

    fn summary(&self, t: &TournamentRecord) -> TournamentSummary {
        TournamentSummary {
            id: t.id,
            name: t.name.clone(),
            description: t.description.clone(),
            division: t.division,
            format: t.format,
            status: t.status,
            tournament_date: t.tournament_date,
            registration_deadline: t.registration_deadline,
            location: t.location.clone(),
            venue: t.venue.clone(),
            host_organization: t.host_organization.clone(),
            max_teams: t.max_teams,
            current_teams: count(self.teams_in(t.id).count()),
            website_url: t.website_url.clone(),
            registration_url: t.registration_url.clone(),
        }
    }

    fn contract_tournament(t: &TournamentRecord) -> Tournament {
        Tournament {
            id: t.id,
            name: t.name.clone(),
            date: t.tournament_date,
            location: t.location.clone(),
            director_id: t.director,
        }
    }

    fn team_view(&self, t: &TeamRecord) -> Team {
        Team {
            id: t.id,
            name: t.name.clone(),
            school: t.school.clone(),
            seed: t.seed,
            pool: t.pool.clone(),
            players_count: count(self.players.values().filter(|p| p.team == t.id).count()),
        }
    }

    fn player_view(&self, p: &PlayerRecord) -> Player {
        let team_name = self
            .teams
            .get(p.team.into_inner())
            .map(|t| t.name.clone())
            .unwrap_or_default();
        Player {
            id: p.id,
            name: p.name.clone(),
            grade_level: p.grade_level.clone(),
            team_name,
            total_points: p.stats.total_points,
            tossups_heard: p.stats.tossups_heard,
            correct_buzzes: p.stats.correct_buzzes,
            incorrect_buzzes: p.stats.incorrect_buzzes,
            accuracy: p.stats.accuracy(),
        }
    }

    fn room_view(r: &RoomRecord) -> Room {
        Room {
            id: r.id,
            name: r.name.clone(),
            status: r.status,
            current_round: r.current_round,
        }
    }

    fn round_view(r: &RoundRecord) -> Round {
        Round {
            id: r.id,
            round_number: r.round_number,
            name: r.name.clone(),
            packet_name: r.packet_name.clone(),
        }
    }

    fn team_name(&self, id: TeamId) -> String {
        self.teams
            .get(id.into_inner())
            .map(|t| t.name.clone())
            .unwrap_or_default()
    }

    fn game_view(&self, g: &GameRecord) -> Game {
        let team1_name = self.team_name(g.team1);
        let team2_name = self.team_name(g.team2);
        let winner_name = match winner(g.is_complete, g.team1_score, g.team2_score) {
            Some(Side::Team1) => Some(team1_name.clone()),
            Some(Side::Team2) => Some(team2_name.clone()),
            None => None,
        };
        Game {
            id: g.id,
            round_number: self
                .rounds
                .get(g.round.into_inner())
                .map(|r| r.round_number)
                .unwrap_or_default(),
            room_name: self
                .rooms
                .get(g.room.into_inner())
                .map(|r| r.name.clone())
                .unwrap_or_default(),
            team1_name,
            team2_name,
            team1_score: g.team1_score,
            team2_score: g.team2_score,
            current_tossup: g.current_tossup,
            is_complete: g.is_complete,
            winner_name,
            started_at: g.started_at,
            completed_at: g.completed_at,
        }
    }

    fn contract_question(q: &QuestionRecord) -> Question {
        Question {
            id: q.id,
            question_text: q.question_text.clone(),
            answer: q.answer.clone(),
            category: q.category,
            source: q.source.clone(),
            difficulty: q.difficulty,
        }
    }

    fn question_detail(q: &QuestionRecord) -> QuestionDetail {
        QuestionDetail {
            question: Self::contract_question(q),
            question_type: q.question_type,
            question_style: q.question_style,
            options: q.options.clone(),
            explanation: q.explanation.clone(),
            times_answered: q.times_answered,
            times_correct: q.times_correct,
            accuracy_rate: percentage(q.times_correct, q.times_answered),
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }

    fn contract_user(u: &UserRecord) -> User {
        User {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
        }
    }

    fn profile_view(u: &UserRecord) -> UserProfile {
        UserProfile {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            bio: u.bio.clone(),
            school: u.school.clone(),
            grade_level: u.grade_level,
            total_questions_answered: u.total_questions_answered,
            correct_answers: u.correct_answers,
            accuracy: percentage(u.correct_answers, u.total_questions_answered),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }

    fn director_info(u: &UserRecord) -> DirectorInfo {
        DirectorInfo {
            id: u.id,
            username: u.username.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            bio: u.bio.clone().unwrap_or_default(),
            school: u.school.clone().unwrap_or_default(),
        }
    }

    fn tournament_record(&self, id: TournamentId) -> Result<&TournamentRecord, CatalogError> {
        self.tournaments.get(id.into_inner())
    }

    // -- tournaments -------------------------------------------------------

    /// Tournaments matching `filter`, ordered by date then name.
    pub fn list_tournaments(&self, filter: &TournamentFilter) -> Vec<TournamentSummary> {
        let mut rows: Vec<&TournamentRecord> =
            self.tournaments.values().filter(|t| filter.matches(t)).collect();
        rows.sort_by(|a, b| {
            a.tournament_date
                .cmp(&b.tournament_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows.into_iter().map(|t| self.summary(t)).collect()
    }

    /// One tournament with counts and director info.
    pub fn tournament(&self, id: TournamentId) -> Result<TournamentDetail, CatalogError> {
        let t = self.tournament_record(id)?;
        let director = t
            .director
            .and_then(|d| self.users.get(d.into_inner()).ok())
            .map(Self::director_info);
        Ok(TournamentDetail {
            summary: self.summary(t),
            teams_count: count(self.teams_in(id).count()),
            rooms_count: count(self.rooms.values().filter(|r| r.tournament == id).count()),
            director,
            created_at: t.created_at,
            updated_at: t.updated_at,
        })
    }

    /// Create a tournament from a validated payload.
    pub fn create_tournament(
        &mut self,
        payload: &TournamentCreate,
    ) -> Result<Tournament, CatalogError> {
        let director = UserId::new(payload.director_id);
        if self.users.get(director.into_inner()).is_err() {
            return Err(CatalogError::Validation(format!(
                "director_id {director} does not match any user"
            )));
        }
        let now = Utc::now();
        let id = self.tournaments.insert(|raw| TournamentRecord {
            id: TournamentId::new(raw),
            name: payload.name.trim().to_owned(),
            description: payload.description.clone().unwrap_or_default(),
            division: payload.division.unwrap_or(Division::HighSchool),
            format: payload.format.unwrap_or(TournamentFormat::RoundRobin),
            status: TournamentStatus::Upcoming,
            tournament_date: payload.date.date_naive(),
            registration_deadline: None,
            location: payload.location.trim().to_owned(),
            venue: payload.venue.clone().unwrap_or_default(),
            host_organization: payload.host_organization.clone().unwrap_or_default(),
            director: Some(director),
            max_teams: payload.max_teams,
            website_url: String::new(),
            registration_url: String::new(),
            created_at: now,
            updated_at: now,
        })?;
        tracing::info!(tournament_id = id, name = %payload.name, "tournament created");
        self.tournament_record(TournamentId::new(id))
            .map(Self::contract_tournament)
    }

    /// Teams entered in a tournament, by seed (unseeded last) then name.
    pub fn teams_of(&self, id: TournamentId) -> Result<Vec<Team>, CatalogError> {
        self.tournament_record(id)?;
        let mut rows: Vec<&TeamRecord> = self.teams_in(id).collect();
        sort_teams(&mut rows);
        Ok(rows.into_iter().map(|t| self.team_view(t)).collect())
    }

    /// Rooms of a tournament, by name.
    pub fn rooms_of(&self, id: TournamentId) -> Result<Vec<Room>, CatalogError> {
        self.tournament_record(id)?;
        let mut rows: Vec<&RoomRecord> =
            self.rooms.values().filter(|r| r.tournament == id).collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows.into_iter().map(Self::room_view).collect())
    }

    /// Rounds of a tournament, by number.
    pub fn rounds_of(&self, id: TournamentId) -> Result<Vec<Round>, CatalogError> {
        self.tournament_record(id)?;
        let mut rows: Vec<&RoundRecord> =
            self.rounds.values().filter(|r| r.tournament == id).collect();
        rows.sort_by_key(|r| r.round_number);
        Ok(rows.into_iter().map(Self::round_view).collect())
    }

    /// Games of a tournament, by round number then room name.
    pub fn games_of(&self, id: TournamentId) -> Result<Vec<Game>, CatalogError> {
        self.tournament_record(id)?;
        Ok(self.sorted_games(self.games.values().filter(|g| g.tournament == id)))
    }

    fn sorted_games<'a>(&self, rows: impl Iterator<Item = &'a GameRecord>) -> Vec<Game> {
        let mut views: Vec<Game> = rows.map(|g| self.game_view(g)).collect();
        views.sort_by(|a, b| {
            a.round_number
                .cmp(&b.round_number)
                .then_with(|| a.room_name.cmp(&b.room_name))
                .then(a.id.cmp(&b.id))
        });
        views
    }

    /// Team standings from the tournament's scoring events.
    pub fn standings(&self, id: TournamentId) -> Result<Vec<TeamStanding>, CatalogError> {
        self.tournament_record(id)?;
        let teams: Vec<(TeamId, String)> =
            self.teams_in(id).map(|t| (t.id, t.name.clone())).collect();
        let events: Vec<ScoringEvent> = self
            .events
            .values()
            .filter(|e| e.tournament_id == id)
            .cloned()
            .collect();
        Ok(scoring::standings(&teams, &events))
    }

    // -- teams, players, rooms, games --------------------------------------

    /// Every team, by seed then name.
    pub fn teams(&self) -> Vec<Team> {
        let mut rows: Vec<&TeamRecord> = self.teams.values().collect();
        sort_teams(&mut rows);
        rows.into_iter().map(|t| self.team_view(t)).collect()
    }

    /// One team.
    pub fn team(&self, id: TeamId) -> Result<Team, CatalogError> {
        self.teams.get(id.into_inner()).map(|t| self.team_view(t))
    }

    /// Players on a team, by name.
    pub fn players_of(&self, id: TeamId) -> Result<Vec<Player>, CatalogError> {
        self.teams.get(id.into_inner())?;
        let mut rows: Vec<&PlayerRecord> =
            self.players.values().filter(|p| p.team == id).collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows.into_iter().map(|p| self.player_view(p)).collect())
    }

    /// One player.
    pub fn player(&self, id: PlayerId) -> Result<Player, CatalogError> {
        self.players
            .get(id.into_inner())
            .map(|p| self.player_view(p))
    }

    /// Every room, by name.
    pub fn rooms(&self) -> Vec<Room> {
        let mut rows: Vec<&RoomRecord> = self.rooms.values().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        rows.into_iter().map(Self::room_view).collect()
    }

    /// One room.
    pub fn room(&self, id: RoomId) -> Result<Room, CatalogError> {
        self.rooms.get(id.into_inner()).map(Self::room_view)
    }

    /// Every game, by round number then room name.
    pub fn games(&self) -> Vec<Game> {
        self.sorted_games(self.games.values())
    }

    /// One game.
    pub fn game(&self, id: GameId) -> Result<Game, CatalogError> {
        self.games.get(id.into_inner()).map(|g| self.game_view(g))
    }

    // -- questions ---------------------------------------------------------

    /// Questions matching `query`, in its order.
    pub fn list_questions(&self, query: &QuestionQuery) -> Vec<QuestionDetail> {
        let mut rows: Vec<&QuestionRecord> =
            self.questions.values().filter(|q| query.matches(q)).collect();
        rows.sort_by(|a, b| query.compare(a, b));
        rows.into_iter().map(Self::question_detail).collect()
    }

    /// One question with answer and statistics.
    pub fn question(&self, id: QuestionId) -> Result<QuestionDetail, CatalogError> {
        self.questions
            .get(id.into_inner())
            .map(Self::question_detail)
    }

    /// Add a question from a validated payload.
    pub fn create_question(
        &mut self,
        payload: &QuestionCreate,
    ) -> Result<QuestionDetail, CatalogError> {
        let now = Utc::now();
        let style = payload.question_style.unwrap_or(if payload.options.is_empty() {
            QuestionStyle::ShortAnswer
        } else {
            QuestionStyle::MultipleChoice
        });
        let id = self.questions.insert(|raw| QuestionRecord {
            id: QuestionId::new(raw),
            question_text: payload.question_text.clone(),
            answer: payload.answer.clone(),
            category: payload.category,
            question_type: payload.question_type.unwrap_or(QuestionType::Tossup),
            question_style: style,
            options: payload.options.clone(),
            source: payload.source.clone(),
            difficulty: payload.difficulty,
            explanation: payload.explanation.clone(),
            times_answered: 0,
            times_correct: 0,
            created_at: now,
            updated_at: now,
        })?;
        tracing::debug!(question_id = id, "question created");
        self.question(QuestionId::new(id))
    }

    // -- users -------------------------------------------------------------

    fn find_user(&self, username: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username.trim()))
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email.trim()))
    }

    /// Register an account. `password_hash` is the already-hashed password.
    ///
    /// Usernames and emails are unique, compared case-insensitively.
    pub fn register(
        &mut self,
        payload: &UserCreate,
        password_hash: String,
    ) -> Result<User, CatalogError> {
        if self.find_user(&payload.username).is_some() {
            return Err(CatalogError::Conflict(String::from(
                "A user with that username already exists.",
            )));
        }
        if self.email_taken(&payload.email, None) {
            return Err(CatalogError::Conflict(String::from(
                "A user with that email already exists.",
            )));
        }
        let now = Utc::now();
        let id = self.users.insert(|raw| UserRecord {
            id: UserId::new(raw),
            username: payload.username.trim().to_owned(),
            email: payload.email.trim().to_owned(),
            password_hash,
            first_name: payload.first_name.clone().unwrap_or_default(),
            last_name: payload.last_name.clone().unwrap_or_default(),
            bio: None,
            school: payload.school.clone(),
            grade_level: payload.grade_level,
            total_questions_answered: 0,
            correct_answers: 0,
            created_at: now,
            updated_at: now,
        })?;
        tracing::info!(user_id = id, username = %payload.username, "user registered");
        self.user(UserId::new(id))
    }

    /// The account named `username` with its stored password hash, for a
    /// login check made outside the catalog lock.
    pub fn credentials(&self, username: &str) -> Option<(User, String)> {
        self.find_user(username)
            .map(|u| (Self::contract_user(u), u.password_hash.clone()))
    }

    /// One user in contract form.
    pub fn user(&self, id: UserId) -> Result<User, CatalogError> {
        self.users.get(id.into_inner()).map(Self::contract_user)
    }

    /// The private profile of `id`.
    pub fn profile(&self, id: UserId) -> Result<UserProfile, CatalogError> {
        self.users.get(id.into_inner()).map(Self::profile_view)
    }

    /// The public profile of `username`.
    pub fn public_profile(&self, username: &str) -> Result<PublicProfile, CatalogError> {
        self.find_user(username)
            .map(|u| PublicProfile::from(Self::profile_view(u)))
            .ok_or_else(|| CatalogError::not_found("user", username))
    }

    /// Apply a partial profile update.
    pub fn update_profile(
        &mut self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, CatalogError> {
        if let Some(email) = update.email.as_deref() {
            if self.email_taken(email, Some(id)) {
                return Err(CatalogError::Conflict(String::from(
                    "A user with that email already exists.",
                )));
            }
        }
        let user = self.users.get_mut(id.into_inner())?;
        if let Some(email) = &update.email {
            user.email = email.trim().to_owned();
        }
        if let Some(first) = &update.first_name {
            user.first_name.clone_from(first);
        }
        if let Some(last) = &update.last_name {
            user.last_name.clone_from(last);
        }
        if update.bio.is_some() {
            user.bio.clone_from(&update.bio);
        }
        if update.school.is_some() {
            user.school.clone_from(&update.school);
        }
        if update.grade_level.is_some() {
            user.grade_level = update.grade_level;
        }
        user.updated_at = Utc::now();
        Ok(Self::profile_view(user))
    }

    // -- answer history ----------------------------------------------------

    fn history_view(&self, h: &HistoryRecord) -> Result<HistoryEntry, CatalogError> {
        let question = self
            .questions
            .get(h.question.into_inner())
            .map(Self::contract_question)?;
        Ok(HistoryEntry {
            id: h.id,
            question,
            user_answer: h.user_answer.clone(),
            is_correct: h.is_correct,
            time_taken: h.time_taken,
            answered_at: h.answered_at,
        })
    }

    /// `user`'s attempts, newest first.
    pub fn history(&self, user: UserId) -> Vec<HistoryEntry> {
        let mut rows: Vec<&HistoryRecord> =
            self.history.values().filter(|h| h.user == user).collect();
        rows.sort_by(|a, b| b.answered_at.cmp(&a.answered_at).then(b.id.cmp(&a.id)));
        rows.into_iter()
            .filter_map(|h| self.history_view(h).ok())
            .collect()
    }

    /// Record an attempt and update question and user statistics.
    pub fn record_history(
        &mut self,
        user: UserId,
        payload: &HistoryCreate,
    ) -> Result<HistoryEntry, CatalogError> {
        self.users.get(user.into_inner())?;
        let now = Utc::now();
        let question = self.questions.get_mut(payload.question_id.into_inner())?;
        question.times_answered = question.times_answered.saturating_add(1);
        if payload.is_correct {
            question.times_correct = question.times_correct.saturating_add(1);
        }
        question.updated_at = now;

        let account = self.users.get_mut(user.into_inner())?;
        account.total_questions_answered = account.total_questions_answered.saturating_add(1);
        if payload.is_correct {
            account.correct_answers = account.correct_answers.saturating_add(1);
        }

        let id = self.history.insert(|raw| HistoryRecord {
            id: HistoryId::new(raw),
            user,
            question: payload.question_id,
            user_answer: payload.user_answer.clone(),
            is_correct: payload.is_correct,
            time_taken: payload.time_taken,
            answered_at: now,
        })?;
        let record = self.history.get(id)?;
        self.history_view(record)
    }

    // -- bookmarks ---------------------------------------------------------

    fn bookmark_view(&self, b: &BookmarkRecord) -> Result<Bookmark, CatalogError> {
        let question = self
            .questions
            .get(b.question.into_inner())
            .map(Self::contract_question)?;
        Ok(Bookmark {
            id: b.id,
            question,
            notes: b.notes.clone(),
            created_at: b.created_at,
        })
    }

    fn owned_bookmark(&self, user: UserId, id: BookmarkId) -> Result<&BookmarkRecord, CatalogError> {
        self.bookmarks
            .get(id.into_inner())
            .ok()
            .filter(|b| b.user == user)
            .ok_or_else(|| CatalogError::not_found("bookmark", id))
    }

    /// `user`'s bookmarks, newest first.
    pub fn bookmarks(&self, user: UserId) -> Vec<Bookmark> {
        let mut rows: Vec<&BookmarkRecord> =
            self.bookmarks.values().filter(|b| b.user == user).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.into_iter()
            .filter_map(|b| self.bookmark_view(b).ok())
            .collect()
    }

    /// Bookmark a question; each user may bookmark a question once.
    pub fn create_bookmark(
        &mut self,
        user: UserId,
        payload: &BookmarkCreate,
    ) -> Result<Bookmark, CatalogError> {
        self.questions.get(payload.question_id.into_inner())?;
        if self
            .bookmarks
            .values()
            .any(|b| b.user == user && b.question == payload.question_id)
        {
            return Err(CatalogError::Conflict(String::from(
                "You have already bookmarked this question.",
            )));
        }
        let id = self.bookmarks.insert(|raw| BookmarkRecord {
            id: BookmarkId::new(raw),
            user,
            question: payload.question_id,
            notes: payload.notes.clone(),
            created_at: Utc::now(),
        })?;
        let record = self.bookmarks.get(id)?;
        self.bookmark_view(record)
    }

    /// One of `user`'s bookmarks.
    pub fn bookmark(&self, user: UserId, id: BookmarkId) -> Result<Bookmark, CatalogError> {
        let record = self.owned_bookmark(user, id)?;
        self.bookmark_view(record)
    }

    /// Replace the notes on one of `user`'s bookmarks.
    pub fn update_bookmark(
        &mut self,
        user: UserId,
        id: BookmarkId,
        update: &BookmarkUpdate,
    ) -> Result<Bookmark, CatalogError> {
        self.owned_bookmark(user, id)?;
        let record = self.bookmarks.get_mut(id.into_inner())?;
        record.notes.clone_from(&update.notes);
        let record = self.bookmarks.get(id.into_inner())?;
        self.bookmark_view(record)
    }

    /// Delete one of `user`'s bookmarks.
    pub fn delete_bookmark(&mut self, user: UserId, id: BookmarkId) -> Result<(), CatalogError> {
        self.owned_bookmark(user, id)?;
        self.bookmarks.remove(id.into_inner());
        Ok(())
    }

    // -- scoring -----------------------------------------------------------

    /// Record a scoring event and fold it into player statistics.
    ///
    /// The team and player must belong to the tournament, and the player
    /// must be on the team when both are given. A player without a team
    /// credits the player's team.
    pub fn record_scoring_event(
        &mut self,
        tournament: TournamentId,
        payload: &ScoringEventCreate,
    ) -> Result<ScoringEvent, CatalogError> {
        self.tournament_record(tournament)?;

        if let Some(team_id) = payload.team_id {
            let team = self.teams.get(team_id.into_inner())?;
            if team.tournament != tournament {
                return Err(CatalogError::Validation(format!(
                    "Team {team_id} is not entered in tournament {tournament}"
                )));
            }
        }

        let mut team_id = payload.team_id;
        if let Some(player_id) = payload.player_id {
            let player = self.players.get(player_id.into_inner())?;
            let player_team = self.teams.get(player.team.into_inner())?;
            if player_team.tournament != tournament {
                return Err(CatalogError::Validation(format!(
                    "Player {player_id} is not entered in tournament {tournament}"
                )));
            }
            match team_id {
                Some(t) if t != player.team => {
                    return Err(CatalogError::Validation(format!(
                        "Player {player_id} is not on team {t}"
                    )));
                }
                Some(_) => {}
                None => team_id = Some(player.team),
            }
        }

        let points = scoring::resolve_points(payload.event_type, payload.points, payload.at_end);
        if let Some(player_id) = payload.player_id {
            let player = self.players.get_mut(player_id.into_inner())?;
            player.stats.apply(payload.event_type, points);
        }

        let timestamp = Utc::now();
        let id = self.events.insert(|raw| ScoringEvent {
            id: ScoringEventId::new(raw),
            tournament_id: tournament,
            event_type: payload.event_type,
            team_id,
            player_id: payload.player_id,
            points,
            timestamp,
        })?;
        tracing::info!(
            tournament_id = %tournament,
            event_id = id,
            event_type = payload.event_type.as_str(),
            points,
            "scoring event recorded"
        );
        self.events.get(id).cloned()
    }

    /// A tournament's scoring events, oldest first.
    pub fn scoring_events(&self, tournament: TournamentId) -> Result<Vec<ScoringEvent>, CatalogError> {
        self.tournament_record(tournament)?;
        Ok(self
            .events
            .values()
            .filter(|e| e.tournament_id == tournament)
            .cloned()
            .collect())
    }

    // -- pages -------------------------------------------------------------

    /// Number of tournaments, teams, questions, and users.
    pub fn counts(&self) -> CatalogCounts {
        CatalogCounts {
            tournaments: self.tournaments.len(),
            teams: self.teams.len(),
            questions: self.questions.len(),
            users: self.users.len(),
        }
    }
}

/// Row counts, logged at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCounts {
    /// Tournaments.
    pub tournaments: usize,
    /// Teams.
    pub teams: usize,
    /// Questions.
    pub questions: usize,
    /// Users.
    pub users: usize,
}

/// Which side won a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first team.
    Team1,
    /// The second team.
    Team2,
}

/// The winner of a game: the higher score once complete, none on a tie or
/// while the game is running.
pub const fn winner(is_complete: bool, team1_score: i32, team2_score: i32) -> Option<Side> {
    if !is_complete {
        return None;
    }
    if team1_score > team2_score {
        Some(Side::Team1)
    } else if team2_score > team1_score {
        Some(Side::Team2)
    } else {
        None
    }
}

fn sort_teams(rows: &mut [&TeamRecord]) {
    rows.sort_by(|a, b| {
        a.seed
            .is_none()
            .cmp(&b.seed.is_none())
            .then(a.seed.cmp(&b.seed))
            .then_with(|| a.name.cmp(&b.name))
    });
}
