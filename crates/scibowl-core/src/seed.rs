//! Startup data loaded from a JSON seed file.
//!
//! The seed file describes users, tournaments (with their teams, players,
//! rooms, rounds, and games), and questions. Cross references inside the
//! file are by name: a tournament names its director by username, and a
//! game names its round by number, its room by name, and its teams by name.

use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use scibowl_types::{
    Division, GameId, PlayerId, QuestionCreate, RoomId, RoomStatus, RoundId, TeamId,
    TournamentFormat, TournamentId, TournamentStatus, UserId,
};

use crate::auth::{AuthError, hash_password};
use crate::scoring::PlayerStats;
use crate::store::{
    Catalog, CatalogError, GameRecord, PlayerRecord, RoomRecord, RoundRecord, TeamRecord,
    TournamentRecord, UserRecord,
};

/// Errors that can occur when loading seed data.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Failed to read the seed file from disk.
    #[error("failed to read seed file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The file is not valid seed JSON.
    #[error("failed to parse seed JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// A record is invalid or references something that does not exist.
    #[error("invalid seed data: {0}")]
    Invalid(String),

    /// A seed password could not be hashed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The catalog rejected a record.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Contents of a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    /// Accounts, created first so tournaments can name directors.
    #[serde(default)]
    pub users: Vec<SeedUser>,
    /// Tournaments with everything that belongs to them.
    #[serde(default)]
    pub tournaments: Vec<SeedTournament>,
    /// Question bank.
    #[serde(default)]
    pub questions: Vec<QuestionCreate>,
}

/// A seeded account.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Plain-text password, hashed on load.
    pub password: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Affiliated school.
    #[serde(default)]
    pub school: Option<String>,
    /// Grade level.
    #[serde(default)]
    pub grade_level: Option<u32>,
}

/// A seeded tournament.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedTournament {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Division.
    #[serde(default = "default_division")]
    pub division: Division,
    /// Bracket format.
    #[serde(default = "default_format")]
    pub format: TournamentFormat,
    /// Lifecycle status.
    #[serde(default = "default_status")]
    pub status: TournamentStatus,
    /// Day of play.
    pub tournament_date: NaiveDate,
    /// Last day to register.
    #[serde(default)]
    pub registration_deadline: Option<NaiveDate>,
    /// City or address.
    pub location: String,
    /// Venue name.
    #[serde(default)]
    pub venue: String,
    /// Hosting organization.
    #[serde(default)]
    pub host_organization: String,
    /// Username of the director.
    #[serde(default)]
    pub director: Option<String>,
    /// Team cap.
    #[serde(default)]
    pub max_teams: Option<u32>,
    /// Public website.
    #[serde(default)]
    pub website_url: String,
    /// Registration form.
    #[serde(default)]
    pub registration_url: String,
    /// Entered teams.
    #[serde(default)]
    pub teams: Vec<SeedTeam>,
    /// Rooms.
    #[serde(default)]
    pub rooms: Vec<SeedRoom>,
    /// Rounds.
    #[serde(default)]
    pub rounds: Vec<SeedRound>,
    /// Games.
    #[serde(default)]
    pub games: Vec<SeedGame>,
}

/// A seeded team.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedTeam {
    /// Team name, unique within the tournament.
    pub name: String,
    /// School.
    #[serde(default)]
    pub school: String,
    /// Seed number.
    #[serde(default)]
    pub seed: Option<u32>,
    /// Pool label.
    #[serde(default)]
    pub pool: String,
    /// Roster.
    #[serde(default)]
    pub players: Vec<SeedPlayer>,
}

/// A seeded player.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPlayer {
    /// Full name.
    pub name: String,
    /// Grade level as printed on the roster.
    #[serde(default)]
    pub grade_level: String,
}

/// A seeded room.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRoom {
    /// Room name, unique within the tournament.
    pub name: String,
    /// Status.
    #[serde(default = "default_room_status")]
    pub status: RoomStatus,
    /// Round being played.
    #[serde(default)]
    pub current_round: u32,
}

/// A seeded round.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRound {
    /// Round number, unique within the tournament.
    pub round_number: u32,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Packet used.
    #[serde(default)]
    pub packet_name: String,
}

/// A seeded game.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedGame {
    /// Round number.
    pub round: u32,
    /// Room name.
    pub room: String,
    /// First team's name.
    pub team1: String,
    /// Second team's name.
    pub team2: String,
    /// First team's score.
    #[serde(default)]
    pub team1_score: i32,
    /// Second team's score.
    #[serde(default)]
    pub team2_score: i32,
    /// Tossup being read.
    #[serde(default)]
    pub current_tossup: u32,
    /// Whether the game has finished.
    #[serde(default)]
    pub is_complete: bool,
}

const fn default_division() -> Division {
    Division::HighSchool
}

const fn default_format() -> TournamentFormat {
    TournamentFormat::RoundRobin
}

const fn default_status() -> TournamentStatus {
    TournamentStatus::Upcoming
}

const fn default_room_status() -> RoomStatus {
    RoomStatus::NotStarted
}

impl SeedData {
    /// Read a seed file.
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse seed JSON.
    pub fn parse(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a catalog holding exactly this data.
    pub fn into_catalog(self) -> Result<Catalog, SeedError> {
        let mut catalog = Catalog::new();
        let now = Utc::now();

        let mut users: HashMap<String, UserId> = HashMap::new();
        for user in self.users {
            let key = user.username.to_lowercase();
            if users.contains_key(&key) {
                return Err(SeedError::Invalid(format!(
                    "duplicate username {}",
                    user.username
                )));
            }
            let password_hash = hash_password(&user.password)?;
            let id = catalog.users.insert(|raw| UserRecord {
                id: UserId::new(raw),
                username: user.username,
                email: user.email,
                password_hash,
                first_name: user.first_name,
                last_name: user.last_name,
                bio: user.bio,
                school: user.school,
                grade_level: user.grade_level,
                total_questions_answered: 0,
                correct_answers: 0,
                created_at: now,
                updated_at: now,
            })?;
            users.insert(key, UserId::new(id));
        }

        for tournament in self.tournaments {
            seed_tournament(&mut catalog, &users, tournament)?;
        }

        for question in &self.questions {
            question
                .validate()
                .map_err(|err| SeedError::Invalid(format!("question: {err}")))?;
            catalog.create_question(question)?;
        }

        let counts = catalog.counts();
        tracing::info!(
            tournaments = counts.tournaments,
            teams = counts.teams,
            questions = counts.questions,
            users = counts.users,
            "seed data loaded"
        );
        Ok(catalog)
    }
}

fn seed_tournament(
    catalog: &mut Catalog,
    users: &HashMap<String, UserId>,
    seed: SeedTournament,
) -> Result<(), SeedError> {
    let director = seed
        .director
        .as_deref()
        .map(|name| {
            users.get(&name.to_lowercase()).copied().ok_or_else(|| {
                SeedError::Invalid(format!(
                    "tournament {} names unknown director {name}",
                    seed.name
                ))
            })
        })
        .transpose()?;

    let now = Utc::now();
    let tournament = TournamentId::new(catalog.tournaments.insert(|raw| TournamentRecord {
        id: TournamentId::new(raw),
        name: seed.name.clone(),
        description: seed.description,
        division: seed.division,
        format: seed.format,
        status: seed.status,
        tournament_date: seed.tournament_date,
        registration_deadline: seed.registration_deadline,
        location: seed.location,
        venue: seed.venue,
        host_organization: seed.host_organization,
        director,
        max_teams: seed.max_teams,
        website_url: seed.website_url,
        registration_url: seed.registration_url,
        created_at: now,
        updated_at: now,
    })?);

    let mut teams: HashMap<String, TeamId> = HashMap::new();
    for team in seed.teams {
        if teams.contains_key(&team.name) {
            return Err(SeedError::Invalid(format!(
                "tournament {} has two teams named {}",
                seed.name, team.name
            )));
        }
        let team_id = TeamId::new(catalog.teams.insert(|raw| TeamRecord {
            id: TeamId::new(raw),
            tournament,
            name: team.name.clone(),
            school: team.school,
            seed: team.seed,
            pool: team.pool,
        })?);
        for player in team.players {
            catalog.players.insert(|raw| PlayerRecord {
                id: PlayerId::new(raw),
                team: team_id,
                name: player.name,
                grade_level: player.grade_level,
                stats: PlayerStats::default(),
            })?;
        }
        teams.insert(team.name, team_id);
    }

    let mut rooms: HashMap<String, RoomId> = HashMap::new();
    for room in seed.rooms {
        let id = RoomId::new(catalog.rooms.insert(|raw| RoomRecord {
            id: RoomId::new(raw),
            tournament,
            name: room.name.clone(),
            status: room.status,
            current_round: room.current_round,
        })?);
        rooms.insert(room.name, id);
    }

    let mut rounds: HashMap<u32, RoundId> = HashMap::new();
    for round in seed.rounds {
        if rounds.contains_key(&round.round_number) {
            return Err(SeedError::Invalid(format!(
                "tournament {} has two rounds numbered {}",
                seed.name, round.round_number
            )));
        }
        let id = RoundId::new(catalog.rounds.insert(|raw| RoundRecord {
            id: RoundId::new(raw),
            tournament,
            round_number: round.round_number,
            name: round.name,
            packet_name: round.packet_name,
        })?);
        rounds.insert(round.round_number, id);
    }

    for game in seed.games {
        let missing = |what: &str, key: &str| {
            SeedError::Invalid(format!(
                "game in tournament {} references unknown {what} {key}",
                seed.name
            ))
        };
        let round = *rounds
            .get(&game.round)
            .ok_or_else(|| missing("round", &game.round.to_string()))?;
        let room = *rooms
            .get(&game.room)
            .ok_or_else(|| missing("room", &game.room))?;
        let team1 = *teams
            .get(&game.team1)
            .ok_or_else(|| missing("team", &game.team1))?;
        let team2 = *teams
            .get(&game.team2)
            .ok_or_else(|| missing("team", &game.team2))?;
        if team1 == team2 {
            return Err(SeedError::Invalid(format!(
                "game in tournament {} pairs {} with itself",
                seed.name, game.team1
            )));
        }
        let started = (game.is_complete || game.current_tossup > 0).then_some(now);
        catalog.games.insert(|raw| GameRecord {
            id: GameId::new(raw),
            tournament,
            round,
            room,
            team1,
            team2,
            team1_score: game.team1_score,
            team2_score: game.team2_score,
            current_tossup: game.current_tossup,
            is_complete: game.is_complete,
            started_at: started,
            completed_at: game.is_complete.then_some(now),
        })?;
    }

    tracing::debug!(tournament_id = %tournament, name = %seed.name, "seeded tournament");
    Ok(())
}
