//! Tournament, team, room, game, and live scoring endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/tournaments` | List (`?status=A,B&division=X`) |
//! | `POST` | `/api/tournaments` | Create (bearer) |
//! | `GET` | `/api/tournaments/{id}` | Detail with counts and director |
//! | `GET` | `/api/tournaments/{id}/teams` | Entered teams |
//! | `GET` | `/api/tournaments/{id}/rooms` | Rooms |
//! | `GET` | `/api/tournaments/{id}/rounds` | Rounds |
//! | `GET` | `/api/tournaments/{id}/games` | Games |
//! | `GET` | `/api/tournaments/{id}/standings` | Team standings |
//! | `GET` | `/api/tournaments/{id}/scoring-events` | Recorded events |
//! | `POST` | `/api/tournaments/{id}/scoring-events` | Record an event (bearer) |
//! | `GET` | `/api/teams`, `/api/teams/{id}`, `/api/teams/{id}/players` | Teams |
//! | `GET` | `/api/players/{id}` | One player |
//! | `GET` | `/api/rooms`, `/api/rooms/{id}` | Rooms |
//! | `GET` | `/api/games`, `/api/games/{id}` | Games |

use std::sync::Arc;

use axum::extract::{Query, State};
use scibowl_core::store::{TournamentFilter, TournamentParams};
use scibowl_types::{
    Game, GameId, Player, PlayerId, Room, RoomId, Round, ScoringEvent, ScoringEventCreate, Team,
    TeamId, TeamStanding, Tournament, TournamentCreate, TournamentDetail, TournamentId,
    TournamentSummary,
};

use crate::error::{ApiResult, Created, created, ok};
use crate::extract::{AuthUser, PathId, ValidJson};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

/// List tournaments ordered by date, then name.
///
/// # Query Parameters
///
/// - `status`: comma-separated status tags (e.g. `UPCOMING,REGISTRATION`)
/// - `division`: one division tag
pub async fn list_tournaments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TournamentParams>,
) -> ApiResult<Vec<TournamentSummary>> {
    let filter = TournamentFilter::from_params(&params);
    Ok(ok(state.catalog.read().await.list_tournaments(&filter)))
}

/// Create a tournament.
pub async fn create_tournament(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<TournamentCreate>,
) -> Created<Tournament> {
    let tournament = state.catalog.write().await.create_tournament(&payload)?;
    tracing::info!(created_by = %user, tournament_id = %tournament.id, "tournament created via API");
    Ok(created(tournament))
}

/// One tournament with counts and director.
pub async fn get_tournament(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<TournamentId>,
) -> ApiResult<TournamentDetail> {
    Ok(ok(state.catalog.read().await.tournament(id)?))
}

/// Teams entered in a tournament.
pub async fn tournament_teams(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<TournamentId>,
) -> ApiResult<Vec<Team>> {
    Ok(ok(state.catalog.read().await.teams_of(id)?))
}

/// Rooms of a tournament.
pub async fn tournament_rooms(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<TournamentId>,
) -> ApiResult<Vec<Room>> {
    Ok(ok(state.catalog.read().await.rooms_of(id)?))
}

/// Rounds of a tournament.
pub async fn tournament_rounds(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<TournamentId>,
) -> ApiResult<Vec<Round>> {
    Ok(ok(state.catalog.read().await.rounds_of(id)?))
}

/// Games of a tournament.
pub async fn tournament_games(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<TournamentId>,
) -> ApiResult<Vec<Game>> {
    Ok(ok(state.catalog.read().await.games_of(id)?))
}

/// Team standings computed from the tournament's scoring events.
pub async fn tournament_standings(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<TournamentId>,
) -> ApiResult<Vec<TeamStanding>> {
    Ok(ok(state.catalog.read().await.standings(id)?))
}

// ---------------------------------------------------------------------------
// Scoring events
// ---------------------------------------------------------------------------

/// Scoring events recorded for a tournament, oldest first.
pub async fn list_scoring_events(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<TournamentId>,
) -> ApiResult<Vec<ScoringEvent>> {
    Ok(ok(state.catalog.read().await.scoring_events(id)?))
}

/// Record a scoring event and push it to `WebSocket` subscribers.
pub async fn record_scoring_event(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<TournamentId>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<ScoringEventCreate>,
) -> Created<ScoringEvent> {
    let mut catalog = state.catalog.write().await;
    let event = catalog.record_scoring_event(id, &payload)?;
    // Publish before releasing the lock so subscribers see events in id order.
    let receivers = state.broadcast(&event);
    drop(catalog);
    tracing::debug!(recorded_by = %user, event_id = %event.id, receivers, "scoring event published");
    Ok(created(event))
}

// ---------------------------------------------------------------------------
// Teams and players
// ---------------------------------------------------------------------------

/// Every team.
pub async fn list_teams(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Team>> {
    Ok(ok(state.catalog.read().await.teams()))
}

/// One team.
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<TeamId>,
) -> ApiResult<Team> {
    Ok(ok(state.catalog.read().await.team(id)?))
}

/// A team's roster.
pub async fn team_players(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<TeamId>,
) -> ApiResult<Vec<Player>> {
    Ok(ok(state.catalog.read().await.players_of(id)?))
}

/// One player with statistics.
pub async fn get_player(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<PlayerId>,
) -> ApiResult<Player> {
    Ok(ok(state.catalog.read().await.player(id)?))
}

// ---------------------------------------------------------------------------
// Rooms and games
// ---------------------------------------------------------------------------

/// Every room.
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Room>> {
    Ok(ok(state.catalog.read().await.rooms()))
}

/// One room.
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<RoomId>,
) -> ApiResult<Room> {
    Ok(ok(state.catalog.read().await.room(id)?))
}

/// Every game.
pub async fn list_games(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Game>> {
    Ok(ok(state.catalog.read().await.games()))
}

/// One game.
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<GameId>,
) -> ApiResult<Game> {
    Ok(ok(state.catalog.read().await.game(id)?))
}
