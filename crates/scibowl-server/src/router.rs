//! Axum router construction for the SciBowl Arena server.
//!
//! Assembles pages, the REST API, and the scoring `WebSocket` into a single
//! [`Router`] with CORS and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{accounts, avatars, pages, questions, tournaments, ws};

/// Build the complete Axum router.
///
/// CORS allows any origin so the browser client can be served from
/// another host during development.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(pages::home))
        .route("/tournaments", get(pages::tournaments))
        .route("/sandbox", get(pages::sandbox))
        .route("/sandbox/increment", post(pages::sandbox_increment))
        .route("/sandbox/decrement", post(pages::sandbox_decrement))
        // WebSocket
        .route("/ws/scoring", get(ws::ws_scoring))
        // Tournaments
        .route(
            "/api/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route("/api/tournaments/{id}", get(tournaments::get_tournament))
        .route("/api/tournaments/{id}/teams", get(tournaments::tournament_teams))
        .route("/api/tournaments/{id}/rooms", get(tournaments::tournament_rooms))
        .route("/api/tournaments/{id}/rounds", get(tournaments::tournament_rounds))
        .route("/api/tournaments/{id}/games", get(tournaments::tournament_games))
        .route(
            "/api/tournaments/{id}/standings",
            get(tournaments::tournament_standings),
        )
        .route(
            "/api/tournaments/{id}/scoring-events",
            get(tournaments::list_scoring_events).post(tournaments::record_scoring_event),
        )
        .route("/api/teams", get(tournaments::list_teams))
        .route("/api/teams/{id}", get(tournaments::get_team))
        .route("/api/teams/{id}/players", get(tournaments::team_players))
        .route("/api/players/{id}", get(tournaments::get_player))
        .route("/api/rooms", get(tournaments::list_rooms))
        .route("/api/rooms/{id}", get(tournaments::get_room))
        .route("/api/games", get(tournaments::list_games))
        .route("/api/games/{id}", get(tournaments::get_game))
        // Questions
        .route(
            "/api/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/api/questions/history",
            get(questions::list_history).post(questions::record_history),
        )
        .route(
            "/api/questions/bookmarks",
            get(questions::list_bookmarks).post(questions::create_bookmark),
        )
        .route(
            "/api/questions/bookmarks/{id}",
            get(questions::get_bookmark)
                .patch(questions::update_bookmark)
                .delete(questions::delete_bookmark),
        )
        .route("/api/questions/{id}", get(questions::get_question))
        // Accounts
        .route("/api/auth/register", post(accounts::register))
        .route("/api/auth/login", post(accounts::login))
        .route("/api/auth/refresh", post(accounts::refresh))
        .route(
            "/api/profile",
            get(accounts::get_profile).patch(accounts::update_profile),
        )
        .route("/api/users/{username}", get(accounts::public_profile))
        // Avatars
        .route("/api/avatars/{username}", get(avatars::avatar))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
