//! `WebSocket` handler for live scoring.
//!
//! Clients connect to `GET /ws/scoring` and receive a JSON-encoded
//! [`ScoringEvent`] text frame each time an event is recorded. Passing
//! `?tournament={id}` restricts the stream to one tournament.
//!
//! If a client falls behind, lagged messages are skipped and the client
//! resumes from the most recent event.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use scibowl_types::{ScoringEvent, TournamentId};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Query parameters for the scoring stream.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ScoringStreamQuery {
    /// Only forward events from this tournament.
    pub tournament: Option<u32>,
}

/// Whether `event` passes the subscriber's filter.
fn wanted(filter: Option<TournamentId>, event: &ScoringEvent) -> bool {
    filter.is_none_or(|id| id == event.tournament_id)
}

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming scoring events.
///
/// # Route
///
/// `GET /ws/scoring`
pub async fn ws_scoring(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScoringStreamQuery>,
) -> impl IntoResponse {
    let filter = query.tournament.map(TournamentId::new);
    ws.on_upgrade(move |socket| handle_ws(socket, state, filter))
}

/// Subscribe to the broadcast channel and forward matching events until
/// the client leaves or the channel closes.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, filter: Option<TournamentId>) {
    debug!(tournament = ?filter, "scoring WebSocket client connected");

    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if !wanted(filter, &event) {
                            continue;
                        }
                        let json = match serde_json::to_string(&event) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize scoring event: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    // Client text and binary frames are ignored.
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use scibowl_types::{ScoringEventId, ScoringEventType};

    use super::*;

    fn event(tournament: u32) -> ScoringEvent {
        ScoringEvent {
            id: ScoringEventId::new(1),
            tournament_id: TournamentId::new(tournament),
            event_type: ScoringEventType::Correct,
            team_id: None,
            player_id: None,
            points: 4,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn unfiltered_stream_gets_everything() {
        assert!(wanted(None, &event(1)));
        assert!(wanted(None, &event(2)));
    }

    #[test]
    fn tournament_filter_applies() {
        let filter = Some(TournamentId::new(2));
        assert!(!wanted(filter, &event(1)));
        assert!(wanted(filter, &event(2)));
    }
}
