//! Integration tests for the SciBowl Arena HTTP endpoints.
//!
//! Most tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. The scoring `WebSocket` test serves the router on
//! an ephemeral localhost port and connects a real client.

#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use scibowl_core::config::ArenaConfig;
use scibowl_core::seed::SeedData;
use scibowl_server::router::build_router;
use scibowl_server::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

const SEED: &str = r#"{
    "users": [
        { "username": "director", "email": "td@example.com", "password": "director-pass",
          "first_name": "Tess", "last_name": "Director" }
    ],
    "tournaments": [
        {
            "name": "Bay Area Regional",
            "status": "REGISTRATION",
            "division": "HIGH_SCHOOL",
            "tournament_date": "2025-02-01",
            "location": "San Jose, CA",
            "director": "director",
            "teams": [
                { "name": "Lincoln A", "seed": 1, "players": [ { "name": "Ada", "grade_level": "11" } ] },
                { "name": "Adams A", "seed": 2, "players": [ { "name": "Grace", "grade_level": "12" } ] }
            ],
            "rooms": [ { "name": "Room 101" } ],
            "rounds": [ { "round_number": 1, "name": "Round 1" } ],
            "games": [
                { "round": 1, "room": "Room 101", "team1": "Lincoln A", "team2": "Adams A",
                  "team1_score": 40, "team2_score": 40, "is_complete": true }
            ]
        },
        {
            "name": "Middle School Open",
            "status": "COMPLETED",
            "division": "MIDDLE_SCHOOL",
            "tournament_date": "2024-11-09",
            "location": "Austin, TX"
        }
    ],
    "questions": [
        { "question_text": "What organelle produces most of a cell's ATP?", "answer": "Mitochondrion",
          "category": "BIOLOGY", "source": "MIT_2025", "difficulty": "easy" },
        { "question_text": "What is the SI unit of force?", "answer": "Newton",
          "category": "PHYSICS", "source": "MIT_2025", "difficulty": "easy" }
    ]
}"#;

fn make_test_state() -> Arc<AppState> {
    let catalog = SeedData::parse(SEED).unwrap().into_catalog().unwrap();
    AppState::new(catalog, &ArenaConfig::default()).shared()
}

fn app() -> (Router, Arc<AppState>) {
    let state = make_test_state();
    (build_router(Arc::clone(&state)), state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::builder().uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let resp = app
        .clone()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    (status, body_to_json(resp.into_body()).await)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> (StatusCode, Value) {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let resp = app
        .clone()
        .oneshot(req.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/auth/login",
        None,
        &json!({ "username": "director", "password": "director-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["access"].as_str().unwrap().to_owned()
}

/// Serve `app` on an ephemeral port for tests that need a real socket.
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

/// The upgrade completes before the handler subscribes, so poll.
async fn wait_for_subscribers(state: &AppState, expected: usize) {
    for _ in 0..200 {
        if state.tx.receiver_count() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(state.tx.receiver_count(), expected);
}

// =========================================================================
// Pages
// =========================================================================

#[tokio::test]
async fn home_page_links_only_to_tournaments() {
    let (app, _) = app();
    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_to_string(resp.into_body()).await;
    assert_eq!(html.matches("<a ").count(), 1);
    assert!(html.contains(r#"href="/tournaments""#));
}

#[tokio::test]
async fn tournaments_page_lists_catalog() {
    let (app, _) = app();
    let resp = app
        .oneshot(Request::builder().uri("/tournaments").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_to_string(resp.into_body()).await;
    assert!(html.contains("Bay Area Regional"));
    assert!(html.contains("Middle School Open"));
}

#[tokio::test]
async fn sandbox_counter_has_no_floor() {
    let (app, state) = app();
    let post = |uri: &'static str| {
        let app = app.clone();
        async move {
            let resp = app
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            body_to_string(resp.into_body()).await
        }
    };

    let html = post("/sandbox/increment").await;
    assert!(html.contains(">1</p>"));
    post("/sandbox/decrement").await;
    let html = post("/sandbox/decrement").await;
    assert!(html.contains(">-1</p>"));
    assert_eq!(state.sandbox.read().await.value(), -1);
}

// =========================================================================
// Tournaments
// =========================================================================

#[tokio::test]
async fn tournaments_ordered_by_date() {
    let (app, _) = app();
    let (status, body) = get(&app, "/api/tournaments", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Middle School Open", "Bay Area Regional"]);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn tournament_filters() {
    let (app, _) = app();
    let (_, body) = get(&app, "/api/tournaments?status=REGISTRATION,IN_PROGRESS", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["current_teams"], 2);

    let (_, body) = get(&app, "/api/tournaments?division=MIDDLE_SCHOOL", None).await;
    assert_eq!(body["data"][0]["name"], "Middle School Open");

    let (status, body) = get(&app, "/api/tournaments?status=POSTPONED", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn tournament_detail_and_children() {
    let (app, _) = app();
    let (status, body) = get(&app, "/api/tournaments/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["teams_count"], 2);
    assert_eq!(body["data"]["rooms_count"], 1);
    assert_eq!(body["data"]["director"]["username"], "director");

    let (_, body) = get(&app, "/api/tournaments/1/teams", None).await;
    assert_eq!(body["data"][0]["name"], "Lincoln A");
    assert_eq!(body["data"][0]["players_count"], 1);

    let (_, body) = get(&app, "/api/tournaments/1/games", None).await;
    assert_eq!(body["data"][0]["is_complete"], true);
    assert!(body["data"][0]["winner_name"].is_null());

    let (_, body) = get(&app, "/api/tournaments/1/rounds", None).await;
    assert_eq!(body["data"][0]["round_number"], 1);

    let (_, body) = get(&app, "/api/tournaments/1/rooms", None).await;
    assert_eq!(body["data"][0]["name"], "Room 101");
}

#[tokio::test]
async fn missing_tournament_is_enveloped_404() {
    let (app, _) = app();
    let (status, body) = get(&app, "/api/tournaments/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["data"].is_null());
    assert_eq!(body["error"], "tournament not found: 99");

    let (status, body) = get(&app, "/api/tournaments/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn create_tournament_requires_auth() {
    let (app, _) = app();
    let payload = json!({
        "name": "Winter Invitational",
        "date": "2025-12-06T09:00:00Z",
        "location": "Chicago, IL",
        "director_id": 1
    });
    let (status, body) = send_json(&app, "POST", "/api/tournaments", None, &payload).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["data"].is_null());

    let token = login(&app).await;
    let (status, body) = send_json(&app, "POST", "/api/tournaments", Some(&token), &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 3);
    assert_eq!(body["data"]["date"], "2025-12-06");
    assert_eq!(body["data"]["director_id"], 1);
}

#[tokio::test]
async fn create_tournament_validation_errors() {
    let (app, _) = app();
    let token = login(&app).await;
    let payload = json!({
        "name": "",
        "date": "2025-12-06T09:00:00Z",
        "location": "Chicago, IL",
        "director_id": 1
    });
    let (status, body) = send_json(&app, "POST", "/api/tournaments", Some(&token), &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Tournament name is required");

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/tournaments",
        Some(&token),
        &json!({ "name": "X", "date": "soon", "location": "Y", "director_id": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =========================================================================
// Scoring
// =========================================================================

#[tokio::test]
async fn scoring_event_updates_standings_and_broadcasts() {
    let (app, state) = app();
    let token = login(&app).await;
    let mut rx = state.subscribe();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/tournaments/1/scoring-events",
        Some(&token),
        &json!({ "event_type": "correct", "player_id": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["points"], 4);
    assert_eq!(body["data"]["team_id"], 1);

    let pushed = rx.try_recv().unwrap();
    assert_eq!(pushed.points, 4);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/tournaments/1/scoring-events",
        Some(&token),
        &json!({ "event_type": "bonus", "team_id": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["points"], 10);
    assert!(body["data"].get("player_id").is_none());

    let (_, body) = get(&app, "/api/tournaments/1/standings", None).await;
    assert_eq!(body["data"][0]["team_name"], "Adams A");
    assert_eq!(body["data"][0]["points"], 10);
    assert_eq!(body["data"][1]["points"], 4);

    let (_, body) = get(&app, "/api/players/1", None).await;
    assert_eq!(body["data"]["correct_buzzes"], 1);
    assert_eq!(body["data"]["total_points"], 4);

    let (_, body) = get(&app, "/api/tournaments/1/scoring-events", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn scoring_event_rejects_unknown_type_and_foreign_team() {
    let (app, _) = app();
    let token = login(&app).await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/tournaments/1/scoring-events",
        Some(&token),
        &json!({ "event_type": "steal" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/tournaments/2/scoring-events",
        Some(&token),
        &json!({ "event_type": "bonus", "team_id": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"].is_null());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_scoring_events_publish_in_id_order() {
    let (app, state) = app();
    let token = login(&app).await;
    let mut rx = state.subscribe();

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let app = app.clone();
        let token = token.clone();
        tasks.push(tokio::spawn(async move {
            send_json(
                &app,
                "POST",
                "/api/tournaments/1/scoring-events",
                Some(&token),
                &json!({ "event_type": "tossup" }),
            )
            .await
            .0
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::CREATED);
    }

    let mut ids = Vec::new();
    while let Ok(event) = rx.try_recv() {
        ids.push(event.id.into_inner());
    }
    assert_eq!(ids, (1..=16).collect::<Vec<u32>>());
}

#[tokio::test]
async fn scoring_socket_streams_one_tournament() {
    let (app, state) = app();
    let token = login(&app).await;
    let addr = serve(app.clone()).await;

    let (mut socket, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/ws/scoring?tournament=1"))
            .await
            .unwrap();
    wait_for_subscribers(&state, 1).await;

    // Another tournament's event is filtered out.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/tournaments/2/scoring-events",
        Some(&token),
        &json!({ "event_type": "tossup" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/tournaments/1/scoring-events",
        Some(&token),
        &json!({ "event_type": "correct", "player_id": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let event: Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();
    assert_eq!(event["tournament_id"], 1);
    assert_eq!(event["event_type"], "correct");
    assert_eq!(event["points"], 4);

    socket.close(None).await.unwrap();
    wait_for_subscribers(&state, 0).await;
}

// =========================================================================
// Questions
// =========================================================================

#[tokio::test]
async fn question_filters_and_bad_choice() {
    let (app, _) = app();
    let (_, body) = get(&app, "/api/questions?category=PHYSICS", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["answer"], "Newton");

    let (_, body) = get(&app, "/api/questions?search=atp", None).await;
    assert_eq!(body["data"][0]["category"], "BIOLOGY");

    let (status, body) = get(&app, "/api/questions?category=ASTROLOGY", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("ASTROLOGY"));
}

#[tokio::test]
async fn history_requires_auth_and_updates_stats() {
    let (app, _) = app();
    let (status, _) = get(&app, "/api/questions/history", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app).await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/questions/history",
        Some(&token),
        &json!({ "question_id": 2, "user_answer": "newton", "is_correct": true, "time_taken": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["question"]["id"], 2);

    let (_, body) = get(&app, "/api/questions/2", None).await;
    assert_eq!(body["data"]["times_answered"], 1);
    assert_eq!(body["data"]["accuracy_rate"], 100.0);

    let (_, body) = get(&app, "/api/profile", Some(&token)).await;
    assert_eq!(body["data"]["total_questions_answered"], 1);
    assert_eq!(body["data"]["correct_answers"], 1);
}

#[tokio::test]
async fn bookmark_lifecycle() {
    let (app, _) = app();
    let token = login(&app).await;
    let payload = json!({ "question_id": 1, "notes": "review" });

    let (status, body) =
        send_json(&app, "POST", "/api/questions/bookmarks", Some(&token), &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_u64().unwrap();

    let (status, body) =
        send_json(&app, "POST", "/api/questions/bookmarks", Some(&token), &payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You have already bookmarked this question.");

    let uri = format!("/api/questions/bookmarks/{id}");
    let (status, body) =
        send_json(&app, "PATCH", &uri, Some(&token), &json!({ "notes": "tricky" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notes"], "tricky");

    let (status, _) = send_json(&app, "DELETE", &uri, Some(&token), &Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =========================================================================
// Accounts
// =========================================================================

#[tokio::test]
async fn register_login_refresh_round_trip() {
    let (app, _) = app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        &json!({
            "username": "curie",
            "email": "marie@example.com",
            "password": "polonium84",
            "password_confirm": "polonium84"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["username"], "curie");
    assert!(body["data"].get("password").is_none());

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        &json!({ "username": "curie", "password": "polonium84" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let refresh = body["data"]["refresh"].as_str().unwrap().to_owned();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        &json!({ "refresh": refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["data"]["access"].as_str().unwrap().to_owned();

    let (status, body) = get(&app, "/api/profile", Some(&access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "marie@example.com");

    // A refresh token is not an access token.
    let (status, _) = get(&app, "/api/profile", Some(&refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_mismatch_and_duplicates() {
    let (app, _) = app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        &json!({
            "username": "curie",
            "email": "marie@example.com",
            "password": "polonium84",
            "password_confirm": "radium88"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password fields didn't match.");

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        &json!({
            "username": "Director",
            "email": "someone@example.com",
            "password": "password123",
            "password_confirm": "password123"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn whitespace_only_text_is_rejected() {
    let (app, _) = app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        &json!({
            "username": "     ",
            "email": "blank@example.com",
            "password": "polonium84",
            "password_confirm": "polonium84"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username must be at least 3 characters");

    let token = login(&app).await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/tournaments",
        Some(&token),
        &json!({
            "name": "   ",
            "date": "2025-12-06T09:00:00Z",
            "location": "   ",
            "director_id": 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Location is required; Tournament name is required"
    );

    let question = |text: &str, answer: &str| {
        json!({
            "question_text": text,
            "answer": answer,
            "category": "PHYSICS",
            "source": "MIT_2025",
            "difficulty": "easy"
        })
    };
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/questions",
        Some(&token),
        &question("  ", "Newton"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Question text is required");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/questions",
        Some(&token),
        &question("What is the SI unit of power?", " "),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Answer is required");
}

#[tokio::test]
async fn unknown_user_and_wrong_password_look_alike() {
    let (app, _) = app();
    let (status, unknown) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        &json!({ "username": "nobody", "password": "director-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, wrong) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        &json!({ "username": "director", "password": "wrong-pass" }),
    )
    .await;
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let (app, _) = app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        &json!({ "username": "director", "password": "nope-nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn profile_update_and_public_profile() {
    let (app, _) = app();
    let token = login(&app).await;
    let (status, body) = send_json(
        &app,
        "PATCH",
        "/api/profile",
        Some(&token),
        &json!({ "school": "Lincoln High", "grade_level": 12 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["school"], "Lincoln High");

    let (status, body) = get(&app, "/api/users/director", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["grade_level"], 12);
    assert!(body["data"].get("email").is_none());

    let (status, _) = get(&app, "/api/users/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =========================================================================
// Avatars
// =========================================================================

#[tokio::test]
async fn avatar_is_deterministic_svg() {
    let (app, _) = app();
    let fetch = |uri: &'static str| {
        let app = app.clone();
        async move {
            let resp = app
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(
                resp.headers().get(header::CONTENT_TYPE).unwrap(),
                "image/svg+xml"
            );
            body_to_string(resp.into_body()).await
        }
    };

    let a = fetch("/api/avatars/Ada?size=32").await;
    let b = fetch("/api/avatars/ada?size=32").await;
    let c = fetch("/api/avatars/grace?size=32").await;
    assert!(a.starts_with("<svg"));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[tokio::test]
async fn avatar_data_url_format() {
    let (app, _) = app();
    let (status, body) = get(&app, "/api/avatars/ada?format=data_url", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["data"]
            .as_str()
            .unwrap()
            .starts_with("data:image/svg+xml;base64,")
    );

    let (status, _) = get(&app, "/api/avatars/ada?format=png", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
