//! Question bank, answer history, and bookmark endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/questions` | List with filters, search, and ordering |
//! | `POST` | `/api/questions` | Submit a question (bearer) |
//! | `GET` | `/api/questions/{id}` | One question |
//! | `GET`/`POST` | `/api/questions/history` | The caller's attempts (bearer) |
//! | `GET`/`POST` | `/api/questions/bookmarks` | The caller's bookmarks (bearer) |
//! | `GET`/`PATCH`/`DELETE` | `/api/questions/bookmarks/{id}` | One bookmark (bearer) |

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use scibowl_core::store::{QuestionParams, QuestionQuery};
use scibowl_types::{
    Bookmark, BookmarkCreate, BookmarkId, BookmarkUpdate, HistoryCreate, HistoryEntry,
    QuestionCreate, QuestionDetail, QuestionId,
};

use crate::error::{ApiError, ApiResult, Created, created, ok};
use crate::extract::{AuthUser, PathId, ValidJson};
use crate::state::AppState;

/// List questions.
///
/// # Query Parameters
///
/// - `category`, `question_type`, `question_style`: exact tag match
/// - `source`: exact source match
/// - `search`: case-insensitive substring of the question text
/// - `ordering`: `created_at`, `-created_at` (default), `times_answered`,
///   or `-times_answered`
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuestionParams>,
) -> ApiResult<Vec<QuestionDetail>> {
    let query = QuestionQuery::from_params(&params)?;
    Ok(ok(state.catalog.read().await.list_questions(&query)))
}

/// Submit a question.
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<QuestionCreate>,
) -> Created<QuestionDetail> {
    let question = state.catalog.write().await.create_question(&payload)?;
    tracing::info!(submitted_by = %user, question_id = %question.question.id, "question submitted");
    Ok(created(question))
}

/// One question with answer and statistics.
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<QuestionId>,
) -> ApiResult<QuestionDetail> {
    Ok(ok(state.catalog.read().await.question(id)?))
}

// ---------------------------------------------------------------------------
// Answer history
// ---------------------------------------------------------------------------

/// The caller's attempts, newest first.
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Vec<HistoryEntry>> {
    Ok(ok(state.catalog.read().await.history(user)))
}

/// Record an attempt.
pub async fn record_history(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<HistoryCreate>,
) -> Created<HistoryEntry> {
    let entry = state.catalog.write().await.record_history(user, &payload)?;
    Ok(created(entry))
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

/// The caller's bookmarks, newest first.
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Vec<Bookmark>> {
    Ok(ok(state.catalog.read().await.bookmarks(user)))
}

/// Bookmark a question.
pub async fn create_bookmark(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<BookmarkCreate>,
) -> Created<Bookmark> {
    let bookmark = state.catalog.write().await.create_bookmark(user, &payload)?;
    Ok(created(bookmark))
}

/// One of the caller's bookmarks.
pub async fn get_bookmark(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<BookmarkId>,
    AuthUser(user): AuthUser,
) -> ApiResult<Bookmark> {
    Ok(ok(state.catalog.read().await.bookmark(user, id)?))
}

/// Replace a bookmark's notes.
pub async fn update_bookmark(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<BookmarkId>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<BookmarkUpdate>,
) -> ApiResult<Bookmark> {
    Ok(ok(state
        .catalog
        .write()
        .await
        .update_bookmark(user, id, &payload)?))
}

/// Delete a bookmark.
pub async fn delete_bookmark(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<BookmarkId>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, ApiError> {
    state.catalog.write().await.delete_bookmark(user, id)?;
    Ok(StatusCode::NO_CONTENT)
}
