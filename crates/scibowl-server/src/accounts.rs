//! Registration, login, token refresh, and profile endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/auth/register` | Create an account |
//! | `POST` | `/api/auth/login` | Exchange credentials for a token pair |
//! | `POST` | `/api/auth/refresh` | Exchange a refresh token for an access token |
//! | `GET`/`PATCH` | `/api/profile` | The caller's profile (bearer) |
//! | `GET` | `/api/users/{username}` | Public profile |

use std::sync::Arc;

use axum::extract::{Path, State};
use scibowl_core::auth::{check_credentials, hash_password};
use scibowl_core::store::CatalogError;
use scibowl_types::{
    AccessToken, LoginRequest, ProfileUpdate, PublicProfile, RefreshRequest, TokenPair, User,
    UserCreate, UserProfile,
};

use crate::error::{ApiError, ApiResult, Created, created, ok};
use crate::extract::{AuthUser, ValidJson};
use crate::state::AppState;

/// Register an account. The password is hashed off the async runtime.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<UserCreate>,
) -> Created<User> {
    let password = payload.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| ApiError::Internal(format!("password hashing task failed: {err}")))??;
    let user = state
        .catalog
        .write()
        .await
        .register(&payload, password_hash)?;
    Ok(created(user))
}

/// Log in with username and password.
///
/// The account is looked up under the catalog read lock; the Argon2 check
/// runs on a blocking thread after the lock is released. Unknown usernames
/// are verified against a dummy hash so they take as long as a wrong
/// password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> ApiResult<TokenPair> {
    let candidate = state.catalog.read().await.credentials(&payload.username);
    let password = payload.password.clone();
    let user = tokio::task::spawn_blocking(move || {
        let (user, hash) = candidate.unzip();
        check_credentials(&password, hash.as_deref())
            .then_some(user)
            .flatten()
    })
    .await
    .map_err(|err| ApiError::Internal(format!("password check task failed: {err}")))?
    .ok_or_else(|| {
        tracing::info!(username = %payload.username, "login rejected");
        CatalogError::invalid_credentials()
    })?;
    let pair = state.tokens.issue_pair(user.id)?;
    tracing::info!(user_id = %user.id, "login succeeded");
    Ok(ok(pair))
}

/// Exchange a refresh token for a new access token.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<RefreshRequest>,
) -> ApiResult<AccessToken> {
    let access = state.tokens.refresh(&payload.refresh)?;
    Ok(ok(AccessToken { access }))
}

/// The caller's private profile.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<UserProfile> {
    Ok(ok(state.catalog.read().await.profile(user)?))
}

/// Update the caller's profile.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<ProfileUpdate>,
) -> ApiResult<UserProfile> {
    Ok(ok(state
        .catalog
        .write()
        .await
        .update_profile(user, &payload)?))
}

/// Another user's public profile.
pub async fn public_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> ApiResult<PublicProfile> {
    Ok(ok(state.catalog.read().await.public_profile(&username)?))
}
