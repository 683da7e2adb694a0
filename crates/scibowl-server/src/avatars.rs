//! `GET /api/avatars/{username}` -- deterministic SVG avatars.
//!
//! The username is normalized (trimmed, lowercased) before rendering, so
//! `Ada` and ` ada ` share an avatar. The user does not need to exist.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use scibowl_avatar::{normalize_identity, svg_data_url};

use crate::error::{ApiError, ok};
use crate::state::AppState;

/// Query parameters for the avatar endpoint.
#[derive(Debug, Default, serde::Deserialize)]
pub struct AvatarQuery {
    /// Edge length in pixels, clamped to `[8, 256]`. Unparseable values
    /// fall back to the configured default.
    pub size: Option<String>,
    /// `svg` (default) or `data_url` for a JSON-wrapped `data:` URI.
    pub format: Option<String>,
}

/// Resolve the requested size against the configured default.
fn requested_size(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// Render the avatar for `username`.
pub async fn avatar(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<AvatarQuery>,
) -> Result<Response, ApiError> {
    let identity = normalize_identity(&username);
    if identity.is_empty() {
        return Err(ApiError::BadRequest(String::from("Username is required")));
    }
    let size = requested_size(query.size.as_deref(), state.avatar_default_size);
    let svg = state.avatar_svg(&identity, size);

    match query.format.as_deref().map(str::trim) {
        None | Some("" | "svg") => Ok((
            [
                (CONTENT_TYPE, "image/svg+xml"),
                (CACHE_CONTROL, "public, max-age=86400"),
            ],
            svg.to_string(),
        )
            .into_response()),
        Some("data_url") => Ok(ok(svg_data_url(&svg)).into_response()),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unknown avatar format: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing_falls_back_to_default() {
        assert_eq!(requested_size(Some("128"), 64), 128);
        assert_eq!(requested_size(Some(" 32 "), 64), 32);
        assert_eq!(requested_size(Some("big"), 64), 64);
        assert_eq!(requested_size(Some("-5"), 64), 64);
        assert_eq!(requested_size(None, 48), 48);
    }
}
