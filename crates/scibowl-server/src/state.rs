//! Shared application state for the SciBowl Arena server.
//!
//! [`AppState`] owns the catalog, the token issuer, the avatar cache, the
//! sandbox counter, and the broadcast channel that fans scoring events out
//! to `WebSocket` clients. It is wrapped in an [`Arc`](std::sync::Arc) and
//! injected via Axum's `State` extractor.

use std::sync::{Arc, Mutex, PoisonError};

use scibowl_avatar::AvatarCache;
use scibowl_core::auth::TokenIssuer;
use scibowl_core::config::ArenaConfig;
use scibowl_core::sandbox::Counter;
use scibowl_core::store::Catalog;
use scibowl_types::ScoringEvent;
use tokio::sync::{RwLock, broadcast};

/// Capacity of the broadcast channel for scoring events.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
pub const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
pub struct AppState {
    /// Every tournament, question, and user.
    pub catalog: RwLock<Catalog>,
    /// Signs and verifies bearer tokens.
    pub tokens: TokenIssuer,
    /// Rendered avatars. Held only for lookup and insert.
    pub avatars: Mutex<AvatarCache>,
    /// Avatar edge length when a request gives none.
    pub avatar_default_size: u32,
    /// The `/sandbox` counter.
    pub sandbox: RwLock<Counter>,
    /// Broadcast sender for recorded scoring events.
    pub tx: broadcast::Sender<ScoringEvent>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("avatar_default_size", &self.avatar_default_size)
            .field("subscribers", &self.tx.receiver_count())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build the state around `catalog` using `config`'s auth and avatar
    /// settings.
    pub fn new(catalog: Catalog, config: &ArenaConfig) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            catalog: RwLock::new(catalog),
            tokens: TokenIssuer::from_config(&config.auth),
            avatars: Mutex::new(AvatarCache::new(config.avatar.cache_capacity)),
            avatar_default_size: config.avatar.default_size,
            sandbox: RwLock::new(Counter::new()),
            tx,
        }
    }

    /// Wrap in an [`Arc`] for the router.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Subscribe to the scoring event channel.
    pub fn subscribe(&self) -> broadcast::Receiver<ScoringEvent> {
        self.tx.subscribe()
    }

    /// Publish a scoring event to all connected clients.
    ///
    /// Returns the number of receivers that received the message; 0 when
    /// no clients are connected.
    pub fn broadcast(&self, event: &ScoringEvent) -> usize {
        self.tx.send(event.clone()).unwrap_or(0)
    }

    /// The avatar SVG for a normalized identity, rendered on a cache miss.
    pub fn avatar_svg(&self, identity: &str, size: u32) -> Arc<str> {
        self.avatars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .svg(identity, size)
    }
}
