//! HTTP server for SciBowl Arena.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Pages**: the home page (`/`), the tournaments listing
//!   (`/tournaments`), and the sandbox counter (`/sandbox`)
//! - **REST endpoints** (`/api/...`) for tournaments, teams, games,
//!   questions, practice history, bookmarks, accounts, and avatars, all
//!   answering with an [`ApiResponse`](scibowl_types::ApiResponse) envelope
//! - **`WebSocket` endpoint** (`/ws/scoring`) streaming scoring events via
//!   [`tokio::sync::broadcast`]
//!
//! # Architecture
//!
//! Handlers share one [`AppState`]. The catalog sits behind a
//! `tokio::sync::RwLock`: reads share it, writes are short and exclusive.
//! Recorded scoring events are broadcast to every connected socket, and
//! lagging sockets skip ahead.

pub mod accounts;
pub mod avatars;
pub mod error;
pub mod extract;
pub mod pages;
pub mod questions;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod tournaments;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::{StartupError, run};
pub use state::AppState;
