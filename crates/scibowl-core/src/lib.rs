//! Domain logic for SciBowl Arena.
//!
//! Everything the HTTP layer needs that does not touch the network lives
//! here: configuration, the in-memory catalog, match scoring, accounts and
//! tokens, startup seed data, and the sandbox counter.
//!
//! # Modules
//!
//! - [`auth`] -- Argon2 password hashing and HS256 access/refresh tokens.
//! - [`config`] -- Configuration loading from `scibowl-config.yaml` into
//!   strongly-typed structs.
//! - [`sandbox`] -- The counter behind the `/sandbox` page.
//! - [`scoring`] -- MoSS point values, player statistics, and standings.
//! - [`seed`] -- JSON seed files loaded into a [`Catalog`] at startup.
//! - [`store`] -- The [`Catalog`] of tournaments, questions, and users.
//!
//! [`Catalog`]: store::Catalog

pub mod auth;
pub mod config;
pub mod sandbox;
pub mod scoring;
pub mod seed;
pub mod store;
