//! Farmstead - a small farming-game server
//!
//! Farmstead tracks each player's farm progression: experience points,
//! levels, and the plants, irrigation methods and tools unlocked along
//! the way. Everything is served over a localhost JSON API.
//!
//! ## Layers
//!
//! 1. **Domain** (`domain`): levels, unlocks, plants, player progress.
//! 2. **Progression** (`progression`): the engine that turns experience
//!    grants into level-ups and assembles the dashboard view.
//! 3. **Store** (`store`): SQLite persistence for users, sessions and
//!    the game catalog.
//! 4. **Server** (`server`): the HTTP API used by the web client.

pub mod auth;
pub mod config;
pub mod domain;
pub mod game;
pub mod progression;
pub mod server;
pub mod store;

pub use domain::*;
pub use game::GameManager;
