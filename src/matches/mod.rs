//! Match module: fixtures and the mutations that keep standings in sync.

pub mod manager;
pub mod models;

pub use manager::MatchManager;
pub use models::{Match, MatchId, MatchStatus, MatchUpdate, NewMatch};
