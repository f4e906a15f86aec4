//! Group module: groups, their rosters, and the materialized standings.
//!
//! Teams are never owned here; membership is the existence of a
//! [`GroupStanding`] row, created zero-initialized when a team joins and
//! deleted when it leaves. Removing a team is standings-only: matches it
//! already played stay recorded.

pub mod manager;
pub mod models;

pub use manager::GroupManager;
pub use models::{Group, GroupId, GroupStanding, StandingId, TeamId, roster_diff};
