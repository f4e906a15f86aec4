//! # Tourney Core
//!
//! The standings engine behind a tournament-listing site: the
//! tournament → stage → group → match hierarchy with cascading lifecycle
//! rules and incrementally maintained, reversible group standings.
//!
//! ## Architecture
//!
//! Writes go through three managers, reads through one facade, all over a
//! shared PostgreSQL pool:
//!
//! - [`StageManager`]: stage lifecycle and the top of the deletion cascade
//! - [`GroupManager`]: groups, rosters, and standings rows
//! - [`MatchManager`]: match lifecycle with standings upkeep
//! - [`StandingsFacade`]: nested read views (stage → groups → standings/matches)
//!
//! The invariant the whole crate exists for: every standing row is always
//! the exact sum of outcome contributions from completed matches with two
//! recorded scores in its group. Each contribution is a reversible
//! [`StandingDelta`](standings::StandingDelta); applying is addition,
//! un-applying is negation, and every multi-step write runs in a single
//! database transaction.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tourney_core::db::{Database, DatabaseConfig};
//! use tourney_core::stage::{NewStage, StageFormat, StageManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()).await?;
//!     let stages = StageManager::new(Arc::new(db.pool().clone()));
//!
//!     let mut stage = NewStage::new(1, "Group Stage", StageFormat::Groups);
//!     stage.initial_groups = vec!["Group A".to_string(), "Group B".to_string()];
//!     let created = stages.create_stage(stage).await?;
//!     println!("Created stage: {}", created.id);
//!
//!     Ok(())
//! }
//! ```

/// Database connection pooling and configuration.
pub mod db;
pub use db::{Database, DatabaseConfig};

/// Engine error taxonomy.
pub mod error;
pub use error::{EngineError, EngineResult, EntityKind};

/// Stage lifecycle and cascade.
pub mod stage;
pub use stage::StageManager;

/// Groups, rosters, and standing rows.
pub mod group;
pub use group::GroupManager;

/// Matches and standings upkeep.
pub mod matches;
pub use matches::MatchManager;

/// The reversible standings delta and its aggregator.
pub mod standings;

/// Read-side view assembly.
pub mod facade;
pub use facade::StandingsFacade;
