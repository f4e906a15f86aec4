//! Stage module: the top level of the stage → group → match hierarchy.
//!
//! A stage belongs to one tournament and, depending on its format, owns
//! either round-robin groups or directly-attached matches. Deleting a
//! stage cascades through everything it owns.

pub mod manager;
pub mod models;

pub use manager::StageManager;
pub use models::{
    GroupSpec, NewStage, Stage, StageFormat, StageId, StageStatus, StageUpdate, TournamentId,
};
