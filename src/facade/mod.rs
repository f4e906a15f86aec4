//! Query facade: read-only assembly of nested stage views for the HTTP
//! layer.

pub mod models;
pub mod queries;

pub use models::{GroupView, StageView, StandingRow};
pub use queries::StandingsFacade;
