//! The standings aggregator: keeps each standing row exactly equal to the
//! sum of contributions from completed matches in its group.
//!
//! The reusable idea is the reversible delta: a match outcome is a pair of
//! [`StandingDelta`]s, applying is struct addition, reversing is negation.
//! Match create/edit/delete all reduce to at most one reversal of the old
//! contribution and one application of the new one.

pub mod aggregator;
pub mod delta;

pub(crate) use aggregator::{Sign, apply_outcome};
pub use delta::{DRAW_POINTS, StandingDelta, WIN_POINTS, outcome_delta};
