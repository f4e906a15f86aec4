//! The reversible standings delta.
//!
//! A completed match contributes one [`StandingDelta`] to each participant's
//! standing row. Reversal is negation, so applying and un-applying an outcome
//! share a single code path instead of duplicated win/loss/draw branching.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Points awarded for a win (classic football scoring)
pub const WIN_POINTS: i32 = 3;

/// Points awarded for a draw
pub const DRAW_POINTS: i32 = 1;

/// The contribution of one match outcome to one team's standing row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandingDelta {
    /// Change in matches played
    pub matches_played: i32,
    /// Change in wins
    pub wins: i32,
    /// Change in losses
    pub losses: i32,
    /// Change in points
    pub points: i32,
}

impl StandingDelta {
    /// Delta for the winning side of a decided match
    pub fn win() -> Self {
        Self {
            matches_played: 1,
            wins: 1,
            losses: 0,
            points: WIN_POINTS,
        }
    }

    /// Delta for the losing side of a decided match
    pub fn loss() -> Self {
        Self {
            matches_played: 1,
            wins: 0,
            losses: 1,
            points: 0,
        }
    }

    /// Delta for either side of a drawn match
    pub fn draw() -> Self {
        Self {
            matches_played: 1,
            wins: 0,
            losses: 0,
            points: DRAW_POINTS,
        }
    }

    /// Whether this delta changes nothing
    pub fn is_zero(self) -> bool {
        self == Self::default()
    }
}

impl Neg for StandingDelta {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            matches_played: -self.matches_played,
            wins: -self.wins,
            losses: -self.losses,
            points: -self.points,
        }
    }
}

impl Add for StandingDelta {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            matches_played: self.matches_played + rhs.matches_played,
            wins: self.wins + rhs.wins,
            losses: self.losses + rhs.losses,
            points: self.points + rhs.points,
        }
    }
}

impl AddAssign for StandingDelta {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for StandingDelta {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

/// Classify a finished score line into the per-team deltas `(for_team1, for_team2)`.
///
/// Ties in score value are draws, never errors. Negative scores are not
/// validated here; classification is plain comparison.
pub fn outcome_delta(team1_score: i32, team2_score: i32) -> (StandingDelta, StandingDelta) {
    match team1_score.cmp(&team2_score) {
        Ordering::Greater => (StandingDelta::win(), StandingDelta::loss()),
        Ordering::Less => (StandingDelta::loss(), StandingDelta::win()),
        Ordering::Equal => (StandingDelta::draw(), StandingDelta::draw()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decided_match_deltas() {
        let (home, away) = outcome_delta(2, 1);
        assert_eq!(home, StandingDelta::win());
        assert_eq!(away, StandingDelta::loss());

        let (home, away) = outcome_delta(0, 3);
        assert_eq!(home, StandingDelta::loss());
        assert_eq!(away, StandingDelta::win());
    }

    #[test]
    fn test_draw_deltas() {
        let (home, away) = outcome_delta(1, 1);
        assert_eq!(home, StandingDelta::draw());
        assert_eq!(away, StandingDelta::draw());

        // 0:0 is a draw, not "no result"
        let (home, away) = outcome_delta(0, 0);
        assert_eq!(home.matches_played, 1);
        assert_eq!(away.points, DRAW_POINTS);
    }

    #[test]
    fn test_negative_scores_classify_by_comparison() {
        let (home, away) = outcome_delta(-1, -3);
        assert_eq!(home, StandingDelta::win());
        assert_eq!(away, StandingDelta::loss());
    }

    #[test]
    fn test_reversal_is_negation() {
        let (home, away) = outcome_delta(4, 2);
        assert!((home + -home).is_zero());
        assert!((away - away).is_zero());
    }

    #[test]
    fn test_points_arithmetic() {
        assert_eq!(StandingDelta::win().points, 3);
        assert_eq!(StandingDelta::draw().points, 1);
        assert_eq!(StandingDelta::loss().points, 0);
    }

    #[test]
    fn test_add_assign_accumulates() {
        let mut total = StandingDelta::default();
        total += StandingDelta::win();
        total += StandingDelta::draw();
        total += StandingDelta::loss();
        assert_eq!(total.matches_played, 3);
        assert_eq!(total.wins, 1);
        assert_eq!(total.losses, 1);
        assert_eq!(total.points, 4);
    }
}
