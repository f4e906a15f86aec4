//! Group and standings data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::stage::StageId;
use crate::standings::StandingDelta;

/// Group ID type
pub type GroupId = i64;

/// Team ID type
pub type TeamId = i64;

/// Standing row ID type
pub type StandingId = i64;

/// A subdivision of a stage in which a fixed set of teams play matches
/// tracked by a standings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group ID
    pub id: GroupId,
    /// Owning stage
    pub stage_id: StageId,
    /// Group name (e.g. "Group A")
    pub name: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub(crate) fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            stage_id: row.get("stage_id"),
            name: row.get("name"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        }
    }
}

/// The materialized aggregate for one (group, team) pair.
///
/// Invariant: always the exact sum of contributions of completed matches
/// with both scores present in that group involving that team, with
/// `points == 3 * wins + 1 * draws`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStanding {
    /// Standing row ID
    pub id: StandingId,
    /// Owning group
    pub group_id: GroupId,
    /// Referenced team
    pub team_id: TeamId,
    /// Completed matches counted
    pub matches_played: i32,
    /// Wins
    pub wins: i32,
    /// Losses
    pub losses: i32,
    /// Points (3 per win, 1 per draw)
    pub points: i32,
}

impl GroupStanding {
    /// A zero-initialized standing for a team newly added to a group
    pub fn zero(group_id: GroupId, team_id: TeamId) -> Self {
        Self {
            id: 0,
            group_id,
            team_id,
            matches_played: 0,
            wins: 0,
            losses: 0,
            points: 0,
        }
    }

    /// Draws are implied rather than stored
    pub fn draws(&self) -> i32 {
        self.matches_played - self.wins - self.losses
    }

    /// Apply an outcome contribution (or its negation, for a reversal)
    pub fn apply(&mut self, delta: StandingDelta) {
        self.matches_played += delta.matches_played;
        self.wins += delta.wins;
        self.losses += delta.losses;
        self.points += delta.points;
    }
}

/// Compute the roster reconciliation for [`replace_teams`]: which teams to
/// add and which to remove, as a pure set difference. Order-independent;
/// duplicates in `desired` are collapsed.
///
/// [`replace_teams`]: crate::group::GroupManager::replace_teams
pub fn roster_diff(current: &[TeamId], desired: &[TeamId]) -> (Vec<TeamId>, Vec<TeamId>) {
    let mut to_add: Vec<TeamId> = desired
        .iter()
        .copied()
        .filter(|team_id| !current.contains(team_id))
        .collect();
    to_add.sort_unstable();
    to_add.dedup();

    let mut to_remove: Vec<TeamId> = current
        .iter()
        .copied()
        .filter(|team_id| !desired.contains(team_id))
        .collect();
    to_remove.sort_unstable();
    to_remove.dedup();

    (to_add, to_remove)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::outcome_delta;

    #[test]
    fn test_zero_standing() {
        let standing = GroupStanding::zero(7, 42);
        assert_eq!(standing.matches_played, 0);
        assert_eq!(standing.points, 0);
        assert_eq!(standing.draws(), 0);
    }

    #[test]
    fn test_apply_and_reverse_round_trip() {
        let mut standing = GroupStanding::zero(1, 1);
        let (delta, _) = outcome_delta(2, 0);

        standing.apply(delta);
        assert_eq!(standing.matches_played, 1);
        assert_eq!(standing.wins, 1);
        assert_eq!(standing.points, 3);

        standing.apply(-delta);
        assert_eq!(standing, GroupStanding::zero(1, 1));
    }

    #[test]
    fn test_draws_are_implied() {
        let mut standing = GroupStanding::zero(1, 1);
        let (delta, _) = outcome_delta(1, 1);
        standing.apply(delta);
        standing.apply(delta);
        let (win, _) = outcome_delta(3, 0);
        standing.apply(win);

        assert_eq!(standing.matches_played, 3);
        assert_eq!(standing.draws(), 2);
        assert_eq!(standing.points, 3 + 1 + 1);
    }

    #[test]
    fn test_roster_diff() {
        let (to_add, to_remove) = roster_diff(&[1, 2, 3], &[2, 3, 4]);
        assert_eq!(to_add, vec![4]);
        assert_eq!(to_remove, vec![1]);
    }

    #[test]
    fn test_roster_diff_is_order_independent() {
        let (a1, r1) = roster_diff(&[3, 1, 2], &[4, 2]);
        let (a2, r2) = roster_diff(&[1, 2, 3], &[2, 4]);
        assert_eq!(a1, a2);
        assert_eq!(r1, r2);
    }

    #[test]
    fn test_roster_diff_empty_desired_removes_all() {
        let (to_add, to_remove) = roster_diff(&[5, 6], &[]);
        assert!(to_add.is_empty());
        assert_eq!(to_remove, vec![5, 6]);
    }

    #[test]
    fn test_roster_diff_collapses_duplicates() {
        let (to_add, to_remove) = roster_diff(&[], &[7, 7, 8]);
        assert_eq!(to_add, vec![7, 8]);
        assert!(to_remove.is_empty());
    }
}
