//! Scenario tests for the standings algebra.
//!
//! These drive the pure delta layer the way the managers do: creating a
//! completed match applies its deltas, editing reverses the old record's
//! deltas and applies the merged record's, deleting reverses. A small
//! in-memory table stands in for the standing rows.

use std::collections::HashMap;

use chrono::Utc;
use tourney_core::group::{GroupStanding, TeamId};
use tourney_core::matches::{Match, MatchStatus, MatchUpdate};
use tourney_core::standings::outcome_delta;

struct Table {
    rows: HashMap<TeamId, GroupStanding>,
}

impl Table {
    fn with_teams(group_id: i64, teams: &[TeamId]) -> Self {
        let rows = teams
            .iter()
            .map(|&team_id| (team_id, GroupStanding::zero(group_id, team_id)))
            .collect();
        Self { rows }
    }

    fn apply_match(&mut self, m: &Match, reverse: bool) {
        let Some((_, score1, score2)) = m.contribution() else {
            return;
        };
        let (mut delta1, mut delta2) = outcome_delta(score1, score2);
        if reverse {
            delta1 = -delta1;
            delta2 = -delta2;
        }
        self.rows.get_mut(&m.team1_id).unwrap().apply(delta1);
        self.rows.get_mut(&m.team2_id).unwrap().apply(delta2);
    }

    fn edit(&mut self, m: &Match, update: MatchUpdate) -> Match {
        let merged = update.merged_into(m);
        self.apply_match(m, true);
        self.apply_match(&merged, false);
        merged
    }

    fn stats(&self, team_id: TeamId) -> (i32, i32, i32, i32) {
        let row = &self.rows[&team_id];
        (row.matches_played, row.wins, row.losses, row.points)
    }
}

fn completed_match(group_id: i64, team1_id: TeamId, team2_id: TeamId, s1: i32, s2: i32) -> Match {
    Match {
        id: 1,
        stage_id: 1,
        group_id: Some(group_id),
        team1_id,
        team2_id,
        score1: Some(s1),
        score2: Some(s2),
        scheduled_at: Utc::now(),
        status: MatchStatus::Completed,
        location: None,
        description: None,
        created_at: Utc::now(),
    }
}

const X: TeamId = 1;
const Y: TeamId = 2;
const Z: TeamId = 3;

#[test]
fn create_edit_delete_walkthrough() {
    // Group "A" with teams X, Y, Z all starting at 0/0/0/0
    let mut table = Table::with_teams(1, &[X, Y, Z]);

    // X beats Y 2:1
    let m = completed_match(1, X, Y, 2, 1);
    table.apply_match(&m, false);
    assert_eq!(table.stats(X), (1, 1, 0, 3));
    assert_eq!(table.stats(Y), (1, 0, 1, 0));
    assert_eq!(table.stats(Z), (0, 0, 0, 0));

    // Edited to a 1:1 draw
    let m = table.edit(
        &m,
        MatchUpdate {
            score1: Some(Some(1)),
            score2: Some(Some(1)),
            ..Default::default()
        },
    );
    assert_eq!(table.stats(X), (1, 0, 0, 1));
    assert_eq!(table.stats(Y), (1, 0, 0, 1));

    // Deleted: everyone back to zero
    table.apply_match(&m, true);
    assert_eq!(table.stats(X), (0, 0, 0, 0));
    assert_eq!(table.stats(Y), (0, 0, 0, 0));
    assert_eq!(table.stats(Z), (0, 0, 0, 0));
}

#[test]
fn noop_edit_does_not_double_count() {
    let mut table = Table::with_teams(1, &[X, Y]);
    let m = completed_match(1, X, Y, 2, 0);
    table.apply_match(&m, false);

    // Re-submitting the identical result reverses then re-applies; the
    // net delta must be zero, not a second application
    let m = table.edit(&m, MatchUpdate::result(2, 0));
    table.edit(&m, MatchUpdate::result(2, 0));

    assert_eq!(table.stats(X), (1, 1, 0, 3));
    assert_eq!(table.stats(Y), (1, 0, 1, 0));
}

#[test]
fn score_edit_flips_winner() {
    let mut table = Table::with_teams(1, &[X, Y]);
    let m = completed_match(1, X, Y, 2, 0);
    table.apply_match(&m, false);

    let (_, _, _, x_points_before) = table.stats(X);
    table.edit(&m, MatchUpdate::result(1, 3));

    assert_eq!(table.stats(X), (1, 0, 1, 0));
    assert_eq!(table.stats(Y), (1, 1, 0, 3));
    assert_eq!(table.stats(X).3, x_points_before - 3);
}

#[test]
fn team_swap_edit_moves_contribution_to_new_teams() {
    let mut table = Table::with_teams(1, &[X, Y, Z]);
    let m = completed_match(1, X, Y, 3, 0);
    table.apply_match(&m, false);

    // The reversal targets the old teams, the application the new ones
    table.edit(
        &m,
        MatchUpdate {
            team2_id: Some(Z),
            ..Default::default()
        },
    );

    assert_eq!(table.stats(X), (1, 1, 0, 3));
    assert_eq!(table.stats(Y), (0, 0, 0, 0));
    assert_eq!(table.stats(Z), (1, 0, 1, 0));
}

#[test]
fn cancel_edit_removes_contribution() {
    let mut table = Table::with_teams(1, &[X, Y]);
    let m = completed_match(1, X, Y, 1, 1);
    table.apply_match(&m, false);
    assert_eq!(table.stats(X), (1, 0, 0, 1));

    // A canceled match no longer satisfies the contribution predicate
    table.edit(
        &m,
        MatchUpdate {
            status: Some(MatchStatus::Canceled),
            ..Default::default()
        },
    );
    assert_eq!(table.stats(X), (0, 0, 0, 0));
    assert_eq!(table.stats(Y), (0, 0, 0, 0));
}

#[test]
fn points_invariant_holds_across_a_round_robin() {
    let mut table = Table::with_teams(1, &[X, Y, Z]);
    for m in [
        completed_match(1, X, Y, 2, 1),
        completed_match(1, Y, Z, 0, 0),
        completed_match(1, Z, X, 1, 4),
    ] {
        table.apply_match(&m, false);
    }

    for team in [X, Y, Z] {
        let (played, wins, losses, points) = table.stats(team);
        let draws = played - wins - losses;
        assert_eq!(points, 3 * wins + draws);
    }

    // X won twice, Y drew once, Z drew once
    assert_eq!(table.stats(X), (2, 2, 0, 6));
    assert_eq!(table.stats(Y), (2, 0, 1, 1));
    assert_eq!(table.stats(Z), (2, 0, 1, 1));
}
