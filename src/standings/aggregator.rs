//! Applies and reverses match outcomes against stored standing rows.
//!
//! All functions here run inside a caller-owned transaction so that a
//! reverse/write/apply sequence commits or rolls back as one unit.

use sqlx::{Postgres, Transaction};

use super::delta::{StandingDelta, outcome_delta};
use crate::error::{EngineError, EngineResult};
use crate::group::{GroupId, TeamId};

/// Direction of an outcome application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Count the outcome into the standings
    Apply,
    /// Undo a previously counted outcome
    Reverse,
}

/// Apply (or reverse) one match outcome against both participants'
/// standing rows in `group_id`.
///
/// Both teams must already hold a standing row in the group; a missing
/// row is a consistency violation, not a user-facing error.
pub(crate) async fn apply_outcome(
    tx: &mut Transaction<'_, Postgres>,
    group_id: GroupId,
    team1_id: TeamId,
    team2_id: TeamId,
    team1_score: i32,
    team2_score: i32,
    sign: Sign,
) -> EngineResult<()> {
    let (delta1, delta2) = outcome_delta(team1_score, team2_score);
    let (delta1, delta2) = match sign {
        Sign::Apply => (delta1, delta2),
        Sign::Reverse => (-delta1, -delta2),
    };

    apply_delta(tx, group_id, team1_id, delta1).await?;
    apply_delta(tx, group_id, team2_id, delta2).await?;

    log::debug!(
        "{:?} outcome {team1_score}:{team2_score} for teams {team1_id}/{team2_id} in group {group_id}",
        sign,
    );

    Ok(())
}

/// Add one delta onto a single standing row
async fn apply_delta(
    tx: &mut Transaction<'_, Postgres>,
    group_id: GroupId,
    team_id: TeamId,
    delta: StandingDelta,
) -> EngineResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE group_standings
        SET matches_played = matches_played + $1,
            wins = wins + $2,
            losses = losses + $3,
            points = points + $4
        WHERE group_id = $5 AND team_id = $6
        "#,
    )
    .bind(delta.matches_played)
    .bind(delta.wins)
    .bind(delta.losses)
    .bind(delta.points)
    .bind(group_id)
    .bind(team_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(EngineError::Consistency(format!(
            "no standing row for team {team_id} in group {group_id}; \
             a team must be registered in a group before its matches count"
        )));
    }

    Ok(())
}
