//! Group manager: group lifecycle, roster membership, and the deletion
//! cascade that keeps standings consistent with the matches that remain.

use sqlx::{PgPool, Postgres, Row, Transaction};
use std::sync::Arc;

use super::models::{Group, GroupId, TeamId, roster_diff};
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::matches::Match;
use crate::stage::{StageFormat, StageId};
use crate::standings::{Sign, apply_outcome};

/// Group manager
#[derive(Clone)]
pub struct GroupManager {
    pool: Arc<PgPool>,
}

impl GroupManager {
    /// Create a new group manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a group under a stage, optionally seeding its roster with
    /// zero-initialized standings
    pub async fn create_group(
        &self,
        stage_id: StageId,
        name: &str,
        initial_teams: &[TeamId],
    ) -> EngineResult<Group> {
        let mut tx = self.pool.begin().await?;

        let group = insert_group(&mut tx, stage_id, name).await?;
        for &team_id in initial_teams {
            insert_standing_if_absent(&mut tx, group.id, team_id).await?;
        }

        tx.commit().await?;

        log::info!("Created group {} under stage {stage_id}", group.id);
        Ok(group)
    }

    /// Rename a group and, when `teams` is given, replace its roster
    pub async fn update_group(
        &self,
        group_id: GroupId,
        name: Option<&str>,
        teams: Option<&[TeamId]>,
    ) -> EngineResult<Group> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT id FROM groups WHERE id = $1 FOR UPDATE")
            .bind(group_id)
            .fetch_optional(&mut *tx)
            .await?;
        if row.is_none() {
            return Err(EngineError::not_found(EntityKind::Group, group_id));
        }

        if let Some(name) = name {
            sqlx::query("UPDATE groups SET name = $1 WHERE id = $2")
                .bind(name)
                .bind(group_id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(teams) = teams {
            replace_teams_in_tx(&mut tx, group_id, teams).await?;
        }

        let row = sqlx::query("SELECT id, stage_id, name, created_at FROM groups WHERE id = $1")
            .bind(group_id)
            .fetch_one(&mut *tx)
            .await?;
        let group = Group::from_row(&row);

        tx.commit().await?;

        Ok(group)
    }

    /// Delete a group, reversing the standings contribution of every
    /// completed match before its matches, standings, and the group row
    /// are removed. Atomic.
    pub async fn delete_group(&self, group_id: GroupId) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;
        delete_group_in_tx(&mut tx, group_id).await?;
        tx.commit().await?;

        log::info!("Deleted group {group_id}");
        Ok(())
    }

    /// Add a team to a group. Idempotent: an already-registered team is a
    /// no-op. Returns whether a standing row was created.
    pub async fn add_team(&self, group_id: GroupId, team_id: TeamId) -> EngineResult<bool> {
        let mut tx = self.pool.begin().await?;
        require_group(&mut tx, group_id).await?;
        let created = insert_standing_if_absent(&mut tx, group_id, team_id).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Remove a team's standing row from a group. Historical matches
    /// involving the team are left untouched; removal is standings-only.
    /// Returns whether a row was deleted.
    pub async fn remove_team(&self, group_id: GroupId, team_id: TeamId) -> EngineResult<bool> {
        let mut tx = self.pool.begin().await?;
        require_group(&mut tx, group_id).await?;
        let result =
            sqlx::query("DELETE FROM group_standings WHERE group_id = $1 AND team_id = $2")
                .bind(group_id)
                .bind(team_id)
                .execute(&mut *tx)
                .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a group's roster with `team_ids`: standings not in the list
    /// are removed, missing ones are created zero-initialized. The net
    /// effect is order-independent.
    pub async fn replace_teams(&self, group_id: GroupId, team_ids: &[TeamId]) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;
        require_group(&mut tx, group_id).await?;
        replace_teams_in_tx(&mut tx, group_id, team_ids).await?;
        tx.commit().await?;
        Ok(())
    }
}

async fn require_group(tx: &mut Transaction<'_, Postgres>, group_id: GroupId) -> EngineResult<()> {
    sqlx::query("SELECT id FROM groups WHERE id = $1")
        .bind(group_id)
        .fetch_optional(&mut **tx)
        .await?
        .map(|_| ())
        .ok_or(EngineError::not_found(EntityKind::Group, group_id))
}

/// Insert a group row after checking that the owning stage exists and
/// actually uses groups
pub(crate) async fn insert_group(
    tx: &mut Transaction<'_, Postgres>,
    stage_id: StageId,
    name: &str,
) -> EngineResult<Group> {
    let stage_row = sqlx::query("SELECT format FROM stages WHERE id = $1")
        .bind(stage_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(EngineError::not_found(EntityKind::Stage, stage_id))?;

    let format = StageFormat::from_str_or_custom(&stage_row.get::<String, _>("format"));
    if format != StageFormat::Groups {
        return Err(EngineError::Consistency(format!(
            "stage {stage_id} has format {} and cannot own groups",
            format.as_str()
        )));
    }

    let row = sqlx::query(
        r#"
        INSERT INTO groups (stage_id, name)
        VALUES ($1, $2)
        RETURNING id, stage_id, name, created_at
        "#,
    )
    .bind(stage_id)
    .bind(name)
    .fetch_one(&mut **tx)
    .await?;

    Ok(Group::from_row(&row))
}

/// Zero-initialize a standing row unless the (group, team) pair already
/// has one. Returns whether a row was created.
pub(crate) async fn insert_standing_if_absent(
    tx: &mut Transaction<'_, Postgres>,
    group_id: GroupId,
    team_id: TeamId,
) -> EngineResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO group_standings (group_id, team_id, matches_played, wins, losses, points)
        VALUES ($1, $2, 0, 0, 0, 0)
        ON CONFLICT (group_id, team_id) DO NOTHING
        "#,
    )
    .bind(group_id)
    .bind(team_id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Reconcile a group's roster against a desired team list
pub(crate) async fn replace_teams_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    group_id: GroupId,
    desired: &[TeamId],
) -> EngineResult<()> {
    let rows = sqlx::query("SELECT team_id FROM group_standings WHERE group_id = $1")
        .bind(group_id)
        .fetch_all(&mut **tx)
        .await?;
    let current: Vec<TeamId> = rows.iter().map(|row| row.get("team_id")).collect();

    let (to_add, to_remove) = roster_diff(&current, desired);

    for team_id in to_remove {
        sqlx::query("DELETE FROM group_standings WHERE group_id = $1 AND team_id = $2")
            .bind(group_id)
            .bind(team_id)
            .execute(&mut **tx)
            .await?;
    }
    for team_id in to_add {
        insert_standing_if_absent(tx, group_id, team_id).await?;
    }

    Ok(())
}

/// Delete a group inside an enclosing transaction: reverse every counted
/// match, then remove matches, standings, and finally the group row.
///
/// Shared between [`GroupManager::delete_group`] and the stage deletion
/// cascade so both run the identical sequence.
pub(crate) async fn delete_group_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    group_id: GroupId,
) -> EngineResult<()> {
    require_group(tx, group_id).await?;

    let rows = sqlx::query(
        r#"
        SELECT id, stage_id, group_id, team1_id, team2_id, score1, score2,
               scheduled_at, status, location, description, created_at
        FROM matches
        WHERE group_id = $1
        "#,
    )
    .bind(group_id)
    .fetch_all(&mut **tx)
    .await?;

    for row in &rows {
        let m = Match::from_row(row);
        if let Some((group_id, score1, score2)) = m.contribution() {
            apply_outcome(
                tx,
                group_id,
                m.team1_id,
                m.team2_id,
                score1,
                score2,
                Sign::Reverse,
            )
            .await?;
        }
    }

    sqlx::query("DELETE FROM matches WHERE group_id = $1")
        .bind(group_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM group_standings WHERE group_id = $1")
        .bind(group_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM groups WHERE id = $1")
        .bind(group_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
