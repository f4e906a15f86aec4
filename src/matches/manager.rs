//! Match manager: match lifecycle with incremental standings upkeep.
//!
//! Every mutation follows the same shape inside one transaction: reverse
//! the old contribution if there was one, persist, apply the new
//! contribution if there is one. Edits that move a match between teams or
//! groups need no special bookkeeping because the reversal targets the old
//! record and the application targets the merged one.

use sqlx::{PgPool, Postgres, Row, Transaction};
use std::sync::Arc;

use super::models::{Match, MatchId, MatchStatus, MatchUpdate, NewMatch};
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::group::GroupId;
use crate::stage::StageId;
use crate::standings::{Sign, apply_outcome};

const MATCH_COLUMNS: &str = "id, stage_id, group_id, team1_id, team2_id, score1, score2, \
                             scheduled_at, status, location, description, created_at";

/// Match manager
#[derive(Clone)]
pub struct MatchManager {
    pool: Arc<PgPool>,
}

impl MatchManager {
    /// Create a new match manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a match under a stage (and optionally a group of that
    /// stage). A match created directly with a completed score line is
    /// counted into the standings in the same transaction.
    pub async fn create_match(&self, new: NewMatch) -> EngineResult<Match> {
        if new.team1_id == new.team2_id {
            return Err(EngineError::Validation(format!(
                "a match needs two distinct teams, got team {} twice",
                new.team1_id
            )));
        }

        let mut tx = self.pool.begin().await?;

        require_stage(&mut tx, new.stage_id).await?;
        if let Some(group_id) = new.group_id {
            require_group_in_stage(&mut tx, group_id, new.stage_id).await?;
        }

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO matches
                (stage_id, group_id, team1_id, team2_id, score1, score2,
                 scheduled_at, status, location, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {MATCH_COLUMNS}
            "#,
        ))
        .bind(new.stage_id)
        .bind(new.group_id)
        .bind(new.team1_id)
        .bind(new.team2_id)
        .bind(new.score1)
        .bind(new.score2)
        .bind(new.scheduled_at.naive_utc())
        .bind(new.status.as_str())
        .bind(&new.location)
        .bind(&new.description)
        .fetch_one(&mut *tx)
        .await?;
        let created = Match::from_row(&row);

        if let Some((group_id, score1, score2)) = created.contribution() {
            apply_outcome(
                &mut tx,
                group_id,
                created.team1_id,
                created.team2_id,
                score1,
                score2,
                Sign::Apply,
            )
            .await?;
        }

        tx.commit().await?;

        log::info!(
            "Created match {} ({} vs {}) under stage {}",
            created.id,
            created.team1_id,
            created.team2_id,
            created.stage_id
        );
        Ok(created)
    }

    /// Edit a match. The stored record's contribution is reversed first,
    /// the merged record is persisted, and the merged record's
    /// contribution (if any) is applied, all in one transaction; a no-op
    /// edit of a completed match nets to zero rather than double
    /// counting.
    pub async fn update_match(&self, match_id: MatchId, update: MatchUpdate) -> EngineResult<Match> {
        let mut tx = self.pool.begin().await?;

        let old = fetch_match_for_update(&mut tx, match_id).await?;
        let merged = update.merged_into(&old);

        if merged.team1_id == merged.team2_id {
            return Err(EngineError::Validation(format!(
                "a match needs two distinct teams, got team {} twice",
                merged.team1_id
            )));
        }
        if update.group_id.is_some() {
            if let Some(group_id) = merged.group_id {
                require_group_in_stage(&mut tx, group_id, merged.stage_id).await?;
            }
        }

        if let Some((group_id, score1, score2)) = old.contribution() {
            apply_outcome(
                &mut tx,
                group_id,
                old.team1_id,
                old.team2_id,
                score1,
                score2,
                Sign::Reverse,
            )
            .await?;
        }

        sqlx::query(
            r#"
            UPDATE matches
            SET group_id = $1, team1_id = $2, team2_id = $3, score1 = $4, score2 = $5,
                scheduled_at = $6, status = $7, location = $8, description = $9
            WHERE id = $10
            "#,
        )
        .bind(merged.group_id)
        .bind(merged.team1_id)
        .bind(merged.team2_id)
        .bind(merged.score1)
        .bind(merged.score2)
        .bind(merged.scheduled_at.naive_utc())
        .bind(merged.status.as_str())
        .bind(&merged.location)
        .bind(&merged.description)
        .bind(match_id)
        .execute(&mut *tx)
        .await?;

        if let Some((group_id, score1, score2)) = merged.contribution() {
            apply_outcome(
                &mut tx,
                group_id,
                merged.team1_id,
                merged.team2_id,
                score1,
                score2,
                Sign::Apply,
            )
            .await?;
        }

        tx.commit().await?;

        log::info!("Updated match {match_id}");
        Ok(merged)
    }

    /// Delete a match, reversing its standings contribution first when it
    /// has one
    pub async fn delete_match(&self, match_id: MatchId) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;

        let old = fetch_match_for_update(&mut tx, match_id).await?;

        if let Some((group_id, score1, score2)) = old.contribution() {
            apply_outcome(
                &mut tx,
                group_id,
                old.team1_id,
                old.team2_id,
                score1,
                score2,
                Sign::Reverse,
            )
            .await?;
        }

        sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!("Deleted match {match_id}");
        Ok(())
    }

    /// Convenience wrapper for the common admin action of entering a
    /// final score
    pub async fn record_result(
        &self,
        match_id: MatchId,
        score1: i32,
        score2: i32,
    ) -> EngineResult<Match> {
        self.update_match(match_id, MatchUpdate::result(score1, score2))
            .await
    }

    /// Cancel a match; a previously counted result is reversed
    pub async fn cancel_match(&self, match_id: MatchId) -> EngineResult<Match> {
        self.update_match(
            match_id,
            MatchUpdate {
                status: Some(MatchStatus::Canceled),
                ..Default::default()
            },
        )
        .await
    }
}

async fn fetch_match_for_update(
    tx: &mut Transaction<'_, Postgres>,
    match_id: MatchId,
) -> EngineResult<Match> {
    let row = sqlx::query(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1 FOR UPDATE"
    ))
    .bind(match_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(EngineError::not_found(EntityKind::Match, match_id))?;

    Ok(Match::from_row(&row))
}

async fn require_stage(tx: &mut Transaction<'_, Postgres>, stage_id: StageId) -> EngineResult<()> {
    sqlx::query("SELECT id FROM stages WHERE id = $1")
        .bind(stage_id)
        .fetch_optional(&mut **tx)
        .await?
        .map(|_| ())
        .ok_or(EngineError::not_found(EntityKind::Stage, stage_id))
}

/// A match's group must belong to the match's own stage
async fn require_group_in_stage(
    tx: &mut Transaction<'_, Postgres>,
    group_id: GroupId,
    stage_id: StageId,
) -> EngineResult<()> {
    let row = sqlx::query("SELECT stage_id FROM groups WHERE id = $1")
        .bind(group_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(EngineError::not_found(EntityKind::Group, group_id))?;

    let owner: StageId = row.get("stage_id");
    if owner != stage_id {
        return Err(EngineError::Consistency(format!(
            "group {group_id} belongs to stage {owner}, not stage {stage_id}"
        )));
    }
    Ok(())
}
