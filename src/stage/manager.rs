//! Stage manager: stage lifecycle and the top of the deletion cascade.

use sqlx::{PgPool, Postgres, Row, Transaction};
use std::sync::Arc;

use super::models::{GroupSpec, NewStage, Stage, StageFormat, StageId, StageUpdate};
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::group::manager::{delete_group_in_tx, insert_group, replace_teams_in_tx};
use crate::group::GroupId;

const STAGE_COLUMNS: &str =
    "id, tournament_id, name, format, status, starts_on, ends_on, description, created_at";

/// Stage manager
#[derive(Clone)]
pub struct StageManager {
    pool: Arc<PgPool>,
}

impl StageManager {
    /// Create a new stage manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a stage, optionally with its initial (empty) groups
    pub async fn create_stage(&self, new: NewStage) -> EngineResult<Stage> {
        if new.format != StageFormat::Groups && !new.initial_groups.is_empty() {
            return Err(EngineError::Validation(format!(
                "initial groups are only valid for the groups format, not {}",
                new.format.as_str()
            )));
        }

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO stages (tournament_id, name, format, status, starts_on, ends_on, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STAGE_COLUMNS}
            "#,
        ))
        .bind(new.tournament_id)
        .bind(&new.name)
        .bind(new.format.as_str())
        .bind(new.status.as_str())
        .bind(new.starts_on)
        .bind(new.ends_on)
        .bind(&new.description)
        .fetch_one(&mut *tx)
        .await?;
        let stage = Stage::from_row(&row);

        for name in &new.initial_groups {
            insert_group(&mut tx, stage.id, name).await?;
        }

        tx.commit().await?;

        log::info!(
            "Created stage {} ({}) under tournament {}",
            stage.id,
            stage.format.as_str(),
            stage.tournament_id
        );
        Ok(stage)
    }

    /// Update a stage's fields and, when `groups` is given, reconcile its
    /// group set: listed specs with an id are updated, specs without an id
    /// are created, and existing groups left unlisted are cascade-deleted.
    pub async fn update_stage(
        &self,
        stage_id: StageId,
        update: StageUpdate,
        groups: Option<Vec<GroupSpec>>,
    ) -> EngineResult<Stage> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "SELECT {STAGE_COLUMNS} FROM stages WHERE id = $1 FOR UPDATE"
        ))
        .bind(stage_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EngineError::not_found(EntityKind::Stage, stage_id))?;
        let old = Stage::from_row(&row);
        let merged = update.merged_into(&old);

        if merged.format != StageFormat::Groups {
            let owned_groups = group_ids_of_stage(&mut tx, stage_id).await?;
            if !owned_groups.is_empty() {
                return Err(EngineError::Validation(format!(
                    "cannot switch stage {stage_id} to format {} while it owns groups",
                    merged.format.as_str()
                )));
            }
            if groups.as_ref().is_some_and(|specs| !specs.is_empty()) {
                return Err(EngineError::Validation(format!(
                    "group list is only valid for the groups format, not {}",
                    merged.format.as_str()
                )));
            }
        }

        sqlx::query(
            r#"
            UPDATE stages
            SET name = $1, format = $2, status = $3, starts_on = $4, ends_on = $5, description = $6
            WHERE id = $7
            "#,
        )
        .bind(&merged.name)
        .bind(merged.format.as_str())
        .bind(merged.status.as_str())
        .bind(merged.starts_on)
        .bind(merged.ends_on)
        .bind(&merged.description)
        .bind(stage_id)
        .execute(&mut *tx)
        .await?;

        if let Some(specs) = groups {
            reconcile_groups(&mut tx, stage_id, specs).await?;
        }

        tx.commit().await?;

        log::info!("Updated stage {stage_id}");
        Ok(merged)
    }

    /// Delete a stage and everything it owns: each group via the full
    /// group cascade (standings reversal included), then directly-attached
    /// matches (no group, so no reversal), then the stage row. Atomic.
    pub async fn delete_stage(&self, stage_id: StageId) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query("SELECT id FROM stages WHERE id = $1")
            .bind(stage_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(EngineError::not_found(EntityKind::Stage, stage_id));
        }

        for group_id in group_ids_of_stage(&mut tx, stage_id).await? {
            delete_group_in_tx(&mut tx, group_id).await?;
        }

        sqlx::query("DELETE FROM matches WHERE stage_id = $1 AND group_id IS NULL")
            .bind(stage_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM stages WHERE id = $1")
            .bind(stage_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!("Deleted stage {stage_id} and its children");
        Ok(())
    }
}

async fn group_ids_of_stage(
    tx: &mut Transaction<'_, Postgres>,
    stage_id: StageId,
) -> EngineResult<Vec<GroupId>> {
    let rows = sqlx::query("SELECT id FROM groups WHERE stage_id = $1 ORDER BY id")
        .bind(stage_id)
        .fetch_all(&mut **tx)
        .await?;
    Ok(rows.iter().map(|row| row.get("id")).collect())
}

async fn reconcile_groups(
    tx: &mut Transaction<'_, Postgres>,
    stage_id: StageId,
    specs: Vec<GroupSpec>,
) -> EngineResult<()> {
    let existing = group_ids_of_stage(tx, stage_id).await?;
    let kept: Vec<GroupId> = specs.iter().filter_map(|spec| spec.id).collect();

    for group_id in existing.iter().copied() {
        if !kept.contains(&group_id) {
            delete_group_in_tx(tx, group_id).await?;
        }
    }

    for spec in specs {
        let group_id = match spec.id {
            Some(group_id) => {
                if !existing.contains(&group_id) {
                    return Err(EngineError::Consistency(format!(
                        "group {group_id} does not belong to stage {stage_id}"
                    )));
                }
                sqlx::query("UPDATE groups SET name = $1 WHERE id = $2")
                    .bind(&spec.name)
                    .bind(group_id)
                    .execute(&mut **tx)
                    .await?;
                group_id
            }
            None => insert_group(tx, stage_id, &spec.name).await?.id,
        };

        if let Some(teams) = &spec.teams {
            replace_teams_in_tx(tx, group_id, teams).await?;
        }
    }

    Ok(())
}
