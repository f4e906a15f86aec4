//! Read-side assembly of nested stage views.
//!
//! No caching: every call re-reads current state, so a view is always
//! consistent with the last committed write.

use sqlx::{PgPool, Row};
use std::sync::Arc;

use super::models::{GroupView, StageView, StandingRow};
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::matches::Match;
use crate::stage::{Stage, StageFormat, StageId, TournamentId};

/// Read-only facade over the stage/group/match hierarchy
#[derive(Clone)]
pub struct StandingsFacade {
    pool: Arc<PgPool>,
}

impl StandingsFacade {
    /// Create a new facade
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Fetch one stage, expanded with groups, ranked standings, and
    /// matches
    pub async fn get_stage(&self, stage_id: StageId) -> EngineResult<StageView> {
        let row = sqlx::query(
            r#"
            SELECT id, tournament_id, name, format, status, starts_on, ends_on,
                   description, created_at
            FROM stages
            WHERE id = $1
            "#,
        )
        .bind(stage_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(EngineError::not_found(EntityKind::Stage, stage_id))?;

        self.expand(Stage::from_row(&row)).await
    }

    /// Fetch all stages of a tournament in creation order, each expanded
    /// like [`get_stage`](Self::get_stage)
    pub async fn get_tournament_stages(
        &self,
        tournament_id: TournamentId,
    ) -> EngineResult<Vec<StageView>> {
        let rows = sqlx::query(
            r#"
            SELECT id, tournament_id, name, format, status, starts_on, ends_on,
                   description, created_at
            FROM stages
            WHERE tournament_id = $1
            ORDER BY id
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(self.expand(Stage::from_row(&row)).await?);
        }
        Ok(views)
    }

    async fn expand(&self, stage: Stage) -> EngineResult<StageView> {
        let mut groups = Vec::new();

        if stage.format == StageFormat::Groups {
            let group_rows =
                sqlx::query("SELECT id, name FROM groups WHERE stage_id = $1 ORDER BY id")
                    .bind(stage.id)
                    .fetch_all(self.pool.as_ref())
                    .await?;

            for group_row in group_rows {
                let group_id: i64 = group_row.get("id");

                // (points desc, wins desc) is the tie-break rule the
                // rendered table must reproduce exactly
                let standing_rows = sqlx::query(
                    r#"
                    SELECT gs.team_id, t.name AS team_name, t.code AS team_code,
                           gs.matches_played, gs.wins, gs.losses, gs.points
                    FROM group_standings gs
                    JOIN teams t ON t.id = gs.team_id
                    WHERE gs.group_id = $1
                    ORDER BY gs.points DESC, gs.wins DESC
                    "#,
                )
                .bind(group_id)
                .fetch_all(self.pool.as_ref())
                .await?;

                let match_rows = sqlx::query(
                    r#"
                    SELECT id, stage_id, group_id, team1_id, team2_id, score1, score2,
                           scheduled_at, status, location, description, created_at
                    FROM matches
                    WHERE group_id = $1
                    ORDER BY scheduled_at
                    "#,
                )
                .bind(group_id)
                .fetch_all(self.pool.as_ref())
                .await?;

                groups.push(GroupView {
                    id: group_id,
                    name: group_row.get("name"),
                    standings: standing_rows.iter().map(StandingRow::from_row).collect(),
                    matches: match_rows.iter().map(Match::from_row).collect(),
                });
            }
        }

        let direct_rows = sqlx::query(
            r#"
            SELECT id, stage_id, group_id, team1_id, team2_id, score1, score2,
                   scheduled_at, status, location, description, created_at
            FROM matches
            WHERE stage_id = $1 AND group_id IS NULL
            ORDER BY scheduled_at
            "#,
        )
        .bind(stage.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(StageView {
            stage,
            groups,
            matches: direct_rows.iter().map(Match::from_row).collect(),
        })
    }
}
