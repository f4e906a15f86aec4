//! Read-side view models handed to the HTTP layer for serialization.

use serde::Serialize;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::group::{GroupId, TeamId};
use crate::matches::Match;
use crate::stage::Stage;

/// One row of a rendered standings table, ranked (points desc, wins desc)
#[derive(Debug, Clone, Serialize)]
pub struct StandingRow {
    /// Referenced team
    pub team_id: TeamId,
    /// Team display name
    pub team_name: String,
    /// Team short code
    pub team_code: String,
    /// Completed matches counted
    pub matches_played: i32,
    /// Wins
    pub wins: i32,
    /// Losses
    pub losses: i32,
    /// Points
    pub points: i32,
}

impl StandingRow {
    pub(crate) fn from_row(row: &PgRow) -> Self {
        Self {
            team_id: row.get("team_id"),
            team_name: row.get("team_name"),
            team_code: row.get("team_code"),
            matches_played: row.get("matches_played"),
            wins: row.get("wins"),
            losses: row.get("losses"),
            points: row.get("points"),
        }
    }
}

/// A group expanded with its ranked standings and its matches
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    /// Group ID
    pub id: GroupId,
    /// Group name
    pub name: String,
    /// Standings, ordered by (points desc, wins desc)
    pub standings: Vec<StandingRow>,
    /// Matches, ordered by scheduled time ascending
    pub matches: Vec<Match>,
}

/// A stage expanded with its groups (for the groups format) and its
/// directly-attached matches
#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    /// The stage record itself, embedded at the top level
    #[serde(flatten)]
    pub stage: Stage,
    /// Groups in creation order; empty for non-groups formats
    pub groups: Vec<GroupView>,
    /// Matches attached directly to the stage, ordered by scheduled time
    pub matches: Vec<Match>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{StageFormat, StageStatus};

    #[test]
    fn test_stage_view_serializes_flat() {
        let view = StageView {
            stage: Stage {
                id: 5,
                tournament_id: 2,
                name: "Group Stage".to_string(),
                format: StageFormat::Groups,
                status: StageStatus::Active,
                starts_on: None,
                ends_on: None,
                description: None,
                created_at: chrono::Utc::now(),
            },
            groups: vec![GroupView {
                id: 9,
                name: "Group A".to_string(),
                standings: vec![],
                matches: vec![],
            }],
            matches: vec![],
        };

        let json = serde_json::to_value(&view).unwrap();
        // Stage fields sit at the top level next to the child collections
        assert_eq!(json["id"], 5);
        assert_eq!(json["format"], "groups");
        assert_eq!(json["groups"][0]["name"], "Group A");
        assert!(json["matches"].as_array().unwrap().is_empty());
    }
}
