//! Match data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::group::{GroupId, TeamId};
use crate::stage::StageId;

/// Match ID type
pub type MatchId = i64;

/// Match lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Not yet played
    Scheduled,
    /// Currently being played
    Live,
    /// Played to a result
    Completed,
    /// Called off
    Canceled,
    /// Moved to a later date
    Postponed,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
            MatchStatus::Canceled => "canceled",
            MatchStatus::Postponed => "postponed",
        }
    }

    pub(crate) fn from_str_or_scheduled(value: &str) -> Self {
        match value {
            "live" => MatchStatus::Live,
            "completed" => MatchStatus::Completed,
            "canceled" => MatchStatus::Canceled,
            "postponed" => MatchStatus::Postponed,
            _ => MatchStatus::Scheduled,
        }
    }
}

/// A single fixture between two distinct teams.
///
/// Belongs to exactly one stage and optionally one group; the group, when
/// present, must belong to the same stage. Team order matters only for
/// score attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Match ID
    pub id: MatchId,
    /// Owning stage
    pub stage_id: StageId,
    /// Owning group, absent for non-groups stage formats
    pub group_id: Option<GroupId>,
    /// First team
    pub team1_id: TeamId,
    /// Second team
    pub team2_id: TeamId,
    /// First team's score
    pub score1: Option<i32>,
    /// Second team's score
    pub score2: Option<i32>,
    /// Scheduled kick-off
    pub scheduled_at: DateTime<Utc>,
    /// Lifecycle status
    pub status: MatchStatus,
    /// Venue
    pub location: Option<String>,
    /// Free-form description
    pub description: Option<String>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// The standings contribution of this match, if any: the owning group
    /// and both scores. `Some` exactly when the match is completed, has a
    /// group, and both scores are recorded.
    pub fn contribution(&self) -> Option<(GroupId, i32, i32)> {
        match (self.group_id, self.status, self.score1, self.score2) {
            (Some(group_id), MatchStatus::Completed, Some(score1), Some(score2)) => {
                Some((group_id, score1, score2))
            }
            _ => None,
        }
    }

    /// Whether this match currently counts toward its group's standings
    pub fn contributes(&self) -> bool {
        self.contribution().is_some()
    }

    pub(crate) fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            stage_id: row.get("stage_id"),
            group_id: row.get("group_id"),
            team1_id: row.get("team1_id"),
            team2_id: row.get("team2_id"),
            score1: row.get("score1"),
            score2: row.get("score2"),
            scheduled_at: row
                .get::<chrono::NaiveDateTime, _>("scheduled_at")
                .and_utc(),
            status: MatchStatus::from_str_or_scheduled(&row.get::<String, _>("status")),
            location: row.get("location"),
            description: row.get("description"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        }
    }
}

/// Payload for creating a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMatch {
    /// Owning stage
    pub stage_id: StageId,
    /// Owning group, if the stage uses groups
    pub group_id: Option<GroupId>,
    /// First team
    pub team1_id: TeamId,
    /// Second team
    pub team2_id: TeamId,
    /// First team's score
    pub score1: Option<i32>,
    /// Second team's score
    pub score2: Option<i32>,
    /// Scheduled kick-off
    pub scheduled_at: DateTime<Utc>,
    /// Lifecycle status
    pub status: MatchStatus,
    /// Venue
    pub location: Option<String>,
    /// Free-form description
    pub description: Option<String>,
}

impl NewMatch {
    /// A scheduled fixture with no result yet
    pub fn scheduled(
        stage_id: StageId,
        group_id: Option<GroupId>,
        team1_id: TeamId,
        team2_id: TeamId,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            stage_id,
            group_id,
            team1_id,
            team2_id,
            score1: None,
            score2: None,
            scheduled_at,
            status: MatchStatus::Scheduled,
            location: None,
            description: None,
        }
    }
}

/// Partial match update; `None` leaves a field unchanged.
///
/// Nullable columns take a nested `Option`: the outer level says whether
/// the field is touched, the inner level is the new stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchUpdate {
    /// Move between groups (or detach with `Some(None)`)
    pub group_id: Option<Option<GroupId>>,
    /// New first team
    pub team1_id: Option<TeamId>,
    /// New second team
    pub team2_id: Option<TeamId>,
    /// New first-team score
    pub score1: Option<Option<i32>>,
    /// New second-team score
    pub score2: Option<Option<i32>>,
    /// New kick-off time
    pub scheduled_at: Option<DateTime<Utc>>,
    /// New status
    pub status: Option<MatchStatus>,
    /// New venue
    pub location: Option<Option<String>>,
    /// New description
    pub description: Option<Option<String>>,
}

impl MatchUpdate {
    /// A result entry: mark the match completed with the given score line
    pub fn result(score1: i32, score2: i32) -> Self {
        Self {
            score1: Some(Some(score1)),
            score2: Some(Some(score2)),
            status: Some(MatchStatus::Completed),
            ..Default::default()
        }
    }

    /// Merge this update over a stored match; unspecified fields keep
    /// their current value
    pub fn merged_into(&self, old: &Match) -> Match {
        Match {
            id: old.id,
            stage_id: old.stage_id,
            group_id: self.group_id.unwrap_or(old.group_id),
            team1_id: self.team1_id.unwrap_or(old.team1_id),
            team2_id: self.team2_id.unwrap_or(old.team2_id),
            score1: self.score1.unwrap_or(old.score1),
            score2: self.score2.unwrap_or(old.score2),
            scheduled_at: self.scheduled_at.unwrap_or(old.scheduled_at),
            status: self.status.unwrap_or(old.status),
            location: self.location.clone().unwrap_or_else(|| old.location.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| old.description.clone()),
            created_at: old.created_at,
        }
    }
}
