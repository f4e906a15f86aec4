//! Stage data models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::group::{GroupId, TeamId};

/// Tournament ID type
pub type TournamentId = i64;

/// Stage ID type
pub type StageId = i64;

/// Stage format: decides which child collection the stage carries.
///
/// Only `Groups` stages own groups; matches of any other format attach
/// directly to the stage and never reference a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageFormat {
    /// Round-robin groups with standings tables
    Groups,
    /// Single/double elimination bracket
    Bracket,
    /// Swiss system
    Swiss,
    /// Free-form
    Custom,
}

impl StageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            StageFormat::Groups => "groups",
            StageFormat::Bracket => "bracket",
            StageFormat::Swiss => "swiss",
            StageFormat::Custom => "custom",
        }
    }

    pub(crate) fn from_str_or_custom(value: &str) -> Self {
        match value {
            "groups" => StageFormat::Groups,
            "bracket" => StageFormat::Bracket,
            "swiss" => StageFormat::Swiss,
            _ => StageFormat::Custom,
        }
    }
}

/// Stage lifecycle status; display metadata only, never consulted by the
/// standings aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// Not yet started
    Upcoming,
    /// In progress
    Active,
    /// Finished
    Completed,
}

impl StageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StageStatus::Upcoming => "upcoming",
            StageStatus::Active => "active",
            StageStatus::Completed => "completed",
        }
    }

    pub(crate) fn from_str_or_upcoming(value: &str) -> Self {
        match value {
            "active" => StageStatus::Active,
            "completed" => StageStatus::Completed,
            _ => StageStatus::Upcoming,
        }
    }
}

/// A phase of a tournament (e.g. "Group Stage", "Playoffs")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Stage ID
    pub id: StageId,
    /// Owning tournament
    pub tournament_id: TournamentId,
    /// Stage name
    pub name: String,
    /// Stage format
    pub format: StageFormat,
    /// Lifecycle status
    pub status: StageStatus,
    /// First day of play
    pub starts_on: Option<NaiveDate>,
    /// Last day of play
    pub ends_on: Option<NaiveDate>,
    /// Free-form description
    pub description: Option<String>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

impl Stage {
    pub(crate) fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            tournament_id: row.get("tournament_id"),
            name: row.get("name"),
            format: StageFormat::from_str_or_custom(&row.get::<String, _>("format")),
            status: StageStatus::from_str_or_upcoming(&row.get::<String, _>("status")),
            starts_on: row.get("starts_on"),
            ends_on: row.get("ends_on"),
            description: row.get("description"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        }
    }
}

/// Payload for creating a stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStage {
    /// Owning tournament
    pub tournament_id: TournamentId,
    /// Stage name
    pub name: String,
    /// Stage format
    pub format: StageFormat,
    /// Lifecycle status
    pub status: StageStatus,
    /// First day of play
    pub starts_on: Option<NaiveDate>,
    /// Last day of play
    pub ends_on: Option<NaiveDate>,
    /// Free-form description
    pub description: Option<String>,
    /// Names of groups to create alongside the stage (`Groups` format only)
    pub initial_groups: Vec<String>,
}

impl NewStage {
    /// A minimal stage payload; groups and optional fields are left empty
    pub fn new(tournament_id: TournamentId, name: impl Into<String>, format: StageFormat) -> Self {
        Self {
            tournament_id,
            name: name.into(),
            format,
            status: StageStatus::Upcoming,
            starts_on: None,
            ends_on: None,
            description: None,
            initial_groups: Vec::new(),
        }
    }
}

/// Partial stage update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageUpdate {
    /// New name
    pub name: Option<String>,
    /// New format
    pub format: Option<StageFormat>,
    /// New status
    pub status: Option<StageStatus>,
    /// New first day (outer `None` = unchanged, inner `None` = clear)
    pub starts_on: Option<Option<NaiveDate>>,
    /// New last day
    pub ends_on: Option<Option<NaiveDate>>,
    /// New description
    pub description: Option<Option<String>>,
}

impl StageUpdate {
    /// Merge this update over a stored stage; unspecified fields keep
    /// their current value
    pub fn merged_into(&self, old: &Stage) -> Stage {
        Stage {
            id: old.id,
            tournament_id: old.tournament_id,
            name: self.name.clone().unwrap_or_else(|| old.name.clone()),
            format: self.format.unwrap_or(old.format),
            status: self.status.unwrap_or(old.status),
            starts_on: self.starts_on.unwrap_or(old.starts_on),
            ends_on: self.ends_on.unwrap_or(old.ends_on),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| old.description.clone()),
            created_at: old.created_at,
        }
    }
}

/// One entry of the group list handed to a stage update.
///
/// A spec with an id updates that group; a spec without an id creates a
/// new group; existing groups not listed are cascade-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Existing group to update, or `None` to create
    pub id: Option<GroupId>,
    /// Group name
    pub name: String,
    /// When present, the group's roster is replaced by this team list
    pub teams: Option<Vec<TeamId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_round_trip() {
        for format in [
            StageFormat::Groups,
            StageFormat::Bracket,
            StageFormat::Swiss,
            StageFormat::Custom,
        ] {
            assert_eq!(StageFormat::from_str_or_custom(format.as_str()), format);
        }
    }

    #[test]
    fn test_unknown_format_falls_back_to_custom() {
        assert_eq!(
            StageFormat::from_str_or_custom("round-robin"),
            StageFormat::Custom
        );
    }

    #[test]
    fn test_stage_update_merge() {
        let old = Stage {
            id: 1,
            tournament_id: 9,
            name: "Group Stage".to_string(),
            format: StageFormat::Groups,
            status: StageStatus::Upcoming,
            starts_on: None,
            ends_on: None,
            description: Some("initial".to_string()),
            created_at: chrono::Utc::now(),
        };

        let update = StageUpdate {
            status: Some(StageStatus::Active),
            description: Some(None),
            ..Default::default()
        };

        let merged = update.merged_into(&old);
        assert_eq!(merged.name, "Group Stage");
        assert_eq!(merged.status, StageStatus::Active);
        assert_eq!(merged.description, None);
        assert_eq!(merged.format, StageFormat::Groups);
    }
}
