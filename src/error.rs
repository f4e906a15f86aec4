//! Engine error types.

use std::fmt;

use thiserror::Error;

/// Entity kinds referenced by [`EngineError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Tournament,
    Stage,
    Group,
    Team,
    Match,
    Standing,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Tournament => "tournament",
            EntityKind::Stage => "stage",
            EntityKind::Group => "group",
            EntityKind::Team => "team",
            EntityKind::Match => "match",
            EntityKind::Standing => "standing",
        };
        f.write_str(name)
    }
}

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Identity does not resolve to a stored row
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: i64 },

    /// The store no longer matches what the operation assumed; indicates
    /// a caller bug and is never auto-corrected
    #[error("consistency violation: {0}")]
    Consistency(String),

    /// Input rejected before any store mutation
    #[error("validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl EngineError {
    pub fn not_found(entity: EntityKind, id: i64) -> Self {
        EngineError::NotFound { entity, id }
    }

    /// Whether this error maps to a missing-resource response at the edge
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound { .. })
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_entity() {
        let err = EngineError::not_found(EntityKind::Group, 17);
        assert_eq!(err.to_string(), "group not found: 17");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_variants_are_not_not_found() {
        assert!(!EngineError::Consistency("x".to_string()).is_not_found());
        assert!(!EngineError::Validation("y".to_string()).is_not_found());
    }
}
