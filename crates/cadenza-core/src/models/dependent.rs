use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::EntityKind;

/// How a dependent collection's field refers to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The field holds a single parent id.
    Scalar,
    /// The field holds an array of ids, one of which may be the parent.
    ArrayContains,
}

/// One row of the cascade table: where to look for records referencing a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependentRule {
    pub dependent: EntityKind,
    pub match_kind: MatchKind,
    pub field: &'static str,
    pub display_field: &'static str,
}

/// Minimal projection of a record that references the entity being deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct DependentRecord {
    pub id: Uuid,
    pub display_name: String,
}

/// Structured refusal of a non-forced deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentConflict {
    pub dependent_type: EntityKind,
    pub dependents: Vec<DependentRecord>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeleteRequest {
    pub id: Uuid,
    #[serde(default)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_wire_shape() {
        let id = Uuid::nil();
        let conflict = DependentConflict {
            dependent_type: EntityKind::Track,
            dependents: vec![DependentRecord {
                id,
                display_name: "Intro".to_string(),
            }],
        };
        let json = serde_json::to_value(&conflict).unwrap();
        assert_eq!(json["dependentType"], "Track");
        assert_eq!(json["dependents"][0]["displayName"], "Intro");
        assert_eq!(json["dependents"][0]["id"], id.to_string());
    }

    #[test]
    fn test_delete_request_force_defaults_to_false() {
        let request: DeleteRequest =
            serde_json::from_str(r#"{"id":"00000000-0000-0000-0000-000000000000"}"#).unwrap();
        assert!(!request.force);
    }
}
