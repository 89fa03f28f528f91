use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The id a user carries before the store has assigned one.
pub const UNASSIGNED_ID: i64 = 0;

/// Database user model. Column names follow the persisted v1 schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[sqlx(rename = "joinedYear")]
    pub joined_year: i32,
    #[sqlx(rename = "isElite")]
    pub is_elite: bool,
}

impl User {
    /// A user that has not been persisted yet; the store assigns the real id
    /// on insert.
    pub fn unsaved(
        name: impl Into<String>,
        description: impl Into<String>,
        joined_year: i32,
        is_elite: bool,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            description: description.into(),
            joined_year,
            is_elite,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}
