use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: Utc::now(),
        }
    }
}

/// Row shape for the batched "roles of these users" query.
#[derive(Debug, FromRow)]
pub struct UserRoleRow {
    pub user_id: String,
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRoleRow> for (String, Role) {
    fn from(row: UserRoleRow) -> Self {
        (row.user_id, Role { id: row.id, name: row.name, created_at: row.created_at })
    }
}
