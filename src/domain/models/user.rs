use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::models::role::Role;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub nik: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub is_banned: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewUserParams {
    pub nik: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

impl User {
    /// New accounts start as regular, unbanned and active.
    pub fn new(params: NewUserParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            nik: params.nik,
            username: params.username,
            name: params.name,
            email: params.email,
            phone: params.phone,
            password_hash: params.password_hash,
            is_admin: false,
            is_banned: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A user together with its assigned roles, as shown on the admin screens.
#[derive(Debug, Serialize, Clone)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<Role>,
}

/// Columns that must stay unique across all users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Nik,
    Username,
    Email,
}

impl UniqueField {
    pub fn column(&self) -> &'static str {
        match self {
            UniqueField::Nik => "nik",
            UniqueField::Username => "username",
            UniqueField::Email => "email",
        }
    }
}
