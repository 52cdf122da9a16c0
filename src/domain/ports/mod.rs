use crate::domain::models::{
    role::Role,
    user::{UniqueField, User},
};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Newest first. `name_filter` is a substring match on `name`.
    async fn paginate(&self, name_filter: Option<&str>, page: u32, per_page: u32) -> Result<(Vec<User>, u64), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn exists_by(&self, field: UniqueField, value: &str, except_id: Option<&str>) -> Result<bool, AppError>;
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    /// Returns false when no row matched.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

/// Role catalog plus the user ↔ role assignment relation.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Role>, AppError>;
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Role>, AppError>;
    async fn ensure(&self, name: &str) -> Result<Role, AppError>;
    async fn roles_for_users(&self, user_ids: &[String]) -> Result<HashMap<String, Vec<Role>>, AppError>;
    /// Adds the given roles, keeping any the user already has.
    async fn assign(&self, user_id: &str, role_ids: &[String]) -> Result<(), AppError>;
    /// Leaves the user with exactly the given roles.
    async fn sync(&self, user_id: &str, role_ids: &[String]) -> Result<(), AppError>;
}
