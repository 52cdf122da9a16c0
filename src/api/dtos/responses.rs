use serde::Serialize;
use crate::domain::models::{pagination::Page, role::Role, user::UserWithRoles};

#[derive(Serialize)]
pub struct UserIndexResponse {
    pub users: Page<UserWithRoles>,
    pub filters: UserFilters,
}

#[derive(Serialize)]
pub struct UserFilters {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct UserCreateResponse {
    pub roles: Vec<Role>,
}

#[derive(Serialize)]
pub struct UserEditResponse {
    pub user: UserWithRoles,
    pub roles: Vec<Role>,
}
