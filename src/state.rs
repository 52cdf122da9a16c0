use std::sync::Arc;
use crate::domain::ports::{RoleRepository, UserRepository};
use crate::domain::services::user_admin::UserAdminService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub role_repo: Arc<dyn RoleRepository>,
    pub user_admin: Arc<UserAdminService>,
}

impl AppState {
    pub fn new(config: Config, user_repo: Arc<dyn UserRepository>, role_repo: Arc<dyn RoleRepository>) -> Self {
        let user_admin = Arc::new(UserAdminService::new(user_repo.clone(), role_repo.clone()));
        Self { config, user_repo, role_repo, user_admin }
    }
}
