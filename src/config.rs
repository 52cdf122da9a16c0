use std::env;
use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub log_dir: String,
    /// Role names that must exist in the catalog once the service is up.
    pub default_roles: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.parse()
            .map_err(|_| AppError::Config(format!("PORT must be a number, got {:?}", port)))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://school_admin.db?mode=rwc".to_string()),
            port,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()),
            default_roles: parse_role_list(&env::var("DEFAULT_ROLES").unwrap_or_else(|_| "admin,operator".to_string())),
        })
    }
}

pub fn parse_role_list(raw: &str) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !roles.iter().any(|r| r == name) {
            roles.push(name.to_string());
        }
    }
    roles
}
