use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::migrate::Migrator;
use sqlx::ConnectOptions;
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::RoleRepository;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_role_repo::PostgresRoleRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_role_repo::SqliteRoleRepo, sqlite_user_repo::SqliteUserRepo,
};

pub static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");
pub static POSTGRES_MIGRATOR: Migrator = sqlx::migrate!("./migrations/postgres");

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse()
            .map_err(|e| AppError::Config(format!("Invalid Postgres URL: {}", e)))?;
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        POSTGRES_MIGRATOR.run(&pool).await?;

        AppState::new(
            config.clone(),
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresRoleRepo::new(pool)),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Config(format!("Invalid SQLite connection string: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        SQLITE_MIGRATOR.run(&pool).await?;

        AppState::new(
            config.clone(),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteRoleRepo::new(pool)),
        )
    };

    seed_roles(state.role_repo.as_ref(), &config.default_roles).await?;
    Ok(state)
}

/// Makes sure every configured role exists; existing ones are left alone.
pub async fn seed_roles(repo: &dyn RoleRepository, names: &[String]) -> Result<(), AppError> {
    for name in names {
        let role = repo.ensure(name).await?;
        info!("Role available: {} ({})", role.name, role.id);
    }
    Ok(())
}
