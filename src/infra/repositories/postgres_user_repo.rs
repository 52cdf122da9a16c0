use crate::domain::{models::{pagination::offset_for, user::{UniqueField, User}}, ports::UserRepository};
use crate::error::{map_user_write_error, AppError};
use crate::infra::repositories::USER_COLUMNS;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn paginate(&self, name_filter: Option<&str>, page: u32, per_page: u32) -> Result<(Vec<User>, u64), AppError> {
        let limit = per_page as i64;
        let offset = offset_for(page, per_page) as i64;

        let (users, total) = if let Some(q) = name_filter {
            let pattern = format!("%{}%", q);
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE name LIKE $1")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
            let users = sqlx::query_as::<_, User>(&format!(
                "SELECT {} FROM users WHERE name LIKE $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3", USER_COLUMNS
            ))
                .bind(&pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(AppError::Database)?;
            (users, total)
        } else {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
            let users = sqlx::query_as::<_, User>(&format!(
                "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2", USER_COLUMNS
            ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(AppError::Database)?;
            (users, total)
        };

        Ok((users, total.max(0) as u64))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn exists_by(&self, field: UniqueField, value: &str, except_id: Option<&str>) -> Result<bool, AppError> {
        let column = field.column();
        let found = match except_id {
            Some(id) => {
                sqlx::query_scalar::<_, bool>(&format!(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE {} = $1 AND id <> $2)", column
                ))
                    .bind(value)
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar::<_, bool>(&format!(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE {} = $1)", column
                ))
                    .bind(value)
                    .fetch_one(&self.pool)
                    .await
            }
        };
        found.map_err(AppError::Database)
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, nik, username, name, email, phone, password_hash, is_admin, is_banned, is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {}", USER_COLUMNS
        ))
            .bind(&user.id)
            .bind(&user.nik)
            .bind(&user.username)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(user.is_admin)
            .bind(user.is_banned)
            .bind(user.is_active)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_user_write_error)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $1, email = $2, phone = $3, password_hash = $4, updated_at = $5 WHERE id = $6 RETURNING {}",
            USER_COLUMNS
        ))
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(user.updated_at)
            .bind(&user.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_user_write_error)?
            .ok_or(AppError::NotFound("User not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres User Deletion Failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
