use crate::domain::{models::{pagination::offset_for, user::{UniqueField, User}}, ports::UserRepository};
use crate::error::{map_user_write_error, AppError};
use crate::infra::repositories::USER_COLUMNS;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::error;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn paginate(&self, name_filter: Option<&str>, page: u32, per_page: u32) -> Result<(Vec<User>, u64), AppError> {
        let limit = per_page as i64;
        let offset = offset_for(page, per_page) as i64;

        let (users, total) = if let Some(q) = name_filter {
            let pattern = format!("%{}%", q);
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE name LIKE ?")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
            let users = sqlx::query_as::<_, User>(&format!(
                "SELECT {} FROM users WHERE name LIKE ? ORDER BY created_at DESC LIMIT ? OFFSET ?", USER_COLUMNS
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
                "SELECT {} FROM users ORDER BY created_at DESC LIMIT ? OFFSET ?", USER_COLUMNS
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
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
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
                    "SELECT EXISTS(SELECT 1 FROM users WHERE {} = ? AND id <> ?)", column
                ))
                    .bind(value)
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar::<_, bool>(&format!(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE {} = ?)", column
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
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}", USER_COLUMNS
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
            "UPDATE users SET name = ?, email = ?, phone = ?, password_hash = ?, updated_at = ? WHERE id = ? RETURNING {}",
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
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("SQLite User Deletion Failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
