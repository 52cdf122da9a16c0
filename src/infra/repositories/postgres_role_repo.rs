use crate::domain::{models::role::{Role, UserRoleRow}, ports::RoleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

pub struct PostgresRoleRepo {
    pool: PgPool,
}

impl PostgresRoleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepo {
    async fn list_all(&self) -> Result<Vec<Role>, AppError> {
        sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Role>, AppError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles WHERE name = ANY($1) ORDER BY name ASC")
            .bind(names)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn ensure(&self, name: &str) -> Result<Role, AppError> {
        let role = Role::new(name.to_string());
        sqlx::query("INSERT INTO roles (id, name, created_at) VALUES ($1, $2, $3) ON CONFLICT (name) DO NOTHING")
            .bind(&role.id)
            .bind(&role.name)
            .bind(role.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn roles_for_users(&self, user_ids: &[String]) -> Result<HashMap<String, Vec<Role>>, AppError> {
        let mut grouped: HashMap<String, Vec<Role>> = HashMap::new();
        if user_ids.is_empty() {
            return Ok(grouped);
        }

        let rows = sqlx::query_as::<_, UserRoleRow>(
            "SELECT ur.user_id, r.id, r.name, r.created_at FROM user_roles ur JOIN roles r ON r.id = ur.role_id
             WHERE ur.user_id = ANY($1) ORDER BY r.name ASC"
        )
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        for row in rows {
            let (user_id, role): (String, Role) = row.into();
            grouped.entry(user_id).or_default().push(role);
        }
        Ok(grouped)
    }

    async fn assign(&self, user_id: &str, role_ids: &[String]) -> Result<(), AppError> {
        if role_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) SELECT $1, role_id FROM UNNEST($2::text[]) AS t(role_id)
             ON CONFLICT DO NOTHING"
        )
            .bind(user_id)
            .bind(role_ids)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn sync(&self, user_id: &str, role_ids: &[String]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND NOT (role_id = ANY($2))")
            .bind(user_id)
            .bind(role_ids)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) SELECT $1, role_id FROM UNNEST($2::text[]) AS t(role_id)
             ON CONFLICT DO NOTHING"
        )
            .bind(user_id)
            .bind(role_ids)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
