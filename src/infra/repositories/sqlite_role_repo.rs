use crate::domain::{models::role::{Role, UserRoleRow}, ports::RoleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;

pub struct SqliteRoleRepo {
    pool: SqlitePool,
}

impl SqliteRoleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for SqliteRoleRepo {
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

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT id, name, created_at FROM roles WHERE name IN (");
        let mut separated = qb.separated(", ");
        for name in names {
            separated.push_bind(name);
        }
        separated.push_unseparated(") ORDER BY name ASC");

        qb.build_query_as::<Role>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn ensure(&self, name: &str) -> Result<Role, AppError> {
        let role = Role::new(name.to_string());
        sqlx::query("INSERT INTO roles (id, name, created_at) VALUES (?, ?, ?) ON CONFLICT(name) DO NOTHING")
            .bind(&role.id)
            .bind(&role.name)
            .bind(role.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles WHERE name = ?")
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

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT ur.user_id, r.id, r.name, r.created_at FROM user_roles ur JOIN roles r ON r.id = ur.role_id WHERE ur.user_id IN ("
        );
        let mut separated = qb.separated(", ");
        for id in user_ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY r.name ASC");

        let rows = qb.build_query_as::<UserRoleRow>()
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
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        for role_id in role_ids {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?) ON CONFLICT DO NOTHING")
                .bind(user_id)
                .bind(role_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn sync(&self, user_id: &str, role_ids: &[String]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM user_roles WHERE user_id = ");
        qb.push_bind(user_id);
        if !role_ids.is_empty() {
            qb.push(" AND role_id NOT IN (");
            let mut separated = qb.separated(", ");
            for role_id in role_ids {
                separated.push_bind(role_id);
            }
            separated.push_unseparated(")");
        }
        qb.build().execute(&mut *tx).await.map_err(AppError::Database)?;

        for role_id in role_ids {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?) ON CONFLICT DO NOTHING")
                .bind(user_id)
                .bind(role_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
