use school_admin::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::{
        factory::{seed_roles, SQLITE_MIGRATOR},
        repositories::{sqlite_role_repo::SqliteRoleRepo, sqlite_user_repo::SqliteUserRepo},
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tower::ServiceExt;
use serde_json::Value;

pub const TEST_ROLES: [&str; 3] = ["admin", "guru", "operator"];

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        SQLITE_MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            log_dir: "./logs".to_string(),
            default_roles: TEST_ROLES.iter().map(|r| r.to_string()).collect(),
        };

        let state = Arc::new(AppState::new(
            config.clone(),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteRoleRepo::new(pool.clone())),
        ));

        seed_roles(state.role_repo.as_ref(), &config.default_roles)
            .await
            .expect("Failed to seed roles");

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Stores a user through the HTTP surface and returns its id.
    pub async fn store_user(&self, username: &str, name: &str, roles: &[&str]) -> String {
        let payload = user_payload(username, name, roles);
        let response = self.send("POST", "/apps/users", Some(payload)).await;
        assert_eq!(response.status(), 303, "store failed for {}", username);

        sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn role_names_of(&self, user_id: &str) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT r.name FROM user_roles ur JOIN roles r ON r.id = ur.role_id WHERE ur.user_id = ? ORDER BY r.name"
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .unwrap()
    }

    pub async fn password_hash_of(&self, user_id: &str) -> String {
        sqlx::query_scalar("SELECT password_hash FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

#[allow(dead_code)]
/// A store payload whose unique fields are derived from `username`.
pub fn user_payload(username: &str, name: &str, roles: &[&str]) -> Value {
    let mut hasher = DefaultHasher::new();
    username.hash(&mut hasher);
    let nik = format!("{:016}", hasher.finish() % 10_000_000_000_000_000);
    serde_json::json!({
        "nik": nik,
        "username": username,
        "name": name,
        "email": format!("{}@sekolah.test", username),
        "password": "rahasia123",
        "password_confirmation": "rahasia123",
        "phone": "081234567890",
        "roles": roles,
    })
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        panic!("Response body is empty. Status: {}", status);
    }
    match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!("Failed to parse JSON: {:?}. Status: {}. Body: {:?}", e, status, String::from_utf8_lossy(&bytes))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
