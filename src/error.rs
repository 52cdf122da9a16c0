use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

/// Field-scoped validation messages, keyed by input field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() { Ok(()) } else { Err(AppError::Validation(self)) }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            for e in list.iter() {
                out.add(&field, describe(&field, e));
            }
        }
        out
    }
}

pub fn required_message(field: &str) -> String {
    format!("The {} field is required.", field.replace('_', " "))
}

fn describe(field: &str, e: &validator::ValidationError) -> String {
    if let Some(message) = &e.message {
        return message.to_string();
    }
    let label = field.replace('_', " ");
    match e.code.as_ref() {
        // `length(min = 1)` doubles as the required rule
        "length" => {
            let empty = e.params.get("value")
                .and_then(|v| v.as_str())
                .map_or(true, str::is_empty);
            match e.params.get("max") {
                Some(max) if !empty => format!("The {} may not be greater than {} characters.", label, max),
                _ => required_message(field),
            }
        }
        "must_match" => format!("The {} confirmation does not match.", label),
        code => format!("The {} field is invalid ({}).", label, code),
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("The given data was invalid")]
    Validation(FieldErrors),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.into())
    }
}

/// Columns guarded by a UNIQUE constraint on `users`.
const UNIQUE_USER_FIELDS: [&str; 3] = ["nik", "username", "email"];

/// Works out which user field tripped a unique constraint, from either the
/// constraint name (Postgres: `users_email_key`) or the message
/// (SQLite: `UNIQUE constraint failed: users.email`).
pub fn unique_violation_field(constraint: Option<&str>, message: &str) -> Option<&'static str> {
    if let Some(name) = constraint {
        if let Some(field) = UNIQUE_USER_FIELDS.iter().find(|f| name == format!("users_{}_key", f)) {
            return Some(*field);
        }
    }
    UNIQUE_USER_FIELDS.iter()
        .find(|f| message.contains(&format!("users.{}", f)))
        .copied()
}

/// Maps a write failure on `users`. A unique violation loses the race to a
/// concurrent writer and is reported like any other duplicate submission.
pub fn map_user_write_error(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if let Some(field) = unique_violation_field(db_err.constraint(), db_err.message()) {
                return AppError::Validation(FieldErrors::single(field, taken_message(field)));
            }
        }
    }
    AppError::Database(e)
}

pub fn taken_message(field: &str) -> String {
    format!("The {} has already been taken.", field)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(errors) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "message": "The given data was invalid.", "errors": errors })),
                ).into_response();
            }
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Migration(e) => {
                error!("Migration error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Config(msg) => {
                error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
