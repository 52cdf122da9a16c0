pub mod sqlite_role_repo;
pub mod sqlite_user_repo;

pub mod postgres_role_repo;
pub mod postgres_user_repo;

pub(crate) const USER_COLUMNS: &str =
    "id, nik, username, name, email, phone, password_hash, is_admin, is_banned, is_active, created_at, updated_at";
