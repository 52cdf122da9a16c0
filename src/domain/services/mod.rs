pub mod password;
pub mod user_admin;
