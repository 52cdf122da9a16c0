pub mod context;
pub mod pagination;
pub mod role;
pub mod sekolah;
pub mod user;
