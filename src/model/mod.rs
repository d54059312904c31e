pub mod auth_user;
pub mod course;
