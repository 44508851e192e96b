pub mod auth;
pub mod course;
pub mod enrollment;
pub mod health;
pub mod import;
pub mod registration;
pub mod root;
