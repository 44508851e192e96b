pub mod course;
pub mod enrollment;
pub mod import;
pub mod registration;
