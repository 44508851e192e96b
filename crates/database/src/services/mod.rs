pub mod academic_year;
pub mod course;
pub mod enrollment;
