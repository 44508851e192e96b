pub mod academic_year_setting;
pub mod course;
pub mod enrollment;
pub mod time_slot;
