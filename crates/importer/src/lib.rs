//! Bulk course import from CSV and enrollment export to CSV.

pub mod course_csv;
pub mod export;
pub mod report;

pub use course_csv::{ImportBatch, ImportError, ImportWarning, RowError, parse_courses};
pub use export::{ExportError, enrollments_to_csv};
pub use report::{ImportReport, save_courses};
