//! Domain types for retake course registration and the schedule conflict checker.
//!
//! Everything in this crate is pure: no I/O, no global state.

pub mod academic_year;
pub mod conflict;
pub mod course;
pub mod enrollment;
pub mod period;
pub mod time_slot;

pub use conflict::{ConflictReason, find_conflict, slots_overlap};
pub use course::Course;
pub use period::Period;
pub use time_slot::{DayOfWeek, RawTimeSlot, TimeSlot, TimeSlotError};
