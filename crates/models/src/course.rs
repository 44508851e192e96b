use crate::time_slot::TimeSlot;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A retake/make-up course offered in one academic term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Term the course is offered in, e.g. "113-1"
    pub academic_year: String,
    /// Subject code, unique within a term
    pub course_code: String,
    pub course_name: String,
    pub credits: f32,
    pub fee_per_credit: u32,
    /// Weekly meeting times, in the order they were entered
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
    pub instructor_name: Option<String>,
    pub max_students: Option<u32>,
    #[serde(default = "default_open")]
    pub is_open_for_registration: bool,
}

fn default_open() -> bool {
    true
}

impl Course {
    /// Creates an open course with no credits, fee or meeting times
    pub fn new(
        academic_year: impl Into<String>,
        course_code: impl Into<String>,
        course_name: impl Into<String>,
    ) -> Self {
        Self {
            academic_year: academic_year.into(),
            course_code: course_code.into(),
            course_name: course_name.into(),
            credits: 0.0,
            fee_per_credit: 0,
            time_slots: Vec::new(),
            instructor_name: None,
            max_students: None,
            is_open_for_registration: true,
        }
    }

    pub fn with_time_slots(mut self, time_slots: Vec<TimeSlot>) -> Self {
        self.time_slots = time_slots;
        self
    }

    pub fn with_fee(mut self, credits: f32, fee_per_credit: u32) -> Self {
        self.credits = credits;
        self.fee_per_credit = fee_per_credit;
        self
    }

    /// Total fee for the course, truncated to a whole amount
    pub fn total_fee(&self) -> u32 {
        if self.credits <= 0.0 {
            return 0;
        }
        (self.credits * self.fee_per_credit as f32) as u32
    }
}

impl Display for Course {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.course_name, self.course_code)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_total_fee() {
        let course = Course::new("113-1", "MATH101", "Calculus").with_fee(3.0, 240);
        assert_eq!(course.total_fee(), 720);

        let half = Course::new("113-1", "LAB1", "Lab").with_fee(1.5, 240);
        assert_eq!(half.total_fee(), 360);

        let free = Course::new("113-1", "CLUB", "Club").with_fee(0.0, 240);
        assert_eq!(free.total_fee(), 0);
    }

    #[test]
    fn test_display() {
        let course = Course::new("113-1", "ENG201", "English Writing");
        assert_eq!(course.to_string(), "English Writing (ENG201)");
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "academic_year": "113-1",
            "course_code": "PHY101",
            "course_name": "Physics",
            "credits": 2.0,
            "fee_per_credit": 240,
            "instructor_name": null,
            "max_students": null
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert!(course.time_slots.is_empty());
        assert!(course.is_open_for_registration);
        assert_eq!(course.total_fee(), 480);
    }
}
