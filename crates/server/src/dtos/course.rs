use models::{Course, TimeSlot};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub academic_year: String,
    pub course_code: String,
    pub course_name: String,
    pub credits: f32,
    pub fee_per_credit: u32,
    pub total_fee: u32,
    pub instructor_name: Option<String>,
    pub max_students: Option<u32>,
    pub is_open_for_registration: bool,
    pub time_slots: Vec<TimeSlotResponse>,
}

impl CourseResponse {
    pub fn new(id: Uuid, course: Course) -> Self {
        let total_fee = course.total_fee();

        Self {
            id,
            academic_year: course.academic_year,
            course_code: course.course_code,
            course_name: course.course_name,
            credits: course.credits,
            fee_per_credit: course.fee_per_credit,
            total_fee,
            instructor_name: course.instructor_name,
            max_students: course.max_students,
            is_open_for_registration: course.is_open_for_registration,
            time_slots: course.time_slots.iter().map(TimeSlotResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimeSlotResponse {
    /// Week the slot applies to; absent for every week
    pub week_number: Option<u32>,
    /// 1 (Monday) through 7 (Sunday)
    pub day_of_week: u8,
    pub period: String,
    pub period_label: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    pub location: Option<String>,
    /// Human readable summary, e.g. "Monday D2 (09:00-09:50)"
    pub display: String,
}

impl From<&TimeSlot> for TimeSlotResponse {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            week_number: slot.week_number(),
            day_of_week: slot.day_of_week().number(),
            period: slot.period().to_string(),
            period_label: slot.period().label().to_string(),
            start_time: slot.start_time().format("%H:%M").to_string(),
            end_time: slot.end_time().format("%H:%M").to_string(),
            location: slot.location().map(str::to_string),
            display: slot.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct CourseQueryParams {
    /// Case-insensitive match on course name, code or instructor
    pub search: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_course_response() {
        let course = Course::new("113-1", "ENG201", "English Writing")
            .with_fee(2.0, 240)
            .with_time_slots(vec![
                TimeSlot::new(Some(3), 1, "D2", "9:00", "09:50", Some("A101".to_string())).unwrap(),
            ]);
        let id = Uuid::new_v4();

        let response = CourseResponse::new(id, course);
        assert_eq!(response.id, id);
        assert_eq!(response.total_fee, 480);

        let slot = &response.time_slots[0];
        assert_eq!(slot.day_of_week, 1);
        assert_eq!(slot.period, "D2");
        assert_eq!(slot.period_label, "2nd period");
        assert_eq!(slot.start_time, "09:00");
        assert_eq!(slot.week_number, Some(3));
    }
}
