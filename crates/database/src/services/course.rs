use crate::{
    db::is_unique_violation,
    entities::{course, time_slot},
};
use chrono::Utc;
use log::{debug, info};
use models::{Course, RawTimeSlot, TimeSlot};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait, prelude::Expr,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Result of storing a single course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted(Uuid),
    /// A course with the same term and code is already stored
    AlreadyExists,
}

pub struct CourseService;

/// Escapes LIKE wildcards so user search text matches literally.
/// Backslash is the default LIKE escape character in Postgres.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl CourseService {
    /// Get a course with its time slots
    pub async fn get_course_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<Course>, DbErr> {
        let Some(model) = course::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut courses = Self::attach_time_slots(db, vec![model]).await?;
        Ok(courses.pop().map(|(_, course)| course))
    }

    /// Get several courses with their time slots, keyed by id
    pub async fn get_courses_by_ids(
        db: &DatabaseConnection,
        ids: Vec<Uuid>,
    ) -> Result<Vec<(Uuid, Course)>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = course::Entity::find()
            .filter(course::Column::Id.is_in(ids))
            .order_by_asc(course::Column::CourseCode)
            .all(db)
            .await?;

        Self::attach_time_slots(db, models).await
    }

    /// Query the courses students of `term` can register for, optionally
    /// matching `search` against name, code or instructor (case-insensitive)
    pub async fn get_open_courses(
        db: &DatabaseConnection,
        term: &str,
        search: Option<&str>,
    ) -> Result<Vec<(Uuid, Course)>, DbErr> {
        let mut condition = Condition::all()
            .add(course::Column::AcademicYear.eq(term))
            .add(course::Column::IsOpenForRegistration.eq(true));

        if let Some(search) = search.map(str::trim)
            && !search.is_empty()
        {
            let pattern = format!("%{}%", escape_like(search));
            condition = condition.add(
                Condition::any()
                    .add(Expr::cust_with_values(
                        "courses.course_name ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        "courses.course_code ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        "COALESCE(courses.instructor_name, '') ILIKE $1",
                        [pattern],
                    )),
            );
        }

        let models = course::Entity::find()
            .filter(condition)
            .order_by_asc(course::Column::CourseCode)
            .all(db)
            .await?;

        debug!("Found {} open courses for term {term}", models.len());
        Self::attach_time_slots(db, models).await
    }

    /// Store a course and its time slots in one transaction. Courses whose
    /// term and code already exist are left untouched.
    pub async fn save_course(db: &DatabaseConnection, course: &Course) -> Result<SaveOutcome, DbErr> {
        let existing = course::Entity::find()
            .filter(course::Column::AcademicYear.eq(course.academic_year.as_str()))
            .filter(course::Column::CourseCode.eq(course.course_code.as_str()))
            .one(db)
            .await?;

        if existing.is_some() {
            return Ok(SaveOutcome::AlreadyExists);
        }

        let course_id = Uuid::new_v4();
        let txn = db.begin().await?;

        // Another import may have inserted the same code since the lookup above
        if let Err(err) = course::Entity::insert(Self::course_to_active_model(course_id, course))
            .exec(&txn)
            .await
        {
            txn.rollback().await?;
            return if is_unique_violation(&err) {
                Ok(SaveOutcome::AlreadyExists)
            } else {
                Err(err)
            };
        }

        let slots: Vec<time_slot::ActiveModel> = course
            .time_slots
            .iter()
            .enumerate()
            .map(|(position, slot)| Self::slot_to_active_model(course_id, position, slot))
            .collect();

        if !slots.is_empty() {
            time_slot::Entity::insert_many(slots).exec(&txn).await?;
        }

        txn.commit().await?;
        info!(
            "Saved course {} ({}) with {} time slots",
            course.course_code,
            course.academic_year,
            course.time_slots.len()
        );

        Ok(SaveOutcome::Inserted(course_id))
    }

    /// Load the time slots of `models` and convert everything to domain courses
    async fn attach_time_slots(
        db: &DatabaseConnection,
        models: Vec<course::Model>,
    ) -> Result<Vec<(Uuid, Course)>, DbErr> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<Uuid> = models.iter().map(|model| model.id).collect();
        let slot_models = time_slot::Entity::find()
            .filter(time_slot::Column::CourseId.is_in(course_ids))
            .order_by_asc(time_slot::Column::Position)
            .all(db)
            .await?;

        let mut slots_by_course: HashMap<Uuid, Vec<TimeSlot>> = HashMap::new();
        for slot_model in slot_models {
            let course_id = slot_model.course_id;
            slots_by_course
                .entry(course_id)
                .or_default()
                .push(slot_from_model(slot_model)?);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let slots = slots_by_course.remove(&model.id).unwrap_or_default();
                (model.id, course_from_model(model, slots))
            })
            .collect())
    }

    fn course_to_active_model(id: Uuid, course: &Course) -> course::ActiveModel {
        course::ActiveModel {
            id: Set(id),
            academic_year: Set(course.academic_year.clone()),
            course_code: Set(course.course_code.clone()),
            course_name: Set(course.course_name.clone()),
            credits: Set(course.credits),
            fee_per_credit: Set(saturating_i32(course.fee_per_credit)),
            instructor_name: Set(course.instructor_name.clone()),
            max_students: Set(course.max_students.map(saturating_i32)),
            is_open_for_registration: Set(course.is_open_for_registration),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
    }

    fn slot_to_active_model(course_id: Uuid, position: usize, slot: &TimeSlot) -> time_slot::ActiveModel {
        let raw = RawTimeSlot::from(slot.clone());

        time_slot::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course_id),
            position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            week_number: Set(slot.week_number().map(saturating_i32)),
            day_of_week: Set(i16::from(slot.day_of_week().number())),
            period: Set(raw.period),
            start_time: Set(raw.start_time),
            end_time: Set(raw.end_time),
            location: Set(raw.location),
        }
    }
}

/// Convert a stored slot back into a validated [`TimeSlot`]
pub(crate) fn slot_from_model(model: time_slot::Model) -> Result<TimeSlot, DbErr> {
    let id = model.id;
    let raw = RawTimeSlot {
        week_number: model.week_number.map(i64::from),
        day_of_week: i64::from(model.day_of_week),
        period: model.period,
        start_time: model.start_time,
        end_time: model.end_time,
        location: model.location,
    };

    TimeSlot::try_from(raw)
        .map_err(|e| DbErr::Type(format!("Invalid time slot {id} in database: {e}")))
}

pub(crate) fn course_from_model(model: course::Model, time_slots: Vec<TimeSlot>) -> Course {
    Course {
        academic_year: model.academic_year,
        course_code: model.course_code,
        course_name: model.course_name,
        credits: model.credits,
        fee_per_credit: u32::try_from(model.fee_per_credit).unwrap_or_default(),
        time_slots,
        instructor_name: model.instructor_name,
        max_students: model.max_students.and_then(|n| u32::try_from(n).ok()),
        is_open_for_registration: model.is_open_for_registration,
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod test {
    use super::*;
    use models::{DayOfWeek, Period};

    #[test]
    fn test_search_wildcards_match_literally() {
        assert_eq!(escape_like("ENG201"), "ENG201");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("ENG_2"), "ENG\\_2");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }

    fn stored_slot(day_of_week: i16, period: &str) -> time_slot::Model {
        time_slot::Model {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            position: 0,
            week_number: Some(4),
            day_of_week,
            period: period.to_string(),
            start_time: "09:10".to_string(),
            end_time: "10:00".to_string(),
            location: Some("B201".to_string()),
        }
    }

    #[test]
    fn test_slot_from_model() {
        let slot = slot_from_model(stored_slot(2, "D2")).unwrap();
        assert_eq!(slot.day_of_week(), DayOfWeek::Tuesday);
        assert_eq!(slot.period(), Period::D2);
        assert_eq!(slot.week_number(), Some(4));
        assert_eq!(slot.location(), Some("B201"));
    }

    #[test]
    fn test_corrupt_slot_is_a_type_error() {
        let err = slot_from_model(stored_slot(9, "D2")).unwrap_err();
        assert!(matches!(err, DbErr::Type(message) if message.contains("Day of week")));
    }

    #[test]
    fn test_slot_active_model_keeps_order_and_fields() {
        let slot = TimeSlot::new(None, 5, "DN", "12:10", "13:00", None).unwrap();
        let course_id = Uuid::new_v4();
        let active = CourseService::slot_to_active_model(course_id, 3, &slot);

        assert_eq!(active.course_id, Set(course_id));
        assert_eq!(active.position, Set(3));
        assert_eq!(active.day_of_week, Set(5));
        assert_eq!(active.period, Set("DN".to_string()));
        assert_eq!(active.start_time, Set("12:10".to_string()));
        assert_eq!(active.week_number, Set(None));
    }

    #[test]
    fn test_course_from_model() {
        let id = Uuid::new_v4();
        let model = course::Model {
            id,
            academic_year: "113-1".to_string(),
            course_code: "MATH101".to_string(),
            course_name: "Calculus".to_string(),
            credits: 3.0,
            fee_per_credit: 240,
            instructor_name: None,
            max_students: Some(40),
            is_open_for_registration: true,
            created_at: Utc::now(),
            updated_at: None,
        };

        let course = course_from_model(model, Vec::new());
        assert_eq!(course.total_fee(), 720);
        assert_eq!(course.max_students, Some(40));
    }
}
