use chrono::FixedOffset;
use database::services::enrollment::EnrollmentRecord;
use models::enrollment::{EnrollmentStatus, PaymentStatus};
use serde::Serialize;
use thiserror::Error;

const EXPORT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Serialize)]
struct EnrollmentRow<'a> {
    student_id: &'a str,
    academic_year: &'a str,
    course_code: &'a str,
    course_name: &'a str,
    credits: f32,
    total_fee: u32,
    time_slots: String,
    status: EnrollmentStatus,
    payment_status: PaymentStatus,
    enrolled_at: String,
}

impl<'a> EnrollmentRow<'a> {
    fn new(record: &'a EnrollmentRecord, offset: &FixedOffset) -> Self {
        let course = &record.course;
        let time_slots = course
            .time_slots
            .iter()
            .map(|slot| slot.compact())
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            student_id: &record.student_id,
            academic_year: &course.academic_year,
            course_code: &course.course_code,
            course_name: &course.course_name,
            credits: course.credits,
            total_fee: course.total_fee(),
            time_slots,
            status: record.status,
            payment_status: record.payment_status,
            enrolled_at: record
                .enrolled_at
                .with_timezone(offset)
                .format(EXPORT_TIME_FORMAT)
                .to_string(),
        }
    }
}

/// Renders enrollments as CSV with a header row.
///
/// # Arguments
/// * `records` - Enrollments to export, written in the given order
/// * `offset` - Offset used for the `enrolled_at` column
pub fn enrollments_to_csv(
    records: &[EnrollmentRecord],
    offset: FixedOffset,
) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for record in records {
        writer.serialize(EnrollmentRow::new(record, &offset))?;
    }

    // Serializing no rows writes no header either
    if records.is_empty() {
        writer.write_record([
            "student_id",
            "academic_year",
            "course_code",
            "course_name",
            "credits",
            "total_fee",
            "time_slots",
            "status",
            "payment_status",
            "enrolled_at",
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
