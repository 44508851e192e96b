use crate::{
    course::Course,
    period::Period,
    time_slot::{DayOfWeek, TimeSlot},
};
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Determines whether two time slots occupy overlapping wall-clock time,
/// regardless of which course they belong to.
///
/// Rules, applied in order:
/// 1. Different days never overlap.
/// 2. If both slots name a week and the weeks differ, they do not overlap.
///    A slot without a week recurs every week and is compared against any week.
/// 3. The same period code on the same day (and week) always overlaps, whatever
///    the literal start and end times say.
/// 4. Otherwise the half-open intervals `[start, end)` are compared in minutes
///    since midnight, so slots that merely touch do not overlap.
///
/// Times are parsed when a [`TimeSlot`] is built, so this never has to deal
/// with malformed input.
pub fn slots_overlap(a: &TimeSlot, b: &TimeSlot) -> bool {
    if a.day_of_week() != b.day_of_week() {
        return false;
    }

    if let (Some(week_a), Some(week_b)) = (a.week_number(), b.week_number())
        && week_a != week_b
    {
        return false;
    }

    if a.period() == b.period() {
        return true;
    }

    a.start_minutes().max(b.start_minutes()) < a.end_minutes().min(b.end_minutes())
}

/// The day/period identity of a slot, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotRef {
    pub day_of_week: DayOfWeek,
    pub period: Period,
    pub week_number: Option<u32>,
}

impl From<&TimeSlot> for SlotRef {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            day_of_week: slot.day_of_week(),
            period: slot.period(),
            week_number: slot.week_number(),
        }
    }
}

impl Display for SlotRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} period {}", self.day_of_week, self.period)?;
        if let Some(week) = self.week_number {
            write!(f, " (week {week})")?;
        }
        Ok(())
    }
}

/// Why a course cannot be added to a student's schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictReason {
    /// The candidate course is not offered in the term being registered for
    WrongTerm {
        course_code: String,
        course_name: String,
        course_term: String,
        term: String,
    },
    /// The student already holds another section of the same course
    SameCourse {
        course_code: String,
        course_name: String,
    },
    /// A slot of the candidate overlaps a slot of an enrolled course
    TimeOverlap {
        course_code: String,
        course_name: String,
        slot: SlotRef,
        enrolled_code: String,
        enrolled_name: String,
        enrolled_slot: SlotRef,
    },
}

impl Display for ConflictReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::WrongTerm {
                course_code,
                course_name,
                course_term,
                term,
            } => write!(
                f,
                "Course '{course_name}' ({course_code}) belongs to term {course_term}, \
                 not the current term {term}."
            ),
            Self::SameCourse {
                course_code,
                course_name,
            } => write!(
                f,
                "You are already registered for another section of '{course_name}' ({course_code})."
            ),
            Self::TimeOverlap {
                course_code,
                course_name,
                slot,
                enrolled_code,
                enrolled_name,
                enrolled_slot,
            } => write!(
                f,
                "'{course_name}' ({course_code}) on {slot} overlaps with your registered \
                 course '{enrolled_name}' ({enrolled_code}) on {enrolled_slot}."
            ),
        }
    }
}

/// Checks whether `candidate` can be added next to the `enrolled` courses in `term`.
///
/// `enrolled` is expected to hold the student's active courses for `term`;
/// courses from other terms are skipped. Returns the first conflict found, in
/// `enrolled` order, or `None` when the candidate fits.
///
/// # Arguments
/// * `candidate` - The course the student wants to add
/// * `enrolled` - The student's currently active courses
/// * `term` - The academic term the registration is for, e.g. "113-1"
pub fn find_conflict(candidate: &Course, enrolled: &[Course], term: &str) -> Option<ConflictReason> {
    if candidate.academic_year != term {
        return Some(ConflictReason::WrongTerm {
            course_code: candidate.course_code.clone(),
            course_name: candidate.course_name.clone(),
            course_term: candidate.academic_year.clone(),
            term: term.to_string(),
        });
    }

    for other in enrolled.iter().filter(|other| other.academic_year == term) {
        // Re-registering a course is rejected even if the sections don't overlap
        if other.course_code == candidate.course_code {
            return Some(ConflictReason::SameCourse {
                course_code: candidate.course_code.clone(),
                course_name: candidate.course_name.clone(),
            });
        }

        if let Some((slot, other_slot)) = first_overlap(&candidate.time_slots, &other.time_slots) {
            return Some(ConflictReason::TimeOverlap {
                course_code: candidate.course_code.clone(),
                course_name: candidate.course_name.clone(),
                slot: slot.into(),
                enrolled_code: other.course_code.clone(),
                enrolled_name: other.course_name.clone(),
                enrolled_slot: other_slot.into(),
            });
        }
    }

    None
}

/// Finds the first pair of overlapping slots, candidate slots in the outer loop
pub fn first_overlap<'a>(
    slots: &'a [TimeSlot],
    others: &'a [TimeSlot],
) -> Option<(&'a TimeSlot, &'a TimeSlot)> {
    slots.iter().find_map(|slot| {
        others
            .iter()
            .find(|other| slots_overlap(slot, other))
            .map(|other| (slot, other))
    })
}
