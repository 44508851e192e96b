use models::{ConflictReason, Course, DayOfWeek, Period, TimeSlot, find_conflict, slots_overlap};

fn slot(week: Option<i64>, day: i64, period: &str, start: &str, end: &str) -> TimeSlot {
    TimeSlot::new(week, day, period, start, end, None).unwrap()
}

/// A spread of slots covering shared periods, shared weeks and touching times
fn sample_slots() -> Vec<TimeSlot> {
    vec![
        slot(None, 1, "D1", "08:10", "09:00"),
        slot(None, 1, "D2", "09:00", "09:50"),
        slot(Some(1), 1, "D2", "09:10", "10:00"),
        slot(Some(2), 1, "D3", "09:30", "10:20"),
        slot(None, 1, "DN", "12:00", "13:00"),
        slot(None, 1, "D5", "12:30", "13:20"),
        slot(Some(2), 2, "D1", "08:10", "09:00"),
        slot(None, 2, "D1", "14:00", "14:50"),
        slot(None, 7, "D9", "20:00", "21:00"),
        slot(None, 7, "D8", "23:00", "01:00"),
    ]
}

#[test]
fn overlap_is_symmetric() {
    let slots = sample_slots();
    for a in &slots {
        for b in &slots {
            assert_eq!(slots_overlap(a, b), slots_overlap(b, a), "{a} vs {b}");
        }
    }
}

#[test]
fn same_day_same_period_always_overlaps() {
    let slots = sample_slots();
    for a in &slots {
        for b in &slots {
            let same_week = match (a.week_number(), b.week_number()) {
                (Some(x), Some(y)) => x == y,
                _ => true,
            };
            if a.day_of_week() == b.day_of_week() && a.period() == b.period() && same_week {
                assert!(slots_overlap(a, b), "{a} vs {b}");
            }
        }
    }
}

#[test]
fn different_days_never_overlap() {
    let slots = sample_slots();
    for a in &slots {
        for b in &slots {
            if a.day_of_week() != b.day_of_week() {
                assert!(!slots_overlap(a, b), "{a} vs {b}");
            }
        }
    }
}

#[test]
fn explicit_differing_weeks_never_overlap() {
    let a = slot(Some(3), 4, "D6", "14:10", "15:00");
    let b = slot(Some(4), 4, "D6", "14:10", "15:00");
    assert!(!slots_overlap(&a, &b));
}

#[test]
fn touching_intervals_do_not_overlap() {
    let a = slot(None, 1, "D2", "09:00", "10:00");
    let b = slot(None, 1, "D3", "10:00", "10:50");
    assert!(!slots_overlap(&a, &b));
}

#[test]
fn strict_overlap_is_detected() {
    let a = slot(None, 1, "D1", "08:00", "09:00");
    let b = slot(None, 1, "D2", "08:30", "09:30");
    assert!(slots_overlap(&a, &b));
}

#[test]
fn same_course_code_blocks_regardless_of_time() {
    let candidate = Course::new("113-1", "MATH101", "Calculus")
        .with_time_slots(vec![slot(None, 1, "D1", "08:00", "08:50")]);
    let enrolled = Course::new("113-1", "MATH101", "Calculus")
        .with_time_slots(vec![slot(None, 5, "D8", "16:00", "16:50")]);

    assert!(find_conflict(&candidate, &[enrolled], "113-1").is_some());
}

#[test]
fn wrong_term_candidate_is_rejected() {
    // A slot overlap exists too, but the term check comes first
    let candidate = Course::new("112-2", "MATH101", "Calculus")
        .with_time_slots(vec![slot(None, 1, "D1", "08:00", "08:50")]);
    let enrolled = Course::new("113-1", "PHY101", "Physics")
        .with_time_slots(vec![slot(None, 1, "D1", "08:00", "08:50")]);

    let reason = find_conflict(&candidate, &[enrolled], "113-1");
    assert!(matches!(reason, Some(ConflictReason::WrongTerm { .. })));
}

#[test]
fn no_conflict_baseline() {
    let candidate = Course::new("113-1", "MATH101", "Calculus")
        .with_time_slots(vec![slot(None, 1, "D1", "08:00", "08:50")]);
    let enrolled = Course::new("113-1", "PHY101", "Physics")
        .with_time_slots(vec![slot(None, 2, "D1", "08:00", "08:50")]);

    assert_eq!(find_conflict(&candidate, &[enrolled], "113-1"), None);
}

#[test]
fn empty_schedule_never_conflicts() {
    let candidate = Course::new("113-1", "MATH101", "Calculus")
        .with_time_slots(vec![slot(None, 1, "D1", "08:00", "08:50")]);
    assert_eq!(find_conflict(&candidate, &[], "113-1"), None);
}

#[test]
fn student_adding_overlapping_history_course_is_rejected() {
    let course_a = Course::new("113-1", "ENG201", "English Writing")
        .with_time_slots(vec![slot(None, 1, "D2", "09:00", "09:50")]);
    let course_b = Course::new("113-1", "HIS301", "World History")
        .with_time_slots(vec![slot(None, 1, "D2", "09:30", "10:20")]);

    let reason = find_conflict(&course_b, &[course_a], "113-1").expect("should conflict");

    match &reason {
        ConflictReason::TimeOverlap {
            enrolled_name,
            enrolled_code,
            enrolled_slot,
            slot,
            ..
        } => {
            assert_eq!(enrolled_name, "English Writing");
            assert_eq!(enrolled_code, "ENG201");
            assert_eq!(enrolled_slot.day_of_week, DayOfWeek::Monday);
            assert_eq!(enrolled_slot.period, Period::D2);
            assert_eq!(slot.period, Period::D2);
        }
        other => panic!("Expected a time overlap, got {other:?}"),
    }

    let message = reason.to_string();
    assert!(message.contains("English Writing"));
    assert!(message.contains("Monday period D2"));
}

#[test]
fn checker_does_not_mutate_inputs() {
    let candidate = Course::new("113-1", "HIS301", "World History")
        .with_time_slots(vec![slot(None, 1, "D2", "09:30", "10:20")]);
    let enrolled = vec![
        Course::new("113-1", "ENG201", "English Writing")
            .with_time_slots(vec![slot(None, 1, "D2", "09:00", "09:50")]),
    ];
    let (candidate_before, enrolled_before) = (candidate.clone(), enrolled.clone());

    let first = find_conflict(&candidate, &enrolled, "113-1");
    let second = find_conflict(&candidate, &enrolled, "113-1");

    assert_eq!(first, second);
    assert_eq!(candidate, candidate_before);
    assert_eq!(enrolled, enrolled_before);
}
