use crate::period::{ParsePeriodError, Period};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::{EnumIter, EnumProperty, IntoEnumIterator};

/// Wall-clock format used for slot start and end times
pub const TIME_FORMAT: &str = "%H:%M";

/// Represents a day of the week, numbered 1 (Monday) through 7 (Sunday)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
    EnumProperty, strum::Display,
)]
#[serde(try_from = "i64", into = "u8")]
pub enum DayOfWeek {
    #[strum(props(short = "Mon"))]
    Monday = 1,
    #[strum(props(short = "Tue"))]
    Tuesday = 2,
    #[strum(props(short = "Wed"))]
    Wednesday = 3,
    #[strum(props(short = "Thu"))]
    Thursday = 4,
    #[strum(props(short = "Fri"))]
    Friday = 5,
    #[strum(props(short = "Sat"))]
    Saturday = 6,
    #[strum(props(short = "Sun"))]
    Sunday = 7,
}

impl DayOfWeek {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn short_name(&self) -> &'static str {
        self.get_str("short").unwrap_or_default()
    }

    /// Looks up a day by its 1-based number
    pub fn from_number(number: i64) -> Option<Self> {
        Self::iter().find(|day| i64::from(day.number()) == number)
    }
}

impl TryFrom<i64> for DayOfWeek {
    type Error = TimeSlotError;

    fn try_from(number: i64) -> Result<Self, Self::Error> {
        Self::from_number(number).ok_or(TimeSlotError::InvalidDayOfWeek(number))
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day.number()
    }
}

/// Reasons a time slot can fail validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSlotError {
    InvalidDayOfWeek(i64),
    InvalidWeekNumber(i64),
    InvalidPeriod(ParsePeriodError),
    InvalidTime { field: &'static str, value: String },
}

impl Display for TimeSlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::InvalidDayOfWeek(day) => {
                write!(f, "Day of week must be between 1 and 7, got {day}")
            }
            Self::InvalidWeekNumber(week) => {
                write!(f, "Week number must be a positive integer, got {week}")
            }
            Self::InvalidPeriod(err) => write!(f, "{err}"),
            Self::InvalidTime { field, value } => {
                write!(f, "{field} must be in HH:MM format, got '{value}'")
            }
        }
    }
}

impl std::error::Error for TimeSlotError {}

impl From<ParsePeriodError> for TimeSlotError {
    fn from(err: ParsePeriodError) -> Self {
        Self::InvalidPeriod(err)
    }
}

/// Unvalidated slot fields as they arrive from forms, CSV rows or storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTimeSlot {
    pub week_number: Option<i64>,
    pub day_of_week: i64,
    pub period: String,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
}

/// A validated weekly meeting time of a course.
///
/// Slots are only obtainable through [`TimeSlot::new`] or
/// [`TimeSlot::try_from`], so every instance holds a day in 1..=7, a known
/// [`Period`] and parsed start/end times. There are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSlot", into = "RawTimeSlot")]
pub struct TimeSlot {
    week_number: Option<u32>,
    day_of_week: DayOfWeek,
    period: Period,
    start_time: NaiveTime,
    end_time: NaiveTime,
    location: Option<String>,
}

impl TimeSlot {
    /// Validates and builds a time slot.
    ///
    /// # Arguments
    /// * `week_number` - Calendar week the slot applies to, `None` for every week
    /// * `day_of_week` - 1 (Monday) through 7 (Sunday)
    /// * `period` - One of `D1`..`D9` or `DN`
    /// * `start_time`, `end_time` - 24-hour `HH:MM` strings
    /// * `location` - Optional room description
    pub fn new(
        week_number: Option<i64>,
        day_of_week: i64,
        period: &str,
        start_time: &str,
        end_time: &str,
        location: Option<String>,
    ) -> Result<Self, TimeSlotError> {
        let week_number = match week_number {
            Some(week) if week >= 1 => {
                Some(u32::try_from(week).map_err(|_| TimeSlotError::InvalidWeekNumber(week))?)
            }
            Some(week) => return Err(TimeSlotError::InvalidWeekNumber(week)),
            None => None,
        };

        Ok(Self {
            week_number,
            day_of_week: DayOfWeek::try_from(day_of_week)?,
            period: Period::from_str(period)?,
            start_time: parse_wall_time("start_time", start_time)?,
            end_time: parse_wall_time("end_time", end_time)?,
            location: location.filter(|location| !location.trim().is_empty()),
        })
    }

    pub fn week_number(&self) -> Option<u32> {
        self.week_number
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Start of the slot in minutes since midnight
    pub fn start_minutes(&self) -> u32 {
        minutes_since_midnight(self.start_time)
    }

    /// End of the slot in minutes since midnight
    pub fn end_minutes(&self) -> u32 {
        minutes_since_midnight(self.end_time)
    }

    /// Whether this slot and `other` occupy overlapping wall-clock time.
    /// See [`crate::conflict::slots_overlap`].
    pub fn overlaps_with(&self, other: &TimeSlot) -> bool {
        crate::conflict::slots_overlap(self, other)
    }

    /// Compact form used in exports, e.g. `Mon D2 09:00-09:50 @B201`
    pub fn compact(&self) -> String {
        let mut result = format!(
            "{} {} {}-{}",
            self.day_of_week.short_name(),
            self.period,
            self.start_time.format(TIME_FORMAT),
            self.end_time.format(TIME_FORMAT)
        );

        if let Some(week) = self.week_number {
            result.push_str(&format!(" W{week}"));
        }
        if let Some(location) = &self.location {
            result.push_str(&format!(" @{location}"));
        }

        result
    }
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = TimeSlotError;

    fn try_from(raw: RawTimeSlot) -> Result<Self, Self::Error> {
        Self::new(
            raw.week_number,
            raw.day_of_week,
            &raw.period,
            &raw.start_time,
            &raw.end_time,
            raw.location,
        )
    }
}

impl From<TimeSlot> for RawTimeSlot {
    fn from(slot: TimeSlot) -> Self {
        RawTimeSlot {
            week_number: slot.week_number.map(i64::from),
            day_of_week: i64::from(slot.day_of_week.number()),
            period: slot.period.to_string(),
            start_time: slot.start_time.format(TIME_FORMAT).to_string(),
            end_time: slot.end_time.format(TIME_FORMAT).to_string(),
            location: slot.location,
        }
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} {} ({}-{})",
            self.day_of_week,
            self.period,
            self.start_time.format(TIME_FORMAT),
            self.end_time.format(TIME_FORMAT)
        )?;

        if let Some(week) = self.week_number {
            write!(f, " week {week}")?;
        }

        Ok(())
    }
}

fn parse_wall_time(field: &'static str, value: &str) -> Result<NaiveTime, TimeSlotError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| TimeSlotError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

#[cfg(test)]
mod test {
    use super::*;

    fn slot(day: i64, period: &str, start: &str, end: &str) -> Result<TimeSlot, TimeSlotError> {
        TimeSlot::new(None, day, period, start, end, None)
    }

    #[test]
    fn test_valid_slot() {
        let slot = TimeSlot::new(Some(3), 2, "D2", "09:10", "10:00", Some("B201".into())).unwrap();
        assert_eq!(slot.week_number(), Some(3));
        assert_eq!(slot.day_of_week(), DayOfWeek::Tuesday);
        assert_eq!(slot.period(), Period::D2);
        assert_eq!(slot.start_minutes(), 9 * 60 + 10);
        assert_eq!(slot.end_minutes(), 600);
        assert_eq!(slot.location(), Some("B201"));
    }

    #[test]
    fn test_day_of_week_range() {
        assert!(slot(1, "D1", "08:00", "08:50").is_ok());
        assert!(slot(7, "D1", "08:00", "08:50").is_ok());
        assert_eq!(
            slot(0, "D1", "08:00", "08:50").unwrap_err(),
            TimeSlotError::InvalidDayOfWeek(0)
        );
        assert_eq!(
            slot(8, "D1", "08:00", "08:50").unwrap_err(),
            TimeSlotError::InvalidDayOfWeek(8)
        );
        assert!(slot(-1, "D1", "08:00", "08:50").is_err());
    }

    #[test]
    fn test_invalid_period() {
        let err = slot(1, "D10", "08:00", "08:50").unwrap_err();
        assert!(matches!(err, TimeSlotError::InvalidPeriod(_)));
    }

    #[test]
    fn test_invalid_times() {
        for bad in ["24:00", "12:60", "noon", "", "0830"] {
            let err = slot(1, "D1", bad, "09:00").unwrap_err();
            assert!(
                matches!(err, TimeSlotError::InvalidTime { field: "start_time", .. }),
                "{bad:?} should be rejected"
            );
        }

        let err = slot(1, "D1", "08:00", "9pm").unwrap_err();
        assert!(matches!(err, TimeSlotError::InvalidTime { field: "end_time", .. }));
    }

    #[test]
    fn test_end_before_start_is_allowed() {
        assert!(slot(5, "D9", "23:00", "01:00").is_ok());
    }

    #[test]
    fn test_week_number_must_be_positive() {
        assert_eq!(
            TimeSlot::new(Some(0), 1, "D1", "08:00", "08:50", None).unwrap_err(),
            TimeSlotError::InvalidWeekNumber(0)
        );
        assert!(TimeSlot::new(Some(-4), 1, "D1", "08:00", "08:50", None).is_err());
    }

    #[test]
    fn test_blank_location_is_dropped() {
        let slot = TimeSlot::new(None, 1, "D1", "08:00", "08:50", Some("  ".into())).unwrap();
        assert_eq!(slot.location(), None);
    }

    #[test]
    fn test_display_and_compact() {
        let slot = TimeSlot::new(Some(2), 1, "D2", "09:00", "09:50", Some("A101".into())).unwrap();
        assert_eq!(slot.to_string(), "Monday D2 (09:00-09:50) week 2");
        assert_eq!(slot.compact(), "Mon D2 09:00-09:50 W2 @A101");
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"week_number":null,"day_of_week":3,"period":"DN","start_time":"12:10","end_time":"13:00","location":null}"#;
        let slot: TimeSlot = serde_json::from_str(json).unwrap();
        assert_eq!(slot.period(), Period::DN);
        assert_eq!(slot.day_of_week(), DayOfWeek::Wednesday);

        let bad = r#"{"week_number":null,"day_of_week":9,"period":"DN","start_time":"12:10","end_time":"13:00","location":null}"#;
        assert!(serde_json::from_str::<TimeSlot>(bad).is_err());
    }

    #[test]
    fn test_day_of_week_names() {
        assert_eq!(DayOfWeek::Monday.to_string(), "Monday");
        assert_eq!(DayOfWeek::Sunday.short_name(), "Sun");
        assert_eq!(DayOfWeek::from_number(4), Some(DayOfWeek::Thursday));
        assert_eq!(DayOfWeek::from_number(0), None);
    }
}
