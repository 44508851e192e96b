use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format used in registration window messages
const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Converts an hour offset from UTC (e.g. 8 for Taipei) into a [`FixedOffset`]
pub fn utc_offset(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}

/// Whether registration is currently accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Open,
    NotYetOpen,
    Closed,
}

impl RegistrationStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Optional start and end bounds for self-service registration, in UTC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl RegistrationWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Evaluates the window at `now`. Both bounds are inclusive and a missing
    /// bound places no restriction, so an unconfigured window is open.
    pub fn status(&self, now: DateTime<Utc>) -> RegistrationStatus {
        match (self.start, self.end) {
            (Some(start), _) if now < start => RegistrationStatus::NotYetOpen,
            (_, Some(end)) if now > end => RegistrationStatus::Closed,
            _ => RegistrationStatus::Open,
        }
    }

    /// User-facing description of the window at `now`, with timestamps shown in `offset`
    pub fn message(&self, now: DateTime<Utc>, offset: FixedOffset) -> String {
        let show = |at: DateTime<Utc>| at.with_timezone(&offset).format(DISPLAY_FORMAT).to_string();

        match (self.status(now), self.start, self.end) {
            (RegistrationStatus::Open, Some(start), Some(end)) => {
                format!("Registration is open ({} - {})", show(start), show(end))
            }
            (RegistrationStatus::Open, Some(start), None) => {
                format!("Registration is open (since {})", show(start))
            }
            (RegistrationStatus::Open, None, Some(end)) => {
                format!("Registration is open (closes {})", show(end))
            }
            (RegistrationStatus::Open, None, None) => {
                "Registration window is not configured (open by default)".to_string()
            }
            (RegistrationStatus::NotYetOpen, Some(start), _) => {
                format!("Registration has not started yet (opens {})", show(start))
            }
            (RegistrationStatus::Closed, _, Some(end)) => {
                format!("Registration has closed (closed {})", show(end))
            }
            // status() only reports NotYetOpen/Closed when the matching bound exists
            (status, _, _) => format!("Registration status: {status:?}"),
        }
    }
}

/// The term the system currently operates on, plus its registration window.
/// The most recently set record is the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicYearSetting {
    pub academic_year: String,
    pub window: RegistrationWindow,
    pub set_at: DateTime<Utc>,
    pub set_by: Option<String>,
}

impl AcademicYearSetting {
    pub fn status(&self, now: DateTime<Utc>) -> RegistrationStatus {
        self.window.status(now)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_bounded_window() {
        let window = RegistrationWindow::new(Some(at(2, 0)), Some(at(10, 0)));
        assert_eq!(window.status(at(1, 23)), RegistrationStatus::NotYetOpen);
        assert_eq!(window.status(at(2, 0)), RegistrationStatus::Open);
        assert_eq!(window.status(at(10, 0)), RegistrationStatus::Open);
        assert_eq!(window.status(at(10, 1)), RegistrationStatus::Closed);
    }

    #[test]
    fn test_half_open_windows() {
        let from = RegistrationWindow::new(Some(at(5, 0)), None);
        assert_eq!(from.status(at(4, 0)), RegistrationStatus::NotYetOpen);
        assert_eq!(from.status(at(30, 0)), RegistrationStatus::Open);

        let until = RegistrationWindow::new(None, Some(at(5, 0)));
        assert_eq!(until.status(at(1, 0)), RegistrationStatus::Open);
        assert_eq!(until.status(at(6, 0)), RegistrationStatus::Closed);
    }

    #[test]
    fn test_unconfigured_window_is_open() {
        let window = RegistrationWindow::default();
        assert!(window.status(at(1, 0)).is_open());
        assert!(window.message(at(1, 0), utc_offset(8).unwrap()).contains("not configured"));
    }

    #[test]
    fn test_message_uses_offset() {
        let window = RegistrationWindow::new(Some(at(2, 0)), Some(at(10, 9)));
        let taipei = utc_offset(8).unwrap();

        assert_eq!(
            window.message(at(3, 0), taipei),
            "Registration is open (2024/09/02 08:00 - 2024/09/10 17:00)"
        );
        assert_eq!(
            window.message(at(1, 0), taipei),
            "Registration has not started yet (opens 2024/09/02 08:00)"
        );
        assert_eq!(
            window.message(at(11, 0), taipei),
            "Registration has closed (closed 2024/09/10 17:00)"
        );
    }

    #[test]
    fn test_utc_offset_bounds() {
        assert!(utc_offset(8).is_some());
        assert!(utc_offset(-12).is_some());
        assert!(utc_offset(30).is_none());
    }
}
