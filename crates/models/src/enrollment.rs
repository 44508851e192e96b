use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Lifecycle state of a student's registration for a course
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnrollmentStatus {
    Success,
    Pending,
    CancelledByStudent,
    /// Cancelled by staff after a schedule conflict surfaced
    CancelledConflict,
}

impl EnrollmentStatus {
    /// Active registrations occupy the student's schedule
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Success | Self::Pending)
    }

    pub fn active() -> [Self; 2] {
        [Self::Success, Self::Pending]
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    AwaitingPayment,
    Paid,
    Refunded,
    NotRequired,
}
