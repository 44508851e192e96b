use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::{AsRefStr, EnumIter, EnumProperty, IntoEnumIterator};

/// Error returned when a string is not one of the known period codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePeriodError(pub String);

impl Display for ParsePeriodError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let valid = Period::iter()
            .map(|period| period.as_str().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "Invalid period code '{}' (expected one of {valid})", self.0)
    }
}

impl std::error::Error for ParsePeriodError {}

/// A named class period within a school day
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumIter,
    EnumProperty,
)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    #[strum(props(label = "1st period"))]
    D1,
    #[strum(props(label = "2nd period"))]
    D2,
    #[strum(props(label = "3rd period"))]
    D3,
    #[strum(props(label = "4th period"))]
    D4,
    /// Noon break between the morning and afternoon blocks
    #[strum(props(label = "noon period"))]
    DN,
    #[strum(props(label = "5th period"))]
    D5,
    #[strum(props(label = "6th period"))]
    D6,
    #[strum(props(label = "7th period"))]
    D7,
    #[strum(props(label = "8th period"))]
    D8,
    #[strum(props(label = "9th period"))]
    D9,
}

impl Period {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Human readable name, e.g. "2nd period"
    pub fn label(&self) -> &'static str {
        self.get_str("label").unwrap_or_default()
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|period| period.as_str() == code)
            .ok_or_else(|| ParsePeriodError(code.to_string()))
    }
}

impl TryFrom<String> for Period {
    type Error = ParsePeriodError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::from_str(&code)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.as_str().to_string()
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
