//! Human-readable show times.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display layouts for show times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `Tuesday May, 21, 2019 at 9:30PM`
    #[default]
    Full,
    /// `Tue 05, 21, 2019 9:30PM`
    Medium,
}

impl DateFormat {
    fn pattern(&self) -> &'static str {
        match self {
            DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
            DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
        }
    }
}

pub fn format_datetime(instant: DateTime<Utc>, format: DateFormat) -> String {
    instant.format(format.pattern()).to_string()
}
