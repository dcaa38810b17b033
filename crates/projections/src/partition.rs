//! Past/upcoming classification of shows.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which side of the reference instant a show falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowPartition {
    Past,
    Upcoming,
}

/// Classifies a start time against `now`.
///
/// A show starting exactly at `now` is upcoming, so every show lands in
/// exactly one bucket.
pub fn partition(start_time: DateTime<Utc>, now: DateTime<Utc>) -> ShowPartition {
    if start_time < now {
        ShowPartition::Past
    } else {
        ShowPartition::Upcoming
    }
}

pub fn is_upcoming(start_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    partition(start_time, now) == ShowPartition::Upcoming
}

/// Past and upcoming totals for one venue or artist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionCounts {
    pub past: u64,
    pub upcoming: u64,
}

impl PartitionCounts {
    /// Counts start times on each side of `now`.
    pub fn tally<I>(start_times: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        start_times
            .into_iter()
            .fold(Self::default(), |mut counts, start_time| {
                match partition(start_time, now) {
                    ShowPartition::Past => counts.past += 1,
                    ShowPartition::Upcoming => counts.upcoming += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> u64 {
        self.past + self.upcoming
    }
}
