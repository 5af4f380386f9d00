//! Recurrence pattern codec.
//!
//! The host describes a recurring recording as an explicit weekday set
//! plus independent any-time / any-channel flags; the backend stores one
//! of eight fixed schedule patterns. The two models do not line up:
//! decoding is total but loses the original day set for the any-time
//! patterns (only the start time's weekday survives, or nothing at all),
//! and encoding is partial because most day combinations have no backend
//! pattern. Both directions are pure functions; the asymmetry is a
//! property of the backend model and is kept exactly as-is.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDateTime, Weekday};
use tvbridge_api::tvservice::ScheduleType;

use crate::error::ProviderError;
use crate::types::SeriesTimerInfo;

/// Generic recurrence of a series timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPattern {
    /// Record on these weekdays. Empty only for any-time patterns and
    /// one-off schedules.
    pub days: HashSet<Weekday>,
    /// Record every airing regardless of time.
    pub any_time: bool,
    /// Record on any channel. The backend has no "any channel, fixed
    /// time" pattern, so this implies `any_time`.
    pub any_channel: bool,
}

impl From<&SeriesTimerInfo> for SeriesPattern {
    fn from(series: &SeriesTimerInfo) -> Self {
        Self {
            days: series.days.clone(),
            any_time: series.record_any_time,
            any_channel: series.record_any_channel,
        }
    }
}

/// All seven weekdays.
const ALL_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Monday through Friday.
const WORKING_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Saturday and Sunday.
const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

fn day_set(days: &[Weekday]) -> HashSet<Weekday> {
    days.iter().copied().collect()
}

fn matches_exactly(days: &HashSet<Weekday>, expected: &[Weekday]) -> bool {
    days.len() == expected.len() && expected.iter().all(|d| days.contains(d))
}

/// Expands a backend schedule pattern into the generic recurrence.
///
/// Total over all eight pattern values and never fails. The weekday of
/// `start_time` supplies the day for the two weekly patterns; the
/// every-time patterns decode to an empty day set because the backend
/// does not retain one.
#[must_use]
pub fn decode(schedule_type: ScheduleType, start_time: NaiveDateTime) -> SeriesPattern {
    match schedule_type {
        ScheduleType::Once => SeriesPattern {
            days: HashSet::new(),
            any_time: false,
            any_channel: false,
        },
        ScheduleType::Daily => SeriesPattern {
            days: day_set(&ALL_WEEK),
            any_time: false,
            any_channel: false,
        },
        ScheduleType::Weekly => SeriesPattern {
            days: day_set(&[start_time.weekday()]),
            any_time: false,
            any_channel: false,
        },
        ScheduleType::EveryTimeOnThisChannel => SeriesPattern {
            days: HashSet::new(),
            any_time: true,
            any_channel: false,
        },
        ScheduleType::EveryTimeOnEveryChannel => SeriesPattern {
            days: HashSet::new(),
            any_time: true,
            any_channel: true,
        },
        ScheduleType::Weekends => SeriesPattern {
            days: day_set(&WEEKEND),
            any_time: false,
            any_channel: false,
        },
        ScheduleType::WorkingDays => SeriesPattern {
            days: day_set(&WORKING_DAYS),
            any_time: false,
            any_channel: false,
        },
        ScheduleType::WeeklyEveryTimeOnThisChannel => SeriesPattern {
            days: day_set(&[start_time.weekday()]),
            any_time: true,
            any_channel: false,
        },
    }
}

/// Picks the most specific backend pattern for a generic recurrence.
///
/// Checked in order: any-channel, any-time (single day, then unrestricted),
/// then the fixed-time day sets from widest to narrowest.
///
/// # Errors
///
/// Returns [`ProviderError::UnsupportedRecurrence`] when
///
/// - `any_channel` is set without `any_time` (the backend has no
///   "any channel, fixed time" pattern; the combination is rejected
///   rather than silently promoted), or
/// - the day set matches none of the backend's fixed patterns
///   (e.g. Monday+Wednesday+Friday).
pub fn encode(pattern: &SeriesPattern) -> Result<ScheduleType, ProviderError> {
    if pattern.any_channel {
        if !pattern.any_time {
            return Err(ProviderError::UnsupportedRecurrence {
                reason: String::from(
                    "any-channel recording is only available together with any-time",
                ),
            });
        }
        return Ok(ScheduleType::EveryTimeOnEveryChannel);
    }

    if pattern.any_time {
        if pattern.days.len() == 1 {
            return Ok(ScheduleType::WeeklyEveryTimeOnThisChannel);
        }
        return Ok(ScheduleType::EveryTimeOnThisChannel);
    }

    if matches_exactly(&pattern.days, &ALL_WEEK) {
        return Ok(ScheduleType::Daily);
    }
    if matches_exactly(&pattern.days, &WORKING_DAYS) {
        return Ok(ScheduleType::WorkingDays);
    }
    if matches_exactly(&pattern.days, &WEEKEND) {
        return Ok(ScheduleType::Weekends);
    }
    if pattern.days.len() == 1 {
        return Ok(ScheduleType::Weekly);
    }
    if pattern.days.is_empty() {
        return Ok(ScheduleType::Once);
    }

    let mut names: Vec<&str> = ALL_WEEK
        .iter()
        .filter(|d| pattern.days.contains(d))
        .map(|d| match d {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        })
        .collect();
    names.sort_unstable();
    Err(ProviderError::UnsupportedRecurrence {
        reason: format!("no backend pattern records exactly on {}", names.join(",")),
    })
}
