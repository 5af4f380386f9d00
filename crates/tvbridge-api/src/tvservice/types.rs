//! Wire entity types for the TV service JSON API.
//!
//! Field names follow the backend's PascalCase member naming. Optional
//! text fields arrive as empty strings and are deserialized as `None`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::json::{deserialize_backend_datetime, deserialize_empty_string_as_none};

/// Service description and status.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceDescription {
    /// API contract version.
    pub api_version: u32,
    /// Backend service version string.
    pub service_version: String,
    /// Whether the service currently reaches its TV server.
    #[serde(rename = "HasConnectionToTVServer")]
    pub has_connection_to_tv_server: bool,
}

/// Installed tuner card.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TunerCard {
    /// Numeric card id.
    pub id: i32,
    /// Card display name.
    pub name: String,
    /// Whether the card is enabled.
    pub enabled: bool,
}

/// Tuner card with an active tuning session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActiveTunerCard {
    /// Numeric card id.
    pub id: i32,
    /// Channel the card is currently tuned to.
    pub channel_id: i32,
    /// User holding the session, if any.
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub user: Option<String>,
}

/// Channel group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChannelGroup {
    /// Numeric group id.
    pub id: i32,
    /// Group display name.
    pub group_name: String,
    /// Backend-side sort position.
    pub sort_order: i32,
}

/// Channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Channel {
    /// Numeric channel id.
    pub id: i32,
    /// Channel display title.
    pub title: String,
    /// `true` for TV, `false` for radio.
    pub is_tv: bool,
    /// Whether the channel is shown in the guide.
    pub visible_in_guide: bool,
}

/// Guide program.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Program {
    /// Numeric program id.
    pub id: i32,
    /// Owning channel id.
    pub channel_id: i32,
    /// Program title.
    pub title: String,
    /// Synopsis (empty string means absent).
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub description: Option<String>,
    /// Start of the program interval.
    #[serde(deserialize_with = "deserialize_backend_datetime")]
    pub start_time: NaiveDateTime,
    /// End of the program interval (exclusive).
    #[serde(deserialize_with = "deserialize_backend_datetime")]
    pub end_time: NaiveDateTime,
    /// Episode title.
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub episode_name: Option<String>,
    /// Episode number as text; non-empty only for series episodes.
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub episode_num: Option<String>,
    /// Season number as text; non-empty only for series episodes.
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub series_num: Option<String>,
    /// Free-text genre.
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub genre: Option<String>,
}

/// Completed or in-progress recording.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Recording {
    /// Numeric recording id.
    pub id: i32,
    /// Channel the recording was made from.
    pub channel_id: i32,
    /// Schedule that produced this recording.
    pub schedule_id: i32,
    /// Recording title.
    pub title: String,
    /// Synopsis (empty string means absent).
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub description: Option<String>,
    /// Start of the recorded interval.
    #[serde(deserialize_with = "deserialize_backend_datetime")]
    pub start_time: NaiveDateTime,
    /// End of the recorded interval.
    #[serde(deserialize_with = "deserialize_backend_datetime")]
    pub end_time: NaiveDateTime,
    /// Episode title.
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub episode_name: Option<String>,
    /// Episode number as text; non-empty only for series episodes.
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub episode_num: Option<String>,
    /// Free-text genre.
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub genre: Option<String>,
    /// Backend-side file path of the recording.
    pub file_name: String,
    /// Whether the recording is still in progress.
    pub is_recording: bool,
}

/// Persisted timer, one-off or recurring.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Schedule {
    /// Numeric schedule id.
    pub id: i32,
    /// Target channel id.
    pub channel_id: i32,
    /// Parent schedule id for generated occurrences of a series.
    pub parent_schedule_id: i32,
    /// Schedule title.
    pub title: String,
    /// Scheduled start.
    #[serde(deserialize_with = "deserialize_backend_datetime")]
    pub start_time: NaiveDateTime,
    /// Scheduled end.
    #[serde(deserialize_with = "deserialize_backend_datetime")]
    pub end_time: NaiveDateTime,
    /// Recurrence pattern.
    pub schedule_type: ScheduleType,
    /// Pre-record padding in minutes.
    pub pre_record_interval: i32,
    /// Post-record padding in minutes.
    pub post_record_interval: i32,
    /// Whether this schedule is a generated occurrence of a series.
    pub series: bool,
}

/// The backend's closed recurrence pattern catalog.
///
/// Stored as a plain integer in schedule rows; an integer outside the
/// catalog is a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ScheduleType {
    /// Single recording at a fixed time.
    Once,
    /// Every day at the start time.
    Daily,
    /// Once a week, on the start time's weekday.
    Weekly,
    /// Every airing on the schedule's channel.
    EveryTimeOnThisChannel,
    /// Every airing on any channel.
    EveryTimeOnEveryChannel,
    /// Saturdays and Sundays at the start time.
    Weekends,
    /// Monday through Friday at the start time.
    WorkingDays,
    /// Every airing on the schedule's channel, on the start time's weekday.
    WeeklyEveryTimeOnThisChannel,
}

impl ScheduleType {
    /// Whether this is the one-off (non-recurring) pattern.
    #[must_use]
    pub const fn is_once(self) -> bool {
        matches!(self, Self::Once)
    }
}

impl From<ScheduleType> for i32 {
    fn from(value: ScheduleType) -> Self {
        match value {
            ScheduleType::Once => 0,
            ScheduleType::Daily => 1,
            ScheduleType::Weekly => 2,
            ScheduleType::EveryTimeOnThisChannel => 3,
            ScheduleType::EveryTimeOnEveryChannel => 4,
            ScheduleType::Weekends => 5,
            ScheduleType::WorkingDays => 6,
            ScheduleType::WeeklyEveryTimeOnThisChannel => 7,
        }
    }
}

impl TryFrom<i32> for ScheduleType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Once),
            1 => Ok(Self::Daily),
            2 => Ok(Self::Weekly),
            3 => Ok(Self::EveryTimeOnThisChannel),
            4 => Ok(Self::EveryTimeOnEveryChannel),
            5 => Ok(Self::Weekends),
            6 => Ok(Self::WorkingDays),
            7 => Ok(Self::WeeklyEveryTimeOnThisChannel),
            other => Err(format!("unknown schedule type {other}")),
        }
    }
}

/// Boolean operation result wrapper.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoolResult {
    /// `true` on success, `false` on backend-side refusal.
    pub result: bool,
}

/// String operation result wrapper.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StringResult {
    /// The returned value.
    pub result: String,
}
