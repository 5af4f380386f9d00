//! Host-facing Live-TV entity types.
//!
//! Value objects handed to the host plugin framework. Ids are strings on
//! this side of the boundary; the backend's numeric ids are stringified
//! during mapping.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{NaiveDateTime, Weekday};

/// Channel kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Television channel.
    Tv,
    /// Radio channel.
    Radio,
}

/// Guide channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Channel id (stringified backend id).
    pub id: String,
    /// TV or radio.
    pub kind: ChannelKind,
    /// Display name.
    pub name: String,
    /// External channel number. Left blank: the backend exposes no stable
    /// external number in this integration.
    pub number: String,
}

/// Channel group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelGroupInfo {
    /// Group id (stringified backend id).
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Guide program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    /// Program id (stringified backend id).
    pub id: String,
    /// Owning channel id.
    pub channel_id: String,
    /// Title.
    pub name: String,
    /// Synopsis.
    pub overview: Option<String>,
    /// Start of the program interval.
    pub start: NaiveDateTime,
    /// End of the program interval (exclusive).
    pub end: NaiveDateTime,
    /// Episode title.
    pub episode_title: Option<String>,
    /// Episode number; present only for series episodes.
    pub episode_number: Option<i32>,
    /// Season number; present only for series episodes.
    pub season_number: Option<i32>,
    /// Verbatim backend genre followed by canonical genre tags.
    pub genres: Vec<String>,
}

/// Completed or in-progress recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingInfo {
    /// Recording id (stringified backend id).
    pub id: String,
    /// Channel the recording was made from.
    pub channel_id: String,
    /// The schedule that produced the recording.
    pub program_id: String,
    /// Title.
    pub name: String,
    /// Synopsis.
    pub overview: Option<String>,
    /// Start of the recorded interval.
    pub start: NaiveDateTime,
    /// End of the recorded interval.
    pub end: NaiveDateTime,
    /// Episode title.
    pub episode_title: Option<String>,
    /// `true` exactly when the originating program carried an episode
    /// number.
    pub is_series: bool,
    /// Owning series timer for an in-progress recording of a series
    /// occurrence.
    pub series_timer_id: Option<String>,
    /// Verbatim backend genre, when present.
    pub genres: Vec<String>,
    /// Locally accessible file path; `None` unless direct access is
    /// enabled.
    pub path: Option<String>,
}

/// Host-side recording status of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    /// Not yet started.
    New,
    /// Currently recording.
    InProgress,
    /// Finished.
    Completed,
    /// Cancelled before completion.
    Cancelled,
}

/// One-off timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerInfo {
    /// Timer id (stringified schedule id).
    pub id: String,
    /// Target channel id.
    pub channel_id: String,
    /// Parent series timer id, for generated occurrences.
    pub series_timer_id: String,
    /// Program the timer was created for.
    pub program_id: String,
    /// Title.
    pub name: String,
    /// Scheduled start.
    pub start: NaiveDateTime,
    /// Scheduled end.
    pub end: NaiveDateTime,
    /// Whether pre-padding is requested.
    pub is_pre_padding_required: bool,
    /// Whether post-padding is requested.
    pub is_post_padding_required: bool,
    /// Pre-padding in seconds.
    pub pre_padding_seconds: i32,
    /// Post-padding in seconds.
    pub post_padding_seconds: i32,
    /// Host-side status.
    pub status: TimerStatus,
}

/// Recurring series timer.
///
/// The recurrence is carried as an explicit day set plus independent
/// any-time / any-channel flags; the backend's closed pattern catalog
/// cannot represent every combination (see [`crate::recurrence`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesTimerInfo {
    /// Series timer id (stringified schedule id).
    pub id: String,
    /// Target channel id.
    pub channel_id: String,
    /// Series identity; mirrors the schedule id in this integration.
    pub series_id: String,
    /// Program reference used when creating the series.
    pub program_id: String,
    /// Title.
    pub name: String,
    /// Scheduled start of the template occurrence.
    pub start: NaiveDateTime,
    /// Scheduled end of the template occurrence.
    pub end: NaiveDateTime,
    /// Record on these weekdays.
    pub days: HashSet<Weekday>,
    /// Record every airing regardless of time.
    pub record_any_time: bool,
    /// Record on any channel (implies any-time in the backend model).
    pub record_any_channel: bool,
    /// Whether pre-padding is requested.
    pub is_pre_padding_required: bool,
    /// Whether post-padding is requested.
    pub is_post_padding_required: bool,
    /// Pre-padding in seconds.
    pub pre_padding_seconds: i32,
    /// Post-padding in seconds.
    pub post_padding_seconds: i32,
}

/// Installed tuner card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunerInfo {
    /// Tuner id (stringified backend id).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the tuner is enabled.
    pub enabled: bool,
}

/// Tuner card with an active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTunerInfo {
    /// Tuner id (stringified backend id).
    pub id: String,
    /// Channel the tuner is on.
    pub channel_id: String,
    /// User holding the session, if any.
    pub user: Option<String>,
}

/// Backend service status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStatus {
    /// API contract version.
    pub api_version: u32,
    /// Backend service version string.
    pub service_version: String,
    /// Whether the service reaches its TV server.
    pub connected: bool,
}

/// Default pre/post padding read from the backend settings store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDefaults {
    /// Default pre-record padding.
    pub pre_record: Duration,
    /// Default post-record padding.
    pub post_record: Duration,
}
