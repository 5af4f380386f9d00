//! Entity conversion functions.
//!
//! Stateless mappings between backend wire entities and the host's
//! generic entities, plus construction of schedule creation payloads.
//! The recurrence codec, genre mapper and path mapper plug in here.

use chrono::NaiveDateTime;
use tvbridge_api::tvservice::{
    ActiveTunerCard, AddScheduleParams, Channel, ChannelGroup, Program, Recording, Schedule,
    ScheduleType, ServiceDescription, TunerCard,
};

use crate::error::ProviderError;
use crate::genres::GenreMapper;
use crate::paths::RecordingPathMapper;
use crate::recurrence;
use crate::types::{
    ActiveTunerInfo, BackendStatus, ChannelGroupInfo, ChannelInfo, ChannelKind, ProgramInfo,
    RecordingInfo, SeriesTimerInfo, TimerInfo, TimerStatus, TunerInfo,
};

/// Parses an optional numeric text field from the backend.
///
/// Absence is fine (not a series episode); a present but unparsable
/// value is malformed upstream data and fails hard.
fn parse_numeric_field(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<i32>, ProviderError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ProviderError::MalformedUpstreamData {
                field,
                value: String::from(raw),
            }),
    }
}

/// Rounds a padding duration in seconds up to whole minutes.
#[must_use]
pub fn round_up_minutes(seconds: i32) -> u32 {
    u32::try_from(seconds.max(0)).unwrap_or(0).div_ceil(60)
}

/// Padding minutes for a request: only when requested and positive.
fn padding_minutes(required: bool, seconds: i32) -> Option<u32> {
    (required && seconds > 0).then(|| round_up_minutes(seconds))
}

/// Converts a backend channel. The external channel number stays blank:
/// the backend exposes no stable one in this integration.
#[must_use]
pub fn channel_info(channel: &Channel) -> ChannelInfo {
    ChannelInfo {
        id: channel.id.to_string(),
        kind: if channel.is_tv {
            ChannelKind::Tv
        } else {
            ChannelKind::Radio
        },
        name: channel.title.clone(),
        number: String::new(),
    }
}

/// Converts a backend channel group.
#[must_use]
pub fn channel_group_info(group: &ChannelGroup) -> ChannelGroupInfo {
    ChannelGroupInfo {
        id: group.id.to_string(),
        name: group.group_name.clone(),
    }
}

/// Converts a backend tuner card.
#[must_use]
pub fn tuner_info(card: &TunerCard) -> TunerInfo {
    TunerInfo {
        id: card.id.to_string(),
        name: card.name.clone(),
        enabled: card.enabled,
    }
}

/// Converts an active backend tuner card.
#[must_use]
pub fn active_tuner_info(card: &ActiveTunerCard) -> ActiveTunerInfo {
    ActiveTunerInfo {
        id: card.id.to_string(),
        channel_id: card.channel_id.to_string(),
        user: card.user.clone(),
    }
}

/// Converts the backend service description.
#[must_use]
pub fn backend_status(description: &ServiceDescription) -> BackendStatus {
    BackendStatus {
        api_version: description.api_version,
        service_version: description.service_version.clone(),
        connected: description.has_connection_to_tv_server,
    }
}

/// Converts a guide program.
///
/// # Errors
///
/// Returns [`ProviderError::MalformedUpstreamData`] when a present
/// episode or season number does not parse as an integer.
pub fn program_info(
    program: &Program,
    genre_mapper: &GenreMapper,
) -> Result<ProgramInfo, ProviderError> {
    let episode_number = parse_numeric_field("EpisodeNum", program.episode_num.as_deref())?;
    let season_number = parse_numeric_field("SeriesNum", program.series_num.as_deref())?;

    let mut genres = Vec::new();
    if let Some(genre) = &program.genre {
        genres.push(genre.clone());
        for tag in genre_mapper.map(genre) {
            if !genres.contains(&tag) {
                genres.push(tag);
            }
        }
    }

    Ok(ProgramInfo {
        id: program.id.to_string(),
        channel_id: program.channel_id.to_string(),
        name: program.title.clone(),
        overview: program.description.clone(),
        start: program.start_time,
        end: program.end_time,
        episode_title: program.episode_name.clone(),
        episode_number,
        season_number,
        genres,
    })
}

/// Converts a recording.
///
/// `series_timer_id` comes from the caller, which resolves the owning
/// series schedule for in-progress recordings.
#[must_use]
pub fn recording_info(
    recording: &Recording,
    path_mapper: &RecordingPathMapper,
    series_timer_id: Option<String>,
) -> RecordingInfo {
    let genres = recording.genre.clone().map_or_else(Vec::new, |g| vec![g]);

    RecordingInfo {
        id: recording.id.to_string(),
        channel_id: recording.channel_id.to_string(),
        program_id: recording.schedule_id.to_string(),
        name: recording.title.clone(),
        overview: recording.description.clone(),
        start: recording.start_time,
        end: recording.end_time,
        episode_title: recording.episode_name.clone(),
        is_series: recording.episode_num.is_some(),
        series_timer_id,
        genres,
        path: path_mapper.map(&recording.file_name),
    }
}

/// Converts a one-off schedule into a timer.
#[must_use]
pub fn timer_info(schedule: &Schedule) -> TimerInfo {
    TimerInfo {
        id: schedule.id.to_string(),
        channel_id: schedule.channel_id.to_string(),
        series_timer_id: schedule.parent_schedule_id.to_string(),
        program_id: schedule.id.to_string(),
        name: schedule.title.clone(),
        start: schedule.start_time,
        end: schedule.end_time,
        is_pre_padding_required: schedule.pre_record_interval > 0,
        is_post_padding_required: schedule.post_record_interval > 0,
        pre_padding_seconds: schedule.pre_record_interval.saturating_mul(60),
        post_padding_seconds: schedule.post_record_interval.saturating_mul(60),
        status: TimerStatus::New,
    }
}

/// Converts a recurring schedule into a series timer, expanding the
/// backend pattern through the recurrence codec.
#[must_use]
pub fn series_timer_info(schedule: &Schedule) -> SeriesTimerInfo {
    let pattern = recurrence::decode(schedule.schedule_type, schedule.start_time);

    SeriesTimerInfo {
        id: schedule.id.to_string(),
        channel_id: schedule.channel_id.to_string(),
        series_id: schedule.id.to_string(),
        program_id: schedule.id.to_string(),
        name: schedule.title.clone(),
        start: schedule.start_time,
        end: schedule.end_time,
        days: pattern.days,
        record_any_time: pattern.any_time,
        record_any_channel: pattern.any_channel,
        is_pre_padding_required: schedule.pre_record_interval > 0,
        is_post_padding_required: schedule.post_record_interval > 0,
        pre_padding_seconds: schedule.pre_record_interval.saturating_mul(60),
        post_padding_seconds: schedule.post_record_interval.saturating_mul(60),
    }
}

/// Builds the creation payload for a one-off schedule. Channel, title
/// and interval come from the resolved program, not from the timer.
#[must_use]
pub fn once_schedule_params(
    channel_id: i32,
    title: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    timer: &TimerInfo,
) -> AddScheduleParams {
    AddScheduleParams {
        channel_id,
        title: String::from(title),
        start_time: start,
        end_time: end,
        schedule_type: ScheduleType::Once,
        pre_record_minutes: padding_minutes(
            timer.is_pre_padding_required,
            timer.pre_padding_seconds,
        ),
        post_record_minutes: padding_minutes(
            timer.is_post_padding_required,
            timer.post_padding_seconds,
        ),
    }
}

/// Builds the creation payload for a series schedule.
///
/// Takes the already-encoded pattern: callers validate the recurrence
/// through [`crate::recurrence::encode`] before issuing any backend
/// call, so an unsupported day set never reaches this point.
#[must_use]
pub fn series_schedule_params(
    channel_id: i32,
    title: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    schedule_type: ScheduleType,
    series: &SeriesTimerInfo,
) -> AddScheduleParams {
    AddScheduleParams {
        channel_id,
        title: String::from(title),
        start_time: start,
        end_time: end,
        schedule_type,
        pre_record_minutes: padding_minutes(
            series.is_pre_padding_required,
            series.pre_padding_seconds,
        ),
        post_record_minutes: padding_minutes(
            series.is_post_padding_required,
            series.post_padding_seconds,
        ),
    }
}
