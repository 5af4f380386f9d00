//! Provider operation orchestration.
//!
//! One public method per host-facing Live-TV operation. Reads are a
//! single backend round trip handed to the entity mappers; writes fetch
//! the referenced entity first, validate, then issue the mutating call.
//! There is no shared mutable state and no retry: the backend is
//! authoritative, so conflicts and transport failures surface unchanged.

use chrono::{DateTime, Local, Utc};
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use tvbridge_api::tvservice::{LocalTvServiceApi, TvServiceError};

use crate::config::{ChannelSorting, Configuration};
use crate::error::ProviderError;
use crate::genres::GenreMapper;
use crate::mapper;
use crate::paths::RecordingPathMapper;
use crate::recurrence::{self, SeriesPattern};
use crate::types::{
    ActiveTunerInfo, BackendStatus, ChannelGroupInfo, ChannelInfo, ProgramInfo, RecordingInfo,
    ScheduleDefaults, SeriesTimerInfo, TimerInfo, TunerInfo,
};

/// Live-TV provider over a TV service backend.
///
/// Owns only the API handle; configuration is injected per call so each
/// operation sees one consistent snapshot.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TvProvider<A> {
    api: A,
}

impl<A: LocalTvServiceApi + Sync> TvProvider<A> {
    /// Creates a provider over the given backend API.
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Backend service status.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    #[instrument(skip_all)]
    pub async fn status(&self, cancel: &CancellationToken) -> Result<BackendStatus, ProviderError> {
        let description = self.api.service_description(cancel).await?;
        Ok(mapper::backend_status(&description))
    }

    /// Installed tuner cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    #[instrument(skip_all)]
    pub async fn tuners(&self, cancel: &CancellationToken) -> Result<Vec<TunerInfo>, ProviderError> {
        let cards = self.api.tuner_cards(cancel).await?;
        Ok(cards.iter().map(mapper::tuner_info).collect())
    }

    /// Tuner cards with an active session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    #[instrument(skip_all)]
    pub async fn active_tuners(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ActiveTunerInfo>, ProviderError> {
        let cards = self.api.active_tuner_cards(cancel).await?;
        Ok(cards.iter().map(mapper::active_tuner_info).collect())
    }

    /// Channel groups in backend display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    #[instrument(skip_all)]
    pub async fn channel_groups(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ChannelGroupInfo>, ProviderError> {
        let mut groups = self.api.channel_groups(cancel).await?;
        groups.sort_by_key(|g| g.sort_order);
        Ok(groups.iter().map(mapper::channel_group_info).collect())
    }

    /// Guide channels: group-filtered, ordered per configuration, then
    /// restricted to channels visible in the guide.
    ///
    /// The ordering runs before the visibility filter so the backend's
    /// group order survives for the group-order mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    #[instrument(skip_all)]
    pub async fn channels(
        &self,
        config: &Configuration,
        cancel: &CancellationToken,
    ) -> Result<Vec<ChannelInfo>, ProviderError> {
        let mut channels = self.api.channels(config.default_channel_group, cancel).await?;

        match config.channel_sort_order {
            ChannelSorting::Title => channels.sort_by(|a, b| a.title.cmp(&b.title)),
            ChannelSorting::Id => channels.sort_by_key(|c| c.id),
            ChannelSorting::GroupOrder => {}
        }

        Ok(channels
            .iter()
            .filter(|c| c.visible_in_guide)
            .map(mapper::channel_info)
            .collect())
    }

    /// Guide programs for one channel over a UTC range.
    ///
    /// The backend speaks local time, so the range is converted before
    /// transmission.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or a program carries
    /// malformed episode markers.
    #[instrument(skip_all)]
    pub async fn programs(
        &self,
        config: &Configuration,
        channel_id: &str,
        start_utc: DateTime<Utc>,
        end_utc: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ProgramInfo>, ProviderError> {
        let start = start_utc.with_timezone(&Local).naive_local();
        let end = end_utc.with_timezone(&Local).naive_local();

        let response = self
            .api
            .programs_for_channel(channel_id, start, end, cancel)
            .await?;

        // Fresh mapper per batch: the genre table may change between calls
        let genre_mapper = GenreMapper::new(config);

        response
            .iter()
            .map(|p| mapper::program_info(p, &genre_mapper))
            .collect()
    }

    /// All recordings.
    ///
    /// An in-progress recording triggers a secondary schedule lookup to
    /// resolve the series it belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend call fails.
    #[instrument(skip_all)]
    pub async fn recordings(
        &self,
        config: &Configuration,
        cancel: &CancellationToken,
    ) -> Result<Vec<RecordingInfo>, ProviderError> {
        let response = self.api.recordings(cancel).await?;
        let path_mapper = RecordingPathMapper::new(config);

        let mut infos = Vec::with_capacity(response.len());
        for recording in &response {
            let series_timer_id = if recording.is_recording {
                self.resolve_series_parent(recording.schedule_id, cancel)
                    .await?
            } else {
                None
            };
            infos.push(mapper::recording_info(recording, &path_mapper, series_timer_id));
        }
        Ok(infos)
    }

    /// One recording by id.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidReference`] when the id does not
    /// resolve, or a transport error.
    #[instrument(skip_all)]
    pub async fn recording(
        &self,
        config: &Configuration,
        recording_id: &str,
        cancel: &CancellationToken,
    ) -> Result<RecordingInfo, ProviderError> {
        let recording = self
            .api
            .recording_by_id(recording_id, cancel)
            .await?
            .ok_or_else(|| ProviderError::InvalidReference {
                field: "recording_id",
                id: String::from(recording_id),
            })?;

        let path_mapper = RecordingPathMapper::new(config);
        let series_timer_id = if recording.is_recording {
            self.resolve_series_parent(recording.schedule_id, cancel)
                .await?
        } else {
            None
        };
        Ok(mapper::recording_info(&recording, &path_mapper, series_timer_id))
    }

    /// Looks up the schedule behind an in-progress recording and returns
    /// the parent series id when the schedule is a series occurrence.
    async fn resolve_series_parent(
        &self,
        schedule_id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ProviderError> {
        let schedule = self
            .api
            .schedule_by_id(&schedule_id.to_string(), cancel)
            .await?;
        match schedule {
            Some(s) if s.series => Ok(Some(s.parent_schedule_id.to_string())),
            Some(_) => Ok(None),
            None => {
                tracing::debug!(schedule_id, "schedule behind in-progress recording not found");
                Ok(None)
            }
        }
    }

    /// One-off timers (non-recurring schedules).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    #[instrument(skip_all)]
    pub async fn timers(&self, cancel: &CancellationToken) -> Result<Vec<TimerInfo>, ProviderError> {
        let schedules = self.api.schedules(cancel).await?;
        Ok(schedules
            .iter()
            .filter(|s| s.schedule_type.is_once())
            .map(mapper::timer_info)
            .collect())
    }

    /// Series timers (recurring schedules).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    #[instrument(skip_all)]
    pub async fn series_timers(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<SeriesTimerInfo>, ProviderError> {
        let schedules = self.api.schedules(cancel).await?;
        Ok(schedules
            .iter()
            .filter(|s| !s.schedule_type.is_once())
            .map(mapper::series_timer_info)
            .collect())
    }

    /// Creates a one-off timer for the referenced program.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::InvalidReference`] when the program id does not
    ///   resolve (raised before the write).
    /// - [`ProviderError::Conflict`] when the backend refuses the
    ///   schedule.
    /// - Transport errors.
    #[instrument(skip_all)]
    pub async fn create_timer(
        &self,
        timer: &TimerInfo,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        let program = self
            .api
            .program_by_id(&timer.program_id, cancel)
            .await?
            .ok_or_else(|| ProviderError::InvalidReference {
                field: "timer.program_id",
                id: timer.program_id.clone(),
            })?;

        let params = mapper::once_schedule_params(
            program.channel_id,
            &program.title,
            program.start_time,
            program.end_time,
            timer,
        );

        tracing::info!(
            program_id = %timer.program_id,
            start = %params.start_time,
            end = %params.end_time,
            "creating schedule"
        );

        if self.api.add_schedule(&params, cancel).await? {
            Ok(())
        } else {
            Err(ProviderError::Conflict)
        }
    }

    /// Creates a series timer for the referenced program.
    ///
    /// The recurrence is validated before any backend call.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::UnsupportedRecurrence`] when the day pattern
    ///   has no backend equivalent (raised before any call).
    /// - [`ProviderError::InvalidReference`] when the program id does not
    ///   resolve (raised before the write).
    /// - [`ProviderError::Conflict`] when the backend refuses the
    ///   schedule.
    /// - Transport errors.
    #[instrument(skip_all)]
    pub async fn create_series_timer(
        &self,
        series: &SeriesTimerInfo,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        let schedule_type = recurrence::encode(&SeriesPattern::from(series))?;

        let program = self
            .api
            .program_by_id(&series.program_id, cancel)
            .await?
            .ok_or_else(|| ProviderError::InvalidReference {
                field: "series.program_id",
                id: series.program_id.clone(),
            })?;

        let params = mapper::series_schedule_params(
            program.channel_id,
            &program.title,
            program.start_time,
            program.end_time,
            schedule_type,
            series,
        );

        tracing::info!(
            program_id = %series.program_id,
            schedule_type = ?params.schedule_type,
            "creating series schedule"
        );

        if self.api.add_schedule(&params, cancel).await? {
            Ok(())
        } else {
            Err(ProviderError::Conflict)
        }
    }

    /// Replaces an existing series schedule with new parameters.
    ///
    /// This is a two-step saga, not an atomic update: the existing
    /// schedule is deleted, then the replacement is created. A failure
    /// of the create step leaves the backend without the old schedule;
    /// no resurrection is attempted and the error surfaces to the
    /// caller.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::UnsupportedRecurrence`] when the day pattern
    ///   has no backend equivalent (raised before any call).
    /// - [`ProviderError::InvalidReference`] when the schedule id does
    ///   not resolve (raised before the delete).
    /// - [`ProviderError::Conflict`] when the backend refuses the delete
    ///   or the create.
    /// - Transport errors.
    #[instrument(skip_all)]
    pub async fn change_series_timer(
        &self,
        series: &SeriesTimerInfo,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        let schedule_type = recurrence::encode(&SeriesPattern::from(series))?;

        let existing = self
            .api
            .schedule_by_id(&series.id, cancel)
            .await?
            .ok_or_else(|| ProviderError::InvalidReference {
                field: "series.id",
                id: series.id.clone(),
            })?;

        let params = mapper::series_schedule_params(
            existing.channel_id,
            &existing.title,
            existing.start_time,
            existing.end_time,
            schedule_type,
            series,
        );

        if cancel.is_cancelled() {
            return Err(TvServiceError::Cancelled.into());
        }

        tracing::info!(
            schedule_id = %series.id,
            schedule_type = ?params.schedule_type,
            "replacing series schedule"
        );

        if !self.api.delete_schedule(&series.id, cancel).await? {
            return Err(ProviderError::Conflict);
        }

        if self.api.add_schedule(&params, cancel).await? {
            Ok(())
        } else {
            Err(ProviderError::Conflict)
        }
    }

    /// Deletes a timer or series timer by schedule id.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Conflict`] when the backend refuses, or a
    /// transport error.
    #[instrument(skip_all)]
    pub async fn delete_timer(
        &self,
        schedule_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        tracing::info!(schedule_id, "deleting schedule");
        if self.api.delete_schedule(schedule_id, cancel).await? {
            Ok(())
        } else {
            Err(ProviderError::Conflict)
        }
    }

    /// Deletes a recording.
    ///
    /// A 404 from the backend means the recording is already gone and is
    /// treated as success; every other transport error propagates.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Conflict`] when the backend refuses, or a
    /// non-404 transport error.
    #[instrument(skip_all)]
    pub async fn delete_recording(
        &self,
        recording_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        tracing::info!(recording_id, "deleting recording");
        match self.api.delete_recording(recording_id, cancel).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ProviderError::Conflict),
            Err(e) if e.is_not_found() => {
                tracing::debug!(recording_id, "recording already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Switches a tuner to the channel and returns the streaming URL for
    /// the external streaming collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidReference`] for a non-numeric
    /// channel id, or a transport error.
    #[instrument(skip_all)]
    pub async fn stream_url(
        &self,
        channel_id: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        let numeric: i32 = channel_id
            .parse()
            .map_err(|_| ProviderError::InvalidReference {
                field: "channel_id",
                id: String::from(channel_id),
            })?;
        Ok(self.api.stream_url(numeric, cancel).await?)
    }

    /// Default pre/post padding from the backend settings store.
    ///
    /// Unparsable values log a warning and fall back to zero.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend call fails.
    #[instrument(skip_all)]
    pub async fn schedule_defaults(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ScheduleDefaults, ProviderError> {
        let pre = self.read_interval_setting("preRecordInterval", cancel).await?;
        let post = self
            .read_interval_setting("postRecordInterval", cancel)
            .await?;

        Ok(ScheduleDefaults {
            pre_record: std::time::Duration::from_secs(pre.saturating_mul(60)),
            post_record: std::time::Duration::from_secs(post.saturating_mul(60)),
        })
    }

    /// Reads one minute-granularity setting, defaulting to zero on
    /// unparsable values.
    async fn read_interval_setting(
        &self,
        tag: &'static str,
        cancel: &CancellationToken,
    ) -> Result<u64, ProviderError> {
        let raw = self.api.read_setting(tag, cancel).await?;
        match raw.trim().parse::<u64>() {
            Ok(minutes) => Ok(minutes),
            Err(_) => {
                tracing::warn!(tag, raw = %raw, "unable to read backend setting, using 0");
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use chrono::{NaiveDate, NaiveDateTime, Weekday};
    use tvbridge_api::tvservice::{
        ActiveTunerCard, AddScheduleParams, Channel, ChannelGroup, Program, Recording, Schedule,
        ScheduleType, ServiceDescription, TunerCard,
    };

    use super::*;
    use crate::config::GenreMapping;
    use crate::types::TimerStatus;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn http_error(status: u16) -> TvServiceError {
        TvServiceError::Http {
            status: reqwest::StatusCode::from_u16(status).unwrap(),
            url: String::from("http://backend/TVAccessService/json/test"),
        }
    }

    /// Mock backend with canned data and scripted write results.
    struct MockTvApi {
        channels: Vec<Channel>,
        groups: Vec<ChannelGroup>,
        programs: Vec<Program>,
        recordings: Vec<Recording>,
        schedules: Vec<Schedule>,
        settings: HashMap<String, String>,
        /// `Err(status)` simulates a transport failure on create.
        add_result: Result<bool, u16>,
        delete_schedule_result: bool,
        /// `Err(status)` simulates a transport failure on recording delete.
        delete_recording_result: Result<bool, u16>,
        calls: Mutex<Vec<String>>,
        last_add: Mutex<Option<AddScheduleParams>>,
    }

    impl Default for MockTvApi {
        fn default() -> Self {
            Self {
                channels: Vec::new(),
                groups: Vec::new(),
                programs: Vec::new(),
                recordings: Vec::new(),
                schedules: Vec::new(),
                settings: HashMap::new(),
                add_result: Ok(true),
                delete_schedule_result: true,
                delete_recording_result: Ok(true),
                calls: Mutex::new(Vec::new()),
                last_add: Mutex::new(None),
            }
        }
    }

    impl MockTvApi {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl LocalTvServiceApi for MockTvApi {
        async fn service_description(
            &self,
            _cancel: &CancellationToken,
        ) -> Result<ServiceDescription, TvServiceError> {
            self.record("service_description");
            Ok(ServiceDescription {
                api_version: 4,
                service_version: String::from("0.5.4"),
                has_connection_to_tv_server: true,
            })
        }

        async fn tuner_cards(
            &self,
            _cancel: &CancellationToken,
        ) -> Result<Vec<TunerCard>, TvServiceError> {
            self.record("tuner_cards");
            Ok(Vec::new())
        }

        async fn active_tuner_cards(
            &self,
            _cancel: &CancellationToken,
        ) -> Result<Vec<ActiveTunerCard>, TvServiceError> {
            self.record("active_tuner_cards");
            Ok(Vec::new())
        }

        async fn channel_groups(
            &self,
            _cancel: &CancellationToken,
        ) -> Result<Vec<ChannelGroup>, TvServiceError> {
            self.record("channel_groups");
            Ok(self.groups.clone())
        }

        async fn channels(
            &self,
            group_id: Option<i32>,
            _cancel: &CancellationToken,
        ) -> Result<Vec<Channel>, TvServiceError> {
            self.record(format!("channels group={group_id:?}"));
            Ok(self.channels.clone())
        }

        async fn program_by_id(
            &self,
            program_id: &str,
            _cancel: &CancellationToken,
        ) -> Result<Option<Program>, TvServiceError> {
            self.record(format!("program_by_id {program_id}"));
            Ok(self
                .programs
                .iter()
                .find(|p| p.id.to_string() == program_id)
                .cloned())
        }

        async fn programs_for_channel(
            &self,
            channel_id: &str,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
            _cancel: &CancellationToken,
        ) -> Result<Vec<Program>, TvServiceError> {
            self.record(format!("programs_for_channel {channel_id}"));
            Ok(self.programs.clone())
        }

        async fn recordings(
            &self,
            _cancel: &CancellationToken,
        ) -> Result<Vec<Recording>, TvServiceError> {
            self.record("recordings");
            Ok(self.recordings.clone())
        }

        async fn recording_by_id(
            &self,
            recording_id: &str,
            _cancel: &CancellationToken,
        ) -> Result<Option<Recording>, TvServiceError> {
            self.record(format!("recording_by_id {recording_id}"));
            Ok(self
                .recordings
                .iter()
                .find(|r| r.id.to_string() == recording_id)
                .cloned())
        }

        async fn schedules(
            &self,
            _cancel: &CancellationToken,
        ) -> Result<Vec<Schedule>, TvServiceError> {
            self.record("schedules");
            Ok(self.schedules.clone())
        }

        async fn schedule_by_id(
            &self,
            schedule_id: &str,
            _cancel: &CancellationToken,
        ) -> Result<Option<Schedule>, TvServiceError> {
            self.record(format!("schedule_by_id {schedule_id}"));
            Ok(self
                .schedules
                .iter()
                .find(|s| s.id.to_string() == schedule_id)
                .cloned())
        }

        async fn add_schedule(
            &self,
            params: &AddScheduleParams,
            _cancel: &CancellationToken,
        ) -> Result<bool, TvServiceError> {
            self.record("add_schedule");
            *self.last_add.lock().unwrap() = Some(params.clone());
            match self.add_result {
                Ok(result) => Ok(result),
                Err(status) => Err(http_error(status)),
            }
        }

        async fn delete_schedule(
            &self,
            schedule_id: &str,
            _cancel: &CancellationToken,
        ) -> Result<bool, TvServiceError> {
            self.record(format!("delete_schedule {schedule_id}"));
            Ok(self.delete_schedule_result)
        }

        async fn delete_recording(
            &self,
            recording_id: &str,
            _cancel: &CancellationToken,
        ) -> Result<bool, TvServiceError> {
            self.record(format!("delete_recording {recording_id}"));
            match self.delete_recording_result {
                Ok(result) => Ok(result),
                Err(status) => Err(http_error(status)),
            }
        }

        async fn stream_url(
            &self,
            channel_id: i32,
            _cancel: &CancellationToken,
        ) -> Result<String, TvServiceError> {
            self.record(format!("stream_url {channel_id}"));
            Ok(format!("rtsp://backend:554/stream{channel_id}.0"))
        }

        async fn read_setting(
            &self,
            tag: &str,
            _cancel: &CancellationToken,
        ) -> Result<String, TvServiceError> {
            self.record(format!("read_setting {tag}"));
            Ok(self.settings.get(tag).cloned().unwrap_or_default())
        }
    }

    fn make_channel(id: i32, title: &str, visible: bool) -> Channel {
        Channel {
            id,
            title: String::from(title),
            is_tv: true,
            visible_in_guide: visible,
        }
    }

    fn make_program(id: i32) -> Program {
        Program {
            id,
            channel_id: 7,
            title: String::from("Harbour Lights"),
            description: None,
            start_time: ts(15, 18),
            end_time: ts(15, 19),
            episode_name: None,
            episode_num: None,
            series_num: None,
            genre: None,
        }
    }

    fn make_schedule(id: i32, schedule_type: ScheduleType) -> Schedule {
        Schedule {
            id,
            channel_id: 7,
            parent_schedule_id: -1,
            title: String::from("Harbour Lights"),
            start_time: ts(15, 18),
            end_time: ts(15, 19),
            schedule_type,
            pre_record_interval: 5,
            post_record_interval: 10,
            series: false,
        }
    }

    fn make_recording(id: i32, schedule_id: i32, is_recording: bool) -> Recording {
        Recording {
            id,
            channel_id: 7,
            schedule_id,
            title: String::from("Harbour Lights"),
            description: None,
            start_time: ts(8, 18),
            end_time: ts(8, 19),
            episode_name: None,
            episode_num: Some(String::from("3")),
            genre: Some(String::from("Drama")),
            file_name: String::from("C:\\Recordings\\show.ts"),
            is_recording,
        }
    }

    fn make_series_timer(days: &[Weekday], any_time: bool, any_channel: bool) -> SeriesTimerInfo {
        SeriesTimerInfo {
            id: String::from("12"),
            channel_id: String::from("7"),
            series_id: String::from("12"),
            program_id: String::from("4321"),
            name: String::from("Harbour Lights"),
            start: ts(15, 18),
            end: ts(15, 19),
            days: days.iter().copied().collect(),
            record_any_time: any_time,
            record_any_channel: any_channel,
            is_pre_padding_required: false,
            is_post_padding_required: false,
            pre_padding_seconds: 0,
            post_padding_seconds: 0,
        }
    }

    fn make_timer(program_id: &str) -> TimerInfo {
        TimerInfo {
            id: String::from("14"),
            channel_id: String::from("7"),
            series_timer_id: String::from("-1"),
            program_id: String::from(program_id),
            name: String::from("Harbour Lights"),
            start: ts(15, 18),
            end: ts(15, 19),
            is_pre_padding_required: true,
            is_post_padding_required: false,
            pre_padding_seconds: 300,
            post_padding_seconds: 0,
            status: TimerStatus::New,
        }
    }

    #[tokio::test]
    async fn test_channels_sorted_by_title_then_filtered() {
        // Arrange: three channels, one hidden
        let provider = TvProvider::new(MockTvApi {
            channels: vec![
                make_channel(7, "BBC One", true),
                make_channel(3, "Arte", true),
                make_channel(21, "Shop 24", false),
            ],
            ..MockTvApi::default()
        });
        let config = Configuration {
            default_channel_group: Some(2),
            channel_sort_order: ChannelSorting::Title,
            ..Configuration::default()
        };

        // Act
        let channels = provider
            .channels(&config, &CancellationToken::new())
            .await
            .unwrap();

        // Assert: only visible channels, in title order, group filter passed
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].name, "Arte");
        assert_eq!(channels[1].name, "BBC One");
        assert_eq!(provider.api.calls(), vec!["channels group=Some(2)"]);
    }

    #[tokio::test]
    async fn test_channels_keep_backend_group_order_by_default() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            channels: vec![
                make_channel(7, "BBC One", true),
                make_channel(3, "Arte", true),
            ],
            ..MockTvApi::default()
        });

        // Act
        let channels = provider
            .channels(&Configuration::default(), &CancellationToken::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(channels[0].id, "7");
        assert_eq!(channels[1].id, "3");
        assert_eq!(provider.api.calls(), vec!["channels group=None"]);
    }

    #[tokio::test]
    async fn test_channels_sorted_by_id() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            channels: vec![
                make_channel(7, "BBC One", true),
                make_channel(3, "Arte", true),
            ],
            ..MockTvApi::default()
        });
        let config = Configuration {
            channel_sort_order: ChannelSorting::Id,
            ..Configuration::default()
        };

        // Act
        let channels = provider
            .channels(&config, &CancellationToken::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(channels[0].id, "3");
        assert_eq!(channels[1].id, "7");
    }

    #[tokio::test]
    async fn test_channel_groups_sorted_by_backend_order() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            groups: vec![
                ChannelGroup {
                    id: 2,
                    group_name: String::from("Favourites"),
                    sort_order: 1,
                },
                ChannelGroup {
                    id: 1,
                    group_name: String::from("All Channels"),
                    sort_order: 0,
                },
            ],
            ..MockTvApi::default()
        });

        // Act
        let groups = provider
            .channel_groups(&CancellationToken::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(groups[0].name, "All Channels");
        assert_eq!(groups[1].name, "Favourites");
    }

    #[tokio::test]
    async fn test_programs_map_genres_and_episodes() {
        // Arrange
        let mut program = make_program(4322);
        program.episode_num = Some(String::from("4"));
        program.genre = Some(String::from("Drama"));
        let provider = TvProvider::new(MockTvApi {
            programs: vec![program],
            ..MockTvApi::default()
        });
        let config = Configuration {
            genre_mappings: vec![GenreMapping {
                genre: String::from("Drama"),
                tags: vec![String::from("Series")],
            }],
            ..Configuration::default()
        };

        // Act
        let programs = provider
            .programs(
                &config,
                "7",
                DateTime::<Utc>::from_timestamp(1_705_334_400, 0).unwrap(),
                DateTime::<Utc>::from_timestamp(1_705_348_800, 0).unwrap(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        // Assert
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].episode_number, Some(4));
        assert_eq!(programs[0].genres, vec!["Drama", "Series"]);
    }

    #[tokio::test]
    async fn test_programs_malformed_episode_number_is_fatal() {
        // Arrange
        let mut program = make_program(4322);
        program.episode_num = Some(String::from("four"));
        let provider = TvProvider::new(MockTvApi {
            programs: vec![program],
            ..MockTvApi::default()
        });

        // Act
        let result = provider
            .programs(
                &Configuration::default(),
                "7",
                DateTime::<Utc>::from_timestamp(1_705_334_400, 0).unwrap(),
                DateTime::<Utc>::from_timestamp(1_705_348_800, 0).unwrap(),
                &CancellationToken::new(),
            )
            .await;

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            ProviderError::MalformedUpstreamData { field: "EpisodeNum", .. }
        ));
    }

    #[tokio::test]
    async fn test_recordings_resolve_series_parent_for_active_recording() {
        // Arrange: recording 102 is still running; its schedule is a series
        // occurrence whose parent is schedule 12
        let mut occurrence = make_schedule(14, ScheduleType::Once);
        occurrence.series = true;
        occurrence.parent_schedule_id = 12;
        let provider = TvProvider::new(MockTvApi {
            recordings: vec![
                make_recording(101, 12, false),
                make_recording(102, 14, true),
            ],
            schedules: vec![occurrence],
            ..MockTvApi::default()
        });
        let config = Configuration {
            enable_direct_access: true,
            requires_path_substitution: true,
            local_file_path: String::from("C:\\Recordings"),
            remote_file_path: String::from("\\\\nas\\recordings"),
            ..Configuration::default()
        };

        // Act
        let recordings = provider
            .recordings(&config, &CancellationToken::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(recordings.len(), 2);
        assert_eq!(recordings[0].series_timer_id, None);
        assert_eq!(recordings[0].path.as_deref(), Some("\\\\nas\\recordings\\show.ts"));
        assert!(recordings[0].is_series);
        assert_eq!(recordings[1].series_timer_id.as_deref(), Some("12"));
        let calls = provider.api.calls();
        assert_eq!(
            calls.iter().filter(|c| c.starts_with("schedule_by_id")).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_recording_by_id_missing_is_invalid_reference() {
        // Arrange
        let provider = TvProvider::new(MockTvApi::default());

        // Act
        let result = provider
            .recording(&Configuration::default(), "999", &CancellationToken::new())
            .await;

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            ProviderError::InvalidReference { field: "recording_id", .. }
        ));
    }

    #[tokio::test]
    async fn test_timers_and_series_timers_split_by_schedule_type() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            schedules: vec![
                make_schedule(14, ScheduleType::Once),
                make_schedule(12, ScheduleType::Weekly),
                make_schedule(15, ScheduleType::WorkingDays),
            ],
            ..MockTvApi::default()
        });

        // Act
        let timers = provider.timers(&CancellationToken::new()).await.unwrap();
        let series = provider
            .series_timers(&CancellationToken::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].id, "14");
        assert_eq!(series.len(), 2);
        // 2024-01-15 is a Monday
        assert_eq!(series[0].days, HashSet::from([Weekday::Mon]));
        assert_eq!(series[1].days.len(), 5);
    }

    #[tokio::test]
    async fn test_create_timer_missing_program_fails_before_write() {
        // Arrange
        let provider = TvProvider::new(MockTvApi::default());

        // Act
        let result = provider
            .create_timer(&make_timer("4321"), &CancellationToken::new())
            .await;

        // Assert: invalid reference, and no mutating call went out
        assert!(matches!(
            result.unwrap_err(),
            ProviderError::InvalidReference { field: "timer.program_id", .. }
        ));
        assert!(!provider.api.calls().iter().any(|c| c == "add_schedule"));
    }

    #[tokio::test]
    async fn test_create_timer_builds_params_from_program() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            programs: vec![make_program(4321)],
            ..MockTvApi::default()
        });

        // Act
        provider
            .create_timer(&make_timer("4321"), &CancellationToken::new())
            .await
            .unwrap();

        // Assert: channel, title and interval come from the program
        let params = provider.api.last_add.lock().unwrap().clone().unwrap();
        assert_eq!(params.channel_id, 7);
        assert_eq!(params.title, "Harbour Lights");
        assert_eq!(params.schedule_type, ScheduleType::Once);
        assert_eq!(params.pre_record_minutes, Some(5));
        assert_eq!(params.post_record_minutes, None);
    }

    #[tokio::test]
    async fn test_create_timer_conflict() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            programs: vec![make_program(4321)],
            add_result: Ok(false),
            ..MockTvApi::default()
        });

        // Act
        let result = provider
            .create_timer(&make_timer("4321"), &CancellationToken::new())
            .await;

        // Assert
        assert!(matches!(result.unwrap_err(), ProviderError::Conflict));
    }

    #[tokio::test]
    async fn test_create_series_timer_unsupported_days_makes_no_backend_call() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            programs: vec![make_program(4321)],
            ..MockTvApi::default()
        });
        let series = make_series_timer(&[Weekday::Mon, Weekday::Wed, Weekday::Fri], false, false);

        // Act
        let result = provider
            .create_series_timer(&series, &CancellationToken::new())
            .await;

        // Assert: rejected before the first round trip
        assert!(matches!(
            result.unwrap_err(),
            ProviderError::UnsupportedRecurrence { .. }
        ));
        assert!(provider.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_series_timer_encodes_weekend_pattern() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            programs: vec![make_program(4321)],
            ..MockTvApi::default()
        });
        let series = make_series_timer(&[Weekday::Sat, Weekday::Sun], false, false);

        // Act
        provider
            .create_series_timer(&series, &CancellationToken::new())
            .await
            .unwrap();

        // Assert
        let params = provider.api.last_add.lock().unwrap().clone().unwrap();
        assert_eq!(params.schedule_type, ScheduleType::Weekends);
        assert_eq!(params.channel_id, 7);
    }

    #[tokio::test]
    async fn test_change_series_timer_deletes_then_creates() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            schedules: vec![make_schedule(12, ScheduleType::Weekly)],
            ..MockTvApi::default()
        });
        let series = make_series_timer(&[Weekday::Mon], false, false);

        // Act
        provider
            .change_series_timer(&series, &CancellationToken::new())
            .await
            .unwrap();

        // Assert: fetch, delete, create, in that order
        let calls = provider.api.calls();
        assert_eq!(
            calls,
            vec!["schedule_by_id 12", "delete_schedule 12", "add_schedule"]
        );
    }

    #[tokio::test]
    async fn test_change_series_timer_missing_schedule_fails_before_delete() {
        // Arrange
        let provider = TvProvider::new(MockTvApi::default());
        let series = make_series_timer(&[Weekday::Mon], false, false);

        // Act
        let result = provider
            .change_series_timer(&series, &CancellationToken::new())
            .await;

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            ProviderError::InvalidReference { field: "series.id", .. }
        ));
        assert!(
            !provider
                .api
                .calls()
                .iter()
                .any(|c| c.starts_with("delete_schedule"))
        );
    }

    #[tokio::test]
    async fn test_change_series_timer_create_failure_leaves_schedule_deleted() {
        // Arrange: the create step fails on the wire after the delete
        // succeeded; the old schedule is gone and stays gone
        let provider = TvProvider::new(MockTvApi {
            schedules: vec![make_schedule(12, ScheduleType::Weekly)],
            add_result: Err(500),
            ..MockTvApi::default()
        });
        let series = make_series_timer(&[Weekday::Mon], false, false);

        // Act
        let result = provider
            .change_series_timer(&series, &CancellationToken::new())
            .await;

        // Assert: transport error surfaces, no resurrection attempt
        assert!(matches!(result.unwrap_err(), ProviderError::Backend(_)));
        let calls = provider.api.calls();
        assert_eq!(
            calls,
            vec!["schedule_by_id 12", "delete_schedule 12", "add_schedule"]
        );
    }

    #[tokio::test]
    async fn test_change_series_timer_delete_refused_is_conflict() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            schedules: vec![make_schedule(12, ScheduleType::Weekly)],
            delete_schedule_result: false,
            ..MockTvApi::default()
        });
        let series = make_series_timer(&[Weekday::Mon], false, false);

        // Act
        let result = provider
            .change_series_timer(&series, &CancellationToken::new())
            .await;

        // Assert: conflict, and the create step never ran
        assert!(matches!(result.unwrap_err(), ProviderError::Conflict));
        assert!(!provider.api.calls().iter().any(|c| c == "add_schedule"));
    }

    #[tokio::test]
    async fn test_delete_timer_refused_is_conflict() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            delete_schedule_result: false,
            ..MockTvApi::default()
        });

        // Act
        let result = provider
            .delete_timer("12", &CancellationToken::new())
            .await;

        // Assert
        assert!(matches!(result.unwrap_err(), ProviderError::Conflict));
    }

    #[tokio::test]
    async fn test_delete_recording_not_found_is_benign() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            delete_recording_result: Err(404),
            ..MockTvApi::default()
        });

        // Act & Assert: already deleted server-side counts as success
        provider
            .delete_recording("101", &CancellationToken::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_recording_refused_is_conflict() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            delete_recording_result: Ok(false),
            ..MockTvApi::default()
        });

        // Act
        let result = provider
            .delete_recording("101", &CancellationToken::new())
            .await;

        // Assert
        assert!(matches!(result.unwrap_err(), ProviderError::Conflict));
    }

    #[tokio::test]
    async fn test_delete_recording_other_transport_error_propagates() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            delete_recording_result: Err(500),
            ..MockTvApi::default()
        });

        // Act
        let result = provider
            .delete_recording("101", &CancellationToken::new())
            .await;

        // Assert
        assert!(matches!(result.unwrap_err(), ProviderError::Backend(_)));
    }

    #[tokio::test]
    async fn test_stream_url_parses_channel_id() {
        // Arrange
        let provider = TvProvider::new(MockTvApi::default());

        // Act
        let url = provider
            .stream_url("7", &CancellationToken::new())
            .await
            .unwrap();
        let bad = provider
            .stream_url("seven", &CancellationToken::new())
            .await;

        // Assert
        assert_eq!(url, "rtsp://backend:554/stream7.0");
        assert!(matches!(
            bad.unwrap_err(),
            ProviderError::InvalidReference { field: "channel_id", .. }
        ));
    }

    #[tokio::test]
    async fn test_schedule_defaults_fall_back_to_zero_on_garbage() {
        // Arrange
        let provider = TvProvider::new(MockTvApi {
            settings: HashMap::from([
                (String::from("preRecordInterval"), String::from("5")),
                (String::from("postRecordInterval"), String::from("junk")),
            ]),
            ..MockTvApi::default()
        });

        // Act
        let defaults = provider
            .schedule_defaults(&CancellationToken::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(defaults.pre_record, std::time::Duration::from_secs(300));
        assert_eq!(defaults.post_record, std::time::Duration::from_secs(0));
    }

    #[tokio::test]
    async fn test_status_maps_service_description() {
        // Arrange
        let provider = TvProvider::new(MockTvApi::default());

        // Act
        let status = provider.status(&CancellationToken::new()).await.unwrap();

        // Assert
        assert!(status.connected);
        assert_eq!(status.service_version, "0.5.4");
    }
}
