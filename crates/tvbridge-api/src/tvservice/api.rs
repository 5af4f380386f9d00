//! `TvServiceApi` trait definition.
#![allow(clippy::future_not_send)]

use chrono::NaiveDateTime;
use tokio_util::sync::CancellationToken;

use super::error::TvServiceError;
use super::params::AddScheduleParams;
use super::types::{
    ActiveTunerCard, Channel, ChannelGroup, Program, Recording, Schedule, ServiceDescription,
    TunerCard,
};

/// TV service API trait.
///
/// Abstracts backend operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
/// Every call takes a cancellation token; cancellation is cooperative and
/// has no effect on a call already acknowledged by the backend.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TvServiceApi: Send)]
pub trait LocalTvServiceApi {
    /// Fetches the service description and connectivity status.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn service_description(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ServiceDescription, TvServiceError>;

    /// Lists installed tuner cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn tuner_cards(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<TunerCard>, TvServiceError>;

    /// Lists tuner cards with an active session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn active_tuner_cards(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ActiveTunerCard>, TvServiceError>;

    /// Lists channel groups.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn channel_groups(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ChannelGroup>, TvServiceError>;

    /// Lists channels, optionally restricted to one group.
    ///
    /// When a group id is given the backend returns channels in that
    /// group's display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn channels(
        &self,
        group_id: Option<i32>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Channel>, TvServiceError>;

    /// Fetches one program by id. `Ok(None)` when the id does not resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn program_by_id(
        &self,
        program_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Program>, TvServiceError>;

    /// Lists programs for a channel over a local-time range.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn programs_for_channel(
        &self,
        channel_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        cancel: &CancellationToken,
    ) -> Result<Vec<Program>, TvServiceError>;

    /// Lists all recordings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn recordings(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Recording>, TvServiceError>;

    /// Fetches one recording by id. `Ok(None)` when the id does not resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn recording_by_id(
        &self,
        recording_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Recording>, TvServiceError>;

    /// Lists all schedules.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn schedules(&self, cancel: &CancellationToken)
    -> Result<Vec<Schedule>, TvServiceError>;

    /// Fetches one schedule by id. `Ok(None)` when the id does not resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn schedule_by_id(
        &self,
        schedule_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Schedule>, TvServiceError>;

    /// Creates a schedule. Returns the backend's boolean result; `false`
    /// means the backend refused the schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn add_schedule(
        &self,
        params: &AddScheduleParams,
        cancel: &CancellationToken,
    ) -> Result<bool, TvServiceError>;

    /// Deletes a schedule. Returns the backend's boolean result.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn delete_schedule(
        &self,
        schedule_id: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, TvServiceError>;

    /// Deletes a recording. Returns the backend's boolean result.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn delete_recording(
        &self,
        recording_id: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, TvServiceError>;

    /// Switches a tuner to the channel and returns a streaming URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn stream_url(
        &self,
        channel_id: i32,
        cancel: &CancellationToken,
    ) -> Result<String, TvServiceError>;

    /// Reads a named setting from the backend's configuration store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn read_setting(
        &self,
        tag: &str,
        cancel: &CancellationToken,
    ) -> Result<String, TvServiceError>;
}
