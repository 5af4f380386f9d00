//! `TvServiceClient` - TV service API client implementation.

use chrono::NaiveDateTime;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use url::Url;

use super::api::LocalTvServiceApi;
use super::error::TvServiceError;
use super::params::{AddScheduleParams, to_url_date};
use super::types::{
    ActiveTunerCard, BoolResult, Channel, ChannelGroup, Program, Recording, Schedule,
    ServiceDescription, StringResult, TunerCard,
};

/// TV service API client.
///
/// Performs one GET-with-query round trip per backend command. No
/// automatic retries: at most one attempt reaches the backend per
/// logical call, leaving retry policy to the caller.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TvServiceClient {
    /// HTTP client (reqwest, gzip enabled).
    http_client: Client,
    /// Base URL of the service endpoint, ending in a slash.
    base_url: Url,
}

/// Builder for `TvServiceClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TvServiceClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
}

impl TvServiceClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
        }
    }

    /// Sets the service base URL (required), e.g.
    /// `http://backend:4322/TVAccessService/json/`. Must end with a slash
    /// so command names join onto it.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `base_url` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TvServiceClient, TvServiceError> {
        let base_url = self
            .base_url
            .ok_or_else(|| TvServiceError::InvalidConfig(String::from("base_url is required")))?;
        let user_agent = self
            .user_agent
            .ok_or_else(|| TvServiceError::InvalidConfig(String::from("user_agent is required")))?;

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .map_err(|e| TvServiceError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(TvServiceClient {
            http_client,
            base_url,
        })
    }
}

impl TvServiceClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TvServiceClientBuilder {
        TvServiceClientBuilder::new()
    }

    /// Sends one GET request for `command` and decodes the JSON response.
    ///
    /// Checks the cancellation token before dispatch and races the
    /// in-flight request against it. A call the backend has already
    /// acknowledged is not undone by cancellation.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        command: &str,
        query: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<T, TvServiceError> {
        if cancel.is_cancelled() {
            return Err(TvServiceError::Cancelled);
        }

        let url = self
            .base_url
            .join(command)
            .map_err(|e| TvServiceError::InvalidConfig(format!("failed to join URL path {command}: {e}")))?;

        let request = self
            .http_client
            .get(url)
            .query(query)
            .build()
            .map_err(TvServiceError::Network)?;

        tracing::debug!(url = %request.url(), "TV service request");

        let response = tokio::select! {
            () = cancel.cancelled() => return Err(TvServiceError::Cancelled),
            result = self.http_client.execute(request) => result.map_err(TvServiceError::Network)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(TvServiceError::Http {
                status,
                url: response.url().to_string(),
            });
        }

        let body = response.text().await.map_err(TvServiceError::Network)?;
        tracing::trace!(%command, body_len = body.len(), "Response body received");

        serde_json::from_str(&body).map_err(|e| TvServiceError::Decode {
            command: String::from(command),
            message: e.to_string(),
        })
    }

    /// Maps an HTTP 404 to `Ok(None)` for by-id lookups.
    fn none_on_not_found<T>(
        result: Result<T, TvServiceError>,
    ) -> Result<Option<T>, TvServiceError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl LocalTvServiceApi for TvServiceClient {
    #[instrument(skip_all)]
    async fn service_description(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ServiceDescription, TvServiceError> {
        self.get_json("GetServiceDescription", &[], cancel).await
    }

    #[instrument(skip_all)]
    async fn tuner_cards(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<TunerCard>, TvServiceError> {
        self.get_json("GetCards", &[], cancel).await
    }

    #[instrument(skip_all)]
    async fn active_tuner_cards(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ActiveTunerCard>, TvServiceError> {
        self.get_json("GetActiveCards", &[], cancel).await
    }

    #[instrument(skip_all)]
    async fn channel_groups(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ChannelGroup>, TvServiceError> {
        self.get_json("GetGroups", &[], cancel).await
    }

    #[instrument(skip_all)]
    async fn channels(
        &self,
        group_id: Option<i32>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Channel>, TvServiceError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(group_id) = group_id {
            query.push(("groupId", group_id.to_string()));
        }
        self.get_json("GetChannelsDetailed", &query, cancel).await
    }

    #[instrument(skip_all)]
    async fn program_by_id(
        &self,
        program_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Program>, TvServiceError> {
        let query = [("programId", String::from(program_id))];
        Self::none_on_not_found(self.get_json("GetProgramDetailedById", &query, cancel).await)
    }

    #[instrument(skip_all)]
    async fn programs_for_channel(
        &self,
        channel_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        cancel: &CancellationToken,
    ) -> Result<Vec<Program>, TvServiceError> {
        let query = [
            ("channelId", String::from(channel_id)),
            ("starttime", to_url_date(start)),
            ("endtime", to_url_date(end)),
        ];
        self.get_json("GetProgramsDetailedForChannel", &query, cancel)
            .await
    }

    #[instrument(skip_all)]
    async fn recordings(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Recording>, TvServiceError> {
        self.get_json("GetRecordings", &[], cancel).await
    }

    #[instrument(skip_all)]
    async fn recording_by_id(
        &self,
        recording_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Recording>, TvServiceError> {
        let query = [("id", String::from(recording_id))];
        Self::none_on_not_found(self.get_json("GetRecordingById", &query, cancel).await)
    }

    #[instrument(skip_all)]
    async fn schedules(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Schedule>, TvServiceError> {
        self.get_json("GetSchedules", &[], cancel).await
    }

    #[instrument(skip_all)]
    async fn schedule_by_id(
        &self,
        schedule_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Schedule>, TvServiceError> {
        let query = [("scheduleId", String::from(schedule_id))];
        Self::none_on_not_found(self.get_json("GetScheduleById", &query, cancel).await)
    }

    #[instrument(skip_all)]
    async fn add_schedule(
        &self,
        params: &AddScheduleParams,
        cancel: &CancellationToken,
    ) -> Result<bool, TvServiceError> {
        let query = params.to_query();
        let response: BoolResult = self.get_json("AddScheduleDetailed", &query, cancel).await?;
        Ok(response.result)
    }

    #[instrument(skip_all)]
    async fn delete_schedule(
        &self,
        schedule_id: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, TvServiceError> {
        let query = [("scheduleId", String::from(schedule_id))];
        let response: BoolResult = self.get_json("DeleteSchedule", &query, cancel).await?;
        Ok(response.result)
    }

    #[instrument(skip_all)]
    async fn delete_recording(
        &self,
        recording_id: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, TvServiceError> {
        let query = [("id", String::from(recording_id))];
        let response: BoolResult = self.get_json("DeleteRecording", &query, cancel).await?;
        Ok(response.result)
    }

    #[instrument(skip_all)]
    async fn stream_url(
        &self,
        channel_id: i32,
        cancel: &CancellationToken,
    ) -> Result<String, TvServiceError> {
        let query = [
            ("userName", String::new()),
            ("channelId", channel_id.to_string()),
        ];
        self.get_json("SwitchTVServerToChannelAndGetStreamingUrl", &query, cancel)
            .await
    }

    #[instrument(skip_all)]
    async fn read_setting(
        &self,
        tag: &str,
        cancel: &CancellationToken,
    ) -> Result<String, TvServiceError> {
        let query = [("tagName", String::from(tag))];
        let response: StringResult = self
            .get_json("ReadSettingFromDatabase", &query, cancel)
            .await?;
        Ok(response.result)
    }
}
