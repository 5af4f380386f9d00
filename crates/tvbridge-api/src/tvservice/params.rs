//! Request parameter types for the TV service API.

use chrono::NaiveDateTime;

use super::types::ScheduleType;

/// Formats a local timestamp for transmission as a query parameter.
///
/// Example: `"2024-01-15 18:00:00"`
#[must_use]
pub fn to_url_date(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parameters for `AddScheduleDetailed`.
#[derive(Debug, Clone)]
pub struct AddScheduleParams {
    /// Target channel id.
    pub channel_id: i32,
    /// Schedule title.
    pub title: String,
    /// Local start time.
    pub start_time: NaiveDateTime,
    /// Local end time.
    pub end_time: NaiveDateTime,
    /// Recurrence pattern.
    pub schedule_type: ScheduleType,
    /// Pre-record padding in whole minutes (omitted when `None`).
    pub pre_record_minutes: Option<u32>,
    /// Post-record padding in whole minutes (omitted when `None`).
    pub post_record_minutes: Option<u32>,
}

impl AddScheduleParams {
    /// Renders the parameters as query pairs in the order the backend
    /// documents them.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = vec![
            ("channelid", self.channel_id.to_string()),
            ("title", self.title.clone()),
            ("starttime", to_url_date(self.start_time)),
            ("endtime", to_url_date(self.end_time)),
            ("scheduletype", i32::from(self.schedule_type).to_string()),
        ];

        if let Some(pre) = self.pre_record_minutes {
            query.push(("preRecordInterval", pre.to_string()));
        }

        if let Some(post) = self.post_record_minutes {
            query.push(("postRecordInterval", post.to_string()));
        }

        query
    }
}
