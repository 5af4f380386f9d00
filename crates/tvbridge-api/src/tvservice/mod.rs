//! TV service API client module.
//!
//! Handles HTTP requests against the backend's `TVAccessService/json`
//! endpoint: channel, program, recording and schedule retrieval plus
//! schedule mutation.

mod api;
mod client;
mod error;
pub(crate) mod json;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTvServiceApi, TvServiceApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TvServiceClient, TvServiceClientBuilder};
pub use error::TvServiceError;
pub use params::{AddScheduleParams, to_url_date};
pub use types::{
    ActiveTunerCard, BoolResult, Channel, ChannelGroup, Program, Recording, Schedule,
    ScheduleType, ServiceDescription, StringResult, TunerCard,
};
