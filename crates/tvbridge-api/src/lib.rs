//! Backend API client library for tvbridge.
//!
//! Provides a typed client for the TV service JSON/HTTP API.

/// TV service API client.
pub mod tvservice;
