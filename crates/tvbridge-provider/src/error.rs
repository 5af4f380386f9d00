//! Provider error taxonomy.
//!
//! Validation failures (`InvalidReference`, `UnsupportedRecurrence`) are
//! raised before any mutating backend call; `Conflict` and `Backend`
//! surface unchanged because the backend is authoritative and no local
//! recovery is possible.

use thiserror::Error;
use tvbridge_api::tvservice::TvServiceError;

/// Failure of a provider operation.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ProviderError {
    /// A referenced program or schedule id did not resolve.
    #[error("{field}: no entity with id {id}")]
    InvalidReference {
        /// Name of the offending reference field.
        field: &'static str,
        /// The id that failed to resolve.
        id: String,
    },

    /// The backend reported a boolean failure on a create or delete.
    #[error("the backend rejected the schedule operation")]
    Conflict,

    /// The requested recurrence has no backend pattern.
    #[error("unsupported recurrence: {reason}")]
    UnsupportedRecurrence {
        /// Why the pattern cannot be represented.
        reason: String,
    },

    /// The backend sent a field this layer cannot interpret.
    #[error("malformed {field} from backend: {value:?}")]
    MalformedUpstreamData {
        /// Name of the malformed field.
        field: &'static str,
        /// The offending raw value.
        value: String,
    },

    /// Transport-level failure, propagated as-is.
    #[error(transparent)]
    Backend(#[from] TvServiceError),
}

impl ProviderError {
    /// Whether this is a transport-level 404 from the backend.
    #[must_use]
    pub fn is_backend_not_found(&self) -> bool {
        matches!(self, Self::Backend(e) if e.is_not_found())
    }
}
