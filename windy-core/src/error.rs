use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures of a single forecast fetch or bundle build.
///
/// Every variant is terminal: nothing here is retried or recovered, and a
/// failure on one parameter aborts the whole bundle.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Upstream answered with something other than 200.
    #[error("Windy request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Failed to send request to Windy: {0}")]
    Transport(#[from] reqwest::Error),

    /// `parameter` is `None` when the body as a whole could not be decoded.
    #[error(
        "Malformed response{}: {reason}",
        .parameter.as_ref().map(|p| format!(" for '{p}'")).unwrap_or_default()
    )]
    MalformedResponse { parameter: Option<String>, reason: String },

    /// No reading in the series lies strictly after `cutoff` (Unix seconds).
    #[error("No '{parameter}' reading after {cutoff}")]
    NoMatchingEntry { parameter: String, cutoff: i64 },

    #[error("Series for '{parameter}' is empty")]
    EmptySeries { parameter: String },

    /// `now` plus the horizon falls outside the representable time range.
    #[error("Horizon of {days} day(s) from {now} is out of range")]
    HorizonOutOfRange { now: DateTime<Utc>, days: i64 },
}

impl ForecastError {
    pub(crate) fn malformed(parameter: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse { parameter: Some(parameter.to_string()), reason: reason.into() }
    }

    /// HTTP status carried by a `RequestFailed`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
