//! Error taxonomy for the fetch and filter passes.

use chrono::NaiveDate;
use thiserror::Error;

/// Failures while retrieving permit records from the feature service.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The requested window is inverted. Detected before any network
    /// traffic happens.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// The service or the network path to it is unavailable. Safe to
    /// retry with the same window.
    #[error("permit service unavailable: {0}")]
    Transient(String),

    /// The service answered with something the record schema cannot
    /// absorb. Retrying will not help; the upstream contract changed.
    #[error("malformed response from permit service: {0}")]
    MalformedResponse(String),

    /// Paging never reached a short page within the configured bound.
    /// Narrow the window instead of retrying.
    #[error("page limit exceeded after {pages} pages; narrow the date range")]
    PageLimitExceeded { pages: u32 },
}

impl FetchError {
    /// Whether a caller-side retry with the same inputs can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // Transport-level failures (connect, timeout, broken body) are
        // the retryable class; everything else surfaces elsewhere as a
        // status-code decision.
        FetchError::Transient(err.to_string())
    }
}

/// Failures while validating a filter specification against a batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The spec names a permit type the fetched batch never uses.
    #[error("unknown permit type '{0}'")]
    UnknownType(String),

    /// The spec names an activity the fetched batch never uses.
    #[error("unknown activity '{0}'")]
    UnknownActivity(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_is_retryable() {
        let err = FetchError::Transient("connection refused".into());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_malformed_is_not_retryable() {
        let err = FetchError::MalformedResponse("not json".into());
        assert!(!err.is_retryable());
        let err = FetchError::PageLimitExceeded { pages: 100 };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_invalid_range_message_names_both_bounds() {
        let err = FetchError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-02-01"));
        assert!(msg.contains("2024-01-01"));
    }
}
