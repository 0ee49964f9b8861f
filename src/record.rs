//! Permit record model and the fetch window that bounds a query.

use crate::error::FetchError;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A geocoded point in WGS84.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One municipal building-permit record.
///
/// Every attribute except `id` is optional: upstream layers omit or
/// null fields freely, and a record without geometry is still valid,
/// just unmappable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermitRecord {
    /// Layer OBJECTID; unique within one fetched batch.
    pub id: i64,
    /// Categorical permit type (e.g. "ELECTRICAL").
    pub permit_type: Option<String>,
    /// Categorical work activity (e.g. "NEW CONSTRUCTION").
    pub activity: Option<String>,
    /// Building classification.
    pub building_type: Option<String>,
    /// Occupancy classification.
    pub occupancy: Option<String>,
    /// Permit status.
    pub status: Option<String>,
    /// Free-text description of the permitted work.
    pub description: Option<String>,
    /// Free-text reviewer comments.
    pub comments: Option<String>,
    /// Human-readable site address.
    pub address: Option<String>,
    /// Issue timestamp (epoch milliseconds on the wire).
    pub issued: Option<DateTime<Utc>>,
    /// Geocoded site location, when the layer carries geometry.
    pub location: Option<GeoPoint>,
}

impl PermitRecord {
    /// Whether the record can be placed on a map.
    pub fn is_mappable(&self) -> bool {
        self.location.is_some()
    }
}

/// Inclusive date range used to query the feature service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl FetchWindow {
    /// Build a window, rejecting an inverted range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FetchError> {
        if start > end {
            return Err(FetchError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The trailing `days`-day window ending today (UTC).
    pub fn trailing_days(days: i64) -> Self {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(days);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl std::fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
