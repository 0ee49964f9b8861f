//! Explicit session state for an interactive front end.
//!
//! Everything a dashboard would keep as ambient widget state lives
//! here as plain data: the fetch window, the active filter, the
//! selected record, and the batch itself. Nothing re-renders or
//! re-fetches implicitly; the caller decides when to call
//! [`Session::refresh`] or [`Session::matches`].

use crate::error::{FetchError, FilterError};
use crate::fetch::PermitService;
use crate::filter::{self, FilterSpec, Vocabulary};
use crate::record::{FetchWindow, GeoPoint, PermitRecord};
use serde::{Deserialize, Serialize};

/// State threaded through fetch and filter calls by a front end.
#[derive(Debug, Clone)]
pub struct Session {
    window: FetchWindow,
    /// Active filter; edited freely between refreshes.
    pub filter: FilterSpec,
    selected: Option<i64>,
    records: Vec<PermitRecord>,
}

impl Session {
    pub fn new(window: FetchWindow) -> Self {
        Self {
            window,
            filter: FilterSpec::default(),
            selected: None,
            records: Vec::new(),
        }
    }

    pub fn window(&self) -> FetchWindow {
        self.window
    }

    /// Change the window without fetching. The stale batch stays until
    /// the caller refreshes.
    pub fn set_window(&mut self, window: FetchWindow) {
        self.window = window;
    }

    /// Re-fetch the batch for the current window. A selection that no
    /// longer resolves in the new batch is cleared. Returns the batch
    /// size.
    pub async fn refresh(&mut self, service: &PermitService) -> Result<usize, FetchError> {
        let batch = service.fetch(&self.window).await?;
        self.replace_records(batch);
        Ok(self.records.len())
    }

    /// Install a freshly fetched batch, dropping a dangling selection.
    pub fn replace_records(&mut self, records: Vec<PermitRecord>) {
        self.records = records;
        if let Some(id) = self.selected {
            if !self.records.iter().any(|r| r.id == id) {
                self.selected = None;
            }
        }
    }

    /// The whole batch, unfiltered, newest first.
    pub fn records(&self) -> &[PermitRecord] {
        &self.records
    }

    /// Distinct type and activity values of the current batch.
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::from_records(&self.records)
    }

    /// The records surviving the active filter, in batch order.
    pub fn matches(&self) -> Result<Vec<&PermitRecord>, FilterError> {
        filter::apply(&self.records, &self.filter, &self.vocabulary())
    }

    /// Select a record by id; `false` when the id is not in the batch.
    pub fn select(&mut self, id: i64) -> bool {
        if self.records.iter().any(|r| r.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected record's full field set, for detail display.
    pub fn selected_record(&self) -> Option<&PermitRecord> {
        let id = self.selected?;
        self.records.iter().find(|r| r.id == id)
    }

    /// Viewport fitted to the filtered records' locations.
    pub fn viewport(&self) -> Result<Option<Viewport>, FilterError> {
        Ok(Viewport::fit(self.matches()?.into_iter()))
    }
}

/// A map view fitted around a set of located records: mean-centered,
/// zoom derived from the coordinate span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: f64,
}

impl Viewport {
    pub const MIN_ZOOM: f64 = 8.0;
    pub const MAX_ZOOM: f64 = 15.0;

    /// Fit a viewport around every located record, or `None` when the
    /// set has no locations to show.
    pub fn fit<'a>(records: impl IntoIterator<Item = &'a PermitRecord>) -> Option<Self> {
        let points: Vec<GeoPoint> = records.into_iter().filter_map(|r| r.location).collect();
        if points.is_empty() {
            return None;
        }

        let n = points.len() as f64;
        let center = GeoPoint {
            lat: points.iter().map(|p| p.lat).sum::<f64>() / n,
            lon: points.iter().map(|p| p.lon).sum::<f64>() / n,
        };

        let span = |f: fn(&GeoPoint) -> f64| {
            let min = points.iter().map(f).fold(f64::INFINITY, f64::min);
            let max = points.iter().map(f).fold(f64::NEG_INFINITY, f64::max);
            max - min
        };
        let angle = span(|p| p.lon).max(span(|p| p.lat));

        // A single point has zero span; snap straight to max zoom.
        let zoom = if angle > 0.0 {
            (360.0 / angle).log2().clamp(Self::MIN_ZOOM, Self::MAX_ZOOM)
        } else {
            Self::MAX_ZOOM
        };

        Some(Self { center, zoom })
    }
}
