//! Retrieval of permit records from an ArcGIS feature service.
//!
//! The service caps records per response, so a fetch walks pages with
//! resultOffset until a short page comes back, then merges the pages
//! into one batch: deduplicated by id, sorted issue-date descending.

pub mod arcgis;
pub mod http;

use crate::config::ServiceConfig;
use crate::error::FetchError;
use crate::record::{FetchWindow, PermitRecord};
use std::collections::HashSet;
use tracing::{debug, info};

/// Client for one feature-service layer.
pub struct PermitService {
    http: http::HttpClient,
    config: ServiceConfig,
}

impl PermitService {
    pub fn new(config: ServiceConfig) -> Self {
        let http = http::HttpClient::new(config.timeout_ms);
        Self { http, config }
    }

    /// Service against the default Durham layer.
    pub fn from_env() -> Self {
        Self::new(ServiceConfig::from_env())
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Fetch every record issued inside `window`, inclusive.
    ///
    /// Performs no filtering. An empty day is an empty `Vec`, not an
    /// error. Repeated calls with the same window are idempotent
    /// modulo upstream edits.
    pub async fn fetch(&self, window: &FetchWindow) -> Result<Vec<PermitRecord>, FetchError> {
        let mut batch: Vec<PermitRecord> = Vec::new();
        let mut complete = false;

        for page in 0..self.config.max_pages {
            let params = arcgis::page_params(&self.config, window, page);
            let resp = self.http.get(&self.config.endpoint, &params).await?;

            if !(200..300).contains(&resp.status) {
                return Err(classify_status(resp.status, &resp.body));
            }

            let rows = arcgis::parse_page(&resp.body)?;
            let short_page = (rows.len() as u32) < self.config.page_size;
            debug!(page, rows = rows.len(), "fetched permit page");
            batch.extend(rows);

            if short_page {
                complete = true;
                break;
            }
        }

        if !complete {
            return Err(FetchError::PageLimitExceeded {
                pages: self.config.max_pages,
            });
        }

        dedup_by_id(&mut batch);
        // Newest first; records without an issue date sink to the end.
        batch.sort_by(|a, b| b.issued.cmp(&a.issued));

        info!(window = %window, records = batch.len(), "fetch complete");
        Ok(batch)
    }
}

/// Map a terminal non-2xx status to the error taxonomy. 5xx and 429
/// mean the service is struggling; anything else means the request no
/// longer matches what the service expects.
fn classify_status(status: u16, body: &str) -> FetchError {
    if status >= 500 || status == 429 {
        FetchError::Transient(format!("HTTP {status}"))
    } else {
        let snippet: String = body.chars().take(120).collect();
        FetchError::MalformedResponse(format!("unexpected HTTP {status}: {snippet}"))
    }
}

/// Drop later occurrences of an id, preserving batch order. Pages can
/// overlap when the layer shifts under the offset walk.
fn dedup_by_id(batch: &mut Vec<PermitRecord>) {
    let mut seen: HashSet<i64> = HashSet::with_capacity(batch.len());
    batch.retain(|rec| seen.insert(rec.id));
}
