//! Feature-service configuration with environment overrides.

/// Durham's public building-permits layer.
///
/// <https://live-durhamnc.opendata.arcgis.com/datasets/DurhamNC::all-building-permits/about>
pub const DEFAULT_ENDPOINT: &str = "https://webgis2.durhamnc.gov/server/rest/services/PublicServices/Inspections/MapServer/12/query";

/// Attributes requested from the layer.
pub const DEFAULT_OUT_FIELDS: &str =
    "OBJECTID,ISSUE_DATE,DESCRIPTION,COMMENTS,TYPE,BLDB_ACTIVITY_1,BLD_Type,Occupancy,PmtStatus,ADDRESS";

/// Records requested per page. The server caps result sizes, so the
/// fetcher pages with resultOffset until a short page comes back.
pub const DEFAULT_PAGE_SIZE: u32 = 2000;

/// Upper bound on pages per fetch.
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Everything the fetcher needs to know about the remote layer.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Query URL of the feature-service layer.
    pub endpoint: String,
    /// Comma-separated attribute list for the outFields parameter.
    pub out_fields: String,
    /// Records per page.
    pub page_size: u32,
    /// Maximum pages before the fetch fails.
    pub max_pages: u32,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            out_fields: DEFAULT_OUT_FIELDS.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ServiceConfig {
    /// Defaults overlaid with `PERMITSCOPE_*` environment variables.
    ///
    /// Recognized: `PERMITSCOPE_ENDPOINT`, `PERMITSCOPE_PAGE_SIZE`,
    /// `PERMITSCOPE_MAX_PAGES`, `PERMITSCOPE_TIMEOUT_MS`. Unparsable
    /// numeric values fall back to the default.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(endpoint) = std::env::var("PERMITSCOPE_ENDPOINT") {
            if !endpoint.is_empty() {
                cfg.endpoint = endpoint;
            }
        }
        if let Some(n) = env_u32("PERMITSCOPE_PAGE_SIZE") {
            cfg.page_size = n;
        }
        if let Some(n) = env_u32("PERMITSCOPE_MAX_PAGES") {
            cfg.max_pages = n;
        }
        if let Some(n) = env_u64("PERMITSCOPE_TIMEOUT_MS") {
            cfg.timeout_ms = n;
        }
        cfg
    }
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok()?.trim().parse().ok()
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_durham() {
        let cfg = ServiceConfig::default();
        assert!(cfg.endpoint.contains("durhamnc.gov"));
        assert_eq!(cfg.page_size, 2000);
        assert_eq!(cfg.max_pages, 100);
    }

    #[test]
    fn test_out_fields_include_identity_and_dates() {
        assert!(DEFAULT_OUT_FIELDS.contains("OBJECTID"));
        assert!(DEFAULT_OUT_FIELDS.contains("ISSUE_DATE"));
    }
}
