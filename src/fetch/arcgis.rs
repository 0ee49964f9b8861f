//! ArcGIS feature-service query construction and response parsing.
//!
//! The layer speaks the REST query protocol: `where` takes TIMESTAMP
//! literals for date bounds, results arrive as a `features` array of
//! `{attributes, geometry}` objects, and dates are epoch milliseconds.

use crate::config::ServiceConfig;
use crate::error::FetchError;
use crate::record::{FetchWindow, GeoPoint, PermitRecord};
use chrono::{TimeZone, Utc};
use serde_json::{Map, Value};

/// Date-bound predicate for the layer's `where` parameter.
///
/// See <https://developers.arcgis.com/rest/services-reference/enterprise/query-feature-service-layer/#date-time-queries>
pub fn where_clause(window: &FetchWindow) -> String {
    format!(
        "ISSUE_DATE >= TIMESTAMP '{} 00:00:00' AND ISSUE_DATE <= TIMESTAMP '{} 23:59:59'",
        window.start(),
        window.end()
    )
}

/// Query parameters for one page of a windowed fetch.
pub fn page_params(
    config: &ServiceConfig,
    window: &FetchWindow,
    page: u32,
) -> Vec<(String, String)> {
    vec![
        ("outFields".into(), config.out_fields.clone()),
        ("outSR".into(), "4326".into()),
        ("resultOffset".into(), (page * config.page_size).to_string()),
        ("resultRecordCount".into(), config.page_size.to_string()),
        ("where".into(), where_clause(window)),
        ("f".into(), "json".into()),
    ]
}

/// Parse one response body into records.
///
/// The service reports its own failures as a 200 with an `error`
/// object; those surface as transient (the layer is up but declining).
/// A body that is not JSON, or JSON without a `features` array, is a
/// contract change and surfaces as malformed.
pub fn parse_page(body: &str) -> Result<Vec<PermitRecord>, FetchError> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(format!("body is not JSON: {e}")))?;

    if let Some(err) = v.get("error") {
        let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message");
        return Err(FetchError::Transient(format!(
            "service error {code}: {message}"
        )));
    }

    let features = v
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::MalformedResponse("missing 'features' array".into()))?;

    features.iter().map(parse_feature).collect()
}

fn parse_feature(feature: &Value) -> Result<PermitRecord, FetchError> {
    let attrs = feature
        .get("attributes")
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::MalformedResponse("feature without 'attributes'".into()))?;

    // The id is the one attribute the merge step cannot do without.
    let id = attrs
        .get("OBJECTID")
        .and_then(Value::as_i64)
        .ok_or_else(|| FetchError::MalformedResponse("feature without OBJECTID".into()))?;

    let issued = attrs
        .get("ISSUE_DATE")
        .and_then(Value::as_i64)
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single());

    // Geometry is optional; a record without it is valid but unmappable.
    let location = feature.get("geometry").and_then(|g| {
        let lon = g.get("x")?.as_f64()?;
        let lat = g.get("y")?.as_f64()?;
        Some(GeoPoint { lat, lon })
    });

    Ok(PermitRecord {
        id,
        permit_type: text(attrs, "TYPE"),
        activity: text(attrs, "BLDB_ACTIVITY_1"),
        building_type: text(attrs, "BLD_Type"),
        occupancy: text(attrs, "Occupancy"),
        status: text(attrs, "PmtStatus"),
        description: text(attrs, "DESCRIPTION"),
        comments: text(attrs, "COMMENTS"),
        address: text(attrs, "ADDRESS"),
        issued,
        location,
    })
}

fn text(attrs: &Map<String, Value>, key: &str) -> Option<String> {
    attrs.get(key).and_then(Value::as_str).map(str::to_string)
}
