//! CLI subcommand implementations for the permitscope binary.

pub mod output;
pub mod query_cmd;
pub mod show_cmd;
pub mod vocab_cmd;

use crate::error::FetchError;
use crate::record::FetchWindow;
use chrono::{Duration, NaiveDate, Utc};

/// Default lookback when no dates are given.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;

/// Resolve `--start`/`--end` flags into a window.
///
/// No dates: the trailing 90 days. Only a start: through today. Only
/// an end: the 90 days up to it.
pub fn resolve_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<FetchWindow, FetchError> {
    match (start, end) {
        (None, None) => Ok(FetchWindow::trailing_days(DEFAULT_LOOKBACK_DAYS)),
        (Some(s), None) => FetchWindow::new(s, Utc::now().date_naive()),
        (None, Some(e)) => FetchWindow::new(e - Duration::days(DEFAULT_LOOKBACK_DAYS), e),
        (Some(s), Some(e)) => FetchWindow::new(s, e),
    }
}
