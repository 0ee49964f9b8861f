//! `permitscope query`: fetch a window and filter it locally.

use crate::cli::output;
use crate::fetch::PermitService;
use crate::filter::FilterSpec;
use crate::record::FetchWindow;
use crate::session::{Session, Viewport};
use anyhow::Result;

/// Run the query command.
pub async fn run(
    window: FetchWindow,
    types: Vec<String>,
    activities: Vec<String>,
    text: Option<String>,
    limit: usize,
) -> Result<()> {
    let service = PermitService::from_env();

    let mut session = Session::new(window);
    session.filter = FilterSpec {
        types: types.into_iter().collect(),
        activities: activities.into_iter().collect(),
        text,
    };
    session.refresh(&service).await?;

    let matches = session.matches()?;
    let viewport = Viewport::fit(matches.iter().copied());

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "window": { "start": window.start(), "end": window.end() },
            "total": matches.len(),
            "viewport": viewport,
            "records": matches.iter().take(limit).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    if !output::is_quiet() {
        eprintln!("  {} matching permits", matches.len());
        if matches.is_empty() {
            return Ok(());
        }
        if matches.len() > limit {
            eprintln!("  Showing first {limit} (use --limit to change).");
        }
        eprintln!();

        for rec in matches.iter().take(limit) {
            let issued = rec
                .issued
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".into());
            eprintln!(
                "    [{:>7}] {:<10} {:<14} {:<26} {}",
                rec.id,
                issued,
                output::truncate(rec.permit_type.as_deref().unwrap_or("-"), 14),
                output::truncate(rec.address.as_deref().unwrap_or("-"), 26),
                output::truncate(rec.description.as_deref().unwrap_or(""), 48),
            );
        }
    }

    Ok(())
}
