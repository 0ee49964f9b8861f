//! `permitscope vocab`: distinct type and activity values in a window.

use crate::cli::output;
use crate::fetch::PermitService;
use crate::filter::Vocabulary;
use crate::record::FetchWindow;
use anyhow::Result;

/// Run the vocab command.
pub async fn run(window: FetchWindow) -> Result<()> {
    let service = PermitService::from_env();
    let records = service.fetch(&window).await?;
    let vocab = Vocabulary::from_records(&records);

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "window": { "start": window.start(), "end": window.end() },
            "types": vocab.types().collect::<Vec<_>>(),
            "activities": vocab.activities().collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    if !output::is_quiet() {
        eprintln!("  Types:");
        for t in vocab.types() {
            eprintln!("    {t}");
        }
        eprintln!();
        eprintln!("  Activities:");
        for a in vocab.activities() {
            eprintln!("    {a}");
        }
    }

    Ok(())
}
