//! `permitscope show <id>`: full field set of one record.

use crate::cli::output;
use crate::fetch::PermitService;
use crate::record::FetchWindow;
use crate::session::Session;
use anyhow::{bail, Result};

/// Run the show command.
pub async fn run(id: i64, window: FetchWindow) -> Result<()> {
    let service = PermitService::from_env();

    let mut session = Session::new(window);
    session.refresh(&service).await?;

    if !session.select(id) {
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "error": "not_found",
                "message": format!("no permit {id} issued in {window}"),
            }));
            return Ok(());
        }
        bail!("no permit {id} issued in {window}; widen the window with --start/--end");
    }

    // select() just confirmed the id resolves.
    let rec = session
        .selected_record()
        .expect("selected record must resolve");

    if output::is_json() {
        output::print_json(&serde_json::json!(rec));
        return Ok(());
    }

    if !output::is_quiet() {
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        eprintln!("  Permit {}", rec.id);
        eprintln!("    type:          {}", field(&rec.permit_type));
        eprintln!("    activity:      {}", field(&rec.activity));
        eprintln!("    building type: {}", field(&rec.building_type));
        eprintln!("    occupancy:     {}", field(&rec.occupancy));
        eprintln!("    status:        {}", field(&rec.status));
        eprintln!("    address:       {}", field(&rec.address));
        match rec.issued {
            Some(t) => eprintln!("    issued:        {}", t.format("%Y-%m-%d %H:%M:%S")),
            None => eprintln!("    issued:        -"),
        }
        match rec.location {
            Some(loc) => eprintln!("    location:      {:.6}, {:.6}", loc.lat, loc.lon),
            None => eprintln!("    location:      (not geocoded)"),
        }
        eprintln!("    description:   {}", field(&rec.description));
        eprintln!("    comments:      {}", field(&rec.comments));
    }

    Ok(())
}
