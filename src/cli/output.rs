//! Output-mode helpers shared by the subcommands.
//!
//! The binary propagates its global flags through environment
//! variables so every module can check them without threading a config
//! struct through the call tree.

use serde_json::Value;

/// Whether `--json` was passed.
pub fn is_json() -> bool {
    flag("PERMITSCOPE_JSON")
}

/// Whether `--quiet` was passed.
pub fn is_quiet() -> bool {
    flag("PERMITSCOPE_QUIET")
}

fn flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1").unwrap_or(false)
}

/// Print a machine-readable document to stdout.
pub fn print_json(value: &Value) {
    println!("{value}");
}

/// Shorten a field for table display.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let keep: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{keep}...")
    } else {
        s.to_string()
    }
}
