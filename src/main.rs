// Copyright 2026 Permitscope Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use permitscope::cli;
use permitscope::cli::output;

#[derive(Parser)]
#[command(
    name = "permitscope",
    about = "Permitscope: fetch and filter municipal building-permit records",
    version,
    after_help = "Run 'permitscope <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch permits for a date window and filter them locally
    Query {
        /// Window start (YYYY-MM-DD); default is 90 days back
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Window end (YYYY-MM-DD); default is today
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Keep only these permit types. Can be repeated.
        #[arg(long = "type")]
        types: Vec<String>,
        /// Keep only these activities. Can be repeated.
        #[arg(long = "activity")]
        activities: Vec<String>,
        /// Case-insensitive text to match in description/comments
        #[arg(long)]
        text: Option<String>,
        /// Maximum number of records to display
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show every field of one permit record
    Show {
        /// Permit record id (OBJECTID)
        id: i64,
        /// Window start (YYYY-MM-DD); default is 90 days back
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Window end (YYYY-MM-DD); default is today
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// List the distinct permit types and activities in a window
    Vocab {
        /// Window start (YYYY-MM-DD); default is 90 days back
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Window end (YYYY-MM-DD); default is today
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("PERMITSCOPE_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("PERMITSCOPE_QUIET", "1");
    }
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("permitscope=debug".parse().unwrap()),
            )
            .init();
    }

    let result = match cli.command {
        Commands::Query {
            start,
            end,
            types,
            activities,
            text,
            limit,
        } => match cli::resolve_window(start, end) {
            Ok(window) => cli::query_cmd::run(window, types, activities, text, limit).await,
            Err(e) => Err(e.into()),
        },
        Commands::Show { id, start, end } => match cli::resolve_window(start, end) {
            Ok(window) => cli::show_cmd::run(id, window).await,
            Err(e) => Err(e.into()),
        },
        Commands::Vocab { start, end } => match cli::resolve_window(start, end) {
            Ok(window) => cli::vocab_cmd::run(window).await,
            Err(e) => Err(e.into()),
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "permitscope", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !output::is_quiet() && !output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
