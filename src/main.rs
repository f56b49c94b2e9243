//! MySQL Dump Utility
//!
//! Prompts for connection parameters, runs mysqldump, optionally compresses
//! the result and remembers non-sensitive preferences between runs.

// mysqldumper/src/main.rs
mod backup;
mod config;
mod errors;
mod params;
mod resolver;
mod utils;

use std::env;
use std::io::{Write, stdin, stdout};
use std::process::ExitCode;

use backup::{Phase, Reporter, RunSettings};
use config::Preferences;
use errors::Result;
use params::DumpMode;

#[tokio::main]
async fn main() -> ExitCode {
    match run_app().await {
        Ok(_) => {
            println!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {e}");
            ExitCode::FAILURE
        }
    }
}

struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn phase(&self, phase: Phase, detail: &str) {
        let marker = match phase {
            Phase::Idle => "💤",
            Phase::Validating => "🔍",
            Phase::Resolving => "🔎",
            Phase::Dumping => "🚀",
            Phase::Archiving => "🗜",
            Phase::Done => "🎉",
            Phase::Failed => "❌",
        };
        println!("{marker} {phase}: {detail}");
    }

    fn warn(&self, message: &str) {
        eprintln!("⚠️ Warning: {message}");
    }
}

async fn run_app() -> Result<()> {
    let mode = if env::args().any(|a| a == "--minimal") {
        DumpMode::Minimal
    } else {
        DumpMode::Full
    };

    let prefs_path = Preferences::default_path();
    let mut prefs = match Preferences::load(&prefs_path) {
        Ok(prefs) => prefs,
        Err(e) => {
            eprintln!("⚠️ Could not load preferences, starting fresh: {e}");
            Preferences::default()
        }
    };
    if prefs.mysqldump_path.is_empty() {
        if let Some(found) = resolver::find_mysqldump() {
            prefs.mysqldump_path = found.display().to_string();
        }
    }
    if prefs.output_folder.is_empty() {
        prefs.output_folder = config::default_output_dir().display().to_string();
    }

    let reporter = TerminalReporter;
    println!("--- MySQL database dump ---");
    reporter.phase(Phase::Idle, "ready");
    println!();

    let user = prompt("MySQL user", &prefs.db_user)?;
    // Read like any other field. The value is held in memory for this run
    // only and is never written to the preferences file.
    let password = prompt("MySQL password", "")?;
    let host = prompt("MySQL host", &prefs.db_host)?;
    let port_text = prompt("MySQL port (empty for default)", &prefs.db_port)?;
    let database = prompt("Database to dump", &prefs.db_name)?;
    let tool_path = prompt("mysqldump path (empty to auto-detect)", &prefs.mysqldump_path)?;
    let output_folder = prompt("Output folder", &prefs.output_folder)?;
    println!();

    let settings = RunSettings {
        user,
        password,
        host,
        port_text,
        database,
        tool_path,
        output_folder,
        mode,
    };

    let result =
        backup::run_backup_flow(&settings, &mut prefs, &prefs_path, &reporter).await?;

    println!();
    println!("Backup file: {}", result.artifact().display());
    if let Some(folder) = result.artifact().parent() {
        let answer = prompt("Open the output folder? (y/N)", "n")?;
        if answer.eq_ignore_ascii_case("y") {
            if let Err(e) = utils::reveal_in_file_manager(folder) {
                eprintln!("⚠️ Could not open folder: {e}");
            }
        }
    }
    Ok(())
}

/// Prompts for one field, showing the last-used value as the default.
fn prompt(label: &str, default: &str) -> Result<String> {
    if default.is_empty() {
        print!("{label}: ");
    } else {
        print!("{label} [{default}]: ");
    }
    stdout().flush()?;

    let mut input = String::new();
    stdin().read_line(&mut input)?;
    let input = input.trim();
    Ok(if input.is_empty() {
        default.to_string()
    } else {
        input.to_string()
    })
}
