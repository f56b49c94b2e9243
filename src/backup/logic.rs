// mysqldumper/src/backup/logic.rs
use chrono::NaiveDateTime;
use std::fmt;
use std::path::PathBuf;

use crate::backup::{archive, db_dump};
use crate::config::{self, Preferences};
use crate::errors::{AppError, Result};
use crate::params::{
    self, ConnectionParams, DumpMode, ExecutionRequest, ExecutionResult,
};
use crate::resolver;

/// Run states, strictly sequential. `Failed` is reachable from every step;
/// `Done` and `Failed` are terminal for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Resolving,
    Dumping,
    Archiving,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "Idle",
            Phase::Validating => "Validating",
            Phase::Resolving => "Resolving",
            Phase::Dumping => "Dumping",
            Phase::Archiving => "Archiving",
            Phase::Done => "Done",
            Phase::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Front-end contract: the orchestrator reports state transitions and
/// warnings through this trait instead of touching any presentation layer.
pub trait Reporter: Send + Sync {
    fn phase(&self, phase: Phase, detail: &str);
    fn warn(&self, message: &str);
}

/// Raw input from a front end, one struct per trigger. Text fields arrive
/// as entered; conversion problems become validation errors, not crashes.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port_text: String,
    pub database: String,
    /// Empty means "run the resolver".
    pub tool_path: String,
    /// Empty means "use the default desktop location".
    pub output_folder: String,
    pub mode: DumpMode,
}

/// Sequences Validating → Resolving (if needed) → Dumping → Archiving
/// (Full mode) → Done, flushing preferences right before the dump so a
/// crash mid-run does not lose them. Any failure transitions to `Failed`
/// with a human-readable reason; there are no retries.
pub async fn perform_backup_orchestration(
    settings: &RunSettings,
    prefs: &mut Preferences,
    prefs_path: &std::path::Path,
    reporter: &dyn Reporter,
    timestamp: NaiveDateTime,
) -> Result<ExecutionResult> {
    match run_steps(settings, prefs, prefs_path, reporter, timestamp).await {
        Ok(result) => {
            reporter.phase(Phase::Done, &result.artifact().display().to_string());
            Ok(result)
        }
        Err(e) => {
            reporter.phase(Phase::Failed, &e.to_string());
            Err(e)
        }
    }
}

async fn run_steps(
    settings: &RunSettings,
    prefs: &mut Preferences,
    prefs_path: &std::path::Path,
    reporter: &dyn Reporter,
    timestamp: NaiveDateTime,
) -> Result<ExecutionResult> {
    reporter.phase(Phase::Validating, "checking connection parameters");
    let mut errors = Vec::new();

    let port = match params::parse_port(&settings.port_text) {
        Ok(port) => port,
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let connection = ConnectionParams {
        host: settings.host.trim().to_string(),
        user: settings.user.trim().to_string(),
        password: settings.password.clone(),
        port,
        database: settings.database.trim().to_string(),
    };
    if let Err(field_errors) = connection.validate() {
        errors.extend(field_errors);
    }

    let use_default_dir = settings.output_folder.trim().is_empty();
    let output_dir = if use_default_dir {
        config::default_output_dir()
    } else {
        PathBuf::from(settings.output_folder.trim())
    };
    if let Err(e) = params::validate_output_dir(&output_dir, use_default_dir) {
        errors.push(e);
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let tool_path = if settings.tool_path.trim().is_empty() {
        reporter.phase(Phase::Resolving, "locating mysqldump");
        resolver::find_mysqldump().ok_or_else(|| {
            AppError::ToolNotFound(String::from(
                "not on PATH and not in any known bundle location; enter the path manually",
            ))
        })?
    } else {
        PathBuf::from(settings.tool_path.trim())
    };
    // Re-checked here even when the path came from preferences: it may have
    // been edited or the install removed since it was last validated.
    if params::validate_tool_path(&tool_path).is_err() {
        return Err(AppError::ToolNotFound(tool_path.display().to_string()));
    }

    prefs.db_user = connection.user.clone();
    prefs.db_host = connection.host.clone();
    prefs.db_port = port.map(|p| p.to_string()).unwrap_or_default();
    prefs.db_name = connection.database.clone();
    prefs.mysqldump_path = tool_path.display().to_string();
    prefs.output_folder = output_dir.display().to_string();
    if let Err(e) = prefs.save(prefs_path) {
        // Losing preferences must not abort a dump the user asked for.
        reporter.warn(&format!("could not save preferences: {e}"));
    }

    let request = ExecutionRequest::new(
        connection,
        tool_path,
        output_dir,
        settings.mode,
        timestamp,
    );
    reporter.phase(
        Phase::Dumping,
        &format!(
            "dumping '{}' from '{}'",
            request.params.database, request.params.host
        ),
    );
    let mut result = db_dump::execute(request).await?;
    if !result.success() {
        return Err(AppError::Execution {
            code: result.exit_code,
            stderr: result.stderr,
        });
    }

    if settings.mode == DumpMode::Full {
        reporter.phase(Phase::Archiving, "compressing the dump");
        match archive::archive_dump(&result.sql_path) {
            Ok(zip_path) => result.archive_path = Some(zip_path),
            // The dump itself succeeded and is kept; archiving trouble is a
            // warning, never fatal.
            Err(e) => reporter.warn(&e.to_string()),
        }
    }

    Ok(result)
}
