// mysqldumper/src/params.rs
use chrono::NaiveDateTime;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::resolver;

/// A single validation failure, attached to the field that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Connection parameters for a single dump run.
///
/// The password lives only in this struct for the lifetime of one run; it is
/// never written to the preferences file.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    pub host: String,
    pub user: String,
    pub password: String,
    pub port: Option<u16>,
    pub database: String,
}

impl ConnectionParams {
    /// Checks field completeness. Returns every problem at once so a front
    /// end can surface them all in one round trip.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.user.trim().is_empty() {
            errors.push(FieldError::new("user", "must not be empty"));
        }
        if self.host.trim().is_empty() {
            errors.push(FieldError::new("host", "must not be empty"));
        }
        if self.database.trim().is_empty() {
            errors.push(FieldError::new("database", "must not be empty"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Parses a textual port as entered at a prompt or loaded from preferences.
/// Empty text means "use the server default"; anything else must be a
/// positive integer.
pub fn parse_port(text: &str) -> Result<Option<u16>, FieldError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<u16>() {
        Ok(0) | Err(_) => Err(FieldError::new("port", "must be a positive integer")),
        Ok(p) => Ok(Some(p)),
    }
}

/// Checks the output directory ahead of the run. The default desktop
/// location is created on demand; any user-chosen directory must pre-exist.
pub fn validate_output_dir(dir: &Path, is_default: bool) -> Result<(), FieldError> {
    if dir.is_dir() {
        return Ok(());
    }
    if is_default && !dir.exists() {
        return std::fs::create_dir_all(dir).map_err(|e| {
            FieldError::new(
                "output_folder",
                format!("could not create {}: {}", dir.display(), e),
            )
        });
    }
    Err(FieldError::new(
        "output_folder",
        format!("{} does not exist or is not a directory", dir.display()),
    ))
}

/// Re-check of the tool path right before execution. The path may have been
/// edited since it was last validated; a stale path is caught here and again
/// by the spawn itself.
pub fn validate_tool_path(path: &Path) -> Result<(), FieldError> {
    if resolver::is_executable(path) {
        Ok(())
    } else {
        Err(FieldError::new(
            "mysqldump_path",
            format!("{} does not exist or is not executable", path.display()),
        ))
    }
}

/// Which mysqldump option set to use.
///
/// `Full` matches the feature-complete variant (consistent snapshot,
/// routines/triggers/events, drop-before-create, fixed charset, GTID info
/// suppressed) and enables zip post-processing. `Minimal` passes only the
/// connection flags and skips archiving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpMode {
    Full,
    Minimal,
}

/// Everything the executor needs for one run, built fresh per invocation.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub params: ConnectionParams,
    pub tool_path: PathBuf,
    pub output_dir: PathBuf,
    pub mode: DumpMode,
    base_name: String,
}

impl ExecutionRequest {
    /// The timestamp is passed in rather than read from the clock so the
    /// derived filename is deterministic under test.
    pub fn new(
        params: ConnectionParams,
        tool_path: PathBuf,
        output_dir: PathBuf,
        mode: DumpMode,
        timestamp: NaiveDateTime,
    ) -> Self {
        let base_name = format!("{}_{}", params.database, timestamp.format("%Y%m%d_%H%M%S"));
        ExecutionRequest {
            params,
            tool_path,
            output_dir,
            mode,
            base_name,
        }
    }

    pub fn sql_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.sql", self.base_name))
    }
}

/// Outcome of one executor run, before optional post-processing.
#[derive(Debug)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub sql_path: PathBuf,
    pub stderr: String,
    pub archive_path: Option<PathBuf>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The artifact the user ends up with: the archive when post-processing
    /// ran, the raw dump otherwise.
    pub fn artifact(&self) -> &Path {
        self.archive_path.as_deref().unwrap_or(&self.sql_path)
    }
}
