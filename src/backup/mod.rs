mod logic;
pub(crate) mod archive; // single-entry zip post-processing
pub(crate) mod db_dump; // mysqldump invocation and output capture

pub use logic::{Phase, Reporter, RunSettings};

use chrono::Local;
use std::path::Path;

use crate::config::Preferences;
use crate::errors::Result;
use crate::params::ExecutionResult;

/// Public entry point for one backup run. Stamps the artifact with the
/// current local time and hands off to the orchestration logic.
pub async fn run_backup_flow(
    settings: &RunSettings,
    prefs: &mut Preferences,
    prefs_path: &Path,
    reporter: &dyn Reporter,
) -> Result<ExecutionResult> {
    logic::perform_backup_orchestration(
        settings,
        prefs,
        prefs_path,
        reporter,
        Local::now().naive_local(),
    )
    .await
}
