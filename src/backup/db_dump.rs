// mysqldumper/src/backup/db_dump.rs
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};

use crate::errors::{AppError, Result};
use crate::params::{DumpMode, ExecutionRequest, ExecutionResult};

/// Extra flags for full-mode dumps, matching the feature-complete variant:
/// consistent snapshot, stored programs included, drop-before-create for
/// database and tables, fixed charset, replication-position metadata off.
const FULL_MODE_FLAGS: &[&str] = &[
    "--single-transaction",
    "--routines",
    "--triggers",
    "--events",
    "--add-drop-database",
    "--add-drop-table",
    "--default-character-set=utf8mb4",
    "--set-gtid-purged=OFF",
];

/// Builds the mysqldump argument vector. The database name goes last as the
/// sole positional argument.
///
/// Security caveat (inherited, kept on purpose): the password is embedded in
/// the `-p` argument and is therefore visible in process listings while the
/// dump runs.
pub(crate) fn build_args(request: &ExecutionRequest) -> Vec<String> {
    let p = &request.params;
    let mut args = vec![
        format!("-h{}", p.host),
        format!("-u{}", p.user),
        format!("-p{}", p.password),
    ];
    if let Some(port) = p.port {
        args.push(format!("-P{}", port));
    }
    if request.mode == DumpMode::Full {
        args.extend(FULL_MODE_FLAGS.iter().map(|f| f.to_string()));
    }
    args.push(p.database.clone());
    args
}

/// Runs mysqldump to completion, streaming its stdout straight into the
/// destination `.sql` file and capturing stderr for diagnostics. Blocks the
/// calling thread; use [`execute`] from async contexts.
pub(crate) fn run_dump(request: &ExecutionRequest) -> Result<ExecutionResult> {
    let sql_path = request.sql_path();
    let dump_file = File::create(&sql_path)?;

    let mut child = Command::new(&request.tool_path)
        .args(build_args(request))
        .stdout(Stdio::from(dump_file))
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                AppError::ToolNotFound(request.tool_path.display().to_string())
            }
            _ => AppError::Io(e),
        })?;

    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        // Drain stderr before waiting so a chatty tool cannot deadlock on a
        // full pipe.
        pipe.read_to_string(&mut stderr)?;
    }
    let status = child.wait()?;

    Ok(ExecutionResult {
        exit_code: status.code().unwrap_or(-1),
        sql_path,
        stderr: stderr.trim_end().to_string(),
        archive_path: None,
    })
}

/// Async entry point: offloads the blocking subprocess call to a worker
/// thread so the caller's task (and any UI event loop above it) stays
/// responsive.
pub async fn execute(request: ExecutionRequest) -> Result<ExecutionResult> {
    tokio::task::spawn_blocking(move || run_dump(&request))
        .await
        .map_err(|e| AppError::Unexpected(anyhow::anyhow!("dump worker panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ConnectionParams;
    use chrono::NaiveDate;
    use std::path::{Path, PathBuf};

    fn request(tool: PathBuf, out: PathBuf, mode: DumpMode) -> ExecutionRequest {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(10, 15, 30)
            .unwrap();
        ExecutionRequest::new(
            ConnectionParams {
                host: "localhost".into(),
                user: "root".into(),
                password: "secret".into(),
                port: Some(8889),
                database: "shop".into(),
            },
            tool,
            out,
            mode,
            ts,
        )
    }

    #[test]
    fn full_mode_args_in_documented_order() {
        let req = request("mysqldump".into(), "/tmp".into(), DumpMode::Full);
        let args = build_args(&req);
        assert_eq!(args[0], "-hlocalhost");
        assert_eq!(args[1], "-uroot");
        assert_eq!(args[2], "-psecret");
        assert_eq!(args[3], "-P8889");
        assert!(args.contains(&"--single-transaction".to_string()));
        assert!(args.contains(&"--set-gtid-purged=OFF".to_string()));
        assert_eq!(args.last().unwrap(), "shop");
    }

    #[test]
    fn minimal_mode_omits_dump_option_flags() {
        let mut req = request("mysqldump".into(), "/tmp".into(), DumpMode::Minimal);
        req.params.port = None;
        let args = build_args(&req);
        assert_eq!(args, vec!["-hlocalhost", "-uroot", "-psecret", "shop"]);
    }

    #[cfg(unix)]
    fn stub_tool(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("mysqldump-stub");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn successful_dump_streams_stdout_into_the_sql_file() {
        let tmp = tempfile::tempdir().unwrap();
        // Echo back the last argument, which must be the database name.
        let tool = stub_tool(
            tmp.path(),
            "for a in \"$@\"; do last=\"$a\"; done\nprintf -- '-- dump of %s\\n' \"$last\"",
        );
        let req = request(tool, tmp.path().to_path_buf(), DumpMode::Minimal);
        let result = run_dump(&req).unwrap();

        assert!(result.success());
        assert_eq!(result.exit_code, 0);
        assert!(result.stderr.is_empty());
        let written = std::fs::read_to_string(req.sql_path()).unwrap();
        assert_eq!(written, "-- dump of shop\n");
    }

    #[cfg(unix)]
    #[test]
    fn stub_output_bytes_arrive_unaltered() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = stub_tool(tmp.path(), "printf 'CREATE TABLE t (id INT);'");
        let req = request(tool, tmp.path().to_path_buf(), DumpMode::Minimal);
        let result = run_dump(&req).unwrap();

        assert!(result.success());
        assert_eq!(
            std::fs::read(req.sql_path()).unwrap(),
            b"CREATE TABLE t (id INT);"
        );
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_reports_the_captured_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = stub_tool(tmp.path(), "echo 'access denied' >&2\nexit 2");
        let req = request(tool, tmp.path().to_path_buf(), DumpMode::Full);
        let result = run_dump(&req).unwrap();

        assert!(!result.success());
        assert_eq!(result.exit_code, 2);
        assert_eq!(result.stderr, "access denied");
    }

    #[test]
    fn missing_tool_is_a_distinct_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let req = request(
            tmp.path().join("no-such-mysqldump"),
            tmp.path().to_path_buf(),
            DumpMode::Minimal,
        );
        match run_dump(&req) {
            Err(AppError::ToolNotFound(path)) => {
                assert!(path.contains("no-such-mysqldump"))
            }
            other => panic!("expected ToolNotFound, got {other:?}"),
        }
    }
}
