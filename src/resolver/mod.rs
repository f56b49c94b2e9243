// mysqldumper/src/resolver/mod.rs
use std::path::{Path, PathBuf};
use which::which;

/// Known install locations for local-development MySQL bundles, probed when
/// mysqldump is not on PATH. Read-only filesystem checks, first match wins.
#[cfg(target_os = "macos")]
fn bundle_candidates() -> Vec<PathBuf> {
    const MAMP_PATHS: &[&str] = &[
        "/Applications/MAMP/Library/bin/mysql/bin/mysqldump",
        "/Applications/MAMP/Library/bin/mysql80/bin/mysqldump",
        "/Applications/MAMP/Library/bin/mysql57/bin/mysqldump",
    ];
    MAMP_PATHS.iter().map(|p| PathBuf::from(*p)).collect()
}

#[cfg(target_os = "windows")]
fn bundle_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    let xampp_root =
        std::env::var("XAMPP_HOME").unwrap_or_else(|_| String::from("C:\\xampp"));
    candidates.push(
        Path::new(&xampp_root)
            .join("mysql")
            .join("bin")
            .join("mysqldump.exe"),
    );

    // MAMP for Windows ships version-named subdirectories (mysql5.7.x,
    // mysql8.0.x); scan whatever is installed.
    let mamp_base = Path::new("C:\\MAMP").join("bin").join("mysql");
    if let Ok(entries) = std::fs::read_dir(&mamp_base) {
        for entry in entries.flatten() {
            if entry.file_name().to_string_lossy().starts_with("mysql") {
                candidates.push(entry.path().join("bin").join("mysqldump.exe"));
            }
        }
    }

    candidates
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn bundle_candidates() -> Vec<PathBuf> {
    Vec::new()
}

/// True when the path exists and carries execute permission.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn first_usable(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| is_executable(p)).cloned()
}

/// Locates the mysqldump binary: PATH first, then OS-specific bundle
/// locations. Returns None when nothing usable is found; the caller is
/// expected to fall back to a manually entered path.
pub fn find_mysqldump() -> Option<PathBuf> {
    if let Ok(path) = which("mysqldump") {
        return Some(path);
    }
    first_usable(&bundle_candidates())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn first_usable_picks_the_earliest_executable_candidate() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("not-there/mysqldump");
        let found = make_executable(tmp.path(), "mysqldump");
        let candidates = vec![missing, found.clone()];
        assert_eq!(first_usable(&candidates), Some(found));
    }

    #[cfg(unix)]
    #[test]
    fn plain_files_without_exec_bit_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let plain = tmp.path().join("mysqldump");
        std::fs::write(&plain, "not a binary").unwrap();
        assert!(!is_executable(&plain));
        assert_eq!(first_usable(&[plain]), None);
    }

    #[test]
    fn no_candidates_resolves_to_none_without_panicking() {
        assert_eq!(first_usable(&[]), None);
    }

    #[test]
    fn directories_are_not_executables() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!is_executable(tmp.path()));
    }
}
