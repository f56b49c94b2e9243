use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Opens `folder` in the platform file manager. Offered by the front end
/// after a successful run so the user can jump straight to the artifact.
pub fn reveal_in_file_manager(folder: &Path) -> Result<()> {
    if !folder.is_dir() {
        anyhow::bail!("{} is not a directory", folder.display());
    }

    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let opener = "xdg-open";

    Command::new(opener)
        .arg(folder)
        .spawn()
        .with_context(|| format!("Failed to open {} with {}", folder.display(), opener))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_paths_that_are_not_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("dump.sql");
        std::fs::write(&file, "-- dump").unwrap();
        assert!(reveal_in_file_manager(&file).is_err());
        assert!(reveal_in_file_manager(&tmp.path().join("missing")).is_err());
    }
}
