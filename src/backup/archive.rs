// mysqldumper/src/backup/archive.rs
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::{AppError, Result};

/// Packs the produced `.sql` file into a single-entry `.zip` alongside it,
/// then removes the uncompressed original. The original is deleted only
/// after the zip writer has finished; any earlier failure leaves it intact.
pub fn archive_dump(sql_path: &Path) -> Result<PathBuf> {
    let zip_path = sql_path.with_extension("zip");
    let entry_name = sql_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            AppError::Archive(format!("invalid dump file name: {}", sql_path.display()))
        })?
        .to_string();

    if let Err(e) = write_zip(sql_path, &zip_path, &entry_name) {
        // Partial zip is useless; clean it up but keep the dump.
        let _ = fs::remove_file(&zip_path);
        return Err(AppError::Archive(format!(
            "could not create {}: {}",
            zip_path.display(),
            e
        )));
    }

    fs::remove_file(sql_path).map_err(|e| {
        AppError::Archive(format!(
            "archive written but could not remove {}: {}",
            sql_path.display(),
            e
        ))
    })?;

    Ok(zip_path)
}

fn write_zip(sql_path: &Path, zip_path: &Path, entry_name: &str) -> anyhow::Result<()> {
    let mut source = File::open(sql_path)?;
    let mut writer = ZipWriter::new(File::create(zip_path)?);
    writer.start_file(
        entry_name,
        FileOptions::default().compression_method(CompressionMethod::Deflated),
    )?;
    std::io::copy(&mut source, &mut writer)?;
    writer.finish()?;
    Ok(())
}
