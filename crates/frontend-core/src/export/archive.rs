//! Packaging a finished export as a zip archive

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// `<output_dir>.zip`, next to the output directory
pub fn archive_path(output_dir: &Path) -> PathBuf {
    let mut name = output_dir
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "build".into());
    name.push(".zip");
    output_dir.with_file_name(name)
}

/// Zip the export tree with entries relative to `output_dir`.
/// Returns the archive path and the number of files stored.
pub fn archive_export(output_dir: &Path) -> Result<(PathBuf, usize)> {
    let target = archive_path(output_dir);
    let file = std::fs::File::create(&target)
        .with_context(|| format!("Failed to create {}", target.display()))?;
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut stored = 0;
    for entry in WalkDir::new(output_dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", output_dir.display()))?;
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(output_dir) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        // Archive entry names always use forward slashes
        let name = relative.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else if entry.file_type().is_file() {
            let content = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            zip.start_file(name, options)?;
            zip.write_all(&content)?;
            stored += 1;
        }
    }

    zip.finish()
        .with_context(|| format!("Failed to finish {}", target.display()))?;
    Ok((target, stored))
}
