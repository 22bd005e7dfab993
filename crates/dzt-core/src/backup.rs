use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::FileOptions;

/// Zips a file or directory to `<name>_<YYYYmmdd-HHMMSS>.zip` beside it,
/// leaving the original untouched.
pub fn zip_backup(target: &Path) -> io::Result<PathBuf> {
    if !target.exists() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "nothing to back up"));
    }
    let parent = target.parent().unwrap_or(Path::new("."));
    let name = target
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("backup");
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let dest = parent.join(format!("{}_{}.zip", name, ts));

    let file = fs::File::create(&dest)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    if target.is_file() {
        zip.start_file(name, options)?;
        zip.write_all(&fs::read(target)?)?;
    } else {
        for entry in WalkDir::new(target).sort_by_file_name() {
            let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
            let path = entry.path();
            let Ok(rel) = path.strip_prefix(target) else {
                continue;
            };
            if rel.as_os_str().is_empty() {
                continue;
            }
            let entry_name = rel.to_string_lossy().replace('\\', "/");
            if path.is_dir() {
                zip.add_directory(entry_name, options)?;
            } else {
                zip.start_file(entry_name, options)?;
                zip.write_all(&fs::read(path)?)?;
            }
        }
    }
    zip.finish()?;
    tracing::info!(backup = %dest.display(), "wrote backup");
    Ok(dest)
}
