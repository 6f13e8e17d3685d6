// Save-as for downloaded payloads

use std::path::{Path, PathBuf};

use crate::fetch::{ClientError, DownloadedFile};

/// Name used when the server suggested none, as browsers do.
pub const FALLBACK_FILENAME: &str = "download";

/// Final path component of the suggested name, or the fallback.
///
/// Directory parts are dropped so a hostile header cannot write outside
/// the target directory.
pub fn local_filename(suggested: &str) -> String {
    Path::new(suggested.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Write the payload into `dir` and return the written path.
pub fn save_as(file: &DownloadedFile, dir: &Path) -> Result<PathBuf, ClientError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(local_filename(&file.filename));
    std::fs::write(&path, &file.bytes)?;
    log::info!("saved {} bytes to {}", file.bytes.len(), path.display());
    Ok(path)
}
