//! Download client for the csvxl conversion service.
//!
//! Fetches the converted workbook, takes the filename from
//! Content-Disposition and saves the payload locally. No retries.

mod fetch;
mod filename;
mod save;

use std::path::{Path, PathBuf};

pub use fetch::{BlockingFetcher, ClientError, DownloadedFile, Fetcher, DEFAULT_ENDPOINT};
pub use filename::extract_filename;
pub use save::{local_filename, save_as, FALLBACK_FILENAME};

/// Fetch `url` and save the workbook into `dir`.
pub async fn fetch_and_save(url: &str, dir: &Path) -> Result<PathBuf, ClientError> {
    let file = Fetcher::new(url)?.fetch().await?;
    save_as(&file, dir)
}

/// Blocking form of [`fetch_and_save`].
pub fn fetch_and_save_blocking(url: &str, dir: &Path) -> Result<PathBuf, ClientError> {
    let file = BlockingFetcher::new(url)?.fetch()?;
    save_as(&file, dir)
}

/// Download the converted workbook from the default endpoint into the
/// current directory.
pub async fn download_converted_workbook() -> Result<PathBuf, ClientError> {
    fetch_and_save(DEFAULT_ENDPOINT, Path::new(".")).await
}
