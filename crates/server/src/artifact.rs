//! Request-scoped workbook files.
//!
//! Each conversion writes into its own uniquely named temp file. The file is
//! owned by the response body stream and deleted when that stream is
//! dropped, whether the client read it to the end or went away.

use std::io;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use bytes::Bytes;
use csvxl_io::{xlsx, ConversionReport, ConvertError, SheetDocument};
use futures_util::stream::Stream;
use tempfile::TempPath;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

const ARTIFACT_PREFIX: &str = "csvxl-";
const ARTIFACT_SUFFIX: &str = ".xlsx";

/// Serialize `doc` into a fresh temp file under `dir`.
pub fn write_artifact(doc: &SheetDocument, dir: &Path) -> Result<(TempPath, ConversionReport), ConvertError> {
    std::fs::create_dir_all(dir)?;

    let path = tempfile::Builder::new()
        .prefix(ARTIFACT_PREFIX)
        .suffix(ARTIFACT_SUFFIX)
        .tempfile_in(dir)?
        .into_temp_path();

    let report = xlsx::export_to_path(doc, &path)?;
    tracing::debug!("wrote artifact {}", path.display());
    Ok((path, report))
}

/// Byte stream over an artifact that removes the file on drop.
pub struct ArtifactStream {
    inner: ReaderStream<File>,
    artifact: TempPath,
}

impl ArtifactStream {
    pub async fn open(artifact: TempPath) -> io::Result<Self> {
        let file = File::open(&artifact).await?;
        Ok(Self {
            inner: ReaderStream::new(file),
            artifact,
        })
    }

    pub fn into_body(self) -> Body {
        Body::from_stream(self)
    }
}

impl Stream for ArtifactStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for ArtifactStream {
    fn drop(&mut self) {
        // TempPath removes the file right after this
        tracing::debug!("releasing artifact {}", self.artifact.display());
    }
}
