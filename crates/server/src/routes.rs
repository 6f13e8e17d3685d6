// Conversion endpoint: CSV source -> XLSX attachment

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use csvxl_io::{xlsx, ConversionReport, SheetDocument, XLSX_MIME_TYPE};
use tempfile::TempPath;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::artifact::{write_artifact, ArtifactStream};
use crate::config::{DeliveryMode, ServerConfig, DEFAULT_DOWNLOAD_NAME};
use crate::error::AppError;

pub const CONVERT_PATH: &str = "/convert-csv-to-excel";

/// Read-only state shared by every request.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(CONVERT_PATH, get(convert_csv_to_excel))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Serialized workbook waiting to be sent.
enum Prepared {
    Memory(Vec<u8>),
    Disk(TempPath),
}

async fn convert_csv_to_excel(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let start_time = Instant::now();
    let worker_state = Arc::clone(&state);

    // Read/parse/serialize is blocking I/O; keep it off the async workers
    let (prepared, report) = tokio::task::spawn_blocking(move || prepare(&worker_state.config))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let config = &state.config;
    tracing::info!(
        "converted {}: {} (total {}ms)",
        config.source.display(),
        report.summary(),
        start_time.elapsed().as_millis()
    );

    let body = match prepared {
        Prepared::Memory(bytes) => Body::from(bytes),
        Prepared::Disk(path) => ArtifactStream::open(path)
            .await
            .map_err(csvxl_io::ConvertError::from)?
            .into_body(),
    };

    let headers = [
        (header::CONTENT_TYPE, XLSX_MIME_TYPE.to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(&config.download_name)),
        // Browsers hide Content-Disposition from cross-origin scripts otherwise
        (header::ACCESS_CONTROL_EXPOSE_HEADERS, "Content-Disposition".to_string()),
        (header::CACHE_CONTROL, "no-store".to_string()),
    ];
    Ok((headers, body).into_response())
}

fn prepare(config: &ServerConfig) -> Result<(Prepared, ConversionReport), AppError> {
    let source = config.source_path();
    let content = csvxl_io::read_source(&source)?;
    if content.is_empty() {
        return Err(AppError::BadInput(format!("{} is empty", source.display())));
    }

    let records = csvxl_io::parse_records(&content)?;
    let doc = SheetDocument::from_records(&records, &config.sheet_name);

    match config.delivery {
        DeliveryMode::Memory => {
            let (bytes, report) = xlsx::export_to_buffer(&doc)?;
            Ok((Prepared::Memory(bytes), report))
        }
        DeliveryMode::Disk => {
            let (path, report) = write_artifact(&doc, &config.artifact_dir())?;
            Ok((Prepared::Disk(path), report))
        }
    }
}

/// `attachment; filename="<name>"`, restricted to printable ASCII.
pub fn content_disposition(download_name: &str) -> String {
    let name: String = download_name
        .chars()
        .filter(|c| (c.is_ascii_graphic() || *c == ' ') && *c != '"' && *c != '\\')
        .collect();
    let name = name.trim();
    let name = if name.is_empty() { DEFAULT_DOWNLOAD_NAME } else { name };
    format!("attachment; filename=\"{}\"", name)
}
