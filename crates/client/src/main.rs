// csvxl-fetch - download the converted workbook and save it

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use csvxl_client::{save_as, BlockingFetcher, ClientError, DownloadedFile, Fetcher, DEFAULT_ENDPOINT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_SUCCESS: u8 = 0;
const EXIT_NETWORK: u8 = 3;
const EXIT_HTTP: u8 = 4;
const EXIT_IO: u8 = 5;

#[derive(Parser)]
#[command(name = "csvxl-fetch")]
#[command(about = "Download the converted Excel workbook from a csvxl server")]
#[command(version)]
struct Cli {
    /// Conversion endpoint
    #[arg(long, env = "CSVXL_URL", default_value = DEFAULT_ENDPOINT)]
    url: String,

    /// Directory to save into
    #[arg(long, short = 'o', default_value = ".")]
    out_dir: PathBuf,

    /// Use the blocking HTTP client instead of the async one
    #[arg(long)]
    blocking: bool,

    /// Only print the saved path
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csvxl_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: &Cli) -> Result<(), ClientError> {
    let file = if cli.blocking {
        BlockingFetcher::new(cli.url.as_str())?.fetch()?
    } else {
        fetch_async(&cli.url)?
    };

    let path = save_as(&file, &cli.out_dir)?;
    if cli.quiet {
        println!("{}", path.display());
    } else {
        println!("{}", describe(&file, &path));
    }
    Ok(())
}

fn fetch_async(url: &str) -> Result<DownloadedFile, ClientError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async { Fetcher::new(url)?.fetch().await })
}

/// Saved path plus a shape summary read back from the workbook.
fn describe(file: &DownloadedFile, path: &Path) -> String {
    match csvxl_io::xlsx::read_from_bytes(&file.bytes, None) {
        Ok(doc) => format!(
            "Saved {} ({} rows x {} columns, sheet '{}')",
            path.display(),
            doc.row_count(),
            doc.column_count(),
            doc.sheet_name()
        ),
        Err(e) => format!("Saved {} ({} bytes, not readable as XLSX: {})", path.display(), file.bytes.len(), e),
    }
}

fn exit_code(err: &ClientError) -> u8 {
    match err {
        ClientError::Network(_) => EXIT_NETWORK,
        ClientError::Http(_, _) => EXIT_HTTP,
        ClientError::Io(_) => EXIT_IO,
    }
}
