// Server settings, from command-line flags or environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use csvxl_io::DEFAULT_SHEET_NAME;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SOURCE: &str = "test.csv";
pub const DEFAULT_DOWNLOAD_NAME: &str = "converted.xlsx";

/// How the serialized workbook reaches the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DeliveryMode {
    /// Write a request-scoped temp file, stream it back, delete it afterwards
    #[default]
    Disk,
    /// Serialize into memory and send the buffer
    Memory,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "csvxl-server")]
#[command(about = "Serve a local CSV file as an Excel (.xlsx) download")]
#[command(version)]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "CSVXL_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// CSV file to convert (relative paths resolve against the working directory)
    #[arg(long, env = "CSVXL_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: PathBuf,

    /// Directory for temporary workbook files (default: system temp dir)
    #[arg(long, env = "CSVXL_ARTIFACT_DIR")]
    pub artifact_dir: Option<PathBuf>,

    /// Response body strategy
    #[arg(long, env = "CSVXL_DELIVERY", value_enum, default_value = "disk")]
    pub delivery: DeliveryMode,

    /// Filename suggested to clients in Content-Disposition
    #[arg(long, env = "CSVXL_DOWNLOAD_NAME", default_value = DEFAULT_DOWNLOAD_NAME)]
    pub download_name: String,

    /// Name of the single worksheet
    #[arg(long, env = "CSVXL_SHEET_NAME", default_value = DEFAULT_SHEET_NAME)]
    pub sheet_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            source: PathBuf::from(DEFAULT_SOURCE),
            artifact_dir: None,
            delivery: DeliveryMode::Disk,
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Absolute CSV path; relative paths are joined onto the working directory.
    pub fn source_path(&self) -> PathBuf {
        if self.source.is_absolute() {
            return self.source.clone();
        }
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(&self.source),
            Err(_) => self.source.clone(),
        }
    }

    pub fn artifact_dir(&self) -> PathBuf {
        self.artifact_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
