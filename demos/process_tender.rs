//! Process one tender from the command line
//!
//! Usage:
//!
//! ```text
//! RUST_LOG=tcs_downloader=debug cargo run --example process_tender -- <tender_id> [output_dir]
//! ```
//!
//! Set `PANDOC_PATH` to use a pandoc binary that is not on PATH, or
//! `TCS_CONFIG` to load settings from a JSON file.

use std::path::PathBuf;
use tcs_downloader::config::{Config, FileCollisionAction, OutputConfig, ToolsConfig};
use tcs_downloader::TcsDownloader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(tender_id) = args.next() else {
        eprintln!("usage: process_tender <tender_id> [output_dir]");
        std::process::exit(2);
    };
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| "pliegos".into());

    let config = match std::env::var_os("TCS_CONFIG") {
        Some(path) => Config::from_json(&std::fs::read_to_string(path)?)?,
        None => Config {
            tools: ToolsConfig {
                pandoc_path: std::env::var_os("PANDOC_PATH").map(PathBuf::from),
                ..Default::default()
            },
            output: OutputConfig {
                // Keep earlier downloads of the same document
                file_collision: FileCollisionAction::Rename,
                ..Default::default()
            },
            ..Default::default()
        },
    };

    let downloader = TcsDownloader::new(config)?;
    tracing::debug!(config = %downloader.config().to_json()?, "effective configuration");

    match downloader
        .process_tender_documents(&tender_id, &output_dir)
        .await
    {
        Ok(pdf) => {
            println!("{}", pdf.display());
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            eprintln!("tender {tender_id}: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("tender {tender_id} failed [{}]: {e}", e.error_code());
            Err(e.into())
        }
    }
}
