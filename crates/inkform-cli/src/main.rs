//! Developer CLI for the inkform pipeline
//!
//! Inspect layout grids from recorded detection snapshots, replay saved
//! extraction-service responses through the parser, or run the full pipeline
//! against the real service. The HTTP upload boundary lives elsewhere; this
//! tool exists for debugging the stages in isolation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inkform_extract::{parse_response, ExtractionClient, ExtractionConfig};
use inkform_layout::reconstruct_layout;
use inkform_pipeline::{DocumentPipeline, EngineError, RecognitionEngine, RecognizedPage};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "inkform")]
#[command(about = "Layout reconstruction and structured extraction for scanned forms")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconstruct and print the layout grid from a detection snapshot
    Layout {
        /// Path to a RecognizedPage JSON snapshot
        #[arg(short, long)]
        snapshot: PathBuf,
    },

    /// Run a saved extraction-service response through the resilient parser
    Parse {
        /// Path to the saved response text
        #[arg(short, long)]
        response: PathBuf,
    },

    /// Run the full pipeline: snapshot-backed recognition, real extraction
    Process {
        /// Path to a RecognizedPage JSON snapshot
        #[arg(short, long)]
        snapshot: PathBuf,
    },
}

/// Recognition engine backed by a recorded snapshot file.
///
/// The real engine is an external capability; for pipeline debugging we
/// replay its recorded output instead.
struct SnapshotEngine {
    page: RecognizedPage,
}

impl SnapshotEngine {
    fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let page: RecognizedPage =
            serde_json::from_str(&data).context("snapshot is not a RecognizedPage")?;
        Ok(Self { page })
    }
}

impl RecognitionEngine for SnapshotEngine {
    fn detect(&self, _image: &[u8]) -> Result<RecognizedPage, EngineError> {
        Ok(self.page.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(
                    "inkform_layout=info"
                        .parse()
                        .expect("directive is compile-time constant"),
                )
                .add_directive(
                    "inkform_extract=info"
                        .parse()
                        .expect("directive is compile-time constant"),
                )
                .add_directive(
                    "inkform_pipeline=info"
                        .parse()
                        .expect("directive is compile-time constant"),
                ),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Layout { snapshot } => {
            let engine = SnapshotEngine::load(&snapshot)?;
            let grid = reconstruct_layout(engine.page.detections, engine.page.image_width);
            println!("{grid}");
        }
        Command::Parse { response } => {
            let text = std::fs::read_to_string(&response)
                .with_context(|| format!("failed to read response {}", response.display()))?;
            let result = parse_response(&text);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Process { snapshot } => {
            let engine = SnapshotEngine::load(&snapshot)?;
            let config = ExtractionConfig::from_env();
            anyhow::ensure!(
                !config.api_key.is_empty(),
                "INKFORM_API_KEY is not set; the extraction service needs a key"
            );
            info!(model = %config.model, "processing snapshot");
            let pipeline = DocumentPipeline::new(engine, ExtractionClient::new(config));
            let record = pipeline.process(&[]).await;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}
