//! # Thumbnail Batch - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Creazione della configurazione e avvio del batch
//! - Exit code: 0 se tutto è andato a buon fine, 1 altrimenti
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (cartella, width, height, output, etc.)
//! 2. Configura il logging (nessun output con `--silent`)
//! 3. Crea un oggetto Config con tutti i parametri
//! 4. Istanzia ThumbnailBatchProcessor e avvia il batch
//!
//! ## Esempio di utilizzo:
//! ```bash
//! thumbnail-batch /path/to/images 200 150 --output /path/to/thumbs --workers 4
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use thumbnail_batch::json_output::JsonMessage;
use thumbnail_batch::{BatchReport, Config, OutputSize, ThumbnailBatchProcessor};

#[derive(Parser)]
#[command(name = "thumbnail-batch")]
#[command(about = "Create downscaled PNG thumbnails for every image in a folder")]
struct Args {
    /// The folder you want to process
    input: PathBuf,

    /// The width of the output image thumbnails
    width: u32,

    /// The height of the output image thumbnails
    height: u32,

    /// The folder the output images will be saved in (default: the input folder)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not show any progress output
    #[arg(short, long, conflicts_with_all = ["json", "debug"])]
    silent: bool,

    /// Number of concurrent conversions
    #[arg(short, long, default_value = "1")]
    workers: usize,

    /// Keep converting the remaining files when one of them fails
    #[arg(short, long)]
    keep_going: bool,

    /// Output progress and status as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if !args.silent {
        if let Err(e) = init_logging(&args) {
            eprintln!("Failed to initialize logging: {}", e);
        }
    }

    let silent = args.silent;
    let json = args.json;

    match run(args).await {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            if json {
                let err: &(dyn std::error::Error + 'static) = e.as_ref();
                JsonMessage::error(err).emit();
            } else if !silent {
                error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // In modalità JSON stdout è riservato agli eventi
    if args.json {
        tracing::subscriber::set_global_default(builder.with_writer(std::io::stderr).finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}

async fn run(args: Args) -> Result<BatchReport> {
    let output_size = OutputSize::new(args.width, args.height)?;

    let config = Config {
        output_folder: args.output,
        verbose: !args.silent,
        workers: args.workers,
        continue_on_error: args.keep_going,
        json_output: args.json,
        ..Config::new(output_size)
    };

    let processor = ThumbnailBatchProcessor::new(config)?;
    let report = processor.run(&args.input).await?;

    if !args.json {
        info!("{}", report.stats.format_summary());
    }

    Ok(report)
}
