//! # Thumbnail Batch Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce `make_thumbnails_of_folder` come entry point a singola chiamata
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione del batch e validazione parametri
//! - `error`: Tipi di errore custom
//! - `file_manager`: Discovery dei PNG e filtro dei file già convertiti
//! - `resize`: Calcolo dimensioni e ridimensionamento con il crate `image`
//! - `processor`: Orchestratore del batch e worker per singolo file
//! - `progress`: Progress bar e statistiche
//! - `json_output`: Eventi JSON per uso programmatico
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use thumbnail_batch::{make_thumbnails_of_folder, OutputSize};
//!
//! let created = make_thumbnails_of_folder(&path, OutputSize::new(200, 200)?, None, true).await?;
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod json_output;
pub mod processor;
pub mod progress;
pub mod resize;

pub use config::Config;
pub use error::ThumbnailError;
pub use processor::{BatchReport, ThumbnailBatchProcessor};
pub use resize::OutputSize;

use std::path::{Path, PathBuf};

/// Crea un thumbnail per ogni PNG in `folder_path`.
///
/// Le immagini già convertite non vengono rielaborate, quindi è sicuro
/// chiamarla più volte sulla stessa cartella. Ritorna i path dei soli file
/// creati da questa invocazione.
pub async fn make_thumbnails_of_folder(
    folder_path: impl AsRef<Path>,
    output_size: OutputSize,
    output_folder: Option<&Path>,
    verbose: bool,
) -> error::Result<Vec<PathBuf>> {
    let mut config = Config::new(output_size);
    config.output_folder = output_folder.map(Path::to_path_buf);
    config.verbose = verbose;

    let report = ThumbnailBatchProcessor::new(config)?
        .run(folder_path.as_ref())
        .await?;

    Ok(report.created)
}
