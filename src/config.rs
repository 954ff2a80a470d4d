//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione di un batch di thumbnails.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri del batch
//! - Fornisce validazione dei parametri prima di qualsiasi side effect
//! - Fornisce valori di default sensati
//!
//! ## Parametri di configurazione:
//! - `output_size`: Bounding box dei thumbnails (obbligatorio)
//! - `output_folder`: Directory di output (default: None = stessa cartella di input)
//! - `verbose`: Progress per file a livello INFO (default: false)
//! - `workers`: Numero di conversioni concorrenti (default: 1 = sequenziale)
//! - `continue_on_error`: Registra gli errori per file e prosegue (default: false)
//! - `json_output`: Eventi JSON su stdout (default: false)
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     workers: 4,
//!     ..Config::new(OutputSize::new(200, 200)?)
//! };
//! config.validate()?;
//! ```

use crate::error::{Result, ThumbnailError};
use crate::resize::OutputSize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a thumbnail batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bounding box of the generated thumbnails
    pub output_size: OutputSize,
    /// Output directory (None = write next to the originals)
    pub output_folder: Option<PathBuf>,
    /// Log one line per file at INFO level
    pub verbose: bool,
    /// Number of concurrent conversions
    pub workers: usize,
    /// Record per-file failures and keep going instead of aborting
    pub continue_on_error: bool,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Config {
    /// Configurazione di default per un dato bounding box
    pub fn new(output_size: OutputSize) -> Self {
        Self {
            output_size,
            output_folder: None,
            verbose: false,
            workers: 1,
            continue_on_error: false,
            json_output: false,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.output_size.validate()?;

        if self.workers == 0 {
            return Err(ThumbnailError::Validation(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if let Some(ref output_folder) = self.output_folder {
            if output_folder.exists() && !output_folder.is_dir() {
                return Err(ThumbnailError::Validation(format!(
                    "Output path is not a directory: {}",
                    output_folder.display()
                )));
            }
        }

        Ok(())
    }
}
