//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom della libreria.
//!
//! ## Responsabilità:
//! - Definisce `ThumbnailError` enum per categorizzare tutti gli errori possibili
//! - Integra con `thiserror` per automatic error conversion
//! - Supporta error chaining per mantenere il path del file che ha fallito
//!
//! ## Categorie di errori:
//! - `Validation`: Precondizioni non rispettate (cartella mancante, size non valida)
//! - `Io`: Errori di I/O (permessi, disco pieno, etc.)
//! - `Image`: Errori di decode/encode immagini (PNG corrotti, etc.)
//! - `File`: Wrapper che associa un errore al file di input che lo ha causato
//! - `Task`: Worker bloccante terminato in modo anomalo
//!
//! ## Esempio:
//! ```rust,ignore
//! if !folder.exists() {
//!     return Err(ThumbnailError::Validation(format!(
//!         "input folder {} does not exist",
//!         folder.display()
//!     )));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for thumbnail generation
#[derive(thiserror::Error, Debug)]
pub enum ThumbnailError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to convert {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<ThumbnailError>,
    },

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ThumbnailError {
    /// Associa l'errore al file di input che lo ha generato
    pub fn for_file(path: impl Into<PathBuf>, source: ThumbnailError) -> Self {
        Self::File {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// True per errori di precondizione (nessun side effect eseguito)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T, E = ThumbnailError> = std::result::Result<T, E>;
