//! # Thumbnail Task Module
//!
//! Worker per la conversione di un singolo file.
//! Separato dall'orchestratore per poter essere eseguito in concorrenza.

use crate::error::Result;
use crate::resize::{ImageResizer, OutputSize, ThumbnailInfo};
use std::path::PathBuf;
use tracing::debug;

/// Esito della conversione di un singolo file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Thumbnail scritto da questa invocazione
    Created { output: PathBuf, info: ThumbnailInfo },
    /// Il path di output esisteva già: nessuna scrittura
    Skipped { output: PathBuf },
}

/// Worker per elaborazione singoli file
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailTask {
    resizer: ImageResizer,
    size: OutputSize,
}

impl ThumbnailTask {
    pub fn new(resizer: ImageResizer, size: OutputSize) -> Self {
        Self { resizer, size }
    }

    /// Converte `input` in `output`, saltando se `output` esiste già.
    ///
    /// Decode, resize ed encode girano sul pool bloccante di tokio.
    pub async fn process(&self, input: PathBuf, output: PathBuf) -> Result<TaskOutcome> {
        if tokio::fs::try_exists(&output).await? {
            debug!(
                "[SKIP] Output already exists: {} -> {}",
                input.display(),
                output.display()
            );
            return Ok(TaskOutcome::Skipped { output });
        }

        let resizer = self.resizer;
        let size = self.size;
        let (output, info) = tokio::task::spawn_blocking(move || {
            let info = resizer.create_thumbnail(&input, &output, size)?;
            Ok::<_, crate::error::ThumbnailError>((output, info))
        })
        .await??;

        debug!("Saved thumbnail: {}", output.display());
        Ok(TaskOutcome::Created { output, info })
    }
}
