//! # Path Resolution Module
//!
//! Centralizza tutta la logica di calcolo dei path: risoluzione delle cartelle
//! (eseguita una sola volta prima del batch) e naming dei file di output.

use crate::error::{Result, ThumbnailError};
use crate::resize::OutputSize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Cartelle del batch, già validate e rese assolute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFolders {
    pub input: PathBuf,
    pub output: PathBuf,
    /// True se la cartella di output è stata creata da questa invocazione
    pub created_output: bool,
}

/// Utility per calcolare i path in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Risolve cartella di input e di output.
    ///
    /// La cartella di input deve esistere; quella di output viene creata
    /// (con tutte le directory intermedie) se indicata e mancante, altrimenti
    /// coincide con la cartella di input.
    pub async fn resolve(input: &Path, output: Option<&Path>) -> Result<ResolvedFolders> {
        let input_metadata = match tokio::fs::metadata(input).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ThumbnailError::Validation(format!(
                    "input folder_path {} does not exist",
                    input.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };
        if !input_metadata.is_dir() {
            return Err(ThumbnailError::Validation(format!(
                "input folder_path {} is not a directory",
                input.display()
            )));
        }

        let canonical_input = tokio::fs::canonicalize(input).await?;
        debug!("Canonical input: {}", canonical_input.display());

        let Some(output) = output else {
            return Ok(ResolvedFolders {
                output: canonical_input.clone(),
                input: canonical_input,
                created_output: false,
            });
        };

        let created_output = match tokio::fs::metadata(output).await {
            Ok(metadata) if metadata.is_dir() => false,
            Ok(_) => {
                return Err(ThumbnailError::Validation(format!(
                    "Output path is not a directory: {}",
                    output.display()
                )));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tokio::fs::create_dir_all(output).await?;
                info!("Created output directory: {}", output.display());
                true
            }
            Err(e) => return Err(e.into()),
        };

        let canonical_output = tokio::fs::canonicalize(output).await?;
        debug!("Canonical output: {}", canonical_output.display());

        Ok(ResolvedFolders {
            input: canonical_input,
            output: canonical_output,
            created_output,
        })
    }

    /// Calcola il path di output: `output_folder/{stem}_{width}x{height}.png`
    pub fn output_path(input_path: &Path, output_folder: &Path, size: OutputSize) -> Result<PathBuf> {
        let file_stem = input_path
            .file_stem()
            .ok_or_else(|| {
                ThumbnailError::Validation(format!("Invalid file name: {}", input_path.display()))
            })?;

        // Il nome resta un OsString: stem non UTF-8 distinti danno output distinti
        let mut file_name = file_stem.to_os_string();
        file_name.push(size.suffix());

        Ok(output_folder.join(file_name))
    }
}
