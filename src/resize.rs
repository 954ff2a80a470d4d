//! # Image Resize Module
//!
//! Questo modulo gestisce il ridimensionamento delle immagini per creare thumbnails
//! usando il crate `image` (decode, resize ed encode in-process).
//!
//! ## Caratteristiche
//! - **SOLO RESIZE**: Nessuna compressione o ottimizzazione aggiuntiva
//! - **Semantica thumbnail**: L'immagine viene ridotta per stare dentro il box
//!   `width x height` preservando l'aspect ratio, mai ingrandita
//! - **Filtro Lanczos3**: Migliore qualità per downscaling
//! - **Scrittura atomica**: Il thumbnail viene scritto su un file `.partial`
//!   e rinominato solo a encode completato
//!
//! ## Calcolo dimensioni
//! ```text
//! 400x300 dentro 100x100 -> 100x75
//! 800x600 dentro 200x200 -> 200x150
//! 50x40   dentro 200x200 -> 50x40 (nessun upscale)
//! ```
//!
//! ## Esempio:
//! ```rust,ignore
//! let size: OutputSize = "200x200".parse()?;
//! let info = ImageResizer::default().create_thumbnail(&input, &output, size)?;
//! ```

use crate::error::{Result, ThumbnailError};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Dimensioni del bounding box dei thumbnails, in pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl OutputSize {
    /// Crea una nuova size validando che entrambe le dimensioni siano positive
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ThumbnailError::Validation(format!(
                "output size must have two positive entries (width, height), got {}",
                self
            )));
        }
        Ok(())
    }

    /// Suffisso dei file generati: `_{width}x{height}.png`
    pub fn suffix(&self) -> String {
        format!("_{}x{}.{}", self.width, self.height, THUMBNAIL_EXTENSION)
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl TryFrom<(u32, u32)> for OutputSize {
    type Error = ThumbnailError;

    fn try_from((width, height): (u32, u32)) -> Result<Self> {
        Self::new(width, height)
    }
}

impl FromStr for OutputSize {
    type Err = ThumbnailError;

    /// Parsa stringhe nel formato `WxH` (es. `200x150`)
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            ThumbnailError::Validation(format!(
                "output size must look like WIDTHxHEIGHT, got '{}'",
                s
            ))
        };

        let (width, height) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

        Self::new(width, height)
    }
}

/// Estensione dei file di input e di output
pub const THUMBNAIL_EXTENSION: &str = "png";

/// Calcola le dimensioni del thumbnail per un'immagine `source` dentro il box `size`.
///
/// Se l'immagine sta già nel box resta invariata (mai upscale). Altrimenti il
/// lato vincolante prende la dimensione del box e l'altro viene scelto tra
/// floor e ceil del valore scalato, tenendo quello che conserva meglio
/// l'aspect ratio (a parità vince il floor). Nessun lato scende sotto 1 pixel.
pub fn thumbnail_dimensions(source: (u32, u32), size: OutputSize) -> (u32, u32) {
    let (width, height) = source;
    if width == 0 || height == 0 {
        return source;
    }
    if size.width >= width && size.height >= height {
        return source;
    }

    // u128: i prodotti di tre fattori u32 non possono andare in overflow
    let (w, h) = (width as u128, height as u128);
    let (x, y) = (size.width as u128, size.height as u128);

    // x / y >= w / h: il vincolo è l'altezza
    if x * h >= w * y {
        let (floor, ceil) = floor_ceil(y * w, h);
        // |w/h - n/y| ha denominatore comune h*y
        let distance = |n: u128| (w * y).abs_diff(n * h);
        let n = if distance(ceil) < distance(floor) { ceil } else { floor };
        (n.max(1) as u32, size.height)
    } else {
        let (floor, ceil) = floor_ceil(x * h, w);
        // |w/h - x/n| = |w*n - x*h| / (h*n): confronto a denominatori incrociati
        let pick_ceil = floor != 0
            && (w * ceil).abs_diff(x * h) * floor < (w * floor).abs_diff(x * h) * ceil;
        let n = if pick_ceil { ceil } else { floor };
        (size.width, n.max(1) as u32)
    }
}

fn floor_ceil(numerator: u128, denominator: u128) -> (u128, u128) {
    let floor = numerator / denominator;
    if numerator % denominator == 0 {
        (floor, floor)
    } else {
        (floor, floor + 1)
    }
}

/// Informazioni su un thumbnail appena scritto
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailInfo {
    pub source_dimensions: (u32, u32),
    pub dimensions: (u32, u32),
    pub bytes_written: u64,
}

/// Processore per il ridimensionamento delle immagini
#[derive(Debug, Clone, Copy)]
pub struct ImageResizer {
    /// Filtro di resampling
    filter: FilterType,
}

impl Default for ImageResizer {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl ImageResizer {
    /// Crea un singolo thumbnail.
    ///
    /// Operazione bloccante (decode + resize + encode): dal contesto async va
    /// chiamata dentro `spawn_blocking`.
    ///
    /// # Errors
    /// Ritorna errore se:
    /// - L'immagine di input non è leggibile, è corrotta o in un formato non supportato
    /// - L'estensione di output non corrisponde a un formato noto
    /// - La scrittura del file di output fallisce
    pub fn create_thumbnail(
        &self,
        input_path: &Path,
        output_path: &Path,
        size: OutputSize,
    ) -> Result<ThumbnailInfo> {
        let format = ImageFormat::from_path(output_path)?;
        // Il decoder viene scelto dal contenuto del file, non dall'estensione
        let img = image::io::Reader::open(input_path)?
            .with_guessed_format()?
            .decode()?;
        let source_dimensions = (img.width(), img.height());
        let dimensions = thumbnail_dimensions(source_dimensions, size);

        debug!(
            "Resizing {} from {}x{} to {}x{}",
            input_path.file_name().unwrap_or_default().to_string_lossy(),
            source_dimensions.0,
            source_dimensions.1,
            dimensions.0,
            dimensions.1
        );

        let thumbnail = if dimensions == source_dimensions {
            img
        } else {
            img.resize_exact(dimensions.0, dimensions.1, self.filter)
        };

        Self::write_atomically(&thumbnail, output_path, format)?;
        let bytes_written = std::fs::metadata(output_path)?.len();

        Ok(ThumbnailInfo {
            source_dimensions,
            dimensions,
            bytes_written,
        })
    }

    /// Scrive su `<output>.partial` e rinomina: il path di output esiste solo
    /// a encode completato
    fn write_atomically(img: &DynamicImage, output_path: &Path, format: ImageFormat) -> Result<()> {
        let partial_path = Self::partial_path(output_path);

        if let Err(e) = img.save_with_format(&partial_path, format) {
            let _ = std::fs::remove_file(&partial_path);
            return Err(e.into());
        }

        if let Err(e) = std::fs::rename(&partial_path, output_path) {
            let _ = std::fs::remove_file(&partial_path);
            return Err(e.into());
        }

        Ok(())
    }

    fn partial_path(output_path: &Path) -> PathBuf {
        let mut name = output_path.as_os_str().to_owned();
        name.push(".partial");
        PathBuf::from(name)
    }
}
