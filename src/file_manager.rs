//! # File Management Module
//!
//! Questo modulo gestisce la discovery delle immagini sorgente.
//!
//! ## Responsabilità:
//! - Discovery **non ricorsiva** dei file PNG in una directory
//! - Esclusione dei file già convertiti (nome contenente il suffisso)
//! - Formattazione human-readable delle dimensioni
//!
//! ## Regole di matching:
//! - Estensione esattamente `png` (case-sensitive, come il suffisso di output)
//! - File nascosti (nome che inizia con `.`) ignorati, come nel globbing di shell
//! - Ordinamento per path per avere un ordine di elaborazione deterministico
//!
//! ## Esempio:
//! ```rust,ignore
//! let all = FileManager::find_png_files(folder)?;
//! let candidates = FileManager::exclude_converted(all, &size.suffix());
//! ```

use crate::error::Result;
use crate::resize::THUMBNAIL_EXTENSION;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manages file discovery
pub struct FileManager;

impl FileManager {
    /// Find all PNG files directly inside `folder` (non-recursive), sorted by path
    pub fn find_png_files(folder: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if Self::is_png(path) && !Self::is_hidden(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Check if a file has the `.png` extension
    pub fn is_png(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext == THUMBNAIL_EXTENSION)
            .unwrap_or(false)
    }

    fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .map(|name| name.as_encoded_bytes().starts_with(b"."))
            .unwrap_or(false)
    }

    /// Check if the file name already carries the thumbnail suffix.
    ///
    /// Il confronto è sui byte del nome: nessuna conversione lossy in UTF-8.
    pub fn is_converted(path: &Path, suffix: &str) -> bool {
        let suffix = suffix.as_bytes();
        if suffix.is_empty() {
            return true;
        }

        path.file_name()
            .map(|name| {
                name.as_encoded_bytes()
                    .windows(suffix.len())
                    .any(|window| window == suffix)
            })
            .unwrap_or(false)
    }

    /// Drop every file whose name contains `suffix`
    pub fn exclude_converted(files: Vec<PathBuf>, suffix: &str) -> Vec<PathBuf> {
        files
            .into_iter()
            .filter(|path| !Self::is_converted(path, suffix))
            .collect()
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_find_png_files_is_flat_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "b.png");
        touch(root, "a.png");
        touch(root, "notes.txt");
        touch(root, "upper.PNG");
        touch(root, ".hidden.png");
        std::fs::create_dir(root.join("nested")).unwrap();
        touch(&root.join("nested"), "deep.png");
        std::fs::create_dir(root.join("dir.png")).unwrap();

        let files = FileManager::find_png_files(root).unwrap();

        assert_eq!(files, vec![root.join("a.png"), root.join("b.png")]);
    }

    #[test]
    fn test_exclude_converted() {
        let files = vec![
            PathBuf::from("/in/a.png"),
            PathBuf::from("/in/a_100x50.png"),
            PathBuf::from("/in/b_200x200.png"),
        ];

        let candidates = FileManager::exclude_converted(files, "_100x50.png");

        assert_eq!(
            candidates,
            vec![PathBuf::from("/in/a.png"), PathBuf::from("/in/b_200x200.png")]
        );
    }

    #[test]
    fn test_suffix_match_ignores_parent_dirs() {
        // Il controllo riguarda solo il nome del file, non le cartelle padre
        let path = PathBuf::from("/data_100x50.png/a.png");
        assert!(!FileManager::is_converted(&path, "_100x50.png"));
    }

    #[cfg(unix)]
    #[test]
    fn test_suffix_match_on_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let converted = Path::new(OsStr::from_bytes(b"/in/img\xff_10x10.png"));
        let original = Path::new(OsStr::from_bytes(b"/in/img\xff.png"));
        // Dopo una conversione lossy il byte 0xff diventerebbe U+FFFD
        let replacement = Path::new("/in/img\u{FFFD}_10x10.png");

        assert!(FileManager::is_converted(converted, "_10x10.png"));
        assert!(!FileManager::is_converted(original, "_10x10.png"));
        assert!(!FileManager::is_converted(original, "\u{FFFD}"));
        assert!(FileManager::is_converted(replacement, "_10x10.png"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_missing_folder_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(FileManager::find_png_files(&missing).is_err());
    }
}
