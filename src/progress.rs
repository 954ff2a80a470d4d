//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di un batch.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Tracking statistiche (file creati, saltati, falliti, byte scritti)
//! - Report finale con statistiche aggregate
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:04] [========================>---------------] 12/20 (60%) [OK] photo.png: 200x150
//! ```
//!
//! ## Esempio:
//! ```rust,ignore
//! let progress = ProgressManager::new(total_files, config.verbose);
//! let mut stats = BatchStats::new(total_files);
//!
//! stats.add_created(bytes);
//! progress.update("[OK] photo.png");
//!
//! progress.finish(&stats.format_summary());
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Manages progress reporting for a thumbnail batch
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager; a hidden bar when `visible` is false
    pub fn new(total_files: u64, visible: bool) -> Self {
        if !visible {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total_files);

        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        ) {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Clear the bar (used when the batch aborts)
    pub fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

/// Statistics tracker for a thumbnail batch
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub candidates: usize,
    pub files_created: usize,
    pub files_skipped: usize,
    pub errors: usize,
    pub total_bytes_written: u64,
}

impl BatchStats {
    pub fn new(candidates: usize) -> Self {
        Self {
            candidates,
            ..Self::default()
        }
    }

    pub fn add_created(&mut self, bytes_written: u64) {
        self.files_created += 1;
        self.total_bytes_written += bytes_written;
    }

    pub fn add_skipped(&mut self) {
        self.files_skipped += 1;
    }

    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    pub fn files_processed(&self) -> usize {
        self.files_created + self.files_skipped + self.errors
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Candidates: {} | Created: {} | Skipped: {} | Errors: {} | Written: {}",
            self.candidates,
            self.files_created,
            self.files_skipped,
            self.errors,
            FileManager::format_size(self.total_bytes_written),
        )
    }
}
